//! Shared test helpers for `opl_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use opl_toolchain_core::{parse_line, Changeset, Entity, EntityKinds, Node, OplError, Relation, Way};

/// Parse one line accepting every entity kind; panics on error.
#[allow(dead_code)]
pub fn parse_one(line: &str) -> Entity {
    let mut sink: Vec<Entity> = Vec::new();
    let committed = parse_line(1, line, EntityKinds::all(), &mut sink)
        .unwrap_or_else(|err| panic!("line {line:?} failed: {err}"));
    assert!(committed, "line {line:?} produced no entity");
    assert_eq!(sink.len(), 1, "exactly one entity per successful line");
    sink.pop().unwrap()
}

/// Parse one line accepting every entity kind; panics unless it fails.
/// Asserts the failure committed nothing.
#[allow(dead_code)]
pub fn parse_err(line: &str) -> OplError {
    let mut sink: Vec<Entity> = Vec::new();
    match parse_line(1, line, EntityKinds::all(), &mut sink) {
        Err(err) => {
            assert!(sink.is_empty(), "failing line {line:?} must commit nothing");
            err
        }
        Ok(committed) => panic!("line {line:?} unexpectedly parsed (committed: {committed})"),
    }
}

/// Parse a line expected to be a node.
#[allow(dead_code)]
pub fn node(line: &str) -> Node {
    match parse_one(line) {
        Entity::Node(n) => n,
        other => panic!("expected node from {line:?}, got {other:?}"),
    }
}

/// Parse a line expected to be a way.
#[allow(dead_code)]
pub fn way(line: &str) -> Way {
    match parse_one(line) {
        Entity::Way(w) => w,
        other => panic!("expected way from {line:?}, got {other:?}"),
    }
}

/// Parse a line expected to be a relation.
#[allow(dead_code)]
pub fn relation(line: &str) -> Relation {
    match parse_one(line) {
        Entity::Relation(r) => r,
        other => panic!("expected relation from {line:?}, got {other:?}"),
    }
}

/// Parse a line expected to be a changeset.
#[allow(dead_code)]
pub fn changeset(line: &str) -> Changeset {
    match parse_one(line) {
        Entity::Changeset(c) => c,
        other => panic!("expected changeset from {line:?}, got {other:?}"),
    }
}
