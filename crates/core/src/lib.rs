//! OPL toolchain core library.
//!
//! Parses the OSM "OPL" textual format: one entity — node, way,
//! relation, or changeset — per line. The main entry point is
//! [`parse_line`], which scans one logical line and commits the built
//! entity record to an [`EntitySink`].

#![warn(missing_docs)]

/// The entity model: nodes, ways, relations, changesets, and their parts.
pub mod entity;
/// The OPL grammar: cursor, scanners, parsers, and the line dispatcher.
pub mod grammar;
/// The entity sink seam between parser and consumers.
pub mod sink;

// ── Convenience re-exports ──────────────────────────────────────────────
// Flat imports for the common entry points; full module paths stay
// available for the rest.

// Parser
pub use grammar::parser::parse_line;

// Scanner surface
pub use grammar::scan::{escape_into, Cursor, ScanError};

// Entity model
pub use entity::{
    Bounds, Changeset, Entity, EntityKinds, Location, Member, MemberType, Node, NodeRef, Relation,
    Tag, Timestamp, Way,
};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{ErrorKind, LineIndex, OplError, Span};

// Sink
pub use sink::EntitySink;

// Serialization helpers
pub use grammar::dump::to_pretty_json;
