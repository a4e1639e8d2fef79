//! The OPL line parser.
//!
//! One call to [`parse_line`] handles one logical line: the dispatcher
//! looks at the leading byte, filters through the caller's
//! [`EntityKinds`] mask, runs the matching entity parser, and commits the
//! built record to the sink. Entity parsers scan the flat attribute list
//! in one pass — enforcing per-letter uniqueness — while deferring the
//! `T`/`N`/`M` sub-sections as byte ranges that are parsed afterwards.
//!
//! All failures carry the offending byte's offset; only the dispatcher
//! turns that into the line/column pair of the public [`OplError`].

use super::diag::{ErrorKind, OplError};
use super::scan::{Cursor, ScanError};
use crate::entity::{
    Bounds, Changeset, Entity, EntityKinds, Location, Member, MemberType, Node, NodeRef, Relation,
    Tag, Way,
};
use crate::sink::EntitySink;

/// A second occurrence of an attribute letter, pointing at the letter.
fn duplicate(name: &'static str, letter: char, offset: usize) -> ScanError {
    ScanError {
        kind: ErrorKind::DuplicateAttribute { name, letter },
        offset,
    }
}

// ── Sub-grammar parsers ─────────────────────────────────────────────────
//
// Each runs over a section cursor: truncated at the section end, so the
// NUL sentinel doubles as the range end, with positions still relative to
// the line start.

/// Parse `key=value` pairs separated by `,` over a deferred `T` section.
fn parse_tags(mut cur: Cursor<'_>) -> Result<Vec<Tag>, ScanError> {
    let mut tags = Vec::new();
    loop {
        let mut key = String::new();
        cur.string_into(&mut key)?;
        cur.expect_char(b'=')?;
        let mut value = String::new();
        cur.string_into(&mut value)?;
        tags.push(Tag { key, value });
        if matches!(cur.peek(), 0 | b' ' | b'\t') {
            return Ok(tags);
        }
        cur.expect_char(b',')?;
    }
}

/// Parse `nID[xLON[yLAT]]` elements separated by `,` over a deferred `N`
/// section.
fn parse_way_nodes(mut cur: Cursor<'_>) -> Result<Vec<NodeRef>, ScanError> {
    let mut nodes = Vec::new();
    if cur.at_end() {
        return Ok(nodes);
    }
    loop {
        cur.expect_char(b'n')?;
        let id = cur.int()?;
        if cur.at_end() {
            nodes.push(NodeRef { id, location: None });
            return Ok(nodes);
        }

        let mut location = Location::undefined();
        if cur.peek() == b'x' {
            cur.bump();
            location.set_x(cur.coordinate_partial()?);
            if cur.peek() == b'y' {
                cur.bump();
                location.set_y(cur.coordinate_partial()?);
            }
        }
        nodes.push(NodeRef {
            id,
            location: (!location.is_undefined()).then_some(location),
        });

        if cur.at_end() {
            return Ok(nodes);
        }
        cur.expect_char(b',')?;
    }
}

/// Parse `KID@role` members separated by `,` over a deferred `M` section,
/// where K is one of `n`/`w`/`r`.
fn parse_members(mut cur: Cursor<'_>) -> Result<Vec<Member>, ScanError> {
    let mut members = Vec::new();
    if cur.at_end() {
        return Ok(members);
    }
    loop {
        let kind = MemberType::from_byte(cur.peek()).ok_or(ScanError {
            kind: ErrorKind::UnknownObjectType,
            offset: cur.pos(),
        })?;
        cur.bump();

        let id = cur.int()?;
        cur.expect_char(b'@')?;
        if cur.at_end() {
            members.push(Member {
                kind,
                id,
                role: String::new(),
            });
            return Ok(members);
        }
        let mut role = String::new();
        cur.string_into(&mut role)?;
        members.push(Member { kind, id, role });

        if cur.at_end() {
            return Ok(members);
        }
        cur.expect_char(b',')?;
    }
}

// ── Entity parsers ──────────────────────────────────────────────────────

fn parse_node(cur: &mut Cursor<'_>) -> Result<Node, ScanError> {
    let mut node = Node {
        id: cur.int()?,
        ..Node::default()
    };

    let mut tags_section: Option<(usize, usize)> = None;
    let mut location = Location::undefined();

    let mut has_version = false;
    let mut has_visible = false;
    let mut has_changeset = false;
    let mut has_timestamp = false;
    let mut has_uid = false;
    let mut has_user = false;
    let mut has_tags = false;
    let mut has_lon = false;
    let mut has_lat = false;

    while !cur.at_end() {
        cur.skip_space()?;
        let letter = cur.peek();
        if letter == 0 {
            break;
        }
        let letter_pos = cur.pos();
        cur.bump();
        match letter {
            b'v' => {
                if has_version {
                    return Err(duplicate("version", 'v', letter_pos));
                }
                has_version = true;
                node.version = cur.int()?;
            }
            b'd' => {
                if has_visible {
                    return Err(duplicate("visible", 'd', letter_pos));
                }
                has_visible = true;
                node.visible = cur.visible()?;
            }
            b'c' => {
                if has_changeset {
                    return Err(duplicate("changeset_id", 'c', letter_pos));
                }
                has_changeset = true;
                node.changeset = cur.int()?;
            }
            b't' => {
                if has_timestamp {
                    return Err(duplicate("timestamp", 't', letter_pos));
                }
                has_timestamp = true;
                node.timestamp = cur.timestamp()?;
            }
            b'i' => {
                if has_uid {
                    return Err(duplicate("uid", 'i', letter_pos));
                }
                has_uid = true;
                node.uid = cur.int()?;
            }
            b'u' => {
                if has_user {
                    return Err(duplicate("user", 'u', letter_pos));
                }
                has_user = true;
                cur.string_into(&mut node.user)?;
            }
            b'T' => {
                if has_tags {
                    return Err(duplicate("tags", 'T', letter_pos));
                }
                has_tags = true;
                if cur.non_empty() {
                    let start = cur.pos();
                    let end = cur.skip_section();
                    tags_section = Some((start, end));
                }
            }
            b'x' => {
                if has_lon {
                    return Err(duplicate("lon", 'x', letter_pos));
                }
                has_lon = true;
                if cur.non_empty() {
                    location.set_x(cur.coordinate_partial()?);
                }
            }
            b'y' => {
                if has_lat {
                    return Err(duplicate("lat", 'y', letter_pos));
                }
                has_lat = true;
                if cur.non_empty() {
                    location.set_y(cur.coordinate_partial()?);
                }
            }
            _ => {
                return Err(ScanError {
                    kind: ErrorKind::UnknownAttribute,
                    offset: letter_pos,
                })
            }
        }
    }

    if location.valid() {
        node.location = Some(location);
    }
    if let Some((start, end)) = tags_section {
        node.tags = parse_tags(cur.section(start, end))?;
    }
    Ok(node)
}

fn parse_way(cur: &mut Cursor<'_>) -> Result<Way, ScanError> {
    let mut way = Way {
        id: cur.int()?,
        ..Way::default()
    };

    let mut tags_section: Option<(usize, usize)> = None;
    let mut nodes_section: Option<(usize, usize)> = None;

    let mut has_version = false;
    let mut has_visible = false;
    let mut has_changeset = false;
    let mut has_timestamp = false;
    let mut has_uid = false;
    let mut has_user = false;
    let mut has_tags = false;
    let mut has_nodes = false;

    while !cur.at_end() {
        cur.skip_space()?;
        let letter = cur.peek();
        if letter == 0 {
            break;
        }
        let letter_pos = cur.pos();
        cur.bump();
        match letter {
            b'v' => {
                if has_version {
                    return Err(duplicate("version", 'v', letter_pos));
                }
                has_version = true;
                way.version = cur.int()?;
            }
            b'd' => {
                if has_visible {
                    return Err(duplicate("visible", 'd', letter_pos));
                }
                has_visible = true;
                way.visible = cur.visible()?;
            }
            b'c' => {
                if has_changeset {
                    return Err(duplicate("changeset_id", 'c', letter_pos));
                }
                has_changeset = true;
                way.changeset = cur.int()?;
            }
            b't' => {
                if has_timestamp {
                    return Err(duplicate("timestamp", 't', letter_pos));
                }
                has_timestamp = true;
                way.timestamp = cur.timestamp()?;
            }
            b'i' => {
                if has_uid {
                    return Err(duplicate("uid", 'i', letter_pos));
                }
                has_uid = true;
                way.uid = cur.int()?;
            }
            b'u' => {
                if has_user {
                    return Err(duplicate("user", 'u', letter_pos));
                }
                has_user = true;
                cur.string_into(&mut way.user)?;
            }
            b'T' => {
                if has_tags {
                    return Err(duplicate("tags", 'T', letter_pos));
                }
                has_tags = true;
                if cur.non_empty() {
                    let start = cur.pos();
                    let end = cur.skip_section();
                    tags_section = Some((start, end));
                }
            }
            b'N' => {
                if has_nodes {
                    return Err(duplicate("nodes", 'N', letter_pos));
                }
                has_nodes = true;
                let start = cur.pos();
                let end = cur.skip_section();
                nodes_section = Some((start, end));
            }
            _ => {
                return Err(ScanError {
                    kind: ErrorKind::UnknownAttribute,
                    offset: letter_pos,
                })
            }
        }
    }

    if let Some((start, end)) = tags_section {
        way.tags = parse_tags(cur.section(start, end))?;
    }
    if let Some((start, end)) = nodes_section {
        way.nodes = parse_way_nodes(cur.section(start, end))?;
    }
    Ok(way)
}

fn parse_relation(cur: &mut Cursor<'_>) -> Result<Relation, ScanError> {
    let mut relation = Relation {
        id: cur.int()?,
        ..Relation::default()
    };

    let mut tags_section: Option<(usize, usize)> = None;
    let mut members_section: Option<(usize, usize)> = None;

    let mut has_version = false;
    let mut has_visible = false;
    let mut has_changeset = false;
    let mut has_timestamp = false;
    let mut has_uid = false;
    let mut has_user = false;
    let mut has_tags = false;
    let mut has_members = false;

    while !cur.at_end() {
        cur.skip_space()?;
        let letter = cur.peek();
        if letter == 0 {
            break;
        }
        let letter_pos = cur.pos();
        cur.bump();
        match letter {
            b'v' => {
                if has_version {
                    return Err(duplicate("version", 'v', letter_pos));
                }
                has_version = true;
                relation.version = cur.int()?;
            }
            b'd' => {
                if has_visible {
                    return Err(duplicate("visible", 'd', letter_pos));
                }
                has_visible = true;
                relation.visible = cur.visible()?;
            }
            b'c' => {
                if has_changeset {
                    return Err(duplicate("changeset_id", 'c', letter_pos));
                }
                has_changeset = true;
                relation.changeset = cur.int()?;
            }
            b't' => {
                if has_timestamp {
                    return Err(duplicate("timestamp", 't', letter_pos));
                }
                has_timestamp = true;
                relation.timestamp = cur.timestamp()?;
            }
            b'i' => {
                if has_uid {
                    return Err(duplicate("uid", 'i', letter_pos));
                }
                has_uid = true;
                relation.uid = cur.int()?;
            }
            b'u' => {
                if has_user {
                    return Err(duplicate("user", 'u', letter_pos));
                }
                has_user = true;
                cur.string_into(&mut relation.user)?;
            }
            b'T' => {
                if has_tags {
                    return Err(duplicate("tags", 'T', letter_pos));
                }
                has_tags = true;
                if cur.non_empty() {
                    let start = cur.pos();
                    let end = cur.skip_section();
                    tags_section = Some((start, end));
                }
            }
            b'M' => {
                if has_members {
                    return Err(duplicate("members", 'M', letter_pos));
                }
                has_members = true;
                let start = cur.pos();
                let end = cur.skip_section();
                members_section = Some((start, end));
            }
            _ => {
                return Err(ScanError {
                    kind: ErrorKind::UnknownAttribute,
                    offset: letter_pos,
                })
            }
        }
    }

    if let Some((start, end)) = tags_section {
        relation.tags = parse_tags(cur.section(start, end))?;
    }
    if let Some((start, end)) = members_section {
        relation.members = parse_members(cur.section(start, end))?;
    }
    Ok(relation)
}

fn parse_changeset(cur: &mut Cursor<'_>) -> Result<Changeset, ScanError> {
    let mut changeset = Changeset {
        id: cur.int()?,
        ..Changeset::default()
    };

    let mut tags_section: Option<(usize, usize)> = None;
    let mut bounds = Bounds::default();

    let mut has_num_changes = false;
    let mut has_created_at = false;
    let mut has_closed_at = false;
    let mut has_num_comments = false;
    let mut has_uid = false;
    let mut has_user = false;
    let mut has_tags = false;
    let mut has_min_x = false;
    let mut has_min_y = false;
    let mut has_max_x = false;
    let mut has_max_y = false;

    while !cur.at_end() {
        cur.skip_space()?;
        let letter = cur.peek();
        if letter == 0 {
            break;
        }
        let letter_pos = cur.pos();
        cur.bump();
        match letter {
            b'k' => {
                if has_num_changes {
                    return Err(duplicate("num_changes", 'k', letter_pos));
                }
                has_num_changes = true;
                changeset.num_changes = cur.int()?;
            }
            b's' => {
                if has_created_at {
                    return Err(duplicate("created_at", 's', letter_pos));
                }
                has_created_at = true;
                changeset.created_at = cur.timestamp()?;
            }
            b'e' => {
                if has_closed_at {
                    return Err(duplicate("closed_at", 'e', letter_pos));
                }
                has_closed_at = true;
                changeset.closed_at = cur.timestamp()?;
            }
            b'd' => {
                if has_num_comments {
                    return Err(duplicate("num_comments", 'd', letter_pos));
                }
                has_num_comments = true;
                changeset.num_comments = cur.int()?;
            }
            b'i' => {
                if has_uid {
                    return Err(duplicate("uid", 'i', letter_pos));
                }
                has_uid = true;
                changeset.uid = cur.int()?;
            }
            b'u' => {
                if has_user {
                    return Err(duplicate("user", 'u', letter_pos));
                }
                has_user = true;
                cur.string_into(&mut changeset.user)?;
            }
            b'x' => {
                if has_min_x {
                    return Err(duplicate("min_x", 'x', letter_pos));
                }
                has_min_x = true;
                if cur.non_empty() {
                    bounds.bottom_left.set_x(cur.coordinate_partial()?);
                }
            }
            b'y' => {
                if has_min_y {
                    return Err(duplicate("min_y", 'y', letter_pos));
                }
                has_min_y = true;
                if cur.non_empty() {
                    bounds.bottom_left.set_y(cur.coordinate_partial()?);
                }
            }
            b'X' => {
                if has_max_x {
                    return Err(duplicate("max_x", 'X', letter_pos));
                }
                has_max_x = true;
                if cur.non_empty() {
                    bounds.top_right.set_x(cur.coordinate_partial()?);
                }
            }
            b'Y' => {
                if has_max_y {
                    return Err(duplicate("max_y", 'Y', letter_pos));
                }
                has_max_y = true;
                if cur.non_empty() {
                    bounds.top_right.set_y(cur.coordinate_partial()?);
                }
            }
            b'T' => {
                if has_tags {
                    return Err(duplicate("tags", 'T', letter_pos));
                }
                has_tags = true;
                if cur.non_empty() {
                    let start = cur.pos();
                    let end = cur.skip_section();
                    tags_section = Some((start, end));
                }
            }
            _ => {
                return Err(ScanError {
                    kind: ErrorKind::UnknownAttribute,
                    offset: letter_pos,
                })
            }
        }
    }

    changeset.bounds = bounds;
    if let Some((start, end)) = tags_section {
        changeset.tags = parse_tags(cur.section(start, end))?;
    }
    Ok(changeset)
}

// ── Line dispatcher ─────────────────────────────────────────────────────

/// Parse one OPL line and commit the resulting entity to `sink`.
///
/// Returns `Ok(true)` when an entity was committed, `Ok(false)` for
/// empty/comment lines and for well-formed kinds masked out by `kinds`
/// (nothing is committed in either case). `line_number` is only used to
/// annotate errors; the caller numbers physical lines (1-based by
/// convention).
///
/// On error, the column is the 0-based byte offset of the offending byte
/// within `line`, and no entity has been committed.
pub fn parse_line<S: EntitySink>(
    line_number: u64,
    line: &str,
    kinds: EntityKinds,
    sink: &mut S,
) -> Result<bool, OplError> {
    let mut cur = Cursor::new(line);
    let annotate = |err: ScanError| OplError::at(err.kind, line_number, err.offset as u64);

    match cur.peek() {
        // Empty lines and comments are ignored.
        0 | b'#' => Ok(false),
        b'n' => {
            if !kinds.contains(EntityKinds::NODE) {
                return Ok(false);
            }
            cur.bump();
            let node = parse_node(&mut cur).map_err(annotate)?;
            sink.commit(Entity::Node(node));
            Ok(true)
        }
        b'w' => {
            if !kinds.contains(EntityKinds::WAY) {
                return Ok(false);
            }
            cur.bump();
            let way = parse_way(&mut cur).map_err(annotate)?;
            sink.commit(Entity::Way(way));
            Ok(true)
        }
        b'r' => {
            if !kinds.contains(EntityKinds::RELATION) {
                return Ok(false);
            }
            cur.bump();
            let relation = parse_relation(&mut cur).map_err(annotate)?;
            sink.commit(Entity::Relation(relation));
            Ok(true)
        }
        b'c' => {
            if !kinds.contains(EntityKinds::CHANGESET) {
                return Ok(false);
            }
            cur.bump();
            let changeset = parse_changeset(&mut cur).map_err(annotate)?;
            sink.commit(Entity::Changeset(changeset));
            Ok(true)
        }
        _ => Err(OplError::at(ErrorKind::UnknownType, line_number, 0)),
    }
}
