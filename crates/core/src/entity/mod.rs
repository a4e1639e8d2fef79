//! The OPL entity model.
//!
//! One parsed line becomes one [`Entity`]: a node, way, relation, or
//! changeset. These are plain data records — the parser fills them in and
//! moves them into an entity sink; nothing here retains references into
//! the source line.

/// Fixed-point coordinates and bounding boxes.
pub mod location;
/// The 20-byte ISO-8601 `Z` timestamp type.
pub mod timestamp;

pub use location::{Bounds, Location, COORDINATE_PRECISION, UNDEFINED_COORDINATE};
pub use timestamp::Timestamp;

use serde::{Deserialize, Serialize};

/// Identifier of a node, way, or relation.
pub type ObjectId = i64;
/// Identifier of a changeset.
pub type ChangesetId = u32;
/// Identifier of a user account.
pub type UserId = u32;

bitflags::bitflags! {
    /// Bitset of entity kinds a caller wants the dispatcher to accept.
    ///
    /// Lines whose kind is masked out are skipped without error and
    /// without committing anything.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntityKinds: u8 {
        /// `n` lines.
        const NODE = 1 << 0;
        /// `w` lines.
        const WAY = 1 << 1;
        /// `r` lines.
        const RELATION = 1 << 2;
        /// `c` lines.
        const CHANGESET = 1 << 3;
    }
}

impl EntityKinds {
    /// Map an OPL type letter to its kind bit.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'n' => Some(Self::NODE),
            'w' => Some(Self::WAY),
            'r' => Some(Self::RELATION),
            'c' => Some(Self::CHANGESET),
            _ => None,
        }
    }
}

/// A (key, value) string pair attached to an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// A reference from a way to one of its nodes, optionally annotated with
/// that node's location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRef {
    /// Id of the referenced node.
    pub id: ObjectId,
    /// Inline location, when the way carries one for this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// The kind of entity a relation member points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    /// The member is a node.
    Node,
    /// The member is a way.
    Way,
    /// The member is a relation.
    Relation,
}

impl MemberType {
    /// Map an OPL member kind byte (`n`/`w`/`r`) to its type.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'n' => Some(Self::Node),
            b'w' => Some(Self::Way),
            b'r' => Some(Self::Relation),
            _ => None,
        }
    }
}

/// One member of a relation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    /// What the member is.
    #[serde(rename = "type")]
    pub kind: MemberType,
    /// Id of the referenced entity.
    pub id: ObjectId,
    /// Role string (possibly empty).
    pub role: String,
}

/// A node: a point with optional coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Object id.
    pub id: ObjectId,
    /// Object version; 0 when absent from the line.
    pub version: u32,
    /// Visibility flag; deleted objects in history files carry `D`.
    pub visible: bool,
    /// Changeset that last touched this object.
    pub changeset: ChangesetId,
    /// Last-edit instant.
    pub timestamp: Timestamp,
    /// Editing user id.
    pub uid: UserId,
    /// Editing user name (possibly empty).
    pub user: String,
    /// Attached tags.
    pub tags: Vec<Tag>,
    /// Coordinates; present only when the parsed location is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// A way: an ordered list of node references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Way {
    /// Object id.
    pub id: ObjectId,
    /// Object version; 0 when absent from the line.
    pub version: u32,
    /// Visibility flag.
    pub visible: bool,
    /// Changeset that last touched this object.
    pub changeset: ChangesetId,
    /// Last-edit instant.
    pub timestamp: Timestamp,
    /// Editing user id.
    pub uid: UserId,
    /// Editing user name (possibly empty).
    pub user: String,
    /// Attached tags.
    pub tags: Vec<Tag>,
    /// Ordered node references.
    pub nodes: Vec<NodeRef>,
}

/// A relation: an ordered list of typed, role-carrying members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    /// Object id.
    pub id: ObjectId,
    /// Object version; 0 when absent from the line.
    pub version: u32,
    /// Visibility flag.
    pub visible: bool,
    /// Changeset that last touched this object.
    pub changeset: ChangesetId,
    /// Last-edit instant.
    pub timestamp: Timestamp,
    /// Editing user id.
    pub uid: UserId,
    /// Editing user name (possibly empty).
    pub user: String,
    /// Attached tags.
    pub tags: Vec<Tag>,
    /// Ordered members.
    pub members: Vec<Member>,
}

/// A changeset: an edit session with its own id space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Changeset {
    /// Changeset id.
    pub id: ChangesetId,
    /// Number of changes in the set.
    pub num_changes: u32,
    /// Number of discussion comments.
    pub num_comments: u32,
    /// When the changeset was opened.
    pub created_at: Timestamp,
    /// When the changeset was closed; unset while open.
    pub closed_at: Timestamp,
    /// Editing user id.
    pub uid: UserId,
    /// Editing user name (possibly empty).
    pub user: String,
    /// Attached tags.
    pub tags: Vec<Tag>,
    /// Bounding box; unset corners keep their undefined sentinels.
    pub bounds: Bounds,
}

// Visibility defaults to true: an OPL line without a `d` attribute
// describes a live object.

impl Default for Node {
    fn default() -> Self {
        Self {
            id: 0,
            version: 0,
            visible: true,
            changeset: 0,
            timestamp: Timestamp::default(),
            uid: 0,
            user: String::new(),
            tags: Vec::new(),
            location: None,
        }
    }
}

impl Default for Way {
    fn default() -> Self {
        Self {
            id: 0,
            version: 0,
            visible: true,
            changeset: 0,
            timestamp: Timestamp::default(),
            uid: 0,
            user: String::new(),
            tags: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

impl Default for Relation {
    fn default() -> Self {
        Self {
            id: 0,
            version: 0,
            visible: true,
            changeset: 0,
            timestamp: Timestamp::default(),
            uid: 0,
            user: String::new(),
            tags: Vec::new(),
            members: Vec::new(),
        }
    }
}

impl Default for Changeset {
    fn default() -> Self {
        Self {
            id: 0,
            num_changes: 0,
            num_comments: 0,
            created_at: Timestamp::default(),
            closed_at: Timestamp::default(),
            uid: 0,
            user: String::new(),
            tags: Vec::new(),
            bounds: Bounds::default(),
        }
    }
}

/// One parsed OPL line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[non_exhaustive]
pub enum Entity {
    /// A node line (`n`).
    Node(Node),
    /// A way line (`w`).
    Way(Way),
    /// A relation line (`r`).
    Relation(Relation),
    /// A changeset line (`c`).
    Changeset(Changeset),
}

impl Entity {
    /// The kind bit of this entity, for mask arithmetic.
    pub fn kind(&self) -> EntityKinds {
        match self {
            Entity::Node(_) => EntityKinds::NODE,
            Entity::Way(_) => EntityKinds::WAY,
            Entity::Relation(_) => EntityKinds::RELATION,
            Entity::Changeset(_) => EntityKinds::CHANGESET,
        }
    }

    /// The entity's tags.
    pub fn tags(&self) -> &[Tag] {
        match self {
            Entity::Node(n) => &n.tags,
            Entity::Way(w) => &w.tags,
            Entity::Relation(r) => &r.tags,
            Entity::Changeset(c) => &c.tags,
        }
    }
}
