//! The entity sink seam.
//!
//! The parser builds one entity per line and hands it over through
//! [`EntitySink::commit`] — exactly once per successfully parsed line,
//! never on failure. Consumers decide what durable means: collect into a
//! `Vec`, count, index, forward.

use crate::entity::Entity;

/// An append-only consumer of parsed entities.
pub trait EntitySink {
    /// Make one finished entity durable.
    fn commit(&mut self, entity: Entity);
}

impl EntitySink for Vec<Entity> {
    fn commit(&mut self, entity: Entity) {
        self.push(entity);
    }
}
