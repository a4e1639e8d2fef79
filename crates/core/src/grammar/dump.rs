use crate::entity::Entity;

/// Serialize parsed entities to a pretty-printed JSON string.
pub fn to_pretty_json(entities: &[Entity]) -> String {
    serde_json::to_string_pretty(entities).expect("entity serialization cannot fail")
}
