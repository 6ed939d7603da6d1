use uuid::Uuid;

/// Opaque identity of a stored entity.
pub type EntityId = String;

/// Fresh id for a newly inserted entity: a v4 UUID without hyphens.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_hyphen_free() {
        let a = new_entity_id();
        let b = new_entity_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(!a.contains('-'));
    }
}
