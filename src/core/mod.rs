pub mod error;
pub mod types;

pub use error::{MutationError, Result, ServiceError, StoreError, ValidationIssue};
pub use types::{EntityId, new_entity_id};
