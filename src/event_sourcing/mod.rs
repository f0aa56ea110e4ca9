// ============================================================================
// Event Sourcing - Read/Write Core
// ============================================================================
//
// Control flow:
//   reads:  paginator -> envelope builder -> (filter/sequence) -> rehydrator
//   writes: aggregate -> append writer -> store
//
// ============================================================================

pub mod core;
pub mod error;
pub mod repository;
pub mod store;

pub use self::core::{
    Aggregate, DomainEvent, EventEnvelope, EventMetadata, EventPayload, EventTypeRegistry,
};
pub use error::RepositoryError;
pub use repository::{EventRepository, RepositoryConfig};
pub use store::{EventStoreClient, ExpectedVersion, InMemoryEventStore};
