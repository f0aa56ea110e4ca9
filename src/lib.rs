//! Read/write core of an event-sourcing repository.
//!
//! Reconstructs aggregate state by replaying an ordered event log, and
//! persists new state changes as immutable, versioned events appended to that
//! log under an optimistic-concurrency expected-version check. The log
//! storage engine itself is an external collaborator behind the
//! [`event_sourcing::EventStoreClient`] trait.

pub mod domain;
pub mod event_sourcing;

pub use event_sourcing::{
    Aggregate, DomainEvent, EventEnvelope, EventMetadata, EventPayload, EventRepository,
    EventStoreClient, EventTypeRegistry, ExpectedVersion, InMemoryEventStore, RepositoryConfig,
    RepositoryError,
};
