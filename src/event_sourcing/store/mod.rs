// ============================================================================
// Event Store Access - Client Interface, Pagination, In-Memory Double
// ============================================================================

pub mod client;
pub mod memory;
pub mod paginator;

pub use client::{
    aggregate_stream, category_stream, event_type_stream, EventStoreClient, ExpectedVersion,
    ProposedEvent, RawLogEntry, RecordedEvent, StoreError, StreamPage,
};
pub use memory::InMemoryEventStore;
pub use paginator::{drain_stream, UnprocessedEvent, DEFAULT_PAGE_SIZE};
