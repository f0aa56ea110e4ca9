use async_trait::async_trait;
use uuid::Uuid;

// ============================================================================
// Event Store Client - Narrow Interface to the Log Storage Engine
// ============================================================================
//
// The storage engine itself (connections, retries, slicing protocol) is an
// external collaborator. The core consumes it through this trait and holds
// no connection state of its own. Transport failures propagate unchanged;
// retry policy belongs to the client implementation, not this layer.
//
// ============================================================================

/// One immutable entry as recorded by the store.
#[derive(Clone, Debug)]
pub struct RecordedEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub data: Vec<u8>,
    pub metadata: Vec<u8>,
    /// Position within the stream the entry was read from.
    pub position: i64,
    /// Stream-local version of the underlying event itself.
    pub version: i64,
}

/// A raw entry from a stream slice.
///
/// Category/type projections are store-level indirections: their entries are
/// links over a logical event. `link_position` is then the position of the
/// link within the projection stream, while the recorded event keeps its own
/// version and coordinates.
#[derive(Clone, Debug)]
pub struct RawLogEntry {
    pub event: RecordedEvent,
    pub link_position: Option<i64>,
}

/// One bounded slice of a stream read.
#[derive(Clone, Debug)]
pub struct StreamPage {
    pub entries: Vec<RawLogEntry>,
    /// Store-provided continuation cursor for the next slice.
    pub next_position: i64,
    pub is_end_of_stream: bool,
}

/// An event proposed for append, already serialized.
#[derive(Clone, Debug)]
pub struct ProposedEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub data: Vec<u8>,
    pub metadata: Vec<u8>,
}

/// Optimistic-concurrency constraint for an append.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExpectedVersion {
    /// No constraint.
    #[default]
    Any,
    /// The stream must not exist yet.
    NoStream,
    /// The stream's current version must equal this value exactly.
    Exact(i64),
}

impl std::fmt::Display for ExpectedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::NoStream => write!(f, "no-stream"),
            Self::Exact(version) => write!(f, "{version}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("wrong expected version on stream '{stream}': expected {expected}, current {current}")]
    WrongExpectedVersion {
        stream: String,
        expected: ExpectedVersion,
        current: i64,
    },

    #[error("event store transport failure")]
    Transport(#[source] anyhow::Error),
}

/// Narrow client interface over the append-only log storage engine.
#[async_trait]
pub trait EventStoreClient: Send + Sync {
    /// Read one bounded slice of a stream, forward from `start`.
    ///
    /// A missing stream reads as empty and at end-of-stream.
    async fn read_forward(
        &self,
        stream: &str,
        start: i64,
        page_size: usize,
    ) -> Result<StreamPage, StoreError>;

    /// Atomically append an ordered batch under an expected-version check.
    /// Returns the stream's new current version.
    async fn append(
        &self,
        stream: &str,
        expected: ExpectedVersion,
        batch: Vec<ProposedEvent>,
    ) -> Result<i64, StoreError>;
}

// ============================================================================
// Stream Naming Convention
// ============================================================================
//
// Must be reproduced exactly for compatibility with store-side projections.
//
// ============================================================================

/// Category projection stream: all events of every instance of one aggregate
/// type, in append order.
pub fn category_stream(aggregate_type: &str) -> String {
    format!("$ce-{aggregate_type}")
}

/// Event-type projection stream: one event variant across all aggregates.
pub fn event_type_stream(event_type: &str) -> String {
    format!("$et-{event_type}")
}

/// Per-aggregate stream.
pub fn aggregate_stream(aggregate_type: &str, aggregate_id: &str) -> String {
    format!("{aggregate_type}-{aggregate_id}")
}
