use super::store::client::{ExpectedVersion, StoreError};

// ============================================================================
// Repository Error Taxonomy
// ============================================================================
//
// - UnregisteredEventType: deployment/version-skew bug, fatal, not retried
// - AggregateNotFound: maps to a 404-equivalent for callers
// - ConcurrencyConflict: stale expected version; retry-with-refetch or abort
// - Transport: external client failure, propagated unchanged
//
// None are swallowed; all surface to the calling operation.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// An event arrived with no registered deserializer. Silently dropping
    /// it would corrupt aggregate state, so this is a hard error.
    #[error("no deserializer registered for event type '{0}'")]
    UnregisteredEventType(String),

    /// Zero envelopes matched the requested aggregate identity. An aggregate
    /// with no history is indistinguishable from an invalid id.
    #[error("aggregate not found: {aggregate_type}-{id}")]
    AggregateNotFound {
        aggregate_type: &'static str,
        id: String,
    },

    /// The append's expected version no longer matches the store's current
    /// version.
    #[error("concurrency conflict on stream '{stream}': expected version {expected}, current {current}")]
    ConcurrencyConflict {
        stream: String,
        expected: ExpectedVersion,
        current: i64,
    },

    /// A stored body failed to deserialize as its registered payload type.
    #[error("malformed body for event type '{event_type}'")]
    MalformedEvent {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// A pending change or its metadata failed to serialize for append.
    #[error("failed to serialize event for append")]
    Serialization(#[source] serde_json::Error),

    /// Failure from the external store client (network, store unavailable).
    #[error("event store transport failure")]
    Transport(#[source] anyhow::Error),
}

impl From<StoreError> for RepositoryError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::WrongExpectedVersion {
                stream,
                expected,
                current,
            } => Self::ConcurrencyConflict {
                stream,
                expected,
                current,
            },
            StoreError::Transport(source) => Self::Transport(source),
        }
    }
}
