use std::collections::HashMap;

use super::event::{EventEnvelope, EventMetadata, EventPayload};
use crate::event_sourcing::error::RepositoryError;

// ============================================================================
// Event Type Registry - Deserialization Dispatch Table
// ============================================================================
//
// Maps a wire-level event type name to a factory that deserializes a payload
// and wraps it with metadata into a typed envelope. Built once at startup,
// read-only afterwards, shared for the process lifetime.
//
// ============================================================================

/// Compiles `(body, metadata, position, version)` into a typed envelope.
pub type EnvelopeFactory<E> =
    Box<dyn Fn(&[u8], EventMetadata, i64, i64) -> Result<EventEnvelope<E>, RepositoryError> + Send + Sync>;

/// Registry of envelope factories, keyed by event type name.
///
/// Type names are namespace-unique by convention, not enforced: on a
/// collision the last registration wins.
pub struct EventTypeRegistry<E> {
    factories: HashMap<&'static str, EnvelopeFactory<E>>,
}

impl<E: 'static> Default for EventTypeRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventTypeRegistry<E> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register one event variant under its declared type name.
    ///
    /// `wrap` lifts the deserialized payload into the aggregate's event union.
    pub fn register<P>(&mut self, wrap: fn(P) -> E)
    where
        P: EventPayload + 'static,
    {
        let factory: EnvelopeFactory<E> = Box::new(move |body, metadata, position, version| {
            let payload =
                serde_json::from_slice::<P>(body).map_err(|source| RepositoryError::MalformedEvent {
                    event_type: P::EVENT_TYPE.to_string(),
                    source,
                })?;
            Ok(EventEnvelope::new(wrap(payload), metadata, position, version))
        });

        if self.factories.insert(P::EVENT_TYPE, factory).is_some() {
            tracing::warn!(
                event_type = P::EVENT_TYPE,
                "event type registered twice, last registration wins"
            );
        }
    }

    /// Look up the factory for a type name. Absent resolution is a hard
    /// configuration error for the caller, never a silent skip.
    pub fn resolve(&self, event_type: &str) -> Option<&EnvelopeFactory<E>> {
        self.factories.get(event_type)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
