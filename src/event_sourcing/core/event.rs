use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Event Envelope & Metadata - Generic Event Sourcing Types
// ============================================================================
//
// Wraps domain events with metadata for proper event sourcing.
// This is GENERIC and works with ANY event type.
//
// ============================================================================

/// Metadata attached to every stored event.
///
/// Two construction paths:
/// - `new`: fresh metadata for a brand-new write (generated event id).
/// - `derived`: copy of a caller-supplied template plus a target version,
///   propagating causal/correlation context across a command boundary.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EventMetadata {
    pub event_id: Uuid,
    pub source_application: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<Uuid>,
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            source_application: String::new(),
            expected_version: None,
            timestamp: Utc::now(),
            correlation_id: None,
            causation_id: None,
        }
    }
}

impl EventMetadata {
    /// Fresh metadata for a new write, with a generated event identity.
    pub fn new(source_application: &str) -> Self {
        Self {
            source_application: source_application.to_string(),
            ..Self::default()
        }
    }

    /// Metadata derived from a caller-supplied template plus a target version.
    ///
    /// The template's identity and correlation fields are preserved, so a
    /// caller that pins metadata gets stable event identities across
    /// re-attempts.
    pub fn derived(template: &Self, expected_version: Option<i64>) -> Self {
        Self {
            expected_version,
            ..template.clone()
        }
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_causation(mut self, causation_id: Uuid) -> Self {
        self.causation_id = Some(causation_id);
        self
    }

    /// Normalize a raw metadata blob into `EventMetadata`.
    ///
    /// The blob deserializes to a generic JSON object first; missing fields
    /// fall back to defaults rather than failing the read.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        serde_json::from_value(value)
    }
}

/// Generic Event Envelope - a typed payload plus its stream coordinates.
///
/// Type Parameter:
/// - `E`: the domain event type (must implement the `DomainEvent` trait)
///
/// Immutable once built; owned by the calling read operation.
#[derive(Clone, Debug)]
pub struct EventEnvelope<E> {
    pub payload: E,
    pub metadata: EventMetadata,
    pub position: i64,
    pub version: i64,
}

impl<E> EventEnvelope<E> {
    pub fn new(payload: E, metadata: EventMetadata, position: i64, version: i64) -> Self {
        Self {
            payload,
            metadata,
            position,
            version,
        }
    }
}

// ============================================================================
// Domain Event Traits
// ============================================================================

/// The closed union of all event variants for one aggregate type.
///
/// Every variant carries the identifier of the aggregate it belongs to, which
/// is what category-stream filtering keys on.
pub trait DomainEvent: Clone + Send + Sync {
    /// Wire-level type name of this variant (e.g. `"OrderCreated"`).
    fn event_type(&self) -> &'static str;

    /// Identifier of the aggregate instance this event belongs to.
    fn aggregate_id(&self) -> &str;

    /// Serialize the variant's body (not the enum wrapper) for storage.
    fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error>;
}

/// One concrete event variant, registered under a globally unique type name.
pub trait EventPayload: Serialize + DeserializeOwned + Clone + Send + Sync {
    const EVENT_TYPE: &'static str;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_metadata_generates_identity() {
        let a = EventMetadata::new("checkout-service");
        let b = EventMetadata::new("checkout-service");

        assert_eq!(a.source_application, "checkout-service");
        assert_ne!(a.event_id, b.event_id);
        assert!(a.expected_version.is_none());
    }

    #[test]
    fn derived_metadata_preserves_identity_and_correlation() {
        let correlation = Uuid::new_v4();
        let template = EventMetadata::new("checkout-service").with_correlation(correlation);

        let derived = EventMetadata::derived(&template, Some(7));

        assert_eq!(derived.event_id, template.event_id);
        assert_eq!(derived.correlation_id, Some(correlation));
        assert_eq!(derived.expected_version, Some(7));
    }

    #[test]
    fn metadata_normalizes_from_partial_json() {
        let raw = br#"{"source_application":"legacy-writer"}"#;

        let metadata = EventMetadata::from_json(raw).unwrap();

        assert_eq!(metadata.source_application, "legacy-writer");
        assert!(metadata.correlation_id.is_none());
    }

    #[test]
    fn metadata_round_trips_through_json() {
        let original = EventMetadata::new("checkout-service")
            .with_correlation(Uuid::new_v4())
            .with_causation(Uuid::new_v4());

        let bytes = serde_json::to_vec(&original).unwrap();
        let restored = EventMetadata::from_json(&bytes).unwrap();

        assert_eq!(restored, original);
    }
}
