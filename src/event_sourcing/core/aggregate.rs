use super::event::{DomainEvent, EventEnvelope};

// ============================================================================
// Aggregate Root Pattern - Event Sourcing Core
// ============================================================================
//
// Key Principles:
// 1. State is derived from events (not stored directly)
// 2. Events represent facts that have already happened
// 3. All state changes flow through events
// 4. Rehydration replays history in store-assigned order
//
// This is the GENERIC aggregate trait that works for ANY domain aggregate.
//
// ============================================================================

/// Generic Aggregate trait - all event-sourced aggregates implement this.
///
/// An aggregate is created per request and never shared: constructed empty,
/// rehydrated by replay on the read path, or mutated by commands producing
/// uncommitted changes on the write path.
pub trait Aggregate: Default + Send + Sync {
    type Event: DomainEvent;

    /// Name of the aggregate type, used to derive its stream names.
    const AGGREGATE_TYPE: &'static str;

    /// Apply one historical envelope to mutate internal state.
    ///
    /// Implementations must also track the envelope's version as the
    /// aggregate's loaded version.
    fn apply(&mut self, envelope: &EventEnvelope<Self::Event>);

    /// Stream-local version of the last applied event, or -1 when no event
    /// has been persisted yet.
    fn version(&self) -> i64;

    /// Changes produced by commands but not yet durably appended.
    fn uncommitted_changes(&self) -> &[Self::Event];

    /// Drop the uncommitted buffer. Called by the append writer only after
    /// the store confirms the append, never speculatively.
    fn clear_uncommitted_changes(&mut self);

    /// Rehydrate a fresh aggregate from an ordered envelope sequence.
    fn rehydrate(envelopes: &[EventEnvelope<Self::Event>]) -> Self {
        Self::rehydrate_with(envelopes, |_| {})
    }

    /// Rehydrate with a per-event observer hook (diagnostics/tracing; not
    /// required for correctness).
    fn rehydrate_with<F>(envelopes: &[EventEnvelope<Self::Event>], mut observe: F) -> Self
    where
        F: FnMut(&EventEnvelope<Self::Event>),
    {
        let mut aggregate = Self::default();
        for envelope in envelopes {
            aggregate.apply(envelope);
            observe(envelope);
        }
        aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sourcing::core::event::EventMetadata;

    #[derive(Clone, Debug)]
    struct Counted {
        counter_id: String,
        amount: i64,
    }

    impl DomainEvent for Counted {
        fn event_type(&self) -> &'static str {
            "Counted"
        }

        fn aggregate_id(&self) -> &str {
            &self.counter_id
        }

        fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
            Ok(format!("{{\"amount\":{}}}", self.amount).into_bytes())
        }
    }

    #[derive(Default)]
    struct Counter {
        total: i64,
        version: i64,
        uncommitted: Vec<Counted>,
    }

    impl Aggregate for Counter {
        type Event = Counted;

        const AGGREGATE_TYPE: &'static str = "Counter";

        fn apply(&mut self, envelope: &EventEnvelope<Counted>) {
            self.total += envelope.payload.amount;
            self.version = envelope.version;
        }

        fn version(&self) -> i64 {
            self.version
        }

        fn uncommitted_changes(&self) -> &[Counted] {
            &self.uncommitted
        }

        fn clear_uncommitted_changes(&mut self) {
            self.uncommitted.clear();
        }
    }

    fn envelope(amount: i64, version: i64) -> EventEnvelope<Counted> {
        EventEnvelope::new(
            Counted {
                counter_id: "c1".to_string(),
                amount,
            },
            EventMetadata::default(),
            version,
            version,
        )
    }

    #[test]
    fn replay_applies_events_in_sequence_order() {
        let history = [envelope(1, 0), envelope(2, 1), envelope(4, 2)];

        let counter = Counter::rehydrate(&history);

        assert_eq!(counter.total, 7);
        assert_eq!(counter.version(), 2);
    }

    #[test]
    fn incremental_replay_matches_full_replay() {
        let history = [envelope(1, 0), envelope(2, 1), envelope(4, 2)];

        let full = Counter::rehydrate(&history);

        let mut incremental = Counter::rehydrate(&history[..2]);
        incremental.apply(&history[2]);

        assert_eq!(incremental.total, full.total);
        assert_eq!(incremental.version(), full.version());
    }

    #[test]
    fn observer_sees_every_applied_envelope() {
        let history = [envelope(1, 0), envelope(2, 1)];

        let mut seen = Vec::new();
        let _ = Counter::rehydrate_with(&history, |envelope| seen.push(envelope.version));

        assert_eq!(seen, vec![0, 1]);
    }
}
