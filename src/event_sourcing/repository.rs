use std::sync::Arc;

use super::core::{Aggregate, DomainEvent, EventEnvelope, EventMetadata, EventPayload, EventTypeRegistry};
use super::error::RepositoryError;
use super::store::client::{
    aggregate_stream, category_stream, event_type_stream, EventStoreClient, ExpectedVersion,
    ProposedEvent,
};
use super::store::paginator::{drain_stream, UnprocessedEvent, DEFAULT_PAGE_SIZE};

// ============================================================================
// Event Repository - Read/Write Core
// ============================================================================
//
// Read path:  paginator -> envelope builder -> (filter/sequence) -> rehydrator
// Write path: aggregate -> append writer -> store
//
// The repository holds no connection state and performs no locking; all
// cross-request consistency is delegated to the store's optimistic-version
// check at append time. There is no in-process caching: every read replays
// full history, trading latency for zero staleness risk.
//
// ============================================================================

#[derive(Clone, Debug)]
pub struct RepositoryConfig {
    /// Recorded in fresh metadata as the writing application.
    pub source_application: String,
    /// Slice size for stream pagination.
    pub page_size: usize,
}

impl RepositoryConfig {
    pub fn new(source_application: &str) -> Self {
        Self {
            source_application: source_application.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::new("eventstream-repository")
    }
}

/// Repository surface consumed by application code.
///
/// Type Parameter:
/// - `E`: the domain event union the registry was built for
pub struct EventRepository<E> {
    client: Arc<dyn EventStoreClient>,
    registry: Arc<EventTypeRegistry<E>>,
    config: RepositoryConfig,
}

impl<E: DomainEvent + 'static> EventRepository<E> {
    pub fn new(
        client: Arc<dyn EventStoreClient>,
        registry: Arc<EventTypeRegistry<E>>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            client,
            registry,
            config,
        }
    }

    // ------------------------------------------------------------------
    // Envelope builder
    // ------------------------------------------------------------------

    /// Realize each unprocessed event into exactly one typed envelope,
    /// preserving paginator order. An unknown type name is a configuration
    /// error, not a transient fault.
    fn build_envelopes(
        &self,
        records: Vec<UnprocessedEvent>,
    ) -> Result<Vec<EventEnvelope<E>>, RepositoryError> {
        records
            .into_iter()
            .map(|record| {
                let factory = self
                    .registry
                    .resolve(&record.event_type)
                    .ok_or_else(|| RepositoryError::UnregisteredEventType(record.event_type.clone()))?;
                let metadata = EventMetadata::from_json(&record.metadata)
                    .map_err(|source| RepositoryError::MalformedEvent {
                        event_type: record.event_type.clone(),
                        source,
                    })?;
                factory(&record.data, metadata, record.position, record.version)
            })
            .collect()
    }

    async fn read_envelopes(
        &self,
        stream: &str,
        start: i64,
    ) -> Result<Vec<EventEnvelope<E>>, RepositoryError> {
        let records =
            drain_stream(self.client.as_ref(), stream, start, self.config.page_size).await?;
        self.build_envelopes(records)
    }

    // ------------------------------------------------------------------
    // Read operations
    // ------------------------------------------------------------------

    /// All envelopes in the category stream for an aggregate type, across
    /// every instance of that type.
    pub async fn get_all_events_for_aggregate_type<A>(
        &self,
        start: i64,
    ) -> Result<Vec<EventEnvelope<E>>, RepositoryError>
    where
        A: Aggregate<Event = E>,
    {
        self.read_envelopes(&category_stream(A::AGGREGATE_TYPE), start)
            .await
    }

    /// All envelopes in the event-type stream for a single event variant,
    /// across all aggregates. Used for cross-aggregate queries, not replay.
    pub async fn get_all_events_of_type<P>(
        &self,
        start: i64,
    ) -> Result<Vec<EventEnvelope<E>>, RepositoryError>
    where
        P: EventPayload,
    {
        self.read_envelopes(&event_type_stream(P::EVENT_TYPE), start)
            .await
    }

    /// Rehydrate one aggregate from its full history.
    ///
    /// Filters the category stream down to the requested identity; this scans
    /// all instances' events of the type, O(total events of the type), which
    /// is a known scalability ceiling of the category-projection approach.
    pub async fn get_aggregate_by_id<A>(&self, id: &str) -> Result<A, RepositoryError>
    where
        A: Aggregate<Event = E>,
    {
        let envelopes = self
            .get_all_events_for_aggregate_type::<A>(0)
            .await?
            .into_iter()
            .filter(|envelope| envelope.payload.aggregate_id() == id)
            .collect::<Vec<_>>();

        if envelopes.is_empty() {
            return Err(RepositoryError::AggregateNotFound {
                aggregate_type: A::AGGREGATE_TYPE,
                id: id.to_string(),
            });
        }

        let aggregate = A::rehydrate_with(&envelopes, |envelope| {
            tracing::debug!(
                aggregate_type = A::AGGREGATE_TYPE,
                aggregate_id = id,
                event_type = envelope.payload.event_type(),
                version = envelope.version,
                "replayed event"
            );
        });

        tracing::debug!(
            aggregate_type = A::AGGREGATE_TYPE,
            aggregate_id = id,
            version = aggregate.version(),
            event_count = envelopes.len(),
            "rehydrated aggregate"
        );

        Ok(aggregate)
    }

    // ------------------------------------------------------------------
    // Append writer
    // ------------------------------------------------------------------

    /// Append the aggregate's uncommitted changes to its own stream as one
    /// atomic batch under the expected-version check.
    ///
    /// Metadata per change is derived from `metadata_template` when supplied
    /// (pinning event identity and correlation context), otherwise freshly
    /// constructed with a generated identifier and the source application
    /// name. The uncommitted buffer is cleared only after the store confirms
    /// the append; on any failure it is left untouched, so a retry after
    /// refetch is safe.
    ///
    /// Returns the stream's new current version.
    pub async fn save<A>(
        &self,
        aggregate: &mut A,
        expected: ExpectedVersion,
        metadata_template: Option<&EventMetadata>,
    ) -> Result<i64, RepositoryError>
    where
        A: Aggregate<Event = E>,
    {
        let changes = aggregate.uncommitted_changes();
        let Some(first) = changes.first() else {
            tracing::debug!(
                aggregate_type = A::AGGREGATE_TYPE,
                "no uncommitted changes, nothing to append"
            );
            return Ok(aggregate.version());
        };

        let stream = aggregate_stream(A::AGGREGATE_TYPE, first.aggregate_id());
        let target_version = match expected {
            ExpectedVersion::Exact(version) => Some(version),
            ExpectedVersion::Any | ExpectedVersion::NoStream => None,
        };

        let mut batch = Vec::with_capacity(changes.len());
        for change in changes {
            let metadata = match metadata_template {
                Some(template) => EventMetadata::derived(template, target_version),
                None => EventMetadata::new(&self.config.source_application),
            };

            batch.push(ProposedEvent {
                event_id: metadata.event_id,
                event_type: change.event_type().to_string(),
                data: change.to_bytes().map_err(RepositoryError::Serialization)?,
                metadata: serde_json::to_vec(&metadata).map_err(RepositoryError::Serialization)?,
            });
        }

        let event_count = batch.len();
        let new_version = self.client.append(&stream, expected, batch).await?;

        aggregate.clear_uncommitted_changes();

        tracing::info!(
            stream = %stream,
            expected_version = %expected,
            new_version,
            event_count,
            "appended events to store"
        );

        Ok(new_version)
    }
}

// ============================================================================
// Tests
// ============================================================================
