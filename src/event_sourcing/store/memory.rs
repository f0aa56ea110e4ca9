use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::{
    category_stream, event_type_stream, EventStoreClient, ExpectedVersion, ProposedEvent,
    RawLogEntry, RecordedEvent, StoreError, StreamPage,
};

// ============================================================================
// In-Memory Event Store
// ============================================================================
//
// A complete EventStoreClient implementation backed by process memory, used
// as the test/demo double for the external storage engine.
//
// Appends to a per-aggregate stream also feed the `$ce-` category and `$et-`
// event-type projections, as link entries over the logical event, matching
// the store-side projection behavior the repository relies on.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryEventStore {
    streams: Mutex<HashMap<String, Vec<RawLogEntry>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_version(entries: &[RawLogEntry]) -> i64 {
        entries.len() as i64 - 1
    }

    fn check_expected(
        stream: &str,
        expected: ExpectedVersion,
        current: i64,
    ) -> Result<(), StoreError> {
        let matches = match expected {
            ExpectedVersion::Any => true,
            ExpectedVersion::NoStream => current == -1,
            ExpectedVersion::Exact(version) => current == version,
        };

        if matches {
            Ok(())
        } else {
            Err(StoreError::WrongExpectedVersion {
                stream: stream.to_string(),
                expected,
                current,
            })
        }
    }

    fn project(
        streams: &mut HashMap<String, Vec<RawLogEntry>>,
        projection: String,
        event: RecordedEvent,
    ) {
        let entries = streams.entry(projection).or_default();
        let link_position = entries.len() as i64;
        entries.push(RawLogEntry {
            event,
            link_position: Some(link_position),
        });
    }
}

#[async_trait]
impl EventStoreClient for InMemoryEventStore {
    async fn read_forward(
        &self,
        stream: &str,
        start: i64,
        page_size: usize,
    ) -> Result<StreamPage, StoreError> {
        let streams = self
            .streams
            .lock()
            .map_err(|_| StoreError::Transport(anyhow::anyhow!("store mutex poisoned")))?;

        let Some(entries) = streams.get(stream) else {
            return Ok(StreamPage {
                entries: Vec::new(),
                next_position: start,
                is_end_of_stream: true,
            });
        };

        let start = start.max(0) as usize;
        let end = (start + page_size).min(entries.len());
        let slice: Vec<RawLogEntry> = entries
            .get(start..end)
            .unwrap_or_default()
            .to_vec();

        Ok(StreamPage {
            entries: slice,
            next_position: end as i64,
            is_end_of_stream: end >= entries.len(),
        })
    }

    async fn append(
        &self,
        stream: &str,
        expected: ExpectedVersion,
        batch: Vec<ProposedEvent>,
    ) -> Result<i64, StoreError> {
        let mut streams = self
            .streams
            .lock()
            .map_err(|_| StoreError::Transport(anyhow::anyhow!("store mutex poisoned")))?;

        let current = Self::current_version(streams.get(stream).map_or(&[][..], Vec::as_slice));
        Self::check_expected(stream, expected, current)?;

        // Expected version verified, the whole batch commits as one unit.
        let mut version = current;
        let mut recorded = Vec::with_capacity(batch.len());

        for proposed in batch {
            version += 1;
            recorded.push(RecordedEvent {
                event_id: proposed.event_id,
                event_type: proposed.event_type,
                data: proposed.data,
                metadata: proposed.metadata,
                position: version,
                version,
            });
        }

        let entries = streams.entry(stream.to_string()).or_default();
        for event in &recorded {
            entries.push(RawLogEntry {
                event: event.clone(),
                link_position: None,
            });
        }

        // Feed the store-side projections. System streams are not themselves
        // projected again.
        if let Some((category, _)) = stream.split_once('-').filter(|_| !stream.starts_with('$')) {
            let category = category.to_string();
            for event in recorded {
                Self::project(&mut streams, category_stream(&category), event.clone());
                Self::project(&mut streams, event_type_stream(&event.event_type), event);
            }
        }

        Ok(version)
    }
}

// ============================================================================
// Tests
// ============================================================================
