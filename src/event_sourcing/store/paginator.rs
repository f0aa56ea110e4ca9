use uuid::Uuid;

use super::client::{EventStoreClient, RawLogEntry, StoreError};

// ============================================================================
// Stream Paginator
// ============================================================================
//
// Fully drains a named stream forward from a start position into an ordered
// list of UnprocessedEvent, hiding the store's page-size limits. Pagination
// is strictly sequential: each slice request depends on the previous slice's
// store-provided continuation cursor, which is what guarantees no entry is
// skipped or duplicated across slice boundaries.
//
// ============================================================================

/// Policy default for slice size.
pub const DEFAULT_PAGE_SIZE: usize = 200;

/// Intermediate record for one stream entry, before deserialization dispatch.
///
/// Created per page and discarded after envelope construction.
#[derive(Clone, Debug)]
pub struct UnprocessedEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub data: Vec<u8>,
    pub metadata: Vec<u8>,
    pub position: i64,
    pub version: i64,
}

impl From<RawLogEntry> for UnprocessedEvent {
    /// Normalize a raw entry. A link entry resolves to the position of the
    /// link itself, while version is always the underlying event's own
    /// version.
    fn from(entry: RawLogEntry) -> Self {
        let position = entry.link_position.unwrap_or(entry.event.position);
        Self {
            event_id: entry.event.event_id,
            event_type: entry.event.event_type,
            data: entry.event.data,
            metadata: entry.event.metadata,
            position,
            version: entry.event.version,
        }
    }
}

/// Read `stream` forward from `start` until the store reports end-of-stream.
///
/// Result ordering equals store-assigned append order. Transport errors from
/// the client propagate unchanged; retry policy belongs to the client.
pub async fn drain_stream(
    client: &dyn EventStoreClient,
    stream: &str,
    start: i64,
    page_size: usize,
) -> Result<Vec<UnprocessedEvent>, StoreError> {
    let mut accumulated = Vec::new();
    let mut cursor = start;

    loop {
        let page = client.read_forward(stream, cursor, page_size).await?;

        tracing::debug!(
            stream,
            cursor,
            entries = page.entries.len(),
            end_of_stream = page.is_end_of_stream,
            "read stream slice"
        );

        accumulated.extend(page.entries.into_iter().map(UnprocessedEvent::from));

        if page.is_end_of_stream {
            break;
        }
        cursor = page.next_position;
    }

    Ok(accumulated)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sourcing::store::client::{ExpectedVersion, ProposedEvent, RecordedEvent};
    use crate::event_sourcing::store::memory::InMemoryEventStore;

    fn proposed(event_type: &str, body: &str) -> ProposedEvent {
        ProposedEvent {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_string(),
            data: body.as_bytes().to_vec(),
            metadata: b"{}".to_vec(),
        }
    }

    #[tokio::test]
    async fn drains_all_pages_in_append_order() {
        let store = InMemoryEventStore::new();
        let batch: Vec<ProposedEvent> = (0..5)
            .map(|i| proposed("Counted", &format!("{{\"n\":{i}}}")))
            .collect();
        store
            .append("Counter-c1", ExpectedVersion::Any, batch)
            .await
            .unwrap();

        // Page size 2 over 5 entries forces three slice requests.
        let events = drain_stream(&store, "Counter-c1", 0, 2).await.unwrap();

        assert_eq!(events.len(), 5);
        let versions: Vec<i64> = events.iter().map(|e| e.version).collect();
        assert_eq!(versions, vec![0, 1, 2, 3, 4]);

        // No duplicates across slice boundaries.
        let mut ids: Vec<Uuid> = events.iter().map(|e| e.event_id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn empty_stream_drains_to_nothing() {
        let store = InMemoryEventStore::new();

        let events = drain_stream(&store, "Counter-none", 0, DEFAULT_PAGE_SIZE)
            .await
            .unwrap();

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn starts_from_requested_position() {
        let store = InMemoryEventStore::new();
        let batch: Vec<ProposedEvent> = (0..4).map(|_| proposed("Counted", "{}")).collect();
        store
            .append("Counter-c1", ExpectedVersion::Any, batch)
            .await
            .unwrap();

        let events = drain_stream(&store, "Counter-c1", 2, 2).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].version, 2);
    }

    #[test]
    fn link_entry_resolves_to_link_position_and_event_version() {
        let entry = RawLogEntry {
            event: RecordedEvent {
                event_id: Uuid::new_v4(),
                event_type: "Counted".to_string(),
                data: b"{}".to_vec(),
                metadata: b"{}".to_vec(),
                position: 9,
                version: 9,
            },
            link_position: Some(42),
        };

        let unprocessed = UnprocessedEvent::from(entry);

        assert_eq!(unprocessed.position, 42);
        assert_eq!(unprocessed.version, 9);
    }
}
