use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use eventstream_repository::domain::order::{order_event_registry, Order, OrderItem};
use eventstream_repository::{
    Aggregate, EventMetadata, EventRepository, ExpectedVersion, InMemoryEventStore,
    RepositoryConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,eventstream_repository=debug")),
        )
        .init();

    tracing::info!("🚀 Starting event-stream repository demo");

    // === 1. Wire the repository against the in-memory store ===
    let store = Arc::new(InMemoryEventStore::new());
    let registry = Arc::new(order_event_registry());
    let repository = EventRepository::new(store, registry, RepositoryConfig::new("demo-app"));

    // === 2. Create an order and persist it ===
    let customer_id = Uuid::new_v4();
    let mut order = Order::create("A1", customer_id, vec![])?;
    order.add_item(OrderItem {
        product_id: Uuid::new_v4(),
        quantity: 2,
    })?;

    let version = repository
        .save(&mut order, ExpectedVersion::NoStream, None)
        .await?;
    tracing::info!(version, "✅ Order created and persisted");

    // === 3. Rehydrate it from the category stream ===
    let mut loaded: Order = repository.get_aggregate_by_id("A1").await?;
    tracing::info!(
        items = loaded.items.len(),
        version = loaded.version(),
        "✅ Order rehydrated from history"
    );

    // === 4. Update under optimistic concurrency, with pinned metadata ===
    let metadata = EventMetadata::new("demo-app").with_correlation(Uuid::new_v4());
    loaded.add_item(OrderItem {
        product_id: Uuid::new_v4(),
        quantity: 1,
    })?;
    let observed = loaded.version();
    let version = repository
        .save(&mut loaded, ExpectedVersion::Exact(observed), Some(&metadata))
        .await?;
    tracing::info!(version, "✅ Order updated");

    // === 5. Cancel and show the final state ===
    let mut current: Order = repository.get_aggregate_by_id("A1").await?;
    current.cancel(Some("demo complete".to_string()))?;
    let observed = current.version();
    repository
        .save(&mut current, ExpectedVersion::Exact(observed), None)
        .await?;

    let final_state: Order = repository.get_aggregate_by_id("A1").await?;
    tracing::info!(
        status = ?final_state.status,
        items = final_state.items.len(),
        version = final_state.version(),
        "🎉 Demo complete"
    );

    Ok(())
}
