// ============================================================================
// Order Domain - Business Logic for Order Aggregate
// ============================================================================
//
// This module contains ALL Order-specific code:
// - Value objects (OrderItem, OrderStatus)
// - Events (OrderCreated, ItemAdded, etc.) and their registry
// - Errors (OrderError enum)
// - Aggregate (Order with business logic)
//
// This is completely separate from the generic event sourcing infrastructure.
//
// ============================================================================

pub mod aggregate;
pub mod errors;
pub mod events;
pub mod value_objects;

// Re-export for convenience
pub use aggregate::Order;
pub use errors::OrderError;
pub use events::{
    order_event_registry, ItemAdded, ItemRemoved, OrderCancelled, OrderCreated, OrderEvent,
};
pub use value_objects::{OrderItem, OrderStatus};
