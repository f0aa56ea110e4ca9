use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::OrderItem;
use crate::event_sourcing::core::{DomainEvent, EventPayload, EventTypeRegistry};

// ============================================================================
// Order Events - Domain Events for Order Aggregate
// ============================================================================
//
// The union is closed: adding an event means adding a variant here plus a
// registration entry in `order_event_registry`. Each variant's body carries
// the order id, which is what category-stream filtering keys on.
//
// ============================================================================

/// Order Event - union type for all order events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OrderEvent {
    Created(OrderCreated),
    ItemAdded(ItemAdded),
    ItemRemoved(ItemRemoved),
    Cancelled(OrderCancelled),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => OrderCreated::EVENT_TYPE,
            Self::ItemAdded(_) => ItemAdded::EVENT_TYPE,
            Self::ItemRemoved(_) => ItemRemoved::EVENT_TYPE,
            Self::Cancelled(_) => OrderCancelled::EVENT_TYPE,
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            Self::Created(e) => &e.order_id,
            Self::ItemAdded(e) => &e.order_id,
            Self::ItemRemoved(e) => &e.order_id,
            Self::Cancelled(e) => &e.order_id,
        }
    }

    fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::Created(e) => serde_json::to_vec(e),
            Self::ItemAdded(e) => serde_json::to_vec(e),
            Self::ItemRemoved(e) => serde_json::to_vec(e),
            Self::Cancelled(e) => serde_json::to_vec(e),
        }
    }
}

/// Registry over the full order event union; built once at startup.
pub fn order_event_registry() -> EventTypeRegistry<OrderEvent> {
    let mut registry = EventTypeRegistry::new();
    registry.register::<OrderCreated>(OrderEvent::Created);
    registry.register::<ItemAdded>(OrderEvent::ItemAdded);
    registry.register::<ItemRemoved>(OrderEvent::ItemRemoved);
    registry.register::<OrderCancelled>(OrderEvent::Cancelled);
    registry
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// Order Created - initial event in the order lifecycle
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderCreated {
    pub order_id: String,
    pub customer_id: Uuid,
    pub items: Vec<OrderItem>,
}

impl EventPayload for OrderCreated {
    const EVENT_TYPE: &'static str = "OrderCreated";
}

/// Item Added - one item added to an open order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ItemAdded {
    pub order_id: String,
    pub item: OrderItem,
}

impl EventPayload for ItemAdded {
    const EVENT_TYPE: &'static str = "ItemAdded";
}

/// Item Removed - one item removed from an open order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ItemRemoved {
    pub order_id: String,
    pub product_id: Uuid,
}

impl EventPayload for ItemRemoved {
    const EVENT_TYPE: &'static str = "ItemRemoved";
}

/// Order Cancelled - order lifecycle ended
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderCancelled {
    pub order_id: String,
    pub reason: Option<String>,
}

impl EventPayload for OrderCancelled {
    const EVENT_TYPE: &'static str = "OrderCancelled";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sourcing::core::EventMetadata;

    #[test]
    fn registry_resolves_every_known_event_type() {
        let registry = order_event_registry();

        for name in ["OrderCreated", "ItemAdded", "ItemRemoved", "OrderCancelled"] {
            assert!(registry.resolve(name).is_some(), "missing factory for {name}");
        }
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn factory_round_trips_serialized_payload() {
        let registry = order_event_registry();
        let payload = ItemAdded {
            order_id: "A1".to_string(),
            item: OrderItem {
                product_id: Uuid::new_v4(),
                quantity: 2,
            },
        };
        let body = serde_json::to_vec(&payload).unwrap();

        let factory = registry.resolve(ItemAdded::EVENT_TYPE).unwrap();
        let envelope = factory(&body, EventMetadata::new("test"), 4, 1).unwrap();

        assert_eq!(envelope.payload, OrderEvent::ItemAdded(payload));
        assert_eq!(envelope.payload.aggregate_id(), "A1");
        assert_eq!(envelope.position, 4);
        assert_eq!(envelope.version, 1);
    }

    #[test]
    fn event_type_names_follow_the_wire_convention() {
        let created = OrderEvent::Created(OrderCreated {
            order_id: "A1".to_string(),
            customer_id: Uuid::new_v4(),
            items: vec![],
        });

        assert_eq!(created.event_type(), "OrderCreated");
    }
}
