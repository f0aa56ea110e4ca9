use uuid::Uuid;

use super::errors::OrderError;
use super::events::{ItemAdded, ItemRemoved, OrderCancelled, OrderCreated, OrderEvent};
use super::value_objects::{OrderItem, OrderStatus};
use crate::event_sourcing::core::{Aggregate, EventEnvelope};

// ============================================================================
// Order Aggregate - Domain Logic
// ============================================================================
//
// State is derived entirely from events. Commands validate business rules,
// then raise events; raising mutates state immediately and buffers the event
// as an uncommitted change for the repository to append.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub customer_id: Option<Uuid>,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub cancelled_reason: Option<String>,

    version: i64,
    uncommitted: Vec<OrderEvent>,
}

impl Default for Order {
    fn default() -> Self {
        Self {
            id: String::new(),
            customer_id: None,
            items: Vec::new(),
            status: OrderStatus::Open,
            cancelled_reason: None,
            version: -1,
            uncommitted: Vec::new(),
        }
    }
}

impl Order {
    /// Open a new order. Items may be empty; quantities must be positive.
    pub fn create(id: &str, customer_id: Uuid, items: Vec<OrderItem>) -> Result<Self, OrderError> {
        Self::validate_items(&items)?;

        let mut order = Self::default();
        order.raise(OrderEvent::Created(OrderCreated {
            order_id: id.to_string(),
            customer_id,
            items,
        }));
        Ok(order)
    }

    pub fn add_item(&mut self, item: OrderItem) -> Result<(), OrderError> {
        self.ensure_open()?;
        if item.quantity <= 0 {
            return Err(OrderError::InvalidQuantity(item.quantity));
        }

        self.raise(OrderEvent::ItemAdded(ItemAdded {
            order_id: self.id.clone(),
            item,
        }));
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: Uuid) -> Result<(), OrderError> {
        self.ensure_open()?;
        if !self.items.iter().any(|item| item.product_id == product_id) {
            return Err(OrderError::UnknownProduct(product_id));
        }

        self.raise(OrderEvent::ItemRemoved(ItemRemoved {
            order_id: self.id.clone(),
            product_id,
        }));
        Ok(())
    }

    pub fn cancel(&mut self, reason: Option<String>) -> Result<(), OrderError> {
        self.ensure_open()?;

        self.raise(OrderEvent::Cancelled(OrderCancelled {
            order_id: self.id.clone(),
            reason,
        }));
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::Open => Ok(()),
            OrderStatus::Cancelled => Err(OrderError::AlreadyCancelled),
        }
    }

    fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
        for item in items {
            if item.quantity <= 0 {
                return Err(OrderError::InvalidQuantity(item.quantity));
            }
        }
        Ok(())
    }

    fn raise(&mut self, event: OrderEvent) {
        self.mutate(&event);
        self.uncommitted.push(event);
    }

    fn mutate(&mut self, event: &OrderEvent) {
        match event {
            OrderEvent::Created(e) => {
                self.id = e.order_id.clone();
                self.customer_id = Some(e.customer_id);
                self.items = e.items.clone();
            }
            OrderEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            OrderEvent::ItemRemoved(e) => {
                self.items.retain(|item| item.product_id != e.product_id);
            }
            OrderEvent::Cancelled(e) => {
                self.status = OrderStatus::Cancelled;
                self.cancelled_reason = e.reason.clone();
            }
        }
    }
}

// ============================================================================
// Aggregate Trait Implementation
// ============================================================================

impl Aggregate for Order {
    type Event = OrderEvent;

    const AGGREGATE_TYPE: &'static str = "Order";

    fn apply(&mut self, envelope: &EventEnvelope<OrderEvent>) {
        self.mutate(&envelope.payload);
        self.version = envelope.version;
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn uncommitted_changes(&self) -> &[OrderEvent] {
        &self.uncommitted
    }

    fn clear_uncommitted_changes(&mut self) {
        self.uncommitted.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_sourcing::core::EventMetadata;

    fn item(quantity: i32) -> OrderItem {
        OrderItem {
            product_id: Uuid::new_v4(),
            quantity,
        }
    }

    fn envelope(payload: OrderEvent, version: i64) -> EventEnvelope<OrderEvent> {
        EventEnvelope::new(payload, EventMetadata::new("tests"), version, version)
    }

    #[test]
    fn commands_buffer_uncommitted_changes_in_order() {
        let mut order = Order::create("A1", Uuid::new_v4(), vec![]).unwrap();
        order.add_item(item(2)).unwrap();
        order.cancel(Some("out of stock".to_string())).unwrap();

        let types: Vec<&str> = order
            .uncommitted_changes()
            .iter()
            .map(|e| {
                use crate::event_sourcing::core::DomainEvent;
                e.event_type()
            })
            .collect();

        assert_eq!(types, vec!["OrderCreated", "ItemAdded", "OrderCancelled"]);
        // Local version stays at the last persisted one until reload.
        assert_eq!(order.version(), -1);
    }

    #[test]
    fn invalid_quantity_is_rejected() {
        let mut order = Order::create("A1", Uuid::new_v4(), vec![]).unwrap();

        let err = order.add_item(item(0)).unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity(0)));
        assert_eq!(order.uncommitted_changes().len(), 1);
    }

    #[test]
    fn cancelled_order_rejects_further_commands() {
        let mut order = Order::create("A1", Uuid::new_v4(), vec![item(1)]).unwrap();
        order.cancel(None).unwrap();

        assert!(matches!(
            order.add_item(item(1)),
            Err(OrderError::AlreadyCancelled)
        ));
    }

    #[test]
    fn removing_an_unknown_product_fails() {
        let mut order = Order::create("A1", Uuid::new_v4(), vec![item(1)]).unwrap();

        let missing = Uuid::new_v4();
        assert!(matches!(
            order.remove_item(missing),
            Err(OrderError::UnknownProduct(id)) if id == missing
        ));
    }

    #[test]
    fn rehydration_tracks_version_and_state() {
        let customer_id = Uuid::new_v4();
        let added = item(3);
        let history = [
            envelope(
                OrderEvent::Created(OrderCreated {
                    order_id: "A1".to_string(),
                    customer_id,
                    items: vec![],
                }),
                0,
            ),
            envelope(
                OrderEvent::ItemAdded(ItemAdded {
                    order_id: "A1".to_string(),
                    item: added.clone(),
                }),
                1,
            ),
        ];

        let order = Order::rehydrate(&history);

        assert_eq!(order.id, "A1");
        assert_eq!(order.customer_id, Some(customer_id));
        assert_eq!(order.items, vec![added]);
        assert_eq!(order.version(), 1);
        assert!(order.uncommitted_changes().is_empty());
    }

    #[test]
    fn incremental_replay_matches_full_replay() {
        let history = [
            envelope(
                OrderEvent::Created(OrderCreated {
                    order_id: "A1".to_string(),
                    customer_id: Uuid::new_v4(),
                    items: vec![item(1)],
                }),
                0,
            ),
            envelope(
                OrderEvent::ItemAdded(ItemAdded {
                    order_id: "A1".to_string(),
                    item: item(2),
                }),
                1,
            ),
            envelope(
                OrderEvent::Cancelled(OrderCancelled {
                    order_id: "A1".to_string(),
                    reason: None,
                }),
                2,
            ),
        ];

        let full = Order::rehydrate(&history);

        let mut incremental = Order::rehydrate(&history[..2]);
        incremental.apply(&history[2]);

        assert_eq!(incremental.items, full.items);
        assert_eq!(incremental.status, full.status);
        assert_eq!(incremental.version(), full.version());
    }
}
