//! Wire contracts published to downstream systems.

use common::{CatalogItemId, OrderId};
use serde::{Deserialize, Serialize};

use crate::order::{Order, OrderItem};
use crate::value_objects::{Address, Money};

/// Reduced item view carried by the warehouse reservation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedItem {
    /// Stable per-line identifier (the catalog item id).
    pub id: CatalogItemId,
    /// Product name at order time.
    pub name: String,
    /// Units to reserve.
    pub units: u32,
}

/// Message published for asynchronous warehouse reservation.
///
/// Built 1:1 from the persisted order's lines, preserving their sequence.
/// Delivered at-least-once by the broker; consumers must tolerate
/// duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseReservationEvent {
    /// The persisted order this reservation is for.
    pub order_id: OrderId,
    /// Items to reserve, in order-line sequence.
    pub items: Vec<ReservedItem>,
}

impl WarehouseReservationEvent {
    /// Builds the event from a persisted order.
    pub fn from_order(order_id: OrderId, order: &Order) -> Self {
        let items = order
            .items()
            .iter()
            .map(|line| ReservedItem {
                id: line.item_ordered().catalog_item_id,
                name: line.item_ordered().product_name.clone(),
                units: line.quantity(),
            })
            .collect();
        Self { order_id, items }
    }
}

/// Synchronous delivery-intake request body.
///
/// Sent once per successful order creation attempt; not retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    /// The order total.
    pub price: Money,
    /// Shipping destination.
    pub shipping_address: Address,
    /// Full order lines.
    pub items: Vec<OrderItem>,
}

impl DeliveryPayload {
    /// Builds the payload from a persisted order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            price: order.total(),
            shipping_address: order.shipping_address().clone(),
            items: order.items().to_vec(),
        }
    }
}

/// Body of the escalation notification sent when reservation persistence
/// is exhausted. Carries the order id only, not the item payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationNotice {
    pub order_id: OrderId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{CatalogItemOrdered, OrderItem};
    use common::BuyerId;

    fn order() -> Order {
        let items = vec![
            OrderItem::new(
                CatalogItemOrdered::new(CatalogItemId::new(7), "Widget", "/pics/7.png"),
                Money::from_cents(1000),
                2,
            )
            .unwrap(),
            OrderItem::new(
                CatalogItemOrdered::new(CatalogItemId::new(3), "Gadget", "/pics/3.png"),
                Money::from_cents(500),
                1,
            )
            .unwrap(),
        ];
        Order::new(
            BuyerId::new("buyer"),
            Address::new("1 Main St", "Springfield", "IL", "US", "62704"),
            items,
        )
        .unwrap()
    }

    #[test]
    fn reservation_event_mirrors_order_lines() {
        let event = WarehouseReservationEvent::from_order(OrderId::new(42), &order());

        assert_eq!(event.order_id, OrderId::new(42));
        assert_eq!(event.items.len(), 2);
        assert_eq!(event.items[0].id, CatalogItemId::new(7));
        assert_eq!(event.items[0].name, "Widget");
        assert_eq!(event.items[0].units, 2);
        assert_eq!(event.items[1].id, CatalogItemId::new(3));
        assert_eq!(event.items[1].units, 1);
    }

    #[test]
    fn reservation_event_wire_shape() {
        let event = WarehouseReservationEvent::from_order(OrderId::new(42), &order());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["orderId"], 42);
        assert_eq!(json["items"][0]["id"], 7);
        assert_eq!(json["items"][0]["name"], "Widget");
        assert_eq!(json["items"][0]["units"], 2);
    }

    #[test]
    fn delivery_payload_carries_total_and_full_items() {
        let order = order();
        let payload = DeliveryPayload::from_order(&order);

        assert_eq!(payload.price.cents(), 2500);
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.shipping_address.city, "Springfield");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["price"], 2500);
        assert_eq!(json["shippingAddress"]["zipCode"], "62704");
        assert_eq!(json["items"][0]["unitPrice"], 1000);
    }

    #[test]
    fn escalation_notice_wire_shape() {
        let notice = EscalationNotice {
            order_id: OrderId::new(9),
        };
        let json = serde_json::to_value(notice).unwrap();
        assert_eq!(json, serde_json::json!({"orderId": 9}));
    }
}
