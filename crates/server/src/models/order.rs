//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookstore_core::{BookId, Email, OrderId, OrderItemId, OrderStatus};

/// An order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Generated order ID.
    pub id: OrderId,
    /// Owner of the order.
    pub user: Email,
    /// Server-assigned creation time (start of the creating transaction).
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// A line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    /// Always equal to the parent order's `user`.
    pub user: Email,
    pub order_id: OrderId,
    pub book_id: BookId,
    pub quantity: i32,
}

/// An order together with its items, in insertion order.
///
/// Only ever built from stored rows, so `items` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A requested line item for a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub book_id: BookId,
    pub quantity: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_order_item_uses_camel_case() {
        let item: NewOrderItem =
            serde_json::from_value(json!({ "bookId": 1, "quantity": 2 })).unwrap();
        assert_eq!(item.book_id, BookId::new(1));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_order_detail_flattens_header() {
        let user = Email::parse("cahyo@domain.example").unwrap();
        let detail = OrderDetail {
            order: Order {
                id: OrderId::new(3),
                user: user.clone(),
                date: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
                status: OrderStatus::Pending,
            },
            items: vec![OrderItem {
                id: OrderItemId::new(9),
                user,
                order_id: OrderId::new(3),
                book_id: BookId::new(1),
                quantity: 1,
            }],
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["user"], "cahyo@domain.example");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["items"][0]["orderId"], 3);
        assert_eq!(value["items"][0]["bookId"], 1);
    }
}
