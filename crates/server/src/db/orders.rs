//! Order repository.
//!
//! Orders are written as one header row plus one row per item inside a single
//! transaction, and read back with a single join that is folded into nested
//! [`OrderDetail`] values.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::PgPool;
use tracing::{debug, instrument};

use bookstore_core::{BookId, Email, OrderId, OrderItemId, OrderStatus};

use super::RepositoryError;
use crate::models::{NewOrderItem, Order, OrderDetail, OrderItem};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

/// Order header as returned by `INSERT ... RETURNING`.
#[derive(Debug, sqlx::FromRow)]
struct OrderHeaderRow {
    id: OrderId,
    user_email: Email,
    ordered_at: DateTime<Utc>,
    status: OrderStatus,
}

impl From<OrderHeaderRow> for Order {
    fn from(row: OrderHeaderRow) -> Self {
        Self {
            id: row.id,
            user: row.user_email,
            date: row.ordered_at,
            status: row.status,
        }
    }
}

/// One row of the orders/items join: an item with its order header repeated.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemRow {
    pub order_id: OrderId,
    pub user_email: Email,
    pub ordered_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub item_id: OrderItemId,
    pub book_id: BookId,
    pub quantity: i32,
}

impl OrderItemRow {
    fn into_parts(self) -> (Order, OrderItem) {
        let item = OrderItem {
            id: self.item_id,
            user: self.user_email.clone(),
            order_id: self.order_id,
            book_id: self.book_id,
            quantity: self.quantity,
        };
        let order = Order {
            id: self.order_id,
            user: self.user_email,
            date: self.ordered_at,
            status: self.status,
        };
        (order, item)
    }
}

/// Groups an ordered stream of join rows into [`OrderDetail`]s.
///
/// Rows of one order must be contiguous. A new detail is opened whenever the
/// order ID differs from the previous row's; otherwise the row's item is
/// appended to the open detail.
#[derive(Debug, Default)]
pub struct OrderDetailFold {
    orders: Vec<OrderDetail>,
}

impl OrderDetailFold {
    /// Feed the next row.
    pub fn push(&mut self, row: OrderItemRow) {
        let (order, item) = row.into_parts();
        match self.orders.last_mut() {
            Some(open) if open.order.id == order.id => open.items.push(item),
            _ => self.orders.push(OrderDetail {
                order,
                items: vec![item],
            }),
        }
    }

    /// Finish folding and return the grouped orders.
    #[must_use]
    pub fn finish(self) -> Vec<OrderDetail> {
        self.orders
    }
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order and all of its items atomically.
    ///
    /// The header's date is `now()`, the start time of the transaction. If any
    /// statement fails the transaction is dropped without commit, which rolls
    /// back the header as well.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement or the commit
    /// fails, including foreign key and check violations on items.
    #[instrument(skip(self, items), fields(user = %user, item_count = items.len()))]
    pub async fn create(
        &self,
        user: &Email,
        items: &[NewOrderItem],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let header: OrderHeaderRow = sqlx::query_as(
            r"
            INSERT INTO bookstore.orders (user_email, ordered_at, status)
            VALUES ($1, now(), $2)
            RETURNING id, user_email, ordered_at, status
            ",
        )
        .bind(user)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO bookstore.order_items (user_email, order_id, book_id, quantity)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(user)
            .bind(header.id)
            .bind(item.book_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let order = Order::from(header);
        debug!(order_id = %order.id, "Created order");
        Ok(order)
    }

    /// List a user's orders with their items, newest first.
    ///
    /// Items within an order are in insertion order. A user without orders
    /// gets an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn list_by_user(&self, user: &Email) -> Result<Vec<OrderDetail>, RepositoryError> {
        // Order ID is a tie-breaker so rows of orders sharing a timestamp stay contiguous.
        let fold = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT o.id AS order_id, o.user_email, o.ordered_at, o.status,
                   oi.id AS item_id, oi.book_id, oi.quantity
            FROM bookstore.orders o
            JOIN bookstore.order_items oi
              ON oi.order_id = o.id AND oi.user_email = o.user_email
            WHERE o.user_email = $1
            ORDER BY o.ordered_at DESC, o.id DESC, oi.id ASC
            ",
        )
        .bind(user)
        .fetch(self.pool)
        .try_fold(OrderDetailFold::default(), |mut fold, row| async move {
            fold.push(row);
            Ok::<_, sqlx::Error>(fold)
        })
        .await?;

        let orders = fold.finish();
        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }
}
