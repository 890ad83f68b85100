//! Order service.

use sqlx::PgPool;
use tracing::instrument;

use bookstore_core::Email;

use super::ServiceError;
use crate::db::orders::OrderRepository;
use crate::models::{NewOrderItem, Order, OrderDetail};

/// Order placement and listing, scoped to one authenticated user.
///
/// The caller is trusted to pass the subject of a verified session token as
/// `user`; nothing here re-checks ownership.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for `user` with the given items.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Invalid` if `items` is empty or any quantity is
    /// not positive. Nothing is written in that case.
    /// Returns `ServiceError::Internal` if the transaction fails, including
    /// references to unknown books. No partial order is left behind.
    #[instrument(skip(self, items), fields(user = %user))]
    pub async fn create_order(
        &self,
        user: &Email,
        items: &[NewOrderItem],
    ) -> Result<Order, ServiceError> {
        validate_items(items)?;
        Ok(self.orders.create(user, items).await?)
    }

    /// List all orders of `user` with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Internal` if the query fails.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn list_orders(&self, user: &Email) -> Result<Vec<OrderDetail>, ServiceError> {
        Ok(self.orders.list_by_user(user).await?)
    }
}

fn validate_items(items: &[NewOrderItem]) -> Result<(), ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::invalid("order must contain at least one item"));
    }

    if let Some(item) = items.iter().find(|item| item.quantity <= 0) {
        return Err(ServiceError::invalid(format!(
            "quantity for book {} must be positive",
            item.book_id
        )));
    }

    Ok(())
}
