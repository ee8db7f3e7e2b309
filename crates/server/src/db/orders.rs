//! Order repository for database operations.
//!
//! Order creation persists the order row and all of its items inside a
//! single transaction; the stored total is always recomputed from the priced
//! lines, never accepted from input.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use coffee_run_core::{CupSize, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderSummary, PricedLine, compute_total};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

/// An order joined with its owner's email, for the admin listing.
#[derive(Debug, Clone)]
pub struct OrderWithUser {
    pub order: Order,
    pub user_email: String,
    pub items_count: i64,
}

/// Aggregate sales numbers for the dashboard.
///
/// Cancelled orders are excluded from every figure.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SalesSummary {
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub orders_this_month: i64,
    pub revenue_this_month: Decimal,
}

/// Per-product sales breakdown.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProductSales {
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    status: String,
    total_amount: Decimal,
    notes: Option<String>,
    titan_fund_donation: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let status = OrderStatus::from_str(&self.status).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            status,
            total_amount: self.total_amount,
            notes: self.notes,
            titan_fund_donation: self.titan_fund_donation,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    size: String,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl OrderItemRow {
    fn into_item(self) -> Result<OrderItem, RepositoryError> {
        let size = CupSize::from_str(&self.size).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid size in database: {e}"))
        })?;

        Ok(OrderItem {
            id: OrderItemId::new(self.id),
            order_id: OrderId::new(self.order_id),
            product_id: ProductId::new(self.product_id),
            product_name: self.product_name,
            size,
            quantity: self.quantity,
            unit_price: self.unit_price,
            subtotal: self.subtotal,
        })
    }
}

const SELECT_ORDER: &str = r"
    SELECT id, user_id, status, total_amount, notes, titan_fund_donation,
           created_at, updated_at
    FROM orders
";

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its items in a single transaction.
    ///
    /// The total is computed from `lines` plus the donation; if any insert
    /// fails nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create_with_items(
        &self,
        user_id: UserId,
        lines: &[PricedLine],
        notes: Option<&str>,
        donation: Option<Decimal>,
    ) -> Result<Order, RepositoryError> {
        let total = compute_total(lines, donation);

        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, status, total_amount, notes, titan_fund_donation)
            VALUES ($1, 'pending', $2, $3, $4)
            RETURNING id, user_id, status, total_amount, notes, titan_fund_donation,
                      created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(total)
        .bind(notes)
        .bind(donation)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, size, quantity, unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order_row.id)
            .bind(line.product_id.as_i32())
            .bind(line.size.as_str())
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.subtotal)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        order_row.into_order()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE id = $1"))
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Get an order's items, with product names joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                   oi.size, oi.quantity, oi.unit_price, oi.subtotal
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            ",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderItemRow::into_item).collect()
    }

    /// List a user's orders, most recent first, with item counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderSummary>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            #[sqlx(flatten)]
            order: OrderRow,
            items_count: i64,
        }

        let rows = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT o.id, o.user_id, o.status, o.total_amount, o.notes,
                   o.titan_fund_donation, o.created_at, o.updated_at,
                   COALESCE(SUM(oi.quantity), 0)::BIGINT AS items_count
            FROM orders o
            LEFT JOIN order_items oi ON oi.order_id = o.id
            WHERE o.user_id = $1
            GROUP BY o.id
            ORDER BY o.created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OrderSummary {
                    order: row.order.into_order()?,
                    items_count: row.items_count,
                })
            })
            .collect()
    }

    /// List every order with its owner's email, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderWithUser>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct ListingRow {
            #[sqlx(flatten)]
            order: OrderRow,
            user_email: String,
            items_count: i64,
        }

        let rows = sqlx::query_as::<_, ListingRow>(
            r"
            SELECT o.id, o.user_id, o.status, o.total_amount, o.notes,
                   o.titan_fund_donation, o.created_at, o.updated_at,
                   u.email AS user_email,
                   COALESCE(SUM(oi.quantity), 0)::BIGINT AS items_count
            FROM orders o
            JOIN users u ON u.id = o.user_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            GROUP BY o.id, u.email
            ORDER BY o.created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OrderWithUser {
                    order: row.order.into_order()?,
                    user_email: row.user_email,
                    items_count: row.items_count,
                })
            })
            .collect()
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, status, total_amount, notes, titan_fund_donation,
                      created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_order()
    }

    /// Aggregate sales figures, overall and for the current calendar month.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_summary(&self) -> Result<SalesSummary, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct SummaryRow {
            total_orders: i64,
            total_revenue: Decimal,
            orders_this_month: i64,
            revenue_this_month: Decimal,
        }

        let row = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT COUNT(*) AS total_orders,
                   COALESCE(SUM(total_amount), 0) AS total_revenue,
                   COUNT(*) FILTER (
                       WHERE date_trunc('month', created_at) = date_trunc('month', NOW())
                   ) AS orders_this_month,
                   COALESCE(SUM(total_amount) FILTER (
                       WHERE date_trunc('month', created_at) = date_trunc('month', NOW())
                   ), 0) AS revenue_this_month
            FROM orders
            WHERE status <> 'cancelled'
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(SalesSummary {
            total_orders: row.total_orders,
            total_revenue: row.total_revenue,
            orders_this_month: row.orders_this_month,
            revenue_this_month: row.revenue_this_month,
        })
    }

    /// Units and revenue per product, best sellers first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_by_product(&self) -> Result<Vec<ProductSales>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct ProductSalesRow {
            product_name: String,
            units_sold: i64,
            revenue: Decimal,
        }

        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r"
            SELECT p.name AS product_name,
                   COALESCE(SUM(oi.quantity), 0)::BIGINT AS units_sold,
                   COALESCE(SUM(oi.subtotal), 0) AS revenue
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            JOIN orders o ON o.id = oi.order_id
            WHERE o.status <> 'cancelled'
            GROUP BY p.name
            ORDER BY units_sold DESC, p.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProductSales {
                product_name: row.product_name,
                units_sold: row.units_sold,
                revenue: row.revenue,
            })
            .collect())
    }
}
