//! Product repository for database operations.
//!
//! `available_sizes` is stored as a JSON array of size names in a TEXT
//! column and parsed back into [`CupSize`]s on load.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use coffee_run_core::{CupSize, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    available_sizes: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let names: Vec<String> = serde_json::from_str(&self.available_sizes).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid available_sizes in database: {e}"))
        })?;
        let available_sizes = names
            .iter()
            .map(|name| CupSize::from_str(name))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid size in database: {e}"))
            })?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            price: self.price,
            available_sizes,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Serialize sizes for storage.
fn sizes_to_json(sizes: &[CupSize]) -> String {
    let names: Vec<&str> = sizes.iter().map(CupSize::as_str).collect();
    // Serializing a Vec<&str> cannot fail
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_owned())
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, available_sizes, active, created_at, updated_at
            FROM products
            WHERE active = TRUE
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// List all products (including inactive), ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, available_sizes, active, created_at, updated_at
            FROM products
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, available_sizes, active, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Create a product. The caller must have validated `new_product`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_product: &NewProduct) -> Result<Product, RepositoryError> {
        let price = new_product
            .price
            .ok_or_else(|| RepositoryError::DataCorruption("product price missing".to_owned()))?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, price, available_sizes, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, available_sizes, active, created_at, updated_at
            ",
        )
        .bind(new_product.name.trim())
        .bind(price)
        .bind(sizes_to_json(&new_product.available_sizes))
        .bind(new_product.active)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique)?;

        row.into_product()
    }

    /// Update a product in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let price = changes
            .price
            .ok_or_else(|| RepositoryError::DataCorruption("product price missing".to_owned()))?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, price = $3, available_sizes = $4, active = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, available_sizes, active, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(changes.name.trim())
        .bind(price)
        .bind(sizes_to_json(&changes.available_sizes))
        .bind(changes.active)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique)?;

        row.ok_or(RepositoryError::NotFound)?.into_product()
    }

    /// Delete a product.
    ///
    /// Returns `true` if a row was deleted. Products referenced by order
    /// items cannot be deleted; deactivate them instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if order items reference the product.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "product has order history; deactivate it instead".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

fn conflict_on_unique(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("name has already been taken".to_owned());
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_round_trip_through_json() {
        let json = sizes_to_json(&[CupSize::Small, CupSize::Large]);
        assert_eq!(json, r#"["Small","Large"]"#);

        let names: Vec<String> = serde_json::from_str(&json).expect("valid json");
        let sizes: Vec<CupSize> = names
            .iter()
            .map(|n| CupSize::from_str(n).expect("valid size"))
            .collect();
        assert_eq!(sizes, vec![CupSize::Small, CupSize::Large]);
    }

    #[test]
    fn test_empty_sizes_serialize_to_empty_array() {
        assert_eq!(sizes_to_json(&[]), "[]");
    }
}
