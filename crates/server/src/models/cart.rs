//! The session-scoped shopping cart.
//!
//! A typed list of product/size/quantity tuples, serialized into the session
//! at request boundaries. Prices are never stored in the cart; they are
//! resolved against the products table when the cart is displayed or turned
//! into an order.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use coffee_run_core::{CupSize, ProductId};

use crate::models::session_keys;

/// One line in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub size: CupSize,
    pub quantity: u32,
}

/// The cart itself: an ordered list of lines, one per product/size pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add a line, merging quantities for an existing product/size pair.
    pub fn add(&mut self, product_id: ProductId, size: CupSize, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id && item.size == size)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                product_id,
                size,
                quantity,
            });
        }
    }

    /// Set the quantity of a product's line. Quantity 0 removes the line.
    ///
    /// When `size` is `None`, the first line for the product is updated.
    /// Returns false if no matching line exists.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        size: Option<CupSize>,
        quantity: u32,
    ) -> bool {
        let position = self.items.iter().position(|item| {
            item.product_id == product_id && size.is_none_or(|s| item.size == s)
        });
        let Some(position) = position else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(position);
        } else if let Some(item) = self.items.get_mut(position) {
            item.quantity = quantity;
        }
        true
    }

    /// Remove a product's line(s). When `size` is `None`, every line for the
    /// product is removed. Returns false if nothing matched.
    pub fn remove(&mut self, product_id: ProductId, size: Option<CupSize>) -> bool {
        let before = self.items.len();
        self.items.retain(|item| {
            !(item.product_id == product_id && size.is_none_or(|s| item.size == s))
        });
        self.items.len() != before
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // =========================================================================
    // Session boundary
    // =========================================================================

    /// Load the cart from the session (empty if absent).
    pub async fn load(session: &Session) -> Self {
        session
            .get::<Self>(session_keys::CART)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Persist the cart into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::CART, self).await
    }

    /// Drop the cart from the session (after checkout).
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.remove::<Self>(session_keys::CART).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_same_product_and_size() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), CupSize::Small, 2);
        cart.add(ProductId::new(1), CupSize::Small, 1);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_add_keeps_sizes_distinct() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), CupSize::Small, 1);
        cart.add(ProductId::new(1), CupSize::Large, 1);
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), CupSize::Small, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), CupSize::Small, 2);
        assert!(cart.set_quantity(ProductId::new(1), Some(CupSize::Small), 5));
        assert_eq!(cart.total_items(), 5);

        // Quantity 0 removes the line.
        assert!(cart.set_quantity(ProductId::new(1), Some(CupSize::Small), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut cart = Cart::default();
        assert!(!cart.set_quantity(ProductId::new(9), None, 1));
    }

    #[test]
    fn test_remove_all_sizes_for_product() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1), CupSize::Small, 1);
        cart.add(ProductId::new(1), CupSize::Large, 1);
        cart.add(ProductId::new(2), CupSize::Medium, 1);
        assert!(cart.remove(ProductId::new(1), None));
        assert_eq!(cart.items.len(), 1);
        assert!(!cart.remove(ProductId::new(1), None));
    }
}
