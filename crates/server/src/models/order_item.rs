//! Order line items.

use rust_decimal::Decimal;

use coffee_run_core::{CupSize, OrderId, OrderItemId, ProductId};

use crate::models::product::Product;
use crate::validation::FieldError;

/// Quantities must stay below this bound (exclusive).
pub const MAX_QUANTITY: i32 = 100;

/// A persisted order line.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Product name at load time, joined in for display.
    pub product_name: String,
    pub size: CupSize,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// An order line as requested (from the session cart), before pricing.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub size: CupSize,
    pub quantity: i32,
    /// Explicit unit price; when `None` the product's current price is used.
    pub unit_price: Option<Decimal>,
}

/// A fully priced line, ready to persist.
///
/// `subtotal` is always recomputed here, never trusted from input.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub size: CupSize,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl NewOrderItem {
    /// Validate the line and price it against the product.
    ///
    /// The unit price is copied from the product when unset, so later price
    /// changes never affect existing orders. The subtotal is recomputed as
    /// `quantity * unit_price`.
    ///
    /// # Errors
    ///
    /// Returns one error per violated field.
    pub fn price(&self, product: &Product) -> Result<PricedLine, Vec<FieldError>> {
        let mut errors = Vec::new();

        if !product.offers_size(self.size) {
            errors.push(FieldError::new("size", "is not available for this product"));
        }

        if self.quantity <= 0 {
            errors.push(FieldError::new("quantity", "must be greater than 0"));
        } else if self.quantity >= MAX_QUANTITY {
            errors.push(FieldError::new("quantity", "must be less than 100"));
        }

        let unit_price = self.unit_price.unwrap_or(product.price);
        if unit_price <= Decimal::ZERO {
            errors.push(FieldError::new("unit_price", "must be greater than 0"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let subtotal = Decimal::from(self.quantity) * unit_price;
        if subtotal <= Decimal::ZERO {
            return Err(vec![FieldError::new("subtotal", "must be greater than 0")]);
        }

        Ok(PricedLine {
            product_id: self.product_id,
            size: self.size,
            quantity: self.quantity,
            unit_price,
            subtotal,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: Decimal) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Cappuccino".to_owned(),
            price,
            available_sizes: vec![CupSize::Small, CupSize::Medium, CupSize::Large],
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_subtotal_is_quantity_times_unit_price() {
        let line = NewOrderItem {
            product_id: ProductId::new(1),
            size: CupSize::Medium,
            quantity: 3,
            unit_price: None,
        };
        let priced = line.price(&product(Decimal::new(400, 2))).unwrap();
        assert_eq!(priced.unit_price, Decimal::new(400, 2));
        assert_eq!(priced.subtotal, Decimal::new(1200, 2));
    }

    #[test]
    fn test_subtotal_recomputed_when_quantity_changes() {
        let mut line = NewOrderItem {
            product_id: ProductId::new(1),
            size: CupSize::Small,
            quantity: 1,
            unit_price: None,
        };
        let product = product(Decimal::new(400, 2));
        assert_eq!(line.price(&product).unwrap().subtotal, Decimal::new(400, 2));

        line.quantity = 3;
        assert_eq!(line.price(&product).unwrap().subtotal, Decimal::new(1200, 2));
    }

    #[test]
    fn test_explicit_unit_price_wins_over_product_price() {
        let line = NewOrderItem {
            product_id: ProductId::new(1),
            size: CupSize::Large,
            quantity: 2,
            unit_price: Some(Decimal::new(900, 2)),
        };
        // Product price has since changed; the captured price is used.
        let priced = line.price(&product(Decimal::new(1100, 2))).unwrap();
        assert_eq!(priced.unit_price, Decimal::new(900, 2));
        assert_eq!(priced.subtotal, Decimal::new(1800, 2));
    }

    #[test]
    fn test_quantity_bounds() {
        let product = product(Decimal::new(400, 2));
        for quantity in [0, -1, 100, 150] {
            let line = NewOrderItem {
                product_id: ProductId::new(1),
                size: CupSize::Small,
                quantity,
                unit_price: None,
            };
            let errors = line.price(&product).unwrap_err();
            assert!(errors.iter().any(|e| e.field == "quantity"), "{quantity}");
        }

        let line = NewOrderItem {
            product_id: ProductId::new(1),
            size: CupSize::Small,
            quantity: 99,
            unit_price: None,
        };
        assert!(line.price(&product).is_ok());
    }

    #[test]
    fn test_unavailable_size_rejected() {
        let mut product = product(Decimal::new(400, 2));
        product.available_sizes = vec![CupSize::Small];
        let line = NewOrderItem {
            product_id: ProductId::new(1),
            size: CupSize::Large,
            quantity: 1,
            unit_price: None,
        };
        let errors = line.price(&product).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "size"));
    }
}
