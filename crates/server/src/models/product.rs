//! Product (menu item) model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use coffee_run_core::{CupSize, ProductId};

use crate::validation::FieldError;

/// A menu item.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub available_sizes: Vec<CupSize>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can be ordered in the given size.
    #[must_use]
    pub fn offers_size(&self, size: CupSize) -> bool {
        self.available_sizes.contains(&size)
    }
}

/// Input for creating or updating a product from the admin form.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Option<Decimal>,
    pub available_sizes: Vec<CupSize>,
    pub active: bool,
}

impl NewProduct {
    /// Validate admin form input. Returns one error per violated field.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "can't be blank"));
        }

        match self.price {
            None => errors.push(FieldError::new("price", "is not a number")),
            Some(price) if price <= Decimal::ZERO => {
                errors.push(FieldError::new("price", "must be greater than 0"));
            }
            Some(_) => {}
        }

        if self.available_sizes.is_empty() {
            errors.push(FieldError::new("available_sizes", "can't be blank"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewProduct {
        NewProduct {
            name: "Cappuccino".to_owned(),
            price: Some(Decimal::new(900, 2)),
            available_sizes: vec![CupSize::Small, CupSize::Medium, CupSize::Large],
            active: true,
        }
    }

    #[test]
    fn test_valid_product_passes() {
        assert!(valid_input().validate().is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut input = valid_input();
        input.name = "  ".to_owned();
        let errors = input.validate();
        assert!(errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn test_nonpositive_price_rejected() {
        let mut input = valid_input();
        input.price = Some(Decimal::ZERO);
        assert!(input.validate().iter().any(|e| e.field == "price"));

        input.price = None;
        assert!(input.validate().iter().any(|e| e.field == "price"));
    }

    #[test]
    fn test_empty_sizes_rejected() {
        let mut input = valid_input();
        input.available_sizes.clear();
        assert!(
            input
                .validate()
                .iter()
                .any(|e| e.field == "available_sizes")
        );
    }

    #[test]
    fn test_offers_size() {
        let product = Product {
            id: ProductId::new(1),
            name: "Macaroons".to_owned(),
            price: Decimal::new(400, 2),
            available_sizes: vec![CupSize::Small],
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert!(product.offers_size(CupSize::Small));
        assert!(!product.offers_size(CupSize::Large));
    }
}
