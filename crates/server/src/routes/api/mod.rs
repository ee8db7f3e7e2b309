//! JSON API handlers under `/api/v1`.

pub mod cart_items;
pub mod sales;
