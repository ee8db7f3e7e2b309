//! Admin-only handlers under `/admin`.

pub mod orders;
pub mod products;
pub mod sales;
