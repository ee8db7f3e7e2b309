//! Titans Coffee Run Core - Shared types library.
//!
//! This crate provides common types used across all Titans Coffee Run
//! components:
//! - `server` - The storefront, admin, and credit-application web app
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, cup sizes, and
//!   order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
