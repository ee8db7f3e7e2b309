//! Titans Coffee Run server library.
//!
//! This crate provides the storefront, admin, and credit-application
//! functionality as a library, allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
