//! Integration tests for Titans Coffee Run.
//!
//! These tests exercise a running server over HTTP and are ignored by
//! default. To run them:
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p coffee-run-cli -- migrate
//! cargo run -p coffee-run-cli -- seed
//!
//! # Start the server
//! cargo run -p coffee-run-server
//!
//! # Run the ignored tests
//! cargo test -p coffee-run-integration-tests -- --ignored
//! ```
//!
//! The server base URL defaults to `http://localhost:3000` and can be
//! overridden with `COFFEE_RUN_BASE_URL`.
