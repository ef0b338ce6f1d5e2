//! Integration test suite for modinv
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **enrichment**: concurrency bound, deduplication and failure isolation
//! - **list**: the `list` command end to end
//! - **migrate**: the `migrate` command end to end
//! - **selectors**: selector resolution properties against in-memory build lists

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod enrichment;
mod list;
mod migrate;
mod selectors;
