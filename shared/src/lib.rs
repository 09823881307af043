//! Shared types for the Sewa rental marketplace
//!
//! Common types used by the service crates: the unified error system,
//! domain models (products, shops, orders) and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
