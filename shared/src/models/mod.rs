//! Data models
//!
//! Shared between the service and its API clients.
//! All IDs are UUIDs; money is whole currency units in `i64`.

pub mod order;
pub mod product;
pub mod shop;

// Re-exports
pub use order::*;
pub use product::*;
pub use shop::*;
