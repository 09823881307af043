//! Rental orders
//!
//! - [`create`]: atomic order construction (availability + price snapshot)
//! - [`checkout`]: construction followed by the gateway transaction
//! - [`lifecycle`]: customer cancellation and shop status updates
//! - [`history`]: customer history and shop order lists

pub mod availability;
pub mod checkout;
pub mod create;
pub mod history;
pub mod lifecycle;
pub mod period;
pub mod pricing;


pub use create::{NewOrder, NewOrderItem, PlacedOrder};
pub use period::RentalPeriod;
