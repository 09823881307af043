//! Bearer-token authentication for the customer and shop API

pub mod customer_auth;

pub use customer_auth::CustomerIdentity;
