//! Unified error codes for the Sewa services
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Shop errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Customer account not found
    CustomerNotFound = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Caller must own a shop
    ShopOwnerRequired = 2002,

    // ==================== 3xxx: Shop ====================
    /// Shop not found
    ShopNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4007,
    /// End date is before start date
    OrderInvalidDateRange = 4008,
    /// Order is not cancellable by the customer
    OrderNotCancellable = 4009,
    /// Status transition is not allowed
    OrderInvalidTransition = 4010,
    /// Not enough stock for the requested dates
    InsufficientStock = 4011,
    /// Order total does not fit the currency range
    OrderTotalOverflow = 4012,

    // ==================== 5xxx: Payment ====================
    /// Payment gateway call failed or was rejected
    PaymentFailed = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5003,
    /// Callback signature mismatch
    SignatureInvalid = 5006,
    /// Payment gateway did not answer in time
    PaymentGatewayTimeout = 5007,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product belongs to another shop
    ProductNotInShop = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::CustomerNotFound => "Customer not found",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ShopOwnerRequired => "User does not own a shop",

            // Shop
            ErrorCode::ShopNotFound => "Shop not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderInvalidDateRange => "End date must not be before start date",
            ErrorCode::OrderNotCancellable => "Only pending orders can be cancelled",
            ErrorCode::OrderInvalidTransition => "Order status transition is not allowed",
            ErrorCode::InsufficientStock => "Stock is not available on the selected dates",
            ErrorCode::OrderTotalOverflow => "Order total is out of range",

            // Payment
            ErrorCode::PaymentFailed => "Payment gateway returned an error",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::SignatureInvalid => "Invalid signature",
            ErrorCode::PaymentGatewayTimeout => "Payment gateway timed out",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductNotInShop => "Product does not belong to this shop",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1008 => Ok(ErrorCode::CustomerNotFound),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::ShopOwnerRequired),

            // Shop
            3001 => Ok(ErrorCode::ShopNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::OrderInvalidDateRange),
            4009 => Ok(ErrorCode::OrderNotCancellable),
            4010 => Ok(ErrorCode::OrderInvalidTransition),
            4011 => Ok(ErrorCode::InsufficientStock),
            4012 => Ok(ErrorCode::OrderTotalOverflow),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5006 => Ok(ErrorCode::SignatureInvalid),
            5007 => Ok(ErrorCode::PaymentGatewayTimeout),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6004 => Ok(ErrorCode::ProductNotInShop),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
