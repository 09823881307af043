//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::CustomerNotFound
            | Self::ShopNotFound
            | Self::OrderNotFound
            | Self::ProductNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::InsufficientStock | Self::OrderInvalidTransition => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied
            | Self::ShopOwnerRequired
            | Self::OrderNotCancellable
            | Self::SignatureInvalid => StatusCode::FORBIDDEN,

            // 502 Bad Gateway (upstream payment gateway)
            Self::PaymentFailed | Self::PaymentGatewayTimeout => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
