//! Tripay payment gateway integration via REST API (no SDK dependency)

pub mod request;
pub mod signature;

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

pub use request::TransactionRequest;

/// Merchant identity and request options used to build signed transactions
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    pub merchant_code: String,
    /// Shared HMAC key, also verifies callbacks
    pub private_key: String,
    pub callback_url: Option<String>,
    pub return_url: Option<String>,
    /// Transaction lifetime
    pub expiry_hours: i64,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No answer within the client timeout; the transaction may or may not exist
    #[error("payment gateway timed out")]
    Timeout,
    #[error("payment gateway unreachable: {0}")]
    Transport(String),
    /// The gateway answered `success: false`
    #[error("payment gateway rejected the request: {0}")]
    Rejected(String),
    #[error("invalid payment gateway response: {0}")]
    InvalidResponse(String),
    #[error("request signing failed: {0}")]
    Signing(&'static str),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::InvalidResponse(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Timeout => AppError::with_message(
                ErrorCode::PaymentGatewayTimeout,
                "Payment gateway timed out, payment outcome unknown",
            ),
            GatewayError::Rejected(message) => {
                AppError::upstream("Payment gateway returned an error")
                    .with_detail("gateway_message", message)
            }
            GatewayError::Transport(_) | GatewayError::InvalidResponse(_) => {
                AppError::upstream(e.to_string())
            }
            GatewayError::Signing(_) => AppError::internal(e.to_string()),
        }
    }
}

/// Outbound payment gateway
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Create a transaction; returns the gateway's `data` object (payment instructions)
    async fn create_transaction(&self, request: &TransactionRequest) -> Result<Value, GatewayError>;

    /// Available payment channels, verbatim
    async fn payment_channels(&self) -> Result<Value, GatewayError>;
}

/// Response envelope shared by all gateway endpoints
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Value,
}

fn read_envelope(status: StatusCode, body: &[u8]) -> Result<Value, GatewayError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| GatewayError::InvalidResponse(format!("HTTP {status}: {e}")))?;
    if !envelope.success {
        return Err(GatewayError::Rejected(envelope.message));
    }
    Ok(envelope.data)
}

/// reqwest-backed Tripay client
pub struct TripayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TripayClient {
    /// Every call is bounded by `timeout`
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for TripayClient {
    async fn create_transaction(&self, request: &TransactionRequest) -> Result<Value, GatewayError> {
        let resp = self
            .http
            .post(format!("{}/transaction/create", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        read_envelope(status, &body)
    }

    async fn payment_channels(&self) -> Result<Value, GatewayError> {
        let resp = self
            .http
            .get(format!("{}/merchant/payment-channel", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        read_envelope(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_returns_data() {
        let body = br#"{"success":true,"message":"","data":{"reference":"T0001","pay_code":"123"}}"#;
        let data = read_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(data["reference"], "T0001");
    }

    #[test]
    fn test_envelope_failure_is_rejected() {
        let body = br#"{"success":false,"message":"Invalid signature"}"#;
        match read_envelope(StatusCode::BAD_REQUEST, body) {
            Err(GatewayError::Rejected(msg)) => assert_eq!(msg, "Invalid signature"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_garbage_is_invalid_response() {
        let err = read_envelope(StatusCode::BAD_GATEWAY, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_gateway_error_mapping() {
        let app: AppError = GatewayError::Timeout.into();
        assert_eq!(app.code, ErrorCode::PaymentGatewayTimeout);
        assert_eq!(app.http_status(), StatusCode::BAD_GATEWAY);

        let app: AppError = GatewayError::Rejected("Channel closed".into()).into();
        assert_eq!(app.code, ErrorCode::PaymentFailed);
        assert_eq!(app.details.unwrap()["gateway_message"], "Channel closed");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = TripayClient::new(
            "https://tripay.co.id/api-sandbox/",
            "key",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://tripay.co.id/api-sandbox");
    }
}
