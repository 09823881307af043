//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded once at startup and handed to [`crate::state::AppState::new`]
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Connection pool size
    pub database_max_connections: u32,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for customer bearer tokens
    pub jwt_secret: String,
    /// Tripay API key (Bearer auth on outbound calls)
    pub tripay_api_key: String,
    /// Tripay private key (transaction + callback HMAC)
    pub tripay_private_key: String,
    pub tripay_merchant_code: String,
    /// Gateway base URL, sandbox by default
    pub tripay_base_url: String,
    pub tripay_callback_url: Option<String>,
    pub tripay_return_url: Option<String>,
    /// Bound on every gateway call
    pub tripay_timeout_secs: u64,
    /// Transaction lifetime
    pub payment_expiry_hours: i64,
    /// Processed callbacks retained in the ledger
    pub callback_history_cap: i64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.is_empty())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            database_max_connections: Self::parsed("DATABASE_MAX_CONNECTIONS", 10),
            http_port: Self::parsed("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            tripay_api_key: Self::require_secret("TRIPAY_API_KEY", &environment)?,
            tripay_private_key: Self::require_secret("TRIPAY_PRIVATE_KEY", &environment)?,
            tripay_merchant_code: Self::require_secret("TRIPAY_MERCHANT_CODE", &environment)?,
            tripay_base_url: std::env::var("TRIPAY_BASE_URL")
                .unwrap_or_else(|_| "https://tripay.co.id/api-sandbox".into()),
            tripay_callback_url: Self::optional("TRIPAY_CALLBACK_URL"),
            tripay_return_url: Self::optional("TRIPAY_RETURN_URL"),
            tripay_timeout_secs: Self::parsed("TRIPAY_TIMEOUT_SECS", 15),
            payment_expiry_hours: Self::parsed("PAYMENT_EXPIRY_HOURS", 24),
            callback_history_cap: Self::parsed("CALLBACK_HISTORY_CAP", 10_000),
            environment,
        })
    }
}
