//! Application state for sewa-server

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::db::{PgStore, RentalStore};
use crate::tripay::{MerchantConfig, PaymentGateway, TripayClient};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage backend (PostgreSQL in production)
    pub store: Arc<dyn RentalStore>,
    /// Payment gateway client
    pub gateway: Arc<dyn PaymentGateway>,
    /// Merchant identity for signed transactions and callback verification
    pub merchant: Arc<MerchantConfig>,
    /// JWT secret for customer authentication
    pub jwt_secret: String,
    /// Processed callbacks retained in the ledger
    pub callback_history_cap: i64,
}

impl AppState {
    /// Connect the pool, run migrations and build the gateway client
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let gateway = TripayClient::new(
            &config.tripay_base_url,
            &config.tripay_api_key,
            Duration::from_secs(config.tripay_timeout_secs),
        )?;

        Ok(Self::from_parts(
            Arc::new(PgStore::new(pool)),
            Arc::new(gateway),
            MerchantConfig {
                merchant_code: config.tripay_merchant_code.clone(),
                private_key: config.tripay_private_key.clone(),
                callback_url: config.tripay_callback_url.clone(),
                return_url: config.tripay_return_url.clone(),
                expiry_hours: config.payment_expiry_hours,
            },
            config.jwt_secret.clone(),
            config.callback_history_cap,
        ))
    }

    pub fn from_parts(
        store: Arc<dyn RentalStore>,
        gateway: Arc<dyn PaymentGateway>,
        merchant: MerchantConfig,
        jwt_secret: String,
        callback_history_cap: i64,
    ) -> Self {
        Self {
            store,
            gateway,
            merchant: Arc::new(merchant),
            jwt_secret,
            callback_history_cap,
        }
    }
}
