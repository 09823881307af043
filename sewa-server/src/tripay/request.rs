//! Signed transaction requests

use serde::Serialize;

use super::signature::transaction_signature;
use super::{GatewayError, MerchantConfig};
use crate::orders::PlacedOrder;

/// One line of the transaction manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestItem {
    pub sku: String,
    pub name: String,
    /// One unit for the whole rental period
    pub price: i64,
    pub quantity: i32,
}

/// Body of `POST /transaction/create`
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub method: String,
    /// Order id, canonical hyphenated form
    pub merchant_ref: String,
    pub amount: i64,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub order_items: Vec<ManifestItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    /// Unix seconds
    pub expired_time: i64,
    pub signature: String,
}

impl TransactionRequest {
    pub fn build(
        placed: &PlacedOrder,
        merchant: &MerchantConfig,
        now_secs: i64,
    ) -> Result<Self, GatewayError> {
        let merchant_ref = placed.order.id.to_string();
        let amount = placed.order.total_price;
        let signature = transaction_signature(
            &merchant.private_key,
            &merchant.merchant_code,
            &merchant_ref,
            amount,
        )
        .map_err(GatewayError::Signing)?;

        Ok(Self {
            method: placed.order.payment_method.clone(),
            merchant_ref,
            amount,
            customer_name: placed.customer.name.clone(),
            customer_email: placed.customer.email.clone(),
            customer_phone: placed.customer.phone.clone(),
            order_items: placed
                .lines
                .iter()
                .map(|line| ManifestItem {
                    sku: line.sku.clone(),
                    name: line.name.clone(),
                    price: line.item.price_at_time_of_order,
                    quantity: line.item.quantity,
                })
                .collect(),
            callback_url: merchant.callback_url.clone(),
            return_url: merchant.return_url.clone(),
            expired_time: now_secs + merchant.expiry_hours * 3600,
            signature,
        })
    }
}
