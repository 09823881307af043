//! Shop and customer models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::ShopSummary;

/// Vendor shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shop {
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    pub shop_name: String,
    pub shop_address: String,
    pub shop_phone_number: String,
    pub shop_profile_image_url: String,
}

impl Shop {
    pub fn summary(&self) -> ShopSummary {
        ShopSummary {
            shop_name: self.shop_name.clone(),
            shop_address: self.shop_address.clone(),
            shop_phone_number: self.shop_phone_number.clone(),
            shop_profile_image_url: self.shop_profile_image_url.clone(),
        }
    }
}

/// Customer identity forwarded to the payment gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}
