//! Shop-owner endpoints

use axum::extract::{Extension, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderStatus};

use crate::auth::CustomerIdentity;
use crate::orders;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShopOrdersQuery {
    pub status: Option<String>,
}

/// GET /api/v1/shops/me/orders?status=
pub async fn shop_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<CustomerIdentity>,
    Query(query): Query<ShopOrdersQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => Some(
            s.parse::<OrderStatus>()
                .map_err(|e| AppError::invalid_field("status", e.to_string()))?,
        ),
        None => None,
    };
    let list = orders::history::shop_orders(state.store.as_ref(), identity.user_id, status).await?;
    Ok(Json(list))
}
