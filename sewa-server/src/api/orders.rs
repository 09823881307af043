//! Order endpoints
//!
//! - POST /api/v1/orders: create order + open gateway transaction
//! - GET  /api/v1/orders/me: caller's order history
//! - POST /api/v1/orders/{id}/cancel: customer cancellation
//! - PUT  /api/v1/orders/{id}/status: shop status update

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::NaiveDate;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderHistory, OrderStatus};
use validator::Validate;

use super::{json_body, parse_uuid};
use crate::auth::CustomerIdentity;
use crate::orders::{self, NewOrder, NewOrderItem, RentalPeriod};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub shop_id: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD
    pub end_date: String,
    #[validate(length(min = 1, max = 64))]
    pub payment_method: String,
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::invalid_field(field, format!("Invalid {field} format, use YYYY-MM-DD"))
    })
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, AppError> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
            fields.sort();
            return Err(AppError::validation("Invalid order request").with_detail("fields", fields));
        }

        let shop_id = parse_uuid("shop_id", &self.shop_id)?;
        let start = parse_date("start_date", &self.start_date)?;
        let end = parse_date("end_date", &self.end_date)?;
        let items = self
            .items
            .iter()
            .map(|item| {
                Ok(NewOrderItem {
                    product_id: parse_uuid("product_id", &item.product_id)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(NewOrder {
            shop_id,
            payment_method: self.payment_method,
            period: RentalPeriod::new(start, end)?,
            items,
        })
    }
}

/// POST /api/v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<CustomerIdentity>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let req = json_body(payload)?.into_new_order()?;
    let data = orders::checkout::checkout(
        state.store.as_ref(),
        state.gateway.as_ref(),
        &state.merchant,
        identity.user_id,
        req,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(data)))
}

/// GET /api/v1/orders/me
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<CustomerIdentity>,
) -> AppResult<Json<Vec<OrderHistory>>> {
    let history = orders::history::customer_history(state.store.as_ref(), identity.user_id).await?;
    Ok(Json(history))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// POST /api/v1/orders/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(identity): Extension<CustomerIdentity>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let order_id = parse_uuid("id", &id)?;
    orders::lifecycle::cancel_by_customer(state.store.as_ref(), identity.user_id, order_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Order has been successfully cancelled",
        status: None,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PUT /api/v1/orders/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(identity): Extension<CustomerIdentity>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let order_id = parse_uuid("id", &id)?;
    let req = json_body(payload)?;
    let next: OrderStatus = req.status.parse().map_err(|_| {
        AppError::with_message(ErrorCode::ValidationFailed, "Invalid status value")
            .with_detail("field", "status")
    })?;

    let order =
        orders::lifecycle::update_by_shop(state.store.as_ref(), identity.user_id, order_id, next)
            .await?;
    Ok(Json(MessageResponse {
        message: "Order status updated successfully",
        status: Some(order.status),
    }))
}
