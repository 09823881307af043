//! Service-layer error type for sewa-server
//!
//! `ServiceError` joins storage failures (`StoreError`) and business-rule
//! errors (`AppError`) so service code can use `?` on both.

use shared::error::{AppError, ErrorCode};

use crate::db::StoreError;

/// Service-layer error
///
/// - `Store`: storage failure (logged once, surfaces as `DatabaseError`)
/// - `App`: business-rule error, passed to the client as is
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(store_err) => {
                tracing::error!(error = %store_err, "Storage error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
