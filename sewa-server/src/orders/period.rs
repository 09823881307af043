//! Rental period

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};

/// Inclusive date range `[start, end]`, `end >= start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl RentalPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::new(ErrorCode::OrderInvalidDateRange)
                .with_detail("start_date", start.to_string())
                .with_detail("end_date", end.to_string()));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whole days between start and end, at least one
    pub fn billable_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}
