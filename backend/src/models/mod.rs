//! Database models for the booking core.
//!
//! Each model corresponds to a table and provides its queries via sqlx. Query
//! functions take any `PgExecutor`, so the same call runs against the pool for
//! plain reads or against an open transaction (`&mut *tx`) where the caller
//! needs the read to see its own locks and writes.

pub mod guest;
pub mod price_rule;
pub mod rate_plan;
pub mod reservation;
pub mod unit_type;

pub use guest::Guest;
pub use price_rule::PriceRule;
pub use rate_plan::RatePlan;
pub use reservation::{NewReservation, Reservation};
pub use unit_type::UnitType;

use pms_shared::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Page-based pagination helper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip. Saturates for page numbers past any real result set.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}
