//! Types shared between the PMS backend and its clients.

pub mod constants;
pub mod date_range;
pub mod dto;
pub mod money;
pub mod policies;
pub mod types;

pub use constants::*;
pub use date_range::{parse_date, DateRange, DateRangeError};
pub use dto::*;
pub use money::{percent_of, round_money};
pub use policies::{CancellationPolicy, CancellationRule, MealPlan, PaymentPolicy};
pub use types::*;
