//! Pricing engine for the booking core.
//!
//! Pure functions over in-memory rule sets. Callers load the active rules of
//! a unit type, hand them here as [`RateSpan`]s, and persist whatever comes
//! back. Nothing in this module touches the database.

pub mod calculators;
pub mod overlay;
pub mod resolver;

pub use calculators::{hours_until_check_in, price_stay, refund_amount, PriceBreakdown};
pub use overlay::{overlay_rule, OverlayResult};
pub use resolver::{resolve_nightly_rates, MissingPrice, NightlyQuote};

use pms_shared::DateRange;
use rust_decimal::Decimal;
use uuid::Uuid;

/// A price rule as seen by the engine. `id` is `None` for rules that have not
/// been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSpan {
    pub id: Option<Uuid>,
    pub range: DateRange,
    pub price: Decimal,
    pub priority: i32,
}

impl RateSpan {
    pub fn new(range: DateRange, price: Decimal, priority: i32) -> Self {
        Self {
            id: None,
            range,
            price,
            priority,
        }
    }

    /// A copy of this rule's price and priority over another range. The copy
    /// is a new rule and carries no id.
    pub fn fragment(&self, range: DateRange) -> Self {
        Self {
            id: None,
            range,
            price: self.price,
            priority: self.priority,
        }
    }
}
