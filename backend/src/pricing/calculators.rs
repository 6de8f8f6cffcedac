//! Stay totals and cancellation arithmetic.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use pms_shared::{round_money, MealPlan};
use rust_decimal::Decimal;

use super::NightlyQuote;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub base_total: Decimal,
    pub meal_surcharge: Decimal,
    pub total_price: Decimal,
}

/// Total for a stay: resolved base prices plus the meal plan surcharge for
/// every guest and night, when a plan with included meals is chosen.
pub fn price_stay(quote: &NightlyQuote, meal_plan: Option<&MealPlan>, pax: i32) -> PriceBreakdown {
    let base_total = quote.total;
    let meal_surcharge = meal_plan
        .map(|plan| plan.surcharge(pax, quote.nights()))
        .unwrap_or(Decimal::ZERO);

    PriceBreakdown {
        base_total,
        meal_surcharge,
        total_price: round_money(base_total + meal_surcharge),
    }
}

/// Whole hours from `now` until check-in at 00:00 UTC on `check_in`,
/// truncated toward zero. Negative once the check-in day has started.
pub fn hours_until_check_in(check_in: NaiveDate, now: DateTime<Utc>) -> i64 {
    let arrival = check_in.and_time(NaiveTime::MIN).and_utc();
    (arrival - now).num_hours()
}

pub fn refund_amount(total_price: Decimal, penalty: Decimal) -> Decimal {
    (total_price - penalty).max(Decimal::ZERO)
}
