use chrono::NaiveDate;
use pms_shared::{round_money, DateRange, NightlyRate};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::RateSpan;
use crate::error::AppError;

/// Nightly base prices for a stay, one entry per night in order.
#[derive(Debug, Clone, PartialEq)]
pub struct NightlyQuote {
    pub nightly_rates: Vec<NightlyRate>,
    pub total: Decimal,
}

impl NightlyQuote {
    pub fn nights(&self) -> i64 {
        self.nightly_rates.len() as i64
    }

    pub fn first_night_price(&self) -> Decimal {
        self.nightly_rates
            .first()
            .map(|night| night.price)
            .unwrap_or(Decimal::ZERO)
    }
}

/// No active rule covers `date`; the unit type cannot be sold for the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no price defined for {date}")]
pub struct MissingPrice {
    pub date: NaiveDate,
}

impl From<MissingPrice> for AppError {
    fn from(missing: MissingPrice) -> Self {
        AppError::missing_price(missing.date)
    }
}

/// Resolve the price of every night in `stay` against `rules`.
///
/// A night takes the price of the covering rule with the highest priority;
/// equal priorities fall back to the lowest id so the outcome does not depend
/// on the order the rules were loaded in. Unsaved rules rank after every
/// stored one on a tie. Fails on the first night no rule covers.
pub fn resolve_nightly_rates(rules: &[RateSpan], stay: &DateRange) -> Result<NightlyQuote, MissingPrice> {
    let mut nightly_rates = Vec::with_capacity(stay.nights() as usize);

    for date in stay.iter_nights() {
        let winner = rules
            .iter()
            .filter(|rule| rule.range.contains(date))
            .max_by(|a, b| a.priority.cmp(&b.priority).then_with(|| tie_break_id(b).cmp(&tie_break_id(a))))
            .ok_or(MissingPrice { date })?;

        nightly_rates.push(NightlyRate {
            date,
            price: winner.price,
        });
    }

    let total = round_money(nightly_rates.iter().map(|night| night.price).sum());

    Ok(NightlyQuote { nightly_rates, total })
}

fn tie_break_id(rule: &RateSpan) -> Uuid {
    rule.id.unwrap_or(Uuid::from_u128(u128::MAX))
}
