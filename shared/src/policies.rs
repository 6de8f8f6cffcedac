//! Rate-plan policy value objects.
//!
//! These are stored as JSONB on the rate plan and exposed verbatim on
//! availability offers. The computations here are pure; nothing is charged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{percent_of, round_money};
use crate::types::{MealPlanType, PaymentMethod, PaymentTiming, PenaltyType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(rename = "type")]
    pub meal_type: MealPlanType,
    pub included: bool,
    pub price_per_pax: Decimal,
}

impl MealPlan {
    /// Per-stay meal charge: `price_per_pax * pax * nights` when the meal is
    /// included in the plan, zero otherwise.
    pub fn surcharge(&self, pax: i32, nights: i64) -> Decimal {
        if !self.included {
            return Decimal::ZERO;
        }
        round_money(self.price_per_pax * Decimal::from(pax) * Decimal::from(nights))
    }
}

impl Default for MealPlan {
    fn default() -> Self {
        Self {
            meal_type: MealPlanType::RoomOnly,
            included: false,
            price_per_pax: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationRule {
    pub hours_before_check_in: i64,
    pub penalty_type: PenaltyType,
    pub penalty_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationPolicy {
    pub is_refundable: bool,
    #[serde(default)]
    pub rules: Vec<CancellationRule>,
}

impl Default for CancellationPolicy {
    /// Fully refundable, no penalty windows.
    fn default() -> Self {
        Self {
            is_refundable: true,
            rules: Vec::new(),
        }
    }
}

impl CancellationPolicy {
    /// The rule in force when cancelling `hours_until_check_in` hours before
    /// arrival: among rules whose window has been entered
    /// (`hours_until_check_in <= hours_before_check_in`), the one with the
    /// smallest window.
    pub fn applicable_rule(&self, hours_until_check_in: i64) -> Option<&CancellationRule> {
        self.rules
            .iter()
            .filter(|rule| hours_until_check_in <= rule.hours_before_check_in)
            .min_by_key(|rule| rule.hours_before_check_in)
    }

    /// Penalty retained on cancellation, always within `[0, total_price]`.
    pub fn calculate_penalty(
        &self,
        total_price: Decimal,
        first_night_price: Decimal,
        hours_until_check_in: i64,
    ) -> Decimal {
        if !self.is_refundable {
            return total_price;
        }

        let Some(rule) = self.applicable_rule(hours_until_check_in) else {
            return Decimal::ZERO;
        };

        let penalty = match rule.penalty_type {
            PenaltyType::Fixed => rule.penalty_value,
            PenaltyType::Percent => percent_of(total_price, rule.penalty_value),
            PenaltyType::Nights => first_night_price * rule.penalty_value,
        };

        round_money(penalty).clamp(Decimal::ZERO, total_price.max(Decimal::ZERO))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPolicy {
    pub timing: PaymentTiming,
    pub method: PaymentMethod,
    pub prepay_percent: Decimal,
}

impl PaymentPolicy {
    /// Amount due up front; the percentage is clamped to `[0, 100]`.
    pub fn prepayment(&self, total_price: Decimal) -> Decimal {
        let percent = self.prepay_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        percent_of(total_price, percent)
    }
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self {
            timing: PaymentTiming::AtCheckIn,
            method: PaymentMethod::Card,
            prepay_percent: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal_macros::dec;

    fn rule(hours: i64, penalty_type: PenaltyType, value: Decimal) -> CancellationRule {
        CancellationRule {
            hours_before_check_in: hours,
            penalty_type,
            penalty_value: value,
        }
    }

    #[test]
    fn test_percent_rule_inside_and_outside_window() {
        let policy = CancellationPolicy {
            is_refundable: true,
            rules: vec![rule(48, PenaltyType::Percent, dec!(100))],
        };

        assert_eq!(policy.calculate_penalty(dec!(400), dec!(100), 24), dec!(400));
        assert_eq!(policy.calculate_penalty(dec!(400), dec!(100), 72), dec!(0));
        assert_eq!(policy.calculate_penalty(dec!(400), dec!(100), 48), dec!(400));
    }

    #[test]
    fn test_non_refundable_keeps_everything() {
        let policy = CancellationPolicy {
            is_refundable: false,
            rules: vec![rule(24, PenaltyType::Fixed, dec!(10))],
        };
        assert_eq!(policy.calculate_penalty(dec!(350), dec!(100), 500), dec!(350));
    }

    #[test]
    fn test_refundable_without_rules_is_free() {
        let policy = CancellationPolicy::default();
        assert_eq!(policy.calculate_penalty(dec!(350), dec!(100), 0), dec!(0));
    }

    #[test]
    fn test_smallest_triggered_window_wins() {
        let policy = CancellationPolicy {
            is_refundable: true,
            rules: vec![
                rule(168, PenaltyType::Percent, dec!(25)),
                rule(48, PenaltyType::Nights, dec!(1)),
                rule(24, PenaltyType::Percent, dec!(100)),
            ],
        };

        // 100 hours out: only the 168h window is entered
        assert_eq!(policy.calculate_penalty(dec!(400), dec!(150), 100), dec!(100));
        // 30 hours out: 168h and 48h windows entered, 48h is the smallest
        assert_eq!(policy.calculate_penalty(dec!(400), dec!(150), 30), dec!(150));
        // 2 hours out: all entered, 24h is the smallest
        assert_eq!(policy.calculate_penalty(dec!(400), dec!(150), 2), dec!(400));
        // after check-in time the tightest window still applies
        assert_eq!(policy.calculate_penalty(dec!(400), dec!(150), -5), dec!(400));
    }

    #[test]
    fn test_penalty_clamped_to_total() {
        let policy = CancellationPolicy {
            is_refundable: true,
            rules: vec![rule(72, PenaltyType::Fixed, dec!(1000))],
        };
        assert_eq!(policy.calculate_penalty(dec!(300), dec!(100), 10), dec!(300));

        let nights = CancellationPolicy {
            is_refundable: true,
            rules: vec![rule(72, PenaltyType::Nights, dec!(5))],
        };
        assert_eq!(nights.calculate_penalty(dec!(300), dec!(100), 10), dec!(300));
    }

    fn random_policy(rng: &mut StdRng, monotone: bool) -> CancellationPolicy {
        let count = rng.gen_range(0..5);
        let mut hours: Vec<i64> = (0..count).map(|_| rng.gen_range(0..400)).collect();
        hours.sort_unstable();
        hours.dedup();

        // Monotone policies charge more percent the closer the window is to arrival.
        let mut percent = dec!(100);
        let rules = hours
            .into_iter()
            .map(|h| {
                let penalty_type = if monotone {
                    PenaltyType::Percent
                } else {
                    match rng.gen_range(0..3) {
                        0 => PenaltyType::Fixed,
                        1 => PenaltyType::Percent,
                        _ => PenaltyType::Nights,
                    }
                };
                let value = if monotone {
                    percent = (percent - Decimal::from(rng.gen_range(0..30))).max(Decimal::ZERO);
                    percent
                } else {
                    Decimal::from(rng.gen_range(0..2000))
                };
                rule(h, penalty_type, value)
            })
            .collect();

        CancellationPolicy {
            is_refundable: monotone || rng.gen_bool(0.8),
            rules,
        }
    }

    #[test]
    fn test_penalty_never_exceeds_total() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let policy = random_policy(&mut rng, false);
            let total = Decimal::from(rng.gen_range(1..5000));
            let first_night = Decimal::from(rng.gen_range(1..1000));
            let hours = rng.gen_range(-48..500);

            let penalty = policy.calculate_penalty(total, first_night, hours);
            assert!(penalty >= Decimal::ZERO);
            assert!(penalty <= total, "{penalty} > {total} for {policy:?}");
        }
    }

    #[test]
    fn test_penalty_non_increasing_as_notice_grows() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let policy = random_policy(&mut rng, true);
            let total = Decimal::from(rng.gen_range(1..5000));

            let mut previous = policy.calculate_penalty(total, dec!(100), -24);
            for hours in -23..450 {
                let penalty = policy.calculate_penalty(total, dec!(100), hours);
                assert!(penalty <= previous, "penalty rose at {hours}h for {policy:?}");
                previous = penalty;
            }
        }
    }

    #[test]
    fn test_meal_surcharge() {
        let breakfast = MealPlan {
            meal_type: MealPlanType::Breakfast,
            included: true,
            price_per_pax: dec!(12.50),
        };
        assert_eq!(breakfast.surcharge(3, 4), dec!(150.00));

        let not_included = MealPlan {
            included: false,
            ..breakfast
        };
        assert_eq!(not_included.surcharge(3, 4), dec!(0));
    }

    #[test]
    fn test_prepayment_is_clamped() {
        let policy = PaymentPolicy {
            timing: PaymentTiming::AtBooking,
            method: PaymentMethod::Card,
            prepay_percent: dec!(30),
        };
        assert_eq!(policy.prepayment(dec!(450)), dec!(135.00));

        let over = PaymentPolicy {
            prepay_percent: dec!(150),
            ..policy
        };
        assert_eq!(over.prepayment(dec!(450)), dec!(450));
    }

    #[test]
    fn test_policy_json_shape() {
        let policy: CancellationPolicy = serde_json::from_str(
            r#"{"is_refundable":true,"rules":[{"hours_before_check_in":48,"penalty_type":"PERCENT","penalty_value":100}]}"#,
        )
        .unwrap();
        assert_eq!(policy.rules[0].penalty_type, PenaltyType::Percent);

        let meal: MealPlan =
            serde_json::from_str(r#"{"type":"HALF_BOARD","included":true,"price_per_pax":20}"#)
                .unwrap();
        assert_eq!(meal.meal_type, MealPlanType::HalfBoard);
    }
}
