use pms_shared::DateRange;
use uuid::Uuid;

use super::RateSpan;

/// Rule set after laying a new rule over the existing ones.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayResult {
    /// Every rule that should be active afterwards, ordered by start date.
    pub rules: Vec<RateSpan>,
    /// Stored rules that must be soft-deleted.
    pub retired: Vec<Uuid>,
}

impl OverlayResult {
    /// Rules that have to be inserted: the new rule and any fragments.
    pub fn inserted(&self) -> impl Iterator<Item = &RateSpan> {
        self.rules.iter().filter(|rule| rule.id.is_none())
    }
}

/// Make `new` the only rule over its range.
///
/// Existing rules clear of the new range are kept as they are. A rule that
/// overlaps it is retired and replaced by what is left of it on either side,
/// with the original price and priority. Empty fragments are never emitted.
pub fn overlay_rule(existing: &[RateSpan], new: RateSpan) -> OverlayResult {
    let mut rules = Vec::with_capacity(existing.len() + 2);
    let mut retired = Vec::new();

    for rule in existing {
        if !rule.range.overlaps(&new.range) {
            rules.push(rule.clone());
            continue;
        }

        if let Some(id) = rule.id {
            retired.push(id);
        }

        if let Ok(left) = DateRange::new(rule.range.start(), new.range.start()) {
            rules.push(rule.fragment(left));
        }
        if let Ok(right) = DateRange::new(new.range.end(), rule.range.end()) {
            rules.push(rule.fragment(right));
        }
    }

    rules.push(new);
    rules.sort_by_key(|rule| (rule.range.start(), rule.range.end()));

    OverlayResult { rules, retired }
}
