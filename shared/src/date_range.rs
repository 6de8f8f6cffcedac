//! Half-open calendar date ranges.
//!
//! `[start, end)` covers the nights `start, start + 1, ..., end - 1`. Check-in
//! happens on `start` and check-out on `end`, so two ranges that merely touch
//! (one ends on the day the other starts) do not overlap.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DATE_FORMAT;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateRangeError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidFormat(String),

    #[error("end date {end} must be after start date {start}")]
    NotIncreasing { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateRangeError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidFormat(value.to_string()))
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if end <= start {
            return Err(DateRangeError::NotIncreasing { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds; format errors win over ordering errors.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights, always >= 1.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn iter_nights(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.nights()).map(move |offset| start + Duration::days(offset))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        DateRange::new(self.start.max(other.start), self.end.min(other.end)).ok()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_four_nights_in_half_open_range() {
        let range = DateRange::parse("2025-01-01", "2025-01-05").unwrap();
        assert_eq!(range.nights(), 4);

        let nights: Vec<NaiveDate> = range.iter_nights().collect();
        assert_eq!(
            nights,
            vec![d("2025-01-01"), d("2025-01-02"), d("2025-01-03"), d("2025-01-04")]
        );
        assert!(!range.contains(d("2025-01-05")));
    }

    #[test]
    fn test_single_night() {
        let range = DateRange::parse("2025-06-02", "2025-06-03").unwrap();
        assert_eq!(range.nights(), 1);
        assert_eq!(range.iter_nights().count(), 1);
    }

    #[test]
    fn test_rejects_zero_length_and_inverted() {
        assert!(matches!(
            DateRange::parse("2025-06-02", "2025-06-02"),
            Err(DateRangeError::NotIncreasing { .. })
        ));
        assert!(matches!(
            DateRange::parse("2025-06-05", "2025-06-02"),
            Err(DateRangeError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_format() {
        assert_eq!(
            DateRange::parse("2025/06/02", "2025-06-05"),
            Err(DateRangeError::InvalidFormat("2025/06/02".to_string()))
        );
        assert!(matches!(
            DateRange::parse("2025-06-02", "2025-02-30"),
            Err(DateRangeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let first = DateRange::parse("2025-08-01", "2025-08-03").unwrap();
        let second = DateRange::parse("2025-08-03", "2025-08-05").unwrap();
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
        assert_eq!(first.intersection(&second), None);
    }

    #[test]
    fn test_intersection() {
        let outer = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
        let inner = DateRange::parse("2025-01-10", "2025-02-15").unwrap();
        assert!(outer.overlaps(&inner));
        assert_eq!(
            outer.intersection(&inner),
            Some(DateRange::parse("2025-01-10", "2025-01-31").unwrap())
        );
    }

    #[test]
    fn test_deserialize_rejects_inverted_range() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2025-01-01","end":"2025-01-03"}"#).unwrap();
        assert_eq!(ok.nights(), 2);

        let bad = serde_json::from_str::<DateRange>(r#"{"start":"2025-01-03","end":"2025-01-01"}"#);
        assert!(bad.is_err());
    }
}
