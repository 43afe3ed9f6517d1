//! Date keys: local calendar days in canonical `YYYY-MM-DD` form.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{input}': expected YYYY-MM-DD")]
pub struct ParseDateKeyError {
    pub input: String,
}

/// Grouping key for the task mapping.
///
/// Wraps a `NaiveDate`, so ordering is chronological and equality matches
/// equality of the canonical strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today according to the local clock.
    pub fn today() -> Self {
        Self::from_datetime(Local::now())
    }

    /// Truncate a local timestamp to its calendar day.
    pub fn from_datetime(dt: DateTime<Local>) -> Self {
        Self(dt.date_naive())
    }

    /// Only the zero-padded canonical form is accepted; `2024-1-1` is rejected
    /// so that distinct strings never collapse onto one key.
    pub fn parse(s: &str) -> Result<Self, ParseDateKeyError> {
        let err = || ParseDateKeyError {
            input: s.to_string(),
        };
        let date = NaiveDate::parse_from_str(s, CANONICAL_FORMAT).map_err(|_| err())?;
        if date.format(CANONICAL_FORMAT).to_string() != s {
            return Err(err());
        }
        Ok(Self(date))
    }

    pub fn succ(&self) -> Self {
        self.0.succ_opt().map(Self).unwrap_or(*self)
    }

    pub fn pred(&self) -> Self {
        self.0.pred_opt().map(Self).unwrap_or(*self)
    }

    /// Long human label, e.g. "Monday, January 1, 2024".
    pub fn label(&self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = ParseDateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn canonical_string_is_zero_padded() {
        let k = DateKey::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(k.to_string(), "2024-01-05");
    }

    #[test]
    fn parse_roundtrips_and_rejects_garbage() {
        let k = DateKey::parse("2024-02-29").unwrap();
        assert_eq!(k.to_string(), "2024-02-29");
        assert!(DateKey::parse("2023-02-29").is_err());
        assert!(DateKey::parse("01/02/2024").is_err());
        assert!(DateKey::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_canonical_forms() {
        assert!(DateKey::parse("2024-1-1").is_err());
        assert!(DateKey::parse("2024-01-1").is_err());
        assert!(DateKey::parse(" 2024-01-01").is_err());
        assert!(DateKey::parse("2024-01-01 ").is_err());
        assert!(serde_json::from_str::<DateKey>("\"2024-1-1\"").is_err());
    }

    #[test]
    fn local_datetime_truncates_to_day() {
        let dt = Local.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap();
        assert_eq!(DateKey::from_datetime(dt).to_string(), "2024-03-10");
    }

    #[test]
    fn succ_and_pred_cross_month_boundaries() {
        let k = DateKey::parse("2024-01-31").unwrap();
        assert_eq!(k.succ().to_string(), "2024-02-01");
        assert_eq!(k.succ().pred(), k);
    }

    #[test]
    fn label_is_long_form() {
        let k = DateKey::parse("2024-01-01").unwrap();
        assert_eq!(k.label(), "Monday, January 1, 2024");
    }

    #[test]
    fn serializes_as_plain_string() {
        let k = DateKey::parse("2024-01-01").unwrap();
        assert_eq!(serde_json::to_string(&k).unwrap(), "\"2024-01-01\"");
        let back: DateKey = serde_json::from_str("\"2024-01-01\"").unwrap();
        assert_eq!(back, k);
    }
}
