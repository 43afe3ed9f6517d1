//! Task model for the per-day list.
//!
//! The serialized shape is the on-disk contract: camelCase keys, priority as a
//! lowercase string, `createdAt` as epoch milliseconds.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid priority '{0}' (expected low, medium or high)")]
pub struct ParsePriorityError(pub String);

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Display label for tables and pickers.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

// Unknown persisted values fall back to the default instead of poisoning the
// whole mapping.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|e: ParsePriorityError| {
            warn!("{e}; using medium");
            Priority::default()
        }))
    }
}

/// A single to-do item.
///
/// `id` and `created_at` are fixed at creation; the store only ever rewrites
/// `title`, `priority` and `done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub done: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Build a fresh open task stamped with the current time.
    ///
    /// The caller is responsible for handing in an already-trimmed title.
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            priority,
            done: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn with_created_at(mut self, millis: i64) -> Self {
        self.created_at = millis;
        self
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }
}

/// Trim a user-supplied title, returning `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_defaults() {
        let t = Task::new("Buy milk", Priority::Low);
        assert!(!t.done);
        assert_eq!(t.priority, Priority::Low);
        assert!(!t.id.is_empty());
        assert!(t.created_at_utc().is_some());
    }

    #[test]
    fn ids_are_unique() {
        let a = Task::new("a", Priority::Medium);
        let b = Task::new("a", Priority::Medium);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn wire_format_uses_camel_case_and_lowercase_priority() {
        let t = Task::new("x", Priority::High)
            .with_id("t1")
            .with_created_at(1_700_000_000_000);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["id"], "t1");
        assert_eq!(v["priority"], "high");
        assert_eq!(v["done"], false);
        assert_eq!(v["createdAt"], 1_700_000_000_000i64);
    }

    #[test]
    fn unknown_priority_decodes_as_medium() {
        let raw = r#"{"id":"a","title":"t","priority":"urgent","done":true,"createdAt":1}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.priority, Priority::Medium);
        assert!(t.done);
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("later".parse::<Priority>().is_err());
    }

    #[test]
    fn normalize_title_rejects_blank() {
        assert_eq!(normalize_title("   "), None);
        assert_eq!(normalize_title("  Buy milk \n").as_deref(), Some("Buy milk"));
    }
}
