//! Derived views over a day's tasks: status filter and counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Open,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter '{0}' (expected all, open or done)")]
pub struct ParseFilterError(pub String);

impl Filter {
    /// Anything unrecognised shows everything.
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Open => !task.done,
            Filter::Done => task.done,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Open => "open",
            Filter::Done => "done",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "open" => Ok(Filter::Open),
            "done" => Ok(Filter::Done),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Tasks matching `filter`, in their original order.
pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub done: usize,
    pub open: usize,
}

pub fn compute_stats(tasks: &[Task]) -> Stats {
    let total = tasks.len();
    let done = tasks.iter().filter(|t| t.done).count();
    Stats {
        total,
        done,
        open: total - done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn sample() -> Vec<Task> {
        vec![
            Task::new("a", Priority::Low).with_id("a"),
            Task::new("b", Priority::High).with_id("b").with_done(true),
            Task::new("c", Priority::Medium).with_id("c"),
            Task::new("d", Priority::Medium).with_id("d").with_done(true),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn open_and_done_preserve_order() {
        let tasks = sample();
        assert_eq!(ids(&filter_tasks(&tasks, Filter::Open)), ["a", "c"]);
        assert_eq!(ids(&filter_tasks(&tasks, Filter::Done)), ["b", "d"]);
        assert_eq!(ids(&filter_tasks(&tasks, Filter::All)), ["a", "b", "c", "d"]);
    }

    #[test]
    fn unknown_filter_string_means_all() {
        assert_eq!(Filter::from_str_lossy("someday"), Filter::All);
        assert_eq!(Filter::from_str_lossy("Done"), Filter::Done);
        assert!("someday".parse::<Filter>().is_err());
    }

    #[test]
    fn stats_add_up() {
        let s = compute_stats(&sample());
        assert_eq!(s, Stats { total: 4, done: 2, open: 2 });
        assert_eq!(compute_stats(&[]), Stats::default());
    }
}
