//! Plain-text rendering of a day's list.

use anyhow::{Result, bail};
use daybook_core::{DateKey, Filter, Stats, Task};

const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Resolve a full id or unique prefix against one day's tasks.
pub fn resolve_id(tasks: &[Task], needle: &str) -> Result<String> {
    let needle = needle.trim();
    if needle.is_empty() {
        bail!("task id must not be empty");
    }
    if let Some(t) = tasks.iter().find(|t| t.id == needle) {
        return Ok(t.id.clone());
    }

    let mut hits = tasks.iter().filter(|t| t.id.starts_with(needle));
    match (hits.next(), hits.next()) {
        (Some(t), None) => Ok(t.id.clone()),
        (None, _) => bail!("no task matching '{needle}' on this date"),
        (Some(_), Some(_)) => bail!("'{needle}' matches more than one task; use more characters"),
    }
}

pub fn header(date: DateKey, stats: Stats) -> String {
    format!(
        "{date}  {}\nTotal: {}  Open: {}  Done: {}",
        date.label(),
        stats.total,
        stats.open,
        stats.done
    )
}

pub fn table(tasks: &[Task], filter: Filter) -> String {
    if tasks.is_empty() {
        return match filter {
            Filter::All => "No tasks for this day.".to_string(),
            other => format!("No {other} tasks for this day."),
        };
    }

    let mut out = String::new();
    out.push_str(&format!("{:<8}  {:<4}  {:<8}  {}\n", "ID", "DONE", "PRIORITY", "TITLE"));
    for t in tasks {
        out.push_str(&format!(
            "{:<8}  {:<4}  {:<8}  {}\n",
            short_id(&t.id),
            if t.done { "[x]" } else { "[ ]" },
            t.priority.label(),
            t.title
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_core::Priority;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("Buy milk", Priority::Low).with_id("abcd1234-0000"),
            Task::new("Call mom", Priority::High).with_id("abce9999-0000").with_done(true),
        ]
    }

    #[test]
    fn resolves_unique_prefix_and_full_id() {
        let ts = tasks();
        assert_eq!(resolve_id(&ts, "abcd").unwrap(), "abcd1234-0000");
        assert_eq!(resolve_id(&ts, "abce9999-0000").unwrap(), "abce9999-0000");
    }

    #[test]
    fn ambiguous_or_unknown_prefix_is_an_error() {
        let ts = tasks();
        assert!(resolve_id(&ts, "abc").is_err());
        assert!(resolve_id(&ts, "zzz").is_err());
        assert!(resolve_id(&ts, "  ").is_err());
    }

    #[test]
    fn table_marks_done_rows() {
        let out = table(&tasks(), Filter::All);
        assert!(out.contains("abcd1234  [ ]   Low       Buy milk"));
        assert!(out.contains("abce9999  [x]   High      Call mom"));
    }

    #[test]
    fn empty_table_mentions_filter() {
        assert_eq!(table(&[], Filter::Open), "No open tasks for this day.");
        assert_eq!(table(&[], Filter::All), "No tasks for this day.");
    }

    #[test]
    fn header_has_counts_and_label() {
        let date = DateKey::parse("2024-01-01").unwrap();
        let h = header(date, Stats { total: 3, done: 1, open: 2 });
        assert!(h.starts_with("2024-01-01  Monday, January 1, 2024"));
        assert!(h.ends_with("Total: 3  Open: 2  Done: 1"));
    }
}
