//! The one-line task encoding: `- [ ] description @due(...) @urgent ...`

use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates::resolve_date;
use crate::models::Task;

static TASK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^- \[([ xX])\] (.+)$").expect("valid task regex"));
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)@(\w+)(?:\(([^)]*)\))?").expect("valid tag regex"));

/// Cheap check for "is this line part of a task run", used when scanning for
/// an insertion point. Full validation happens in [`parse_task_line`].
pub fn looks_like_task(line: &str) -> bool {
    line.trim_start().starts_with("- [")
}

/// Decode one line into a [`Task`].
///
/// Returns `None` for anything outside the checkbox grammar, including
/// malformed checkboxes like `- [?]`; callers skip such lines silently.
/// `source` and `line_number` are left at their defaults for the caller
/// to fill in.
pub fn parse_task_line(line: &str, today: NaiveDate) -> Option<Task> {
    let caps = TASK_RE.captures(line.trim_end())?;
    let done = caps.get(1)?.as_str().eq_ignore_ascii_case("x");
    let payload = caps.get(2)?.as_str();

    // Every @tag lands in a generic map first; known names are projected
    // into typed fields below, unknown ones are stripped but ignored.
    let mut tags: HashMap<String, Option<String>> = HashMap::new();
    for tag in TAG_RE.captures_iter(payload) {
        let name = tag[1].to_lowercase();
        let value = tag.get(2).map(|m| m.as_str().to_string());
        tags.insert(name, value);
    }

    let description = TAG_RE.replace_all(payload, "").trim().to_string();

    // An unresolvable date phrase leaves the field unset, never errors.
    let date_tag = |name: &str| {
        tags.get(name)
            .and_then(|value| value.as_deref())
            .and_then(|value| resolve_date(value, today))
    };

    Some(Task {
        description,
        done,
        due: date_tag("due"),
        urgent: tags.contains_key("urgent"),
        effort: tags.get("effort").and_then(|value| value.clone()),
        done_date: date_tag("done"),
        ..Default::default()
    })
}

/// Encode a task as its canonical one-line form.
///
/// Field order (due, urgent, effort, done) is a contract other tooling
/// relies on for diffing; do not reorder.
pub fn task_to_line(task: &Task) -> String {
    let checkbox = if task.done { "[x]" } else { "[ ]" };
    let mut parts = vec![format!("- {checkbox} {}", task.description)];
    if let Some(due) = task.due {
        parts.push(format!("@due({due})"));
    }
    if task.urgent {
        parts.push("@urgent".to_string());
    }
    if let Some(ref effort) = task.effort {
        parts.push(format!("@effort({effort})"));
    }
    if task.done {
        if let Some(done_date) = task.done_date {
            parts.push(format!("@done({done_date})"));
        }
    }
    parts.join(" ")
}
