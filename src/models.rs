use chrono::NaiveDate;
use serde::Serialize;

/// A single checklist entry read from a project document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Task {
    /// Free text with all tag markup stripped.
    pub description: String,
    pub done: bool,
    pub due: Option<NaiveDate>,
    pub urgent: bool,
    /// Free-form estimate, e.g. "2h".
    pub effort: Option<String>,
    /// Set through the normal completion path; a done task read from disk
    /// without one is legal, it just goes unreported.
    pub done_date: Option<NaiveDate>,
    /// Slug of the owning document, e.g. "acme-corp".
    pub source: String,
    /// 1-based line index at read time. Stale after any mutation of the
    /// owning document until it is re-read.
    pub line_number: usize,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Task {
            description: description.into(),
            ..Default::default()
        }
    }

    /// Display name derived from the source slug ("acme-corp" -> "Acme Corp").
    pub fn project_name(&self) -> String {
        if self.source.is_empty() {
            return "Unknown".to_string();
        }
        de_slug(&self.source)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(self.due, Some(due) if !self.done && due < today)
    }

    /// Due within the next 0-3 days inclusive and not done.
    pub fn is_due_soon(&self, today: NaiveDate) -> bool {
        if self.done {
            return false;
        }
        match self.due {
            Some(due) => (0..=3).contains(&(due - today).num_days()),
            None => false,
        }
    }

    /// The task plus its derived report fields, the shape handed to
    /// external consumers (board renderer, bot front ends).
    pub fn snapshot(&self, today: NaiveDate) -> TaskSnapshot {
        TaskSnapshot {
            project: self.project_name(),
            is_overdue: self.is_overdue(today),
            is_due_soon: self.is_due_soon(today),
            task: self.clone(),
        }
    }
}

/// A task with derived fields attached, serialized flat.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSnapshot {
    #[serde(flatten)]
    pub task: Task,
    pub project: String,
    pub is_overdue: bool,
    pub is_due_soon: bool,
}

/// Title-case a slug into a display name: "acme-corp" -> "Acme Corp".
pub fn de_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
