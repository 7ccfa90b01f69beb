//! Directory-level aggregation across all project documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::document;
use crate::error::Result;
use crate::line::{parse_task_line, task_to_line};
use crate::models::Task;

/// The reserved unsorted document, always surfaced first in listings.
pub const INBOX: &str = "inbox";

/// Candidate cap on an ambiguous fuzzy match.
const MAX_CANDIDATES: usize = 10;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Map a free-form project name onto a document identifier: lowercase,
/// runs of non-alphanumerics collapse to a single hyphen, outer hyphens
/// trimmed. Idempotent, so slugging a slug is a no-op.
pub fn slugify(name: &str) -> String {
    SLUG_RE
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Listing filters shared by every front end.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Free-form project name; slugified before matching.
    pub project: Option<String>,
    pub include_done: bool,
    /// Urgent or overdue.
    pub urgent_only: bool,
    /// Due within 3 days or overdue.
    pub due_soon_only: bool,
}

/// Outcome of a fuzzy completion search.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    NoMatch,
    Completed(Task),
    /// More than one open task matched; nothing was completed and the
    /// caller must disambiguate. Candidates are in listing order, capped.
    Ambiguous(Vec<Task>),
}

/// All task documents under one directory.
pub struct Store {
    root: PathBuf,
    today: NaiveDate,
}

impl Store {
    /// Open a store rooted at `root`, using the local calendar date.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_today(root, Local::now().date_naive())
    }

    /// Open with an explicit `today`, for deterministic date arithmetic.
    pub fn with_today(root: impl Into<PathBuf>, today: NaiveDate) -> Self {
        Store {
            root: root.into(),
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory and a seeded inbox document when missing.
    pub fn ensure_structure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let inbox = self.document_path(INBOX);
        if !inbox.exists() {
            fs::write(&inbox, "# Inbox\n\n## Active\n\n## Done\n")?;
        }
        Ok(())
    }

    fn document_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.md"))
    }

    /// Document slugs, lexicographic, with the inbox moved to the front.
    pub fn documents(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut slugs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("md") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    slugs.push(stem.to_string());
                }
            }
        }
        slugs.sort();
        if let Some(pos) = slugs.iter().position(|s| s == INBOX) {
            let inbox = slugs.remove(pos);
            slugs.insert(0, inbox);
        }
        Ok(slugs)
    }

    /// Tasks from one document, in file order.
    pub fn tasks_in(&self, slug: &str) -> Result<Vec<Task>> {
        document::read_tasks(&self.document_path(slug), slug, self.today)
    }

    /// Every task across every document: inbox first, then the remaining
    /// documents in slug order, each preserving its internal order.
    pub fn all_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        for slug in self.documents()? {
            tasks.extend(self.tasks_in(&slug)?);
        }
        Ok(tasks)
    }

    /// Apply the shared filter contract to a full listing.
    pub fn filtered(&self, filter: &Filter) -> Result<Vec<Task>> {
        let mut tasks = self.all_tasks()?;
        if let Some(ref project) = filter.project {
            let slug = slugify(project);
            tasks.retain(|t| t.source == slug);
        }
        if !filter.include_done {
            tasks.retain(|t| !t.done);
        }
        if filter.urgent_only {
            tasks.retain(|t| t.urgent || t.is_overdue(self.today));
        }
        if filter.due_soon_only {
            tasks.retain(|t| t.is_due_soon(self.today) || t.is_overdue(self.today));
        }
        Ok(tasks)
    }

    /// Encode and append a task, defaulting to the inbox when no project
    /// is given. Returns the slug of the target document.
    pub fn add(&self, task: &Task, project: Option<&str>) -> Result<String> {
        let slug = match project {
            Some(name) => slugify(name),
            None => INBOX.to_string(),
        };
        document::append_line(&self.document_path(&slug), &slug, &task_to_line(task))?;
        debug!(slug, description = %task.description, "added task");
        Ok(slug)
    }

    /// Complete the task at a 1-based position inside one document.
    /// False means the position was stale; nothing was changed.
    pub fn complete_at(&self, slug: &str, line_number: usize) -> Result<bool> {
        document::complete_at(&self.document_path(slug), line_number, self.today)
    }

    /// Open tasks whose description contains `search`, case-insensitively,
    /// in listing order.
    pub fn find_open(&self, search: &str) -> Result<Vec<Task>> {
        let needle = search.to_lowercase();
        Ok(self
            .all_tasks()?
            .into_iter()
            .filter(|t| !t.done && t.description.to_lowercase().contains(&needle))
            .collect())
    }

    /// Fuzzy completion: exactly one open match is completed in place;
    /// several matches come back as candidates for the caller to narrow.
    pub fn fuzzy_complete(&self, search: &str) -> Result<MatchOutcome> {
        let mut matches = self.find_open(search)?;
        match matches.len() {
            0 => Ok(MatchOutcome::NoMatch),
            1 => {
                let task = matches.remove(0);
                self.complete_at(&task.source, task.line_number)?;
                Ok(MatchOutcome::Completed(task))
            }
            _ => {
                matches.truncate(MAX_CANDIDATES);
                Ok(MatchOutcome::Ambiguous(matches))
            }
        }
    }

    /// Move tasks out of one document into others in a single pass.
    ///
    /// `moves` pairs 1-based positions from the caller's most recent read
    /// of `from` with target project names. Removals run highest position
    /// first so an earlier removal never shifts a position still waiting
    /// to be processed; results come back in the caller's original order.
    /// Positions that are out of range or no longer decode as a task are
    /// dropped from the result.
    pub fn relocate(&self, from: &str, moves: &[(usize, String)]) -> Result<Vec<(String, String)>> {
        let from_path = self.document_path(from);

        let mut order: Vec<usize> = (0..moves.len()).collect();
        order.sort_by(|&a, &b| moves[b].0.cmp(&moves[a].0));

        let mut results: Vec<Option<(String, String)>> = vec![None; moves.len()];
        for i in order {
            let (position, ref target) = moves[i];
            let Some(removed) = document::remove_at(&from_path, position)? else {
                continue;
            };
            let Some(task) = parse_task_line(&removed, self.today) else {
                continue;
            };
            let slug = slugify(target);
            document::append_line(&self.document_path(&slug), &slug, &task_to_line(&task))?;
            debug!(from, to = %slug, position, "relocated task");
            results[i] = Some((task.description, slug));
        }
        Ok(results.into_iter().flatten().collect())
    }
}
