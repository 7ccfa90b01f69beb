//! Positional read/write access to a single project document.
//!
//! A document is a plain UTF-8 text file: a `# Title` heading, a
//! `## Active` section holding open task lines, and a `## Done` section
//! holding completed ones. Lines outside the task grammar are opaque and
//! survive every mutation untouched. Each mutation is a full
//! read-modify-write of the whole line sequence.

use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::line::{looks_like_task, parse_task_line, task_to_line};
use crate::models::{Task, de_slug};

/// Read a document into lines. A missing file is an empty document, never
/// an error; anything else (permissions, disk) is fatal and propagates.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

/// Index of a section header, matched on trimmed, case-insensitive text.
/// The first occurrence is authoritative; duplicate headers later in the
/// document are undefined behavior and deliberately not merged.
fn section_index(lines: &[String], header: &str) -> Option<usize> {
    lines.iter().position(|l| l.trim().eq_ignore_ascii_case(header))
}

/// Decode every task line in the document, top to bottom.
///
/// Each task carries the owning `slug` and its 1-based line number, valid
/// until the next mutation of this document. Undecodable lines are skipped.
pub fn read_tasks(path: &Path, slug: &str, today: NaiveDate) -> Result<Vec<Task>> {
    let lines = read_lines(path)?;
    let mut tasks = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if let Some(mut task) = parse_task_line(line, today) {
            task.source = slug.to_string();
            task.line_number = i + 1;
            tasks.push(task);
        }
    }
    Ok(tasks)
}

/// The display title: first `# Title` line wins, falling back to the
/// de-slugged identifier when the file or heading is missing.
pub fn project_heading(path: &Path, slug: &str) -> Result<String> {
    for line in read_lines(path)? {
        if let Some(rest) = line.trim().strip_prefix("# ") {
            if !rest.trim().is_empty() {
                return Ok(rest.trim().to_string());
            }
        }
    }
    Ok(de_slug(slug))
}

/// Append an already-encoded task line under `## Active`.
///
/// Creates the document (title, Active section with the new line, empty
/// Done section) when absent. Otherwise the line lands immediately after
/// the last contiguous task line following the Active header, so free-text
/// notes a user placed below the tasks stay below. A document without an
/// Active header gets one appended at the end.
pub fn append_line(path: &Path, slug: &str, task_line: &str) -> Result<()> {
    if !path.exists() {
        let heading = de_slug(slug);
        fs::write(path, format!("# {heading}\n\n## Active\n{task_line}\n\n## Done\n"))?;
        debug!(path = %path.display(), "created document");
        return Ok(());
    }

    let mut lines = read_lines(path)?;
    match section_index(&lines, "## active") {
        Some(active_idx) => {
            let mut insert = active_idx + 1;
            while insert < lines.len() && looks_like_task(&lines[insert]) {
                insert += 1;
            }
            lines.insert(insert, task_line.to_string());
        }
        None => {
            lines.push(String::new());
            lines.push("## Active".to_string());
            lines.push(task_line.to_string());
        }
    }
    write_lines(path, &lines)
}

/// Flip the task at a 1-based line number to done and move it under
/// `## Done` (created at end-of-document when missing). The only path a
/// task takes from Active to Done.
///
/// Returns `Ok(false)` without touching the file when the position is
/// stale: out of range, not a task line, or already done.
pub fn complete_at(path: &Path, line_number: usize, today: NaiveDate) -> Result<bool> {
    let mut lines = read_lines(path)?;
    if line_number == 0 || line_number > lines.len() {
        return Ok(false);
    }
    let idx = line_number - 1;
    let Some(mut task) = parse_task_line(&lines[idx], today) else {
        return Ok(false);
    };
    if task.done {
        return Ok(false);
    }

    task.done = true;
    task.done_date = Some(today);
    let completed = task_to_line(&task);

    lines.remove(idx);
    match section_index(&lines, "## done") {
        Some(done_idx) => lines.insert(done_idx + 1, completed),
        None => {
            lines.push(String::new());
            lines.push("## Done".to_string());
            lines.push(completed);
        }
    }
    debug!(path = %path.display(), line_number, "completed task");
    write_lines(path, &lines)?;
    Ok(true)
}

/// Delete the line at a 1-based position outright, returning its text.
/// Out of range returns `Ok(None)` and leaves the file alone.
pub fn remove_at(path: &Path, line_number: usize) -> Result<Option<String>> {
    let mut lines = read_lines(path)?;
    if line_number == 0 || line_number > lines.len() {
        return Ok(None);
    }
    let removed = lines.remove(line_number - 1);
    write_lines(path, &lines)?;
    debug!(path = %path.display(), line_number, "removed line");
    Ok(Some(removed.trim_end().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    fn doc(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_missing_document_is_empty() {
        let dir = TempDir::new().unwrap();
        let tasks = read_tasks(&dir.path().join("nope.md"), "nope", today()).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_read_assigns_positions_and_source() {
        let dir = TempDir::new().unwrap();
        let path = doc(
            &dir,
            "acme-corp.md",
            "# Acme Corp\n\n## Active\n- [ ] First\n- [ ] Second\n\n## Done\n- [x] Old @done(2024-06-01)\n",
        );
        let tasks = read_tasks(&path, "acme-corp", today()).unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].line_number, 4);
        assert_eq!(tasks[1].line_number, 5);
        assert_eq!(tasks[2].line_number, 8);
        assert!(tasks.iter().all(|t| t.source == "acme-corp"));
    }

    #[test]
    fn test_malformed_line_does_not_abort_read() {
        let dir = TempDir::new().unwrap();
        let path = doc(
            &dir,
            "x.md",
            "## Active\n- [?] broken\n- [ ] valid task\n",
        );
        let tasks = read_tasks(&path, "x", today()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "valid task");
    }

    #[test]
    fn test_heading_first_match_or_de_slug() {
        let dir = TempDir::new().unwrap();
        let path = doc(&dir, "a.md", "some prose\n# Real Title\n# Second Title\n");
        assert_eq!(project_heading(&path, "a").unwrap(), "Real Title");

        let missing = dir.path().join("acme-corp.md");
        assert_eq!(project_heading(&missing, "acme-corp").unwrap(), "Acme Corp");
    }

    #[test]
    fn test_append_creates_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("acme-corp.md");
        append_line(&path, "acme-corp", "- [ ] First task").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "# Acme Corp\n\n## Active\n- [ ] First task\n\n## Done\n"
        );

        let tasks = read_tasks(&path, "acme-corp", today()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(!tasks[0].done);
        assert_eq!(tasks[0].description, "First task");
    }

    #[test]
    fn test_append_after_last_contiguous_task() {
        let dir = TempDir::new().unwrap();
        let path = doc(
            &dir,
            "p.md",
            "# P\n\n## Active\n- [ ] one\n- [ ] two\n\n## Done\n",
        );
        append_line(&path, "p", "- [ ] three").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "# P\n\n## Active\n- [ ] one\n- [ ] two\n- [ ] three\n\n## Done\n");
    }

    #[test]
    fn test_append_preserves_notes_below_tasks() {
        let dir = TempDir::new().unwrap();
        let path = doc(
            &dir,
            "p.md",
            "## Active\n- [ ] one\nremember the deadline\n\n## Done\n",
        );
        append_line(&path, "p", "- [ ] two").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "## Active\n- [ ] one\n- [ ] two\nremember the deadline\n\n## Done\n"
        );
    }

    #[test]
    fn test_append_without_active_section() {
        let dir = TempDir::new().unwrap();
        let path = doc(&dir, "p.md", "# Just A Title\n");
        append_line(&path, "p", "- [ ] task").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "# Just A Title\n\n## Active\n- [ ] task\n");
    }

    #[test]
    fn test_complete_moves_task_to_done() {
        let dir = TempDir::new().unwrap();
        let path = doc(
            &dir,
            "p.md",
            "# P\n\n## Active\n- [ ] one @due(2024-06-07)\n- [ ] two\n\n## Done\n",
        );

        let before = read_tasks(&path, "p", today()).unwrap();
        assert_eq!(before.len(), 2);

        assert!(complete_at(&path, 4, today()).unwrap());

        let after = read_tasks(&path, "p", today()).unwrap();
        assert_eq!(after.len(), 2, "total task count unchanged");

        let done: Vec<&Task> = after.iter().filter(|t| t.done).collect();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].description, "one");
        assert_eq!(done[0].done_date, Some(today()));

        // The completed line sits directly under the Done header.
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "# P\n\n## Active\n- [ ] two\n\n## Done\n- [x] one @due(2024-06-07) @done(2024-06-05)\n"
        );
    }

    #[test]
    fn test_complete_creates_done_section() {
        let dir = TempDir::new().unwrap();
        let path = doc(&dir, "p.md", "## Active\n- [ ] solo\n");
        assert!(complete_at(&path, 2, today()).unwrap());
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "## Active\n\n## Done\n- [x] solo @done(2024-06-05)\n");
    }

    #[test]
    fn test_complete_is_noop_on_stale_positions() {
        let dir = TempDir::new().unwrap();
        let path = doc(
            &dir,
            "p.md",
            "# P\n\n## Active\n- [ ] open\n\n## Done\n- [x] already @done(2024-06-01)\n",
        );
        let before = fs::read_to_string(&path).unwrap();

        assert!(!complete_at(&path, 1, today()).unwrap(), "heading line");
        assert!(!complete_at(&path, 7, today()).unwrap(), "already done");
        assert!(!complete_at(&path, 99, today()).unwrap(), "out of range");
        assert!(!complete_at(&path, 0, today()).unwrap(), "zero position");

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_remove_at() {
        let dir = TempDir::new().unwrap();
        let path = doc(&dir, "p.md", "- [ ] one\n- [ ] two\n");
        assert_eq!(remove_at(&path, 1).unwrap().as_deref(), Some("- [ ] one"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "- [ ] two\n");
        assert_eq!(remove_at(&path, 5).unwrap(), None);
    }

    #[test]
    fn test_descending_removals_keep_positions_valid() {
        let dir = TempDir::new().unwrap();
        let path = doc(&dir, "p.md", "- [ ] one\n- [ ] two\n- [ ] three\n");

        // Highest position first: removing line 3 then line 1 leaves the
        // task that was at position 2, now at position 1.
        assert!(remove_at(&path, 3).unwrap().is_some());
        assert!(remove_at(&path, 1).unwrap().is_some());

        let tasks = read_tasks(&path, "p", today()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "two");
        assert_eq!(tasks[0].line_number, 1);
    }

    #[test]
    fn test_mutations_preserve_opaque_lines() {
        let dir = TempDir::new().unwrap();
        let path = doc(
            &dir,
            "p.md",
            "# P\nsome prose the user wrote\n\n## Active\n- [ ] one\n\nmore notes\n\n## Done\n",
        );
        append_line(&path, "p", "- [ ] two").unwrap();
        complete_at(&path, 5, today()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("some prose the user wrote"));
        assert!(text.contains("more notes"));
    }
}
