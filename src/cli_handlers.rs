use chrono::NaiveDate;

use crate::dates::resolve_date;
use crate::error::Result;
use crate::models::{Task, de_slug};
use crate::store::{Filter, INBOX, MatchOutcome, Store};

/// Handle the add command
pub fn handle_add(
    store: &Store,
    description: &str,
    project: Option<&str>,
    due: Option<&str>,
    urgent: bool,
    effort: Option<&str>,
) -> Result<()> {
    store.ensure_structure()?;

    let task = Task {
        description: description.to_string(),
        // An unresolvable due phrase is dropped, not fatal.
        due: due.and_then(|phrase| resolve_date(phrase, store.today())),
        urgent,
        effort: effort.map(str::to_string),
        ..Default::default()
    };

    let slug = store.add(&task, project)?;
    println!("Added to {}: {description}", de_slug(&slug));
    Ok(())
}

/// Handle the list command
pub fn handle_list(
    store: &Store,
    project: Option<&str>,
    urgent: bool,
    due_soon: bool,
    all: bool,
    json: bool,
) -> Result<()> {
    store.ensure_structure()?;

    let filter = Filter {
        project: project.map(str::to_string),
        include_done: all,
        urgent_only: urgent,
        due_soon_only: due_soon,
    };
    let tasks = store.filtered(&filter)?;

    if json {
        let snapshots: Vec<_> = tasks.iter().map(|t| t.snapshot(store.today())).collect();
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    // Group by source document; listing order already puts the inbox first.
    let mut current = String::new();
    for task in &tasks {
        if task.source != current {
            current.clone_from(&task.source);
            println!();
            println!("  {}", task.project_name());
        }
        println!("    {}", render_task(task, store.today()));
    }
    println!();
    Ok(())
}

/// Handle the done command
pub fn handle_done(store: &Store, search: &str) -> Result<()> {
    store.ensure_structure()?;

    match store.fuzzy_complete(search)? {
        MatchOutcome::NoMatch => println!("No open tasks matching '{search}'."),
        MatchOutcome::Completed(task) => println!("Done: {}", task.description),
        MatchOutcome::Ambiguous(candidates) => print_candidates(search, &candidates),
    }
    Ok(())
}

/// Handle the inbox command
pub fn handle_inbox(store: &Store) -> Result<()> {
    store.ensure_structure()?;

    let open: Vec<Task> = store
        .tasks_in(INBOX)?
        .into_iter()
        .filter(|t| !t.done)
        .collect();

    if open.is_empty() {
        println!("Inbox is empty.");
        return Ok(());
    }

    println!();
    println!("  Inbox ({} tasks)", open.len());
    println!();
    for task in &open {
        println!("    {}", render_task(task, store.today()));
    }
    println!();
    Ok(())
}

/// Handle the move command
pub fn handle_move(store: &Store, search: &str, to: &str) -> Result<()> {
    store.ensure_structure()?;

    let matches = store.find_open(search)?;
    match matches.as_slice() {
        [] => println!("No open tasks matching '{search}'."),
        [task] => {
            let moved = store.relocate(&task.source, &[(task.line_number, to.to_string())])?;
            match moved.first() {
                Some((description, slug)) => {
                    println!("Moved to {}: {description}", de_slug(slug));
                }
                None => println!("Task position was stale; nothing moved."),
            }
        }
        _ => print_candidates(search, &matches),
    }
    Ok(())
}

fn print_candidates(search: &str, candidates: &[Task]) {
    println!("Multiple matches for '{search}':");
    println!();
    for (i, task) in candidates.iter().take(10).enumerate() {
        println!("  {}. {} ({})", i + 1, task.description, task.project_name());
    }
    println!();
    println!("Narrow the search and try again.");
}

fn render_task(task: &Task, today: NaiveDate) -> String {
    let checkbox = if task.done { "[x]" } else { "[ ]" };
    let prefix = if task.is_overdue(today) { "OVERDUE " } else { "" };
    let due = task
        .due
        .map(|d| format!(" (due {d})"))
        .unwrap_or_default();
    let effort = task
        .effort
        .as_ref()
        .map(|e| format!(" [{e}]"))
        .unwrap_or_default();
    let urgent = if task.urgent { " *urgent*" } else { "" };
    format!("{checkbox} {prefix}{}{due}{effort}{urgent}", task.description)
}
