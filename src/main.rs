use clap::Parser;
use std::path::PathBuf;
use std::process;
use tsk::cli::{Cli, Commands};
use tsk::cli_handlers;
use tsk::store::Store;

fn default_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".tasks"), |home| home.join(".tasks"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = Store::open(cli.dir.unwrap_or_else(default_dir));

    let result = match cli.command {
        Commands::Add {
            description,
            project,
            due,
            urgent,
            effort,
        } => cli_handlers::handle_add(
            &store,
            &description,
            project.as_deref(),
            due.as_deref(),
            urgent,
            effort.as_deref(),
        ),
        Commands::List {
            project,
            urgent,
            due_soon,
            all,
            json,
        } => cli_handlers::handle_list(&store, project.as_deref(), urgent, due_soon, all, json),
        Commands::Done { search } => cli_handlers::handle_done(&store, &search),
        Commands::Inbox => cli_handlers::handle_inbox(&store),
        Commands::Move { search, to } => cli_handlers::handle_move(&store, &search, &to),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
