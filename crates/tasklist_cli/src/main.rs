//! `tasklist` entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the task database.
//! - Hand one store instance to the list controller and dispatch the command.
//!
//! # Invariants
//! - A database that cannot be opened aborts start-up with exit code 1.
//! - Logging failures are reported once and do not abort start-up.

mod app;
mod cli;
mod config;
mod screen;

use app::EXIT_FAILURE;
use clap::Parser;
use cli::{Cli, Command};
use config::AppConfig;
use log::error;
use std::process::ExitCode;
use tasklist_core::db::open_db;
use tasklist_core::{init_logging, SqliteTaskStore, TaskListController};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::resolve(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("tasklist: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("tasklist: logging disabled: {err}");
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!(
                "tasklist: cannot open task database `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let store = match SqliteTaskStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            error!("event=store_init module=cli status=error error={err}");
            eprintln!("tasklist: task database is not usable: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let mut controller = TaskListController::new(store);

    let command = cli.command.unwrap_or(Command::Interactive);
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout().lock();

    match app::run_command(command, &mut controller, &mut input, &mut out) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("event=terminal_io module=cli status=error error={err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
