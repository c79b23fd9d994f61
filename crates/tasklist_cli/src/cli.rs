//! Command-line surface of the `tasklist` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keep a simple list of tasks in a local database.
#[derive(Parser, Debug)]
#[command(
    name = "tasklist",
    author,
    version = tasklist_core::core_version(),
    about,
    long_about = None
)]
pub struct Cli {
    /// Path to the task database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands. Rows are numbered from 1, as shown by `list`.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print all tasks
    List {
        /// Print tasks as JSON instead of numbered rows
        #[arg(long)]
        json: bool,
    },

    /// Add a task at the end of the list
    Add {
        #[arg(allow_hyphen_values = true)]
        title: String,
    },

    /// Rename the task shown at ROW
    Rename {
        row: usize,
        #[arg(allow_hyphen_values = true)]
        title: String,
    },

    /// Delete the task shown at ROW
    Delete { row: usize },

    /// Open the interactive list screen (default)
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn no_subcommand_means_interactive_default() {
        let cli = Cli::try_parse_from(["tasklist"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.db, None);
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tasklist",
            "rename",
            "2",
            "new title",
            "--db",
            "/tmp/tasks.sqlite3",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/tasks.sqlite3")));
        assert_eq!(
            cli.command,
            Some(Command::Rename {
                row: 2,
                title: "new title".to_string()
            })
        );
    }

    #[test]
    fn version_flag_reports_core_version() {
        let version = Cli::command().get_version().map(str::to_string);
        assert_eq!(version.as_deref(), Some(tasklist_core::core_version()));
    }

    #[test]
    fn non_numeric_row_is_a_parse_error() {
        assert!(Cli::try_parse_from(["tasklist", "delete", "first"]).is_err());
    }
}
