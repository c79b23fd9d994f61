//! Command dispatch for the `tasklist` binary.
//!
//! One-shot commands reuse the controller flows with a fixed prompt answer,
//! so they share blank-input and row-range handling with the screen.

use crate::cli::Command;
use crate::screen::{
    draw_list, flush_view, row_from_screen, run_interactive, FixedAnswer, TerminalView,
};
use std::io::{self, BufRead, Write};
use tasklist_core::{ControllerError, ControllerResult, ListChange, TaskListController, TaskStore};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Loads the list, then runs `command`. Returns the process exit code.
///
/// One-shot commands stop with `EXIT_FAILURE` when the initial load fails;
/// the interactive screen opens on whatever the cache holds.
pub fn run_command<S: TaskStore, R: BufRead, W: Write>(
    command: Command,
    controller: &mut TaskListController<S>,
    input: &mut R,
    out: &mut W,
) -> io::Result<u8> {
    let mut view = TerminalView::default();
    let loaded = controller.load(&mut view);
    view.take_redraw();

    if command == Command::Interactive {
        // Why: rows typed on the screen refer to the list as drawn, so the
        // screen stays usable on whatever the cache holds.
        run_interactive(controller, &mut view, input, out)?;
        return Ok(EXIT_OK);
    }
    if loaded.is_err() {
        // Why: a one-shot row number refers to the persisted list; running
        // against an empty cache would misreport rows or hide stored tasks.
        return Ok(EXIT_FAILURE);
    }

    let result = match command {
        Command::Interactive => return Ok(EXIT_OK),
        Command::List { json } => {
            if json {
                let rendered = serde_json::to_string_pretty(controller.tasks())
                    .map_err(io::Error::other)?;
                writeln!(out, "{rendered}")?;
            } else {
                draw_list(controller, out)?;
            }
            return Ok(EXIT_OK);
        }
        Command::Add { title } => controller.add_task(&mut FixedAnswer(title), &mut view),
        Command::Rename { row, title } => match screen_row(row, out)? {
            Some(row) => controller.edit_task(row, &mut FixedAnswer(title), &mut view),
            None => return Ok(EXIT_USAGE),
        },
        Command::Delete { row } => match screen_row(row, out)? {
            Some(row) => controller.delete_task(row, &mut view),
            None => return Ok(EXIT_USAGE),
        },
    };

    flush_view(controller, &mut view, out)?;
    exit_code(result, out)
}

fn screen_row<W: Write>(row: usize, out: &mut W) -> io::Result<Option<usize>> {
    match row_from_screen(row) {
        Ok(row) => Ok(Some(row)),
        Err(message) => {
            writeln!(out, "{message}")?;
            Ok(None)
        }
    }
}

fn exit_code<W: Write>(result: ControllerResult<ListChange>, out: &mut W) -> io::Result<u8> {
    match result {
        Ok(_) => Ok(EXIT_OK),
        Err(ControllerError::RowOutOfRange { row, .. }) => {
            writeln!(out, "no task at row {}", row + 1)?;
            Ok(EXIT_USAGE)
        }
        Err(ControllerError::Store(_)) => Ok(EXIT_FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::{run_command, EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
    use crate::cli::Command;
    use std::io::Cursor;
    use tasklist_core::db::open_db_in_memory;
    use tasklist_core::{SqliteTaskStore, TaskListController, TaskStore};

    fn run(conn: &rusqlite::Connection, command: Command) -> (u8, String) {
        let mut controller = TaskListController::new(SqliteTaskStore::try_new(conn).unwrap());
        let mut out = Vec::new();
        let code = run_command(command, &mut controller, &mut Cursor::new(""), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    fn titles(conn: &rusqlite::Connection) -> Vec<String> {
        SqliteTaskStore::try_new(conn)
            .unwrap()
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect()
    }

    #[test]
    fn one_shot_commands_drive_the_controller() {
        let conn = open_db_in_memory().unwrap();

        let (code, out) = run(&conn, Command::Add { title: "A".to_string() });
        assert_eq!(code, EXIT_OK);
        assert_eq!(out, "+   1. A\n");

        run(&conn, Command::Add { title: "B".to_string() });
        let (code, _) = run(
            &conn,
            Command::Rename {
                row: 2,
                title: "B2".to_string(),
            },
        );
        assert_eq!(code, EXIT_OK);
        let (code, _) = run(&conn, Command::Delete { row: 1 });
        assert_eq!(code, EXIT_OK);

        assert_eq!(titles(&conn), vec!["B2".to_string()]);
        let (_, listed) = run(&conn, Command::List { json: false });
        assert_eq!(listed, "Task List\n  1. B2\n");
    }

    #[test]
    fn blank_add_is_silently_discarded() {
        let conn = open_db_in_memory().unwrap();

        let (code, out) = run(&conn, Command::Add { title: "  ".to_string() });

        assert_eq!(code, EXIT_OK);
        assert!(out.is_empty());
        assert!(titles(&conn).is_empty());
    }

    #[test]
    fn bad_rows_exit_with_usage_code() {
        let conn = open_db_in_memory().unwrap();
        run(&conn, Command::Add { title: "A".to_string() });

        let (zero, zero_out) = run(&conn, Command::Delete { row: 0 });
        let (missing, missing_out) = run(&conn, Command::Delete { row: 5 });

        assert_eq!(zero, EXIT_USAGE);
        assert!(zero_out.contains("rows start at 1"));
        assert_eq!(missing, EXIT_USAGE);
        assert!(missing_out.contains("no task at row 5"));
        assert_eq!(titles(&conn), vec!["A".to_string()]);
    }

    #[test]
    fn one_shot_commands_fail_when_stored_list_cannot_be_read() {
        let conn = open_db_in_memory().unwrap();
        run(&conn, Command::Add { title: "A".to_string() });
        conn.execute(
            "INSERT INTO tasks (uuid, title) VALUES ('not-a-uuid', 'x');",
            [],
        )
        .unwrap();

        let (list, list_out) = run(&conn, Command::List { json: false });
        let (delete, delete_out) = run(&conn, Command::Delete { row: 1 });
        let (add, add_out) = run(&conn, Command::Add { title: "B".to_string() });

        assert_eq!(list, EXIT_FAILURE);
        assert!(list_out.is_empty());
        assert_eq!(delete, EXIT_FAILURE);
        assert!(delete_out.is_empty());
        assert_eq!(add, EXIT_FAILURE);
        assert!(add_out.is_empty());

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn interactive_screen_opens_even_when_load_fails() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO tasks (uuid, title) VALUES ('not-a-uuid', 'x');",
            [],
        )
        .unwrap();
        let mut controller = TaskListController::new(SqliteTaskStore::try_new(&conn).unwrap());
        let mut out = Vec::new();

        let code = run_command(
            Command::Interactive,
            &mut controller,
            &mut Cursor::new("q\n"),
            &mut out,
        )
        .unwrap();

        assert_eq!(code, EXIT_OK);
        assert!(String::from_utf8(out).unwrap().starts_with("Task List\n  (no tasks)\n"));
    }

    #[test]
    fn list_json_prints_ids_and_titles() {
        let conn = open_db_in_memory().unwrap();
        run(&conn, Command::Add { title: "Buy milk".to_string() });

        let (code, out) = run(&conn, Command::List { json: true });

        assert_eq!(code, EXIT_OK);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["title"], "Buy milk");
        assert!(parsed[0]["id"].is_string());
    }
}
