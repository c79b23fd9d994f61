//! Line-oriented task list screen.
//!
//! # Responsibility
//! - Render the controller's rows on a terminal.
//! - Present modal prompts by reading one line from the input.
//! - Map screen commands to add/edit/delete gestures.
//!
//! # Invariants
//! - Rows are numbered from 1 on screen and converted to 0-based rows
//!   before reaching the controller.
//! - Store failures are not printed; the log carries them.

use log::warn;
use std::io::{self, BufRead, Write};
use tasklist_core::{
    ControllerError, PromptRequest, PromptResponse, Task, TaskListController, TaskListView,
    TaskStore, TextPrompt, LIST_TITLE,
};

const CANCEL_INPUT: &str = "/cancel";
const HELP_TEXT: &str = "commands: a = add, e N = edit row N, d N = delete row N, l = redraw, q = quit";

/// Screen command typed at the `>` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenCommand {
    Add,
    Edit(usize),
    Delete(usize),
    Redraw,
    Help,
    Quit,
}

/// Parses a screen command; `N` is the 1-based row shown on screen.
pub fn parse_command(line: &str) -> Result<ScreenCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(ScreenCommand::Redraw);
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments: `{}`", line.trim()));
    }

    match (verb, arg) {
        ("a" | "add", None) => Ok(ScreenCommand::Add),
        ("e" | "edit", Some(row)) => parse_row(row).map(ScreenCommand::Edit),
        ("d" | "delete", Some(row)) => parse_row(row).map(ScreenCommand::Delete),
        ("l" | "list", None) => Ok(ScreenCommand::Redraw),
        ("h" | "help" | "?", None) => Ok(ScreenCommand::Help),
        ("q" | "quit", None) => Ok(ScreenCommand::Quit),
        ("e" | "edit" | "d" | "delete", None) => Err(format!("`{verb}` needs a row number")),
        _ => Err(format!("unknown command: `{}`", line.trim())),
    }
}

/// Parses a typed 1-based screen row into a controller row.
pub fn parse_row(value: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("invalid row `{value}`; rows start at 1"))
        .and_then(row_from_screen)
}

/// Converts a 1-based screen row into a 0-based controller row.
pub fn row_from_screen(row: usize) -> Result<usize, String> {
    row.checked_sub(1)
        .ok_or_else(|| format!("invalid row `{row}`; rows start at 1"))
}

/// View that buffers row notices until the screen flushes them.
#[derive(Debug, Default)]
pub struct TerminalView {
    notices: Vec<String>,
    needs_redraw: bool,
}

impl TerminalView {
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

impl TaskListView for TerminalView {
    fn reload_all(&mut self, _tasks: &[Task]) {
        self.needs_redraw = true;
    }

    fn insert_row(&mut self, row: usize, task: &Task) {
        self.notices.push(format!("+ {:>3}. {}", row + 1, task.title));
    }

    fn reload_row(&mut self, row: usize, task: &Task) {
        self.notices.push(format!("~ {:>3}. {}", row + 1, task.title));
    }

    fn delete_row(&mut self, row: usize) {
        self.notices.push(format!("- {:>3}.", row + 1));
    }
}

/// Modal prompt that reads a single line.
///
/// `/cancel` or end of input cancels. An empty line while editing keeps the
/// current title.
pub struct LinePrompt<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
}

impl<'a, R: BufRead, W: Write> LinePrompt<'a, R, W> {
    pub fn new(input: &'a mut R, out: &'a mut W) -> Self {
        Self { input, out }
    }

    fn show(&mut self, request: &PromptRequest) -> io::Result<()> {
        writeln!(self.out, "{}", request.title)?;
        writeln!(self.out, "{}", request.message)?;
        match &request.initial_text {
            Some(current) => write!(self.out, "[{current}] > ")?,
            None => write!(self.out, "({}) > ", request.placeholder)?,
        }
        self.out.flush()
    }
}

impl<R: BufRead, W: Write> TextPrompt for LinePrompt<'_, R, W> {
    fn present(&mut self, request: &PromptRequest) -> PromptResponse {
        if let Err(err) = self.show(request) {
            warn!("event=prompt_show module=cli status=error error={err}");
        }

        let Some(line) = read_line(&mut *self.input) else {
            return PromptResponse::Cancel;
        };
        if line == CANCEL_INPUT {
            return PromptResponse::Cancel;
        }
        match (&request.initial_text, line.is_empty()) {
            (Some(current), true) => PromptResponse::Save(current.clone()),
            _ => PromptResponse::Save(line),
        }
    }
}

/// Prompt that answers every request with the same text.
pub struct FixedAnswer(pub String);

impl TextPrompt for FixedAnswer {
    fn present(&mut self, _request: &PromptRequest) -> PromptResponse {
        PromptResponse::Save(self.0.clone())
    }
}

/// Runs the interactive screen until `q` or end of input.
pub fn run_interactive<S: TaskStore, R: BufRead, W: Write>(
    controller: &mut TaskListController<S>,
    view: &mut TerminalView,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    draw_list(controller, out)?;
    writeln!(out, "{HELP_TEXT}")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = read_line(&mut *input) else {
            writeln!(out)?;
            return Ok(());
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        let result = match command {
            ScreenCommand::Quit => return Ok(()),
            ScreenCommand::Help => {
                writeln!(out, "{HELP_TEXT}")?;
                continue;
            }
            ScreenCommand::Redraw => {
                draw_list(controller, out)?;
                continue;
            }
            ScreenCommand::Add => {
                let mut prompt = LinePrompt::new(&mut *input, &mut *out);
                controller.add_task(&mut prompt, view)
            }
            ScreenCommand::Edit(row) => {
                let mut prompt = LinePrompt::new(&mut *input, &mut *out);
                controller.edit_task(row, &mut prompt, view)
            }
            ScreenCommand::Delete(row) => controller.delete_task(row, view),
        };

        if let Err(ControllerError::RowOutOfRange { row, .. }) = result {
            writeln!(out, "no task at row {}", row + 1)?;
        }
        flush_view(controller, view, out)?;
    }
}

/// Writes pending row notices, or the full list after a reload.
pub fn flush_view<S: TaskStore, W: Write>(
    controller: &TaskListController<S>,
    view: &mut TerminalView,
    out: &mut W,
) -> io::Result<()> {
    for notice in view.take_notices() {
        writeln!(out, "{notice}")?;
    }
    if view.take_redraw() {
        draw_list(controller, out)?;
    }
    Ok(())
}

pub fn draw_list<S: TaskStore, W: Write>(
    controller: &TaskListController<S>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{LIST_TITLE}")?;
    if controller.row_count() == 0 {
        writeln!(out, "  (no tasks)")?;
    }
    for line in controller.render_rows() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => {
            let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
            line.truncate(trimmed_len);
            Some(line)
        }
        Err(err) => {
            warn!("event=input_read module=cli status=error error={err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_command, parse_row, row_from_screen, run_interactive, LinePrompt, ScreenCommand,
        TerminalView,
    };
    use std::io::Cursor;
    use tasklist_core::db::open_db_in_memory;
    use tasklist_core::{
        PromptRequest, PromptResponse, SqliteTaskStore, TaskListController, TaskStore, TextPrompt,
    };

    fn request(initial_text: Option<&str>) -> PromptRequest {
        PromptRequest {
            title: "New task",
            message: "What do you want to do?",
            placeholder: "New task...".to_string(),
            initial_text: initial_text.map(str::to_string),
        }
    }

    #[test]
    fn parse_command_converts_rows_to_zero_based() {
        assert_eq!(parse_command("a"), Ok(ScreenCommand::Add));
        assert_eq!(parse_command("e 2"), Ok(ScreenCommand::Edit(1)));
        assert_eq!(parse_command(" d 1 "), Ok(ScreenCommand::Delete(0)));
        assert_eq!(parse_command(""), Ok(ScreenCommand::Redraw));
        assert_eq!(parse_command("q"), Ok(ScreenCommand::Quit));
    }

    #[test]
    fn parse_command_rejects_bad_rows_and_verbs() {
        assert!(parse_command("d 0").is_err());
        assert!(parse_command("d x").is_err());
        assert!(parse_command("e").is_err());
        assert!(parse_command("a 1").is_err());
        assert!(parse_command("zap").is_err());
    }

    #[test]
    fn typed_and_numeric_rows_share_one_conversion() {
        assert_eq!(row_from_screen(1), Ok(0));
        assert_eq!(parse_row("3"), Ok(2));
        assert_eq!(parse_row("0"), row_from_screen(0));
        assert!(parse_row("-1").unwrap_err().contains("rows start at 1"));
    }

    #[test]
    fn line_prompt_reads_one_line_and_handles_cancel() {
        let mut out = Vec::new();
        let mut input = Cursor::new("Buy milk\r\n/cancel\n");
        let mut prompt = LinePrompt::new(&mut input, &mut out);

        assert_eq!(
            prompt.present(&request(None)),
            PromptResponse::Save("Buy milk".to_string())
        );
        assert_eq!(prompt.present(&request(None)), PromptResponse::Cancel);
        assert_eq!(prompt.present(&request(None)), PromptResponse::Cancel);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("What do you want to do?"));
        assert!(shown.contains("(New task...) > "));
    }

    #[test]
    fn empty_line_while_editing_keeps_current_title() {
        let mut out = Vec::new();
        let mut input = Cursor::new("\n");
        let mut prompt = LinePrompt::new(&mut input, &mut out);

        assert_eq!(
            prompt.present(&request(Some("A"))),
            PromptResponse::Save("A".to_string())
        );
        assert!(String::from_utf8(out).unwrap().contains("[A] > "));
    }

    #[test]
    fn interactive_session_adds_edits_and_deletes() {
        let conn = open_db_in_memory().unwrap();
        let mut controller = TaskListController::new(SqliteTaskStore::try_new(&conn).unwrap());
        let mut view = TerminalView::default();
        let mut input = Cursor::new("a\nA\na\nB\na\n   \ne 2\nB2\nd 1\nd 9\nq\n");
        let mut out = Vec::new();

        run_interactive(&mut controller, &mut view, &mut input, &mut out).unwrap();

        let titles: Vec<_> = SqliteTaskStore::try_new(&conn)
            .unwrap()
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|task| task.title)
            .collect();
        assert_eq!(titles, vec!["B2".to_string()]);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("Task List\n  (no tasks)\n"));
        assert!(shown.contains("+   1. A"));
        assert!(shown.contains("~   2. B2"));
        assert!(shown.contains("-   1."));
        assert!(shown.contains("no task at row 9"));
    }
}
