use infoflow_core::TimeWindow;

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search for the given (raw, possibly blank) topic.
    Search(String),
    SelectWindow(TimeWindow),
    ListWindows,
    Help,
    Quit,
    Unknown(String),
}

/// Lines starting with `:` are commands; anything else is a topic.
pub fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Command::Search(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("q" | "quit"), None, None) => Command::Quit,
        (Some("h" | "help"), None, None) => Command::Help,
        (Some("windows"), None, None) => Command::ListWindows,
        (Some("w" | "window"), Some(arg), None) => match parse_window(arg) {
            Some(window) => Command::SelectWindow(window),
            None => Command::Unknown(line.trim().to_string()),
        },
        _ => Command::Unknown(line.trim().to_string()),
    }
}

/// Accepts a wire code (`semanas`) or a 1-based position in the picker.
fn parse_window(arg: &str) -> Option<TimeWindow> {
    if let Ok(position) = arg.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| TimeWindow::ALL.get(index).copied());
    }
    TimeWindow::from_code(arg)
}
