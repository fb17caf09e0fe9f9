use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use roster_core::{ExportFormat, Msg};
use roster_logging::roster_debug;

use crate::platform::app::AppEvent;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a `:` command is URL input submitted with Enter.
    Submit(String),
    Export(ExportFormat),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Command::Submit(line.trim_end_matches(&['\r', '\n'][..]).to_string());
    };

    let mut words = command.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("export" | "e"), None, None) => Command::Export(ExportFormat::default()),
        (Some("export" | "e"), Some(format), None) => match format.parse() {
            Ok(format) => Command::Export(format),
            Err(_) => Command::Unknown(trimmed.to_string()),
        },
        (Some("help" | "h" | "?"), None, None) => Command::Help,
        (Some("quit" | "q" | "exit"), None, None) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

impl Command {
    pub fn into_events(self) -> Vec<AppEvent> {
        match self {
            // Enter fires the scrape trigger for whatever the input holds.
            Command::Submit(text) => vec![
                AppEvent::Msg(Msg::InputChanged(text)),
                AppEvent::Msg(Msg::ScrapeSubmitted),
            ],
            Command::Export(format) => vec![AppEvent::Msg(Msg::ExportClicked(format))],
            Command::Help => vec![AppEvent::Help],
            Command::Quit => vec![AppEvent::Quit],
            Command::Unknown(text) => vec![AppEvent::Unknown(text)],
        }
    }
}

/// Reads stdin line by line on a background thread.
///
/// End of input is reported as [`AppEvent::InputClosed`], not as a quit, so work
/// already started can finish.
pub fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            for event in parse_line(&line).into_events() {
                if tx.send(event).is_err() {
                    return;
                }
            }
        }
        roster_debug!("stdin closed");
        let _ = tx.send(AppEvent::InputClosed);
    });
}
