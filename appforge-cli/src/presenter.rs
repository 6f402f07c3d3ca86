//! Terminal presenter
//!
//! Draws job views as status lines on stdout. Repeated identical lines are
//! printed once so a long job does not scroll the terminal every tick.

use appforge_client::{LaunchError, Presenter, Tone, View};
use appforge_core::domain::job::JobState;
use colored::*;

/// Presenter writing to the terminal
#[derive(Debug)]
pub struct TerminalPresenter {
    last_line: Option<String>,
    input_enabled: bool,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            last_line: None,
            input_enabled: true,
        }
    }

    /// Whether the last rendered view allows a new submission
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Reports that the user stopped waiting for the job
    pub fn cancelled(&mut self) {
        self.last_line = None;
        self.input_enabled = true;
        println!("{}", "Stopped watching the job.".dimmed());
    }

    /// Plain-text line for a view, or `None` if it repeats the previous one
    fn next_line(&mut self, view: &View) -> Option<String> {
        self.input_enabled = view.submit_enabled;

        let line = format!("{} {}", icon(view.tone), view.status_line);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last_line = Some(line.clone());
        Some(line)
    }

    fn render(&mut self, view: &View) {
        let Some(line) = self.next_line(view) else {
            return;
        };

        println!("{}", colorize(&line, view.tone));

        if let Some(link) = &view.result_link {
            println!("  Download: {}", link.underline());
        }

        if view.submit_enabled {
            // The next job starts from a clean slate
            self.last_line = None;
        }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalPresenter {
    fn on_state_change(&mut self, state: &JobState) {
        self.render(&View::for_state(state));
    }

    fn on_error(&mut self, error: &LaunchError) {
        self.render(&View::for_error(error));
    }
}

fn icon(tone: Tone) -> &'static str {
    match tone {
        Tone::Working => "⚙",
        Tone::Warning => "⚠",
        Tone::Success => "✅",
        Tone::Error => "❌",
    }
}

fn colorize(line: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Working => line.cyan(),
        Tone::Warning => line.yellow(),
        Tone::Success => line.green(),
        Tone::Error => line.red(),
    }
}
