//! Everything drode prints for people: prefixed status lines, tables,
//! spinners. `--json` documents live in [`json`].

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::io::Write as _;

use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

pub struct OutputContext {
    pub styles: Styles,
    /// stdout is attached to a terminal.
    pub is_tty: bool,
    /// Send status lines to stderr, keeping stdout for a JSON document.
    pub status_to_stderr: bool,
}

impl OutputContext {
    /// Colors are used only on a terminal, and never with `--no-color` or
    /// `NO_COLOR` set.
    #[must_use]
    pub fn new(no_color: bool, json: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if is_tty && !no_color && std::env::var_os("NO_COLOR").is_none() {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            status_to_stderr: json,
        }
    }

    /// Spinners would corrupt piped output and JSON documents.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.status_to_stderr
    }

    fn line(&self, prefix: impl std::fmt::Display, msg: &str) {
        if self.status_to_stderr {
            eprintln!("{prefix} {msg}");
        } else {
            println!("{prefix} {msg}");
        }
    }

    /// Print a success message prefixed with `[OK]`.
    pub fn success(&self, msg: &str) {
        self.line("[OK]".style(self.styles.ok), msg);
    }

    /// Print a warning message prefixed with `[WARNING]`.
    pub fn warn(&self, msg: &str) {
        self.line("[WARNING]".style(self.styles.warning), msg);
    }

    /// Print an error message prefixed with `[ERROR]` to stderr.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {msg}", "[ERROR]".style(self.styles.error));
    }

    /// Print an info message prefixed with `[INFO]`.
    pub fn info(&self, msg: &str) {
        self.line("[INFO]".style(self.styles.info), msg);
    }

    /// Ring the terminal bell.
    pub fn bell(&self) {
        let result = if self.status_to_stderr {
            let mut err = std::io::stderr();
            err.write_all(b"\x07").and_then(|()| err.flush())
        } else {
            let mut out = std::io::stdout();
            out.write_all(b"\x07").and_then(|()| out.flush())
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "could not ring the bell");
        }
    }
}
