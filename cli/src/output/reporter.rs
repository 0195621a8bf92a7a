//! Prints service progress through the shared `OutputContext` prefixes.

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Steps and plain information both print as `[INFO]` lines.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn info(&self, message: &str) {
        self.ctx.info(message);
    }

    fn step(&self, message: &str) {
        self.ctx.info(message);
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn bell(&self) {
        self.ctx.bell();
    }
}
