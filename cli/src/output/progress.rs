//! Spinner shown while drode waits on Drone or AWS.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputContext;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// An indeterminate spinner with `msg` beside it, already ticking.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);
    let pb = ProgressBar::new_spinner().with_style(style);
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run `fut` behind a spinner when the terminal can show one.
pub async fn with_spinner<T>(ctx: &OutputContext, msg: &str, fut: impl Future<Output = T>) -> T {
    if !ctx.show_progress() {
        return fut.await;
    }
    let pb = spinner(msg);
    let result = fut.await;
    pb.finish_and_clear();
    result
}
