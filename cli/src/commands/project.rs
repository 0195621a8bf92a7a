//! `drode set` and `drode active`: project selection.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::project::{active_project, set_active_project};
use crate::output::{JsonRenderer, TerminalReporter};

/// Mark `name` as the active project.
///
/// # Errors
///
/// Returns a configuration error for an unknown project, or an I/O error if
/// the configuration cannot be written.
pub fn set(app: &AppContext, name: &str) -> Result<()> {
    let reporter = TerminalReporter::new(&app.output);
    set_active_project(&app.store, &reporter, name)?;
    if app.is_json() {
        JsonRenderer::render_active(name)?;
    }
    Ok(())
}

/// Print the project commands act on.
///
/// # Errors
///
/// Returns a configuration error when no project can be selected.
pub fn active(app: &AppContext) -> Result<()> {
    let name = active_project(&app.store)?;
    if app.is_json() {
        JsonRenderer::render_active(&name)
    } else {
        app.human().render_active(&name);
        Ok(())
    }
}
