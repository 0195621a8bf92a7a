//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Colors of the status prefixes and the status tables.
///
/// Every style is plain until `colorize` runs, so `--no-color` output and
/// piped output carry no escape codes.
#[derive(Default, Clone)]
pub struct Styles {
    /// `[OK]`
    pub ok: Style,
    /// `[WARNING]`
    pub warning: Style,
    /// `[ERROR]`
    pub error: Style,
    /// `[INFO]`
    pub info: Style,
    /// Column titles of the instance table
    pub table_header: Style,
    /// `# Production` / `# Staging`
    pub environment: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.ok = Style::new().green().bold();
        self.warning = Style::new().yellow().bold();
        self.error = Style::new().red().bold();
        self.info = Style::new().blue().bold();
        self.table_header = Style::new().underline();
        self.environment = Style::new().bold().cyan();
    }
}
