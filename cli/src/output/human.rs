//! Human-readable terminal renderer.

use drode_common::{AutoscalerInfo, Environment, ProjectStatus};
use owo_colors::OwoColorize as _;

use crate::output::OutputContext;

const INSTANCE_HEADERS: [&str; 5] = ["Instance", "IP", "Status", "Created", "Template"];

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version line printed by `verify`.
    pub fn render_version(&self, version: &str) {
        self.ctx.info(&format!("Drode: {version}"));
    }

    /// Render the active project name.
    pub fn render_active(&self, name: &str) {
        println!("{name}");
    }

    /// Render the autoscaling groups of every environment with instances.
    pub fn render_status(&self, status: &ProjectStatus) {
        for environment in Environment::ALL {
            let Some(info) = status.get(environment) else {
                continue;
            };
            if info.instances.is_empty() {
                continue;
            }
            println!(
                "{}",
                format!("# {}", environment.title()).style(self.ctx.styles.environment)
            );
            self.render_autoscaler(info);
            println!();
        }
    }

    fn render_autoscaler(&self, info: &AutoscalerInfo) {
        println!("Active Template: {}", info.template);
        let rows: Vec<[&str; 5]> = info
            .instances
            .iter()
            .map(|i| [
                i.id.as_str(),
                i.ip.as_str(),
                i.status.as_str(),
                i.created.as_str(),
                i.template.as_str(),
            ])
            .collect();
        let table = format_table(&INSTANCE_HEADERS, &rows);
        let mut lines = table.lines();
        if let Some(header) = lines.next() {
            println!("{}", header.style(self.ctx.styles.table_header));
        }
        for line in lines {
            println!("{line}");
        }
    }
}

/// Lay out `rows` under `headers` in left-aligned columns separated by two
/// spaces, with a dashed rule under the header.
#[must_use]
pub fn format_table<const N: usize>(headers: &[&str; N], rows: &[[&str; N]]) -> String {
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str; N]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render(headers));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&render(row));
        out.push('\n');
    }
    out
}
