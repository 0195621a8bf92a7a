//! Drode CLI - promote Drone builds between environments

use clap::Parser;
use drode::cli::Cli;
use drode::domain::ErrorKind;
use drode::output::json::format_error;
use drode::output::{JsonRenderer, OutputContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;
    let output = OutputContext::new(cli.no_color, json);

    if let Err(e) = cli.run().await {
        let kind = ErrorKind::of(&e);
        tracing::debug!(code = kind.code(), "command failed: {e:?}");
        if kind.is_benign() {
            output.info(&e.to_string());
            if json {
                if let Err(render) = JsonRenderer::render_aborted(&e.to_string()) {
                    output.error(&format!("{render:#}"));
                }
            }
            return;
        }
        match json.then(|| format_error(&format!("{e:#}"), kind.code())) {
            Some(Ok(doc)) => println!("{doc}"),
            _ => output.error(&format!("{e:#}")),
        }
        std::process::exit(1);
    }
}

/// Diagnostic logs go to stderr: `debug` with `-v`, otherwise `RUST_LOG` or `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("drode=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
