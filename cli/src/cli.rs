//! Command-line surface of `drode`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Drone and AWS deployment helper
#[derive(Parser)]
#[command(
    name = "drode",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "DRODE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output (also honoured through `NO_COLOR`)
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify that the Drone and AWS integrations are configured
    Verify,

    /// Wait for a build to finish
    Wait {
        /// Build to wait for (default: the latest build)
        build_number: Option<u64>,
    },

    /// Promote a build to an environment
    Promote(commands::promote::PromoteArgs),

    /// Show the autoscaling groups of the active project
    Status,

    /// Activate a project
    Set {
        /// Name of a configured project
        project_name: String,
    },

    /// Show the active project
    Active,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            config,
            no_color,
            json,
            command,
            ..
        } = self;
        let app = AppContext::new(AppFlags {
            config,
            no_color,
            json,
        })?;
        match command {
            Command::Verify => commands::verify::run(&app).await,
            Command::Wait { build_number } => commands::wait::run(&app, build_number).await,
            Command::Promote(args) => commands::promote::run(&app, &args).await,
            Command::Status => commands::status::run(&app).await,
            Command::Set { project_name } => commands::project::set(&app, &project_name),
            Command::Active => commands::project::active(&app),
        }
    }
}
