mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use modplan_lib::consts::DEFAULT_PROJECT_FILE;

use crate::output::OutputFormat;

/// modplan - resolve module dependencies into per-target build plans
#[derive(Parser)]
#[command(name = "modplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the project file
  #[arg(short, long, global = true, env = "MODPLAN_PROJECT", default_value = DEFAULT_PROJECT_FILE)]
  project: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Assemble one target and print its build plan
  Plan {
    /// Name of the target to assemble
    target: String,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Assemble every target and report which ones are valid
  Check {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show modules, external modules and dependency edges
  Graph {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "error" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Plan { target, output } => cmd::cmd_plan(&cli.project, &target, cli.verbose, output),
    Commands::Check { output } => cmd::cmd_check(&cli.project, cli.verbose, output),
    Commands::Graph { output } => cmd::cmd_graph(&cli.project, output),
  }
}
