//! Guesstimate CLI - three-point estimation management.

mod config;
mod estimation;
mod task;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use guesstimate_storage::YamlStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "guesstimate")]
#[command(about = "Three-point estimation management", long_about = None)]
struct Cli {
    /// Configuration file (default: nearest .guesstimate.yml)
    #[arg(short, long, global = true, env = "GUESSTIMATE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new estimation file
    New(estimation::NewArgs),
    /// Render an estimation as markdown, JSON or YAML
    View(estimation::ViewArgs),
    /// Show confidence intervals and costs
    Summary {
        /// Estimation file
        file: PathBuf,
    },
    /// List estimation files in a directory
    List(estimation::ListArgs),
    /// Manage tasks of an estimation
    Task {
        #[command(subcommand)]
        command: task::TaskCommand,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: config::ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = YamlStore::new(cli.config)?;

    match cli.command {
        Commands::New(args) => estimation::new(&store, args).await?,
        Commands::View(args) => estimation::view(&store, args).await?,
        Commands::Summary { file } => estimation::summary(&store, &file).await?,
        Commands::List(args) => estimation::list(&store, args).await?,
        Commands::Task { command } => task::run(&store, command).await?,
        Commands::Config { command } => config::run(&store, command).await?,
    }

    Ok(())
}

/// Print advisory validation messages without blocking the command.
fn report_validation(messages: &[String]) {
    for message in messages {
        eprintln!("warning: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guesstimate_report::ReportFormat;

    #[test]
    fn test_parse_view() {
        let cli = Cli::try_parse_from(["guesstimate", "view", "a.estimation.yml", "-f", "json"]).unwrap();
        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.file, PathBuf::from("a.estimation.yml"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected view"),
        }
    }

    #[test]
    fn test_parse_task_move_negative_offset() {
        let cli = Cli::try_parse_from(["guesstimate", "task", "move", "a.yml", "abc", "-2"]).unwrap();
        match cli.command {
            Commands::Task {
                command: task::TaskCommand::Move { offset, .. },
            } => assert_eq!(offset, -2),
            _ => panic!("expected task move"),
        }
    }

    #[test]
    fn test_parse_global_config_flag() {
        let cli = Cli::try_parse_from(["guesstimate", "summary", "a.yml", "--config", "x.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["guesstimate", "view", "a.yml", "-f", "csv"]).is_err());
    }
}
