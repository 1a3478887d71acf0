//! Configuration file commands.

use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use guesstimate_core::{Config, TaskCategory, DEFAULT_COST_PER_TIME_UNIT};
use guesstimate_storage::{EstimationStore, YamlStore};
use tracing::info;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a configuration file with the default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Show the configuration in use
    View {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Yaml)]
        format: ConfigFormat,
    },
    /// Manage task categories
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Add a task category
    Add {
        /// Category id, referenced by tasks
        id: String,
        /// Display label
        label: String,
        /// Cost of one time unit
        #[arg(long, default_value_t = DEFAULT_COST_PER_TIME_UNIT)]
        cost: f64,
    },
    /// Remove a task category
    Remove {
        /// Category id
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Text,
}

pub async fn run(store: &YamlStore, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init { force } => {
            let path = store.config_target().await?;
            if path.exists() && !force {
                bail!(
                    "configuration '{}' already exists, use --force to overwrite",
                    path.display()
                );
            }
            store
                .save_config(&Config::default())
                .await
                .context("failed to write configuration")?;
            info!(path = %path.display(), "configuration initialized");
            println!("Configuration written to {}", path.display());
        }
        ConfigCommand::View { format } => {
            let config = store.load_config().await.context("failed to load configuration")?;
            match format {
                ConfigFormat::Yaml => print!("{}", serde_yaml::to_string(&config)?),
                ConfigFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                ConfigFormat::Text => print_text(store, &config).await?,
            }
        }
        ConfigCommand::Category { command } => {
            let mut config = store.load_config().await.context("failed to load configuration")?;
            apply_category(&mut config, command)?;
            store
                .save_config(&config)
                .await
                .context("failed to write configuration")?;
        }
    }
    Ok(())
}

fn apply_category(config: &mut Config, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::Add { id, label, cost } => {
            if cost < 0.0 {
                bail!("cost per time unit must not be negative");
            }
            if config.has_category(&id) {
                bail!("category '{id}' already exists");
            }
            println!("Added category {id} ({label}, {cost} per {})", config.time_unit.acronym);
            config.task_categories.insert(id, TaskCategory::new(label, cost));
        }
        CategoryCommand::Remove { id } => {
            if config.task_categories.remove(&id).is_none() {
                bail!("category '{id}' not found");
            }
            println!("Removed category {id}");
        }
    }
    Ok(())
}

async fn print_text(store: &YamlStore, config: &Config) -> Result<()> {
    match store.config_path().await? {
        Some(path) => println!("File: {}", path.display()),
        None => println!("File: (defaults, no configuration file found)"),
    }
    println!(
        "Time unit: {} ({})",
        config.time_unit.label, config.time_unit.acronym
    );
    println!("Currency: {}", config.currency);
    println!("Round up estimations: {}", config.round_up_estimations);
    println!(
        "Auto estimation multiplier: {}",
        config.auto_estimation_multiplier()
    );
    println!("Task categories:");
    for (id, category) in &config.task_categories {
        println!(
            "  {id}: {} ({} {}/{})",
            category.label, category.cost_per_time_unit, config.currency, config.time_unit.acronym
        );
    }
    Ok(())
}
