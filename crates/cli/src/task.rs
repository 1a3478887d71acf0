//! Task commands.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use guesstimate_core::{task_estimation, Config, Estimation, Task, TaskId};
use guesstimate_storage::{EstimationStore, YamlStore};
use serde::Serialize;
use tracing::info;

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task, missing estimates are inferred
    Add {
        /// Estimation file, created if missing
        file: PathBuf,
        /// Task label
        label: String,
        /// Category id (default: first configured category)
        #[arg(long)]
        category: Option<String>,
        /// Optimistic estimate
        #[arg(short, long, default_value_t = 0.0)]
        optimistic: f64,
        /// Likely estimate
        #[arg(short, long, default_value_t = 0.0)]
        likely: f64,
        /// Pessimistic estimate
        #[arg(short, long, default_value_t = 0.0)]
        pessimistic: f64,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Update a task, unspecified estimates keep their value
    Update {
        /// Estimation file
        file: PathBuf,
        /// Task id or unique suffix of it
        id: String,
        /// New label
        #[arg(short = 'L', long)]
        label: Option<String>,
        /// New category id
        #[arg(long)]
        category: Option<String>,
        /// Optimistic estimate
        #[arg(short, long)]
        optimistic: Option<f64>,
        /// Likely estimate
        #[arg(short, long)]
        likely: Option<f64>,
        /// Pessimistic estimate
        #[arg(short, long)]
        pessimistic: Option<f64>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove a task
    Remove {
        /// Estimation file
        file: PathBuf,
        /// Task id or unique suffix of it
        id: String,
    },
    /// List tasks in order
    List {
        /// Estimation file
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = TaskListFormat::Table)]
        format: TaskListFormat,
    },
    /// Move a task up (negative) or down (positive) the list
    Move {
        /// Estimation file
        file: PathBuf,
        /// Task id or unique suffix of it
        id: String,
        /// Number of positions to move
        #[arg(allow_negative_numbers = true)]
        offset: isize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TaskListFormat {
    Table,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskRow<'a> {
    id: &'a str,
    label: &'a str,
    category: &'a str,
    optimistic: f64,
    likely: f64,
    pessimistic: f64,
    weighted_mean: f64,
    standard_deviation: f64,
}

pub async fn run(store: &YamlStore, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            file,
            label,
            category,
            optimistic,
            likely,
            pessimistic,
            description,
        } => {
            let config = store.load_config().await.context("failed to load configuration")?;
            let (mut estimation, created) = store
                .load_or_create_estimation(&file, &project_label(&file))
                .await
                .context("failed to load estimation")?;
            if created {
                println!("Created estimation file {}", file.display());
            }
            let config = estimation.effective_config(&config);

            let category = match category {
                Some(category) => category,
                None => config
                    .first_category_id()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("no task category configured, pass --category"))?,
            };
            warn_unknown_category(&config, &category);

            let mut task = Task::new(label, category);
            task.description = description;
            task.set_estimations(optimistic, likely, pessimistic, config.auto_estimation_multiplier());

            let id = estimation.add_task(task)?;
            save(store, &file, &estimation).await?;

            info!(task = %id, "task added");
            println!("Added task {}", id.short());
            print_task(&estimation, &id, &config);
        }
        TaskCommand::Update {
            file,
            id,
            label,
            category,
            optimistic,
            likely,
            pessimistic,
            description,
        } => {
            let (mut estimation, config) = load(store, &file).await?;
            let id = resolve_id(&estimation, &id)?;
            let mut task = estimation
                .task(&id)
                .cloned()
                .ok_or_else(|| anyhow!("task {id} not found"))?;

            if let Some(label) = label {
                task.label = label;
            }
            if let Some(category) = category {
                warn_unknown_category(&config, &category);
                task.category = category;
            }
            if let Some(description) = description {
                task.description = (!description.is_empty()).then_some(description);
            }
            if optimistic.is_some() || likely.is_some() || pessimistic.is_some() {
                let current = task.estimations();
                task.set_estimations(
                    optimistic.unwrap_or(current.optimistic),
                    likely.unwrap_or(current.likely),
                    pessimistic.unwrap_or(current.pessimistic),
                    config.auto_estimation_multiplier(),
                );
            }

            estimation.update_task(task)?;
            save(store, &file, &estimation).await?;

            info!(task = %id, "task updated");
            println!("Updated task {}", id.short());
            print_task(&estimation, &id, &config);
        }
        TaskCommand::Remove { file, id } => {
            let (mut estimation, _) = load(store, &file).await?;
            let id = resolve_id(&estimation, &id)?;
            let task = estimation.remove_task(&id)?;
            save(store, &file, &estimation).await?;

            info!(task = %id, "task removed");
            println!("Removed task {} ({})", id.short(), task.label);
        }
        TaskCommand::List { file, format } => {
            let (estimation, config) = load(store, &file).await?;
            list(&estimation, &config, format)?;
        }
        TaskCommand::Move { file, id, offset } => {
            let (mut estimation, _) = load(store, &file).await?;
            let id = resolve_id(&estimation, &id)?;
            let position = estimation.move_task(&id, offset)?;
            save(store, &file, &estimation).await?;

            info!(task = %id, position, "task moved");
            println!("Moved task {} to position {}", id.short(), position + 1);
        }
    }
    Ok(())
}

async fn load(store: &YamlStore, file: &Path) -> Result<(Estimation, Config)> {
    crate::estimation::load_with_config(store, file).await
}

async fn save(store: &YamlStore, file: &Path, estimation: &Estimation) -> Result<()> {
    store
        .save_estimation(file, estimation)
        .await
        .context("failed to save estimation")?;
    crate::report_validation(&estimation.validate());
    Ok(())
}

/// Label for an estimation created on the fly, from its file name.
fn project_label(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .map(|name| match name.strip_suffix(guesstimate_storage::ESTIMATION_FILE_SUFFIX) {
            Some(stem) => stem.to_string(),
            None => name,
        })
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Accept a full id or a suffix matching exactly one task.
fn resolve_id(estimation: &Estimation, input: &str) -> Result<TaskId> {
    let exact = TaskId::from(input);
    if estimation.contains_task(&exact) {
        return Ok(exact);
    }

    let input = input.to_lowercase();
    let mut matches = estimation
        .ordering()
        .iter()
        .filter(|id| id.as_str().ends_with(&input));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id.clone()),
        (Some(_), Some(_)) => bail!("task id '{input}' is ambiguous"),
        (None, _) => bail!("task '{input}' not found"),
    }
}

fn warn_unknown_category(config: &Config, category: &str) {
    if !config.has_category(category) {
        eprintln!("warning: category '{category}' is not configured");
    }
}

fn print_task(estimation: &Estimation, id: &TaskId, config: &Config) {
    let Some(task) = estimation.task(id) else {
        return;
    };
    let e = task.estimations();
    let result = task_estimation(task);
    println!(
        "  {} [{}] O={} L={} P={} => {:.2} ± {:.2} {}",
        task.label,
        config.task_category(&task.category).label,
        e.optimistic,
        e.likely,
        e.pessimistic,
        result.weighted_mean,
        result.standard_deviation,
        config.time_unit.acronym,
    );
}

fn list(estimation: &Estimation, config: &Config, format: TaskListFormat) -> Result<()> {
    match format {
        TaskListFormat::Json => {
            let rows: Vec<TaskRow<'_>> = estimation
                .tasks()
                .map(|task| {
                    let e = task.estimations();
                    TaskRow {
                        id: task.id().as_str(),
                        label: &task.label,
                        category: &task.category,
                        optimistic: e.optimistic,
                        likely: e.likely,
                        pessimistic: e.pessimistic,
                        weighted_mean: task.weighted_mean(),
                        standard_deviation: task.standard_deviation(),
                    }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        TaskListFormat::Table if estimation.is_empty() => println!("No tasks."),
        TaskListFormat::Table => {
            println!(
                "{:<3} {:<8} {:<30} {:<20} {:>6} {:>6} {:>6} {:>8}",
                "#", "ID", "LABEL", "CATEGORY", "O", "L", "P", "MEAN"
            );
            for (index, task) in estimation.tasks().enumerate() {
                let e = task.estimations();
                println!(
                    "{:<3} {:<8} {:<30} {:<20} {:>6} {:>6} {:>6} {:>8.2}",
                    index + 1,
                    task.id().short(),
                    truncate(&task.label, 30),
                    truncate(&config.task_category(&task.category).label, 20),
                    e.optimistic,
                    e.likely,
                    e.pessimistic,
                    task.weighted_mean(),
                );
            }
        }
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width - 1).collect();
        out.push('~');
        out
    }
}
