//! Estimation file commands: new, view, summary, list.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use guesstimate_core::{
    category_distribution, min_max_costs, project_estimation, ConfidenceLevel, Estimation,
};
use guesstimate_report::{render, ReportFormat, COST_CONFIDENCE};
use guesstimate_storage::{EstimationStore, YamlStore, ESTIMATION_FILE_SUFFIX};
use serde::Serialize;
use tracing::info;

#[derive(Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,
    /// Output file (default: <name>.estimation.yml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Project description
    #[arg(short, long, default_value = "")]
    pub description: String,
    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ViewArgs {
    /// Estimation file
    pub file: PathBuf,
    /// Output format (markdown, json, yaml)
    #[arg(short, long, default_value = "markdown")]
    pub format: ReportFormat,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub dir: PathBuf,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
    pub format: ListFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ListFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Serialize)]
struct ListItem {
    file: String,
    label: String,
    tasks: usize,
}

/// File name derived from a project name.
pub fn default_file_name(name: &str) -> String {
    let slug = name.trim().to_lowercase().replace(char::is_whitespace, "-");
    format!("{slug}{ESTIMATION_FILE_SUFFIX}")
}

pub async fn new(store: &YamlStore, args: NewArgs) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_file_name(&args.name)));

    if output.exists() && !args.force {
        bail!(
            "file '{}' already exists, use --force to overwrite",
            output.display()
        );
    }

    let mut estimation = Estimation::new(&args.name);
    estimation.description = args.description;
    store
        .save_estimation(&output, &estimation)
        .await
        .context("failed to create estimation")?;

    info!(id = %estimation.id, path = %output.display(), "estimation created");
    println!(
        "Created estimation '{}' ({}) at {}",
        args.name,
        estimation.id.short(),
        output.display()
    );
    Ok(())
}

/// Load an estimation together with the configuration it should be read with.
pub async fn load_with_config(
    store: &YamlStore,
    file: &Path,
) -> Result<(Estimation, guesstimate_core::Config)> {
    let estimation = store
        .load_estimation(file)
        .await
        .context("failed to load estimation")?;
    let config = store
        .load_config()
        .await
        .context("failed to load configuration")?;
    let config = estimation.effective_config(&config);
    Ok((estimation, config))
}

pub async fn view(store: &YamlStore, args: ViewArgs) -> Result<()> {
    let (estimation, config) = load_with_config(store, &args.file).await?;
    let rendered = render(&estimation, &config, args.format)
        .with_context(|| format!("failed to format estimation as {}", args.format))?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, rendered)
                .await
                .context("failed to write output")?;
            println!("Output written to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

pub async fn summary(store: &YamlStore, file: &Path) -> Result<()> {
    let (estimation, config) = load_with_config(store, file).await?;
    let unit = &config.time_unit.acronym;

    let project = project_estimation(&estimation);
    let distribution = category_distribution(&estimation, &config);
    let costs = min_max_costs(&estimation, &config, COST_CONFIDENCE);

    println!("Project: {}", estimation.label);
    println!("Tasks: {}", estimation.task_count());
    println!();
    println!("Time Estimation:");
    for level in ConfidenceLevel::ALL.into_iter().rev() {
        let interval = project.interval(level);
        println!(
            "  {:<6} confidence: {:.2} ± {:.2} {unit}",
            level.label(),
            interval.mean,
            interval.deviation,
        );
    }
    println!();

    if !distribution.is_empty() {
        println!("Category Repartition:");
        for share in distribution.iter().filter(|d| d.percentage > 0.0) {
            println!(
                "  {}: {:.1}% ({:.2} {unit})",
                share.category_label, share.percentage, share.time
            );
        }
        println!();
    }

    println!("Cost Estimation ({} confidence):", COST_CONFIDENCE);
    println!(
        "  Maximum: {:.2} {} ({:.2} {unit})",
        costs.max.total_cost, config.currency, costs.max.total_time
    );
    println!(
        "  Minimum: {:.2} {} ({:.2} {unit})",
        costs.min.total_cost, config.currency, costs.min.total_time
    );

    crate::report_validation(&estimation.validate());
    Ok(())
}

pub async fn list(store: &YamlStore, args: ListArgs) -> Result<()> {
    let files = store
        .list_estimations(&args.dir)
        .await
        .context("failed to list estimations")?;

    let mut items = Vec::with_capacity(files.len());
    for file in files {
        let item = match store.load_estimation(&args.dir.join(&file)).await {
            Ok(estimation) => ListItem {
                label: estimation.label.clone(),
                tasks: estimation.task_count(),
                file,
            },
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "could not load estimation");
                ListItem {
                    file,
                    label: "(error loading)".to_string(),
                    tasks: 0,
                }
            }
        };
        items.push(item);
    }

    match args.format {
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        ListFormat::Yaml => print!("{}", serde_yaml::to_string(&items)?),
        ListFormat::Text if items.is_empty() => println!("No estimation files found."),
        ListFormat::Text => {
            println!("Estimation files:");
            for item in &items {
                println!("  {} - {} ({} tasks)", item.file, item.label, item.tasks);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name("My Project"), "my-project.estimation.yml");
        assert_eq!(default_file_name(" site "), "site.estimation.yml");
    }

    #[tokio::test]
    async fn test_new_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let store = YamlStore::new(Some(dir.path().join("config.yml")))
            .unwrap()
            .with_search_root(dir.path());
        let output = dir.path().join("site.estimation.yml");
        let args = |force| NewArgs {
            name: "Site".to_string(),
            output: Some(output.clone()),
            description: "Landing pages".to_string(),
            force,
        };

        new(&store, args(false)).await.unwrap();
        let created = store.load_estimation(&output).await.unwrap();
        assert_eq!(created.label, "Site");
        assert_eq!(created.description, "Landing pages");

        assert!(new(&store, args(false)).await.is_err());
        assert_eq!(store.load_estimation(&output).await.unwrap().id, created.id);

        new(&store, args(true)).await.unwrap();
        assert_ne!(store.load_estimation(&output).await.unwrap().id, created.id);
    }
}
