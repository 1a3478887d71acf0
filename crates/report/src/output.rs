//! Report model - an estimation with every computed value attached.

use std::collections::BTreeMap;

use guesstimate_core::{
    category_distribution, min_max_costs, project_estimation, task_estimation,
    CategoryDistribution, ConfidenceInterval, ConfidenceLevel, Config, Estimation,
    EstimationResult, Estimations,
};
use serde::{Deserialize, Serialize};

/// Confidence level used for the cost section.
pub const COST_CONFIDENCE: ConfidenceLevel = ConfidenceLevel::Percent997;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Complete, display-ready view of an estimation.
///
/// Durations are rounded according to the configuration; costs and
/// percentages are kept exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Estimation identifier
    pub id: String,
    /// Project label
    pub label: String,
    /// Project description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Creation time, UTC
    pub created_at: String,
    /// Last update, UTC
    pub updated_at: String,

    /// Tasks in display order
    pub tasks: Vec<TaskReport>,

    /// Project level statistics
    pub statistics: StatisticsReport,

    /// Share of time per category
    pub category_distribution: Vec<CategoryDistribution>,

    /// Cost projection
    pub costs: CostReport,
}

/// A task with its computed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    /// Task identifier
    pub id: String,
    /// Task label
    pub label: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category identifier
    pub category: String,
    /// Resolved category label
    pub category_label: String,
    /// Raw estimates
    pub estimations: Estimations,
    /// Mean and deviation
    pub calculated: EstimationResult,
}

/// Project statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    /// Number of tasks
    pub task_count: usize,
    /// Expected duration
    pub weighted_mean: f64,
    /// Standard deviation
    pub standard_deviation: f64,
    /// 68% interval
    pub confidence68: ConfidenceInterval,
    /// 90% interval
    pub confidence90: ConfidenceInterval,
    /// 99.7% interval
    pub confidence997: ConfidenceInterval,
}

/// Cost section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReport {
    /// Currency symbol
    pub currency: String,
    /// Time unit acronym
    pub time_unit: String,
    /// Upper bound
    pub max: CostDetail,
    /// Lower bound
    pub min: CostDetail,
    /// Upper bound per category
    pub by_category: BTreeMap<String, CostDetail>,
}

/// Time and cost pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostDetail {
    /// Duration
    pub time: f64,
    /// Cost
    pub cost: f64,
}

impl Report {
    /// Compute every value shown for `estimation` under `config`.
    pub fn build(estimation: &Estimation, config: &Config) -> Self {
        let round = |v: f64| config.round(v);

        let project = project_estimation(estimation);
        let interval = |level: ConfidenceLevel| {
            let i = project.interval(level);
            ConfidenceInterval {
                level,
                mean: round(i.mean),
                deviation: round(i.deviation),
                min: round(i.min),
                max: round(i.max),
            }
        };

        let tasks = estimation
            .tasks()
            .map(|task| {
                let result = task_estimation(task);
                TaskReport {
                    id: task.id().to_string(),
                    label: task.label.clone(),
                    description: task.description.clone(),
                    category: task.category.clone(),
                    category_label: config.task_category(&task.category).label.clone(),
                    estimations: task.estimations(),
                    calculated: EstimationResult {
                        weighted_mean: round(result.weighted_mean),
                        standard_deviation: round(result.standard_deviation),
                    },
                }
            })
            .collect();

        let category_distribution = category_distribution(estimation, config)
            .into_iter()
            .map(|d| CategoryDistribution {
                time: round(d.time),
                ..d
            })
            .collect();

        let costs = min_max_costs(estimation, config, COST_CONFIDENCE);
        let by_category = costs
            .max
            .details
            .iter()
            .map(|(id, c)| {
                (
                    id.clone(),
                    CostDetail {
                        time: round(c.time),
                        cost: c.cost,
                    },
                )
            })
            .collect();

        Self {
            id: estimation.id.to_string(),
            label: estimation.label.clone(),
            description: estimation.description.clone(),
            created_at: estimation.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: estimation.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            tasks,
            statistics: StatisticsReport {
                task_count: estimation.task_count(),
                weighted_mean: round(project.weighted_mean),
                standard_deviation: round(project.standard_deviation),
                confidence68: interval(ConfidenceLevel::Percent68),
                confidence90: interval(ConfidenceLevel::Percent90),
                confidence997: interval(ConfidenceLevel::Percent997),
            },
            category_distribution,
            costs: CostReport {
                currency: config.currency.clone(),
                time_unit: config.time_unit.acronym.clone(),
                max: CostDetail {
                    time: round(costs.max.total_time),
                    cost: costs.max.total_cost,
                },
                min: CostDetail {
                    time: round(costs.min.total_time),
                    cost: costs.min.total_cost,
                },
                by_category,
            },
        }
    }

    /// Intervals from narrowest to widest.
    pub fn intervals(&self) -> [&ConfidenceInterval; 3] {
        [
            &self.statistics.confidence68,
            &self.statistics.confidence90,
            &self.statistics.confidence997,
        ]
    }
}
