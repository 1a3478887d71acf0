//! PERT statistics over tasks and projects.
//!
//! Task durations are treated as independent: project means add up, and so
//! do variances.

use serde::{Deserialize, Serialize};

use crate::estimation::Estimation;
use crate::task::Task;

/// Expected duration and its standard deviation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    /// Expected duration
    pub weighted_mean: f64,

    /// Standard deviation of the duration
    pub standard_deviation: f64,
}

/// Supported confidence levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// One standard deviation
    #[serde(rename = "68%")]
    Percent68,
    /// 1.645 standard deviations
    #[serde(rename = "90%")]
    Percent90,
    /// Three standard deviations
    #[serde(rename = "99.7%")]
    Percent997,
}

impl ConfidenceLevel {
    /// All levels, narrowest first.
    pub const ALL: [ConfidenceLevel; 3] = [Self::Percent68, Self::Percent90, Self::Percent997];

    /// Number of standard deviations covered on each side of the mean.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Percent68 => 1.0,
            Self::Percent90 => 1.645,
            Self::Percent997 => 3.0,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Percent68 => "68%",
            Self::Percent90 => "90%",
            Self::Percent997 => "99.7%",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Bounds of the expected duration at a confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Level these bounds hold for
    pub level: ConfidenceLevel,
    /// Expected duration
    pub mean: f64,
    /// Half width of the interval
    pub deviation: f64,
    /// Lower bound, may be negative
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl EstimationResult {
    /// Interval `[mean - k*sd, mean + k*sd]` for the level's multiplier `k`.
    pub fn interval(&self, level: ConfidenceLevel) -> ConfidenceInterval {
        let deviation = self.standard_deviation * level.multiplier();
        ConfidenceInterval {
            level,
            mean: self.weighted_mean,
            deviation,
            min: self.weighted_mean - deviation,
            max: self.weighted_mean + deviation,
        }
    }
}

/// Statistics of a single task.
pub fn task_estimation(task: &Task) -> EstimationResult {
    EstimationResult {
        weighted_mean: task.weighted_mean(),
        standard_deviation: task.standard_deviation(),
    }
}

/// Statistics of a whole project.
pub fn project_estimation(estimation: &Estimation) -> EstimationResult {
    aggregate(estimation.tasks())
}

/// Statistics restricted to the tasks of one category.
pub fn category_estimation(estimation: &Estimation, category_id: &str) -> EstimationResult {
    aggregate(estimation.tasks().filter(|task| task.category == category_id))
}

fn aggregate<'a>(tasks: impl Iterator<Item = &'a Task>) -> EstimationResult {
    let (mean, variance) = tasks.fold((0.0, 0.0), |(mean, variance), task| {
        let sd = task.standard_deviation();
        (mean + task.weighted_mean(), variance + sd * sd)
    });

    EstimationResult {
        weighted_mean: mean,
        standard_deviation: f64::sqrt(variance),
    }
}
