//! Guesstimate core data models.
//!
//! This crate defines three-point task estimations grouped into a project,
//! the auto-fill rules that keep each triple ordered, and the PERT
//! statistics and cost projections derived from them. Everything here is
//! synchronous and free of I/O.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;

// Domain model
mod config;
mod task;
mod estimation;

// Derived results
pub mod stats;
pub mod cost;

// Re-exports
pub use id::{EstimationId, TaskId};
pub use error::{EstimationError, Result};

pub use config::{
    Config, TaskCategory, TimeUnit, DEFAULT_AUTO_ESTIMATION_MULTIPLIER,
    DEFAULT_COST_PER_TIME_UNIT,
};
pub use task::{Estimations, Task};
pub use estimation::{Estimation, EstimationParams};

pub use stats::{
    category_estimation, project_estimation, task_estimation, ConfidenceInterval,
    ConfidenceLevel, EstimationResult,
};
pub use cost::{
    category_distribution, min_max_costs, CategoryCost, CategoryDistribution, CostEstimation,
    MinMaxCost,
};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
