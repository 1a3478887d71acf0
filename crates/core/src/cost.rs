//! Category distribution and cost projection.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::estimation::Estimation;
use crate::stats::{category_estimation, project_estimation, ConfidenceLevel};

/// Share of the project's expected duration spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDistribution {
    /// Category identifier
    pub category_id: String,

    /// Category label
    pub category_label: String,

    /// Expected duration of the category's tasks
    pub time: f64,

    /// Percentage of the project's expected duration (0-100)
    pub percentage: f64,
}

/// Time and cost attributed to one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCost {
    /// Time attributed to the category
    pub time: f64,
    /// `time * cost_per_unit`
    pub cost: f64,
    /// Rate used
    pub cost_per_unit: f64,
}

/// A cost projection at one end of a confidence interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimation {
    /// Sum of category times
    pub total_time: f64,
    /// Sum of category costs
    pub total_cost: f64,
    /// Breakdown keyed by category identifier
    pub details: BTreeMap<String, CategoryCost>,
}

/// Cost projections at both ends of a confidence interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxCost {
    /// Lower end, from `max(0, mean - k*sd)`
    pub min: CostEstimation,
    /// Upper end, from `mean + k*sd`
    pub max: CostEstimation,
}

impl CostEstimation {
    fn add(&mut self, category_id: &str, time: f64, cost_per_unit: f64) {
        let cost = time * cost_per_unit;
        self.details.insert(
            category_id.to_string(),
            CategoryCost {
                time,
                cost,
                cost_per_unit,
            },
        );
        self.total_time += time;
        self.total_cost += cost;
    }
}

/// Split the project's expected duration across categories.
///
/// Configured categories come first, in key order, even when no task uses
/// them. Categories only referenced by tasks follow in order of first use.
/// A project whose expected duration is zero has no distribution.
pub fn category_distribution(estimation: &Estimation, config: &Config) -> Vec<CategoryDistribution> {
    let project = project_estimation(estimation);
    if project.weighted_mean == 0.0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let configured = config.task_categories.keys().map(String::as_str);
    let referenced = estimation.tasks().map(|task| task.category.as_str());

    configured
        .chain(referenced)
        .filter(|id| seen.insert(*id))
        .map(|id| {
            let time = category_estimation(estimation, id).weighted_mean;
            CategoryDistribution {
                category_id: id.to_string(),
                category_label: config.task_category(id).label.clone(),
                time,
                percentage: time / project.weighted_mean * 100.0,
            }
        })
        .collect()
}

/// Minimum and maximum cost at a confidence level.
///
/// The interval bounds on the project duration are split across categories
/// by their distribution share, then priced at each category's rate.
pub fn min_max_costs(estimation: &Estimation, config: &Config, level: ConfidenceLevel) -> MinMaxCost {
    let interval = project_estimation(estimation).interval(level);
    let min_time = interval.min.max(0.0);
    let max_time = interval.max;

    let mut costs = MinMaxCost::default();
    for share in category_distribution(estimation, config) {
        let rate = config.task_category(&share.category_id).cost_per_time_unit;
        let ratio = share.percentage / 100.0;
        costs.min.add(&share.category_id, ratio * min_time, rate);
        costs.max.add(&share.category_id, ratio * max_time, rate);
    }
    costs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskCategory;
    use crate::task::Task;

    fn task(label: &str, category: &str, o: f64, l: f64, p: f64) -> Task {
        let mut task = Task::new(label, category);
        task.set_estimations(o, l, p, 0.33);
        task
    }

    fn dev_config() -> Config {
        let mut config = Config::default();
        config.task_categories.clear();
        config
            .task_categories
            .insert("dev".to_string(), TaskCategory::new("Development", 500.0));
        config
    }

    #[test]
    fn test_two_task_scenario() {
        let config = dev_config();
        let mut estimation = Estimation::new("Scenario");
        estimation.add_task(task("A", "dev", 2.0, 4.0, 6.0)).unwrap();
        estimation.add_task(task("B", "dev", 1.0, 2.0, 3.0)).unwrap();

        let project = project_estimation(&estimation);
        assert_eq!(project.weighted_mean, 6.0);
        assert!((project.standard_deviation - 0.745).abs() < 1e-3);

        let interval = project.interval(ConfidenceLevel::Percent997);
        assert!((interval.deviation - 2.236).abs() < 1e-3);

        let distribution = category_distribution(&estimation, &config);
        assert_eq!(distribution.len(), 1);
        assert_eq!(distribution[0].category_id, "dev");
        assert_eq!(distribution[0].time, 6.0);
        assert!((distribution[0].percentage - 100.0).abs() < 1e-9);

        let costs = min_max_costs(&estimation, &config, ConfidenceLevel::Percent997);
        assert!((costs.max.total_cost - 4118.0).abs() < 1.0);
        assert!((costs.max.total_time - interval.max).abs() < 1e-9);
        assert!((costs.min.total_time - interval.min).abs() < 1e-9);
        assert_eq!(costs.max.details["dev"].cost_per_unit, 500.0);
    }

    #[test]
    fn test_distribution_lists_configured_then_unknown_categories() {
        let config = Config::default();
        let mut estimation = Estimation::new("Mixed");
        estimation.add_task(task("Mockups", "design", 1.0, 2.0, 3.0)).unwrap();
        estimation.add_task(task("API", "development", 2.0, 4.0, 6.0)).unwrap();
        estimation.add_task(task("More mockups", "design", 1.0, 2.0, 3.0)).unwrap();

        let distribution = category_distribution(&estimation, &config);
        let ids: Vec<&str> = distribution.iter().map(|d| d.category_id.as_str()).collect();
        assert_eq!(ids, vec!["development", "project-management", "testing", "design"]);

        let design = &distribution[3];
        assert_eq!(design.category_label, "design");
        assert_eq!(design.time, 4.0);
        assert!((design.percentage - 50.0).abs() < 1e-9);
        assert_eq!(distribution[1].percentage, 0.0);

        let total: f64 = distribution.iter().map(|d| d.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_mean_project_has_no_distribution() {
        let config = Config::default();
        let mut estimation = Estimation::new("Zero");
        estimation.add_task(Task::new("unestimated", "development")).unwrap();

        assert!(category_distribution(&estimation, &config).is_empty());

        let costs = min_max_costs(&estimation, &config, ConfidenceLevel::Percent68);
        assert_eq!(costs, MinMaxCost::default());
    }

    #[test]
    fn test_min_time_is_clamped_at_zero() {
        let config = dev_config();
        let mut estimation = Estimation::new("Wide");
        // mean = (0 + 4 + 30) / 6 = 5.67, sd = 5, 99.7% lower bound < 0
        estimation.add_task(task("Spike", "dev", 0.0, 1.0, 30.0)).unwrap();

        let costs = min_max_costs(&estimation, &config, ConfidenceLevel::Percent997);
        assert_eq!(costs.min.total_time, 0.0);
        assert_eq!(costs.min.total_cost, 0.0);
        assert!(costs.max.total_time > 20.0);
    }

    #[test]
    fn test_costs_use_category_rates() {
        let mut config = dev_config();
        config
            .task_categories
            .insert("qa".to_string(), TaskCategory::new("QA", 300.0));
        let mut estimation = Estimation::new("Rates");
        estimation.add_task(task("Build", "dev", 3.0, 3.0, 3.0)).unwrap();
        estimation.add_task(task("Check", "qa", 1.0, 1.0, 1.0)).unwrap();

        let costs = min_max_costs(&estimation, &config, ConfidenceLevel::Percent90);
        // No spread: min and max both equal the mean.
        assert!((costs.min.total_time - 4.0).abs() < 1e-9);
        assert!((costs.max.total_cost - (3.0 * 500.0 + 1.0 * 300.0)).abs() < 1e-9);
        assert!((costs.max.details["qa"].cost - 300.0).abs() < 1e-9);
    }
}
