//! Configuration policy - categories, time unit, currency and auto-fill tuning.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Multiplier used by auto-fill when none (or an unusable one) is configured.
pub const DEFAULT_AUTO_ESTIMATION_MULTIPLIER: f64 = 0.33;

/// Cost rate given to categories that are referenced but not configured.
pub const DEFAULT_COST_PER_TIME_UNIT: f64 = 500.0;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Categories keyed by identifier
    pub task_categories: BTreeMap<String, TaskCategory>,

    /// Unit every estimate is expressed in
    pub time_unit: TimeUnit,

    /// Currency symbol appended to costs
    pub currency: String,

    /// Round computed durations up to the next integer for display
    pub round_up_estimations: bool,

    /// Spread between adjacent estimates used by auto-fill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_estimation_multiplier: Option<f64>,
}

/// A category of tasks with its cost rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCategory {
    /// Human readable label
    pub label: String,

    /// Cost of one time unit of work
    pub cost_per_time_unit: f64,
}

impl TaskCategory {
    /// Create a category.
    pub fn new(label: impl Into<String>, cost_per_time_unit: f64) -> Self {
        Self {
            label: label.into(),
            cost_per_time_unit,
        }
    }
}

/// Time unit used for estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUnit {
    /// Full label, e.g. "man-day"
    pub label: String,

    /// Short form, e.g. "md"
    pub acronym: String,
}

impl Default for TimeUnit {
    fn default() -> Self {
        Self {
            label: "man-day".to_string(),
            acronym: "md".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let task_categories = [
            ("development", "Development"),
            ("project-management", "Project Management"),
            ("testing", "Testing"),
        ]
        .into_iter()
        .map(|(id, label)| {
            (
                id.to_string(),
                TaskCategory::new(label, DEFAULT_COST_PER_TIME_UNIT),
            )
        })
        .collect();

        Self {
            task_categories,
            time_unit: TimeUnit::default(),
            currency: "€ H.T.".to_string(),
            round_up_estimations: true,
            auto_estimation_multiplier: Some(DEFAULT_AUTO_ESTIMATION_MULTIPLIER),
        }
    }
}

impl Config {
    /// Multiplier for auto-fill, always within (0, 1).
    pub fn auto_estimation_multiplier(&self) -> f64 {
        match self.auto_estimation_multiplier {
            Some(m) if m > 0.0 && m < 1.0 => m,
            _ => DEFAULT_AUTO_ESTIMATION_MULTIPLIER,
        }
    }

    /// Look up a category.
    ///
    /// Unknown identifiers resolve to a synthesized category labelled with
    /// the identifier itself and priced at [`DEFAULT_COST_PER_TIME_UNIT`].
    pub fn task_category(&self, id: &str) -> Cow<'_, TaskCategory> {
        match self.task_categories.get(id) {
            Some(category) => Cow::Borrowed(category),
            None => Cow::Owned(TaskCategory::new(id, DEFAULT_COST_PER_TIME_UNIT)),
        }
    }

    /// Whether the category is declared in this configuration.
    pub fn has_category(&self, id: &str) -> bool {
        self.task_categories.contains_key(id)
    }

    /// Identifier of the first configured category, used as default for new tasks.
    pub fn first_category_id(&self) -> Option<&str> {
        self.task_categories.keys().next().map(String::as_str)
    }

    /// Apply the display rounding policy.
    pub fn round(&self, value: f64) -> f64 {
        if self.round_up_estimations {
            value.ceil()
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.task_categories.len(), 3);
        assert_eq!(config.time_unit.acronym, "md");
        assert!(config.round_up_estimations);
        assert_eq!(config.first_category_id(), Some("development"));
    }

    #[test]
    fn test_unknown_category_is_synthesized() {
        let config = Config::default();

        let known = config.task_category("testing");
        assert!(matches!(known, Cow::Borrowed(_)));
        assert_eq!(known.label, "Testing");

        let unknown = config.task_category("design");
        assert!(matches!(unknown, Cow::Owned(_)));
        assert_eq!(unknown.label, "design");
        assert_eq!(unknown.cost_per_time_unit, DEFAULT_COST_PER_TIME_UNIT);
    }

    #[test]
    fn test_multiplier_fallback() {
        let mut config = Config::default();
        config.auto_estimation_multiplier = Some(0.5);
        assert_eq!(config.auto_estimation_multiplier(), 0.5);

        for bad in [None, Some(0.0), Some(-0.2), Some(1.5)] {
            config.auto_estimation_multiplier = bad;
            assert_eq!(
                config.auto_estimation_multiplier(),
                DEFAULT_AUTO_ESTIMATION_MULTIPLIER
            );
        }
    }

    #[test]
    fn test_first_category_of_empty_table() {
        let config = Config {
            task_categories: BTreeMap::new(),
            ..Config::default()
        };
        assert_eq!(config.first_category_id(), None);
    }

    #[test]
    fn test_round() {
        let mut config = Config::default();
        assert_eq!(config.round(2.1), 3.0);
        config.round_up_estimations = false;
        assert_eq!(config.round(2.1), 2.1);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"currency": "$"}"#).unwrap();
        assert_eq!(config.currency, "$");
        assert_eq!(config.time_unit, TimeUnit::default());
        assert_eq!(config.task_categories.len(), 3);

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("taskCategories").is_some());
        assert!(json["taskCategories"]["testing"].get("costPerTimeUnit").is_some());
    }
}
