//! Task model - a single three-point estimated unit of work.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_AUTO_ESTIMATION_MULTIPLIER;
use crate::id::TaskId;

/// A task carries an optimistic / likely / pessimistic estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,

    /// Task label
    pub label: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category identifier, a key into the configured categories
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    estimations: Estimations,
}

/// The three raw estimate values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Estimations {
    /// Best case
    pub optimistic: f64,

    /// Most likely case
    pub likely: f64,

    /// Worst case
    pub pessimistic: f64,
}

impl Estimations {
    /// Build a triple without any inference.
    pub fn new(optimistic: f64, likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic,
            likely,
            pessimistic,
        }
    }

    /// Infer missing values and enforce `optimistic <= likely <= pessimistic`.
    ///
    /// A value of exactly zero means "not provided". Values inferred upward
    /// are rounded up, values inferred downward are rounded down and never
    /// go below zero. Provided values are kept unless they break the
    /// ordering, in which case the later value is pushed up.
    pub fn auto_fill(optimistic: f64, likely: f64, pessimistic: f64, multiplier: f64) -> Self {
        let m = if multiplier > 0.0 && multiplier < 1.0 {
            multiplier
        } else {
            DEFAULT_AUTO_ESTIMATION_MULTIPLIER
        };
        let up = |v: f64| (v * (1.0 + m)).ceil();
        let down = |v: f64| (v * (1.0 - m)).floor().max(0.0);

        let mut o = optimistic.max(0.0);
        let mut l = likely.max(0.0);
        let mut p = pessimistic.max(0.0);

        match (o > 0.0, l > 0.0, p > 0.0) {
            (true, false, false) => {
                l = up(o);
                p = up(l);
            }
            (false, true, false) => {
                o = down(l);
                p = up(l);
            }
            (false, false, true) => {
                l = down(p);
                o = down(l);
            }
            (true, true, false) => {
                p = up(l);
            }
            (true, false, true) => {
                l = ((o + p) / 2.0).ceil().clamp(o.min(p), o.max(p));
            }
            (false, true, true) => {
                o = down(l);
            }
            // Nothing or everything provided
            _ => {}
        }

        if l < o {
            l = up(o);
        }
        if p < l {
            p = up(l);
        }

        Self::new(o, l, p)
    }

    /// PERT expected value: `(O + 4L + P) / 6`.
    pub fn weighted_mean(&self) -> f64 {
        (self.optimistic + 4.0 * self.likely + self.pessimistic) / 6.0
    }

    /// PERT standard deviation: `(P - O) / 6`.
    pub fn standard_deviation(&self) -> f64 {
        (self.pessimistic - self.optimistic) / 6.0
    }

    /// Human readable ordering and sign violations. Empty when well-formed.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.optimistic < 0.0 {
            errors.push("optimistic estimate must be >= 0".to_string());
        }
        if self.likely < 0.0 {
            errors.push("likely estimate must be >= 0".to_string());
        }
        if self.pessimistic < 0.0 {
            errors.push("pessimistic estimate must be >= 0".to_string());
        }
        if self.likely < self.optimistic {
            errors.push("likely estimate should be >= optimistic estimate".to_string());
        }
        if self.pessimistic < self.likely {
            errors.push("pessimistic estimate should be >= likely estimate".to_string());
        }

        errors
    }
}

impl Task {
    /// Create a task with zeroed estimates.
    pub fn new(label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            label: label.into(),
            description: None,
            category: category.into(),
            estimations: Estimations::default(),
        }
    }

    /// Task identifier, fixed at creation.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Current estimate values.
    pub fn estimations(&self) -> Estimations {
        self.estimations
    }

    /// Set the three estimates, auto-filling missing ones.
    ///
    /// See [`Estimations::auto_fill`].
    pub fn set_estimations(&mut self, optimistic: f64, likely: f64, pessimistic: f64, multiplier: f64) {
        self.estimations = Estimations::auto_fill(optimistic, likely, pessimistic, multiplier);
    }

    /// Expected duration.
    pub fn weighted_mean(&self) -> f64 {
        self.estimations.weighted_mean()
    }

    /// Spread of the duration.
    pub fn standard_deviation(&self) -> f64 {
        self.estimations.standard_deviation()
    }

    /// Advisory check of the estimates, see [`Estimations::validate`].
    pub fn validate(&self) -> Vec<String> {
        self.estimations.validate()
    }
}
