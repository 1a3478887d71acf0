//! Estimation model - a project owning an ordered set of tasks.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{Config, TaskCategory, TimeUnit};
use crate::error::{EstimationError, Result};
use crate::id::{EstimationId, TaskId};
use crate::task::Task;
use crate::Time;

/// A project estimation.
///
/// Tasks live in a map keyed by identifier next to an explicit ordering.
/// Both are private: every mutation goes through the methods below, which
/// keep the ordering and the map holding exactly the same identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimation {
    /// Unique identifier
    pub id: EstimationId,

    /// Project label
    pub label: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// When created
    pub created_at: Time,

    /// Last mutation
    pub updated_at: Time,

    #[serde(default)]
    ordering: Vec<TaskId>,

    #[serde(default)]
    tasks: BTreeMap<TaskId, Task>,

    /// Project specific overrides of the global configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<EstimationParams>,
}

/// Per-project parameters shadowing the global [`Config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimationParams {
    /// Replaces the whole category table when not empty
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub task_categories: BTreeMap<String, TaskCategory>,

    /// Time unit override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<TimeUnit>,

    /// Currency override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Rounding override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_up_estimations: Option<bool>,
}

impl EstimationParams {
    /// Overlay these parameters onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if !self.task_categories.is_empty() {
            config.task_categories = self.task_categories.clone();
        }
        if let Some(time_unit) = &self.time_unit {
            config.time_unit = time_unit.clone();
        }
        if let Some(currency) = &self.currency {
            config.currency = currency.clone();
        }
        if let Some(round) = self.round_up_estimations {
            config.round_up_estimations = round;
        }
    }
}

impl Estimation {
    /// Create an empty estimation.
    pub fn new(label: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EstimationId::new(),
            label: label.into(),
            description: String::new(),
            created_at: now,
            updated_at: now,
            ordering: Vec::new(),
            tasks: BTreeMap::new(),
            params: None,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.ordering.iter().position(|t| t == id)
    }

    /// Append a task at the end of the ordering.
    pub fn add_task(&mut self, task: Task) -> Result<TaskId> {
        let id = task.id().clone();
        if self.tasks.contains_key(&id) {
            return Err(EstimationError::DuplicateTask(id));
        }

        self.tasks.insert(id.clone(), task);
        self.ordering.push(id.clone());
        self.touch();
        Ok(id)
    }

    /// Remove a task, returning it.
    pub fn remove_task(&mut self, id: &TaskId) -> Result<Task> {
        let task = self
            .tasks
            .remove(id)
            .ok_or_else(|| EstimationError::TaskNotFound(id.clone()))?;

        if let Some(pos) = self.position(id) {
            self.ordering.remove(pos);
        }
        self.touch();
        Ok(task)
    }

    /// Shift a task by `offset` positions (negative moves it earlier).
    ///
    /// Tasks in between slide by one place. Returns the new position.
    pub fn move_task(&mut self, id: &TaskId, offset: isize) -> Result<usize> {
        let from = self
            .position(id)
            .ok_or_else(|| EstimationError::TaskNotFound(id.clone()))?;
        let len = self.ordering.len();

        let to = from
            .checked_add_signed(offset)
            .filter(|&to| to < len)
            .ok_or_else(|| EstimationError::MoveOutOfBounds {
                id: id.clone(),
                from,
                offset,
                len,
            })?;

        if to != from {
            let moved = self.ordering.remove(from);
            self.ordering.insert(to, moved);
            self.touch();
        }
        Ok(to)
    }

    /// Replace the stored task carrying the same identifier.
    pub fn update_task(&mut self, task: Task) -> Result<()> {
        match self.tasks.get_mut(task.id()) {
            Some(slot) => {
                *slot = task;
                self.touch();
                Ok(())
            }
            None => Err(EstimationError::TaskNotFound(task.id().clone())),
        }
    }

    /// Look up a task.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Whether a task with this identifier exists.
    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the estimation has no task.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task identifiers in display order.
    pub fn ordering(&self) -> &[TaskId] {
        &self.ordering
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.ordering.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Tasks in display order, collected.
    pub fn ordered_tasks(&self) -> Vec<&Task> {
        self.tasks().collect()
    }

    /// Repair an ordering that drifted from the task map, e.g. in a
    /// hand-edited file. Map entries keyed differently from their task's id
    /// are re-keyed; an entry whose id is already taken is dropped.
    /// Returns the number of entries re-keyed, dropped or appended.
    pub fn normalize_ordering(&mut self) -> usize {
        let rekeyed = self.rekey_tasks();

        let before = self.ordering.len();
        let mut seen = HashSet::new();
        self.ordering
            .retain(|id| self.tasks.contains_key(id) && seen.insert(id.clone()));
        let dropped = before - self.ordering.len();

        let missing: Vec<TaskId> = self
            .tasks
            .keys()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        let appended = missing.len();
        self.ordering.extend(missing);

        rekeyed + dropped + appended
    }

    fn rekey_tasks(&mut self) -> usize {
        let stale: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(key, task)| *key != task.id())
            .map(|(key, _)| key.clone())
            .collect();

        let moved: Vec<(TaskId, Task)> = stale
            .iter()
            .filter_map(|key| self.tasks.remove(key).map(|task| (key.clone(), task)))
            .collect();

        let mut renamed = HashMap::new();
        for (key, task) in moved {
            let id = task.id().clone();
            if self.tasks.contains_key(&id) {
                continue;
            }
            renamed.insert(key, id.clone());
            self.tasks.insert(id, task);
        }

        for slot in &mut self.ordering {
            if let Some(id) = renamed.get(&*slot) {
                *slot = id.clone();
            }
        }
        stale.len()
    }

    /// Advisory messages for every task with malformed estimates.
    pub fn validate(&self) -> Vec<String> {
        self.tasks()
            .flat_map(|task| {
                task.validate()
                    .into_iter()
                    .map(move |err| format!("task {}: {}", task.id(), err))
            })
            .collect()
    }

    /// Global configuration with this project's overrides applied.
    pub fn effective_config(&self, config: &Config) -> Config {
        let mut effective = config.clone();
        if let Some(params) = &self.params {
            params.apply(&mut effective);
        }
        effective
    }
}
