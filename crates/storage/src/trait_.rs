//! Storage trait abstraction.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use guesstimate_core::{Config, Estimation};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File not found
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Storage abstraction for configuration and estimation files.
///
/// Writes replace whole documents: the last write wins.
#[async_trait]
pub trait EstimationStore: Send + Sync {
    // === Configuration ===

    /// Load the global configuration, falling back to defaults.
    async fn load_config(&self) -> Result<Config>;

    /// Save the global configuration.
    async fn save_config(&self, config: &Config) -> Result<()>;

    // === Estimations ===

    /// Load an estimation file.
    async fn load_estimation(&self, path: &Path) -> Result<Estimation>;

    /// Load an estimation file, creating an empty one labelled `label` if
    /// it does not exist. The flag tells whether it was created.
    async fn load_or_create_estimation(&self, path: &Path, label: &str) -> Result<(Estimation, bool)>;

    /// Save an estimation file.
    async fn save_estimation(&self, path: &Path, estimation: &Estimation) -> Result<()>;

    /// Create and save a new empty estimation.
    async fn create_estimation(&self, path: &Path, label: &str) -> Result<Estimation>;

    /// File names of the estimations found directly in `dir`, sorted.
    async fn list_estimations(&self, dir: &Path) -> Result<Vec<String>>;
}
