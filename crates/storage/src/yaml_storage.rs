//! YAML file storage implementation.
//!
//! The global configuration lives in a `.guesstimate.yml` file found in the
//! working directory or one of its ancestors. Each estimation is a
//! standalone `<name>.estimation.yml` document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use guesstimate_core::{Config, Estimation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use super::{EstimationStore, Result, StorageError};

/// Default name of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = ".guesstimate.yml";

/// Suffix identifying estimation files.
pub const ESTIMATION_FILE_SUFFIX: &str = ".estimation.yml";

/// File-based YAML storage backend.
#[derive(Debug, Clone)]
pub struct YamlStore {
    config_file: Option<PathBuf>,
    search_root: PathBuf,
}

impl YamlStore {
    /// Create a store.
    ///
    /// With an explicit `config_file`, that file is used as-is. Otherwise the
    /// configuration is searched from the current directory upward.
    pub fn new(config_file: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            config_file,
            search_root: std::env::current_dir()?,
        })
    }

    /// Start the configuration search from `root` instead of the current directory.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = root.into();
        self
    }

    /// Path of the configuration file in use, if one exists.
    pub async fn config_path(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.config_file {
            return Ok(fs::try_exists(path).await?.then(|| path.clone()));
        }

        for dir in self.search_root.ancestors() {
            let candidate = dir.join(DEFAULT_CONFIG_FILE);
            if fs::try_exists(&candidate).await? {
                debug!(path = %candidate.display(), "found configuration file");
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Where `save_config` writes: the explicit file, the discovered one, or
    /// a new file in the search root.
    pub async fn config_target(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config_file {
            return Ok(path.clone());
        }
        Ok(match self.config_path().await? {
            Some(path) => path,
            None => self.search_root.join(DEFAULT_CONFIG_FILE),
        })
    }
}

#[async_trait::async_trait]
impl EstimationStore for YamlStore {
    async fn load_config(&self) -> Result<Config> {
        let Some(path) = self.config_path().await? else {
            debug!("no configuration file, using defaults");
            return Ok(Config::default());
        };

        match read_yaml(&path).await? {
            Some(config) => Ok(config),
            None => {
                warn!(path = %path.display(), "configuration file disappeared, using defaults");
                Ok(Config::default())
            }
        }
    }

    async fn save_config(&self, config: &Config) -> Result<()> {
        let path = self.config_target().await?;
        write_yaml(&path, config).await
    }

    async fn load_estimation(&self, path: &Path) -> Result<Estimation> {
        let mut estimation: Estimation = read_yaml(path)
            .await?
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))?;

        let repaired = estimation.normalize_ordering();
        if repaired > 0 {
            warn!(
                path = %path.display(),
                repaired,
                "task list was inconsistent with its ordering and was repaired"
            );
        }
        Ok(estimation)
    }

    async fn load_or_create_estimation(&self, path: &Path, label: &str) -> Result<(Estimation, bool)> {
        match self.load_estimation(path).await {
            Ok(estimation) => Ok((estimation, false)),
            Err(StorageError::NotFound(_)) => {
                let estimation = self.create_estimation(path, label).await?;
                Ok((estimation, true))
            }
            Err(e) => Err(e),
        }
    }

    async fn save_estimation(&self, path: &Path, estimation: &Estimation) -> Result<()> {
        write_yaml(path, estimation).await
    }

    async fn create_estimation(&self, path: &Path, label: &str) -> Result<Estimation> {
        let estimation = Estimation::new(label);
        self.save_estimation(path, &estimation).await?;
        Ok(estimation)
    }

    async fn list_estimations(&self, dir: &Path) -> Result<Vec<String>> {
        let mut rd = match fs::read_dir(dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = rd.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(ESTIMATION_FILE_SUFFIX) {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }
}

async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(yaml) => {
            debug!(path = %path.display(), "read");
            let value = serde_yaml::from_str(&yaml)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_yaml<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value)?;
    fs::write(path, yaml.as_bytes()).await?;
    debug!(path = %path.display(), "written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use guesstimate_core::{Task, TaskCategory};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> YamlStore {
        YamlStore {
            config_file: None,
            search_root: dir.path().to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_missing_config_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.config_path().await.unwrap().is_none());
        let config = store.load_config().await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_config_found_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let mut config = Config::default();
        config.currency = "$".to_string();
        store_in(&dir).save_config(&config).await.unwrap();

        let store = store_in(&dir).with_search_root(&nested);
        assert_eq!(
            store.config_path().await.unwrap(),
            Some(dir.path().join(DEFAULT_CONFIG_FILE))
        );
        assert_eq!(store.load_config().await.unwrap().currency, "$");
    }

    #[tokio::test]
    async fn test_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        std::fs::write(
            &path,
            "taskCategories:\n  ops:\n    label: Operations\n    costPerTimeUnit: 650\ncurrency: CHF\n",
        )
        .unwrap();

        let store = YamlStore {
            config_file: Some(path.clone()),
            search_root: dir.path().to_path_buf(),
        };
        let config = store.load_config().await.unwrap();
        assert_eq!(config.currency, "CHF");
        assert_eq!(
            config.task_categories.get("ops"),
            Some(&TaskCategory::new("Operations", 650.0))
        );
        assert_eq!(config.task_categories.len(), 1);
        assert_eq!(store.config_target().await.unwrap(), path);
    }

    #[tokio::test]
    async fn test_estimation_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("site.estimation.yml");

        let mut estimation = store.create_estimation(&path, "Site").await.unwrap();
        let mut task = Task::new("Landing page", "development");
        task.set_estimations(2.0, 4.0, 6.0, 0.33);
        let id = estimation.add_task(task).unwrap();
        store.save_estimation(&path, &estimation).await.unwrap();

        let loaded = store.load_estimation(&path).await.unwrap();
        assert_eq!(loaded.label, "Site");
        assert_eq!(loaded.ordering(), &[id.clone()]);
        assert_eq!(loaded.task(&id).unwrap().weighted_mean(), 4.0);
        assert_eq!(loaded, estimation);
    }

    #[tokio::test]
    async fn test_load_missing_estimation() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store
            .load_estimation(&dir.path().join("nope.estimation.yml"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_or_create() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("new.estimation.yml");

        let (first, created) = store.load_or_create_estimation(&path, "New").await.unwrap();
        assert!(created);
        assert!(path.exists());

        let (second, created) = store.load_or_create_estimation(&path, "Other").await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.label, "New");
    }

    #[tokio::test]
    async fn test_hand_edited_file_is_normalized() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("edited.estimation.yml");
        std::fs::write(
            &path,
            r#"id: p1
label: Edited
createdAt: 2024-01-01T00:00:00Z
updatedAt: 2024-01-01T00:00:00Z
ordering: [ghost]
tasks:
  t1:
    id: t1
    label: Orphan
    category: testing
    estimations: {optimistic: 1, likely: 2, pessimistic: 3}
"#,
        )
        .unwrap();

        let estimation = store.load_estimation(&path).await.unwrap();
        assert_eq!(estimation.ordering().len(), 1);
        assert_eq!(estimation.ordering()[0].as_str(), "t1");
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let path = dir.path().join("broken.estimation.yml");
        std::fs::write(&path, "label: [unterminated").unwrap();

        let err = store.load_estimation(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_list_estimations() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for name in ["b.estimation.yml", "a.estimation.yml", "notes.yml", "c.yml"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("dir.estimation.yml")).unwrap();

        let files = store.list_estimations(dir.path()).await.unwrap();
        assert_eq!(files, vec!["a.estimation.yml", "b.estimation.yml"]);

        let missing = store.list_estimations(&dir.path().join("missing")).await.unwrap();
        assert!(missing.is_empty());
    }
}
