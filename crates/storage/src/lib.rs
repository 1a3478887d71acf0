//! Storage abstraction and implementations for Guesstimate.
//!
//! This crate provides a trait-based storage interface with a YAML file
//! reference implementation.

#![warn(missing_docs)]

pub mod trait_;
pub mod yaml_storage;

pub use trait_::{EstimationStore, StorageError, Result};
pub use yaml_storage::{YamlStore, DEFAULT_CONFIG_FILE, ESTIMATION_FILE_SUFFIX};
