//! Client for a local FLUX text-to-image backend.
//!
//! A [`GenerationController`] binds a form (prompt, width, height, steps) to
//! one HTTP call per generation, mirrors the numeric settings into durable
//! storage and exports the last displayed image.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod form;
pub mod logger;
pub mod models;
pub mod prompts;
pub mod storage;
pub mod terminal;

pub use backend::{GenerationBackend, HttpBackend};
pub use config::ClientConfig;
pub use controller::{GenerationController, UiEvent, UiState, View, ViewUpdate};
pub use error::{GenerationError, Result};
pub use export::{FileExporter, ImageExporter};
pub use form::{clamp, NumericField};
pub use models::*;
pub use storage::{FileSettingsStore, MemorySettingsStore, SettingsManager, SettingsStore};
