//! Model ingestion for Rankpage
//!
//! Turns a model file into the read-only [`Dataset`] the navigator runs on:
//! - typed cells (`int`, `int range`, `str list`, `link list`) -> value lists
//! - columns -> sorted value domains (or an explicit value order)
//! - rows -> per-entity weights for the weighted model
//! - rows -> the row table for the elimination model
//!
//! The result can be written out as a [`DatasetBundle`] so navigation does not
//! need to re-read the model.

pub mod cells;
pub mod model;
pub mod weighting;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rankpage_core::{Dataset, NavigatorConfig, Translations};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use cells::{Cell, DataType, Scalar};
pub use model::{ColumnInfo, Model, ModelConfig, ModelFile, ModelInfo};

/// Precomputed navigation input: dataset, configuration and UI strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetBundle {
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub config: NavigatorConfig,
    pub dataset: Dataset,
    #[serde(default)]
    pub translations: Translations,
}

impl DatasetBundle {
    pub fn from_model(model: &Model, translations: Translations) -> Result<Self> {
        Ok(Self {
            page_title: model.config.page_title.clone(),
            config: model.config.navigator_config(),
            dataset: model.to_dataset()?,
            translations,
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            path = %path.display(),
            entities = self.dataset.candidates().len(),
            rows = self.dataset.rows.len(),
            "wrote dataset bundle"
        );
        Ok(())
    }
}

pub fn parse_model(text: &str) -> Result<Model> {
    let file: ModelFile = serde_json::from_str(text).context("invalid model file")?;
    Model::from_file(file)
}

pub fn load_model(path: &Path) -> Result<Model> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read model {}", path.display()))?;
    let model = parse_model(&text).with_context(|| format!("in {}", path.display()))?;
    info!(
        path = %path.display(),
        columns = model.columns.len(),
        rows = model.rows.len(),
        answer = %model.answer,
        "loaded model"
    );
    Ok(model)
}

pub fn load_translations(path: &Path) -> Result<Translations> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read translations {}", path.display()))?;
    Translations::from_json_str(&text)
        .with_context(|| format!("invalid translations file {}", path.display()))
}

/// Load either a bundle written by [`DatasetBundle::write`] or a model file.
pub fn load_bundle(path: &Path) -> Result<DatasetBundle> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))?;

    if value.get("dataset").is_some() {
        let bundle: DatasetBundle = serde_json::from_value(value)
            .with_context(|| format!("invalid bundle {}", path.display()))?;
        info!(path = %path.display(), "loaded dataset bundle");
        return Ok(bundle);
    }

    let file: ModelFile = serde_json::from_value(value)
        .with_context(|| format!("invalid model file {}", path.display()))?;
    let model = Model::from_file(file).with_context(|| format!("in {}", path.display()))?;
    info!(
        path = %path.display(),
        columns = model.columns.len(),
        rows = model.rows.len(),
        "loaded model"
    );
    DatasetBundle::from_model(&model, Translations::new())
}
