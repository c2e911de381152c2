//! Model file parsing and dataset precomputation.
//!
//! A model file is a JSON document with a data table plus optional sections:
//!
//! ```json
//! {
//!   "config": {"answer_column": "species", "page_title": "Pets"},
//!   "data_types": {"legs": "int"},
//!   "order": {"size": "small, medium, large"},
//!   "data": {"columns": ["species", "size", "legs"], "rows": [["cat", "small", 4]]},
//!   "links": {"details": {"cat": "pages/cat.html"}, "categories": {}},
//!   "photos": {"cat": ["img/cat.jpg"]}
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::{bail, Context, Result};
use rankpage_core::{
    Dataset, LinkTables, ModelKind, NavigatorConfig, Row, RowTable, ValueDomains, WeightTable,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::cells::{convert_cell, Cell, DataType, Scalar};
use crate::weighting::{binary_weights, ordered_weights};

// ============================================================================
// Raw file layout
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Column whose values are the navigable entities; the first column if unset.
    #[serde(default)]
    pub answer_column: Option<String>,
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub mode: Option<ModelKind>,
    #[serde(default)]
    pub translate_values: Option<bool>,
}

impl ModelConfig {
    pub fn navigator_config(&self) -> NavigatorConfig {
        let defaults = NavigatorConfig::default();
        NavigatorConfig {
            mode: self.mode.unwrap_or(defaults.mode),
            answer_attribute: self.answer_column.clone(),
            translate_values: self.translate_values.unwrap_or(defaults.translate_values),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<JsonValue>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkSection {
    #[serde(default)]
    pub details: HashMap<String, String>,
    #[serde(default)]
    pub categories: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub config: ModelConfig,
    #[serde(default)]
    pub data_types: BTreeMap<String, String>,
    /// Column -> ordered values, as a comma-separated string or an array.
    #[serde(default)]
    pub order: BTreeMap<String, JsonValue>,
    pub data: DataSection,
    #[serde(default)]
    pub links: LinkSection,
    #[serde(default)]
    pub photos: HashMap<String, Vec<String>>,
}

// ============================================================================
// Typed model
// ============================================================================

/// A validated model: typed cells, resolved answer column and value orders.
#[derive(Debug, Clone)]
pub struct Model {
    pub config: ModelConfig,
    pub columns: Vec<String>,
    pub answer: String,
    pub rows: Vec<Vec<Cell>>,
    /// Explicit value orders, converted with the column's data type.
    pub order: BTreeMap<String, Vec<Scalar>>,
    pub links: LinkTables,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub answer: String,
    pub rows: usize,
    /// Non-answer columns with their value domains.
    pub columns: Vec<ColumnInfo>,
    /// Number of distinct filter paths: `n! * product(|domain|)`, saturating.
    pub total_count: u128,
}

impl Model {
    pub fn from_file(file: ModelFile) -> Result<Self> {
        let ModelFile {
            config,
            data_types,
            order,
            data,
            links,
            photos,
        } = file;

        if data.columns.is_empty() {
            bail!("model has no columns");
        }
        let mut seen = BTreeSet::new();
        for column in &data.columns {
            if !seen.insert(column.as_str()) {
                bail!("duplicate column '{column}'");
            }
        }

        let answer = match &config.answer_column {
            Some(answer) => {
                if !data.columns.contains(answer) {
                    bail!("answer column '{answer}' is not a model column");
                }
                answer.clone()
            }
            None => data.columns[0].clone(),
        };

        let mut types: HashMap<&str, DataType> = HashMap::new();
        for (column, name) in &data_types {
            let ty = name
                .parse::<DataType>()
                .with_context(|| format!("data type of column '{column}'"))?;
            if data.columns.contains(column) {
                types.insert(column.as_str(), ty);
            } else {
                debug!(column = %column, "data type for unknown column ignored");
            }
        }

        let mut rows = Vec::with_capacity(data.rows.len());
        for (index, raw_row) in data.rows.iter().enumerate() {
            if raw_row.len() != data.columns.len() {
                bail!(
                    "row {index} has {} cells, expected {}",
                    raw_row.len(),
                    data.columns.len()
                );
            }
            let mut row = Vec::with_capacity(raw_row.len());
            for (column, cell) in data.columns.iter().zip(raw_row) {
                let converted = convert_cell(cell, types.get(column.as_str()).copied(), None)
                    .with_context(|| format!("row {index}, column '{column}'"))?;
                row.push(converted);
            }
            rows.push(row);
        }

        let mut orders = BTreeMap::new();
        for (column, raw) in &order {
            if !data.columns.contains(column) {
                warn!(column = %column, "order list for unknown column ignored");
                continue;
            }
            let ty = types
                .get(column.as_str())
                .copied()
                .unwrap_or(DataType::StrList);
            let values = convert_cell(raw, Some(ty), Some(false))
                .with_context(|| format!("order list of column '{column}'"))?;
            orders.insert(column.clone(), values);
        }

        Ok(Self {
            config,
            columns: data.columns,
            answer,
            rows,
            order: orders,
            links: LinkTables {
                details: links.details,
                categories: links.categories,
                photos,
            },
        })
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Non-answer columns, in model order.
    pub fn filter_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |c| *c != self.answer)
    }

    /// Sorted distinct values of a column, ignoring any order list.
    pub fn sorted_domain(&self, column: &str) -> Vec<Scalar> {
        let Some(index) = self.column_index(column) else {
            return Vec::new();
        };
        let values: BTreeSet<&Scalar> = self.rows.iter().flat_map(|row| &row[index]).collect();
        values.into_iter().cloned().collect()
    }

    /// Display domain: the explicit order list if there is one, else sorted.
    pub fn domain(&self, column: &str) -> Vec<Scalar> {
        match self.order.get(column) {
            Some(order) => order.clone(),
            None => self.sorted_domain(column),
        }
    }

    pub fn domains(&self) -> ValueDomains {
        self.columns
            .iter()
            .map(|column| (column.as_str(), stringify(&self.domain(column))))
            .collect()
    }

    fn entity_id(&self, row: &[Cell], index: usize) -> Result<String> {
        let answer_index = self
            .column_index(&self.answer)
            .with_context(|| format!("answer column '{}' missing", self.answer))?;
        match row[answer_index].as_slice() {
            [single] => Ok(single.to_string()),
            other => bail!(
                "row {index}: answer cell must hold exactly one value, found {}",
                other.len()
            ),
        }
    }

    /// Entity -> attribute -> value -> weight for every row.
    pub fn weights(&self) -> Result<WeightTable> {
        let mut table = WeightTable::new();
        let domains: HashMap<&str, Vec<Scalar>> = self
            .filter_columns()
            .map(|c| (c, self.sorted_domain(c)))
            .collect();

        for (index, row) in self.rows.iter().enumerate() {
            let entity = self.entity_id(row, index)?;
            if table.entities().any(|e| e == entity) {
                warn!(entity = %entity, row = index, "duplicate entity, later row wins");
            }
            for (column, cell) in self.columns.iter().zip(row) {
                if *column == self.answer {
                    continue;
                }
                let weights = match self.order.get(column) {
                    Some(order) => ordered_weights(cell, order)
                        .with_context(|| format!("row {index}, column '{column}'"))?,
                    None => binary_weights(cell, &domains[column.as_str()]),
                };
                table.insert_attribute(
                    entity.as_str(),
                    column.as_str(),
                    weights
                        .into_iter()
                        .map(|(value, weight)| (value.to_string(), weight))
                        .collect(),
                );
            }
        }
        Ok(table)
    }

    /// The raw table for row elimination, every cell as a value list.
    pub fn row_table(&self) -> RowTable {
        self.rows
            .iter()
            .map(|row| {
                Row::from_pairs(
                    self.columns
                        .iter()
                        .zip(row)
                        .map(|(column, cell)| (column.clone(), stringify(cell))),
                )
            })
            .collect()
    }

    /// Precompute everything both navigation models need.
    pub fn to_dataset(&self) -> Result<Dataset> {
        Ok(Dataset {
            answer_attribute: self.answer.clone(),
            domains: self.domains(),
            weights: self.weights()?,
            rows: self.row_table(),
            links: self.links.clone(),
        })
    }

    pub fn info(&self) -> ModelInfo {
        let columns: Vec<ColumnInfo> = self
            .filter_columns()
            .map(|name| ColumnInfo {
                name: name.to_string(),
                values: stringify(&self.sorted_domain(name)),
            })
            .collect();
        let permutations = (1..=columns.len() as u128).fold(1u128, |acc, n| acc.saturating_mul(n));
        let total_count = columns
            .iter()
            .fold(permutations, |acc, c| acc.saturating_mul(c.values.len() as u128));
        ModelInfo {
            answer: self.answer.clone(),
            rows: self.rows.len(),
            columns,
            total_count,
        }
    }
}

fn stringify(values: &[Scalar]) -> Vec<String> {
    values.iter().map(Scalar::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(value: JsonValue) -> Result<Model> {
        Model::from_file(serde_json::from_value(value)?)
    }

    #[test]
    fn answer_defaults_to_first_column() {
        let m = model(json!({"data": {"columns": ["species", "size"], "rows": [["cat", "small"]]}}))
            .unwrap();
        assert_eq!(m.answer, "species");
        assert_eq!(m.filter_columns().collect::<Vec<_>>(), vec!["size"]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = model(json!({"data": {"columns": ["a", "b"], "rows": [["x"]]}})).unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn unknown_data_type_names_the_column() {
        let err = model(json!({
            "data_types": {"legs": "float"},
            "data": {"columns": ["species", "legs"], "rows": []}
        }))
        .unwrap_err();
        assert!(format!("{err:#}").contains("legs"));
    }

    #[test]
    fn integer_domains_sort_numerically() {
        let m = model(json!({
            "data_types": {"legs": "int range"},
            "data": {"columns": ["species", "legs"], "rows": [["a", "10"], ["b", "2-3"]]}
        }))
        .unwrap();
        assert_eq!(stringify(&m.domain("legs")), vec!["2", "3", "10"]);
    }

    #[test]
    fn total_count_multiplies_permutations_and_domains() {
        let m = model(json!({
            "data": {
                "columns": ["species", "color", "size"],
                "rows": [["cat", "red", "small"], ["dog", "blue", "small"], ["cow", "blue", "large"]]
            }
        }))
        .unwrap();
        // 2! * 2 colors * 2 sizes
        assert_eq!(m.info().total_count, 8);
    }
}
