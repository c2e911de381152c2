//! Typed cell values and column data-type conversions.
//!
//! Every cell of a model table is first stringified, then converted with the
//! column's declared data type. A converted cell is always a list of
//! [`Scalar`]s; a plain cell is a one-element list.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value as JsonValue;

/// A single converted value.
///
/// Ordering puts integers (numerically) before text (lexicographically), which
/// is the order value domains are sorted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

/// A converted cell.
pub type Cell = Vec<Scalar>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    IntRange,
    StrList,
    LinkList,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::IntRange => "int range",
            DataType::StrList => "str list",
            DataType::LinkList => "link list",
        }
    }

    /// Whether list values are sorted when no explicit choice is made.
    fn sorts_by_default(self) -> bool {
        matches!(self, DataType::StrList)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "int" => Ok(DataType::Int),
            "int range" => Ok(DataType::IntRange),
            "str list" => Ok(DataType::StrList),
            "link list" => Ok(DataType::LinkList),
            other => bail!("unknown data type '{other}'"),
        }
    }
}

/// Stringify a JSON cell. Arrays flatten into several raw parts.
pub fn raw_parts(cell: &JsonValue) -> Result<Vec<String>> {
    let parts = match cell {
        JsonValue::Null => vec![String::new()],
        JsonValue::String(s) => vec![s.clone()],
        JsonValue::Bool(b) => vec![b.to_string()],
        JsonValue::Number(n) => vec![n.to_string()],
        JsonValue::Array(items) if items.is_empty() => vec![String::new()],
        JsonValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.extend(raw_parts(item)?);
            }
            out
        }
        JsonValue::Object(_) => bail!("object cells are not supported: {cell}"),
    };
    Ok(parts)
}

/// Convert one cell. `sort` overrides the data type's default list sorting.
pub fn convert_cell(cell: &JsonValue, data_type: Option<DataType>, sort: Option<bool>) -> Result<Cell> {
    let mut out: Cell = Vec::new();
    for raw in raw_parts(cell)? {
        let values = match data_type {
            None => vec![Scalar::Text(raw)],
            Some(ty) => convert_value(&raw, ty, sort)?,
        };
        for value in values {
            if !out.contains(&value) {
                out.push(value);
            }
        }
    }
    Ok(out)
}

pub fn convert_value(raw: &str, data_type: DataType, sort: Option<bool>) -> Result<Vec<Scalar>> {
    match data_type {
        DataType::Int => {
            let value = raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("invalid integer '{raw}'"))?;
            Ok(vec![Scalar::Int(value)])
        }
        DataType::IntRange => Ok(convert_int_range(raw)?
            .into_iter()
            .map(Scalar::Int)
            .collect()),
        DataType::StrList | DataType::LinkList => {
            let sort = sort.unwrap_or_else(|| data_type.sorts_by_default());
            Ok(convert_str_list(raw, sort)
                .into_iter()
                .map(Scalar::Text)
                .collect())
        }
    }
}

/// Parse `a-b,c,...` into the ascending set of integers it covers.
pub fn convert_int_range(raw: &str) -> Result<Vec<i64>> {
    let parse = |s: &str| {
        s.trim()
            .parse::<i64>()
            .with_context(|| format!("invalid range '{raw}'"))
    };

    let mut values = BTreeSet::new();
    for item in raw.split(',') {
        if !item.contains('-') {
            values.insert(parse(item)?);
            continue;
        }
        let bounds: Vec<&str> = item.split('-').collect();
        let [lo, hi] = bounds[..] else {
            bail!("invalid range '{raw}'");
        };
        let (lo, hi) = (parse(lo)?, parse(hi)?);
        if lo > hi {
            return Err(anyhow!("invalid range '{raw}': {lo} > {hi}"));
        }
        values.extend(lo..=hi);
    }
    Ok(values.into_iter().collect())
}

/// Split on commas, trim, drop repeats (first occurrence wins), optionally sort.
pub fn convert_str_list(raw: &str, sort: bool) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in raw.split(',').map(str::trim) {
        if !items.iter().any(|i| i == item) {
            items.push(item.to_string());
        }
    }
    if sort {
        items.sort();
    }
    items
}
