//! Render payload handed to the presentation layer.
//!
//! Fully materialized: the renderer only formats what is here and never calls
//! back into the navigator.

use serde::{Deserialize, Serialize};

use crate::error::InertReason;
use crate::selection::{Filter, SelectionState};
use crate::{AttrName, EntityId, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavPhase {
    /// No effective filter: plain candidate list.
    Unfiltered,
    /// At least one effective filter.
    Filtered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLabels {
    pub parameters: String,
    pub results: String,
    pub separator: String,
    pub navigation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: Value,
    /// Display label; a placeholder for the empty value.
    pub label: String,
    pub active: bool,
    /// Selection after clicking this option.
    pub next: SelectionState,
    /// `next` encoded for a link's query string.
    pub next_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRow {
    pub attribute: AttrName,
    pub label: String,
    pub category_link: Option<String>,
    pub options: Vec<FilterOption>,
}

impl FilterRow {
    pub fn active_value(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.active)
            .map(|o| o.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub entity: EntityId,
    /// Rounded percentage; `None` on the unranked path.
    pub percent: Option<i64>,
    /// Raw score; `None` on the unranked path.
    pub score: Option<f64>,
    pub detail_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InertFilter {
    pub attribute: AttrName,
    pub value: Value,
    pub reason: InertReason,
}

impl InertFilter {
    pub fn new(filter: &Filter, reason: InertReason) -> Self {
        Self {
            attribute: filter.attribute.clone(),
            value: filter.value.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationView {
    pub phase: NavPhase,
    /// The selection this view was computed for, inert entries included.
    pub state: SelectionState,
    pub labels: ViewLabels,
    pub filters: Vec<FilterRow>,
    pub results: Vec<ResultRow>,
    /// Effective filters, in application order.
    pub breadcrumb: Vec<Filter>,
    pub inert: Vec<InertFilter>,
}

impl NavigationView {
    pub fn is_ranked(&self) -> bool {
        self.results.iter().any(|r| r.percent.is_some())
    }

    pub fn result_entities(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.entity.as_str()).collect()
    }

    pub fn filter(&self, attribute: &str) -> Option<&FilterRow> {
        self.filters.iter().find(|f| f.attribute == attribute)
    }
}
