//! Navigation controller.
//!
//! The [`Navigator`] owns the read-only dataset and turns a selection state
//! into a complete [`NavigationView`]. It keeps no per-user state; a
//! [`NavigationSession`] holds one user's current selection and drives the
//! Unfiltered <-> Filtered transitions.
//!
//! Filters the dataset does not recognize (hand-edited or stale query strings,
//! the answer attribute) are inert:
//! they are logged and reported in the view but take no part in filtering or
//! scoring, and are never removed from the state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::OptionCatalog;
use crate::dataset::Dataset;
use crate::error::{InertReason, NavError};
use crate::ranker::{rank, Ranking};
use crate::rows::filter_rows;
use crate::selection::{Filter, SelectionState};
use crate::translation::{
    Translations, GROUP_CATEGORY, KEY_EMPTY, KEY_NAVIGATION, KEY_PARAMETERS, KEY_RESULTS,
};
use crate::view::{
    FilterOption, FilterRow, InertFilter, NavPhase, NavigationView, ResultRow, ViewLabels,
};
use crate::{AttrName, EntityId, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Precomputed weights, static options, percentage ranking.
    #[default]
    Weighted,
    /// Row elimination, options shrink with the surviving rows.
    Rows,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Weighted => "weighted",
            ModelKind::Rows => "rows",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" | "weights" => Ok(ModelKind::Weighted),
            "rows" | "row" => Ok(ModelKind::Rows),
            other => Err(NavError::InvalidConfig(format!("unknown model kind '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub mode: ModelKind,
    /// Expected answer attribute; must match the dataset's when set.
    pub answer_attribute: Option<AttrName>,
    /// Look attribute and value labels up in the `category` translation group.
    pub translate_values: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            mode: ModelKind::Weighted,
            answer_attribute: None,
            translate_values: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    dataset: Dataset,
    config: NavigatorConfig,
    translations: Translations,
    answer: AttrName,
}

/// Selection split into the part that takes effect and the inert rest.
struct Resolved {
    effective: SelectionState,
    inert: Vec<InertFilter>,
}

impl Navigator {
    pub fn new(
        dataset: Dataset,
        config: NavigatorConfig,
        translations: Translations,
    ) -> Result<Self, NavError> {
        let answer = dataset.answer_attribute.clone();
        if answer.is_empty() {
            return Err(NavError::InvalidConfig(
                "answer attribute is not set".to_string(),
            ));
        }
        // Weights and candidates are keyed by the dataset's answer attribute.
        if let Some(expected) = config.answer_attribute.as_deref().filter(|a| *a != answer) {
            return Err(NavError::InvalidConfig(format!(
                "answer attribute '{expected}' does not match the dataset's '{answer}'"
            )));
        }
        Ok(Self {
            dataset,
            config,
            translations,
            answer,
        })
    }

    pub fn answer_attribute(&self) -> &str {
        &self.answer
    }

    pub fn mode(&self) -> ModelKind {
        self.config.mode
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Start an independent session with an empty selection.
    pub fn session(&self) -> NavigationSession<'_> {
        NavigationSession {
            navigator: self,
            state: SelectionState::new(),
        }
    }

    /// Start a session from a page query string.
    pub fn session_from_query(&self, query: &str) -> NavigationSession<'_> {
        NavigationSession {
            navigator: self,
            state: SelectionState::from_query_string(query),
        }
    }

    /// The filters of `state` that take effect, in application order.
    pub fn effective_selection(&self, state: &SelectionState) -> SelectionState {
        self.resolve(state).effective
    }

    /// Click `attribute=value` on top of `state`.
    pub fn toggle(
        &self,
        state: &SelectionState,
        attribute: &str,
        value: &str,
    ) -> Result<(SelectionState, NavigationView), NavError> {
        if attribute == self.answer {
            return Err(NavError::AnswerAttributeNotFilterable(self.answer.clone()));
        }
        let next = state.with_toggled(attribute, value);
        let view = self.navigate(&next)?;
        Ok((next, view))
    }

    /// Compute the full view for `state`, from scratch.
    pub fn navigate(&self, state: &SelectionState) -> Result<NavigationView, NavError> {
        let Resolved {
            effective,
            mut inert,
        } = self.resolve(state);

        let (catalog, results, breadcrumb) = match self.config.mode {
            ModelKind::Weighted => {
                let catalog = OptionCatalog::from_domains(&self.dataset.domains, &self.answer);
                let candidates = self.dataset.domains.values(&self.answer).unwrap_or(&[]);
                let ranking = rank(&self.dataset.weights, candidates, &effective)?;
                let breadcrumb: Vec<Filter> = effective.iter().cloned().collect();
                (catalog, self.result_rows(ranking), breadcrumb)
            }
            ModelKind::Rows => {
                let outcome = filter_rows(&self.dataset.rows, &effective);
                for (filter, reason) in &outcome.inert {
                    inert.push(InertFilter::new(filter, *reason));
                }
                let catalog = OptionCatalog::from_rows(&outcome.table, &self.answer);
                let found = outcome.table.column_values(&self.answer);
                (catalog, self.result_rows(Ranking::Unranked(found)), outcome.applied)
            }
        };

        for entry in &inert {
            warn!(
                attribute = %entry.attribute,
                value = %entry.value,
                reason = %entry.reason,
                "ignoring filter"
            );
        }

        let filters = catalog
            .entries()
            .iter()
            .map(|entry| FilterRow {
                attribute: entry.attribute.clone(),
                label: self.category_label(&entry.attribute),
                category_link: self
                    .dataset
                    .links
                    .category(&entry.attribute)
                    .map(str::to_string),
                options: entry
                    .values
                    .iter()
                    .map(|value| {
                        let next = state.with_toggled(&entry.attribute, value);
                        FilterOption {
                            value: value.clone(),
                            label: self.value_label(value),
                            active: state.is_selected(&entry.attribute, value),
                            next_query: next.to_query_string(),
                            next,
                        }
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        let phase = if breadcrumb.is_empty() {
            NavPhase::Unfiltered
        } else {
            NavPhase::Filtered
        };

        debug!(
            mode = %self.config.mode,
            ?phase,
            filters = breadcrumb.len(),
            inert = inert.len(),
            options = filters.len(),
            results = results.len(),
            "navigation view computed"
        );

        Ok(NavigationView {
            phase,
            state: state.clone(),
            labels: self.labels(),
            filters,
            results,
            breadcrumb,
            inert,
        })
    }

    fn resolve(&self, state: &SelectionState) -> Resolved {
        let mut effective: Vec<(AttrName, Value)> = Vec::new();
        let mut inert = Vec::new();
        for filter in state {
            match self.classify(filter) {
                Some(reason) => inert.push(InertFilter::new(filter, reason)),
                None => effective.push((filter.attribute.clone(), filter.value.clone())),
            }
        }
        Resolved {
            effective: SelectionState::from_pairs(effective),
            inert,
        }
    }

    fn classify(&self, filter: &Filter) -> Option<InertReason> {
        if filter.attribute == self.answer {
            return Some(InertReason::AnswerAttribute);
        }
        match self.config.mode {
            ModelKind::Weighted => match self.dataset.domains.values(&filter.attribute) {
                None => Some(InertReason::UnknownAttribute),
                Some(values) if !values.contains(&filter.value) => Some(InertReason::UnknownValue),
                Some(_) => None,
            },
            ModelKind::Rows => {
                let rows = &self.dataset.rows;
                if !rows.has_column(&filter.attribute) {
                    Some(InertReason::UnknownAttribute)
                } else if !rows
                    .rows()
                    .iter()
                    .any(|row| row.holds(&filter.attribute, &filter.value))
                {
                    Some(InertReason::UnknownValue)
                } else {
                    None
                }
            }
        }
    }

    fn result_rows(&self, ranking: Ranking) -> Vec<ResultRow> {
        let row = |entity: EntityId, percent: Option<i64>, score: Option<f64>| ResultRow {
            detail_link: self.dataset.links.detail(&entity).map(str::to_string),
            gallery: self.dataset.links.gallery(&entity).to_vec(),
            entity,
            percent,
            score,
        };
        match ranking {
            Ranking::Unranked(items) => items.into_iter().map(|e| row(e, None, None)).collect(),
            Ranking::Ranked(items) => items
                .into_iter()
                .map(|s| {
                    let percent = s.percent();
                    row(s.entity, Some(percent), Some(s.score))
                })
                .collect(),
        }
    }

    fn labels(&self) -> ViewLabels {
        ViewLabels {
            parameters: self.translations.get(KEY_PARAMETERS, None),
            results: self.translations.get(KEY_RESULTS, None),
            separator: self.translations.filter_separator(),
            navigation: self.translations.get(KEY_NAVIGATION, None),
        }
    }

    fn category_label(&self, attribute: &str) -> String {
        if self.config.translate_values {
            self.translations.get(attribute, Some(GROUP_CATEGORY))
        } else {
            attribute.to_string()
        }
    }

    fn value_label(&self, value: &str) -> String {
        if value.is_empty() {
            return format!("[{}]", self.translations.get(KEY_EMPTY, None));
        }
        self.category_label(value)
    }
}

/// One user's navigation: a selection state plus the navigator it runs on.
#[derive(Debug, Clone)]
pub struct NavigationSession<'a> {
    navigator: &'a Navigator,
    state: SelectionState,
}

impl<'a> NavigationSession<'a> {
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn phase(&self) -> NavPhase {
        if self.navigator.effective_selection(&self.state).is_empty() {
            NavPhase::Unfiltered
        } else {
            NavPhase::Filtered
        }
    }

    pub fn view(&self) -> Result<NavigationView, NavError> {
        self.navigator.navigate(&self.state)
    }

    /// Apply a click. On error the session keeps its previous state.
    pub fn toggle(&mut self, attribute: &str, value: &str) -> Result<NavigationView, NavError> {
        let (next, view) = self.navigator.toggle(&self.state, attribute, value)?;
        self.state = next;
        Ok(view)
    }

    /// Drop every filter.
    pub fn reset(&mut self) -> Result<NavigationView, NavError> {
        self.state = SelectionState::new();
        self.view()
    }
}
