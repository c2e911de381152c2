//! Weighted ranker (weighted model).
//!
//! For a non-empty selection every candidate is scored as
//!
//! ```text
//! score = 100 * Σ weight[entity][attribute][value] / |selection|
//! ```
//!
//! i.e. the mean weight of the selected pairs, as a percentage. Results are
//! sorted by descending score, ties by ascending entity id.
//!
//! An empty selection is a separate path: no scoring at all, the candidates are
//! returned as-is ([`Ranking::Unranked`]).

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::selection::SelectionState;
use crate::{AttrName, EntityId, Value};

/// `entity -> attribute -> value -> weight`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    entries: HashMap<EntityId, HashMap<AttrName, HashMap<Value, f64>>>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        entity: impl Into<EntityId>,
        attribute: impl Into<AttrName>,
        value: impl Into<Value>,
        weight: f64,
    ) {
        self.entries
            .entry(entity.into())
            .or_default()
            .entry(attribute.into())
            .or_default()
            .insert(value.into(), weight);
    }

    /// Replace all weights of one entity/attribute.
    pub fn insert_attribute(
        &mut self,
        entity: impl Into<EntityId>,
        attribute: impl Into<AttrName>,
        weights: HashMap<Value, f64>,
    ) {
        self.entries
            .entry(entity.into())
            .or_default()
            .insert(attribute.into(), weights);
    }

    pub fn get(&self, entity: &str, attribute: &str, value: &str) -> Option<f64> {
        self.entries.get(entity)?.get(attribute)?.get(value).copied()
    }

    /// Strict lookup: an absent entry is [`NavError::MissingWeightEntry`].
    pub fn weight(&self, entity: &str, attribute: &str, value: &str) -> Result<f64, NavError> {
        self.get(entity, attribute, value)
            .ok_or_else(|| NavError::MissingWeightEntry {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
                value: value.to_string(),
            })
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub entity: EntityId,
    /// Raw score in percent (not rounded).
    pub score: f64,
}

impl ScoredEntity {
    /// Display percentage: round half up, like the page's `Math.round`.
    pub fn percent(&self) -> i64 {
        (self.score + 0.5).floor() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Ranking {
    /// No filters: candidates in dataset order.
    Unranked(Vec<EntityId>),
    /// Filters present: candidates by descending score.
    Ranked(Vec<ScoredEntity>),
}

impl Ranking {
    pub fn is_ranked(&self) -> bool {
        matches!(self, Ranking::Ranked(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Ranking::Unranked(items) => items.len(),
            Ranking::Ranked(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entity ids in result order.
    pub fn entities(&self) -> Vec<&str> {
        match self {
            Ranking::Unranked(items) => items.iter().map(String::as_str).collect(),
            Ranking::Ranked(items) => items.iter().map(|s| s.entity.as_str()).collect(),
        }
    }
}

/// Rank `candidates` against `selection`.
///
/// The selection must already be restricted to filters known to the dataset;
/// every remaining pair must have a weight for every candidate.
pub fn rank(
    weights: &WeightTable,
    candidates: &[EntityId],
    selection: &SelectionState,
) -> Result<Ranking, NavError> {
    if selection.is_empty() {
        return Ok(Ranking::Unranked(candidates.to_vec()));
    }

    let count = selection.len() as f64;
    let mut scored = Vec::with_capacity(candidates.len());
    for entity in candidates {
        let mut total = 0.0;
        for filter in selection {
            total += weights.weight(entity, &filter.attribute, &filter.value)?;
        }
        scored.push(ScoredEntity {
            entity: entity.clone(),
            score: total / count * 100.0,
        });
    }

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| collate(&a.entity, &b.entity))
    });

    Ok(Ranking::Ranked(scored))
}

/// Entity id order for equal scores: case-insensitive first, then by code point.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> WeightTable {
        let mut w = WeightTable::new();
        for (entity, attribute, value, weight) in [
            ("cat", "color", "red", 1.0),
            ("cat", "color", "blue", 0.0),
            ("dog", "color", "red", 0.0),
            ("dog", "color", "blue", 1.0),
        ] {
            w.insert(entity, attribute, value, weight);
        }
        w
    }

    fn candidates() -> Vec<EntityId> {
        vec!["dog".to_string(), "cat".to_string()]
    }

    #[test]
    fn empty_selection_is_unranked_in_dataset_order() {
        let r = rank(&WeightTable::new(), &candidates(), &SelectionState::new()).unwrap();
        assert_eq!(r, Ranking::Unranked(candidates()));
    }

    #[test]
    fn single_filter_scores_are_percentages() {
        let sel = SelectionState::from_pairs([("color", "red")]);
        let Ranking::Ranked(items) = rank(&table(), &candidates(), &sel).unwrap() else {
            panic!("expected ranked");
        };
        assert_eq!(items[0].entity, "cat");
        assert_relative_eq!(items[0].score, 100.0);
        assert_eq!(items[1].entity, "dog");
        assert_relative_eq!(items[1].score, 0.0);
    }

    #[test]
    fn missing_weight_fails_loudly() {
        let sel = SelectionState::from_pairs([("color", "green")]);
        let err = rank(&table(), &candidates(), &sel).unwrap_err();
        assert_eq!(
            err,
            NavError::MissingWeightEntry {
                entity: "dog".into(),
                attribute: "color".into(),
                value: "green".into(),
            }
        );
    }

    #[test]
    fn percent_rounds_half_up() {
        let p = |score| ScoredEntity { entity: "x".into(), score }.percent();
        assert_eq!(p(66.666), 67);
        assert_eq!(p(50.5), 51);
        assert_eq!(p(49.4999), 49);
        assert_eq!(p(-0.5), 0);
    }

    #[test]
    fn collate_is_case_insensitive_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Apple", "apple"), Ordering::Less);
        assert_eq!(collate("cat", "cat"), Ordering::Equal);
    }
}
