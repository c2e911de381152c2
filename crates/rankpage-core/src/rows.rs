//! Row filter engine (row model).
//!
//! A row maps each attribute to the *set* of values the entity satisfies. A
//! selection is applied as a conjunction: for every filter, rows whose value
//! set for the attribute does not contain the selected value are dropped, and
//! the attribute is removed from every surviving row so it cannot be filtered
//! twice (and leaves the option catalog).
//!
//! Each attribute appears at most once in a selection, so every filter acts on
//! its own column. Inert filters are decided against the input table before
//! any cut, so the surviving set does not depend on application order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::InertReason;
use crate::selection::{Filter, SelectionState};
use crate::{AttrName, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<(AttrName, Vec<Value>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, A, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<AttrName>,
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        let mut row = Row::new();
        for (attribute, values) in pairs {
            row.insert(attribute, values.into_iter().map(Into::into).collect());
        }
        row
    }

    /// Set the value set of `attribute` (replacing an existing one in place).
    pub fn insert(&mut self, attribute: impl Into<AttrName>, values: Vec<Value>) {
        let attribute = attribute.into();
        match self.cells.iter_mut().find(|(a, _)| *a == attribute) {
            Some((_, existing)) => *existing = values,
            None => self.cells.push((attribute, values)),
        }
    }

    pub fn values(&self, attribute: &str) -> Option<&[Value]> {
        self.cells
            .iter()
            .find(|(a, _)| a == attribute)
            .map(|(_, v)| v.as_slice())
    }

    pub fn holds(&self, attribute: &str, value: &str) -> bool {
        self.values(attribute)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(a, _)| a.as_str())
    }

    fn without(&self, attribute: &str) -> Row {
        Row {
            cells: self
                .cells
                .iter()
                .filter(|(a, _)| a != attribute)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTable {
    rows: Vec<Row>,
}

impl RowTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Attributes present in any row, in order of first appearance.
    pub fn columns(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            for attribute in row.attributes() {
                if seen.insert(attribute) {
                    out.push(attribute);
                }
            }
        }
        out
    }

    pub fn has_column(&self, attribute: &str) -> bool {
        self.rows.iter().any(|r| r.values(attribute).is_some())
    }

    /// Distinct values of `attribute` across rows, in order of first appearance.
    pub fn column_values(&self, attribute: &str) -> Vec<Value> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            for value in row.values(attribute).unwrap_or(&[]) {
                if seen.insert(value.as_str()) {
                    out.push(value.clone());
                }
            }
        }
        out
    }

    /// Keep rows holding `attribute=value` and drop the attribute from them.
    pub fn cut(&self, attribute: &str, value: &str) -> RowTable {
        RowTable {
            rows: self
                .rows
                .iter()
                .filter(|row| row.holds(attribute, value))
                .map(|row| row.without(attribute))
                .collect(),
        }
    }
}

impl FromIterator<Row> for RowTable {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        RowTable::new(iter.into_iter().collect())
    }
}

/// Result of applying a selection to a [`RowTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowFilterOutcome {
    /// Surviving rows, without the attributes that were filtered on.
    pub table: RowTable,
    /// Filters that narrowed the table, in application order.
    pub applied: Vec<Filter>,
    /// Filters that had no effect.
    pub inert: Vec<(Filter, InertReason)>,
}

/// Apply `selection` to `table` in the selection's insertion order.
///
/// A filter is inert only when no row of the input `table` carries its
/// attribute; that is decided once, before any cut, so the surviving set does
/// not depend on order. Every other filter cuts, and rows lacking the
/// attribute are eliminated.
pub fn filter_rows(table: &RowTable, selection: &SelectionState) -> RowFilterOutcome {
    let mut current = table.clone();
    let mut applied = Vec::new();
    let mut inert = Vec::new();

    for filter in selection {
        if !table.has_column(&filter.attribute) {
            tracing::debug!(
                attribute = %filter.attribute,
                value = %filter.value,
                "row filter skipped: unknown attribute"
            );
            inert.push((filter.clone(), InertReason::UnknownAttribute));
            continue;
        }
        current = current.cut(&filter.attribute, &filter.value);
        applied.push(filter.clone());
    }

    tracing::debug!(
        rows_in = table.len(),
        rows_out = current.len(),
        filters = applied.len(),
        "rows filtered"
    );

    RowFilterOutcome {
        table: current,
        applied,
        inert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> RowTable {
        RowTable::new(vec![
            Row::from_pairs([
                ("color", vec!["red"]),
                ("legs", vec!["4"]),
                ("species", vec!["dog"]),
            ]),
            Row::from_pairs([
                ("color", vec!["red", "blue"]),
                ("legs", vec!["4"]),
                ("species", vec!["cat"]),
            ]),
        ])
    }

    #[test]
    fn cut_drops_non_matching_rows_and_the_column() {
        let out = animals().cut("color", "blue");
        assert_eq!(out.len(), 1);
        assert_eq!(out.columns(), vec!["legs", "species"]);
        assert_eq!(out.column_values("species"), vec!["cat".to_string()]);
    }

    #[test]
    fn multi_valued_cell_matches_any_member() {
        let out = animals().cut("color", "red");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn unknown_attribute_is_inert() {
        let sel = SelectionState::from_pairs([("wings", "2"), ("color", "blue")]);
        let out = filter_rows(&animals(), &sel);
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.applied, vec![Filter::new("color", "blue")]);
        assert_eq!(
            out.inert,
            vec![(Filter::new("wings", "2"), InertReason::UnknownAttribute)]
        );
    }

    #[test]
    fn unmatched_value_empties_the_table() {
        let sel = SelectionState::from_pairs([("color", "green"), ("legs", "4")]);
        let out = filter_rows(&animals(), &sel);
        assert!(out.table.is_empty());
        assert!(out.inert.is_empty());
        assert_eq!(out.applied.len(), 2);
    }

    fn ragged() -> RowTable {
        RowTable::new(vec![
            Row::from_pairs([("a", vec!["1"]), ("b", vec!["x"]), ("species", vec!["cat"])]),
            Row::from_pairs([("a", vec!["2"]), ("species", vec!["dog"])]),
        ])
    }

    #[test]
    fn rows_lacking_a_filtered_attribute_are_eliminated_in_any_order() {
        let forward = filter_rows(&ragged(), &SelectionState::from_pairs([("a", "2"), ("b", "x")]));
        let backward = filter_rows(&ragged(), &SelectionState::from_pairs([("b", "x"), ("a", "2")]));
        assert!(forward.table.is_empty());
        assert!(backward.table.is_empty());
        assert!(forward.inert.is_empty());
        assert!(backward.inert.is_empty());
        assert_eq!(forward.applied.len(), 2);
    }

    #[test]
    fn attribute_missing_from_some_rows_still_narrows() {
        let out = filter_rows(&ragged(), &SelectionState::from_pairs([("b", "x")]));
        assert_eq!(out.table.column_values("species"), vec!["cat".to_string()]);
    }

    #[test]
    fn repeated_query_attribute_is_one_filter_not_a_stale_one() {
        let sel = SelectionState::from_query_string("a=1&a=2");
        let out = filter_rows(&ragged(), &sel);
        assert!(out.inert.is_empty());
        assert_eq!(out.applied, vec![Filter::new("a", "2")]);
        assert_eq!(out.table.column_values("species"), vec!["dog".to_string()]);
    }

    #[test]
    fn columns_follow_first_appearance() {
        let table = RowTable::new(vec![
            Row::from_pairs([("b", vec!["1"])]),
            Row::from_pairs([("a", vec!["1"]), ("b", vec!["2"])]),
        ]);
        assert_eq!(table.columns(), vec!["b", "a"]);
        assert_eq!(table.column_values("b"), vec!["1".to_string(), "2".to_string()]);
    }
}
