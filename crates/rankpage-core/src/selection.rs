//! Selection state: the user's current `attribute -> value` filters.
//!
//! States are values. Every transition returns a new state and leaves the
//! receiver untouched, so a rendered link can hold "the state after this click"
//! while the page still renders "the state now".
//!
//! Invariant: at most one value per attribute. Insertion order is kept (the row
//! model applies filters in that order) but is not part of equality.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{AttrName, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub attribute: AttrName,
    pub value: Value,
}

impl Filter {
    pub fn new(attribute: impl Into<AttrName>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Filter>", into = "Vec<Filter>")]
pub struct SelectionState {
    entries: Vec<Filter>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from pairs. A repeated attribute keeps its first position
    /// and takes the last value, which is how query strings are read.
    pub fn from_pairs<I, A, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<AttrName>,
        V: Into<Value>,
    {
        let mut state = Self::new();
        for (attribute, value) in pairs {
            state.set(attribute.into(), value.into());
        }
        state
    }

    /// Decode a `attribute=value&...` query string (a leading `?` is accepted).
    ///
    /// Decoding never fails; pairs that do not match the dataset are detected
    /// later and treated as inert filters.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(
            form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    /// Encode the state as a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.entries.iter().map(|f| (&f.attribute, &f.value)))
            .finish()
    }

    /// The state after clicking `attribute=value`.
    ///
    /// Clicking the active value deselects it; any other value replaces the
    /// attribute's current value (or adds it).
    pub fn with_toggled(&self, attribute: &str, value: &str) -> Self {
        if self.is_selected(attribute, value) {
            self.without(attribute)
        } else {
            self.with_value(attribute, value)
        }
    }

    /// The state with `attribute` set to `value`, overwriting any prior value.
    pub fn with_value(&self, attribute: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.set(attribute.to_string(), value.to_string());
        next
    }

    /// The state without any filter on `attribute`.
    pub fn without(&self, attribute: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|f| f.attribute != attribute)
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Currently selected value for `attribute`.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|f| f.attribute == attribute)
            .map(|f| f.value.as_str())
    }

    /// Whether `value` is the active value for `attribute`.
    pub fn is_selected(&self, attribute: &str, value: &str) -> bool {
        self.get(attribute) == Some(value)
    }

    pub fn contains_attribute(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    /// Filters in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Filter> {
        self.entries.iter()
    }

    fn set(&mut self, attribute: AttrName, value: Value) {
        match self.entries.iter_mut().find(|f| f.attribute == attribute) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Filter { attribute, value }),
        }
    }
}

impl PartialEq for SelectionState {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|f| other.is_selected(&f.attribute, &f.value))
    }
}

impl Eq for SelectionState {}

impl From<Vec<Filter>> for SelectionState {
    fn from(filters: Vec<Filter>) -> Self {
        Self::from_pairs(filters.into_iter().map(|f| (f.attribute, f.value)))
    }
}

impl From<SelectionState> for Vec<Filter> {
    fn from(state: SelectionState) -> Self {
        state.entries
    }
}

impl<'a> IntoIterator for &'a SelectionState {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
