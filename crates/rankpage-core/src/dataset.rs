//! Pre-baked navigation dataset.
//!
//! A [`Dataset`] is produced once at page-build time (see `rankpage-ingest`)
//! and is read-only afterwards. It carries the data for both models; the
//! navigator's configuration decides which half is used.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ranker::WeightTable;
use crate::rows::RowTable;
use crate::{AttrName, EntityId, Value};

/// Ordered `attribute -> values` domains, including the answer attribute.
///
/// Order is dataset insertion order and is the display order of the weighted
/// model's filter table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueDomains {
    domains: Vec<(AttrName, Vec<Value>)>,
}

impl ValueDomains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a domain, or replace the values of an attribute already present.
    pub fn insert(&mut self, attribute: impl Into<AttrName>, values: Vec<Value>) {
        let attribute = attribute.into();
        match self.domains.iter_mut().find(|(a, _)| *a == attribute) {
            Some((_, existing)) => *existing = values,
            None => self.domains.push((attribute, values)),
        }
    }

    pub fn values(&self, attribute: &str) -> Option<&[Value]> {
        self.domains
            .iter()
            .find(|(a, _)| a == attribute)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains(&self, attribute: &str, value: &str) -> bool {
        self.values(attribute)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|(a, _)| a.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.domains.iter().map(|(a, v)| (a.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl<A: Into<AttrName>> FromIterator<(A, Vec<Value>)> for ValueDomains {
    fn from_iter<T: IntoIterator<Item = (A, Vec<Value>)>>(iter: T) -> Self {
        let mut out = ValueDomains::new();
        for (attribute, values) in iter {
            out.insert(attribute, values);
        }
        out
    }
}

/// Optional per-entity / per-attribute hyperlinks and galleries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkTables {
    /// Entity -> detail page URL.
    #[serde(default)]
    pub details: HashMap<EntityId, String>,
    /// Attribute -> category page URL.
    #[serde(default)]
    pub categories: HashMap<AttrName, String>,
    /// Entity -> photo paths.
    #[serde(default)]
    pub photos: HashMap<EntityId, Vec<String>>,
}

impl LinkTables {
    pub fn detail(&self, entity: &str) -> Option<&str> {
        self.details.get(entity).map(String::as_str)
    }

    pub fn category(&self, attribute: &str) -> Option<&str> {
        self.categories.get(attribute).map(String::as_str)
    }

    pub fn gallery(&self, entity: &str) -> &[String] {
        self.photos.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Attribute whose values are the navigable entities.
    pub answer_attribute: AttrName,
    /// Weighted model: static value domains.
    #[serde(default)]
    pub domains: ValueDomains,
    /// Weighted model: entity -> attribute -> value -> weight.
    #[serde(default)]
    pub weights: WeightTable,
    /// Row model: raw entity rows.
    #[serde(default)]
    pub rows: RowTable,
    #[serde(default)]
    pub links: LinkTables,
}

impl Dataset {
    /// Candidate entities of the weighted model, in dataset order.
    pub fn candidates(&self) -> &[EntityId] {
        self.domains
            .values(&self.answer_attribute)
            .unwrap_or(&[])
    }
}
