//! Option catalog: which attributes and values are offered as filters.
//!
//! - weighted model: static. Every non-answer attribute with its full domain,
//!   in dataset order, whatever the selection.
//! - row model: derived from the surviving rows. Attributes in order of first
//!   appearance, values sorted ascending; attributes already filtered on are
//!   gone because the row filter removed them.
//!
//! The answer attribute is never part of the catalog.

use serde::{Deserialize, Serialize};

use crate::dataset::ValueDomains;
use crate::rows::RowTable;
use crate::{AttrName, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub attribute: AttrName,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCatalog {
    entries: Vec<CatalogEntry>,
}

impl OptionCatalog {
    pub fn from_domains(domains: &ValueDomains, answer_attribute: &str) -> Self {
        let entries = domains
            .iter()
            .filter(|(attribute, _)| *attribute != answer_attribute)
            .map(|(attribute, values)| CatalogEntry {
                attribute: attribute.to_string(),
                values: values.to_vec(),
            })
            .collect();
        Self { entries }
    }

    pub fn from_rows(table: &RowTable, answer_attribute: &str) -> Self {
        let entries = table
            .columns()
            .into_iter()
            .filter(|attribute| *attribute != answer_attribute)
            .filter_map(|attribute| {
                let mut values = table.column_values(attribute);
                if values.is_empty() {
                    return None;
                }
                values.sort();
                Some(CatalogEntry {
                    attribute: attribute.to_string(),
                    values,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, attribute: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.attribute == attribute)
    }

    pub fn contains_attribute(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::Row;

    #[test]
    fn static_catalog_skips_answer_and_keeps_order() {
        let domains: ValueDomains = [
            ("size", vec!["small".to_string(), "large".to_string()]),
            ("species", vec!["cat".to_string()]),
            ("color", vec!["red".to_string(), "".to_string()]),
        ]
        .into_iter()
        .collect();
        let catalog = OptionCatalog::from_domains(&domains, "species");
        let attrs: Vec<&str> = catalog.entries().iter().map(|e| e.attribute.as_str()).collect();
        assert_eq!(attrs, vec!["size", "color"]);
        assert_eq!(catalog.get("size").unwrap().values, vec!["small", "large"]);
        assert_eq!(catalog.get("color").unwrap().values, vec!["red", ""]);
    }

    #[test]
    fn row_catalog_sorts_values() {
        let table = RowTable::new(vec![
            Row::from_pairs([("species", vec!["b"]), ("color", vec!["red", "blue"])]),
            Row::from_pairs([("species", vec!["a"]), ("color", vec!["", "green"])]),
        ]);
        let catalog = OptionCatalog::from_rows(&table, "species");
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("color").unwrap().values,
            vec!["", "blue", "green", "red"]
        );
    }

    #[test]
    fn empty_rows_give_empty_catalog() {
        let catalog = OptionCatalog::from_rows(&RowTable::default(), "species");
        assert!(catalog.is_empty());
    }
}
