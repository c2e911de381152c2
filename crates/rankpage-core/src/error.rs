//! Error taxonomy.
//!
//! Fatal failures abort the computation of a single navigation view and are
//! reported as [`NavError`]. Non-fatal problems with a selection (stale or
//! unrecognized filters) never fail a view; they are described by
//! [`InertReason`] and carried in the view next to the filter they affect.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    /// A selected `(attribute, value)` has no weight for some candidate.
    ///
    /// Never zero-filled: a hole in the weight table is a data bug.
    #[error("missing weight entry for entity '{entity}': {attribute}={value}")]
    MissingWeightEntry {
        entity: String,
        attribute: String,
        value: String,
    },

    /// The answer attribute enumerates the candidates and cannot be used as a filter.
    #[error("answer attribute '{0}' cannot be used as a filter")]
    AnswerAttributeNotFilterable(String),

    #[error("invalid navigator configuration: {0}")]
    InvalidConfig(String),
}

/// Why a filter in a selection state was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum InertReason {
    /// The attribute is not part of the dataset at all (bad query string).
    #[error("unknown attribute")]
    UnknownAttribute,
    /// The attribute exists but the value is outside its domain (bad query string).
    #[error("unknown value")]
    UnknownValue,
    /// The filter names the answer attribute.
    #[error("answer attribute")]
    AnswerAttribute,
}
