//! Rankpage navigation core
//!
//! This crate implements the logic behind a faceted "rank page": a user narrows
//! a fixed dataset of entities by picking attribute values, and the page shows
//! either the plain candidate list (no filters) or a percentage ranking.
//!
//! Two dataset models are supported and selected by [`NavigatorConfig::mode`]:
//!
//! - **weighted**: every candidate carries a precomputed weight per
//!   `(attribute, value)`; scores are the normalized sum of the selected weights
//!   (see [`ranker`]).
//! - **rows**: a table of entity rows is narrowed by exact-match elimination and
//!   the surviving rows define the next selectable options (see [`rows`]).
//!
//! Everything here is synchronous and allocation-only: no I/O, no caching. The
//! [`navigator::Navigator`] recomputes the whole [`view::NavigationView`] for
//! every selection state it is handed.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod navigator;
pub mod ranker;
pub mod rows;
pub mod selection;
pub mod translation;
pub mod view;

pub use catalog::{CatalogEntry, OptionCatalog};
pub use dataset::{Dataset, LinkTables, ValueDomains};
pub use error::{InertReason, NavError};
pub use navigator::{ModelKind, NavigationSession, Navigator, NavigatorConfig};
pub use ranker::{rank, Ranking, ScoredEntity, WeightTable};
pub use rows::{filter_rows, Row, RowFilterOutcome, RowTable};
pub use selection::{Filter, SelectionState};
pub use translation::Translations;
pub use view::{FilterOption, FilterRow, InertFilter, NavPhase, NavigationView, ResultRow, ViewLabels};

/// Attribute key (a categorical dimension such as `color`).
pub type AttrName = String;

/// Attribute value. The empty string is a legitimate value meaning "unspecified".
pub type Value = String;

/// Candidate entity id (one of the answer attribute's values).
pub type EntityId = String;
