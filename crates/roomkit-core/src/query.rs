//! Body of the `query` action family.
//!
//! Every `<resource>/query` call takes the same shape: equality filters, an
//! optional free-text search, sort fields, pagination, and relations to eager-load.
//! Typed per-resource filter structs build their part through [`Filters`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use validator::Validate;

/// Maximum page size accepted by the platform.
pub const MAX_PER_PAGE: u32 = 500;

/// Builder for the `filters` object of a query, skipping absent values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filters {
    entries: Map<String, Value>,
}

impl Filters {
    /// Create an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter when the value is present.
    pub fn push_opt<T>(&mut self, key: &str, value: Option<T>)
    where
        T: Serialize,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Add a required filter.
    ///
    /// A value that fails to serialize is logged and left out.
    pub fn push<T>(&mut self, key: &str, value: T)
    where
        T: Serialize,
    {
        if let Some(value) = filter_value(key, value) {
            self.entries.insert(key.to_string(), value);
        }
    }

    /// Returns true if no filters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the collected filter object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

fn filter_value<T: Serialize>(key: &str, value: T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "Dropping filter that does not serialize");
            None
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field name
    pub field: String,
    /// Direction
    pub direction: SortDirection,
}

/// Parameters of a `<resource>/query` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct QueryRequest {
    /// Equality filters keyed by field name
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub filters: Map<String, Value>,

    /// Free-text search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Sort keys, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortField>,

    /// 1-based page number
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size
    #[validate(range(min = 1, max = MAX_PER_PAGE))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Relations to eager-load
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub with: Vec<String>,
}

impl QueryRequest {
    /// An unfiltered query for the first page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a typed filter set.
    #[must_use]
    pub fn from_filters(filters: Filters) -> Self {
        Self {
            filters: filters.into_map(),
            ..Self::default()
        }
    }

    /// Add an equality filter.
    #[must_use]
    pub fn filter<T>(mut self, key: &str, value: T) -> Self
    where
        T: Serialize,
    {
        if let Some(value) = filter_value(key, value) {
            self.filters.insert(key.to_string(), value);
        }
        self
    }

    /// Set the free-text search.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Append a sort key.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortField {
            field: field.into(),
            direction,
        });
        self
    }

    /// Request a specific page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Eager-load a relation.
    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.with.push(relation.into());
        self
    }

    /// Check paging bounds before the query is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `page` is zero or `per_page` is out of range.
    pub fn validated(&self) -> Result<&Self> {
        self.validate().map_err(Error::from)?;
        Ok(self)
    }
}
