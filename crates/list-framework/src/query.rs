//! # Pageable Query Builder
//!
//! Turns the paging, sorting and filtering state of a table into the normalized
//! [`RequestDescriptor`] that is handed to a [`ListGateway`](crate::ListGateway).
//!
//! [`build_descriptor`] is a pure function: the same inputs always serialize to the
//! same bytes, because filters are kept in a `BTreeMap` and empty constraints are
//! dropped instead of being sent as empty strings.
//!
//! The JSON shape matches what the backend's search endpoints accept:
//!
//! ```json
//! { "pageable": { "pageSize": 8, "pageNumber": 0, "sort": [{ "property": "email", "direction": "asc" }] },
//!   "email": "anna@example.com" }
//! ```

use crate::error::QueryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a single sort rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `{property, direction}` entry of the sort list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortRule {
    pub property: String,
    pub direction: SortDirection,
}

impl SortRule {
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

/// Paginator event: the page the user navigated to and the size they picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEvent {
    pub page_index: u32,
    pub page_size: u32,
}

/// Sort-header event. A `None` direction means the user cleared the sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEvent {
    pub active: String,
    pub direction: Option<SortDirection>,
}

impl SortEvent {
    pub fn new(active: impl Into<String>, direction: Option<SortDirection>) -> Self {
        Self {
            active: active.into(),
            direction,
        }
    }
}

/// The `(page_size, page_number, sort)` triple describing one page of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    pub page_size: u32,
    pub page_number: u32,
    pub sort: Vec<SortRule>,
}

impl Pageable {
    /// First page of the given size, unsorted.
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size,
            page_number: 0,
            sort: Vec::new(),
        }
    }

    /// Takes page number and size from the event, keeps the current sort.
    pub fn with_page(&self, event: PageEvent) -> Self {
        Self {
            page_size: event.page_size,
            page_number: event.page_index,
            sort: self.sort.clone(),
        }
    }

    /// Replaces the sort list entirely; the last sort event wins.
    pub fn with_sort(&self, event: &SortEvent) -> Self {
        let sort = match event.direction {
            Some(direction) => vec![SortRule::new(event.active.clone(), direction)],
            None => Vec::new(),
        };
        Self {
            page_size: self.page_size,
            page_number: self.page_number,
            sort,
        }
    }

    /// Same size and sort, back on page 0.
    pub fn rewound(&self) -> Self {
        Self {
            page_size: self.page_size,
            page_number: 0,
            sort: self.sort.clone(),
        }
    }
}

/// The fixed allow-list of page sizes offered by the paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizes(Vec<u32>);

impl PageSizes {
    pub fn new(sizes: impl Into<Vec<u32>>) -> Self {
        Self(sizes.into())
    }

    pub fn contains(&self, size: u32) -> bool {
        self.0.contains(&size)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Scalar value of a single filter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Date(NaiveDate),
    Text(String),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Blank text carries no constraint.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Date(_) => false,
        }
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Filter field name → optional value. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: BTreeMap<String, Option<FilterValue>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter set declaring `fields`, all unconstrained.
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            values: fields
                .iter()
                .map(|field| (field.to_string(), None))
                .collect(),
        }
    }

    /// Builder-style setter.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Option<FilterValue>>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.values.get(field).and_then(Option::as_ref)
    }

    /// Merges `update` into a copy of this set.
    ///
    /// Every field of `update` must already be declared here; otherwise nothing is
    /// merged and the unknown name is reported.
    pub fn merged(&self, update: &FilterSet) -> Result<FilterSet, QueryError> {
        if let Some(unknown) = update.values.keys().find(|k| !self.values.contains_key(*k)) {
            return Err(QueryError::UnknownFilter(unknown.clone()));
        }
        let mut merged = self.clone();
        for (field, value) in &update.values {
            merged.values.insert(field.clone(), value.clone());
        }
        Ok(merged)
    }

    /// Same fields, every value reset to `None`.
    pub fn cleared(&self) -> FilterSet {
        Self {
            values: self.values.keys().map(|k| (k.clone(), None)).collect(),
        }
    }

    /// Fields carrying an actual constraint.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().filter_map(|(field, value)| match value {
            Some(value) if !value.is_empty() => Some((field.as_str(), value)),
            _ => None,
        })
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Pagination block of a [`RequestDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageableDescriptor {
    pub page_size: u32,
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortRule>,
}

/// Normalized request object sent to the backend gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub pageable: PageableDescriptor,
    #[serde(flatten)]
    pub filters: BTreeMap<String, FilterValue>,
}

/// Builds the request descriptor for one page.
///
/// Pagination fields are copied verbatim; at most one sort rule is carried; filter
/// fields without a value are omitted.
pub fn build_descriptor(
    pageable: &Pageable,
    filters: &FilterSet,
    page_sizes: &PageSizes,
) -> Result<RequestDescriptor, QueryError> {
    if !page_sizes.contains(pageable.page_size) {
        return Err(QueryError::PageSizeNotAllowed(pageable.page_size));
    }

    Ok(RequestDescriptor {
        pageable: PageableDescriptor {
            page_size: pageable.page_size,
            page_number: pageable.page_number,
            sort: pageable.sort.last().cloned().into_iter().collect(),
        },
        filters: filters
            .active()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect(),
    })
}
