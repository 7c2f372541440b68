//! # Backend Gateway Capability
//!
//! The controller never talks HTTP itself; it calls a [`ListGateway`] with a
//! [`RequestDescriptor`] and gets back one [`Page`] of records.

use crate::entity::ListEntity;
use crate::error::ListError;
use crate::query::RequestDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One page of backend records, in the backend's `{content, totalElements}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<R> {
    pub content: Vec<R>,
    pub total_elements: u64,
}

impl<R> Page<R> {
    pub fn new(content: Vec<R>, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
        }
    }
}

/// Executes list queries for one entity.
#[async_trait]
pub trait ListGateway<E: ListEntity>: Send + Sync {
    /// Fetches the page described by `descriptor`.
    ///
    /// `Ok(None)` is an empty answer, not a failure.
    async fn fetch_page(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Option<Page<E::Record>>, ListError>;
}
