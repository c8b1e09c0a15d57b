//! Per-subscription query state
//!
//! A [`QueryState`] is what a view renders. Its status follows
//! `Idle -> Loading -> {Success, Empty, Error}`, and any state may go back to
//! `Loading` on a retry or when a new query is resolved.

use crate::data::{ErrorInfo, RecipePayload};

/// Lifecycle position of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing has been requested yet
    Idle,
    /// A fetch is outstanding
    Loading,
    /// Data is available (fresh or cached)
    Success,
    /// The request succeeded but returned nothing
    Empty,
    /// The request failed; a retry is possible
    Error,
}

/// Snapshot of a query as seen by one subscriber
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub status: QueryStatus,
    pub data: Option<RecipePayload>,
    pub error: Option<ErrorInfo>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::idle()
    }
}

impl QueryState {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: QueryStatus::Loading,
            data: None,
            error: None,
        }
    }

    /// Resolved state for a payload: `Empty` for an empty list, else `Success`
    pub fn from_payload(payload: RecipePayload) -> Self {
        let status = if payload.is_empty() {
            QueryStatus::Empty
        } else {
            QueryStatus::Success
        };
        Self {
            status,
            data: Some(payload),
            error: None,
        }
    }

    pub fn failed(error: ErrorInfo) -> Self {
        Self {
            status: QueryStatus::Error,
            data: None,
            error: Some(error),
        }
    }

    pub fn from_outcome(outcome: Result<RecipePayload, ErrorInfo>) -> Self {
        match outcome {
            Ok(payload) => Self::from_payload(payload),
            Err(error) => Self::failed(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// True for `Success`, `Empty` and `Error`
    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            QueryStatus::Success | QueryStatus::Empty | QueryStatus::Error
        )
    }
}
