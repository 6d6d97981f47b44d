use aurora_api::FetchError;
use thiserror::Error;

use crate::registry::ElementKind;
use crate::surface::SurfaceError;

/// Errors raised while drawing a view
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no element registered under '{0}'")]
    UnknownElement(String),

    #[error("element '{id}' is a {found:?}, expected {expected:?}")]
    KindMismatch {
        id: String,
        expected: ElementKind,
        found: ElementKind,
    },

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("invalid {field} timestamp: '{raw}'")]
    InvalidTimestamp { field: &'static str, raw: String },

    #[error("no data has been fetched yet")]
    NoSnapshot,
}

/// Why a refresh cycle produced no new snapshot
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("refresh task ended without a result")]
    Aborted,
}

impl RefreshError {
    /// Whether retrying on the next tick has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            RefreshError::Fetch(e) => e.is_transient(),
            RefreshError::Aborted => true,
        }
    }
}
