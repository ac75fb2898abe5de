//! Reports - the pipeline assemblers behind the admin screens.
//!
//! Each report has a pure builder returning the `Pipeline` (so the stage
//! list can be inspected or sent to an external store) and a runner that
//! executes it through a `DocumentStore` and decodes typed rows.
//!
//! ## Example
//!
//! ```ignore
//! use orgdesk::reports;
//!
//! let rows = reports::announcement_results(&store, &announcement_id)?;
//! let feed = reports::notification_feed(&store, &FeedQuery { user_id, now, window_millis, page: 1, limit: 10 })?;
//! ```

mod announcement;
mod breadcrumbs;
mod notification;
mod scoring;
mod search;
mod training;

use std::fmt;

use crate::document::StoreError;

pub use announcement::{announcement_results, announcement_results_pipeline, AnnouncementResultRow};
pub use breadcrumbs::{ou_breadcrumbs, ou_breadcrumbs_pipeline};
pub use notification::{
    feed_pipeline, mark_seen, notification_feed, user_ou_chain, FeedItem, FeedQuery,
    NotificationFeed,
};
pub use scoring::{
    credit, excel_data, excel_data_pipeline, ExcelAnswer, ExcelData, ExcelQuestion, ExcelRow,
    Score,
};
pub use search::{advanced_search, search_pipeline, SearchQuery, SearchResults};
pub use training::{catalog_pipeline, training_catalog, CatalogEntry, CatalogKind, CatalogQuery};

/// Error type for report operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    /// Store-level failure, including malformed ids.
    Store(StoreError),
    /// A document the report is anchored on does not exist.
    NotFound { collection: String, id: String },
    /// The request is well-formed but cannot be served.
    Invalid(String),
    /// Pipeline output did not have the expected shape.
    Decode(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Store(e) => write!(f, "{}", e),
            ReportError::NotFound { collection, id } => write!(f, "{} not found: {}", collection, id),
            ReportError::Invalid(msg) => write!(f, "invalid report request: {}", msg),
            ReportError::Decode(msg) => write!(f, "report decode error: {}", msg),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        ReportError::Store(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Decode(err.to_string())
    }
}

impl ReportError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        ReportError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}
