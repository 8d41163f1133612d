//! `files.list` query rendering
//!
//! Turns a [`ListQuery`] into the Drive v3 search grammar:
//!
//! ```text
//! '<parent>' in parents and mimeType='application/vnd.google-apps.folder'
//!     and trashed=false and modifiedTime > '2025-07-01T00:00:00.000Z'
//! ```

use galsync_core::domain::FOLDER_MIME_TYPE;
use galsync_core::ports::{KindFilter, ListQuery};

/// Fields requested for every listed file
pub const LIST_FIELDS: &str =
    "nextPageToken, files(id, name, mimeType, parents, createdTime, modifiedTime, description)";

/// Largest page size `files.list` accepts
pub const MAX_PAGE_SIZE: u32 = 1000;

/// A rendered `files.list` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListRequest {
    /// The `q` search expression
    pub q: String,
    /// Page size sent with each request
    pub page_size: u32,
    /// Sort by name on the server
    pub order_by_name: bool,
    /// Stop after the first page (probes)
    pub single_page: bool,
}

impl FileListRequest {
    /// Renders a port-level query.
    ///
    /// A query with a `limit` becomes a single-page request of that size;
    /// otherwise all pages are fetched at the maximum page size.
    pub fn from_query(query: &ListQuery) -> Self {
        let (page_size, single_page) = match query.limit {
            Some(limit) => (limit.clamp(1, MAX_PAGE_SIZE), true),
            None => (MAX_PAGE_SIZE, false),
        };

        Self {
            q: render_q(query),
            page_size,
            order_by_name: query.order_by_name,
            single_page,
        }
    }

    /// Query-string parameters for one page
    pub fn params(&self, page_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.q.clone()),
            ("fields", LIST_FIELDS.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if self.order_by_name {
            params.push(("orderBy", "name".to_string()));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }
        params
    }
}

/// Renders the `q` expression. Trashed objects are always excluded.
pub fn render_q(query: &ListQuery) -> String {
    // Remote ids are validated to [A-Za-z0-9_-], so no quoting is needed
    let mut clauses = vec![format!("'{}' in parents", query.parent.as_str())];

    if query.kind == KindFilter::FoldersOnly {
        clauses.push(format!("mimeType='{FOLDER_MIME_TYPE}'"));
    }

    clauses.push("trashed=false".to_string());

    if let Some(watermark) = query.modified_after {
        clauses.push(format!("modifiedTime > '{watermark}'"));
    }

    clauses.join(" and ")
}
