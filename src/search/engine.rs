//! Listing/search orchestration over the backend

use tracing::debug;

use crate::backend::{FolderInfo, MailStoreBackend};
use crate::error::AssistantResult;
use crate::model::{ItemKind, ItemView};
use crate::search::query::QueryExpression;
use crate::search::window::TimeWindow;

/// Result of one listing or search run
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Projected items, most recent first
    pub items: Vec<ItemView>,
    /// Whether a caller-supplied cap cut the result set
    pub truncated: bool,
}

/// Combines the window, folder, and query layers against the backend's
/// enumeration/search capability.
pub struct SearchEngine {
    preview_chars: usize,
}

impl SearchEngine {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    /// Produce the ordered item sequence for a listing (no query) or a
    /// search (query present).
    ///
    /// A listing enumerates folder contents within the window. A search asks
    /// the backend's native search for a candidate superset and applies the
    /// expression's exact OR/AND semantics on top; candidates the backend
    /// omits are never recovered. Items are sorted by timestamp descending,
    /// then capped at `limit` when one is given.
    pub async fn search_or_list(
        &self,
        backend: &dyn MailStoreBackend,
        kind: ItemKind,
        folder: &FolderInfo,
        window: &TimeWindow,
        query: Option<&QueryExpression>,
        limit: Option<usize>,
    ) -> AssistantResult<SearchOutcome> {
        let raw_items = match query {
            None => backend.enumerate_items(&folder.handle, window).await?,
            Some(query) => {
                backend
                    .search_items(&folder.handle, window, query.raw())
                    .await?
            }
        };
        let candidates = raw_items.len();

        let mut items: Vec<ItemView> = raw_items
            .iter()
            .filter(|raw| raw.kind() == kind)
            .map(|raw| ItemView::from_raw(raw, self.preview_chars))
            .collect();

        if let Some(query) = query {
            items.retain(|item| query.matches(item));
        }

        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let truncated = limit.is_some_and(|cap| items.len() > cap);
        if let Some(cap) = limit {
            items.truncate(cap);
        }

        debug!(
            folder = %folder.name,
            candidates,
            kept = items.len(),
            truncated,
            "search_or_list completed"
        );

        Ok(SearchOutcome { items, truncated })
    }
}
