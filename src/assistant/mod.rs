//! Tool surface exposed to the protocol layer.
//!
//! One method per capability. Each call is stateless at the boundary; the
//! numbered-result translation between calls lives in the session cache this
//! service owns. The protocol layer is expected to serialize invocations,
//! but the cache sits behind its own lock so install/resolve stay safe
//! either way.

pub mod render;

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::backend::{AppointmentDraft, MailStoreBackend, OutgoingMessage};
use crate::config::AssistantConfig;
use crate::error::{AssistantError, AssistantResult};
use crate::model::{ItemKind, ItemView};
use crate::search::engine::SearchEngine;
use crate::search::folder::FolderResolver;
use crate::search::query::QueryExpression;
use crate::search::window::TimeWindow;
use crate::session::SessionCache;

/// Wire format for appointment start/end times at the tool boundary
const WIRE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The assistant service: query/cache core plus backend orchestration.
///
/// Holds the single live backend connection for the process and the one
/// session cache all numbered lookups resolve against.
pub struct Assistant {
    backend: Arc<dyn MailStoreBackend>,
    config: AssistantConfig,
    engine: SearchEngine,
    cache: Mutex<SessionCache>,
}

impl Assistant {
    pub fn new(backend: Arc<dyn MailStoreBackend>, config: AssistantConfig) -> Self {
        let engine = SearchEngine::new(config.preview_chars);
        info!("assistant service created");
        Self {
            backend,
            config,
            engine,
            cache: Mutex::new(SessionCache::new()),
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Generation token of the current result set, for embedders that want
    /// to detect supersession.
    pub async fn generation(&self) -> u64 {
        self.cache.lock().await.generation()
    }

    /// List all folders the backend reports, as an indented tree.
    pub async fn list_folders(&self) -> AssistantResult<String> {
        info!("list_folders");
        let folders = self.backend.list_folders().await?;
        Ok(render::folder_tree(&folders))
    }

    /// List recent items of `kind` and install them as the new numbered
    /// result set.
    ///
    /// `days` falls back to the configured default for the kind. Mail looks
    /// back from now; appointments look forward.
    pub async fn list_recent(
        &self,
        kind: ItemKind,
        days: Option<i64>,
        folder: Option<&str>,
        limit: Option<usize>,
    ) -> AssistantResult<String> {
        let days = days.unwrap_or_else(|| self.config.default_days(kind));
        info!(%kind, days, folder = folder.unwrap_or("<default>"), "list_recent");

        let window = TimeWindow::for_kind(kind, days)?;
        self.run_listing(kind, days, folder, None, limit, &window)
            .await
    }

    /// Search items of `kind` by a free-text expression and install the
    /// matches as the new numbered result set.
    pub async fn search(
        &self,
        kind: ItemKind,
        days: Option<i64>,
        raw_query: &str,
        folder: Option<&str>,
        limit: Option<usize>,
    ) -> AssistantResult<String> {
        let days = days.unwrap_or_else(|| self.config.default_days(kind));
        info!(%kind, days, query = raw_query, "search");

        let window = TimeWindow::for_kind(kind, days)?;
        let query = QueryExpression::parse(raw_query)?;
        self.run_listing(kind, days, folder, Some(&query), limit, &window)
            .await
    }

    async fn run_listing(
        &self,
        kind: ItemKind,
        days: i64,
        folder: Option<&str>,
        query: Option<&QueryExpression>,
        limit: Option<usize>,
        window: &TimeWindow,
    ) -> AssistantResult<String> {
        let folder_info = FolderResolver::resolve(self.backend.as_ref(), kind, folder).await?;
        let limit = limit.or(self.config.default_limit);

        let outcome = self
            .engine
            .search_or_list(self.backend.as_ref(), kind, &folder_info, window, query, limit)
            .await?;

        let mut cache = self.cache.lock().await;
        cache.install(outcome.items.clone());

        Ok(render::listing(
            kind,
            &folder_info.name,
            days,
            query.map(|q| q.raw()),
            &outcome,
        ))
    }

    /// Fetch the full content of a numbered item from the current listing.
    ///
    /// The number is resolved against the session cache first; the backend
    /// is only asked for the one resolved handle, never re-queried by
    /// position or subject.
    pub async fn get_item(&self, kind: ItemKind, number: usize) -> AssistantResult<String> {
        info!(%kind, number, "get_item");
        let handle = self.resolve_handle(kind, number).await?;

        let raw = match self.backend.fetch_item(&handle).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%handle, %err, "item fetch failed");
                return Err(err.into());
            }
        };
        let view = ItemView::from_raw(&raw, self.config.preview_chars);
        Ok(render::detail(number, &view))
    }

    /// Reply to a numbered mail item with a plain-text body.
    pub async fn reply(&self, number: usize, body: &str) -> AssistantResult<String> {
        info!(number, "reply");
        let item = {
            let cache = self.cache.lock().await;
            cache.resolve(number)?.clone()
        };
        if item.kind != ItemKind::Mail {
            return Err(AssistantError::stale_index(
                number,
                format!("it refers to an {}, not an email", item.kind.noun()),
            ));
        }

        self.backend.reply_to(&item.handle, body).await?;
        Ok(render::reply_confirmation(&item))
    }

    /// Compose and send a new message.
    pub async fn compose(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        cc: Option<&str>,
    ) -> AssistantResult<String> {
        info!(to, subject, "compose");
        let message = OutgoingMessage {
            to: to.to_string(),
            cc: cc.map(str::to_string),
            subject: subject.to_string(),
            body: body.to_string(),
        };
        self.backend.send_message(&message).await?;
        Ok(render::send_confirmation(&message))
    }

    /// Create a new appointment in the default calendar.
    ///
    /// `start` and `end` use the `YYYY-MM-DD HH:MM` wire format; parse
    /// failures and inverted ranges are rejected before the backend is
    /// called.
    pub async fn create_appointment(
        &self,
        subject: &str,
        start: &str,
        end: &str,
        location: Option<&str>,
        attendees: &[String],
        description: Option<&str>,
    ) -> AssistantResult<String> {
        info!(subject, start, end, "create_appointment");
        let start = parse_wire_time(start)?;
        let end = parse_wire_time(end)?;
        if end <= start {
            return Err(AssistantError::invalid_time_range(
                "the end time must be after the start time",
            ));
        }

        let draft = AppointmentDraft {
            subject: subject.to_string(),
            location: location.map(str::to_string),
            start,
            end,
            attendees: attendees.to_vec(),
            description: description.map(str::to_string),
        };
        self.backend.create_appointment(&draft).await?;
        Ok(render::appointment_confirmation(&draft))
    }

    /// Resolve a display number and check it refers to the requested kind.
    ///
    /// A kind mismatch is treated as an unknown number: the number was
    /// issued by a listing of the other kind, so for the requested kind it
    /// does not exist.
    async fn resolve_handle(
        &self,
        kind: ItemKind,
        number: usize,
    ) -> AssistantResult<crate::backend::ItemHandle> {
        let cache = self.cache.lock().await;
        let item = cache.resolve(number)?;
        if item.kind != kind {
            return Err(AssistantError::stale_index(
                number,
                format!(
                    "it refers to an {}, not an {}",
                    item.kind.noun(),
                    kind.noun()
                ),
            ));
        }
        Ok(item.handle.clone())
    }
}

fn parse_wire_time(value: &str) -> AssistantResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, WIRE_TIME_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| {
            AssistantError::invalid_time_range(format!(
                "'{value}' is not in the YYYY-MM-DD HH:MM format"
            ))
        })
}
