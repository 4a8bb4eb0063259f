//! Backend capability interface for the desktop mail/calendar client.
//!
//! The platform binding (COM, IMAP, whatever the live client speaks) lives
//! outside this crate; it plugs in by implementing [`MailStoreBackend`].
//! The in-memory implementation in [`memory`] is the seam that lets the
//! entire core be exercised without a running desktop application.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ItemKind;
use crate::search::window::TimeWindow;

pub use memory::MemoryBackend;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures raised by the backend collaborator.
///
/// `Unavailable` (the desktop client is not running or unreachable) is
/// deliberately distinct from an empty result set so callers never confuse
/// "no results" with "no client".
#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("mail client unavailable: {message}")]
    Unavailable { message: String },

    #[error("failed to fetch item {handle}: {message}")]
    ItemFetch { handle: String, message: String },

    #[error("{operation} failed: {message}")]
    Operation { operation: String, message: String },
}

impl BackendError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        BackendError::Unavailable {
            message: message.into(),
        }
    }

    pub fn item_fetch(handle: &ItemHandle, message: impl Into<String>) -> Self {
        BackendError::ItemFetch {
            handle: handle.to_string(),
            message: message.into(),
        }
    }

    pub fn operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Operation {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Opaque identifier for a single mail or appointment item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemHandle(String);

impl ItemHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a backend folder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderHandle(String);

impl FolderHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FolderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One folder in the backend's flattened hierarchy.
///
/// The backend owns the hierarchy walk; `depth` records how far below a
/// root store the folder sits so listings can be rendered as a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    pub handle: FolderHandle,
    pub name: String,
    pub depth: usize,
}

/// Raw mail item as the backend reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMail {
    pub handle: ItemHandle,
    pub subject: String,
    pub sender_name: String,
    pub sender_address: String,
    pub received: DateTime<Utc>,
    pub recipients: Vec<String>,
    pub body: String,
    pub attachments: Vec<String>,
    pub unread: bool,
}

/// Raw appointment item as the backend reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAppointment {
    pub handle: ItemHandle,
    pub subject: String,
    pub organizer: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub attendees: Vec<String>,
    pub body: String,
    pub all_day: bool,
}

/// A raw backend item of either kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawItem {
    Mail(RawMail),
    Appointment(RawAppointment),
}

impl RawItem {
    pub fn handle(&self) -> &ItemHandle {
        match self {
            RawItem::Mail(mail) => &mail.handle,
            RawItem::Appointment(appt) => &appt.handle,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            RawItem::Mail(_) => ItemKind::Mail,
            RawItem::Appointment(_) => ItemKind::Appointment,
        }
    }

    /// Received time for mail, start time for appointments
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            RawItem::Mail(mail) => mail.received,
            RawItem::Appointment(appt) => appt.start,
        }
    }
}

/// A new outgoing message handed to the backend for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub body: String,
}

/// A new appointment handed to the backend for creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub subject: String,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees: Vec<String>,
    pub description: Option<String>,
}

/// Capability interface to the live desktop mail/calendar client.
///
/// Implementations represent one live desktop session: the connection is a
/// singleton resource acquired once at startup, held for the process
/// lifetime, and released on shutdown (including error paths). Calls are
/// synchronous relative to the client: each one blocks for the duration of
/// the underlying operation, and no retries happen at this layer.
///
/// Native search (`search_items`) is treated as a coarse pre-filter: it may
/// over-match, and the core applies exact query semantics on top. It may
/// also under-match; candidates the backend omits are never recovered.
#[async_trait]
pub trait MailStoreBackend: Send + Sync {
    /// Enumerate all folders as a flattened hierarchy, parents before
    /// children.
    async fn list_folders(&self) -> BackendResult<Vec<FolderInfo>>;

    /// The default folder for a kind: the primary inbox for mail, the
    /// default calendar for appointments.
    async fn default_folder(&self, kind: ItemKind) -> BackendResult<FolderInfo>;

    /// Enumerate folder contents whose timestamps fall inside `window`.
    async fn enumerate_items(
        &self,
        folder: &FolderHandle,
        window: &TimeWindow,
    ) -> BackendResult<Vec<RawItem>>;

    /// Run the backend's native search restricted to `window`, returning a
    /// candidate superset for exact filtering.
    async fn search_items(
        &self,
        folder: &FolderHandle,
        window: &TimeWindow,
        raw_query: &str,
    ) -> BackendResult<Vec<RawItem>>;

    /// Fetch one item with its full body and attachment names.
    async fn fetch_item(&self, handle: &ItemHandle) -> BackendResult<RawItem>;

    /// Send a new message.
    async fn send_message(&self, message: &OutgoingMessage) -> BackendResult<()>;

    /// Reply to the item behind `handle` with a plain-text body.
    async fn reply_to(&self, handle: &ItemHandle, body: &str) -> BackendResult<()>;

    /// Create a new appointment in the default calendar.
    async fn create_appointment(&self, draft: &AppointmentDraft) -> BackendResult<()>;
}
