//! In-memory backend used by the test suite and by embedders that want a
//! fake profile instead of a live desktop client.
//!
//! Mutating calls (send, reply, create) are recorded so tests can assert on
//! exactly what the core handed to the backend. The native search is a
//! deliberately coarse any-term substring match, so the exact OR/AND
//! semantics applied on top of it by the query layer are observable.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::{
    AppointmentDraft, BackendError, BackendResult, FolderHandle, FolderInfo, ItemHandle,
    MailStoreBackend, OutgoingMessage, RawAppointment, RawItem, RawMail,
};
use crate::model::ItemKind;
use crate::search::window::TimeWindow;

/// In-memory [`MailStoreBackend`] implementation
pub struct MemoryBackend {
    unavailable: Option<String>,
    folders: Vec<FolderInfo>,
    default_mail: FolderHandle,
    default_calendar: FolderHandle,
    items: RwLock<HashMap<FolderHandle, Vec<RawItem>>>,
    sent: RwLock<Vec<OutgoingMessage>>,
    replies: RwLock<Vec<(ItemHandle, String)>>,
    created: RwLock<Vec<AppointmentDraft>>,
}

impl MemoryBackend {
    /// Create an empty backend with an "Inbox" and a "Calendar" folder.
    pub fn new() -> Self {
        let inbox = FolderHandle::new(Uuid::new_v4().to_string());
        let calendar = FolderHandle::new(Uuid::new_v4().to_string());
        let folders = vec![
            FolderInfo {
                handle: inbox.clone(),
                name: "Inbox".to_string(),
                depth: 0,
            },
            FolderInfo {
                handle: calendar.clone(),
                name: "Calendar".to_string(),
                depth: 0,
            },
        ];
        let mut items = HashMap::new();
        items.insert(inbox.clone(), Vec::new());
        items.insert(calendar.clone(), Vec::new());

        Self {
            unavailable: None,
            folders,
            default_mail: inbox,
            default_calendar: calendar,
            items: RwLock::new(items),
            sent: RwLock::new(Vec::new()),
            replies: RwLock::new(Vec::new()),
            created: RwLock::new(Vec::new()),
        }
    }

    /// Create a backend whose every call fails as unavailable, emulating a
    /// desktop client that is not running.
    pub fn unavailable(message: impl Into<String>) -> Self {
        let mut backend = Self::new();
        backend.unavailable = Some(message.into());
        backend
    }

    /// Handle of the default mail folder
    pub fn inbox(&self) -> FolderHandle {
        self.default_mail.clone()
    }

    /// Handle of the default calendar folder
    pub fn calendar(&self) -> FolderHandle {
        self.default_calendar.clone()
    }

    /// Register an additional folder at the given hierarchy depth.
    pub fn add_folder(&mut self, name: impl Into<String>, depth: usize) -> FolderHandle {
        let handle = FolderHandle::new(Uuid::new_v4().to_string());
        self.folders.push(FolderInfo {
            handle: handle.clone(),
            name: name.into(),
            depth,
        });
        self.items.get_mut().insert(handle.clone(), Vec::new());
        handle
    }

    /// Seed a mail item into `folder`.
    pub fn add_mail(&mut self, folder: &FolderHandle, mail: RawMail) {
        self.items
            .get_mut()
            .entry(folder.clone())
            .or_default()
            .push(RawItem::Mail(mail));
    }

    /// Seed an appointment into the default calendar.
    pub fn add_appointment(&mut self, appointment: RawAppointment) {
        let calendar = self.default_calendar.clone();
        self.items
            .get_mut()
            .entry(calendar)
            .or_default()
            .push(RawItem::Appointment(appointment));
    }

    /// Messages the core asked this backend to send
    pub async fn sent_messages(&self) -> Vec<OutgoingMessage> {
        self.sent.read().await.clone()
    }

    /// Replies the core asked this backend to deliver, by target handle
    pub async fn recorded_replies(&self) -> Vec<(ItemHandle, String)> {
        self.replies.read().await.clone()
    }

    /// Appointments the core asked this backend to create
    pub async fn created_appointments(&self) -> Vec<AppointmentDraft> {
        self.created.read().await.clone()
    }

    fn ensure_available(&self) -> BackendResult<()> {
        match &self.unavailable {
            Some(message) => Err(BackendError::unavailable(message.clone())),
            None => Ok(()),
        }
    }

    /// Coarse field set for the native search, wider than the exact match
    /// fields so over-matching is observable.
    fn coarse_fields(item: &RawItem) -> Vec<&str> {
        match item {
            RawItem::Mail(mail) => vec![
                mail.subject.as_str(),
                mail.sender_name.as_str(),
                mail.sender_address.as_str(),
                mail.body.as_str(),
            ],
            RawItem::Appointment(appt) => vec![
                appt.subject.as_str(),
                appt.organizer.as_str(),
                appt.location.as_str(),
                appt.body.as_str(),
            ],
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailStoreBackend for MemoryBackend {
    async fn list_folders(&self) -> BackendResult<Vec<FolderInfo>> {
        self.ensure_available()?;
        Ok(self.folders.clone())
    }

    async fn default_folder(&self, kind: ItemKind) -> BackendResult<FolderInfo> {
        self.ensure_available()?;
        let handle = match kind {
            ItemKind::Mail => &self.default_mail,
            ItemKind::Appointment => &self.default_calendar,
        };
        self.folders
            .iter()
            .find(|folder| &folder.handle == handle)
            .cloned()
            .ok_or_else(|| BackendError::operation("default_folder", "default folder missing"))
    }

    async fn enumerate_items(
        &self,
        folder: &FolderHandle,
        window: &TimeWindow,
    ) -> BackendResult<Vec<RawItem>> {
        self.ensure_available()?;
        let items = self.items.read().await;
        let contents = items.get(folder).ok_or_else(|| {
            BackendError::operation("enumerate_items", format!("unknown folder {folder}"))
        })?;
        Ok(contents
            .iter()
            .filter(|item| window.contains(item.timestamp()))
            .cloned()
            .collect())
    }

    async fn search_items(
        &self,
        folder: &FolderHandle,
        window: &TimeWindow,
        raw_query: &str,
    ) -> BackendResult<Vec<RawItem>> {
        self.ensure_available()?;
        let terms: Vec<String> = raw_query
            .split_whitespace()
            .filter(|token| !token.eq_ignore_ascii_case("or"))
            .map(|token| token.to_lowercase())
            .collect();

        let items = self.items.read().await;
        let contents = items.get(folder).ok_or_else(|| {
            BackendError::operation("search_items", format!("unknown folder {folder}"))
        })?;
        Ok(contents
            .iter()
            .filter(|item| window.contains(item.timestamp()))
            .filter(|item| {
                let fields: Vec<String> = Self::coarse_fields(item)
                    .iter()
                    .map(|field| field.to_lowercase())
                    .collect();
                terms
                    .iter()
                    .any(|term| fields.iter().any(|field| field.contains(term)))
            })
            .cloned()
            .collect())
    }

    async fn fetch_item(&self, handle: &ItemHandle) -> BackendResult<RawItem> {
        self.ensure_available()?;
        let items = self.items.read().await;
        items
            .values()
            .flatten()
            .find(|item| item.handle() == handle)
            .cloned()
            .ok_or_else(|| BackendError::item_fetch(handle, "no such item"))
    }

    async fn send_message(&self, message: &OutgoingMessage) -> BackendResult<()> {
        self.ensure_available()?;
        self.sent.write().await.push(message.clone());
        Ok(())
    }

    async fn reply_to(&self, handle: &ItemHandle, body: &str) -> BackendResult<()> {
        self.ensure_available()?;
        let items = self.items.read().await;
        let target = items
            .values()
            .flatten()
            .find(|item| item.handle() == handle)
            .ok_or_else(|| BackendError::item_fetch(handle, "no such item"))?;
        if target.kind() != ItemKind::Mail {
            return Err(BackendError::operation(
                "reply_to",
                format!("item {handle} is not an email"),
            ));
        }
        drop(items);
        self.replies
            .write()
            .await
            .push((handle.clone(), body.to_string()));
        Ok(())
    }

    async fn create_appointment(&self, draft: &AppointmentDraft) -> BackendResult<()> {
        self.ensure_available()?;
        let appointment = RawAppointment {
            handle: ItemHandle::new(Uuid::new_v4().to_string()),
            subject: draft.subject.clone(),
            organizer: "Me".to_string(),
            start: draft.start,
            end: draft.end,
            location: draft.location.clone().unwrap_or_default(),
            attendees: draft.attendees.clone(),
            body: draft.description.clone().unwrap_or_default(),
            all_day: false,
        };
        self.items
            .write()
            .await
            .entry(self.default_calendar.clone())
            .or_default()
            .push(RawItem::Appointment(appointment));
        self.created.write().await.push(draft.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn mail_at(handle: &str, received: chrono::DateTime<Utc>, subject: &str) -> RawMail {
        RawMail {
            handle: ItemHandle::new(handle),
            subject: subject.to_string(),
            sender_name: "Sender".to_string(),
            sender_address: "sender@example.com".to_string(),
            received,
            recipients: vec!["me@example.com".to_string()],
            body: "body text".to_string(),
            attachments: Vec::new(),
            unread: false,
        }
    }

    #[tokio::test]
    async fn test_enumerate_filters_by_window() {
        let mut backend = MemoryBackend::new();
        let inbox = backend.inbox();
        let now = Utc::now();
        backend.add_mail(&inbox, mail_at("recent", now - Duration::hours(2), "Recent"));
        backend.add_mail(&inbox, mail_at("old", now - Duration::days(10), "Old"));

        let window = TimeWindow::retrospective(ItemKind::Mail, 3).unwrap();
        let items = backend.enumerate_items(&inbox, &window).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].handle().as_str(), "recent");
    }

    #[tokio::test]
    async fn test_native_search_is_any_term() {
        let mut backend = MemoryBackend::new();
        let inbox = backend.inbox();
        let now = Utc::now();
        backend.add_mail(&inbox, mail_at("a", now, "project update"));
        backend.add_mail(&inbox, mail_at("b", now, "meeting notes"));
        backend.add_mail(&inbox, mail_at("c", now, "unrelated"));

        let window = TimeWindow::retrospective(ItemKind::Mail, 3).unwrap();
        let hits = backend
            .search_items(&inbox, &window, "project meeting")
            .await
            .unwrap();

        // Coarse search returns the union; exact semantics are the query
        // layer's job.
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_every_call() {
        let backend = MemoryBackend::unavailable("client is not running");

        let err = backend.list_folders().await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));

        let err = backend
            .fetch_item(&ItemHandle::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_fetch_unknown_handle_is_item_fetch_error() {
        let backend = MemoryBackend::new();
        let err = backend
            .fetch_item(&ItemHandle::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ItemFetch { .. }));
    }

    #[tokio::test]
    async fn test_created_appointments_become_visible() {
        let backend = MemoryBackend::new();
        let start = Utc.with_ymd_and_hms(2030, 1, 10, 10, 0, 0).unwrap();
        let draft = AppointmentDraft {
            subject: "Planning".to_string(),
            location: Some("Room 2".to_string()),
            start,
            end: start + Duration::hours(1),
            attendees: vec!["a@example.com".to_string()],
            description: None,
        };

        backend.create_appointment(&draft).await.unwrap();

        assert_eq!(backend.created_appointments().await.len(), 1);
        let items = backend.items.read().await;
        let calendar = items.get(&backend.calendar()).unwrap();
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar[0].kind(), ItemKind::Appointment);
    }
}
