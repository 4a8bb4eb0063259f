//! Normalized, backend-agnostic item projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{ItemHandle, RawItem};

/// Kind of item a listing, search, or lookup operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Mail,
    Appointment,
}

impl ItemKind {
    /// Largest day-count a window of this kind may span.
    ///
    /// Backend enumeration cost grows with the window, so the ceiling is
    /// enforced before any backend call is made.
    pub fn max_horizon_days(&self) -> i64 {
        match self {
            ItemKind::Mail => 30,
            ItemKind::Appointment => 60,
        }
    }

    /// Noun used in rendered output ("email #3", "appointment #3")
    pub fn noun(&self) -> &'static str {
        match self {
            ItemKind::Mail => "email",
            ItemKind::Appointment => "appointment",
        }
    }

    pub fn noun_plural(&self) -> &'static str {
        match self {
            ItemKind::Mail => "emails",
            ItemKind::Appointment => "appointments",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Mail => write!(f, "Email"),
            ItemKind::Appointment => write!(f, "Appointment"),
        }
    }
}

/// Normalized projection of a raw mail or appointment item.
///
/// Immutable once constructed; a fresh fetch produces a new `ItemView`
/// rather than mutating an old one. `timestamp` is the received time for
/// mail and the start time for appointments, so ordering is uniform across
/// kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub handle: ItemHandle,
    pub kind: ItemKind,
    pub subject: String,
    /// Sender display name for mail, organizer for appointments
    pub counterpart: String,
    /// Sender address when the backend exposes one; appointments carry none
    pub counterpart_address: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Appointment end time
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    /// Whitespace-collapsed, length-capped slice of the body
    pub preview: String,
    pub has_attachments: bool,
    /// Attachment file names; populated on a full fetch, may be empty on
    /// listing projections even when `has_attachments` is set
    pub attachments: Vec<String>,
    pub unread: Option<bool>,
    pub all_day: Option<bool>,
    pub body: String,
    /// Recipients for mail, attendees for appointments, in backend order
    pub participants: Vec<String>,
}

impl ItemView {
    /// Project a raw backend item into the normalized view.
    ///
    /// `preview_chars` caps the preview length in characters.
    pub fn from_raw(raw: &RawItem, preview_chars: usize) -> Self {
        match raw {
            RawItem::Mail(mail) => ItemView {
                handle: mail.handle.clone(),
                kind: ItemKind::Mail,
                subject: mail.subject.clone(),
                counterpart: mail.sender_name.clone(),
                counterpart_address: Some(mail.sender_address.clone()),
                timestamp: mail.received,
                end: None,
                location: None,
                preview: make_preview(&mail.body, preview_chars),
                has_attachments: !mail.attachments.is_empty(),
                attachments: mail.attachments.clone(),
                unread: Some(mail.unread),
                all_day: None,
                body: mail.body.clone(),
                participants: mail.recipients.clone(),
            },
            RawItem::Appointment(appt) => ItemView {
                handle: appt.handle.clone(),
                kind: ItemKind::Appointment,
                subject: appt.subject.clone(),
                counterpart: appt.organizer.clone(),
                counterpart_address: None,
                timestamp: appt.start,
                end: Some(appt.end),
                location: if appt.location.is_empty() {
                    None
                } else {
                    Some(appt.location.clone())
                },
                preview: make_preview(&appt.body, preview_chars),
                has_attachments: false,
                attachments: Vec::new(),
                unread: None,
                all_day: Some(appt.all_day),
                body: appt.body.clone(),
                participants: appt.attendees.clone(),
            },
        }
    }

    /// Fields a search expression is matched against for this kind.
    ///
    /// Mail: subject, sender name and address, body preview. Appointments:
    /// subject, location, description body.
    pub fn search_fields(&self) -> Vec<&str> {
        match self.kind {
            ItemKind::Mail => {
                let mut fields = vec![self.subject.as_str(), self.counterpart.as_str()];
                if let Some(address) = &self.counterpart_address {
                    fields.push(address.as_str());
                }
                fields.push(self.preview.as_str());
                fields
            }
            ItemKind::Appointment => {
                let mut fields = vec![self.subject.as_str()];
                if let Some(location) = &self.location {
                    fields.push(location.as_str());
                }
                fields.push(self.body.as_str());
                fields
            }
        }
    }
}

/// Collapse whitespace runs and cap the result at `budget` characters.
fn make_preview(body: &str, budget: usize) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= budget {
        collapsed
    } else {
        let mut preview: String = collapsed.chars().take(budget).collect();
        preview.push_str("...");
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RawAppointment, RawMail};
    use chrono::TimeZone;

    fn sample_mail() -> RawItem {
        RawItem::Mail(RawMail {
            handle: ItemHandle::new("mail-1"),
            subject: "Quarterly report".to_string(),
            sender_name: "Dana Berg".to_string(),
            sender_address: "dana@example.com".to_string(),
            received: Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap(),
            recipients: vec!["team@example.com".to_string()],
            body: "Numbers   are\n\nattached.".to_string(),
            attachments: vec!["q1.xlsx".to_string()],
            unread: true,
        })
    }

    #[test]
    fn test_mail_projection() {
        let view = ItemView::from_raw(&sample_mail(), 200);

        assert_eq!(view.kind, ItemKind::Mail);
        assert_eq!(view.counterpart, "Dana Berg");
        assert_eq!(view.counterpart_address.as_deref(), Some("dana@example.com"));
        assert_eq!(view.preview, "Numbers are attached.");
        assert!(view.has_attachments);
        assert_eq!(view.unread, Some(true));
        assert_eq!(view.end, None);
    }

    #[test]
    fn test_appointment_projection() {
        let start = Utc.with_ymd_and_hms(2025, 3, 12, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 12, 15, 0, 0).unwrap();
        let raw = RawItem::Appointment(RawAppointment {
            handle: ItemHandle::new("appt-1"),
            subject: "Design sync".to_string(),
            organizer: "Priya Shah".to_string(),
            start,
            end,
            location: "Room 4".to_string(),
            attendees: vec!["dev@example.com".to_string()],
            body: "Review the mockups".to_string(),
            all_day: false,
        });

        let view = ItemView::from_raw(&raw, 200);

        assert_eq!(view.kind, ItemKind::Appointment);
        assert_eq!(view.counterpart, "Priya Shah");
        assert_eq!(view.timestamp, start);
        assert_eq!(view.end, Some(end));
        assert_eq!(view.location.as_deref(), Some("Room 4"));
        assert_eq!(view.all_day, Some(false));
    }

    #[test]
    fn test_preview_truncates_on_char_budget() {
        let RawItem::Mail(mut raw) = sample_mail() else {
            unreachable!()
        };
        raw.body = "word ".repeat(100);

        let view = ItemView::from_raw(&RawItem::Mail(raw), 20);

        assert_eq!(view.preview.chars().count(), 23); // 20 + "..."
        assert!(view.preview.ends_with("..."));
    }

    #[test]
    fn test_search_fields_by_kind() {
        let mail = ItemView::from_raw(&sample_mail(), 200);
        assert!(mail.search_fields().contains(&"Dana Berg"));
        assert!(mail.search_fields().contains(&"dana@example.com"));

        let appt = RawItem::Appointment(RawAppointment {
            handle: ItemHandle::new("appt-2"),
            subject: "Standup".to_string(),
            organizer: "Lee".to_string(),
            start: Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 12, 9, 15, 0).unwrap(),
            location: String::new(),
            attendees: vec![],
            body: "Daily".to_string(),
            all_day: false,
        });
        let view = ItemView::from_raw(&appt, 200);
        // Empty location is dropped from the matched field set.
        assert_eq!(view.search_fields(), vec!["Standup", "Daily"]);
    }
}
