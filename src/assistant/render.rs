//! Plain-text rendering of folder trees, numbered summaries, and item
//! details.
//!
//! Output is aimed at a tool-calling agent: every list leads with a count
//! and the window, every entry carries its display number, and truncation is
//! stated explicitly so the agent never assumes it saw everything.

use crate::backend::{AppointmentDraft, FolderInfo, OutgoingMessage};
use crate::model::{ItemKind, ItemView};
use crate::search::engine::SearchOutcome;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Indented tree of the backend's folders.
pub fn folder_tree(folders: &[FolderInfo]) -> String {
    let mut out = String::from("Available mail folders:\n");
    for folder in folders {
        out.push('\n');
        out.push_str(&"  ".repeat(folder.depth));
        out.push_str(&format!("- {}", folder.name));
    }
    out
}

fn window_phrase(kind: ItemKind, days: i64) -> String {
    match kind {
        ItemKind::Mail => format!("from the last {days} days"),
        ItemKind::Appointment => format!("in the next {days} days"),
    }
}

/// Numbered summaries for a listing or search result.
pub fn listing(
    kind: ItemKind,
    folder_name: &str,
    days: i64,
    query: Option<&str>,
    outcome: &SearchOutcome,
) -> String {
    let matching = query
        .map(|raw| format!(" matching '{raw}'"))
        .unwrap_or_default();
    let window = window_phrase(kind, days);

    if outcome.items.is_empty() {
        return format!(
            "No {}{} found in '{}' {}.",
            kind.noun_plural(),
            matching,
            folder_name,
            window
        );
    }

    let mut out = format!(
        "Found {} {}{} in '{}' {}:\n",
        outcome.items.len(),
        kind.noun_plural(),
        matching,
        folder_name,
        window
    );
    for (index, item) in outcome.items.iter().enumerate() {
        out.push('\n');
        out.push_str(&summary(index + 1, item));
    }
    if outcome.truncated {
        out.push_str(&format!(
            "\nOnly the {} most recent results are shown; more matched but were omitted.\n",
            outcome.items.len()
        ));
    }
    out.push_str(&format!(
        "\nTo view the full content of an {}, request it by its number.",
        kind.noun()
    ));
    out
}

/// One numbered summary block.
pub fn summary(number: usize, item: &ItemView) -> String {
    let mut out = format!("{} #{}\n", item.kind, number);
    out.push_str(&format!("Subject: {}\n", item.subject));
    match item.kind {
        ItemKind::Mail => {
            out.push_str(&format!("From: {}\n", counterpart_line(item)));
            out.push_str(&format!(
                "Received: {}\n",
                item.timestamp.format(TIME_FORMAT)
            ));
            if let Some(unread) = item.unread {
                out.push_str(&format!(
                    "Read Status: {}\n",
                    if unread { "Unread" } else { "Read" }
                ));
            }
            out.push_str(&format!(
                "Has Attachments: {}\n",
                yes_no(item.has_attachments)
            ));
        }
        ItemKind::Appointment => {
            out.push_str(&format!("Start: {}\n", item.timestamp.format(TIME_FORMAT)));
            if let Some(end) = item.end {
                out.push_str(&format!("End: {}\n", end.format(TIME_FORMAT)));
            }
            if let Some(location) = &item.location {
                out.push_str(&format!("Location: {location}\n"));
            }
            if let Some(all_day) = item.all_day {
                out.push_str(&format!("All Day: {}\n", yes_no(all_day)));
            }
        }
    }
    out
}

fn counterpart_line(item: &ItemView) -> String {
    match &item.counterpart_address {
        Some(address) => format!("{} <{}>", item.counterpart, address),
        None => item.counterpart.clone(),
    }
}

/// Full detail view of one item.
pub fn detail(number: usize, item: &ItemView) -> String {
    let mut out = format!("{} #{} Details:\n\n", item.kind, number);
    out.push_str(&format!("Subject: {}\n", item.subject));
    match item.kind {
        ItemKind::Mail => {
            out.push_str(&format!("From: {}\n", counterpart_line(item)));
            out.push_str(&format!(
                "Received: {}\n",
                item.timestamp.format(TIME_FORMAT)
            ));
            if !item.participants.is_empty() {
                out.push_str(&format!("To: {}\n", item.participants.join(", ")));
            }
            out.push_str(&format!(
                "Has Attachments: {}\n",
                yes_no(item.has_attachments)
            ));
            if !item.attachments.is_empty() {
                out.push_str("Attachments:\n");
                for name in &item.attachments {
                    out.push_str(&format!("  - {name}\n"));
                }
            }
            out.push_str(&format!("\nBody:\n{}", item.body));
        }
        ItemKind::Appointment => {
            out.push_str(&format!("Start: {}\n", item.timestamp.format(TIME_FORMAT)));
            if let Some(end) = item.end {
                out.push_str(&format!("End: {}\n", end.format(TIME_FORMAT)));
            }
            if let Some(location) = &item.location {
                out.push_str(&format!("Location: {location}\n"));
            }
            out.push_str(&format!("Organizer: {}\n", item.counterpart));
            if !item.participants.is_empty() {
                out.push_str(&format!("Attendees: {}\n", item.participants.join(", ")));
            }
            if let Some(all_day) = item.all_day {
                out.push_str(&format!("All Day Event: {}\n", yes_no(all_day)));
            }
            if !item.body.is_empty() {
                out.push_str(&format!("\nDescription:\n{}", item.body));
            }
        }
    }
    out
}

pub fn reply_confirmation(item: &ItemView) -> String {
    format!("Reply sent successfully to: {}", counterpart_line(item))
}

pub fn send_confirmation(message: &OutgoingMessage) -> String {
    match &message.cc {
        Some(cc) => format!(
            "Email sent successfully to: {} (cc: {})",
            message.to, cc
        ),
        None => format!("Email sent successfully to: {}", message.to),
    }
}

pub fn appointment_confirmation(draft: &AppointmentDraft) -> String {
    format!(
        "Calendar appointment '{}' created successfully for {} - {}",
        draft.subject,
        draft.start.format(TIME_FORMAT),
        draft.end.format(TIME_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FolderHandle, ItemHandle, RawItem, RawMail};
    use chrono::{TimeZone, Utc};

    fn mail_view() -> ItemView {
        ItemView::from_raw(
            &RawItem::Mail(RawMail {
                handle: ItemHandle::new("m1"),
                subject: "Budget review".to_string(),
                sender_name: "Dana Berg".to_string(),
                sender_address: "dana@example.com".to_string(),
                received: Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap(),
                recipients: vec!["me@example.com".to_string()],
                body: "Numbers attached.".to_string(),
                attachments: vec!["q1.xlsx".to_string()],
                unread: true,
            }),
            200,
        )
    }

    #[test]
    fn test_folder_tree_indents_by_depth() {
        let folders = vec![
            FolderInfo {
                handle: FolderHandle::new("root"),
                name: "Personal".to_string(),
                depth: 0,
            },
            FolderInfo {
                handle: FolderHandle::new("sub"),
                name: "Receipts".to_string(),
                depth: 1,
            },
        ];

        let out = folder_tree(&folders);
        assert!(out.contains("\n- Personal"));
        assert!(out.contains("\n  - Receipts"));
    }

    #[test]
    fn test_listing_numbers_items_and_points_at_detail_tool() {
        let outcome = SearchOutcome {
            items: vec![mail_view()],
            truncated: false,
        };

        let out = listing(ItemKind::Mail, "Inbox", 3, None, &outcome);
        assert!(out.starts_with("Found 1 emails in 'Inbox' from the last 3 days:"));
        assert!(out.contains("Email #1"));
        assert!(out.contains("From: Dana Berg <dana@example.com>"));
        assert!(out.contains("Read Status: Unread"));
        assert!(out.contains("request it by its number"));
        assert!(!out.contains("omitted"));
    }

    #[test]
    fn test_truncated_listing_says_so() {
        let outcome = SearchOutcome {
            items: vec![mail_view()],
            truncated: true,
        };

        let out = listing(ItemKind::Mail, "Inbox", 3, Some("budget"), &outcome);
        assert!(out.contains("matching 'budget'"));
        assert!(out.contains("more matched but were omitted"));
    }

    #[test]
    fn test_empty_listing_is_a_sentence_not_an_error() {
        let outcome = SearchOutcome {
            items: Vec::new(),
            truncated: false,
        };

        let out = listing(ItemKind::Appointment, "Calendar", 14, None, &outcome);
        assert_eq!(
            out,
            "No appointments found in 'Calendar' in the next 14 days."
        );
    }

    #[test]
    fn test_detail_lists_attachment_names_and_body() {
        let out = detail(2, &mail_view());

        assert!(out.starts_with("Email #2 Details:"));
        assert!(out.contains("To: me@example.com"));
        assert!(out.contains("Attachments:\n  - q1.xlsx"));
        assert!(out.ends_with("Body:\nNumbers attached."));
    }
}
