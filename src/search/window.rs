//! Bounded absolute time windows for listings and searches

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, AssistantResult};
use crate::model::ItemKind;

/// Absolute start/end pair a backend enumeration is restricted to.
///
/// Backend enumeration is O(window size) against a live desktop client, so
/// the span is validated against the kind's horizon before any backend call
/// happens: 30 days for mail, 60 for the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window ending now and reaching `days` back, for mail listings.
    pub fn retrospective(kind: ItemKind, days: i64) -> AssistantResult<Self> {
        Self::validate(kind, days)?;
        let end = Utc::now();
        Ok(Self {
            start: end - Duration::days(days),
            end,
        })
    }

    /// Window starting now and reaching `days` forward, for calendar
    /// listings.
    pub fn prospective(kind: ItemKind, days: i64) -> AssistantResult<Self> {
        Self::validate(kind, days)?;
        let start = Utc::now();
        Ok(Self {
            start,
            end: start + Duration::days(days),
        })
    }

    /// The natural window direction for a kind: mail looks back,
    /// appointments look forward.
    pub fn for_kind(kind: ItemKind, days: i64) -> AssistantResult<Self> {
        match kind {
            ItemKind::Mail => Self::retrospective(kind, days),
            ItemKind::Appointment => Self::prospective(kind, days),
        }
    }

    fn validate(kind: ItemKind, days: i64) -> AssistantResult<()> {
        let max = kind.max_horizon_days();
        if days < 1 || days > max {
            return Err(AssistantError::InvalidRange { days, max });
        }
        Ok(())
    }

    /// Whether `timestamp` falls inside the window, bounds included.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}
