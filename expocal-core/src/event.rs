//! Exhibition event records.
//!
//! Sources hand back loosely-shaped JSON (`EventRecord`); it is normalized
//! into `Event` on the way in. Dates stay as the upstream strings so that a
//! single malformed record survives storage and is skipped at lookup time
//! instead of failing the whole batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date_range::DateSpan;
use crate::error::ExpoResult;

/// A single exhibition, fair or show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EventRecord")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub venue: String,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD, inclusive
    pub end_date: String,
    /// Free-form, never parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Upstream shape of an event: every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub source_url: Option<String>,
}

impl EventRecord {
    pub fn has_name(&self) -> bool {
        non_blank(self.name.as_deref()).is_some()
    }

    pub fn has_start_date(&self) -> bool {
        non_blank(self.start_date.as_deref()).is_some()
    }
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        let start_date = record.start_date.unwrap_or_default();
        // A missing end date means a one-day event
        let end_date = match non_blank(record.end_date.as_deref()) {
            Some(end) => end.to_string(),
            None => start_date.clone(),
        };

        Event {
            id: record.id.unwrap_or_default(),
            name: record.name.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            venue: record.venue.unwrap_or_default(),
            start_date,
            end_date,
            start_time: record.start_time.filter(|t| !t.trim().is_empty()),
            end_time: record.end_time.filter(|t| !t.trim().is_empty()),
            source_url: record.source_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

impl Event {
    pub fn new(id: &str, name: &str, venue: &str, start_date: &str, end_date: &str) -> Self {
        Event {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            venue: venue.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            start_time: None,
            end_time: None,
            source_url: None,
        }
    }

    /// The inclusive days this event runs on.
    /// Fails when either date is malformed or the end precedes the start.
    pub fn span(&self) -> ExpoResult<DateSpan> {
        DateSpan::parse(&self.start_date, &self.end_date)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_end_date_defaults_to_start() {
        let event: Event = serde_json::from_str(
            r#"{"id":"a","name":"Book Fair","venue":"BMICH","startDate":"2024-09-20"}"#,
        )
        .unwrap();
        assert_eq!(event.end_date, "2024-09-20");
        assert!(event.span().unwrap().is_single_day());
    }

    #[test]
    fn blank_end_date_defaults_to_start() {
        let event: Event = serde_json::from_str(
            r#"{"id":"a","name":"x","startDate":"2024-09-20","endDate":"  "}"#,
        )
        .unwrap();
        assert_eq!(event.end_date, "2024-09-20");
    }

    #[test]
    fn null_optional_fields_are_accepted() {
        let event: Event = serde_json::from_str(
            r#"{"id":"a","name":"x","description":null,"venue":"SLECC",
                "startDate":"2024-09-20","endDate":"2024-09-22",
                "startTime":null,"endTime":""}"#,
        )
        .unwrap();
        assert_eq!(event.description, "");
        assert_eq!(event.start_time, None);
        assert_eq!(event.end_time, None);
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_options() {
        let mut event = Event::new("a", "Art Show", "Lionel Wendt", "2024-03-01", "2024-03-03");
        event.start_time = Some("10:00 AM".into());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["startDate"], "2024-03-01");
        assert_eq!(json["endDate"], "2024-03-03");
        assert_eq!(json["startTime"], "10:00 AM");
        assert!(json.get("endTime").is_none());
        assert!(json.get("sourceUrl").is_none());

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn malformed_dates_survive_deserialization() {
        let event: Event =
            serde_json::from_str(r#"{"id":"bad","name":"x","startDate":"not-a-date"}"#).unwrap();
        assert_eq!(event.start_date, "not-a-date");
        assert!(event.span().is_err());
    }

    #[test]
    fn record_presence_checks() {
        let record = EventRecord {
            name: Some("  ".into()),
            start_date: Some("2024-01-01".into()),
            ..Default::default()
        };
        assert!(!record.has_name());
        assert!(record.has_start_date());
    }
}
