use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format for [`Note::updated_at`].
pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A detached snapshot of one row in the `memo` table.
///
/// Changing a `Note` value does not touch the database; go through
/// [`NoteStore`](super::store::NoteStore) for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Insertion time as stored by SQLite (UTC).
    pub created_at: String,
    /// Last write time, already formatted with [`UPDATE_TIME_FORMAT`] in local time.
    pub updated_at: String,
}

impl Note {
    /// Builds the read-only view handed to a detail screen.
    pub fn view(&self) -> NoteView {
        NoteView {
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// The only fields a note detail screen gets to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteView {
    pub title: String,
    pub content: String,
}

impl fmt::Display for NoteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.title, self.content)
    }
}

/// Formats an epoch-millisecond value in the local time zone.
pub fn format_update_time(millis: i64) -> String {
    format_update_time_in(millis, &Local)
}

/// Formats an epoch-millisecond value in `tz`.
///
/// Values chrono cannot represent fall back to the raw number.
pub fn format_update_time_in<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match tz.timestamp_millis_opt(millis).earliest() {
        Some(dt) => dt.format(UPDATE_TIME_FORMAT).to_string(),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn sample() -> Note {
        Note {
            id: 1,
            title: "Groceries".to_string(),
            content: "Milk, eggs".to_string(),
            created_at: "2024-05-01 09:30:12.345".to_string(),
            updated_at: "2024-05-01 11:30:12".to_string(),
        }
    }

    #[test]
    fn test_format_update_time_utc() {
        assert_eq!(format_update_time_in(0, &Utc), "1970-01-01 00:00:00");
        assert_eq!(
            format_update_time_in(1_700_000_000_123, &Utc),
            "2023-11-14 22:13:20"
        );
    }

    #[test]
    fn test_format_update_time_applies_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_update_time_in(0, &plus_two), "1970-01-01 02:00:00");
    }

    #[test]
    fn test_format_update_time_out_of_range_falls_back() {
        assert_eq!(format_update_time_in(i64::MAX, &Utc), i64::MAX.to_string());
    }

    #[test]
    fn test_local_format_shape() {
        let formatted = format_update_time(1_700_000_000_000);
        assert_eq!(formatted.len(), 19);
        assert!(formatted.starts_with("2023-11-1"));
    }

    #[test]
    fn test_view_carries_only_title_and_content() {
        let view = sample().view();
        assert_eq!(
            view,
            NoteView {
                title: "Groceries".to_string(),
                content: "Milk, eggs".to_string(),
            }
        );
        assert_eq!(view.to_string(), "Groceries\n\nMilk, eggs");
    }

    #[test]
    fn test_note_serializes_camel_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
    }
}
