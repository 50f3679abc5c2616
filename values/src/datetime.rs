//! Timestamps with optional UTC offsets.

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::HostError;

/// A calendar timestamp, naive or carrying a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datetime {
    naive: NaiveDateTime,
    offset: Option<FixedOffset>,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl Datetime {
    pub fn naive(naive: NaiveDateTime) -> Self {
        Self {
            naive,
            offset: None,
        }
    }

    pub fn with_offset(naive: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            naive,
            offset: Some(offset),
        }
    }

    /// Local wall-clock time.
    pub fn local(&self) -> NaiveDateTime {
        self.naive
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// The same instant in UTC, for offset-aware timestamps.
    pub fn to_utc(&self) -> Option<NaiveDateTime> {
        let offset = self.offset?;
        Some(self.naive - TimeDelta::seconds(i64::from(offset.local_minus_utc())))
    }

    /// ISO-8601 text, e.g. `2024-01-02T03:04:05.000006+05:30`.
    pub fn isoformat(&self) -> String {
        self.isoformat_with('T')
    }

    /// The `str()` form, which separates date and time with a space.
    pub fn to_display_string(&self) -> String {
        self.isoformat_with(' ')
    }

    fn isoformat_with(&self, separator: char) -> String {
        let mut text = format!(
            "{}{}{}",
            self.naive.format("%Y-%m-%d"),
            separator,
            self.naive.format("%H:%M:%S")
        );
        let micros = self.microsecond();
        if micros != 0 {
            text.push_str(&format!(".{micros:06}"));
        }
        if let Some(offset) = self.offset {
            text.push_str(&format_offset(offset));
        }
        text
    }

    fn microsecond(&self) -> u32 {
        self.naive.nanosecond() / 1_000
    }

    /// Parse ISO-8601 text: a date, optionally followed by `T` or a space, a time
    /// with optional fractional seconds, and an optional `Z` or `±HH:MM` offset.
    pub fn from_isoformat(text: &str) -> Result<Self, HostError> {
        let invalid = || HostError::InvalidValue(format!("Invalid isoformat string: {text:?}"));

        let (local, offset) = split_offset(text).ok_or_else(invalid)?;

        let naive = if local.len() == 10 {
            NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        } else {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        }
        .ok_or_else(invalid)?;

        Ok(Self { naive, offset })
    }

    /// Constructor-style repr, e.g. `datetime.datetime(2024, 1, 2, 3, 4)`.
    pub fn repr(&self) -> String {
        let n = self.naive;
        let mut fields = vec![
            n.year().to_string(),
            n.month().to_string(),
            n.day().to_string(),
            n.hour().to_string(),
            n.minute().to_string(),
        ];
        let micros = self.microsecond();
        if n.second() != 0 || micros != 0 {
            fields.push(n.second().to_string());
        }
        if micros != 0 {
            fields.push(micros.to_string());
        }
        let mut text = format!("datetime.datetime({}", fields.join(", "));
        if let Some(offset) = self.offset {
            text.push_str(&format!(
                ", tzinfo=datetime.timezone(datetime.timedelta(seconds={}))",
                offset.local_minus_utc()
            ));
        }
        text.push(')');
        text
    }
}

fn format_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.unsigned_abs();
    let mut text = format!("{sign}{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60);
    if seconds % 60 != 0 {
        text.push_str(&format!(":{:02}", seconds % 60));
    }
    text
}

/// Splits `text` into the local part and its parsed offset, if any.
fn split_offset(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(local) = text.strip_suffix('Z') {
        return Some((local, FixedOffset::east_opt(0)));
    }
    // Offsets can only follow the time part, which starts after the 10-char date.
    let Some(position) = text
        .char_indices()
        .skip(10)
        .find(|&(_, c)| c == '+' || c == '-')
        .map(|(i, _)| i)
    else {
        return Some((text, None));
    };

    let (local, offset) = text.split_at(position);
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let mut parts = offset[1..].split(':');
    let hours: i32 = parts.next()?.parse().ok()?;
    let minutes: i32 = parts.next().unwrap_or("0").parse().ok()?;
    let seconds: i32 = parts.next().unwrap_or("0").parse().ok()?;
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60 + seconds))?;
    Some((local, Some(offset)))
}
