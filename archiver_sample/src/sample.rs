use archiver_types::serde::Archivable;
use archiver_types::types::{Aggregate, Dictionary};
use chrono::{DateTime, Utc};
use std::fmt;

#[cfg(test)]
mod test;

/// A titled entry, stamped with seconds since the UNIX epoch.
#[derive(PartialEq, Clone, Debug)]
pub struct Sample {
    pub title: String,
    pub timestamp: f64,
}

impl Sample {
    pub fn new<S: Into<String>>(title: S, timestamp: f64) -> Self {
        Self {
            title: title.into(),
            timestamp,
        }
    }

    /// A sample stamped with the current time.
    pub fn now<S: Into<String>>(title: S) -> Self {
        let micros = Utc::now().timestamp_micros();
        Self::new(title, micros as f64 / 1_000_000.0)
    }

    /// The timestamp as `yyyy.M.d H:m:ss`, in UTC.
    pub fn formatted_time(&self) -> String {
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9) as u32;
        match DateTime::<Utc>::from_timestamp(secs as i64, nanos.min(999_999_999)) {
            Some(dt) => dt.format("%Y.%-m.%-d %-H:%-M:%S").to_string(),
            None => self.timestamp.to_string(),
        }
    }
}

impl Aggregate for Sample {
    const IDENTIFIER: &'static str = "Sample";

    fn fields(&self) -> Vec<(&'static str, &dyn Archivable)> {
        vec![("title", &self.title), ("timestamp", &self.timestamp)]
    }

    fn reconstruct(dict: &Dictionary) -> Self {
        match (dict.get_str("title"), dict.get_double("timestamp")) {
            (Some(title), Some(timestamp)) => Self::new(title, timestamp),
            _ => Self::new("", 0.0),
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.formatted_time(), self.title)
    }
}
