use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One schedule record as the backend returns it: hours spent on one
/// category on one day. At most one entry exists per category per day,
/// enforced server-side; the client never checks.
///
/// The category stays a plain string because the wire may carry names
/// outside the fixed set; those are ignored by aggregation, not rejected.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeLogEntry {
    pub date: NaiveDate,
    pub category: String,
    pub duration: f64,
}

impl TimeLogEntry {
    pub fn new(date: NaiveDate, category: impl Into<String>, duration: f64) -> Self {
        Self {
            date,
            category: category.into(),
            duration,
        }
    }
}
