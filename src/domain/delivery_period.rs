use chrono::{DateTime, Duration, NaiveDate};

/// Outcome of toggling a delivery date in the pause set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseAction {
    Paused,
    Unpaused,
}

impl AsRef<str> for PauseAction {
    fn as_ref(&self) -> &str {
        match self {
            PauseAction::Paused => "paused",
            PauseAction::Unpaused => "unpaused",
        }
    }
}

/// Last delivery date of a subscription period.
///
/// Every paused date pushes the tail of the period out by one day, so the
/// period always spans exactly `total_days + paused_count` calendar days
/// starting at `start_date`. Derived on every call, never cached.
pub fn compute_end_date(start_date: NaiveDate, total_days: u32, paused_count: usize) -> NaiveDate {
    start_date + Duration::days(total_days as i64 + paused_count as i64 - 1)
}

/// Parses a delivery date supplied by a caller.
///
/// Deliveries are whole-day events: a plain `YYYY-MM-DD` value is taken as is,
/// and an RFC 3339 datetime has its time component discarded.
pub fn parse_delivery_date(raw: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|datetime| datetime.date_naive())
        .map_err(|_| format!("{} is not a valid delivery date", raw))
}
