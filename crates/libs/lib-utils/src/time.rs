//! # Time Utilities
//!
//! Time formatting plus normalization of vendor-supplied event times to the
//! platform reference timezone.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Reference offset all persisted vendor timestamps are normalized to (UTC+8).
pub const PLATFORM_OFFSET_SECS: i32 = 8 * 3600;

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Parse RFC3339 string to UTC DateTime.
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(moment)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::FailToDateParse(moment.to_string()))
}

/// Convert a vendor-supplied epoch-milliseconds timestamp to platform time.
///
/// Vendors report event times in whatever timezone their servers run in, but
/// always as an epoch instant; everything persisted by the gateway is the wall
/// clock of that instant at [`PLATFORM_OFFSET_SECS`].
pub fn platform_time_from_epoch_ms(epoch_ms: i64) -> Result<NaiveDateTime, Error> {
    let offset =
        FixedOffset::east_opt(PLATFORM_OFFSET_SECS).expect("platform offset is a valid offset");
    match offset.timestamp_millis_opt(epoch_ms) {
        chrono::LocalResult::Single(dt) => Ok(dt.naive_local()),
        _ => Err(Error::FailToConvertEpoch(epoch_ms)),
    }
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToDateParse(String),
    FailToConvertEpoch(i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
