// W3C date-time encoding for query parameters and parsing of server timestamps

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, ParseResult, TimeZone};
use std::fmt::Display;

// yyyy-MM-ddTHH:mm:ss±HH:MM, wall-clock time in the value's own offset
pub const W3C_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Formats `value` the way the booking server expects `from` / `until`.
///
/// The sign of the offset is always present, so UTC renders as `+00:00`.
pub fn to_w3c_string<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.format(W3C_FORMAT).to_string()
}

/// Parses a `startDateTime` sent by the server.
///
/// RFC 3339 is tried first; offsets without a colon (`+0100`) are accepted
/// as a fallback since older server versions emit them. A timestamp without
/// any offset is read as local time.
pub fn parse_timestamp(input: &str) -> ParseResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(input)
        .or_else(|_| DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|err| {
            let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")?;
            // local times skipped by a DST change keep the original error
            Local
                .from_local_datetime(&naive)
                .earliest()
                .map(DateTime::<FixedOffset>::from)
                .ok_or(err)
        })
}
