//! Conversions from TNEF wire representations to Rust values.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use encoding_rs::{Encoding, UTF_16LE, WINDOWS_1252};


/// Offset between 1601-01-01 and 1970-01-01 in 100-nanosecond ticks.
const FILETIME_UNIX_EPOCH: i64 = 116_444_736_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// OLE Automation dates must lie strictly between these (0100-01-01 and 10000-01-01).
const OA_DATE_MIN: f64 = -657_435.0;
const OA_DATE_MAX: f64 = 2_958_466.0;

pub const DEFAULT_CODEPAGE: u16 = 1252;


/// Looks up the encoding of a Windows codepage.
pub fn encoding_for_codepage(codepage: u16) -> Option<&'static Encoding> {
    codepage::to_encoding(codepage)
}

/// Converts a FILETIME (100-nanosecond ticks since 1601-01-01 UTC).
pub fn filetime_to_datetime(ticks: i64) -> Option<DateTime<Utc>> {
    let unix_ticks = ticks.checked_sub(FILETIME_UNIX_EPOCH)?;
    let seconds = unix_ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(seconds, nanos)
}

pub fn datetime_to_filetime(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp() * TICKS_PER_SECOND
        + i64::from(datetime.timestamp_subsec_nanos() / 100)
        + FILETIME_UNIX_EPOCH
}

/// Converts an OLE Automation date (days since 1899-12-30, fraction is the time of day).
pub fn oa_date_to_datetime(value: f64) -> Option<DateTime<Utc>> {
    if !(value > OA_DATE_MIN && value < OA_DATE_MAX) {
        return None;
    }

    let mut millis = (value * MILLIS_PER_DAY as f64 + if value >= 0.0 { 0.5 } else { -0.5 }) as i64;
    if millis < 0 {
        // the day part counts backwards, the time of day still counts forward
        millis -= (millis % MILLIS_PER_DAY) * 2;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let naive = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Converts a legacy attribute date: year, month, day, hour, minute, second, day of week.
///
/// The day of week is redundant and ignored.
pub fn attribute_date_to_datetime(words: &[u16; 7]) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(i32::from(words[0]), u32::from(words[1]), u32::from(words[2]))?;
    let naive = date.and_hms_opt(u32::from(words[3]), u32::from(words[4]), u32::from(words[5]))?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Decodes an 8-bit string, falling back to Windows-1252 if it is not valid in `encoding`.
pub fn decode_string8(bytes: &[u8], encoding: &'static Encoding) -> String {
    let trimmed = trim_trailing(bytes, 1);
    if let Some(decoded) = encoding.decode_without_bom_handling_and_without_replacement(trimmed) {
        return decoded.into_owned();
    }
    let (decoded, _had_errors) = WINDOWS_1252.decode_without_bom_handling(trimmed);
    decoded.into_owned()
}

/// Decodes a UTF-16LE string, dropping trailing NUL characters.
pub fn decode_unicode(bytes: &[u8]) -> String {
    let even = &bytes[..bytes.len() - bytes.len() % 2];
    let trimmed = trim_trailing(even, 2);
    let (decoded, _had_errors) = UTF_16LE.decode_without_bom_handling(trimmed);
    decoded.into_owned()
}

/// Removes trailing all-zero units of `unit` bytes.
fn trim_trailing(mut bytes: &[u8], unit: usize) -> &[u8] {
    while bytes.len() >= unit && bytes[bytes.len() - unit..].iter().all(|&b| b == 0) {
        bytes = &bytes[..bytes.len() - unit];
    }
    bytes
}

/// Rounds a length up to the next multiple of 4.
pub fn pad_to_4(length: u64) -> u64 {
    (length + 3) & !3
}
