//! CF-convention time decoding (`<unit> since <reference>`).

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use super::{DapError, Result};

const REFERENCE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Formats a timestamp the way string-typed time coordinates are written.
pub fn format_timestamp(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parses CF time units into seconds-per-unit and the reference instant.
pub fn parse_units(units: &str) -> Result<(f64, NaiveDateTime)> {
    let lower = units.trim().to_ascii_lowercase();
    let (unit, reference) = lower
        .split_once(" since ")
        .ok_or_else(|| DapError::TimeUnits(units.to_string()))?;

    let seconds = match unit.trim() {
        "second" | "seconds" | "sec" | "secs" | "s" => 1.0,
        "minute" | "minutes" | "min" | "mins" => 60.0,
        "hour" | "hours" | "hr" | "hrs" | "h" => 3_600.0,
        "day" | "days" | "d" => 86_400.0,
        _ => return Err(DapError::TimeUnits(units.to_string())),
    };

    let reference =
        parse_reference(reference).ok_or_else(|| DapError::TimeUnits(units.to_string()))?;

    Ok((seconds, reference))
}

fn parse_reference(reference: &str) -> Option<NaiveDateTime> {
    let cleaned = reference
        .trim()
        .trim_end_matches("utc")
        .trim_end_matches('z')
        .trim_end_matches("+00:00")
        .trim()
        .replace('t', " ");

    for format in REFERENCE_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(&cleaned, format) {
            return Some(datetime);
        }
    }

    NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Decodes numeric time values into ISO-8601 UTC timestamp strings.
pub fn decode_times(values: &[f64], units: &str) -> Result<Vec<String>> {
    let (seconds_per_unit, reference) = parse_units(units)?;

    values
        .iter()
        .map(|&value| {
            let millis = (value * seconds_per_unit * 1_000.0).round();
            TimeDelta::try_milliseconds(millis as i64)
                .filter(|_| millis.is_finite())
                .and_then(|offset| reference.checked_add_signed(offset))
                .map(format_timestamp)
                .ok_or_else(|| DapError::Decode(format!("time value {} is out of range", value)))
        })
        .collect()
}

// -- Tests -------------------------------------------------------------------
