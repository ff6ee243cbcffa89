//! # Duration Codec Module
//!
//! Parses the ISO-8601-like duration strings published by the nutrition source
//! (`PT1H30M`, `PT45M`, `PT2H`, ...) into whole minutes and readable labels.
//!
//! ## Features
//!
//! - Hour and minute components are both optional, hour before minute
//! - Malformed input is "no duration stated" and yields zero, never an error
//! - Total durations are bucketed into the three categories the search UI filters on

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref HOURS_REGEX: Regex =
        Regex::new(r"(?i)(\d+)H").expect("Hour component pattern should be valid");
    static ref MINUTES_REGEX: Regex =
        Regex::new(r"(?i)(\d+)M").expect("Minute component pattern should be valid");
}

/// Zero-length duration used when a cook time is not stated
pub const ZERO_DURATION: &str = "PT0M";

/// Duration bucket used by the search filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationCategory {
    #[serde(rename = "< 30min")]
    UnderHalfHour,
    #[serde(rename = "< 1h")]
    UnderHour,
    #[serde(rename = "> 1h")]
    OverHour,
}

impl DurationCategory {
    /// Label stored in the corpus `TotalTime_cat` column
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationCategory::UnderHalfHour => "< 30min",
            DurationCategory::UnderHour => "< 1h",
            DurationCategory::OverHour => "> 1h",
        }
    }

    /// Parse a stored label back into a category
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "< 30min" => Some(DurationCategory::UnderHalfHour),
            "< 1h" => Some(DurationCategory::UnderHour),
            "> 1h" => Some(DurationCategory::OverHour),
            _ => None,
        }
    }
}

impl fmt::Display for DurationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hour and minute components found in a duration string
fn components(duration: &str) -> (Option<u32>, Option<u32>) {
    let (hours, rest) = match HOURS_REGEX.captures(duration) {
        Some(caps) => {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (parse_component(caps.get(1).map(|m| m.as_str())), &duration[end..])
        }
        None => (None, duration),
    };
    let minutes = MINUTES_REGEX
        .captures(rest)
        .and_then(|caps| parse_component(caps.get(1).map(|m| m.as_str())));

    trace!("Parsed duration '{duration}' -> hours={hours:?} minutes={minutes:?}");
    (hours, minutes)
}

// Digit runs too long for u32 are treated as an absent component.
fn parse_component(digits: Option<&str>) -> Option<u32> {
    digits.and_then(|d| d.parse::<u32>().ok())
}

/// Convert a duration string to whole minutes
///
/// # Examples
///
/// ```rust
/// use recipe_corpus::duration::duration_to_minutes;
///
/// assert_eq!(duration_to_minutes("PT1H30M"), 90);
/// assert_eq!(duration_to_minutes("PT45M"), 45);
/// assert_eq!(duration_to_minutes(""), 0);
/// ```
pub fn duration_to_minutes(duration: &str) -> u32 {
    let (hours, minutes) = components(duration);
    hours
        .unwrap_or(0)
        .saturating_mul(60)
        .saturating_add(minutes.unwrap_or(0))
}

/// Render a duration string as `"<N> h <M> min"`, omitting absent components
///
/// ```rust
/// use recipe_corpus::duration::duration_to_readable;
///
/// assert_eq!(duration_to_readable("PT1H30M"), "1 h 30 min");
/// assert_eq!(duration_to_readable("PT2H"), "2 h");
/// assert_eq!(duration_to_readable("soon"), "");
/// ```
pub fn duration_to_readable(duration: &str) -> String {
    let (hours, minutes) = components(duration);
    let mut parts = Vec::with_capacity(2);
    if let Some(h) = hours {
        parts.push(format!("{h} h"));
    }
    if let Some(m) = minutes {
        parts.push(format!("{m} min"));
    }
    parts.join(" ")
}

/// Bucket a total duration; boundaries belong to the lower bucket
pub fn categorize_duration(total_minutes: u32) -> DurationCategory {
    if total_minutes <= 30 {
        DurationCategory::UnderHalfHour
    } else if total_minutes <= 60 {
        DurationCategory::UnderHour
    } else {
        DurationCategory::OverHour
    }
}
