//! Human-readable durations
//!
//! Values under a minute print as whole seconds ("45 seconds"). Longer values
//! break down into days, hours, minutes and seconds, skip zero components and
//! join the rest with " and " ("1 minute and 30 seconds").

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::DurationUnit;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

/// A duration split into whole components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DurationBreakdown {
    /// Whole days
    pub days: u64,
    /// Hours left after days
    pub hours: u64,
    /// Minutes left after hours
    pub minutes: u64,
    /// Seconds left after minutes
    pub seconds: u64,
}

impl DurationBreakdown {
    /// Break down a number of seconds, rounded to the nearest whole second
    ///
    /// Negative and non-finite inputs count as zero.
    pub fn from_seconds(seconds: f64) -> Self {
        let mut rest = whole_seconds(seconds);

        let days = rest / SECONDS_PER_DAY;
        rest %= SECONDS_PER_DAY;
        let hours = rest / SECONDS_PER_HOUR;
        rest %= SECONDS_PER_HOUR;
        let minutes = rest / SECONDS_PER_MINUTE;

        Self { days, hours, minutes, seconds: rest % SECONDS_PER_MINUTE }
    }

    /// Total whole seconds
    pub fn total_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }

    /// Non-zero components, largest first
    pub fn components(&self) -> Vec<(DurationUnit, u64)> {
        [
            (DurationUnit::Day, self.days),
            (DurationUnit::Hour, self.hours),
            (DurationUnit::Minute, self.minutes),
            (DurationUnit::Second, self.seconds),
        ]
        .into_iter()
        .filter(|&(_, value)| value > 0)
        .collect()
    }
}

impl fmt::Display for DurationBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .components()
            .into_iter()
            .map(|(unit, value)| format!("{} {}", value, unit.word(value)))
            .collect();

        if parts.is_empty() {
            write!(f, "0 {}", DurationUnit::Second.word(0))
        } else {
            f.write_str(&parts.join(" and "))
        }
    }
}

// Half a second rounds up
fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    }
}

/// Format a number of seconds for people
pub fn format_duration(seconds: f64) -> String {
    let clamped = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    if clamped < SECONDS_PER_MINUTE as f64 {
        let whole = whole_seconds(clamped);
        return format!("{} {}", whole, DurationUnit::Second.word(whole));
    }

    DurationBreakdown::from_seconds(clamped).to_string()
}
