//! Printing run times and photon arrival times

use std::fmt;
use std::time::Duration;

/// Wall-clock duration, printed as `[d] hh:mm:ss`
pub struct PrettyDuration {
    pub duration: Duration,
}

impl From<Duration> for PrettyDuration {
    fn from(duration: Duration) -> PrettyDuration {
        PrettyDuration {duration}
    }
}

impl fmt::Display for PrettyDuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let secs = self.duration.as_secs();
        let (days, secs) = (secs / 86_400, secs % 86_400);
        let (hr, min, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
        if days > 0 {
            write!(f, "{}d {:02}:{:02}:{:02}", days, hr, min, s)
        } else {
            write!(f, "{:02}:{:02}:{:02}", hr, min, s)
        }
    }
}

/// A time interval in seconds, printed with the largest SI prefix
/// (between pico and unity) that keeps the mantissa at least one
pub struct ArrivalTime(pub f64);

impl fmt::Display for ArrivalTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const PREFIXES: [(&str, f64); 5] = [
            (" s", 1.0),
            ("ms", 1.0e-3),
            ("\u{03bc}s", 1.0e-6),
            ("ns", 1.0e-9),
            ("ps", 1.0e-12),
        ];

        let t = self.0.abs();
        let (unit, scale) = PREFIXES.iter()
            .find(|(_, scale)| t >= *scale)
            .copied()
            .unwrap_or(PREFIXES[PREFIXES.len() - 1]);

        // an empty sample has zero mean and spread
        let (unit, scale) = if t == 0.0 {PREFIXES[0]} else {(unit, scale)};

        write!(f, "{: >8.2} {}", self.0 / scale, unit)
    }
}
