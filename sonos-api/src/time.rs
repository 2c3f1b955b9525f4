//! `H:MM:SS` durations as used by AVTransport
//!
//! Players report positions and lengths as `H:MM:SS` (sometimes with a
//! fractional part) and use `NOT_IMPLEMENTED` or an empty string when a value
//! does not apply, e.g. for radio streams.

use std::time::Duration;

/// Parse an AVTransport time string; `None` when the value is absent or not a time
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let mut parts = raw.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds_part = parts.next()?;
    if parts.next().is_some() || minutes >= 60 {
        return None;
    }

    let (whole, fraction) = match seconds_part.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (seconds_part, None),
    };
    let seconds: u64 = whole.parse().ok()?;
    if seconds >= 60 {
        return None;
    }

    let millis = match fraction {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            let padded = format!("{:0<3}", &digits[..digits.len().min(3)]);
            padded.parse::<u64>().ok()?
        }
        Some(_) => return None,
        None => 0,
    };

    // Absurd hour counts from a misbehaving player are not a time
    let total_millis = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?
        .checked_mul(1000)?
        .checked_add(millis)?;
    Some(Duration::from_millis(total_millis))
}

/// Format a duration as `H:MM:SS`, truncating sub-second precision
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}
