//! Song duration normalization.
//!
//! Upstream transcoders disagree on how to report duration: some send a
//! numeric second count (possibly fractional), others an "MM:SS" string.
//! Everything is normalized to whole seconds on write, and formatted back
//! to "MM:SS" only at the presentation edge.

use crate::catalog::RawDuration;
use crate::error::{MarketError, MarketResult};

impl RawDuration {
    /// Normalizes to canonical whole seconds.
    pub fn into_secs(self) -> MarketResult<u32> {
        match self {
            RawDuration::Seconds(secs) => from_float(secs),
            RawDuration::Text(text) => parse_flexible(&text),
        }
    }
}

fn from_float(secs: f64) -> MarketResult<u32> {
    if !secs.is_finite() || secs < 0.0 || secs > u32::MAX as f64 {
        return Err(MarketError::validation(format!(
            "duration out of range: {secs}"
        )));
    }
    Ok(secs.round() as u32)
}

/// Parses a duration string: either a plain second count ("245", "245.7")
/// or an "MM:SS" clock string ("4:05"). Minutes may exceed 59.
pub fn parse_flexible(raw: &str) -> MarketResult<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MarketError::validation("duration is empty"));
    }
    if let Some((minutes, seconds)) = trimmed.split_once(':') {
        let minutes: u32 = minutes
            .parse()
            .map_err(|_| malformed(raw))?;
        let seconds: u32 = seconds
            .parse()
            .map_err(|_| malformed(raw))?;
        if seconds > 59 {
            return Err(malformed(raw));
        }
        return minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| malformed(raw));
    }
    let secs: f64 = trimmed.parse().map_err(|_| malformed(raw))?;
    from_float(secs)
}

fn malformed(raw: &str) -> MarketError {
    MarketError::validation(format!("malformed duration: {raw:?}"))
}

/// Formats whole seconds as "MM:SS" with zero-padded seconds.
pub fn format_mm_ss(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
