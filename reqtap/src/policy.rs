//! Lifetime policy for the opt-in cache header.
//!
//! Header values are whole minutes. The parser itself performs no unit
//! conversion; turning minutes into a storage TTL is the cache stage's job.

use tracing::warn;

/// Fallback lifetime in minutes when the opt-in header value does not parse.
pub const DEFAULT_TTL_MINUTES: u64 = 60;

/// Parse an opt-in header value into a lifetime in minutes.
///
/// Unparsable input (non-numeric, negative, empty) falls back to
/// `default_minutes` with a warning; parsing never fails the request.
pub fn parse_lifetime(raw: &str, default_minutes: u64) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(minutes) => minutes,
        Err(_) => {
            warn!(
                value = raw,
                default = default_minutes,
                "cache header with unparsable lifetime, using default"
            );
            default_minutes
        }
    }
}
