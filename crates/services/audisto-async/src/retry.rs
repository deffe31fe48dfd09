use backon::ExponentialBuilder;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

/// Longest single pause between two attempts
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Creates the exponential backoff builder for Audisto API requests
///
/// The first retry waits `factor` seconds and every following retry doubles the
/// previous delay, capped at [`MAX_BACKOFF`]. At most `max_retries` retries are
/// made after the initial request. No jitter is applied.
#[must_use]
pub fn backoff_builder(max_retries: usize, factor: f64) -> ExponentialBuilder {
    let min_delay = Duration::try_from_secs_f64(factor.max(0.0)).unwrap_or(MAX_BACKOFF);
    ExponentialBuilder::default()
        .with_min_delay(min_delay.min(MAX_BACKOFF))
        .with_max_delay(MAX_BACKOFF)
        .with_max_times(max_retries)
        .with_factor(2.0)
}

/// Determines if an HTTP status code should trigger a retry
///
/// Retries on: 429, 500, 502, 503, 504
#[must_use]
pub const fn is_retryable_status(code: u16) -> bool {
    matches!(code, 429 | 500 | 502 | 503 | 504)
}

/// Parses a delta-seconds `Retry-After` header, capped at [`MAX_BACKOFF`]
///
/// Returns `None` if the header is missing or not a number of seconds.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .map(|d| d.min(MAX_BACKOFF))
}

/// Picks the pause before the next attempt
///
/// The server's requested delay wins when it is longer than the backoff
/// delay. `None` means the backoff policy has no retries left and stays `None`.
#[must_use]
pub fn next_delay(backoff: Option<Duration>, retry_after: Option<Duration>) -> Option<Duration> {
    backoff.map(|d| retry_after.map_or(d, |ra| ra.max(d)).min(MAX_BACKOFF))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_matrix() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(502));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(504));
        assert!(!is_retryable_status(501));
        assert!(!is_retryable_status(408));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(401));
        assert!(!is_retryable_status(403));
        assert!(!is_retryable_status(200));
    }

    #[test]
    fn backoff_doubles_from_factor() {
        use backon::BackoffBuilder;

        let delays: Vec<Duration> = backoff_builder(3, 0.5).build().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
            ]
        );
    }

    #[test]
    fn zero_retries_yields_no_delays() {
        use backon::BackoffBuilder;

        assert_eq!(backoff_builder(0, 0.5).build().count(), 0);
    }

    #[test]
    fn retry_after_seconds() {
        let mut h = HeaderMap::new();
        h.insert(RETRY_AFTER, "2".parse().unwrap());
        assert_eq!(parse_retry_after(&h), Some(Duration::from_secs(2)));

        h.insert(RETRY_AFTER, "900".parse().unwrap());
        assert_eq!(parse_retry_after(&h), Some(MAX_BACKOFF));
    }

    #[test]
    fn retry_after_ignores_dates_and_garbage() {
        let mut h = HeaderMap::new();
        assert_eq!(parse_retry_after(&h), None);

        h.insert(RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(parse_retry_after(&h), None);

        h.insert(RETRY_AFTER, "-3".parse().unwrap());
        assert_eq!(parse_retry_after(&h), None);
    }

    #[test]
    fn next_delay_prefers_longer_wait() {
        let half = Duration::from_millis(500);
        let two = Duration::from_secs(2);
        assert_eq!(next_delay(Some(half), Some(two)), Some(two));
        assert_eq!(next_delay(Some(two), Some(half)), Some(two));
        assert_eq!(next_delay(Some(half), None), Some(half));
        assert_eq!(next_delay(None, Some(two)), None);
    }
}
