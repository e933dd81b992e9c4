//! Backoff calculations for retries

use super::config::RetryConfig;
use std::time::Duration;

/// Calculate exponential backoff delay with jitter
///
/// `attempt` is 1-based: the first retry waits roughly `initial_delay`.
#[must_use]
pub fn calculate_backoff_delay(retry_config: &RetryConfig, attempt: u32) -> Duration {
    let base_delay = {
        // Precision loss acceptable for backoff calculations
        #[allow(clippy::cast_precision_loss)]
        {
            retry_config
                .initial_delay
                .as_millis()
                .min(u128::from(u64::MAX)) as f64
        }
    };
    let multiplier = retry_config.backoff_multiplier;
    let max_delay = {
        #[allow(clippy::cast_precision_loss)]
        {
            retry_config.max_delay.as_millis().min(u128::from(u64::MAX)) as f64
        }
    };

    let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
    let delay = (base_delay * multiplier.powi(exponent)).min(max_delay);

    // Add jitter
    let jitter = delay * retry_config.jitter_factor * (rand::random::<f64>() - 0.5);
    let final_delay = {
        // Safe cast: max(0.0) ensures non-negative, round() handles fractional part
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (delay + jitter).max(0.0).round() as u64
        }
    };

    Duration::from_millis(final_delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let config = RetryConfig {
            jitter_factor: 0.0,
            ..RetryConfig::default()
        };
        assert_eq!(calculate_backoff_delay(&config, 1), Duration::from_millis(500));
        assert_eq!(calculate_backoff_delay(&config, 2), Duration::from_millis(1000));
        assert_eq!(calculate_backoff_delay(&config, 3), Duration::from_millis(2000));
        assert_eq!(calculate_backoff_delay(&config, 20), config.max_delay);
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let config = RetryConfig::default();
        for _ in 0..100 {
            let delay = calculate_backoff_delay(&config, 1).as_millis();
            assert!((475..=525).contains(&delay), "delay {delay} outside jitter band");
        }
    }
}
