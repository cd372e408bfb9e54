//! Lightweight jitter for retry delays, seeded from the system clock

use std::time::{SystemTime, UNIX_EPOCH};

/// Pseudo-random value in `0..=max_jitter_ms`
pub fn generate_jitter_ms(max_jitter_ms: u64) -> u64 {
    if max_jitter_ms == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    (nanos % (max_jitter_ms as u128 + 1)) as u64
}

/// Pseudo-random value in `0..=base_value * jitter_percent / 100`
///
/// ```
/// use m3u_merge::utils::jitter::generate_jitter_percent;
///
/// assert!(generate_jitter_percent(1000, 25) <= 250);
/// ```
pub fn generate_jitter_percent(base_value: u64, jitter_percent: u8) -> u64 {
    if jitter_percent == 0 || base_value == 0 {
        return 0;
    }

    generate_jitter_ms(base_value.saturating_mul(jitter_percent as u64) / 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_jitter_ms_bounds() {
        assert_eq!(generate_jitter_ms(0), 0);
        for _ in 0..100 {
            assert!(generate_jitter_ms(50) <= 50);
        }
    }

    #[test]
    fn test_generate_jitter_percent_bounds() {
        assert_eq!(generate_jitter_percent(1000, 0), 0);
        assert_eq!(generate_jitter_percent(0, 25), 0);
        for _ in 0..100 {
            assert!(generate_jitter_percent(400, 25) <= 100);
        }
    }
}
