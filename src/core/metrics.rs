//! Summary metrics derived from a finished capture window.
//!
//! Metrics are computed once, in a batch, when the session finishes; nothing
//! here updates incrementally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-key occurrence counts for one capture window.
pub type KeyCount = BTreeMap<String, u64>;

/// Aggregate statistics for one capture window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub total_keystrokes: u64,
    /// Keystrokes per minute over the configured window duration.
    pub typing_speed_kpm: f64,
    /// Words per minute, assuming 5 characters per word.
    pub typing_speed_wpm: f64,
    /// Mean of keystroke-to-keystroke intervals, seconds.
    pub avg_keypress_interval: f64,
    /// Mean of click-to-click intervals, seconds.
    pub avg_click_interval: f64,
    pub key_counts: KeyCount,
}

/// Compute metrics from the accumulated counters of a capture window.
///
/// A non-positive duration or an empty interval sample yields zeros rather
/// than NaN or an error.
pub fn summarize(
    total_keystrokes: u64,
    duration_secs: f64,
    key_intervals: &[f64],
    click_intervals: &[f64],
    key_counts: KeyCount,
) -> SessionMetrics {
    let typing_speed_kpm = if duration_secs > 0.0 {
        (total_keystrokes as f64 / duration_secs) * 60.0
    } else {
        0.0
    };

    SessionMetrics {
        total_keystrokes,
        typing_speed_kpm,
        typing_speed_wpm: typing_speed_kpm / 5.0,
        avg_keypress_interval: mean(key_intervals),
        avg_click_interval: mean(click_intervals),
        key_counts,
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_speed_formulas() {
        let metrics = summarize(30, 60.0, &[], &[], KeyCount::new());
        assert_eq!(metrics.typing_speed_kpm, 30.0);
        assert_eq!(metrics.typing_speed_wpm, 6.0);

        let metrics = summarize(12, 3.0, &[], &[], KeyCount::new());
        assert_eq!(metrics.typing_speed_kpm, 240.0);
        assert_eq!(metrics.typing_speed_wpm, 48.0);
    }

    #[test]
    fn test_zero_keystrokes() {
        let metrics = summarize(0, 3.0, &[], &[], KeyCount::new());
        assert_eq!(metrics.typing_speed_kpm, 0.0);
        assert_eq!(metrics.typing_speed_wpm, 0.0);
    }

    #[test]
    fn test_empty_samples_average_to_zero() {
        let metrics = summarize(5, 3.0, &[], &[], KeyCount::new());
        assert_eq!(metrics.avg_keypress_interval, 0.0);
        assert_eq!(metrics.avg_click_interval, 0.0);
    }

    #[test]
    fn test_interval_means() {
        let metrics = summarize(3, 3.0, &[0.1, 0.2, 0.3], &[1.0, 2.0], KeyCount::new());
        assert!((metrics.avg_keypress_interval - 0.2).abs() < 1e-9);
        assert!((metrics.avg_click_interval - 1.5).abs() < 1e-9);
    }
}
