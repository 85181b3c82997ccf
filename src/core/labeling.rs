//! Threshold-based labeling of logged events.
//!
//! A pure, stateless mapping applied per record to a previously exported
//! event log. Each record is labeled independently from its `event_type`
//! and `interval` alone.

use serde::{Deserialize, Serialize};

/// Interval cutoffs for the labeling rules, in seconds.
///
/// Comparisons are strict-less-than with ascending cutoffs: a boundary value
/// falls into the next (slower) bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelThresholds {
    /// Keystroke intervals below this are High Speed.
    pub typing_fast: f64,
    /// Keystroke intervals below this (but not fast) are Medium Speed.
    pub typing_medium: f64,
    /// Move intervals below this are Active.
    pub move_active: f64,
    /// Move intervals below this (but not active) are Moderately Active.
    pub move_moderate: f64,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            typing_fast: 0.1,
            typing_medium: 0.5,
            move_active: 0.1,
            move_moderate: 1.0,
        }
    }
}

/// Typing-speed category for keystroke records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingLabel {
    HighSpeed,
    MediumSpeed,
    LowSpeed,
}

impl TypingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypingLabel::HighSpeed => "High Speed",
            TypingLabel::MediumSpeed => "Medium Speed",
            TypingLabel::LowSpeed => "Low Speed",
        }
    }
}

impl std::fmt::Display for TypingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer-behavior category for mouse records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorLabel {
    Active,
    ModeratelyActive,
    Inactive,
    Clicked,
}

impl BehaviorLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorLabel::Active => "Active",
            BehaviorLabel::ModeratelyActive => "Moderately Active",
            BehaviorLabel::Inactive => "Inactive",
            BehaviorLabel::Clicked => "Clicked",
        }
    }
}

impl std::fmt::Display for BehaviorLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label a single record from its event type and interval.
///
/// Unknown event types get no labels; that is not an error. A record with
/// no interval value falls through to the slowest bucket of its rule, which
/// is how rows with an empty interval cell have always classified.
pub fn label_record(
    event_type: &str,
    interval: Option<f64>,
    thresholds: &LabelThresholds,
) -> (Option<TypingLabel>, Option<BehaviorLabel>) {
    let interval = interval.unwrap_or(f64::INFINITY);

    match event_type {
        "keystroke" => {
            let label = if interval < thresholds.typing_fast {
                TypingLabel::HighSpeed
            } else if interval < thresholds.typing_medium {
                TypingLabel::MediumSpeed
            } else {
                TypingLabel::LowSpeed
            };
            (Some(label), None)
        }
        "mouse_move" => {
            let label = if interval < thresholds.move_active {
                BehaviorLabel::Active
            } else if interval < thresholds.move_moderate {
                BehaviorLabel::ModeratelyActive
            } else {
                BehaviorLabel::Inactive
            };
            (None, Some(label))
        }
        "mouse_click" => (None, Some(BehaviorLabel::Clicked)),
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(event_type: &str, interval: Option<f64>) -> (Option<TypingLabel>, Option<BehaviorLabel>) {
        label_record(event_type, interval, &LabelThresholds::default())
    }

    #[test]
    fn test_keystroke_buckets() {
        assert_eq!(label("keystroke", Some(0.0999)).0, Some(TypingLabel::HighSpeed));
        assert_eq!(label("keystroke", Some(0.3)).0, Some(TypingLabel::MediumSpeed));
        assert_eq!(label("keystroke", Some(0.5)).0, Some(TypingLabel::LowSpeed));
        assert_eq!(label("keystroke", Some(2.0)).0, Some(TypingLabel::LowSpeed));
    }

    #[test]
    fn test_boundary_falls_into_slower_bucket() {
        // 0.1 exactly is Medium, not High
        assert_eq!(label("keystroke", Some(0.1)).0, Some(TypingLabel::MediumSpeed));
        assert_eq!(label("mouse_move", Some(0.1)).1, Some(BehaviorLabel::ModeratelyActive));
        assert_eq!(label("mouse_move", Some(1.0)).1, Some(BehaviorLabel::Inactive));
    }

    #[test]
    fn test_mouse_move_buckets() {
        assert_eq!(label("mouse_move", Some(0.05)).1, Some(BehaviorLabel::Active));
        assert_eq!(label("mouse_move", Some(0.5)).1, Some(BehaviorLabel::ModeratelyActive));
        assert_eq!(label("mouse_move", Some(3.0)).1, Some(BehaviorLabel::Inactive));
    }

    #[test]
    fn test_click_always_clicked() {
        let (typing, behavior) = label("mouse_click", Some(5.0));
        assert_eq!(behavior, Some(BehaviorLabel::Clicked));
        assert_eq!(typing, None);
    }

    #[test]
    fn test_unknown_event_type_unlabeled() {
        assert_eq!(label("scroll", Some(0.05)), (None, None));
    }

    #[test]
    fn test_missing_interval_is_slowest_bucket() {
        assert_eq!(label("keystroke", None).0, Some(TypingLabel::LowSpeed));
        assert_eq!(label("mouse_move", None).1, Some(BehaviorLabel::Inactive));
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = LabelThresholds {
            typing_fast: 0.2,
            typing_medium: 1.0,
            move_active: 0.2,
            move_moderate: 2.0,
        };
        let (typing, _) = label_record("keystroke", Some(0.15), &thresholds);
        assert_eq!(typing, Some(TypingLabel::HighSpeed));
    }
}
