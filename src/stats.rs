// Pure scoring functions.
//
// Everything here is recomputed from the session counters on every call so
// the numbers never drift from what was actually typed.

use serde::{Deserialize, Serialize};

/// Characters per "word" in the WPM formulas
pub const CHARS_PER_WORD: f64 = 5.0;

/// Counters needed to score a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub total_chars: u64,
    pub correct_chars: u64,
    pub errors: u64,
}

/// Words per minute over every keystroke, errors included
pub fn gross_wpm(total_chars: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (total_chars as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0)
}

/// Words per minute after subtracting one word per error, floored at zero
pub fn net_wpm(total_chars: u64, errors: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    let words = (total_chars as f64 / CHARS_PER_WORD) - errors as f64;
    (words / (elapsed_secs / 60.0)).max(0.0)
}

/// Rounded percentage of keystrokes that were correct; 100 before any input
pub fn accuracy_percent(correct_chars: u64, total_chars: u64) -> u32 {
    if total_chars == 0 {
        return 100;
    }
    let ratio = (correct_chars.min(total_chars) as f64 / total_chars as f64) * 100.0;
    ratio.round() as u32
}

/// What the typing screen shows while a session runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStats {
    pub wpm: u32,
    /// Accuracy formatted as a percentage, e.g. "97%"
    pub accuracy: String,
}

impl LiveStats {
    pub fn from_counters(counters: &Counters, elapsed_secs: f64) -> Self {
        Self {
            wpm: net_wpm(counters.total_chars, counters.errors, elapsed_secs).round() as u32,
            accuracy: format!(
                "{}%",
                accuracy_percent(counters.correct_chars, counters.total_chars)
            ),
        }
    }
}

/// Snapshot taken when a session finishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResults {
    pub wpm: u32,
    pub accuracy: u32,
    pub raw_chars: u64,
    pub errors: u64,
    pub gross_wpm: f64,
    pub elapsed_secs: f64,
    /// Standard deviation of the per-second WPM samples
    pub consistency: f64,
}

impl FinalResults {
    pub fn from_counters(counters: &Counters, elapsed_secs: f64, consistency: f64) -> Self {
        Self {
            wpm: net_wpm(counters.total_chars, counters.errors, elapsed_secs).round() as u32,
            accuracy: accuracy_percent(counters.correct_chars, counters.total_chars),
            raw_chars: counters.total_chars,
            errors: counters.errors,
            gross_wpm: gross_wpm(counters.total_chars, elapsed_secs),
            elapsed_secs,
            consistency,
        }
    }
}
