//! Constants used throughout the triage core crate.
//!
//! This module names the thresholds and defaults of the triage policy so the
//! rest of the codebase never repeats a bare number.

use triage_types::Sex;

/// Minimum probability for a condition to count as significant.
pub const SIGNIFICANT_PROBABILITY_THRESHOLD: f64 = 0.5;

/// Probability at which confidence in the top condition is high and the
/// interview may stop.
pub const HIGH_PROBABILITY_THRESHOLD: f64 = 0.8;

/// Minimum number of evidence items before the interview may complete.
pub const MIN_EVIDENCE_COUNT: usize = 10;

/// Age assumed for free-text parsing when the caller omits it.
pub const DEFAULT_PATIENT_AGE: u32 = 30;

/// Sex assumed for free-text parsing when the caller omits it.
pub const DEFAULT_PATIENT_SEX: Sex = Sex::Male;

/// Status message while no condition is significant yet.
pub const GATHERING_MESSAGE: &str =
    "Gathering more information to determine the most likely condition...";
