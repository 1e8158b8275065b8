//! Core runtime configuration.
//!
//! This module turns optional environment-variable values into a validated
//! [`TriagePolicy`]. The intent is to resolve configuration once at process
//! startup and pass it into services, instead of reading process-wide
//! environment variables during request handling.

use crate::constants::{
    HIGH_PROBABILITY_THRESHOLD, MIN_EVIDENCE_COUNT, SIGNIFICANT_PROBABILITY_THRESHOLD,
};
use crate::{TriageError, TriagePolicy, TriageResult};

/// Build a [`TriagePolicy`] from optional environment-variable values.
///
/// Empty or whitespace-only values fall back to the defaults, the same way
/// unset variables do.
///
/// # Errors
///
/// Returns [`TriageError::InvalidPolicy`] if a value does not parse or the
/// resulting thresholds are inconsistent.
pub fn policy_from_env_values(
    significant_threshold: Option<String>,
    high_threshold: Option<String>,
    min_evidence: Option<String>,
) -> TriageResult<TriagePolicy> {
    let significant = parse_f64(
        "significant threshold",
        significant_threshold,
        SIGNIFICANT_PROBABILITY_THRESHOLD,
    )?;
    let high = parse_f64("high threshold", high_threshold, HIGH_PROBABILITY_THRESHOLD)?;
    let min_evidence = parse_usize("minimum evidence count", min_evidence, MIN_EVIDENCE_COUNT)?;

    TriagePolicy::new(significant, high, min_evidence)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_f64(name: &str, value: Option<String>, default: f64) -> TriageResult<f64> {
    match non_empty(value) {
        Some(v) => v
            .parse::<f64>()
            .map_err(|e| TriageError::InvalidPolicy(format!("{name} '{v}' is not a number: {e}"))),
        None => Ok(default),
    }
}

fn parse_usize(name: &str, value: Option<String>, default: usize) -> TriageResult<usize> {
    match non_empty(value) {
        Some(v) => v.parse::<usize>().map_err(|e| {
            TriageError::InvalidPolicy(format!("{name} '{v}' is not a whole number: {e}"))
        }),
        None => Ok(default),
    }
}
