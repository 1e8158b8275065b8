//! Triage policy: the local rules applied on top of raw engine responses.
//!
//! The diagnosis engine returns a ranked list of candidate conditions; this
//! module decides which of them matter, whether enough evidence and
//! confidence exist to stop asking questions, and how to summarise the state
//! of the interview for the caller.
//!
//! Thresholds are carried by [`TriagePolicy`] values constructed once at
//! startup and passed into every operation, so tests can substitute them.

use std::cmp::Ordering;

use triage_types::{Condition, ConfidenceLevel, DiagnosisStatus, InterviewStatus};

use crate::constants::{
    GATHERING_MESSAGE, HIGH_PROBABILITY_THRESHOLD, MIN_EVIDENCE_COUNT,
    SIGNIFICANT_PROBABILITY_THRESHOLD,
};
use crate::{TriageError, TriageResult};

/// Thresholds governing the triage decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriagePolicy {
    /// Minimum probability for a condition to count as significant.
    pub significant_threshold: f64,
    /// Probability at which confidence is high and the interview may stop.
    pub high_threshold: f64,
    /// Minimum number of evidence items before the interview may complete.
    pub min_evidence: usize,
}

/// Result of applying the triage policy to one engine response.
#[derive(Clone, Debug, PartialEq)]
pub struct TriageAssessment {
    /// Significant conditions only, sorted descending by probability.
    pub conditions: Vec<Condition>,
    /// Whether the interview has gathered enough evidence and confidence.
    pub should_stop: bool,
    /// Human-readable summary of the interview state.
    pub status: DiagnosisStatus,
}

impl Default for TriagePolicy {
    fn default() -> Self {
        Self {
            significant_threshold: SIGNIFICANT_PROBABILITY_THRESHOLD,
            high_threshold: HIGH_PROBABILITY_THRESHOLD,
            min_evidence: MIN_EVIDENCE_COUNT,
        }
    }
}

impl TriagePolicy {
    /// Create a new `TriagePolicy`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidPolicy`] if either threshold falls
    /// outside `[0, 1]` or the high threshold is below the significant one.
    pub fn new(
        significant_threshold: f64,
        high_threshold: f64,
        min_evidence: usize,
    ) -> TriageResult<Self> {
        if !(0.0..=1.0).contains(&significant_threshold) {
            return Err(TriageError::InvalidPolicy(format!(
                "significant threshold {significant_threshold} is outside [0, 1]"
            )));
        }
        if !(0.0..=1.0).contains(&high_threshold) {
            return Err(TriageError::InvalidPolicy(format!(
                "high threshold {high_threshold} is outside [0, 1]"
            )));
        }
        if high_threshold < significant_threshold {
            return Err(TriageError::InvalidPolicy(format!(
                "high threshold {high_threshold} is below significant threshold {significant_threshold}"
            )));
        }

        Ok(Self {
            significant_threshold,
            high_threshold,
            min_evidence,
        })
    }

    /// Filter a raw condition list down to the significant entries, sorted
    /// descending by probability.
    pub fn significant_conditions(&self, conditions: &[Condition]) -> Vec<Condition> {
        let mut significant: Vec<Condition> = conditions
            .iter()
            .filter(|c| c.probability >= self.significant_threshold)
            .cloned()
            .collect();
        significant.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
        significant
    }

    /// Decide whether the interview should stop.
    ///
    /// True only once at least `min_evidence` items have been supplied and
    /// some significant condition reaches the high threshold. An empty
    /// significant list never stops the interview.
    pub fn should_stop(&self, significant: &[Condition], evidence_count: usize) -> bool {
        if evidence_count < self.min_evidence {
            return false;
        }
        significant
            .iter()
            .any(|c| c.probability >= self.high_threshold)
    }

    /// Derive the confidence level from the top condition's probability.
    pub fn confidence_level(&self, top_probability: Option<f64>) -> ConfidenceLevel {
        match top_probability {
            Some(p) if p >= self.high_threshold => ConfidenceLevel::High,
            Some(p) if p >= self.significant_threshold => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }

    /// Summarise the interview state for the caller.
    ///
    /// `significant` must already be filtered and sorted (see
    /// [`TriagePolicy::significant_conditions`]); the first entry is the top
    /// condition. When no condition is significant the summary reports low
    /// confidence, a generic gathering message, and no probability.
    pub fn status(&self, significant: &[Condition], evidence_count: usize) -> DiagnosisStatus {
        let should_stop = self.should_stop(significant, evidence_count);
        let top = significant.first();

        DiagnosisStatus {
            status: if should_stop {
                InterviewStatus::Complete
            } else {
                InterviewStatus::InProgress
            },
            confidence_level: self.confidence_level(top.map(|c| c.probability)),
            message: match top {
                Some(c) => format!(
                    "Most likely condition: {} ({:.1}%)",
                    c.common_name,
                    c.probability * 100.0
                ),
                None => GATHERING_MESSAGE.to_string(),
            },
            probability: top.map(|c| c.probability),
        }
    }

    /// Apply the full policy to one engine response.
    pub fn assess(&self, conditions: &[Condition], evidence_count: usize) -> TriageAssessment {
        let significant = self.significant_conditions(conditions);
        let should_stop = self.should_stop(&significant, evidence_count);
        let status = self.status(&significant, evidence_count);

        TriageAssessment {
            conditions: significant,
            should_stop,
            status,
        }
    }
}
