//! # Triage Types
//!
//! Shared wire vocabulary for the triage proxy.
//!
//! This crate defines the request/response shapes used by both sides of the
//! proxy:
//! - the diagnosis-engine protocol (`ParseRequest`, `DiagnosisRequest` and
//!   their responses, plus `Mention`, `Condition` and `Question`), and
//! - the inbound REST API (`ParseReq`, `DiagnosisReq`, `DiagnosisRes`,
//!   `HealthRes`, `ErrorRes`) together with the triage-status types the core
//!   computes (`DiagnosisStatus`, `ConfidenceLevel`, `InterviewStatus`).
//!
//! Engine responses keep any field this crate does not model in a flattened
//! `serde_json::Map`, so the proxy can return the engine's original payload
//! merged with its own enrichment without losing data.
//!
//! **No logic**: decision rules live in `triage-core`, transport in
//! `engine-client`, HTTP concerns in `api-rest`.

#![warn(rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

// ============================================================================
// Patient demographics
// ============================================================================

/// Biological sex as the diagnosis engine expects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Patient age in the engine's wire shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Age {
    pub value: u32,
}

// ============================================================================
// Evidence
// ============================================================================

/// How a piece of evidence entered the interview.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceSource {
    /// Found by free-text symptom parsing.
    Initial,
    /// Answer to a follow-up question.
    Suggest,
}

/// One fact established during the interview.
///
/// `choice_id` stays a plain string: it carries either one of the binary
/// answers (`present`/`absent`/`unknown`) or a canonical choice id such as
/// `less_than_30m`. The caller accumulates these across turns and sends the
/// full list on every request; the proxy never stores them.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct EvidenceItem {
    pub id: String,
    pub choice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EvidenceSource>,
}

// ============================================================================
// Engine response entities
// ============================================================================

/// A symptom mention detected by the engine's free-text parser.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct Mention {
    pub id: String,
    #[serde(default)]
    pub common_name: String,
    /// Engine fields this crate does not model (`name`, `orth`, …).
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// A candidate condition ranked by the diagnosis engine.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct Condition {
    pub id: String,
    #[serde(default)]
    pub common_name: String,
    /// Probability in `[0, 1]`.
    pub probability: f64,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// One selectable answer of a follow-up question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct QuestionChoice {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// One item of a follow-up question. Exactly one item is used by this system;
/// the engine schema's multi-item capability is passed through untouched.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct QuestionItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub choices: Vec<QuestionChoice>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// A follow-up question returned by the diagnosis engine.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct Question {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub items: Vec<QuestionItem>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Engine protocol (outbound)
// ============================================================================

/// Body of the outbound `POST {base}/parse` call.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParseRequest {
    /// Free-text symptom description. Absent text is forwarded as absent;
    /// the engine decides whether to reject it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub age: Age,
    pub sex: Sex,
    pub include_tokens: bool,
    pub correct_spelling: bool,
}

/// Engine parse response, returned to the caller unmodified.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ParseResponse {
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Extras accepted by the engine's diagnosis endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiagnosisExtras {
    /// Flattens grouped conditions in the engine response.
    pub disable_groups: bool,
}

/// Body of the outbound `POST {base}/diagnosis` call.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DiagnosisRequest {
    pub sex: Sex,
    pub age: Age,
    pub evidence: Vec<EvidenceItem>,
    pub extras: DiagnosisExtras,
}

/// Raw engine diagnosis response.
///
/// `should_stop` is the engine's own stop hint; it is captured here so the
/// enriched response can replace it with the local triage decision without
/// the key appearing twice in the merged payload.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DiagnosisResponse {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub question: Option<Question>,
    #[serde(default)]
    pub should_stop: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Triage status
// ============================================================================

/// Whether the interview should continue gathering evidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Complete,
}

/// Confidence derived from the top-ranked condition's probability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Human-readable triage summary attached to every diagnosis response.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct DiagnosisStatus {
    pub status: InterviewStatus,
    pub confidence_level: ConfidenceLevel,
    pub message: String,
    /// Top condition probability; absent when no condition is significant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

// ============================================================================
// Inbound REST API
// ============================================================================

/// Body of the inbound `POST /parse` request.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ParseReq {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub age: Option<Age>,
    #[serde(default)]
    pub sex: Option<Sex>,
}

/// Body of the inbound `POST /diagnosis` request.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct DiagnosisReq {
    pub sex: Sex,
    pub age: Age,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    /// Session-correlation token from the engine; forwarded as the
    /// `Interview-Id` header on the outbound call when present.
    #[serde(default)]
    pub interview_token: Option<String>,
}

/// Enriched diagnosis response: the engine payload merged with the local
/// triage decision.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct DiagnosisRes {
    /// Significant conditions only, sorted descending by probability.
    pub conditions: Vec<Condition>,
    /// Follow-up question with canonical answer choices, when the engine
    /// returned one.
    pub question: Option<Question>,
    pub should_stop: bool,
    pub evidence_count: usize,
    pub diagnosis_status: DiagnosisStatus,
    /// Remainder of the engine payload, passed through untouched.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Structured error body for failed requests.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    /// Upstream error detail when available, otherwise the local error
    /// message.
    #[schema(value_type = Object)]
    pub details: Value,
}
