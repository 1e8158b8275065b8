//! # Triage Core
//!
//! Core decision logic for the triage proxy.
//!
//! This crate contains the pure rules applied on top of raw diagnosis-engine
//! responses:
//! - the triage policy (significance filtering, stop criteria, confidence
//!   levels and status messages), and
//! - the follow-up question normaliser (archetype classification and
//!   canonical answer substitution).
//!
//! Everything here is a pure function over values: no I/O, no shared state,
//! no knowledge of HTTP. Thresholds are injected through [`TriagePolicy`]
//! rather than read from ambient globals, so tests can substitute them.
//!
//! **No API concerns**: HTTP servers and engine transport belong in
//! `api-rest` and `engine-client`.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod constants;
pub mod error;
pub mod policy;
pub mod question;

pub use config::policy_from_env_values;
pub use error::{TriageError, TriageResult};
pub use policy::{TriageAssessment, TriagePolicy};
pub use question::QuestionType;
