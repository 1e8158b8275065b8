//! # Engine Client
//!
//! Async HTTP client for the external diagnosis engine.
//!
//! Handles:
//! - the outbound `POST {base}/parse` and `POST {base}/diagnosis` calls
//! - `App-Id`/`App-Key`/`Model` authentication headers on every request
//! - the per-request timeout and error classification
//!
//! The client performs no retries and holds no state between calls; each
//! request either resolves within the configured timeout or fails with an
//! [`EngineError`] the caller converts at its own boundary.

#![warn(rust_2018_idioms)]

pub mod client;
pub mod config;
pub mod error;

pub use client::EngineClient;
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
