//! Conformance testing harness for typefmt.
//!
//! This crate provides:
//! - Fixtures: JSON cases of format string, typed arguments and expected text
//! - Runner: drives the strict and soft entry points over fixture sets
//! - Host parity: an optional render backend backed by the C library's `snprintf`
//! - Capture: regenerate expected outputs from a backend
//! - Report generation: human-readable + machine-readable conformance reports
//! - Structured logging: JSONL run logs and a SHA-256 artifact index

pub mod capture;
pub mod diff;
pub mod error;
pub mod fixtures;
#[cfg(feature = "host-libc")]
#[allow(unsafe_code)]
pub mod host;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{CaseMode, FixtureArg, FixtureCase, FixtureSet};
#[cfg(feature = "host-libc")]
pub use host::HostBackend;
pub use report::ConformanceReport;
pub use runner::{RunMode, TestRunner};
pub use verify::{VerificationResult, VerificationSummary};
