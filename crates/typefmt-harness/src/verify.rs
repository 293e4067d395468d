//! Output comparison and verification.

use serde::{Deserialize, Serialize};

/// Result of verifying a single fixture case in one mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Name of the test case.
    pub case_name: String,
    pub section: String,
    /// `strict` or `soft`.
    pub mode: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Expected output, or `error:<Kind>` for expected failures.
    pub expected: String,
    /// Actual output from the engine.
    pub actual: String,
    /// Kind of the error the engine reported, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Whether the host C library rendered the same text. `None` when the
    /// host backend was not consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_parity: Option<bool>,
    /// Diff or notes if the case failed or diverged from the host.
    pub diff: Option<String>,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Total cases run.
    pub total: usize,
    /// Cases passed.
    pub passed: usize,
    /// Cases failed.
    pub failed: usize,
    /// Cases whose host rendering differed.
    pub host_mismatches: usize,
    /// Individual results.
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    /// Build a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let host_mismatches = results
            .iter()
            .filter(|r| r.host_parity == Some(false))
            .count();
        Self {
            total,
            passed,
            failed: total - passed,
            host_mismatches,
            results,
        }
    }

    /// Returns true if all cases passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &VerificationResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}
