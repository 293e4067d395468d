//! Report generation for conformance results.

use serde::{Deserialize, Serialize};

use crate::verify::VerificationSummary;

/// A conformance report over one verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Modes exercised (e.g. "strict+soft").
    pub mode: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Mode: {}\n", self.mode));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n", self.summary.failed));
        out.push_str(&format!(
            "- Host mismatches: {}\n\n",
            self.summary.host_mismatches
        ));

        out.push_str("| Case | Section | Mode | Status | Host |\n");
        out.push_str("|------|---------|------|--------|------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            let host = match r.host_parity {
                Some(true) => "=",
                Some(false) => "≠",
                None => "-",
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                r.case_name, r.section, r.mode, status, host
            ));
        }

        let mut failures = self.summary.failures().peekable();
        if failures.peek().is_some() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {} ({})\n\n", r.case_name, r.mode));
                out.push_str("```\n");
                out.push_str(r.diff.as_deref().unwrap_or("(no diff)"));
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}
