//! Test execution engine.

use std::time::Instant;

use typefmt_core::{ArgValue, ErrorKind, NativeBackend, RenderBackend};

use crate::diff;
use crate::fixtures::{CaseMode, FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::VerificationResult;

/// Entry point a runner drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Strict,
    Soft,
}

impl RunMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Soft => "soft",
        }
    }

    fn accepts(self, case: CaseMode) -> bool {
        matches!(
            (self, case),
            (_, CaseMode::Both) | (Self::Strict, CaseMode::Strict) | (Self::Soft, CaseMode::Soft)
        )
    }
}

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    pub mode: RunMode,
    host: Option<Box<dyn RenderBackend>>,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: RunMode) -> Self {
        Self {
            campaign: campaign.into(),
            mode,
            host: None,
        }
    }

    /// Also render every case with `backend` and record whether it agrees
    /// with the native output. Disagreement is noted but does not fail the
    /// case.
    #[must_use]
    pub fn with_parity_backend(mut self, backend: impl RenderBackend + 'static) -> Self {
        self.host = Some(Box::new(backend));
        self
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        self.cases(fixture_set)
            .map(|case| self.execute(case))
            .collect()
    }

    /// [`TestRunner::run`], writing one log entry per case to `log`.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let mut results = Vec::new();
        for case in self.cases(fixture_set) {
            let started = Instant::now();
            let result = self.execute(case);
            let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

            let (level, event, outcome) = if result.passed {
                (LogLevel::Info, "case_pass", Outcome::Pass)
            } else {
                (LogLevel::Error, "case_fail", Outcome::Fail)
            };
            let mut entry = LogEntry::new("", level, event)
                .with_mode(self.mode.as_str())
                .with_case(&fixture_set.family, &case.name)
                .with_outcome(outcome)
                .with_latency_ns(latency_ns);
            if let Some(kind) = &result.error_kind {
                entry = entry.with_error_kind(kind.clone());
            }
            if !result.passed || result.host_parity == Some(false) {
                entry = entry.with_details(serde_json::json!({
                    "format": case.format,
                    "expected": result.expected,
                    "actual": result.actual,
                    "host_parity": result.host_parity,
                }));
            }
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }

    fn cases<'s>(&self, fixture_set: &'s FixtureSet) -> impl Iterator<Item = &'s FixtureCase> {
        let mode = self.mode;
        fixture_set
            .cases
            .iter()
            .filter(move |case| mode.accepts(case.mode))
    }

    fn execute(&self, case: &FixtureCase) -> VerificationResult {
        let mut result = VerificationResult {
            case_name: case.name.clone(),
            section: case.section.clone(),
            mode: self.mode.as_str().to_string(),
            passed: false,
            expected: expected_text(case),
            actual: String::new(),
            error_kind: None,
            host_parity: None,
            diff: None,
        };

        let args = match case.arg_values() {
            Ok(args) => args,
            Err(err) => {
                result.actual = format!("fixture error: {err}");
                result.diff = Some(result.actual.clone());
                return result;
            }
        };

        let (actual, error_kind) = match self.mode {
            RunMode::Strict => run_strict(&NativeBackend, &case.format, &args),
            RunMode::Soft => run_soft(&case.format, &args),
        };
        result.passed = match (&case.expected_error, error_kind) {
            (Some(expected), Some(kind)) => expected == kind.as_str(),
            (None, None) => actual == case.expected_output,
            _ => false,
        };
        result.actual = actual;
        result.error_kind = error_kind.map(|kind| kind.as_str().to_string());

        let mut notes = Vec::new();
        if let Some(host) = &self.host {
            let (host_actual, host_kind) = run_strict(host.as_ref(), &case.format, &args);
            // Engine-level errors are decided before the backend runs, so only
            // successful renders are comparable.
            if error_kind.is_none() && self.mode == RunMode::Strict {
                let agrees = host_kind.is_none() && host_actual == result.actual;
                result.host_parity = Some(agrees);
                if !agrees {
                    notes.push(format!(
                        "host parity mismatch: host={host_actual:?}, impl={:?}",
                        result.actual
                    ));
                }
            }
        }

        if !result.passed {
            result.diff = Some(diff::render_diff(&result.expected, &result.actual));
        } else if !notes.is_empty() {
            result.diff = Some(notes.join("\n"));
        }
        result
    }
}

/// What a case should produce in the report: the output, or `error:<Kind>`.
fn expected_text(case: &FixtureCase) -> String {
    match &case.expected_error {
        Some(kind) => format!("error:{kind}"),
        None => case.expected_output.clone(),
    }
}

fn run_strict<B: RenderBackend + ?Sized>(
    backend: &B,
    format: &str,
    args: &[ArgValue<'_>],
) -> (String, Option<ErrorKind>) {
    match typefmt_core::format_strict_with(backend, format, args) {
        Ok(out) => (out, None),
        Err(err) => (format!("error:{}", err.kind()), Some(err.kind())),
    }
}

/// The soft entry point never fails; a diagnostic is recognized by its
/// prefix and its kind read back from it.
fn run_soft(format: &str, args: &[ArgValue<'_>]) -> (String, Option<ErrorKind>) {
    let out = typefmt_core::format(format, args);
    let kind = out
        .strip_prefix("<formatting error> ")
        .and_then(|rest| rest.split_once(':'))
        .and_then(|(name, _)| ErrorKind::from_name(name));
    match kind {
        Some(kind) => (format!("error:{kind}"), Some(kind)),
        None => (out, None),
    }
}
