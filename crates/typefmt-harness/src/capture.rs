//! Fixture capture.
//!
//! Re-renders every case of a fixture set through a backend (normally the
//! host C library) and records the result as the expected output.

use typefmt_core::{RenderBackend, format_strict_with};

use crate::error::HarnessError;
use crate::fixtures::FixtureSet;
use crate::structured_log::now_utc;

/// Rewrite `expected_output` / `expected_error` of every case from `backend`.
///
/// Cases whose arguments cannot be decoded are an error; the set is left
/// untouched in that case.
pub fn capture_fixture_set<B: RenderBackend>(
    set: &FixtureSet,
    backend: B,
) -> Result<FixtureSet, HarnessError> {
    let mut captured = set.clone();
    for case in &mut captured.cases {
        let args = case.arg_values()?;
        match format_strict_with(&backend, &case.format, &args) {
            Ok(out) => {
                case.expected_output = out;
                case.expected_error = None;
            }
            Err(err) => {
                case.expected_output = String::new();
                case.expected_error = Some(err.kind().to_string());
            }
        }
    }
    captured.captured_at = now_utc();
    Ok(captured)
}
