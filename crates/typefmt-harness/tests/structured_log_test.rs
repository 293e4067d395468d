//! End-to-end checks of the JSONL run log and the artifact index.

use std::path::PathBuf;

use typefmt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, sha256_hex, validate_log_file,
    validate_log_line,
};
use typefmt_harness::{FixtureSet, RunMode, TestRunner};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("typefmt-{tag}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn mixed_fixture() -> FixtureSet {
    FixtureSet::from_json(
        r#"{
            "version":"v1",
            "family":"printf/log",
            "captured_at":"2026-10-19T00:00:00.000Z",
            "cases":[
                {"name":"hex","section":"conversion/x","format":"%#x","args":[{"kind":"unsigned","value":255}],"expected_output":"0xff","mode":"both"},
                {"name":"wrong","section":"width","format":"%3d","args":[{"kind":"signed","value":1}],"expected_output":"1","mode":"both"},
                {"name":"missing","section":"errors","format":"%s","expected_error":"IndexOutOfRange","mode":"both"}
            ]
        }"#,
    )
    .expect("valid fixture json")
}

#[test]
fn verify_run_log_validates_line_by_line() {
    let dir = scratch_dir("log-e2e");
    let path = dir.join("verify.jsonl");

    let mut emitter = LogEmitter::to_file(&path, "fixture-verify", "run-7").unwrap();
    emitter.emit(LogLevel::Info, "run_start").unwrap();
    let set = mixed_fixture();
    let mut results = Vec::new();
    for mode in [RunMode::Strict, RunMode::Soft] {
        let runner = TestRunner::new("fixture-verify", mode);
        results.extend(runner.run_logged(&set, &mut emitter).unwrap());
    }
    emitter.emit(LogLevel::Error, "run_finish").unwrap();
    emitter.flush().unwrap();
    drop(emitter);

    let (lines, errors) = validate_log_file(&path).unwrap();
    assert_eq!(lines, 2 + results.len());
    assert!(errors.is_empty(), "{errors:?}");

    let content = std::fs::read_to_string(&path).unwrap();
    let entries: Vec<LogEntry> = content
        .lines()
        .enumerate()
        .map(|(i, line)| validate_log_line(line, i + 1).unwrap())
        .collect();

    assert_eq!(entries[0].event, "run_start");
    assert_eq!(entries.last().unwrap().event, "run_finish");
    assert!(
        entries
            .iter()
            .all(|e| e.trace_id.starts_with("fixture-verify::run-7::"))
    );

    let failures: Vec<_> = entries.iter().filter(|e| e.event == "case_fail").collect();
    assert_eq!(failures.len(), 2, "`wrong` fails in both modes");
    assert!(failures.iter().all(|e| e.case.as_deref() == Some("wrong")));
    assert!(failures.iter().all(|e| e.details.is_some()));

    let missing: Vec<_> = entries
        .iter()
        .filter(|e| e.case.as_deref() == Some("missing"))
        .collect();
    assert_eq!(missing.len(), 2);
    for entry in missing {
        assert_eq!(entry.outcome, Some(Outcome::Pass));
        assert_eq!(entry.error_kind.as_deref(), Some("IndexOutOfRange"));
    }
}

#[test]
fn validator_flags_malformed_lines() {
    let bad_mode = r#"{"timestamp":"2026-10-19T00:00:00.000Z","trace_id":"a::b::001","level":"info","event":"case_pass","mode":"lenient"}"#;
    let errors = validate_log_line(bad_mode, 1).unwrap_err();
    assert!(errors.iter().any(|e| e.field == "mode"));

    let outcome_without_case = r#"{"timestamp":"2026-10-19T00:00:00.000Z","trace_id":"a::b::002","level":"info","event":"case_pass","outcome":"pass"}"#;
    assert!(validate_log_line(outcome_without_case, 2).is_err());

    let flat_trace = r#"{"timestamp":"2026-10-19T00:00:00.000Z","trace_id":"flat","level":"info","event":"run_start"}"#;
    let errors = validate_log_line(flat_trace, 3).unwrap_err();
    assert!(errors.iter().any(|e| e.field == "trace_id"));

    assert!(validate_log_line("not json", 4).is_err());
}

#[test]
fn artifact_index_covers_log_and_report() {
    let dir = scratch_dir("index-e2e");
    let log_path = dir.join("verify.jsonl");
    let report_path = dir.join("report.md");
    std::fs::write(&log_path, b"{}\n").unwrap();
    std::fs::write(&report_path, b"# report\n").unwrap();

    let mut index = ArtifactIndex::new("run-7", "fixture-verify");
    index.add_file(&report_path, "report_md").unwrap();
    index.add_file(&log_path, "log").unwrap();

    let json: serde_json::Value = serde_json::from_str(&index.to_json().unwrap()).unwrap();
    let artifacts = json["artifacts"].as_array().unwrap();
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0]["kind"], "report_md");
    assert_eq!(artifacts[0]["sha256"], sha256_hex(b"# report\n"));
    assert_eq!(artifacts[0]["size_bytes"], 9);
    assert_eq!(artifacts[1]["sha256"], sha256_hex(b"{}\n"));
    assert_eq!(json["run_id"], "run-7");
}
