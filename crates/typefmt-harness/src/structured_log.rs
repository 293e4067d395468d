//! JSONL run logs and the artifact index of a verification run.
//!
//! A run writes one [`LogEntry`] per line through a [`LogEmitter`]: a
//! `run_start` event, one `case_pass` / `case_fail` entry per verified case,
//! and a `run_finish` event. [`validate_log_line`] and [`validate_log_file`]
//! check a log against the entry schema; [`ArtifactIndex`] records the
//! SHA-256 of every file a run produced.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

/// Result of verifying one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// One JSONL line. `timestamp`, `trace_id`, `level` and `event` are always
/// present; the rest are omitted when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    /// `strict` or `soft`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ns: Option<u64>,
    /// Format, expected and actual text of a failing or host-mismatched case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// An entry stamped with the current time. An empty `trace_id` is filled
    /// in by [`LogEmitter::emit_entry`].
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            campaign: None,
            mode: None,
            family: None,
            case: None,
            outcome: None,
            error_kind: None,
            latency_ns: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_campaign(mut self, campaign: impl Into<String>) -> Self {
        self.campaign = Some(campaign.into());
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    /// Fixture family and case name.
    #[must_use]
    pub fn with_case(mut self, family: impl Into<String>, case: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self.case = Some(case.into());
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    #[must_use]
    pub fn with_error_kind(mut self, kind: impl Into<String>) -> Self {
        self.error_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_latency_ns(mut self, latency_ns: u64) -> Self {
        self.latency_ns = Some(latency_ns);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// ---------------------------------------------------------------------------
// Artifact index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub path: String,
    /// `report_md`, `report_json` or `log`.
    pub kind: String,
    pub sha256: String,
    pub size_bytes: u64,
}

/// Files produced by one run, with their digests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactIndex {
    pub index_version: u32,
    pub run_id: String,
    pub campaign: String,
    pub generated_utc: String,
    pub artifacts: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    #[must_use]
    pub fn new(run_id: impl Into<String>, campaign: impl Into<String>) -> Self {
        Self {
            index_version: 1,
            run_id: run_id.into(),
            campaign: campaign.into(),
            generated_utc: now_utc(),
            artifacts: Vec::new(),
        }
    }

    /// Hash the file at `path` and append it.
    pub fn add_file(&mut self, path: &Path, kind: impl Into<String>) -> std::io::Result<&mut Self> {
        let data = std::fs::read(path)?;
        self.artifacts.push(ArtifactEntry {
            path: path.display().to_string(),
            kind: kind.into(),
            sha256: sha256_hex(&data),
            size_bytes: data.len() as u64,
        });
        Ok(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lower-case hex SHA-256 of `data`.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::Digest;
    use std::fmt::Write as _;

    let digest = sha2::Sha256::digest(data);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

/// Appends entries to a JSONL file, numbering them
/// `<campaign>::<run_id>::<seq>`.
pub struct LogEmitter {
    writer: BufWriter<File>,
    seq: u64,
    campaign: String,
    run_id: String,
}

impl LogEmitter {
    /// Create (or truncate) the log at `path`.
    pub fn to_file(path: &Path, campaign: &str, run_id: &str) -> std::io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            seq: 0,
            campaign: campaign.to_string(),
            run_id: run_id.to_string(),
        })
    }

    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("{}::{}::{:03}", self.campaign, self.run_id, self.seq)
    }

    /// Write a bare event such as `run_start` and return it.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<LogEntry> {
        let entry = LogEntry::new(self.next_trace_id(), level, event).with_campaign(&self.campaign);
        self.write_line(&entry)?;
        Ok(entry)
    }

    /// Write `entry`, assigning a trace id and campaign if it has none.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        }
        if entry.campaign.is_none() {
            entry.campaign = Some(self.campaign.clone());
        }
        self.write_line(&entry)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    fn write_line(&mut self, entry: &LogEntry) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, entry).map_err(std::io::Error::other)?;
        self.writer.write_all(b"\n")
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// One problem found in one log line.
#[derive(Debug)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl LogValidationError {
    fn new(line_number: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            line_number,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} [{}]: {}", self.line_number, self.field, self.message)
    }
}

const LEVELS: &[&str] = &["info", "error"];
const MODES: &[&str] = &["strict", "soft"];
const OUTCOMES: &[&str] = &["pass", "fail"];
const ERROR_KINDS: &[&str] = &[
    "InvalidSpecifier",
    "IndexOutOfRange",
    "UnsupportedConversion",
    "BackendFormattingFailure",
];

/// Check a JSONL line against the [`LogEntry`] schema and decode it.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
        vec![LogValidationError::new(line_number, "<json>", format!("invalid JSON: {e}"))]
    })?;
    let Some(obj) = value.as_object() else {
        return Err(vec![LogValidationError::new(
            line_number,
            "<root>",
            "expected JSON object",
        )]);
    };

    let mut errors: Vec<LogValidationError> = ["timestamp", "trace_id", "level", "event"]
        .into_iter()
        .filter(|field| !obj.contains_key(*field))
        .map(|field| LogValidationError::new(line_number, field, "required field missing"))
        .collect();

    for (field, allowed) in [
        ("level", LEVELS),
        ("mode", MODES),
        ("outcome", OUTCOMES),
        ("error_kind", ERROR_KINDS),
    ] {
        if let Some(value) = obj.get(field).and_then(|v| v.as_str())
            && !allowed.contains(&value)
        {
            errors.push(LogValidationError::new(
                line_number,
                field,
                format!("invalid {field}: '{value}'"),
            ));
        }
    }

    if obj.contains_key("outcome") && !obj.get("case").is_some_and(serde_json::Value::is_string) {
        errors.push(LogValidationError::new(
            line_number,
            "case",
            "outcome events must include the case name",
        ));
    }

    // <campaign>::<run_id>::<seq>
    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str())
        && trace_id.split("::").count() < 3
    {
        errors.push(LogValidationError::new(
            line_number,
            "trace_id",
            format!("malformed trace_id '{trace_id}'"),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    serde_json::from_value::<LogEntry>(value).map_err(|e| {
        vec![LogValidationError::new(
            line_number,
            "<entry>",
            format!("does not decode as a log entry: {e}"),
        )]
    })
}

/// Validate every non-blank line of a JSONL file.
///
/// Returns the number of lines checked and all problems found.
pub fn validate_log_file(path: &Path) -> std::io::Result<(usize, Vec<LogValidationError>)> {
    let content = std::fs::read_to_string(path)?;
    let mut checked = 0;
    let mut problems = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        checked += 1;
        if let Err(errs) = validate_log_line(line, i + 1) {
            problems.extend(errs);
        }
    }
    Ok((checked, problems))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(duration.as_secs(), duration.subsec_millis())
}

fn format_utc(secs: u64, millis: u32) -> String {
    let days = secs / 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        (secs % 86_400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
    )
}

/// Days since 1970-01-01 to (year, month, day) in the proleptic Gregorian
/// calendar.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("typefmt-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn bare_entry_omits_unset_fields() {
        let entry = LogEntry::new("verify::run-1::001", LogLevel::Info, "run_start");
        let parsed = serde_json::to_value(&entry).unwrap();
        assert!(parsed["timestamp"].is_string());
        assert_eq!(parsed["trace_id"], "verify::run-1::001");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "run_start");
        for absent in ["campaign", "mode", "case", "outcome", "details"] {
            assert!(parsed.get(absent).is_none(), "{absent}");
        }
    }

    #[test]
    fn case_entry_carries_every_field_and_validates() {
        let entry = LogEntry::new("verify::run-1::002", LogLevel::Error, "case_fail")
            .with_campaign("verify")
            .with_mode("strict")
            .with_case("printf/integers", "zero_pad")
            .with_outcome(Outcome::Fail)
            .with_error_kind("IndexOutOfRange")
            .with_latency_ns(150)
            .with_details(serde_json::json!({"expected": "007"}));

        let line = serde_json::to_string(&entry).unwrap();
        let back = validate_log_line(&line, 1).unwrap();
        assert_eq!(back.mode.as_deref(), Some("strict"));
        assert_eq!(back.family.as_deref(), Some("printf/integers"));
        assert_eq!(back.case.as_deref(), Some("zero_pad"));
        assert_eq!(back.outcome, Some(Outcome::Fail));
        assert_eq!(back.latency_ns, Some(150));
        assert_eq!(back.details.unwrap()["expected"], "007");
    }

    #[test]
    fn validate_missing_required_field() {
        let json = r#"{"timestamp":"2026-10-19T00:00:00.000Z","level":"info","event":"run_start"}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "trace_id"));
    }

    #[test]
    fn validate_enums() {
        let json = r#"{"timestamp":"t","trace_id":"a::b::c","level":"warn","event":"x","mode":"hardened","outcome":"skip","case":"c","error_kind":"Oops"}"#;
        let errors = validate_log_line(json, 3).unwrap_err();
        for field in ["level", "mode", "outcome", "error_kind"] {
            assert!(errors.iter().any(|e| e.field == field), "{field}");
        }
        assert!(errors.iter().all(|e| e.line_number == 3));
    }

    #[test]
    fn validate_outcome_requires_case() {
        let json = r#"{"timestamp":"t","trace_id":"a::b::c","level":"info","event":"case_pass","outcome":"pass"}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "case"));
    }

    #[test]
    fn validate_invalid_json_and_trace_id() {
        let errors = validate_log_line("not json at all", 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "<json>"));

        let json = r#"{"timestamp":"t","trace_id":"a::b","level":"info","event":"run_start"}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "trace_id"));
    }

    #[test]
    fn artifact_index_hashes_files() {
        let path = scratch("report.md");
        std::fs::write(&path, b"abc").unwrap();

        let mut idx = ArtifactIndex::new("run-001", "verify");
        idx.add_file(&path, "report_md").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&idx.to_json().unwrap()).unwrap();
        assert_eq!(parsed["index_version"], 1);
        assert_eq!(
            parsed["artifacts"][0]["sha256"],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(parsed["artifacts"][0]["size_bytes"], 3);
    }

    #[test]
    fn emitter_numbers_trace_ids_and_fills_entries() {
        let path = scratch("emitter.jsonl");
        let mut emitter = LogEmitter::to_file(&path, "verify", "run-42").unwrap();
        let first = emitter.emit(LogLevel::Info, "run_start").unwrap();
        emitter
            .emit_entry(
                LogEntry::new("", LogLevel::Info, "case_pass")
                    .with_case("printf/strings", "chars")
                    .with_outcome(Outcome::Pass),
            )
            .unwrap();
        emitter.flush().unwrap();
        drop(emitter);

        assert_eq!(first.trace_id, "verify::run-42::001");
        assert_eq!(first.campaign.as_deref(), Some("verify"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second = validate_log_line(lines[1], 2).unwrap();
        assert_eq!(second.trace_id, "verify::run-42::002");
        assert_eq!(second.campaign.as_deref(), Some("verify"));
    }

    #[test]
    fn utc_formatting_is_calendar_exact() {
        assert_eq!(format_utc(0, 0), "1970-01-01T00:00:00.000Z");
        // 2000-02-29 is a leap day.
        assert_eq!(format_utc(951_782_400, 5), "2000-02-29T00:00:00.005Z");
        assert_eq!(format_utc(1_792_368_000 + 3_661, 0), "2026-10-19T01:01:01.000Z");
    }
}
