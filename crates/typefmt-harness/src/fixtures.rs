//! Fixture loading and management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use typefmt_core::ArgValue;

use crate::error::HarnessError;

/// Which entry point a case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// `format_strict`: the error itself is observable.
    Strict,
    /// `format`: failures become diagnostic text.
    Soft,
    Both,
}

/// One serialized argument: `{"kind": "signed", "value": -3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureArg {
    pub kind: String,
    pub value: Value,
}

impl FixtureArg {
    #[must_use]
    pub fn new(kind: impl Into<String>, value: Value) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }

    /// Parse the CLI form `KIND:VALUE`, e.g. `signed:-3`, `string:a b`,
    /// `pointer:0x1000`.
    pub fn from_cli(raw: &str) -> Result<Self, HarnessError> {
        let (kind, text) = raw
            .split_once(':')
            .ok_or_else(|| HarnessError::MalformedCliArg(raw.to_string()))?;
        let bad = || HarnessError::BadArgValue {
            kind: kind.to_string(),
            value: text.to_string(),
        };
        let value = match kind {
            "signed" | "enum" => Value::from(text.parse::<i64>().map_err(|_| bad())?),
            "unsigned" => Value::from(text.parse::<u64>().map_err(|_| bad())?),
            "double" => match text.parse::<f64>().map_err(|_| bad())? {
                v if v.is_finite() => Value::from(v),
                // JSON has no inf/nan literals.
                _ => Value::from(text),
            },
            "bool" => Value::from(text.parse::<bool>().map_err(|_| bad())?),
            "pointer" | "char" | "string" => Value::from(text),
            other => return Err(HarnessError::UnknownArgKind(other.to_string())),
        };
        let arg = Self::new(kind, value);
        // Reject what `to_arg_value` would reject, so errors surface at parse time.
        arg.to_arg_value()?;
        Ok(arg)
    }

    /// Convert to the engine's argument type.
    pub fn to_arg_value(&self) -> Result<ArgValue<'static>, HarnessError> {
        let bad = || HarnessError::BadArgValue {
            kind: self.kind.clone(),
            value: self.value.to_string(),
        };
        let arg = match self.kind.as_str() {
            "signed" => ArgValue::Signed(self.value.as_i64().ok_or_else(bad)?),
            "unsigned" => ArgValue::Unsigned(self.value.as_u64().ok_or_else(bad)?),
            "enum" => ArgValue::Enum(self.value.as_i64().ok_or_else(bad)?),
            "double" => ArgValue::Float(parse_double(&self.value).ok_or_else(bad)?),
            "pointer" => ArgValue::Pointer(parse_pointer(&self.value).ok_or_else(bad)?),
            "char" => {
                let text = self.value.as_str().ok_or_else(bad)?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ArgValue::Char(c),
                    _ => return Err(bad()),
                }
            }
            "string" => ArgValue::from(self.value.as_str().ok_or_else(bad)?.to_string()),
            "bool" => ArgValue::Bool(self.value.as_bool().ok_or_else(bad)?),
            other => return Err(HarnessError::UnknownArgKind(other.to_string())),
        };
        Ok(arg)
    }
}

fn parse_double(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_pointer(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| usize::try_from(v).ok()),
        Value::String(s) => match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => usize::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    }
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Behaviour being checked (e.g. "flags/zero-pad").
    pub section: String,
    pub format: String,
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Rendered text when the call succeeds.
    #[serde(default)]
    pub expected_output: String,
    /// `ErrorKind` name when the call is expected to fail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
    pub mode: CaseMode,
}

impl FixtureCase {
    pub fn arg_values(&self) -> Result<Vec<ArgValue<'static>>, HarnessError> {
        self.args.iter().map(FixtureArg::to_arg_value).collect()
    }
}

/// A collection of fixture cases for one behaviour family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let load = || -> Result<Self, HarnessError> {
            let content = std::fs::read_to_string(path)?;
            Ok(Self::from_json(&content)?)
        };
        load().map_err(|err| HarnessError::Fixture {
            path: path.to_path_buf(),
            source: Box::new(err),
        })
    }
}

/// Sorted `*.json` paths directly inside `dir`.
pub fn fixture_paths(dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(HarnessError::NoFixtures(dir.to_path_buf()));
    }
    Ok(paths)
}
