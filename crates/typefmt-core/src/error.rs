//! Formatting errors.
//!
//! Every stage of a formatting call (parse, resolve, convert, render) reports
//! failure through [`FormatError`]. Errors abort the current call only; the
//! fail-soft entry point turns them into diagnostic text.

use thiserror::Error;

/// Discriminant of a [`FormatError`], for callers that branch on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSpecifier,
    IndexOutOfRange,
    UnsupportedConversion,
    BackendFormattingFailure,
}

impl ErrorKind {
    /// Stable name used in diagnostics and fixtures.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidSpecifier => "InvalidSpecifier",
            Self::IndexOutOfRange => "IndexOutOfRange",
            Self::UnsupportedConversion => "UnsupportedConversion",
            Self::BackendFormattingFailure => "BackendFormattingFailure",
        }
    }

    /// Parse a name produced by [`ErrorKind::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "InvalidSpecifier" => Some(Self::InvalidSpecifier),
            "IndexOutOfRange" => Some(Self::IndexOutOfRange),
            "UnsupportedConversion" => Some(Self::UnsupportedConversion),
            "BackendFormattingFailure" => Some(Self::BackendFormattingFailure),
            _ => None,
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single formatting call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Malformed specifier, unknown conversion letter, or end of input inside
    /// a specifier.
    #[error("{message}")]
    InvalidSpecifier { message: String },

    /// An explicit or sequential index points past the argument list.
    /// `requested` is 0-based; the message shows it 1-based like the format
    /// string does.
    #[error("requested argument {} but input has only {available}", .requested + 1)]
    IndexOutOfRange { requested: usize, available: usize },

    /// No conversion rule from the argument's category to the category the
    /// conversion letter needs.
    #[error("tried to convert argument of type {from} to {to}, which is not possible")]
    UnsupportedConversion {
        from: &'static str,
        to: &'static str,
    },

    /// The render backend rejected the normalized sub-format.
    #[error("backend failed to render {subformat:?}: {message}")]
    BackendFormattingFailure { subformat: String, message: String },
}

impl FormatError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSpecifier { .. } => ErrorKind::InvalidSpecifier,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            Self::BackendFormattingFailure { .. } => ErrorKind::BackendFormattingFailure,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSpecifier {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(from: &'static str, to: &'static str) -> Self {
        Self::UnsupportedConversion { from, to }
    }

    /// Build a backend failure for `subformat`. Public so that backends
    /// outside this crate report failures the same way.
    pub fn backend(subformat: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendFormattingFailure {
            subformat: subformat.into(),
            message: message.into(),
        }
    }
}
