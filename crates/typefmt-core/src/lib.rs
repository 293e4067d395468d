//! # typefmt-core
//!
//! Type-safe `printf`-style formatting.
//!
//! A format string is combined with a slice of [`ArgValue`]s. Every specifier
//! converts its argument through an explicit table of allowed conversions and
//! renders exactly one value, so a mismatch between specifier and argument is
//! a [`FormatError`] instead of undefined behaviour.
//!
//! ```
//! use typefmt_core::{format, typefmt};
//!
//! assert_eq!(typefmt!("%2$s %1$s", "a", "b"), "b a");
//! assert_eq!(typefmt!("%*d|%-6.2f|", 5, 3, 1.5), "    3|1.50  |");
//! assert!(format("%d", &typefmt_core::args!["nope"]).starts_with("<formatting error>"));
//! ```
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

use std::io::{self, Write};

pub mod convert;
pub mod engine;
pub mod error;
pub mod render;
pub mod resolve;
pub mod spec;
pub mod value;

pub use convert::Renderable;
pub use engine::Formatter;
pub use error::{ErrorKind, FormatError};
pub use render::{NativeBackend, RenderBackend, SubFormat};
pub use value::{ArgValue, AsFormatEnum};

/// Format `args`, substituting diagnostic text if formatting fails.
///
/// Never panics and never returns an error; see [`diagnostic`] for the text
/// produced on failure.
#[must_use]
pub fn format(format: &str, args: &[ArgValue<'_>]) -> String {
    format_with(NativeBackend, format, args)
}

/// Format `args`, returning the first error.
pub fn format_strict(format: &str, args: &[ArgValue<'_>]) -> Result<String, FormatError> {
    format_strict_with(NativeBackend, format, args)
}

/// [`format`] with an explicit render backend.
#[must_use]
pub fn format_with<B: RenderBackend>(backend: B, format: &str, args: &[ArgValue<'_>]) -> String {
    let mut formatter = Formatter::with_backend(format, backend);
    match formatter.parse(args) {
        Ok(()) => formatter.into_output(),
        Err(err) => diagnostic(format, formatter.position(), &err),
    }
}

/// [`format_strict`] with an explicit render backend.
pub fn format_strict_with<B: RenderBackend>(
    backend: B,
    format: &str,
    args: &[ArgValue<'_>],
) -> Result<String, FormatError> {
    let mut formatter = Formatter::with_backend(format, backend);
    formatter.parse(args)?;
    Ok(formatter.into_output())
}

/// Write the fail-soft rendering of `args` to `out`. Formatting failures are
/// written as their diagnostic text; only I/O errors are returned.
pub fn print_to<W: Write + ?Sized>(
    out: &mut W,
    format: &str,
    args: &[ArgValue<'_>],
) -> io::Result<()> {
    out.write_all(self::format(format, args).as_bytes())
}

/// [`print_to`] standard output. No newline is appended.
pub fn print(format: &str, args: &[ArgValue<'_>]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    print_to(&mut stdout, format, args)?;
    stdout.flush()
}

/// [`print_to`] standard error.
pub fn eprint(format: &str, args: &[ArgValue<'_>]) -> io::Result<()> {
    print_to(&mut io::stderr().lock(), format, args)
}

/// Replacement text for a failed call:
/// `<formatting error> KIND: MESSAGE at: "consumed|rest"`, where `|` marks
/// the byte offset `position` in `format`.
#[must_use]
pub fn diagnostic(format: &str, position: usize, err: &FormatError) -> String {
    let (consumed, rest) = format.split_at_checked(position).unwrap_or((format, ""));
    std::format!(
        "<formatting error> {}: {err} at: \"{consumed}|{rest}\"",
        err.kind()
    )
}

/// Build a `Vec<ArgValue>` from heterogeneous values.
///
/// ```
/// let args = typefmt_core::args![1, 2.5, "three", 'c'];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::ArgValue::from($arg)),*]
    };
}

/// Fail-soft formatting with inline arguments. Expands to [`format`].
#[macro_export]
macro_rules! typefmt {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format($fmt, &$crate::args![$($arg),*])
    };
}

/// Strict formatting with inline arguments. Expands to [`format_strict`].
#[macro_export]
macro_rules! try_typefmt {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format_strict($fmt, &$crate::args![$($arg),*])
    };
}

/// Fail-soft formatting to standard output. Expands to [`print`].
#[macro_export]
macro_rules! typefmt_print {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::print($fmt, &$crate::args![$($arg),*])
    };
}

/// Fail-soft formatting to standard error. Expands to [`eprint`].
#[macro_export]
macro_rules! typefmt_eprint {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::eprint($fmt, &$crate::args![$($arg),*])
    };
}
