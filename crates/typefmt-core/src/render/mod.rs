//! Rendering of single converted values.
//!
//! The engine hands a backend exactly one value per call together with the
//! normalized [`SubFormat`] of its specifier. [`NativeBackend`] is the
//! pure-Rust renderer; other backends (e.g. one delegating to the host C
//! library) implement [`RenderBackend`] and are plugged in through
//! [`crate::Formatter::with_backend`].

mod float;
mod native;

use core::fmt;

use crate::convert::Renderable;
use crate::error::FormatError;
use crate::spec::{Conversion, Flags, MAX_FIELD};

pub use native::NativeBackend;

/// Renders one value for one specifier.
pub trait RenderBackend {
    /// Append the text for `value` to `out`. On error nothing is guaranteed
    /// about `out`; the engine discards partial output.
    fn render(
        &self,
        sub: &SubFormat,
        value: &Renderable<'_>,
        out: &mut String,
    ) -> Result<(), FormatError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &B {
    fn render(
        &self,
        sub: &SubFormat,
        value: &Renderable<'_>,
        out: &mut String,
    ) -> Result<(), FormatError> {
        (**self).render(sub, value, out)
    }
}

/// A specifier after argument resolution and flag normalization.
///
/// Width and precision are plain numbers here; `*` fields have already been
/// read from the argument list. The `Display` impl prints the equivalent C
/// directive, always with an `ll` length modifier on integer conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubFormat {
    pub flags: Flags,
    pub width: usize,
    pub precision: Option<usize>,
    pub conversion: Conversion,
}

impl SubFormat {
    /// Normalize raw flags for `conversion`:
    /// - `+` overrides space and `-` overrides `0`;
    /// - `o`, `x`, `X` drop `+` and space (unsigned bases never get a sign);
    /// - `0` is ignored by integer conversions that carry a precision.
    #[must_use]
    pub fn new(
        mut flags: Flags,
        width: usize,
        precision: Option<usize>,
        conversion: Conversion,
    ) -> Self {
        if flags.force_sign {
            flags.space_sign = false;
        }
        if flags.left_justify {
            flags.zero_pad = false;
        }
        if matches!(
            conversion,
            Conversion::Octal | Conversion::HexLower | Conversion::HexUpper
        ) {
            flags.force_sign = false;
            flags.space_sign = false;
        }
        if conversion.is_integer() && precision.is_some() {
            flags.zero_pad = false;
        }
        Self {
            flags,
            width: width.min(MAX_FIELD),
            precision: precision.map(|p| p.min(MAX_FIELD)),
            conversion,
        }
    }
}

impl fmt::Display for SubFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("%")?;
        for (set, c) in [
            (self.flags.left_justify, '-'),
            (self.flags.force_sign, '+'),
            (self.flags.space_sign, ' '),
            (self.flags.alt_form, '#'),
            (self.flags.zero_pad, '0'),
        ] {
            if set {
                write!(f, "{c}")?;
            }
        }
        if self.width > 0 {
            write!(f, "{}", self.width)?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{p}")?;
        }
        if self.conversion.is_integer() {
            f.write_str("ll")?;
        }
        write!(f, "{}", self.conversion.letter())
    }
}

// ---------------------------------------------------------------------------
// Shared padding helpers
// ---------------------------------------------------------------------------

/// Sign character for a signed value under `flags`.
pub(crate) fn sign_char(negative: bool, flags: &Flags) -> Option<char> {
    if negative {
        Some('-')
    } else if flags.force_sign {
        Some('+')
    } else if flags.space_sign {
        Some(' ')
    } else {
        None
    }
}

/// Emit `sign prefix zeros body` justified within `sub.width`. Zero padding
/// (when `zero_pad` is set and the field is right-justified) goes between the
/// prefix and the body, like C does for `-0042` and `0x002a`.
pub(crate) fn pad_field(
    out: &mut String,
    sub: &SubFormat,
    sign: Option<char>,
    prefix: &str,
    zeros: usize,
    body: &str,
    zero_pad: bool,
) {
    let content = usize::from(sign.is_some()) + prefix.len() + zeros + body.chars().count();
    let pad_total = sub.width.saturating_sub(content);
    let left = sub.flags.left_justify;

    if !left && !zero_pad {
        pad(out, ' ', pad_total);
    }
    if let Some(s) = sign {
        out.push(s);
    }
    out.push_str(prefix);
    if !left && zero_pad {
        pad(out, '0', pad_total);
    }
    pad(out, '0', zeros);
    out.push_str(body);
    if left {
        pad(out, ' ', pad_total);
    }
}

pub(crate) fn pad(out: &mut String, c: char, count: usize) {
    // Bounded: maximum pad from width spec.
    out.extend(core::iter::repeat_n(c, count.min(MAX_FIELD)));
}
