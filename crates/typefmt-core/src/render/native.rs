//! Pure-Rust, locale-independent renderer.

use crate::convert::Renderable;
use crate::error::FormatError;
use crate::spec::{Conversion, Semantic};

use super::{RenderBackend, SubFormat, float, pad_field, sign_char};

/// Default backend: renders every conversion without touching the C library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeBackend;

impl RenderBackend for NativeBackend {
    fn render(
        &self,
        sub: &SubFormat,
        value: &Renderable<'_>,
        out: &mut String,
    ) -> Result<(), FormatError> {
        match (sub.conversion.semantic(), value) {
            (Semantic::Signed, Renderable::Signed(v)) => {
                render_integer(out, sub, *v < 0, v.unsigned_abs(), true);
            }
            (Semantic::Unsigned, Renderable::Unsigned(v)) => {
                render_integer(out, sub, false, *v, false);
            }
            (Semantic::Double, Renderable::Double(v)) => float::render_double(out, sub, *v),
            (Semantic::Pointer, Renderable::Pointer(addr)) => render_pointer(out, sub, *addr),
            (Semantic::Char, Renderable::Char(c)) => render_char(out, sub, *c),
            (Semantic::Text, Renderable::Text(s)) => render_text(out, sub, s),
            _ => {
                return Err(FormatError::backend(
                    sub.to_string(),
                    "value category does not match conversion",
                ));
            }
        }
        Ok(())
    }
}

/// Integers in base 8, 10 or 16. `magnitude` is the absolute value; the sign
/// is only printed for signed conversions.
fn render_integer(out: &mut String, sub: &SubFormat, negative: bool, magnitude: u64, signed: bool) {
    let (base, uppercase) = int_base(sub.conversion);
    let mut digits = [0u8; 64];
    let digit_count = render_digits(magnitude, base, uppercase, &mut digits);

    // Explicit precision 0 with value 0 produces no digits.
    let suppress_zero = magnitude == 0 && sub.precision == Some(0);
    let digit_slice = if suppress_zero {
        &digits[..0]
    } else {
        &digits[64 - digit_count..]
    };

    // Precision: minimum digits (pad with zeros).
    let min_digits = sub.precision.unwrap_or(1);
    let zeros = min_digits.saturating_sub(digit_slice.len());

    let prefix = if sub.flags.alt_form {
        match sub.conversion {
            // '#' on octal only guarantees a leading zero.
            Conversion::Octal if zeros == 0 && digit_slice.first() != Some(&b'0') => "0",
            Conversion::HexLower if magnitude != 0 => "0x",
            Conversion::HexUpper if magnitude != 0 => "0X",
            _ => "",
        }
    } else {
        ""
    };

    let sign = if signed {
        sign_char(negative, &sub.flags)
    } else {
        None
    };
    let body: String = digit_slice.iter().map(|&b| char::from(b)).collect();
    pad_field(out, sub, sign, prefix, zeros, &body, sub.flags.zero_pad);
}

fn render_text(out: &mut String, sub: &SubFormat, s: &str) {
    // Precision truncates by characters, never inside one.
    let effective = match sub.precision {
        Some(p) => s.char_indices().nth(p).map_or(s, |(end, _)| &s[..end]),
        None => s,
    };
    pad_field(out, sub, None, "", 0, effective, false);
}

fn render_char(out: &mut String, sub: &SubFormat, c: char) {
    let mut buf = [0u8; 4];
    pad_field(out, sub, None, "", 0, c.encode_utf8(&mut buf), false);
}

/// `(nil)` for the null address. Otherwise the address as `%#x`, still
/// taking the sign flags and precision, the way glibc does.
fn render_pointer(out: &mut String, sub: &SubFormat, addr: usize) {
    if addr == 0 {
        pad_field(out, sub, None, "", 0, "(nil)", false);
        return;
    }
    let mut digits = [0u8; 64];
    let count = render_digits(addr as u64, 16, false, &mut digits);
    let body: String = digits[64 - count..].iter().map(|&b| char::from(b)).collect();
    let zeros = sub.precision.unwrap_or(0).saturating_sub(count);
    let zero_pad = sub.flags.zero_pad && sub.precision.is_none();
    pad_field(out, sub, sign_char(false, &sub.flags), "0x", zeros, &body, zero_pad);
}

fn int_base(conversion: Conversion) -> (u64, bool) {
    match conversion {
        Conversion::Octal => (8, false),
        Conversion::HexLower => (16, false),
        Conversion::HexUpper => (16, true),
        _ => (10, false),
    }
}

/// Render `value` in the given `base` into the END of `buf`.
/// Returns the number of digits written. Digits are placed right-aligned.
fn render_digits(mut value: u64, base: u64, uppercase: bool, buf: &mut [u8; 64]) -> usize {
    if value == 0 {
        buf[63] = b'0';
        return 1;
    }
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = 64;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    64 - pos
}
