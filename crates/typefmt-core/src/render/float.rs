//! `%f %e %g %a` and their upper-case variants.
//!
//! Digit generation uses Rust's correctly rounded `{:.N}` / `{:.Ne}`
//! formatting; this module only rearranges the result into C's layout
//! (two-digit signed exponents, `%g` style selection, hex floats).

use crate::spec::Conversion;

use super::{SubFormat, pad_field, sign_char};

/// Default precision for every floating conversion except `%a`.
const DEFAULT_PRECISION: usize = 6;

/// Hex digits after the point in an f64 mantissa.
const MANTISSA_HEX_DIGITS: usize = 13;

pub(super) fn render_double(out: &mut String, sub: &SubFormat, value: f64) {
    let upper = sub.conversion.is_upper();
    let alt = sub.flags.alt_form;
    let sign = sign_char(value.is_sign_negative(), &sub.flags);

    if !value.is_finite() {
        let body = match (value.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        // Zero padding never applies to inf/nan.
        pad_field(out, sub, sign, "", 0, body, false);
        return;
    }

    let abs = value.abs();
    let precision = sub.precision.unwrap_or(DEFAULT_PRECISION);
    let (prefix, body) = match sub.conversion {
        Conversion::ExpLower | Conversion::ExpUpper => ("", format_e(abs, precision, upper, alt)),
        Conversion::GeneralLower | Conversion::GeneralUpper => {
            ("", format_g(abs, precision, upper, alt))
        }
        Conversion::HexFloatLower => ("0x", format_a(abs, sub.precision, false, alt)),
        Conversion::HexFloatUpper => ("0X", format_a(abs, sub.precision, true, alt)),
        _ => ("", format_f(abs, precision, alt)),
    };
    pad_field(out, sub, sign, prefix, 0, &body, sub.flags.zero_pad);
}

/// `%f`: fixed-point decimal.
fn format_f(value: f64, precision: usize, alt_form: bool) -> String {
    let mut s = format!("{value:.precision$}");
    if precision == 0 && alt_form {
        s.push('.');
    }
    s
}

/// `%e`: `d.ddde±XX`.
fn format_e(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let (mantissa, exp) = split_exp(value, precision);
    let mut s = mantissa;
    if precision == 0 && alt_form {
        s.push('.');
    }
    push_exponent(&mut s, exp, uppercase);
    s
}

/// `%g`: `%e` when the exponent is below -4 or at least the precision,
/// `%f` otherwise; trailing zeros removed unless `#`.
fn format_g(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let p = precision.max(1);
    // The exponent after rounding to `p` significant digits decides the style.
    let (_, exp) = split_exp(value, p - 1);

    let p = p as i32;
    if exp < -4 || exp >= p {
        let (mut mantissa, exp) = split_exp(value, (p - 1) as usize);
        if alt_form {
            if !mantissa.contains('.') {
                mantissa.push('.');
            }
        } else {
            strip_trailing_zeros(&mut mantissa);
        }
        push_exponent(&mut mantissa, exp, uppercase);
        mantissa
    } else {
        let frac_digits = (p - 1 - exp).max(0) as usize;
        let mut s = format!("{value:.frac_digits$}");
        if alt_form {
            if !s.contains('.') {
                s.push('.');
            }
        } else {
            strip_trailing_zeros(&mut s);
        }
        s
    }
}

/// `%a`: `h.hhhp±d`, without the `0x` prefix. `None` precision prints the
/// exact mantissa with trailing zeros removed; a given precision rounds to
/// nearest, ties to even.
fn format_a(value: f64, precision: Option<usize>, uppercase: bool, alt_form: bool) -> String {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = bits & ((1_u64 << 52) - 1);

    let (mut lead, exp) = match (biased, mantissa) {
        (0, 0) => (0_u64, 0),
        // Subnormals keep a leading zero and the minimum exponent.
        (0, _) => (0, -1022),
        _ => (1, biased - 1023),
    };

    let digits = match precision {
        None => {
            let full = format!("{mantissa:013x}");
            full.trim_end_matches('0').to_string()
        }
        Some(p) if p >= MANTISSA_HEX_DIGITS => {
            let mut full = format!("{mantissa:013x}");
            full.extend(core::iter::repeat_n('0', p - MANTISSA_HEX_DIGITS));
            full
        }
        Some(p) => {
            let shift = ((MANTISSA_HEX_DIGITS - p) * 4) as u32;
            let mut keep = mantissa >> shift;
            let rem = mantissa & ((1_u64 << shift) - 1);
            let half = 1_u64 << (shift - 1);
            let last = if p == 0 { lead } else { keep };
            if rem > half || (rem == half && last & 1 == 1) {
                if p == 0 {
                    lead += 1;
                } else {
                    keep += 1;
                    // Carry out of the kept digits bumps the leading digit.
                    if keep >> (p * 4) != 0 {
                        keep &= (1_u64 << (p * 4)) - 1;
                        lead += 1;
                    }
                }
            }
            if p == 0 {
                String::new()
            } else {
                format!("{keep:0p$x}")
            }
        }
    };

    let mut s = format!("{lead:x}");
    if !digits.is_empty() || alt_form {
        s.push('.');
    }
    s.push_str(&digits);
    s.push('p');
    s.push(if exp < 0 { '-' } else { '+' });
    s.push_str(&exp.unsigned_abs().to_string());
    if uppercase {
        s.make_ascii_uppercase();
    }
    s
}

/// Format `value` as `{:.precision$e}` and split it into the mantissa text
/// and the decimal exponent.
fn split_exp(value: f64, precision: usize) -> (String, i32) {
    let s = format!("{value:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

/// Append `e±XX` (at least two exponent digits).
fn push_exponent(s: &mut String, exp: i32, uppercase: bool) {
    s.push(if uppercase { 'E' } else { 'e' });
    s.push(if exp < 0 { '-' } else { '+' });
    s.push_str(&format!("{:02}", exp.unsigned_abs()));
}

/// Remove trailing zeros after the decimal point.
fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Flags;

    fn render(text_flags: &str, width: usize, precision: Option<usize>, conv: Conversion, v: f64) -> String {
        let flags = Flags {
            left_justify: text_flags.contains('-'),
            force_sign: text_flags.contains('+'),
            space_sign: text_flags.contains(' '),
            alt_form: text_flags.contains('#'),
            zero_pad: text_flags.contains('0'),
        };
        let sub = SubFormat::new(flags, width, precision, conv);
        let mut out = String::new();
        render_double(&mut out, &sub, v);
        out
    }

    #[test]
    fn fixed_defaults_to_six_digits() {
        assert_eq!(render("", 0, None, Conversion::FixedLower, core::f64::consts::PI), "3.141593");
        assert_eq!(render("", 0, Some(2), Conversion::FixedLower, 3.14159), "3.14");
        assert_eq!(render("", 0, Some(0), Conversion::FixedLower, 2.7), "3");
        assert_eq!(render("#", 0, Some(0), Conversion::FixedLower, 2.0), "2.");
        assert_eq!(render("", 0, Some(1), Conversion::FixedLower, -0.0), "-0.0");
    }

    #[test]
    fn fixed_width_and_sign() {
        assert_eq!(render("+", 8, Some(2), Conversion::FixedLower, 1.5), "   +1.50");
        assert_eq!(render("0", 8, Some(2), Conversion::FixedLower, -1.5), "-0001.50");
        assert_eq!(render("-", 7, Some(1), Conversion::FixedLower, 1.26), "1.3    ");
    }

    #[test]
    fn special_values() {
        assert_eq!(render("", 0, None, Conversion::FixedLower, f64::NAN), "nan");
        assert_eq!(render("", 0, None, Conversion::FixedUpper, f64::INFINITY), "INF");
        assert_eq!(render("", 0, None, Conversion::ExpLower, f64::NEG_INFINITY), "-inf");
        assert_eq!(render("0", 6, None, Conversion::GeneralLower, f64::INFINITY), "   inf");
        assert_eq!(render("+", 0, None, Conversion::HexFloatLower, f64::INFINITY), "+inf");
    }

    #[test]
    fn exponent_form() {
        assert_eq!(render("", 0, None, Conversion::ExpLower, 12345.678), "1.234568e+04");
        assert_eq!(render("", 0, Some(2), Conversion::ExpUpper, 0.000123), "1.23E-04");
        assert_eq!(render("", 0, Some(0), Conversion::ExpLower, 5.0), "5e+00");
        assert_eq!(render("#", 0, Some(0), Conversion::ExpLower, 5.0), "5.e+00");
        assert_eq!(render("", 0, Some(1), Conversion::ExpLower, 0.0), "0.0e+00");
        assert_eq!(render("", 0, Some(2), Conversion::ExpLower, 1e100), "1.00e+100");
        assert_eq!(render("", 0, Some(1), Conversion::ExpLower, 9.96), "1.0e+01");
    }

    #[test]
    fn general_form() {
        assert_eq!(render("", 0, None, Conversion::GeneralLower, 3.14159), "3.14159");
        assert_eq!(render("", 0, None, Conversion::GeneralLower, 100000.0), "100000");
        assert_eq!(render("", 0, None, Conversion::GeneralLower, 1_000_000.0), "1e+06");
        assert_eq!(render("", 0, None, Conversion::GeneralLower, 0.0001), "0.0001");
        assert_eq!(render("", 0, None, Conversion::GeneralUpper, 0.00001), "1E-05");
        assert_eq!(render("", 0, None, Conversion::GeneralLower, 0.0), "0");
        assert_eq!(render("", 0, Some(0), Conversion::GeneralLower, 2.4), "2");
        assert_eq!(render("#", 0, Some(3), Conversion::GeneralLower, 1.0), "1.00");
        assert_eq!(render("", 0, Some(2), Conversion::GeneralLower, 99.7), "1e+02");
    }

    #[test]
    fn hex_float_form() {
        assert_eq!(render("", 0, None, Conversion::HexFloatLower, 1.0), "0x1p+0");
        assert_eq!(render("", 0, None, Conversion::HexFloatLower, 0.5), "0x1p-1");
        assert_eq!(render("", 0, None, Conversion::HexFloatLower, 0.0), "0x0p+0");
        assert_eq!(render("", 0, None, Conversion::HexFloatUpper, 10.0), "0X1.4P+3");
        assert_eq!(render("", 0, None, Conversion::HexFloatLower, -1.5), "-0x1.8p+0");
        assert_eq!(render("", 0, Some(0), Conversion::HexFloatLower, 1.5), "0x2p+0");
        assert_eq!(render("", 0, Some(2), Conversion::HexFloatLower, 1.0), "0x1.00p+0");
        assert_eq!(render("#", 0, None, Conversion::HexFloatLower, 1.0), "0x1.p+0");
        assert_eq!(
            render("", 0, None, Conversion::HexFloatLower, f64::from_bits(1)),
            "0x0.0000000000001p-1022"
        );
    }

    #[test]
    fn hex_float_zero_pad_goes_after_prefix() {
        assert_eq!(render("0", 10, None, Conversion::HexFloatLower, 1.0), "0x00001p+0");
    }
}
