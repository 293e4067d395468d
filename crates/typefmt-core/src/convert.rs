//! Argument conversion.
//!
//! Each conversion letter asks for one [`Semantic`] category. The functions
//! here are the only accepted paths from an [`ArgValue`] to that category;
//! anything else is [`FormatError::UnsupportedConversion`].
//!
//! | requested        | accepted                                   |
//! |------------------|--------------------------------------------|
//! | signed/unsigned  | integers, enums, chars (code point)        |
//! | double           | integers, doubles                          |
//! | pointer          | pointers                                   |
//! | string           | strings, chars, integers, doubles          |
//! | char             | integers, enums, chars (valid scalar only) |
//!
//! Booleans are rejected everywhere.

use std::borrow::Cow;

use crate::error::FormatError;
use crate::spec::Semantic;
use crate::value::ArgValue;

/// A value converted to the category its conversion letter renders.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable<'v> {
    Signed(i64),
    Unsigned(u64),
    Double(f64),
    Pointer(usize),
    Char(char),
    Text(Cow<'v, str>),
}

/// Convert `value` to the category `semantic`.
///
/// `Semantic::Percent` consumes no argument and is never passed here by the
/// engine; it is reported as unsupported if it is.
pub fn convert<'v>(
    value: &'v ArgValue<'_>,
    semantic: Semantic,
) -> Result<Renderable<'v>, FormatError> {
    match semantic {
        Semantic::Signed => to_signed(value).map(Renderable::Signed),
        Semantic::Unsigned => to_unsigned(value).map(Renderable::Unsigned),
        Semantic::Double => to_double(value).map(Renderable::Double),
        Semantic::Pointer => to_pointer(value).map(Renderable::Pointer),
        Semantic::Char => to_char(value).map(Renderable::Char),
        Semantic::Text => to_text(value).map(Renderable::Text),
        Semantic::Percent => Err(unsupported(value, Semantic::Percent)),
    }
}

pub fn to_signed(value: &ArgValue<'_>) -> Result<i64, FormatError> {
    match *value {
        ArgValue::Signed(v) | ArgValue::Enum(v) => Ok(v),
        ArgValue::Unsigned(v) => Ok(v as i64),
        ArgValue::Char(c) => Ok(i64::from(u32::from(c))),
        _ => Err(unsupported(value, Semantic::Signed)),
    }
}

pub fn to_unsigned(value: &ArgValue<'_>) -> Result<u64, FormatError> {
    match *value {
        ArgValue::Unsigned(v) => Ok(v),
        ArgValue::Signed(v) | ArgValue::Enum(v) => Ok(v as u64),
        ArgValue::Char(c) => Ok(u64::from(u32::from(c))),
        _ => Err(unsupported(value, Semantic::Unsigned)),
    }
}

pub fn to_double(value: &ArgValue<'_>) -> Result<f64, FormatError> {
    match *value {
        ArgValue::Float(v) => Ok(v),
        ArgValue::Signed(v) => Ok(v as f64),
        ArgValue::Unsigned(v) => Ok(v as f64),
        _ => Err(unsupported(value, Semantic::Double)),
    }
}

pub fn to_pointer(value: &ArgValue<'_>) -> Result<usize, FormatError> {
    match *value {
        ArgValue::Pointer(addr) => Ok(addr),
        _ => Err(unsupported(value, Semantic::Pointer)),
    }
}

pub fn to_char(value: &ArgValue<'_>) -> Result<char, FormatError> {
    let code = match *value {
        ArgValue::Char(c) => return Ok(c),
        ArgValue::Signed(v) | ArgValue::Enum(v) => u32::try_from(v).ok(),
        ArgValue::Unsigned(v) => u32::try_from(v).ok(),
        _ => None,
    };
    code.and_then(char::from_u32)
        .ok_or_else(|| unsupported(value, Semantic::Char))
}

/// Text for `%s`. Numbers are printed first (integers in decimal, doubles in
/// fixed notation with six decimals) and then treated as strings.
pub fn to_text<'v>(value: &'v ArgValue<'_>) -> Result<Cow<'v, str>, FormatError> {
    match value {
        ArgValue::Str(s) => Ok(Cow::Borrowed(s.as_ref())),
        ArgValue::Char(c) => Ok(Cow::Owned(c.to_string())),
        ArgValue::Signed(v) => Ok(Cow::Owned(v.to_string())),
        ArgValue::Unsigned(v) => Ok(Cow::Owned(v.to_string())),
        ArgValue::Float(v) => Ok(Cow::Owned(double_text(*v))),
        _ => Err(unsupported(value, Semantic::Text)),
    }
}

/// Integer supplied through `*` for a width or precision, clamped to the
/// range of a C `int`.
pub fn to_count(value: &ArgValue<'_>) -> Result<i64, FormatError> {
    let raw = match *value {
        ArgValue::Signed(v) | ArgValue::Enum(v) => v,
        ArgValue::Unsigned(v) => i64::try_from(v).unwrap_or(i64::MAX),
        _ => return Err(unsupported(value, Semantic::Signed)),
    };
    Ok(raw.clamp(i64::from(i32::MIN), i64::from(i32::MAX)))
}

fn double_text(v: f64) -> String {
    if v.is_nan() {
        let text = if v.is_sign_negative() { "-nan" } else { "nan" };
        text.to_string()
    } else {
        // Infinities print as "inf"/"-inf" here already.
        format!("{v:.6}")
    }
}

fn unsupported(value: &ArgValue<'_>, to: Semantic) -> FormatError {
    FormatError::unsupported(value.type_name(), to.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn integers_widen_and_wrap() {
        assert_eq!(to_signed(&ArgValue::Unsigned(u64::MAX)).unwrap(), -1);
        assert_eq!(to_unsigned(&ArgValue::Signed(-1)).unwrap(), u64::MAX);
        assert_eq!(to_signed(&ArgValue::Enum(4)).unwrap(), 4);
        assert_eq!(to_unsigned(&ArgValue::Char('A')).unwrap(), 65);
    }

    #[test]
    fn doubles_accept_any_number_but_not_text() {
        assert_eq!(to_double(&ArgValue::Signed(7)).unwrap(), 7.0);
        assert_eq!(to_double(&ArgValue::Unsigned(2)).unwrap(), 2.0);
        assert_eq!(to_double(&ArgValue::Float(0.5)).unwrap(), 0.5);
        let err = to_double(&ArgValue::from("1.5")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
    }

    #[test]
    fn floats_are_not_integers() {
        let err = to_signed(&ArgValue::Float(1.0)).unwrap_err();
        assert_eq!(
            err,
            FormatError::UnsupportedConversion {
                from: "double",
                to: "signed integer"
            }
        );
    }

    #[test]
    fn booleans_are_rejected_everywhere() {
        let b = ArgValue::Bool(true);
        for semantic in [
            Semantic::Signed,
            Semantic::Unsigned,
            Semantic::Double,
            Semantic::Pointer,
            Semantic::Char,
            Semantic::Text,
        ] {
            let err = convert(&b, semantic).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedConversion);
            assert!(err.to_string().contains("bool"));
        }
        assert!(to_count(&b).is_err());
    }

    #[test]
    fn pointers_only_from_pointers() {
        assert_eq!(to_pointer(&ArgValue::Pointer(0x10)).unwrap(), 0x10);
        assert!(to_pointer(&ArgValue::Unsigned(0x10)).is_err());
        assert!(to_text(&ArgValue::Pointer(0x10)).is_err());
    }

    #[test]
    fn text_from_numbers() {
        assert_eq!(to_text(&ArgValue::Signed(-42)).unwrap(), "-42");
        assert_eq!(to_text(&ArgValue::Unsigned(7)).unwrap(), "7");
        assert_eq!(to_text(&ArgValue::Float(3.14)).unwrap(), "3.140000");
        assert_eq!(to_text(&ArgValue::Float(f64::NEG_INFINITY)).unwrap(), "-inf");
        assert_eq!(to_text(&ArgValue::Float(f64::NAN)).unwrap(), "nan");
        assert_eq!(to_text(&ArgValue::Char('x')).unwrap(), "x");
        assert!(to_text(&ArgValue::Enum(1)).is_err());
    }

    #[test]
    fn text_borrows_strings() {
        let value = ArgValue::from("borrowed");
        assert!(matches!(to_text(&value).unwrap(), Cow::Borrowed("borrowed")));
    }

    #[test]
    fn chars_from_code_points() {
        assert_eq!(to_char(&ArgValue::Signed(65)).unwrap(), 'A');
        assert_eq!(to_char(&ArgValue::Unsigned(0x263A)).unwrap(), '☺');
        assert!(to_char(&ArgValue::Signed(-1)).is_err());
        assert!(to_char(&ArgValue::Unsigned(0xD800)).is_err());
        assert!(to_char(&ArgValue::Float(65.0)).is_err());
        assert!(to_char(&ArgValue::from("A")).is_err());
    }

    #[test]
    fn counts_clamp_to_int() {
        assert_eq!(to_count(&ArgValue::Signed(-5)).unwrap(), -5);
        assert_eq!(to_count(&ArgValue::Unsigned(u64::MAX)).unwrap(), i64::from(i32::MAX));
        assert_eq!(to_count(&ArgValue::Signed(i64::MIN)).unwrap(), i64::from(i32::MIN));
        assert!(to_count(&ArgValue::Float(2.0)).is_err());
    }
}
