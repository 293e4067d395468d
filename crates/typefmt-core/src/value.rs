//! Argument values.
//!
//! Callers hand the engine a slice of [`ArgValue`]s. Each Rust value is
//! wrapped once at the call boundary through the `From` impls below; after
//! that the engine only sees the tagged union and the conversion table in
//! [`crate::convert`] decides what each category may become.

use std::borrow::Cow;

/// One caller-supplied formatting argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    /// Address of a pointer, as produced by `ptr.addr()`.
    Pointer(usize),
    Char(char),
    Str(Cow<'a, str>),
    /// Discriminant of a fieldless enum.
    Enum(i64),
    /// Accepted by no conversion; present so that a `bool` argument yields a
    /// descriptive error instead of silently printing `0`/`1`.
    Bool(bool),
}

impl ArgValue<'_> {
    /// Human-readable name of the argument category, used in
    /// [`crate::FormatError::UnsupportedConversion`].
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Signed(_) => "signed integer",
            Self::Unsigned(_) => "unsigned integer",
            Self::Float(_) => "double",
            Self::Pointer(_) => "pointer",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Enum(_) => "enum",
            Self::Bool(_) => "bool",
        }
    }

    /// Detach the value from any borrowed text.
    #[must_use]
    pub fn into_owned(self) -> ArgValue<'static> {
        match self {
            Self::Signed(v) => ArgValue::Signed(v),
            Self::Unsigned(v) => ArgValue::Unsigned(v),
            Self::Float(v) => ArgValue::Float(v),
            Self::Pointer(v) => ArgValue::Pointer(v),
            Self::Char(v) => ArgValue::Char(v),
            Self::Str(s) => ArgValue::Str(Cow::Owned(s.into_owned())),
            Self::Enum(v) => ArgValue::Enum(v),
            Self::Bool(v) => ArgValue::Bool(v),
        }
    }

    /// Wrap an enum discriminant.
    #[must_use]
    pub fn from_enum<E: AsFormatEnum>(value: E) -> Self {
        Self::Enum(value.discriminant())
    }
}

/// Fieldless enums that may be passed as arguments.
///
/// ```
/// use typefmt_core::{AsFormatEnum, ArgValue, format};
///
/// #[derive(Clone, Copy)]
/// enum Level { Low = 1, High = 7 }
///
/// impl AsFormatEnum for Level {
///     fn discriminant(self) -> i64 { self as i64 }
/// }
///
/// assert_eq!(format("%d", &[ArgValue::from_enum(Level::High)]), "7");
/// # let _ = Level::Low;
/// ```
pub trait AsFormatEnum: Copy {
    fn discriminant(self) -> i64;
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for ArgValue<'_> {
            fn from(v: $t) -> Self {
                Self::Signed(i64::from(v))
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for ArgValue<'_> {
            fn from(v: $t) -> Self {
                Self::Unsigned(u64::from(v))
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<isize> for ArgValue<'_> {
    fn from(v: isize) -> Self {
        // isize is at most 64 bits on every supported target.
        Self::Signed(v as i64)
    }
}

impl From<usize> for ArgValue<'_> {
    fn from(v: usize) -> Self {
        Self::Unsigned(v as u64)
    }
}

impl From<f32> for ArgValue<'_> {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for ArgValue<'_> {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ArgValue<'_> {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for ArgValue<'_> {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl<'a> From<&'a str> for ArgValue<'a> {
    fn from(v: &'a str) -> Self {
        Self::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for ArgValue<'a> {
    fn from(v: &'a String) -> Self {
        Self::Str(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for ArgValue<'_> {
    fn from(v: String) -> Self {
        Self::Str(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for ArgValue<'a> {
    fn from(v: Cow<'a, str>) -> Self {
        Self::Str(v)
    }
}

impl<T: ?Sized> From<*const T> for ArgValue<'_> {
    fn from(v: *const T) -> Self {
        Self::Pointer(v.cast::<()>().addr())
    }
}

impl<T: ?Sized> From<*mut T> for ArgValue<'_> {
    fn from(v: *mut T) -> Self {
        Self::Pointer(v.cast::<()>().addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_keep_their_signedness() {
        assert_eq!(ArgValue::from(-3_i8), ArgValue::Signed(-3));
        assert_eq!(ArgValue::from(200_u8), ArgValue::Unsigned(200));
        assert_eq!(ArgValue::from(u64::MAX), ArgValue::Unsigned(u64::MAX));
        assert_eq!(ArgValue::from(-1_isize), ArgValue::Signed(-1));
    }

    #[test]
    fn text_borrows_or_owns() {
        let owned = String::from("abc");
        assert!(matches!(ArgValue::from(&owned), ArgValue::Str(Cow::Borrowed("abc"))));
        assert!(matches!(ArgValue::from(owned), ArgValue::Str(Cow::Owned(_))));
    }

    #[test]
    fn pointers_become_addresses() {
        let x = 5_u32;
        let p: *const u32 = &x;
        assert_eq!(ArgValue::from(p), ArgValue::Pointer(p.addr()));
        let null: *const u8 = std::ptr::null();
        assert_eq!(ArgValue::from(null), ArgValue::Pointer(0));
    }

    #[test]
    fn type_names() {
        assert_eq!(ArgValue::Bool(true).type_name(), "bool");
        assert_eq!(ArgValue::from(1.5).type_name(), "double");
        assert_eq!(ArgValue::from("x").type_name(), "string");
    }

    #[test]
    fn into_owned_detaches() {
        let text = String::from("tmp");
        let owned: ArgValue<'static> = ArgValue::from(text.as_str()).into_owned();
        drop(text);
        assert_eq!(owned, ArgValue::Str(Cow::Owned("tmp".into())));
    }
}
