//! Format string scanning and specifier parsing.
//!
//! Grammar of one specifier:
//!
//! ```text
//! specifier   := '%' [ argindex ] flags [ width ] [ '.' precision ] [ length ] conv
//! argindex    := digits '$'
//! flags       := { '-' | '+' | ' ' | '0' | '#' }
//! width       := digits | '*' [ argindex ]
//! precision   := digits | '*' [ argindex ]
//! length      := 'hh' | 'h' | 'll' | 'l' | 'z' | 't'
//! conv        := 'd' | 'i' | 'o' | 'u' | 'x' | 'X' | 'a' | 'A' | 'e' | 'E'
//!              | 'f' | 'F' | 'g' | 'G' | 'c' | 's' | 'p' | '%'
//! ```
//!
//! Argument indices are 1-based in the text and 0-based everywhere else.
//! The length modifier is recorded for inspection only; rendering always
//! works on 64-bit values.

use crate::error::FormatError;

/// Upper bound for literal and argument-supplied widths/precisions.
pub const MAX_FIELD: usize = 4096;

// ---------------------------------------------------------------------------
// Specifier types
// ---------------------------------------------------------------------------

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width or precision field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    None,
    Literal(usize),
    /// `*`: take the next sequential argument.
    NextArg,
    /// `*N$`: take argument `N - 1`.
    Arg(usize),
}

/// Length modifier. Parsed and then ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthHint {
    Hh,
    H,
    L,
    Ll,
    Z,
    T,
}

/// Conversion letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Char,          // c
    Decimal,       // d
    Integer,       // i
    Octal,         // o
    Unsigned,      // u
    HexLower,      // x
    HexUpper,      // X
    HexFloatLower, // a
    HexFloatUpper, // A
    ExpLower,      // e
    ExpUpper,      // E
    FixedLower,    // f
    FixedUpper,    // F
    GeneralLower,  // g
    GeneralUpper,  // G
    Pointer,       // p
    Str,           // s
    Percent,       // %
}

/// The value category a conversion letter asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantic {
    Char,
    Signed,
    Unsigned,
    Double,
    Pointer,
    Text,
    /// Literal `%`; consumes no value argument.
    Percent,
}

impl Semantic {
    /// Name used in conversion errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Signed => "signed integer",
            Self::Unsigned => "unsigned integer",
            Self::Double => "double",
            Self::Pointer => "pointer",
            Self::Text => "string",
            Self::Percent => "percent",
        }
    }
}

impl Conversion {
    #[must_use]
    pub fn from_letter(letter: u8) -> Option<Self> {
        let conv = match letter {
            b'c' => Self::Char,
            b'd' => Self::Decimal,
            b'i' => Self::Integer,
            b'o' => Self::Octal,
            b'u' => Self::Unsigned,
            b'x' => Self::HexLower,
            b'X' => Self::HexUpper,
            b'a' => Self::HexFloatLower,
            b'A' => Self::HexFloatUpper,
            b'e' => Self::ExpLower,
            b'E' => Self::ExpUpper,
            b'f' => Self::FixedLower,
            b'F' => Self::FixedUpper,
            b'g' => Self::GeneralLower,
            b'G' => Self::GeneralUpper,
            b'p' => Self::Pointer,
            b's' => Self::Str,
            b'%' => Self::Percent,
            _ => return None,
        };
        Some(conv)
    }

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Char => 'c',
            Self::Decimal => 'd',
            Self::Integer => 'i',
            Self::Octal => 'o',
            Self::Unsigned => 'u',
            Self::HexLower => 'x',
            Self::HexUpper => 'X',
            Self::HexFloatLower => 'a',
            Self::HexFloatUpper => 'A',
            Self::ExpLower => 'e',
            Self::ExpUpper => 'E',
            Self::FixedLower => 'f',
            Self::FixedUpper => 'F',
            Self::GeneralLower => 'g',
            Self::GeneralUpper => 'G',
            Self::Pointer => 'p',
            Self::Str => 's',
            Self::Percent => '%',
        }
    }

    #[must_use]
    pub const fn semantic(self) -> Semantic {
        match self {
            Self::Char => Semantic::Char,
            Self::Decimal | Self::Integer => Semantic::Signed,
            Self::Octal | Self::Unsigned | Self::HexLower | Self::HexUpper => Semantic::Unsigned,
            Self::HexFloatLower
            | Self::HexFloatUpper
            | Self::ExpLower
            | Self::ExpUpper
            | Self::FixedLower
            | Self::FixedUpper
            | Self::GeneralLower
            | Self::GeneralUpper => Semantic::Double,
            Self::Pointer => Semantic::Pointer,
            Self::Str => Semantic::Text,
            Self::Percent => Semantic::Percent,
        }
    }

    /// Upper-case variants print `INF`, `0X`, `E`, `P` and upper-case digits.
    #[must_use]
    pub const fn is_upper(self) -> bool {
        matches!(
            self,
            Self::HexUpper
                | Self::HexFloatUpper
                | Self::ExpUpper
                | Self::FixedUpper
                | Self::GeneralUpper
        )
    }

    /// Conversions rendered through a 64-bit integer.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self.semantic(), Semantic::Signed | Semantic::Unsigned)
    }
}

/// A parsed `%...letter` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specifier {
    /// 0-based argument for the value; `None` means the next sequential one.
    pub explicit_index: Option<usize>,
    pub flags: Flags,
    pub width: Count,
    pub precision: Count,
    pub length_hint: Option<LengthHint>,
    pub conversion: Conversion,
}

/// A piece of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text to copy verbatim.
    Literal(&'a str),
    /// `%%`.
    Percent,
    Spec(Specifier),
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Cursor over a format string that yields [`Segment`]s.
///
/// After an error the cursor stays on the offending byte so callers can
/// report where parsing stopped.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    format: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(format: &'a str) -> Self {
        Self { format, pos: 0 }
    }

    /// Byte offset of the next unread character.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Return the next segment, or `None` at the end of the format string.
    pub fn next_segment(&mut self) -> Result<Option<Segment<'a>>, FormatError> {
        let bytes = self.format.as_bytes();
        let len = bytes.len();
        if self.pos >= len {
            return Ok(None);
        }

        if bytes[self.pos] != b'%' {
            let start = self.pos;
            let end = self.format[start..]
                .find('%')
                .map_or(len, |offset| start + offset);
            self.pos = end;
            return Ok(Some(Segment::Literal(&self.format[start..end])));
        }

        // Skip the '%'.
        self.pos += 1;
        if bytes.get(self.pos) == Some(&b'%') {
            self.pos += 1;
            return Ok(Some(Segment::Percent));
        }
        let spec = parse_specifier(bytes, &mut self.pos)?;
        Ok(Some(Segment::Spec(spec)))
    }
}

/// Split a whole format string into segments.
pub fn parse_format_string(format: &str) -> Result<Vec<Segment<'_>>, FormatError> {
    let mut scanner = Scanner::new(format);
    let mut segments = Vec::new();
    while let Some(segment) = scanner.next_segment()? {
        segments.push(segment);
    }
    Ok(segments)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse one specifier. `pos` points at the first byte after `%` and is left
/// after the conversion letter on success, or on the offending byte on error.
pub fn parse_specifier(fmt: &[u8], pos: &mut usize) -> Result<Specifier, FormatError> {
    let explicit_index = read_argument_index(fmt, pos)?;

    // --- flags ---
    let mut flags = Flags::default();
    while let Some(&c) = fmt.get(*pos) {
        match c {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        *pos += 1;
    }

    // --- width ---
    let width = read_count(fmt, pos)?;

    // --- precision ---
    let precision = if fmt.get(*pos) == Some(&b'.') {
        *pos += 1;
        match read_count(fmt, pos)? {
            // A bare '.' means precision zero.
            Count::None => Count::Literal(0),
            count => count,
        }
    } else {
        Count::None
    };

    let length_hint = read_length_hint(fmt, pos);

    // --- conversion ---
    let Some(&letter) = fmt.get(*pos) else {
        return Err(FormatError::invalid("unterminated format specifier"));
    };
    let Some(conversion) = Conversion::from_letter(letter) else {
        return Err(FormatError::invalid(format!(
            "unsupported format conversion: '{}'",
            char_at(fmt, *pos)
        )));
    };
    *pos += 1;

    Ok(Specifier {
        explicit_index,
        flags,
        width,
        precision,
        length_hint,
        conversion,
    })
}

/// `digits '$'` at the start of a specifier. Digits not followed by `$` are
/// left for flag and width parsing.
fn read_argument_index(fmt: &[u8], pos: &mut usize) -> Result<Option<usize>, FormatError> {
    let digits = count_digits(fmt, *pos);
    if digits == 0 || fmt.get(*pos + digits) != Some(&b'$') {
        return Ok(None);
    }
    let index = parse_decimal(&fmt[*pos..*pos + digits]);
    if index == 0 {
        return Err(FormatError::invalid("argument index must be at least 1"));
    }
    *pos += digits + 1;
    Ok(Some(index - 1))
}

/// Width or precision body: digits, `*`, or `*N$`.
fn read_count(fmt: &[u8], pos: &mut usize) -> Result<Count, FormatError> {
    if fmt.get(*pos) == Some(&b'*') {
        *pos += 1;
        let digits = count_digits(fmt, *pos);
        if digits == 0 {
            return Ok(Count::NextArg);
        }
        let index = parse_decimal(&fmt[*pos..*pos + digits]);
        *pos += digits;
        if fmt.get(*pos) != Some(&b'$') {
            return Err(FormatError::invalid("expected '$' after argument index of '*' field"));
        }
        if index == 0 {
            return Err(FormatError::invalid("argument index must be at least 1"));
        }
        *pos += 1;
        return Ok(Count::Arg(index - 1));
    }

    let digits = count_digits(fmt, *pos);
    if digits == 0 {
        return Ok(Count::None);
    }
    let value = parse_decimal(&fmt[*pos..*pos + digits]).min(MAX_FIELD);
    *pos += digits;
    Ok(Count::Literal(value))
}

fn read_length_hint(fmt: &[u8], pos: &mut usize) -> Option<LengthHint> {
    let first = *fmt.get(*pos)?;
    let doubled = fmt.get(*pos + 1) == Some(&first);
    let (hint, width) = match (first, doubled) {
        (b'h', true) => (LengthHint::Hh, 2),
        (b'h', false) => (LengthHint::H, 1),
        (b'l', true) => (LengthHint::Ll, 2),
        (b'l', false) => (LengthHint::L, 1),
        (b'z', _) => (LengthHint::Z, 1),
        (b't', _) => (LengthHint::T, 1),
        _ => return None,
    };
    *pos += width;
    Some(hint)
}

fn count_digits(fmt: &[u8], start: usize) -> usize {
    fmt.get(start..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

fn parse_decimal(digits: &[u8]) -> usize {
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add(usize::from(d - b'0'));
    }
    result
}

/// The (possibly multi-byte) character starting at `pos`, for messages.
fn char_at(fmt: &[u8], pos: usize) -> char {
    fmt.get(pos..)
        .and_then(|rest| {
            let end = rest.len().min(4);
            (1..=end).find_map(|n| core::str::from_utf8(&rest[..n]).ok())
        })
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
