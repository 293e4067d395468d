//! The formatting driver.
//!
//! [`Formatter`] walks the format string segment by segment. Literal text is
//! copied; each specifier goes through resolve, convert and render, and the
//! rendered text is appended only once the whole specifier succeeded.

use crate::convert::{self, Renderable};
use crate::error::FormatError;
use crate::render::{NativeBackend, RenderBackend, SubFormat};
use crate::resolve::{Cursor, resolve};
use crate::spec::{Count, MAX_FIELD, Scanner, Segment, Semantic, Specifier};
use crate::value::ArgValue;

/// One format string bound to a render backend.
///
/// A `Formatter` can be parsed any number of times; every call to
/// [`Formatter::parse`] starts from scratch with a fresh sequential cursor
/// and an empty output buffer.
#[derive(Debug, Clone)]
pub struct Formatter<'f, B = NativeBackend> {
    format: &'f str,
    backend: B,
    output: String,
    position: usize,
}

impl<'f> Formatter<'f> {
    /// Formatter using the [`NativeBackend`].
    #[must_use]
    pub fn new(format: &'f str) -> Self {
        Self::with_backend(format, NativeBackend)
    }
}

impl<'f, B: RenderBackend> Formatter<'f, B> {
    #[must_use]
    pub fn with_backend(format: &'f str, backend: B) -> Self {
        Self {
            format,
            backend,
            output: String::new(),
            position: 0,
        }
    }

    /// Format `args` into the output buffer.
    ///
    /// On error the buffer holds the text produced before the failing
    /// specifier and [`Formatter::position`] is the byte offset where
    /// processing stopped.
    pub fn parse(&mut self, args: &[ArgValue<'_>]) -> Result<(), FormatError> {
        self.output.clear();
        self.output.reserve(self.format.len());
        self.position = 0;

        let mut scanner = Scanner::new(self.format);
        let mut cursor = Cursor::default();
        loop {
            let segment = scanner.next_segment();
            self.position = scanner.position();
            match segment? {
                None => return Ok(()),
                Some(Segment::Literal(text)) => self.output.push_str(text),
                Some(Segment::Percent) => self.output.push('%'),
                Some(Segment::Spec(spec)) => {
                    let mark = self.output.len();
                    if let Err(err) = self.apply(&spec, args, &mut cursor) {
                        self.output.truncate(mark);
                        return Err(err);
                    }
                }
            }
        }
    }

    /// Text produced by the last [`Formatter::parse`].
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    /// Byte offset into the format string reached by the last parse.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Resolve, convert and render one specifier. Fields are read in textual
    /// order: width, precision, then the value.
    fn apply(
        &mut self,
        spec: &Specifier,
        args: &[ArgValue<'_>],
        cursor: &mut Cursor,
    ) -> Result<(), FormatError> {
        let mut flags = spec.flags;

        let width = match read_count(spec.width, args, cursor)? {
            Some(w) if w < 0 => {
                // A negative `*` width means left-justify.
                flags.left_justify = true;
                Some(w.unsigned_abs())
            }
            Some(w) => Some(w.unsigned_abs()),
            None => None,
        };
        let precision = match read_count(spec.precision, args, cursor)? {
            Some(p) if p < 0 => None,
            Some(p) => Some(p.unsigned_abs()),
            None => None,
        };

        let semantic = spec.conversion.semantic();
        if semantic == Semantic::Percent {
            self.output.push('%');
            return Ok(());
        }

        let index = cursor.pick(spec.explicit_index);
        let value = resolve(index, args)?;
        let renderable: Renderable<'_> = convert::convert(value, semantic)?;

        let sub = SubFormat::new(
            flags,
            clamp_field(width.unwrap_or(0)),
            precision.map(clamp_field),
            spec.conversion,
        );
        self.backend.render(&sub, &renderable, &mut self.output)
    }
}

/// Value of a width or precision field, reading `*` arguments as needed.
fn read_count(
    count: Count,
    args: &[ArgValue<'_>],
    cursor: &mut Cursor,
) -> Result<Option<i64>, FormatError> {
    let index = match count {
        Count::None => return Ok(None),
        Count::Literal(n) => return Ok(Some(n as i64)),
        Count::NextArg => cursor.advance(),
        Count::Arg(i) => i,
    };
    convert::to_count(resolve(index, args)?).map(Some)
}

fn clamp_field(n: u64) -> usize {
    usize::try_from(n).map_or(MAX_FIELD, |n| n.min(MAX_FIELD))
}
