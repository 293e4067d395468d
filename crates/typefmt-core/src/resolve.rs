//! Argument lookup.

use crate::error::FormatError;
use crate::value::ArgValue;

/// Fetch the argument at 0-based `index`.
pub fn resolve<'v, 'a>(
    index: usize,
    args: &'v [ArgValue<'a>],
) -> Result<&'v ArgValue<'a>, FormatError> {
    args.get(index).ok_or(FormatError::IndexOutOfRange {
        requested: index,
        available: args.len(),
    })
}

/// The sequential argument counter of one formatting call.
///
/// Every `*` field and every value without an explicit `N$` index takes the
/// next position. Explicit indices never read or move the counter, so in
/// `"%2$s %s"` the second specifier still takes argument 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    next: usize,
}

impl Cursor {
    /// Take the next sequential index.
    pub fn advance(&mut self) -> usize {
        let index = self.next;
        self.next = self.next.saturating_add(1);
        index
    }

    /// The index [`Cursor::advance`] would return.
    #[must_use]
    pub fn peek(&self) -> usize {
        self.next
    }

    /// Use `explicit` if present, otherwise advance.
    pub fn pick(&mut self, explicit: Option<usize>) -> usize {
        match explicit {
            Some(index) => index,
            None => self.advance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_range() {
        let args = [ArgValue::Signed(1), ArgValue::Signed(2)];
        assert_eq!(resolve(1, &args).unwrap(), &ArgValue::Signed(2));
    }

    #[test]
    fn out_of_range_reports_count() {
        let args = [ArgValue::from("only-one")];
        let err = resolve(1, &args).unwrap_err();
        assert_eq!(
            err,
            FormatError::IndexOutOfRange {
                requested: 1,
                available: 1
            }
        );
        assert!(resolve(0, &[]).is_err());
    }

    #[test]
    fn explicit_indices_leave_cursor_alone() {
        let mut cursor = Cursor::default();
        assert_eq!(cursor.pick(Some(4)), 4);
        assert_eq!(cursor.peek(), 0);
        assert_eq!(cursor.pick(None), 0);
        assert_eq!(cursor.pick(Some(0)), 0);
        assert_eq!(cursor.pick(None), 1);
    }
}
