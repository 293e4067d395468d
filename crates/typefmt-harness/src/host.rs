//! Render backend that delegates to the host C library's `snprintf`.
//!
//! Used for parity checks: every normalized sub-format is printed by the
//! host with exactly one argument of the matching C type. Field widths are
//! counted in bytes by C, so non-ASCII text is expected to diverge.

use std::ffi::{CString, c_char, c_void};

use typefmt_core::{FormatError, RenderBackend, Renderable, SubFormat};

/// First attempt buffer; longer results are retried at their exact size.
const INITIAL_BUFFER: usize = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostBackend;

impl RenderBackend for HostBackend {
    fn render(
        &self,
        sub: &SubFormat,
        value: &Renderable<'_>,
        out: &mut String,
    ) -> Result<(), FormatError> {
        let directive = sub.to_string();
        let fail = |message: &str| FormatError::backend(directive.clone(), message);
        let fmt = CString::new(directive.as_str()).map_err(|_| fail("directive contains NUL"))?;

        let text = match value {
            Renderable::Signed(v) => host_format(|buf, len| {
                // SAFETY: `buf` is valid for `len` bytes and the directive
                // takes exactly one `long long`.
                unsafe { libc::snprintf(buf, len, fmt.as_ptr(), *v as libc::c_longlong) }
            }),
            Renderable::Unsigned(v) => host_format(|buf, len| {
                // SAFETY: one `unsigned long long` argument.
                unsafe { libc::snprintf(buf, len, fmt.as_ptr(), *v as libc::c_ulonglong) }
            }),
            Renderable::Double(v) => host_format(|buf, len| {
                // SAFETY: one `double` argument.
                unsafe { libc::snprintf(buf, len, fmt.as_ptr(), *v as libc::c_double) }
            }),
            Renderable::Pointer(addr) => host_format(|buf, len| {
                // SAFETY: `%p` only prints the address; it is never dereferenced.
                unsafe { libc::snprintf(buf, len, fmt.as_ptr(), *addr as *const c_void) }
            }),
            Renderable::Char(c) => {
                let byte = u8::try_from(u32::from(*c))
                    .ok()
                    .filter(u8::is_ascii)
                    .ok_or_else(|| fail("non-ASCII char has no single-byte C form"))?;
                host_format(|buf, len| {
                    // SAFETY: `%c` takes an `int`.
                    unsafe { libc::snprintf(buf, len, fmt.as_ptr(), libc::c_int::from(byte)) }
                })
            }
            Renderable::Text(s) => {
                let arg = CString::new(s.as_bytes()).map_err(|_| fail("text contains NUL"))?;
                host_format(|buf, len| {
                    // SAFETY: `arg` is a live NUL-terminated string.
                    unsafe { libc::snprintf(buf, len, fmt.as_ptr(), arg.as_ptr()) }
                })
            }
        };

        match text {
            Ok(bytes) => {
                let s = String::from_utf8(bytes).map_err(|_| fail("host output is not UTF-8"))?;
                out.push_str(&s);
                Ok(())
            }
            Err(message) => Err(fail(message)),
        }
    }
}

/// Run `call(buf, len)` until the whole result fits; `call` returns what
/// `snprintf` returns.
fn host_format(
    mut call: impl FnMut(*mut c_char, usize) -> libc::c_int,
) -> Result<Vec<u8>, &'static str> {
    let mut buf = vec![0u8; INITIAL_BUFFER];
    loop {
        let written = call(buf.as_mut_ptr().cast::<c_char>(), buf.len());
        let needed = usize::try_from(written).map_err(|_| "snprintf reported an error")?;
        if needed < buf.len() {
            buf.truncate(needed);
            return Ok(buf);
        }
        buf.resize(needed + 1, 0);
    }
}
