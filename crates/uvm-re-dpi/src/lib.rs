//! DPI-C entry points for the uvm-re regex cache.
//!
//! A SystemVerilog simulator imports these three functions through its DPI
//! foreign-function layer:
//!
//! ```sv
//! import "DPI-C" function int uvm_re_match(string re, string str);
//! import "DPI-C" function void uvm_dump_re_cache();
//! import "DPI-C" function string uvm_glob_to_re(string glob);
//! ```
//!
//! All three consult the process-wide [`GLOBAL_CACHE`]. Status codes for
//! [`uvm_re_match`] follow the POSIX `regexec` convention of zero meaning
//! "matched", with the nonzero space split so a compile failure is
//! distinguishable from a clean no-match:
//!
//! - [`MATCHED`] (0): the subject matched the pattern,
//! - [`NO_MATCH`] (1): valid pattern, subject did not match,
//! - [`COMPILE_ERROR`] (-1): the pattern failed to compile, or an
//!   argument was null.
//!
//! [`uvm_glob_to_re`] returns a `malloc`-allocated buffer; ownership
//! transfers to the caller, who releases it with C `free`.

use std::ffi::CStr;
use std::io::{self, Write as _};
use std::ptr;

use libc::{c_char, c_int};
use uvm_re::{GLOBAL_CACHE, glob_to_re};

/// Subject matched the pattern.
pub const MATCHED: c_int = 0;

/// Valid pattern, subject did not match.
pub const NO_MATCH: c_int = 1;

/// Pattern failed to compile, or an argument was null.
pub const COMPILE_ERROR: c_int = -1;

/// Match a subject string against a regular expression.
///
/// `re` may be wrapped in `/` on both ends to mark it as a regular
/// expression; the delimiters are stripped before the cache lookup. Globs
/// must be translated with [`uvm_glob_to_re`] first.
///
/// A compile failure emits the `regex compiler: invalid glob or regular
/// expression: |<pattern>|` diagnostic through the cache's error channel
/// and returns [`COMPILE_ERROR`]; the bad pattern is not cached.
///
/// # Safety
///
/// `re` and `s` must each be null or point to a NUL-terminated string that
/// stays valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_re_match(re: *const c_char, s: *const c_char) -> c_int {
    if re.is_null() || s.is_null() {
        return COMPILE_ERROR;
    }

    // SAFETY: both pointers are non-null NUL-terminated strings per the
    // caller contract.
    let re = unsafe { CStr::from_ptr(re) }.to_string_lossy();
    let s = unsafe { CStr::from_ptr(s) }.to_string_lossy();

    match GLOBAL_CACHE.match_re(&re, &s) {
        Ok(true) => MATCHED,
        Ok(false) => NO_MATCH,
        Err(_) => COMPILE_ERROR,
    }
}

/// Write the cache's diagnostic listing to standard output.
///
/// The listing names every cached pattern in its stripped form, one per
/// line with a zero-based index, between ` -- re cache dump --` and
/// ` -- end --` marker lines. A failed stdout write (reader gone) is
/// discarded; this entry point never takes down the host process.
#[unsafe(no_mangle)]
pub extern "C" fn uvm_dump_re_cache() {
    // Not print!: that panics on a broken stdout, and an unwind out of an
    // extern "C" fn aborts the host simulator.
    let _ = io::stdout().write_all(GLOBAL_CACHE.dump().as_bytes());
}

/// Translate a glob into an anchored, `/`-delimited regular expression.
///
/// Null passes through as null. Every non-null return is a freshly
/// `malloc`-allocated NUL-terminated buffer; ownership transfers to the
/// caller, who must release it with C `free`. Re-translating a returned
/// string yields an equal string, so repeated calls are benign.
///
/// # Safety
///
/// `glob` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn uvm_glob_to_re(glob: *const c_char) -> *mut c_char {
    if glob.is_null() {
        return ptr::null_mut();
    }

    // SAFETY: non-null NUL-terminated string per the caller contract.
    let glob = unsafe { CStr::from_ptr(glob) }.to_string_lossy();
    c_string_dup(&glob_to_re(&glob))
}

/// Copy a string into a `malloc`-backed NUL-terminated buffer.
///
/// `malloc` rather than a `CString` so the simulator side can release the
/// buffer with plain `free`. Returns null if the allocation fails.
fn c_string_dup(s: &str) -> *mut c_char {
    let len = s.len();

    // SAFETY: the buffer is len + 1 bytes; we copy len bytes from a valid
    // string and write the terminator into the final byte.
    unsafe {
        let buf = libc::malloc(len + 1).cast::<c_char>();
        if buf.is_null() {
            return ptr::null_mut();
        }
        ptr::copy_nonoverlapping(s.as_ptr().cast::<c_char>(), buf, len);
        *buf.add(len) = 0;
        buf
    }
}
