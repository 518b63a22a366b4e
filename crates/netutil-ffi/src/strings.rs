//! Strings handed across the boundary.
//!
//! Allocated with `malloc` so a C caller may release them with `free()`, or
//! with `NetutilFreeString`. Never reused once handed out.

use libc::c_char;
use netutil_error::{MarshalError, MarshalResult};
use std::ffi::CStr;
use std::ptr;

/// Copies `s` into a fresh NUL-terminated `malloc` allocation.
///
/// An interior NUL ends the string as seen from C.
pub fn alloc_c_string(s: &str) -> MarshalResult<*mut c_char> {
    let bytes = s.as_bytes();
    let len = bytes.len() + 1;
    // SAFETY: len > 0; the allocation is checked before use.
    let buf = unsafe { libc::malloc(len) } as *mut u8;
    if buf.is_null() {
        return Err(MarshalError::Alloc(len));
    }
    // SAFETY: `buf` holds `len` bytes and does not overlap `bytes`.
    unsafe {
        ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
        *buf.add(bytes.len()) = 0;
    }
    Ok(buf.cast())
}

/// # Safety
/// `ptr` must be null or come from [`alloc_c_string`] (or C `malloc`), and
/// must not be used afterwards.
pub unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        libc::free(ptr.cast());
    }
}

/// Frees the string in `slot` and nulls it.
///
/// # Safety
/// Same as [`free_c_string`].
pub unsafe fn release(slot: &mut *mut c_char) {
    free_c_string(*slot);
    *slot = ptr::null_mut();
}

/// # Safety
/// `ptr` must be null or a valid NUL-terminated string.
pub unsafe fn read_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}
