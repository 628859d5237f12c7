// File: ffi.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! C ABI wrapper around [`Engine`].
//!
//! The handle owns its engine, a single-threaded tokio runtime for the
//! blocking entry points, and the last error string. Every returned string
//! is heap-allocated and owned by the caller until `byprobe_string_free`.
//! Null pointer arguments are reported as `STATUS_INVALID_URL`, matching
//! the documented status table.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::engine::Engine;
use crate::error::{ProbeError, STATUS_INVALID_URL, STATUS_OOM, STATUS_SUCCESS};

static VERSION_CSTR: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
static INVALID_HANDLE_MSG: &[u8] = b"invalid engine pointer\0";

pub struct EngineHandle {
    engine: Engine,
    runtime: tokio::runtime::Runtime,
    last_error: CString,
}

impl EngineHandle {
    fn record_error(&mut self, err: &ProbeError) -> i32 {
        self.last_error = CString::new(err.to_string()).unwrap_or_default();
        err.status_code()
    }
}

unsafe fn read_str<'a>(ptr: *const c_char) -> std::borrow::Cow<'a, str> {
    CStr::from_ptr(ptr).to_string_lossy()
}

fn export_string(s: String, out: *mut *mut c_char) -> i32 {
    match CString::new(s) {
        Ok(cstring) => {
            unsafe { *out = cstring.into_raw() };
            STATUS_SUCCESS
        }
        // Interior NUL cannot happen with escaped report output; treat it
        // as an allocation-level failure rather than corrupting the ABI.
        Err(_) => STATUS_OOM,
    }
}

/// # Safety
/// The returned pointer must be released with `byprobe_engine_free`.
#[no_mangle]
pub extern "C" fn byprobe_engine_new() -> *mut EngineHandle {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(_) => return std::ptr::null_mut(),
    };

    Box::into_raw(Box::new(EngineHandle {
        engine: Engine::new(),
        runtime,
        last_error: CString::default(),
    }))
}

/// # Safety
/// `handle` must be a pointer returned by `byprobe_engine_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn byprobe_engine_free(handle: *mut EngineHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// # Safety
/// All pointers must be valid; `result_json` receives a caller-owned string.
#[no_mangle]
pub unsafe extern "C" fn byprobe_engine_scan(
    handle: *mut EngineHandle,
    url: *const c_char,
    config_json: *const c_char,
    result_json: *mut *mut c_char,
) -> i32 {
    let Some(handle) = handle.as_mut() else {
        return STATUS_INVALID_URL;
    };
    if url.is_null() || result_json.is_null() {
        return STATUS_INVALID_URL;
    }

    let url = read_str(url);
    let config = if config_json.is_null() {
        std::borrow::Cow::Borrowed("{}")
    } else {
        read_str(config_json)
    };

    match handle.engine.scan(&url, &config) {
        Ok(json) => export_string(json, result_json),
        Err(err) => handle.record_error(&err),
    }
}

/// # Safety
/// All pointers must be valid; `result_json` receives a caller-owned string.
#[no_mangle]
pub unsafe extern "C" fn byprobe_engine_test_technique(
    handle: *mut EngineHandle,
    url: *const c_char,
    technique_name: *const c_char,
    result_json: *mut *mut c_char,
) -> i32 {
    let Some(handle) = handle.as_mut() else {
        return STATUS_INVALID_URL;
    };
    if url.is_null() || technique_name.is_null() || result_json.is_null() {
        return STATUS_INVALID_URL;
    }

    let url = read_str(url);
    let technique = read_str(technique_name);

    match handle.engine.test_technique(&url, &technique) {
        Ok(json) => export_string(json, result_json),
        Err(err) => handle.record_error(&err),
    }
}

/// # Safety
/// All pointers must be valid; `result_json` receives a caller-owned string.
/// Blocks on network I/O for the duration of the probe.
#[no_mangle]
pub unsafe extern "C" fn byprobe_engine_test_variations(
    handle: *mut EngineHandle,
    base_url: *const c_char,
    config_json: *const c_char,
    result_json: *mut *mut c_char,
) -> i32 {
    let Some(handle) = handle.as_mut() else {
        return STATUS_INVALID_URL;
    };
    if base_url.is_null() || result_json.is_null() {
        return STATUS_INVALID_URL;
    }

    let url = read_str(base_url).into_owned();
    let config = if config_json.is_null() {
        "{}".to_string()
    } else {
        read_str(config_json).into_owned()
    };

    let outcome = handle
        .runtime
        .block_on(handle.engine.test_variations(&url, &config));

    match outcome {
        Ok(json) => export_string(json, result_json),
        Err(err) => handle.record_error(&err),
    }
}

/// # Safety
/// All pointers must be valid; `waf_info_json` receives a caller-owned
/// string.
#[no_mangle]
pub unsafe extern "C" fn byprobe_engine_detect_waf(
    handle: *mut EngineHandle,
    url: *const c_char,
    waf_info_json: *mut *mut c_char,
) -> i32 {
    let Some(handle) = handle.as_mut() else {
        return STATUS_INVALID_URL;
    };
    if url.is_null() || waf_info_json.is_null() {
        return STATUS_INVALID_URL;
    }

    let url = read_str(url);
    match handle.engine.detect_waf(&url) {
        Ok(json) => export_string(json, waf_info_json),
        Err(err) => handle.record_error(&err),
    }
}

/// # Safety
/// `ptr` must be a string previously returned by this library, or null.
#[no_mangle]
pub unsafe extern "C" fn byprobe_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

#[no_mangle]
pub extern "C" fn byprobe_version() -> *const c_char {
    VERSION_CSTR.as_ptr() as *const c_char
}

/// # Safety
/// `handle` must be a valid handle or null. The returned pointer stays
/// valid until the next engine call on the same handle.
#[no_mangle]
pub unsafe extern "C" fn byprobe_last_error(handle: *mut EngineHandle) -> *const c_char {
    match handle.as_ref() {
        Some(h) => h.last_error.as_ptr(),
        None => INVALID_HANDLE_MSG.as_ptr() as *const c_char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    unsafe fn take_string(ptr: *mut c_char) -> String {
        let s = CStr::from_ptr(ptr).to_string_lossy().into_owned();
        byprobe_string_free(ptr);
        s
    }

    #[test]
    fn null_handle_is_invalid_url_status() {
        let url = c("http://x/a");
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe {
            byprobe_engine_scan(ptr::null_mut(), url.as_ptr(), ptr::null(), &mut out)
        };
        assert_eq!(code, STATUS_INVALID_URL);
        assert!(out.is_null());
    }

    #[test]
    fn scan_round_trip_over_the_abi() {
        let handle = byprobe_engine_new();
        assert!(!handle.is_null());

        let url = c("http://x/admin");
        let config = c("{}");
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe {
            byprobe_engine_scan(handle, url.as_ptr(), config.as_ptr(), &mut out)
        };
        assert_eq!(code, STATUS_SUCCESS);

        let json = unsafe { take_string(out) };
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["variations"][0], "/admin/");

        unsafe { byprobe_engine_free(handle) };
    }

    #[test]
    fn invalid_url_sets_last_error() {
        let handle = byprobe_engine_new();
        let url = c("http://:bad/");
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe {
            byprobe_engine_scan(handle, url.as_ptr(), ptr::null(), &mut out)
        };
        assert_eq!(code, STATUS_INVALID_URL);

        let err = unsafe { CStr::from_ptr(byprobe_last_error(handle)) };
        assert!(!err.to_bytes().is_empty());

        unsafe { byprobe_engine_free(handle) };
    }

    #[test]
    fn unknown_technique_is_success_with_empty_list() {
        let handle = byprobe_engine_new();
        let url = c("http://x/a");
        let technique = c("nonesuch");
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe {
            byprobe_engine_test_technique(handle, url.as_ptr(), technique.as_ptr(), &mut out)
        };
        assert_eq!(code, STATUS_SUCCESS);

        let json = unsafe { take_string(out) };
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["variations"].as_array().unwrap().len(), 0);

        unsafe { byprobe_engine_free(handle) };
    }

    #[test]
    fn detect_waf_stub_over_the_abi() {
        let handle = byprobe_engine_new();
        let url = c("http://x/");
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { byprobe_engine_detect_waf(handle, url.as_ptr(), &mut out) };
        assert_eq!(code, STATUS_SUCCESS);
        let json = unsafe { take_string(out) };
        assert_eq!(json, "{\"type\":\"unknown\",\"confidence\":0.0}");
        unsafe { byprobe_engine_free(handle) };
    }

    #[test]
    fn version_is_nul_terminated_package_version() {
        let version = unsafe { CStr::from_ptr(byprobe_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn null_handle_last_error_message() {
        let err = unsafe { CStr::from_ptr(byprobe_last_error(ptr::null_mut())) };
        assert_eq!(err.to_str().unwrap(), "invalid engine pointer");
    }
}
