// Copyright (C) 2025 The Android Open Source Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Bridge native module
//!
//! Built as a `cdylib` and loaded by the host at start-up. Every entry point is reachable three
//! ways: by its derived C ABI name, through the registration table returned by
//! `bridge_register_natives`, and, for a JVM host, by its JNI name.

#![allow(non_snake_case)]

use bridge_abi::{
    InputEventRecord, NativeMethod, NativeMethodTable, STATUS_IGNORED, STATUS_INVALID_ARGUMENT,
    STATUS_OK,
};
use log::LevelFilter;
use std::{
    ffi::{c_char, c_int, c_void, CStr, OsStr},
    os::unix::ffi::OsStrExt,
    path::PathBuf,
    sync::Once,
};

mod input;
mod jni_exports;
mod share_path;

pub use input::{ime_enabled, poll_event, MAX_QUEUED_EVENTS};
pub use share_path::share_path;

/// Text returned by the entry point.
pub const GREETING: &str = "Hello from Rust";

const GREETING_CSTR: &CStr = c"Hello from Rust";

static NATIVE_METHODS: [NativeMethod; 4] = [
    NativeMethod {
        name: c"stringFromBridge".as_ptr(),
        func: Bridge_com_openmsx_openmsx4android_MainActivity_stringFromBridge as *const c_void,
    },
    NativeMethod {
        name: c"setSharePath".as_ptr(),
        func: Bridge_com_openmsx_openmsx4android_MainActivity_setSharePath as *const c_void,
    },
    NativeMethod {
        name: c"sendDpad".as_ptr(),
        func: Bridge_com_openmsx_openmsx4android_MainActivity_sendDpad as *const c_void,
    },
    NativeMethod {
        name: c"requestTextInput".as_ptr(),
        func: Bridge_com_openmsx_openmsx4android_MainActivity_requestTextInput as *const c_void,
    },
];

static NATIVE_METHOD_TABLE: NativeMethodTable =
    NativeMethodTable { methods: NATIVE_METHODS.as_ptr(), len: NATIVE_METHODS.len() };

pub(crate) fn init_logging() {
    static LOGGER: Once = Once::new();
    LOGGER.call_once(|| bridge_loader::logging::init("bridge_native", LevelFilter::Info));
}

/// Hands the registration table to the loader. Called once, right after the module is mapped.
#[no_mangle]
pub extern "C" fn bridge_register_natives() -> *const NativeMethodTable {
    init_logging();
    &NATIVE_METHOD_TABLE
}

/// Returns the greeting. The string is static and must not be freed.
#[no_mangle]
pub extern "C" fn Bridge_com_openmsx_openmsx4android_MainActivity_stringFromBridge(
) -> *const c_char {
    GREETING_CSTR.as_ptr()
}

/// Stores the share directory.
///
/// # Safety
///
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn Bridge_com_openmsx_openmsx4android_MainActivity_setSharePath(
    path: *const c_char,
) -> c_int {
    if path.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    // SAFETY: non-null and NUL-terminated per the function contract.
    let path = unsafe { CStr::from_ptr(path) };
    if path.is_empty() {
        return STATUS_INVALID_ARGUMENT;
    }
    share_path::set(PathBuf::from(OsStr::from_bytes(path.to_bytes())));
    STATUS_OK
}

/// Copies the stored share path into `buf` when it fits, including the NUL terminator.
///
/// Returns the path length in bytes without the terminator, or -1 when no path is set. A
/// return value of `capacity` or more means nothing was written.
///
/// # Safety
///
/// `buf` must be null or valid for writes of `capacity` bytes.
#[no_mangle]
pub unsafe extern "C" fn bridge_copy_share_path(buf: *mut c_char, capacity: usize) -> isize {
    let Some(path) = share_path() else {
        return -1;
    };
    let bytes = path.as_os_str().as_bytes();
    if !buf.is_null() && bytes.len() < capacity {
        // SAFETY: `buf` holds at least `bytes.len() + 1` bytes per the function contract.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), bytes.len());
            *buf.add(bytes.len()) = 0;
        }
    }
    isize::try_from(bytes.len()).unwrap_or(isize::MAX)
}

/// Queues a D-pad press (`pressed` non-zero) or release and turns text input off.
///
/// Returns `STATUS_IGNORED` when `dir` names no key.
#[no_mangle]
pub extern "C" fn Bridge_com_openmsx_openmsx4android_MainActivity_sendDpad(
    dir: c_int,
    pressed: c_int,
) -> c_int {
    if input::send_dpad(dir, pressed != 0) {
        STATUS_OK
    } else {
        STATUS_IGNORED
    }
}

/// Queues a request to enable (`enable` non-zero) or disable text input.
#[no_mangle]
pub extern "C" fn Bridge_com_openmsx_openmsx4android_MainActivity_requestTextInput(
    enable: c_int,
) -> c_int {
    if input::request_text_input(enable != 0) {
        STATUS_OK
    } else {
        STATUS_IGNORED
    }
}

/// Moves the oldest queued input event into `event`.
///
/// # Safety
///
/// `event` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn bridge_poll_input_event(event: *mut InputEventRecord) -> c_int {
    if event.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    match input::poll_event() {
        Some(next) => {
            // SAFETY: non-null and writable per the function contract.
            unsafe { event.write(next.to_record()) };
            1
        }
        None => 0,
    }
}

#[no_mangle]
pub extern "C" fn bridge_ime_enabled() -> c_int {
    c_int::from(input::ime_enabled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::{drain, QUEUE_LOCK};
    use bridge_abi::{
        DpadKey, ExportOwner, InputEvent, DEFAULT_NAMESPACE, DEFAULT_TYPE_NAME,
        REQUEST_TEXT_INPUT, SEND_DPAD, SET_SHARE_PATH, STRING_FROM_BRIDGE,
    };
    use std::sync::PoisonError;

    #[test]
    fn entry_point_returns_greeting() {
        let text = Bridge_com_openmsx_openmsx4android_MainActivity_stringFromBridge();
        // SAFETY: the entry point returns a static C string.
        assert_eq!(unsafe { CStr::from_ptr(text) }.to_str().unwrap(), GREETING);
        assert_eq!(GREETING_CSTR.to_str().unwrap(), GREETING);
    }

    #[test]
    fn export_names_match_derivation() {
        let owner = ExportOwner::new(DEFAULT_NAMESPACE, DEFAULT_TYPE_NAME);
        assert_eq!(
            owner.bridge_symbol(STRING_FROM_BRIDGE),
            "Bridge_com_openmsx_openmsx4android_MainActivity_stringFromBridge"
        );
        assert_eq!(
            owner.bridge_symbol(SET_SHARE_PATH),
            "Bridge_com_openmsx_openmsx4android_MainActivity_setSharePath"
        );
        assert_eq!(
            owner.bridge_symbol(SEND_DPAD),
            "Bridge_com_openmsx_openmsx4android_MainActivity_sendDpad"
        );
        assert_eq!(
            owner.bridge_symbol(REQUEST_TEXT_INPUT),
            "Bridge_com_openmsx_openmsx4android_MainActivity_requestTextInput"
        );
    }

    #[test]
    fn registration_table_lists_every_entry_point() {
        // SAFETY: the table is a static with `len` entries.
        let table = unsafe { &*bridge_register_natives() };
        // SAFETY: as above.
        let methods = unsafe { std::slice::from_raw_parts(table.methods, table.len) };
        let names: Vec<&str> = methods
            .iter()
            // SAFETY: names are static C strings.
            .map(|method| unsafe { CStr::from_ptr(method.name) }.to_str().unwrap())
            .collect();
        let expected = [STRING_FROM_BRIDGE, SET_SHARE_PATH, SEND_DPAD, REQUEST_TEXT_INPUT];
        assert_eq!(names, expected);
        assert!(methods.iter().all(|method| !method.func.is_null()));
    }

    #[test]
    fn rejects_null_and_empty_share_paths() {
        // SAFETY: null is explicitly allowed.
        let status = unsafe {
            Bridge_com_openmsx_openmsx4android_MainActivity_setSharePath(std::ptr::null())
        };
        assert_eq!(status, STATUS_INVALID_ARGUMENT);
        // SAFETY: a valid, empty C string.
        let status =
            unsafe { Bridge_com_openmsx_openmsx4android_MainActivity_setSharePath(c"".as_ptr()) };
        assert_eq!(status, STATUS_INVALID_ARGUMENT);
    }

    #[test]
    fn copies_share_path_when_it_fits() {
        let path = c"/storage/emulated/0/Android/media/openmsx/share";
        // SAFETY: a valid C string.
        let status = unsafe {
            Bridge_com_openmsx_openmsx4android_MainActivity_setSharePath(path.as_ptr())
        };
        assert_eq!(status, STATUS_OK);

        let len = path.to_bytes().len();
        // SAFETY: a null buffer only queries the length.
        assert_eq!(unsafe { bridge_copy_share_path(std::ptr::null_mut(), 0) }, len as isize);

        let mut small = [1 as c_char; 4];
        // SAFETY: `small` holds 4 bytes.
        let copied = unsafe { bridge_copy_share_path(small.as_mut_ptr(), small.len()) };
        assert_eq!(copied, len as isize);
        assert_eq!(small, [1; 4]);

        let mut buf = vec![0 as c_char; len + 1];
        // SAFETY: `buf` holds `len + 1` bytes.
        assert_eq!(unsafe { bridge_copy_share_path(buf.as_mut_ptr(), buf.len()) }, len as isize);
        // SAFETY: the copy is NUL-terminated.
        assert_eq!(unsafe { CStr::from_ptr(buf.as_ptr()) }, path);
    }

    #[test]
    fn dpad_export_reports_ignored_directions() {
        let _guard = QUEUE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        assert_eq!(Bridge_com_openmsx_openmsx4android_MainActivity_sendDpad(9, 1), STATUS_IGNORED);
        assert_eq!(Bridge_com_openmsx_openmsx4android_MainActivity_sendDpad(5, 1), STATUS_OK);
        assert_eq!(Bridge_com_openmsx_openmsx4android_MainActivity_requestTextInput(1), STATUS_OK);
        assert_eq!(bridge_ime_enabled(), 0);

        let mut record = InputEventRecord::default();
        // SAFETY: `record` is a valid, writable record.
        assert_eq!(unsafe { bridge_poll_input_event(&mut record) }, 1);
        assert_eq!(
            InputEvent::from_record(&record),
            Some(InputEvent::Key { key: DpadKey::Space, pressed: true })
        );
        // SAFETY: as above.
        assert_eq!(unsafe { bridge_poll_input_event(&mut record) }, 1);
        assert_eq!(InputEvent::from_record(&record), Some(InputEvent::TextInput { enabled: true }));
        // SAFETY: as above.
        assert_eq!(unsafe { bridge_poll_input_event(&mut record) }, 0);
        // SAFETY: null is explicitly allowed.
        let status = unsafe { bridge_poll_input_event(std::ptr::null_mut()) };
        assert_eq!(status, STATUS_INVALID_ARGUMENT);
    }
}
