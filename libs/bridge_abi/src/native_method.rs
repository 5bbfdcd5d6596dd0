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

use crate::input::InputEventRecord;
use std::ffi::{c_char, c_int, c_void};

/// Symbol a module exports to hand its registration table to the loader.
pub const REGISTER_NATIVES_SYMBOL: &str = "bridge_register_natives";

/// Status returned by C ABI exports on success.
pub const STATUS_OK: c_int = 0;
/// Status returned by C ABI exports when an argument is null or malformed.
pub const STATUS_INVALID_ARGUMENT: c_int = -1;
/// Status returned when a well-formed request has no effect, e.g. an unknown D-pad direction.
pub const STATUS_IGNORED: c_int = 1;

/// Export the host drains queued input events through. Not part of the registration table.
pub const POLL_INPUT_EVENT_SYMBOL: &str = "bridge_poll_input_event";
/// Export reporting whether the module expects text input.
pub const IME_ENABLED_SYMBOL: &str = "bridge_ime_enabled";

/// Signature of the text entry point.
///
/// The returned pointer refers to a NUL-terminated UTF-8 string owned by the module. It stays
/// valid for as long as the module is mapped and must not be freed by the caller.
pub type StringFromBridgeFn = unsafe extern "C" fn() -> *const c_char;

/// Signature of the share path hand-off. `path` must be a valid NUL-terminated string.
pub type SetSharePathFn = unsafe extern "C" fn(path: *const c_char) -> c_int;

/// Signature of the D-pad hand-off. `dir` is a [`crate::DpadKey`] code, `pressed` is 0 on
/// release.
pub type SendDpadFn = unsafe extern "C" fn(dir: c_int, pressed: c_int) -> c_int;

/// Signature of the text-input request. `enable` is 0 to disable.
pub type RequestTextInputFn = unsafe extern "C" fn(enable: c_int) -> c_int;

/// Signature of [`POLL_INPUT_EVENT_SYMBOL`]. Returns 1 and fills `event` when an event was
/// queued, 0 when the queue is empty and [`STATUS_INVALID_ARGUMENT`] when `event` is null.
pub type PollInputEventFn = unsafe extern "C" fn(event: *mut InputEventRecord) -> c_int;

/// Signature of [`IME_ENABLED_SYMBOL`]. Returns 1 while text input is enabled.
pub type ImeEnabledFn = unsafe extern "C" fn() -> c_int;

/// Signature of [`REGISTER_NATIVES_SYMBOL`]. The table must stay valid while the module is
/// mapped.
pub type RegisterNativesFn = unsafe extern "C" fn() -> *const NativeMethodTable;

/// One registered function, the native counterpart of `JNINativeMethod`.
#[repr(C)]
#[derive(Debug)]
pub struct NativeMethod {
    /// NUL-terminated function name, e.g. `stringFromBridge`.
    pub name: *const c_char,
    pub func: *const c_void,
}

// SAFETY: both pointers refer to immutable data with static lifetime inside the module.
unsafe impl Sync for NativeMethod {}

/// The table returned by [`REGISTER_NATIVES_SYMBOL`].
#[repr(C)]
#[derive(Debug)]
pub struct NativeMethodTable {
    pub methods: *const NativeMethod,
    pub len: usize,
}

// SAFETY: see `NativeMethod`.
unsafe impl Sync for NativeMethodTable {}
