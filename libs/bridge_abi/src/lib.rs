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

//! # Bridge ABI
//!
//! Everything both sides of the native boundary have to agree on: the exported function
//! signatures, the registration table layout and the rules used to derive export names.
//!
//! The host never links against the native module. It only relies on the definitions here.

/// D-pad and text-input events.
pub mod input;
/// `#[repr(C)]` layouts and function signatures crossing the boundary.
pub mod native_method;
/// Deterministic derivation of exported symbol names.
pub mod symbol;

pub use input::{DpadKey, InputEvent, InputEventRecord};
pub use native_method::{
    ImeEnabledFn, NativeMethod, NativeMethodTable, PollInputEventFn, RegisterNativesFn,
    RequestTextInputFn, SendDpadFn, SetSharePathFn, StringFromBridgeFn, IME_ENABLED_SYMBOL,
    POLL_INPUT_EVENT_SYMBOL, REGISTER_NATIVES_SYMBOL, STATUS_IGNORED, STATUS_INVALID_ARGUMENT,
    STATUS_OK,
};
pub use symbol::{mangle, ExportOwner, BRIDGE_PREFIX, JNI_PREFIX};

/// Function name of the text entry point.
pub const STRING_FROM_BRIDGE: &str = "stringFromBridge";
/// Function name of the share path hand-off.
pub const SET_SHARE_PATH: &str = "setSharePath";
/// Function name of the D-pad hand-off.
pub const SEND_DPAD: &str = "sendDpad";
/// Function name of the text-input request.
pub const REQUEST_TEXT_INPUT: &str = "requestTextInput";
/// Name of the text entry point as seen by a JVM host.
pub const STRING_FROM_JNI: &str = "stringFromJNI";
/// Name of the share path hand-off as seen by a JVM host.
pub const NATIVE_SET_SHARE_PATH: &str = "nativeSetSharePath";
/// Name of the D-pad hand-off as seen by a JVM host.
pub const NATIVE_SEND_DPAD: &str = "nativeSendDpad";
/// Name of the text-input request as seen by a JVM host.
pub const NATIVE_REQUEST_TEXT_INPUT: &str = "nativeRequestTextInput";

/// Namespace of the type owning the entry point.
pub const DEFAULT_NAMESPACE: &str = "com.openmsx.openmsx4android";
/// Type owning the entry point.
pub const DEFAULT_TYPE_NAME: &str = "MainActivity";
/// Namespace of the SDL activity receiving the share path on a JVM host.
pub const SDL_NAMESPACE: &str = "org.libsdl.app";
/// SDL activity receiving the share path on a JVM host.
pub const SDL_TYPE_NAME: &str = "OpenMSX4AndroidSDLActivity";
