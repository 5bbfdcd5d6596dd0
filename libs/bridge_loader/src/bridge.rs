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

use crate::config::SymbolStrategy;
use crate::error::{BridgeError, Result};
use crate::module::{LoadedModule, NativeFn};
use bridge_abi::{
    ExportOwner, ImeEnabledFn, InputEvent, InputEventRecord, PollInputEventFn, RequestTextInputFn,
    SendDpadFn, SetSharePathFn, StringFromBridgeFn, IME_ENABLED_SYMBOL, POLL_INPUT_EVENT_SYMBOL,
    REQUEST_TEXT_INPUT, SEND_DPAD, SET_SHARE_PATH, STATUS_IGNORED, STATUS_OK, STRING_FROM_BRIDGE,
};
use log::trace;
use std::{
    ffi::{c_int, CStr, CString},
    os::unix::ffi::OsStrExt,
    path::Path,
    sync::{Arc, OnceLock},
};

type Binding = OnceLock<Result<NativeFn>>;

/// The entry points of a loaded native module.
///
/// A bridge is built from an `Arc<LoadedModule>`, which only a successful load produces, so
/// nothing can be invoked before the module is loaded. Each symbol is resolved on its first
/// use. The outcome, success or failure, is kept for every later call.
pub struct NativeBridge {
    module: Arc<LoadedModule>,
    owner: ExportOwner,
    strategy: SymbolStrategy,
    string_from_bridge: Binding,
    set_share_path: Binding,
    send_dpad: Binding,
    request_text_input: Binding,
    poll_input_event: Binding,
    ime_enabled: Binding,
}

impl NativeBridge {
    pub fn new(module: Arc<LoadedModule>, owner: ExportOwner, strategy: SymbolStrategy) -> Self {
        Self {
            module,
            owner,
            strategy,
            string_from_bridge: OnceLock::new(),
            set_share_path: OnceLock::new(),
            send_dpad: OnceLock::new(),
            request_text_input: OnceLock::new(),
            poll_input_event: OnceLock::new(),
            ime_enabled: OnceLock::new(),
        }
    }

    pub fn module(&self) -> &LoadedModule {
        &self.module
    }

    pub fn owner(&self) -> &ExportOwner {
        &self.owner
    }

    pub fn strategy(&self) -> SymbolStrategy {
        self.strategy
    }

    /// Name the entry point `function` is looked up under with the current strategy.
    pub fn symbol_name(&self, function: &str) -> String {
        match self.strategy {
            SymbolStrategy::Derived => self.owner.bridge_symbol(function),
            SymbolStrategy::Registered => function.to_owned(),
        }
    }

    /// Resolves the entry point `function` once, with the configured strategy.
    fn bind(&self, binding: &Binding, function: &str) -> Result<NativeFn> {
        binding
            .get_or_init(|| match self.strategy {
                SymbolStrategy::Derived => {
                    self.module.find_symbol(&self.owner.bridge_symbol(function))
                }
                SymbolStrategy::Registered => self.module.registered(function),
            })
            .clone()
    }

    /// Resolves a fixed export once. These never go through the registration table.
    fn bind_export(&self, binding: &Binding, symbol: &str) -> Result<NativeFn> {
        binding.get_or_init(|| self.module.find_symbol(symbol)).clone()
    }

    /// Calls the module's text entry point and copies the result into an owned string.
    pub fn string_from_bridge(&self) -> Result<String> {
        let address = self.bind(&self.string_from_bridge, STRING_FROM_BRIDGE)?;
        // SAFETY: the module exports this function with the `StringFromBridgeFn` signature,
        // that is the contract of the bridge ABI.
        let func = unsafe { std::mem::transmute::<*mut _, StringFromBridgeFn>(address.as_ptr()) };

        // SAFETY: the function takes no arguments and the module is kept mapped by `self.module`.
        let text = unsafe { func() };
        if text.is_null() {
            let symbol = self.symbol_name(STRING_FROM_BRIDGE);
            return Err(self.invalid_return(symbol, "null pointer".to_owned()));
        }
        // SAFETY: non-null results point to a NUL-terminated string owned by the module.
        let text = unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned();
        trace!("{} returned {} bytes", STRING_FROM_BRIDGE, text.len());
        Ok(text)
    }

    /// Hands the writable share directory to the module.
    pub fn set_share_path(&self, path: &Path) -> Result<()> {
        let path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            BridgeError::InvalidArgument(format!("share path {} contains NUL", path.display()))
        })?;
        let address = self.bind(&self.set_share_path, SET_SHARE_PATH)?;
        // SAFETY: the module exports this function with the `SetSharePathFn` signature.
        let func = unsafe { std::mem::transmute::<*mut _, SetSharePathFn>(address.as_ptr()) };

        // SAFETY: `path` is a valid C string that outlives the call.
        let status = unsafe { func(path.as_ptr()) };
        self.expect_ok(SET_SHARE_PATH, status)
    }

    /// Sends a press or release of D-pad direction `dir`, numbered as in [`bridge_abi::DpadKey`].
    ///
    /// Returns false when the module ignored the direction.
    pub fn send_dpad(&self, dir: i32, pressed: bool) -> Result<bool> {
        let address = self.bind(&self.send_dpad, SEND_DPAD)?;
        // SAFETY: the module exports this function with the `SendDpadFn` signature.
        let func = unsafe { std::mem::transmute::<*mut _, SendDpadFn>(address.as_ptr()) };

        // SAFETY: plain integer arguments.
        match unsafe { func(dir, c_int::from(pressed)) } {
            STATUS_IGNORED => Ok(false),
            status => self.expect_ok(SEND_DPAD, status).map(|()| true),
        }
    }

    /// Asks the module to start or stop text input.
    pub fn request_text_input(&self, enable: bool) -> Result<()> {
        let address = self.bind(&self.request_text_input, REQUEST_TEXT_INPUT)?;
        // SAFETY: the module exports this function with the `RequestTextInputFn` signature.
        let func = unsafe { std::mem::transmute::<*mut _, RequestTextInputFn>(address.as_ptr()) };

        // SAFETY: plain integer argument.
        let status = unsafe { func(c_int::from(enable)) };
        self.expect_ok(REQUEST_TEXT_INPUT, status)
    }

    /// Takes the oldest input event the module has queued.
    pub fn poll_input_event(&self) -> Result<Option<InputEvent>> {
        let address = self.bind_export(&self.poll_input_event, POLL_INPUT_EVENT_SYMBOL)?;
        // SAFETY: the module exports this function with the `PollInputEventFn` signature.
        let func = unsafe { std::mem::transmute::<*mut _, PollInputEventFn>(address.as_ptr()) };

        let mut record = InputEventRecord::default();
        // SAFETY: `record` is valid for writes for the duration of the call.
        match unsafe { func(&mut record) } {
            0 => Ok(None),
            1 => InputEvent::from_record(&record).map(Some).ok_or_else(|| {
                self.invalid_return(POLL_INPUT_EVENT_SYMBOL.to_owned(), format!("{record:?}"))
            }),
            status => Err(self
                .invalid_return(POLL_INPUT_EVENT_SYMBOL.to_owned(), format!("status {status}"))),
        }
    }

    /// Whether the module currently expects text input.
    pub fn ime_enabled(&self) -> Result<bool> {
        let address = self.bind_export(&self.ime_enabled, IME_ENABLED_SYMBOL)?;
        // SAFETY: the module exports this function with the `ImeEnabledFn` signature.
        let func = unsafe { std::mem::transmute::<*mut _, ImeEnabledFn>(address.as_ptr()) };
        // SAFETY: the function takes no arguments.
        Ok(unsafe { func() } != 0)
    }

    fn expect_ok(&self, function: &str, status: c_int) -> Result<()> {
        if status != STATUS_OK {
            return Err(self.invalid_return(self.symbol_name(function), format!("status {status}")));
        }
        Ok(())
    }

    fn invalid_return(&self, symbol: String, reason: String) -> BridgeError {
        BridgeError::InvalidReturn { module: self.module.name().to_owned(), symbol, reason }
    }
}
