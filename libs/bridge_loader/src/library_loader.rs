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

use anyhow::{Context, Result};
use std::{
    ffi::{c_void, CString},
    os::unix::ffi::OsStrExt,
    path::Path,
    ptr::NonNull,
};

macro_rules! bail_with_dlerror {
    ($fmt:literal $(, $($arg:tt)+)?) => {
        {
            // SAFETY: trivially safe.
            let error = unsafe { libc::dlerror() };
            if !error.is_null() {
                // SAFETY: `error` is a pointer to a valid C string returned by `dlerror()`.
                let error_cstr = unsafe { std::ffi::CStr::from_ptr(error) };
                let dl_error_msg = error_cstr.to_string_lossy();

                anyhow::bail!(
                    concat!($fmt, ": {}"),
                    $($($arg)+,)?
                    dl_error_msg
                );
            } else {
                anyhow::bail!($fmt $(, $($arg)+)?);
            }
        }
    };
}

/// LoadedLibrary represents a library loaded to the memory space of the process.
pub struct LoadedLibrary {
    library_handle: NonNull<c_void>,
}

// SAFETY: a dlopen handle is process-wide and `dlsym` may be called from any thread.
unsafe impl Send for LoadedLibrary {}
// SAFETY: see above. The handle is never mutated after construction.
unsafe impl Sync for LoadedLibrary {}

impl LoadedLibrary {
    /// Load the library at `path` to the process memory space. All relocations are processed
    /// immediately so that missing dependencies are reported here rather than on first call.
    ///
    /// # Safety
    ///
    /// Users must ensure that the initialization and termination routines of the library are safe.
    pub unsafe fn new(path: &Path) -> Result<Self> {
        let library =
            CString::new(path.as_os_str().as_bytes()).context("Invalid library path")?;

        // Drop any stale error so the message reported below belongs to this call.
        // SAFETY: trivially safe.
        unsafe { libc::dlerror() };

        // SAFETY: `library` is a valid C string. The caller ensured that the library is safe to
        // be loaded.
        let library_handle =
            unsafe { libc::dlopen(library.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        match NonNull::new(library_handle) {
            Some(library_handle) => Ok(Self { library_handle }),
            None => bail_with_dlerror!("Failed to open the library {}", path.display()),
        }
    }

    /// Look up `symbol_name`, returning `None` when the library does not export it.
    pub fn lookup(&self, symbol_name: &str) -> Result<Option<NonNull<c_void>>> {
        let symbol = CString::new(symbol_name).context("Invalid symbol name")?;
        // SAFETY: `self.library_handle` is a valid library handle and `symbol` is a valid C
        // string.
        let symbol_handle = unsafe { libc::dlsym(self.library_handle.as_ptr(), symbol.as_ptr()) };
        Ok(NonNull::new(symbol_handle))
    }

    pub fn find_symbol(&self, symbol_name: &str) -> Result<NonNull<c_void>> {
        // SAFETY: trivially safe.
        unsafe { libc::dlerror() };
        match self.lookup(symbol_name)? {
            Some(symbol) => Ok(symbol),
            None => bail_with_dlerror!("Failed to find the symbol {}", symbol_name),
        }
    }
}

impl Drop for LoadedLibrary {
    fn drop(&mut self) {
        // SAFETY: the instance owns a valid handle to the opened library. The termination routine
        // is ensured to be safe.
        unsafe { libc::dlclose(self.library_handle.as_ptr()) };
    }
}
