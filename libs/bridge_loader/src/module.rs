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

use crate::error::{BridgeError, Result};
use crate::library_loader::LoadedLibrary;
use bridge_abi::{NativeMethodTable, RegisterNativesFn, REGISTER_NATIVES_SYMBOL};
use log::{debug, trace};
use std::{
    collections::HashMap,
    ffi::{c_void, CStr},
    path::{Path, PathBuf},
    ptr::NonNull,
};

/// Address of a function exported by a loaded module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFn(NonNull<c_void>);

// SAFETY: code addresses are valid on every thread for as long as the module stays mapped.
unsafe impl Send for NativeFn {}
// SAFETY: see above.
unsafe impl Sync for NativeFn {}

impl NativeFn {
    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// A native module mapped into the process.
///
/// Only the registry creates these, so holding one proves that loading succeeded.
pub struct LoadedModule {
    name: String,
    path: PathBuf,
    /// Functions the module registered at load time. `None` if it exports no table.
    natives: Option<HashMap<String, NativeFn>>,
    library: LoadedLibrary,
}

impl LoadedModule {
    /// Maps the artifact at `path` and reads its registration table.
    pub(crate) fn open(name: &str, path: &Path) -> Result<Self> {
        let load_error = |reason: String| BridgeError::Load {
            name: name.to_owned(),
            path: path.to_path_buf(),
            reason,
        };

        // SAFETY: the artifact comes from the application's own library directories and its
        // initialization routines are the application's responsibility.
        let library =
            unsafe { LoadedLibrary::new(path) }.map_err(|e| load_error(format!("{e:#}")))?;
        // SAFETY: a module exporting REGISTER_NATIVES_SYMBOL implements it with the
        // `RegisterNativesFn` signature.
        let natives = unsafe { read_registration_table(&library) }.map_err(load_error)?;
        if let Some(natives) = &natives {
            debug!("Native module {} registered {} functions", name, natives.len());
        }

        Ok(Self { name: name.to_owned(), path: path.to_path_buf(), natives, library })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_registration_table(&self) -> bool {
        self.natives.is_some()
    }

    /// Names in the registration table, sorted.
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.natives.iter().flat_map(|natives| natives.keys().map(String::as_str)).collect();
        names.sort_unstable();
        names
    }

    /// Looks `symbol` up in the module's dynamic symbol table.
    pub fn find_symbol(&self, symbol: &str) -> Result<NativeFn> {
        match self.library.find_symbol(symbol) {
            Ok(address) => {
                trace!("Bound {} in {}", symbol, self.name);
                Ok(NativeFn(address))
            }
            Err(e) => {
                debug!("{:#}", e);
                Err(self.symbol_error(symbol))
            }
        }
    }

    /// Looks `function` up in the table registered at load time.
    pub fn registered(&self, function: &str) -> Result<NativeFn> {
        self.natives
            .as_ref()
            .and_then(|natives| natives.get(function))
            .copied()
            .inspect(|_| trace!("Bound registered {} in {}", function, self.name))
            .ok_or_else(|| self.symbol_error(function))
    }

    fn symbol_error(&self, symbol: &str) -> BridgeError {
        BridgeError::SymbolResolution { module: self.name.clone(), symbol: symbol.to_owned() }
    }
}

impl std::fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModule")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("registered", &self.registered_names())
            .finish_non_exhaustive()
    }
}

/// # Safety
///
/// If the library exports [`REGISTER_NATIVES_SYMBOL`] it must have the `RegisterNativesFn`
/// signature and return a table that stays valid while the library is mapped.
unsafe fn read_registration_table(
    library: &LoadedLibrary,
) -> std::result::Result<Option<HashMap<String, NativeFn>>, String> {
    let address = library.lookup(REGISTER_NATIVES_SYMBOL).map_err(|e| format!("{e:#}"))?;
    let Some(address) = address else {
        return Ok(None);
    };
    // SAFETY: guaranteed by the caller, see the function contract.
    let register: RegisterNativesFn = unsafe { std::mem::transmute(address.as_ptr()) };
    // SAFETY: the function takes no arguments.
    let table = unsafe { register() };
    // SAFETY: the table is either null or valid while the library is mapped.
    let Some(table) = (unsafe { table.as_ref() }) else {
        return Err(format!("{REGISTER_NATIVES_SYMBOL} returned a null table"));
    };
    // SAFETY: as above.
    unsafe { collect_methods(table) }.map(Some)
}

/// # Safety
///
/// `table.methods` must point to `table.len` initialized entries whose names are valid C strings.
unsafe fn collect_methods(
    table: &NativeMethodTable,
) -> std::result::Result<HashMap<String, NativeFn>, String> {
    if table.len == 0 {
        return Ok(HashMap::new());
    }
    if table.methods.is_null() {
        return Err("registration table has entries but no storage".to_owned());
    }
    // SAFETY: guaranteed by the caller.
    let methods = unsafe { std::slice::from_raw_parts(table.methods, table.len) };
    let mut natives = HashMap::with_capacity(methods.len());
    for (index, method) in methods.iter().enumerate() {
        if method.name.is_null() {
            return Err(format!("registration entry {index} has no name"));
        }
        // SAFETY: non-null names are valid C strings per the contract.
        let name = unsafe { CStr::from_ptr(method.name) }
            .to_str()
            .map_err(|_| format!("registration entry {index} has a non UTF-8 name"))?;
        let func = NonNull::new(method.func.cast_mut())
            .ok_or_else(|| format!("registered function {name} is null"))?;
        if natives.insert(name.to_owned(), NativeFn(func)).is_some() {
            return Err(format!("function {name} is registered twice"));
        }
    }
    Ok(natives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_abi::NativeMethod;
    use std::ffi::c_char;

    extern "C" fn one() -> *const c_char {
        c"one".as_ptr()
    }

    extern "C" fn two() -> *const c_char {
        c"two".as_ptr()
    }

    fn table(methods: &[NativeMethod]) -> NativeMethodTable {
        NativeMethodTable { methods: methods.as_ptr(), len: methods.len() }
    }

    #[test]
    fn collects_named_functions() {
        let methods = [
            NativeMethod { name: c"one".as_ptr(), func: one as *const c_void },
            NativeMethod { name: c"two".as_ptr(), func: two as *const c_void },
        ];
        // SAFETY: the table describes the live array above.
        let natives = unsafe { collect_methods(&table(&methods)) }.unwrap();
        assert_eq!(natives.len(), 2);
        assert_eq!(natives["one"].as_ptr() as *const c_void, one as *const c_void);
    }

    #[test]
    fn rejects_duplicates_and_nulls() {
        let duplicated = [
            NativeMethod { name: c"one".as_ptr(), func: one as *const c_void },
            NativeMethod { name: c"one".as_ptr(), func: two as *const c_void },
        ];
        // SAFETY: the table describes the live array above.
        let err = unsafe { collect_methods(&table(&duplicated)) }.unwrap_err();
        assert!(err.contains("registered twice"));

        let null_func = [NativeMethod { name: c"one".as_ptr(), func: std::ptr::null() }];
        // SAFETY: as above.
        assert!(unsafe { collect_methods(&table(&null_func)) }.is_err());

        let null_name = [NativeMethod { name: std::ptr::null(), func: one as *const c_void }];
        // SAFETY: as above.
        assert!(unsafe { collect_methods(&table(&null_name)) }.is_err());
    }

    #[test]
    fn empty_table_is_accepted() {
        let empty = NativeMethodTable { methods: std::ptr::null(), len: 0 };
        // SAFETY: no entries are read.
        assert!(unsafe { collect_methods(&empty) }.unwrap().is_empty());
    }
}
