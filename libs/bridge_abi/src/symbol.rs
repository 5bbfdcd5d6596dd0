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

use std::fmt::Write;

/// Prefix the JNI uses when it resolves a native method by name.
pub const JNI_PREFIX: &str = "Java";
/// Prefix of plain C ABI exports called by a native host.
pub const BRIDGE_PREFIX: &str = "Bridge";

/// The namespace and type an exported function belongs to.
///
/// Together with a prefix and a function name this fully determines the exported symbol, so a
/// host can find the function with a plain `dlsym` and no registration step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportOwner {
    /// Dot separated namespace, e.g. `com.openmsx.openmsx4android`. May be empty.
    pub namespace: String,
    /// Simple name of the declaring type.
    pub type_name: String,
}

impl ExportOwner {
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), type_name: type_name.into() }
    }

    /// Derives `<prefix>_<namespace>_<type>_<function>` with every component mangled.
    pub fn symbol(&self, prefix: &str, function: &str) -> String {
        let mut out = String::with_capacity(
            prefix.len() + self.namespace.len() + self.type_name.len() + function.len() + 3,
        );
        out.push_str(prefix);
        out.push('_');
        if !self.namespace.is_empty() {
            mangle_into(&self.namespace, &mut out);
            out.push('_');
        }
        mangle_into(&self.type_name, &mut out);
        out.push('_');
        mangle_into(function, &mut out);
        out
    }

    /// Symbol a JVM looks up for the native method `function`.
    pub fn jni_symbol(&self, function: &str) -> String {
        self.symbol(JNI_PREFIX, function)
    }

    /// Symbol a native host looks up for the C ABI export `function`.
    pub fn bridge_symbol(&self, function: &str) -> String {
        self.symbol(BRIDGE_PREFIX, function)
    }

    /// Binary class name as expected by `FindClass`, e.g. `com/example/Foo`.
    pub fn class_path(&self) -> String {
        if self.namespace.is_empty() {
            return self.type_name.clone();
        }
        format!("{}/{}", self.namespace.replace('.', "/"), self.type_name)
    }
}

/// Mangles a single name component following the JNI rules.
pub fn mangle(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    mangle_into(name, &mut out);
    out
}

fn mangle_into(name: &str, out: &mut String) {
    for unit in name.encode_utf16() {
        match u8::try_from(unit) {
            Ok(b) if b.is_ascii_alphanumeric() => out.push(char::from(b)),
            Ok(b'.' | b'/') => out.push('_'),
            Ok(b'_') => out.push_str("_1"),
            Ok(b';') => out.push_str("_2"),
            Ok(b'[') => out.push_str("_3"),
            // Writing to a String never fails.
            _ => {
                let _ = write!(out, "_0{unit:04x}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_jni_symbol_of_main_activity() {
        let owner = ExportOwner::new("com.openmsx.openmsx4android", "MainActivity");
        assert_eq!(
            owner.jni_symbol("stringFromJNI"),
            "Java_com_openmsx_openmsx4android_MainActivity_stringFromJNI"
        );
        assert_eq!(
            owner.bridge_symbol("stringFromBridge"),
            "Bridge_com_openmsx_openmsx4android_MainActivity_stringFromBridge"
        );
    }

    #[test]
    fn escapes_underscores_and_special_characters() {
        assert_eq!(mangle("init_android"), "init_1android");
        assert_eq!(mangle("a;b[c"), "a_2b_3c");
        assert_eq!(mangle("caf\u{e9}"), "caf_000e9");
        assert_eq!(mangle("a$b"), "a_00024b");
    }

    #[test]
    fn empty_namespace_is_skipped() {
        let owner = ExportOwner::new("", "Top");
        assert_eq!(owner.jni_symbol("run"), "Java_Top_run");
        assert_eq!(owner.class_path(), "Top");
    }

    #[test]
    fn class_path_uses_slashes() {
        let owner = ExportOwner::new("org.libsdl.app", "OpenMSX4AndroidSDLActivity");
        assert_eq!(owner.class_path(), "org/libsdl/app/OpenMSX4AndroidSDLActivity");
    }

    #[test]
    fn distinct_owners_never_collide() {
        let a = ExportOwner::new("a_b", "C");
        let b = ExportOwner::new("a.b", "C");
        assert_ne!(a.jni_symbol("f"), b.jni_symbol("f"));
    }
}
