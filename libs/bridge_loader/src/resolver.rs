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

//! Maps a symbolic module name to the artifact on disk.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use log::debug;
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::PathBuf;

/// Checks that `name` is a bare symbolic name rather than a path.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains(['/', '\\']) {
        "name contains a path separator"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else if name == "." || name == ".." {
        "name is a relative directory"
    } else {
        return Ok(());
    };
    Err(BridgeError::InvalidName { name: name.to_owned(), reason })
}

/// File name of the artifact for `name`, e.g. `libbridge.so`.
pub fn artifact_file_name(name: &str) -> String {
    format!("{DLL_PREFIX}{name}{DLL_SUFFIX}")
}

/// Resolves symbolic module names against an ordered list of directories.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    search_paths: Vec<PathBuf>,
    abi: Option<String>,
}

impl ModuleResolver {
    pub fn new(search_paths: Vec<PathBuf>, abi: Option<String>) -> Self {
        Self { search_paths, abi }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.search_paths.clone(), config.effective_abi())
    }

    /// Every path checked for `name`, in order. Each search directory contributes its
    /// `lib/<abi>` sub-directory first and then itself.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let file_name = artifact_file_name(name);
        let mut candidates = Vec::with_capacity(self.search_paths.len() * 2);
        for dir in &self.search_paths {
            if let Some(abi) = &self.abi {
                candidates.push(dir.join("lib").join(abi).join(&file_name));
            }
            candidates.push(dir.join(&file_name));
        }
        candidates
    }

    /// Returns the first existing artifact for `name`.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let candidates = self.candidates(name);
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                debug!("Resolved native module {} to {}", name, path.display());
                Ok(path.clone())
            }
            None => {
                Err(BridgeError::ModuleNotFound { name: name.to_owned(), searched: candidates })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &std::path::Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", "../bridge", "lib/bridge", "a\\b", "nul\0", ".", ".."] {
            let err = validate_name(name).unwrap_err();
            assert_eq!(err.kind(), BridgeErrorKind::InvalidName, "{name:?}");
        }
        validate_name("openmsx4android").unwrap();
    }

    #[test]
    fn absent_module_lists_every_candidate() {
        let dir = TempDir::new().unwrap();
        let resolver =
            ModuleResolver::new(vec![dir.path().to_path_buf()], Some("arm64-v8a".into()));
        match resolver.resolve("bridge").unwrap_err() {
            BridgeError::ModuleNotFound { name, searched } => {
                assert_eq!(name, "bridge");
                assert_eq!(
                    searched,
                    vec![
                        dir.path().join("lib/arm64-v8a").join(artifact_file_name("bridge")),
                        dir.path().join(artifact_file_name("bridge")),
                    ]
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn abi_directory_wins_over_plain_directory() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join(artifact_file_name("bridge"));
        let abi = dir.path().join("lib/x86_64").join(artifact_file_name("bridge"));
        touch(&plain);
        touch(&abi);

        let resolver = ModuleResolver::new(vec![dir.path().to_path_buf()], Some("x86_64".into()));
        assert_eq!(resolver.resolve("bridge").unwrap(), abi);

        let resolver = ModuleResolver::new(vec![dir.path().to_path_buf()], None);
        assert_eq!(resolver.resolve("bridge").unwrap(), plain);
    }

    #[test]
    fn earlier_search_path_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        touch(&first.path().join(artifact_file_name("bridge")));
        touch(&second.path().join(artifact_file_name("bridge")));

        let resolver = ModuleResolver::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            None,
        );
        assert!(resolver.resolve("bridge").unwrap().starts_with(first.path()));
    }

    #[test]
    fn directories_are_not_artifacts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(artifact_file_name("bridge"))).unwrap();
        let resolver = ModuleResolver::new(vec![dir.path().to_path_buf()], None);
        assert_eq!(resolver.resolve("bridge").unwrap_err().kind(), BridgeErrorKind::ModuleNotFound);
    }
}
