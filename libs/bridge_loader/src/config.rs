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

//! Bridge configuration, read from TOML and the environment.

use crate::error::{BridgeError, Result};
use bridge_abi::{ExportOwner, DEFAULT_NAMESPACE, DEFAULT_TYPE_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable holding extra search directories, separated like `PATH`.
pub const LIBRARY_PATH_ENV: &str = "BRIDGE_LIBRARY_PATH";

/// Symbolic name of the module loaded when nothing else is configured.
pub const DEFAULT_MODULE: &str = "bridge";

/// How an entry point is located inside a loaded module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolStrategy {
    /// `dlsym` on the name derived from the owner and the function name.
    #[default]
    Derived,
    /// Look the function up in the table the module registered at load time.
    Registered,
}

impl FromStr for SymbolStrategy {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "derived" => Ok(SymbolStrategy::Derived),
            "registered" => Ok(SymbolStrategy::Registered),
            other => Err(BridgeError::Config(format!("unknown symbol strategy {other:?}"))),
        }
    }
}

/// Namespace and type the entry points are exported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerConfig {
    pub namespace: String,
    pub type_name: String,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self { namespace: DEFAULT_NAMESPACE.to_owned(), type_name: DEFAULT_TYPE_NAME.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Symbolic name of the module to load.
    pub module: String,
    /// Directories searched in order.
    pub search_paths: Vec<PathBuf>,
    /// ABI sub-directory tried inside every search directory. Defaults to the running target's.
    pub abi: Option<String>,
    pub strategy: SymbolStrategy,
    pub owner: OwnerConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module: DEFAULT_MODULE.to_owned(),
            search_paths: Vec::new(),
            abi: None,
            strategy: SymbolStrategy::default(),
            owner: OwnerConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Parses a configuration from TOML text. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Reads a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| BridgeError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// The default configuration with the environment applied.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Appends the directories named by [`LIBRARY_PATH_ENV`] and then the directory of the
    /// running executable to the search path.
    pub fn with_env(mut self) -> Self {
        if let Some(paths) = std::env::var_os(LIBRARY_PATH_ENV) {
            self.search_paths.extend(
                std::env::split_paths(&paths).filter(|path| !path.as_os_str().is_empty()),
            );
        }
        if let Some(exe_dir) =
            std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            if !self.search_paths.contains(&exe_dir) {
                self.search_paths.push(exe_dir);
            }
        }
        self
    }

    /// ABI directory name to try, if any is known for this target.
    pub fn effective_abi(&self) -> Option<String> {
        self.abi.clone().or_else(|| target_abi().map(str::to_owned))
    }

    pub fn export_owner(&self) -> ExportOwner {
        ExportOwner::new(self.owner.namespace.as_str(), self.owner.type_name.as_str())
    }
}

/// Android ABI directory name matching the architecture this crate was built for.
pub fn target_abi() -> Option<&'static str> {
    if cfg!(target_arch = "aarch64") {
        Some("arm64-v8a")
    } else if cfg!(target_arch = "arm") {
        Some("armeabi-v7a")
    } else if cfg!(target_arch = "x86") {
        Some("x86")
    } else if cfg!(target_arch = "x86_64") {
        Some("x86_64")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.module, "bridge");
        assert_eq!(config.strategy, SymbolStrategy::Derived);
        assert_eq!(config.owner.namespace, "com.openmsx.openmsx4android");
    }

    #[test]
    fn parses_every_field() {
        let config = BridgeConfig::from_toml_str(
            r#"
            module = "openmsx4android"
            search_paths = ["/data/app/lib", "/vendor/lib64"]
            abi = "arm64-v8a"
            strategy = "registered"

            [owner]
            namespace = "org.example"
            type_name = "Host"
            "#,
        )
        .unwrap();
        assert_eq!(config.module, "openmsx4android");
        assert_eq!(
            config.search_paths,
            vec![PathBuf::from("/data/app/lib"), PathBuf::from("/vendor/lib64")]
        );
        assert_eq!(config.effective_abi().as_deref(), Some("arm64-v8a"));
        assert_eq!(config.strategy, SymbolStrategy::Registered);
        assert_eq!(config.export_owner(), ExportOwner::new("org.example", "Host"));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = BridgeConfig::from_toml_str(r#"strategy = "guess""#).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!("guess".parse::<SymbolStrategy>().is_err());
        assert_eq!("registered".parse::<SymbolStrategy>().unwrap(), SymbolStrategy::Registered);
    }

    #[test]
    fn reads_configuration_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bridge.toml");
        fs::write(&path, "module = \"other\"\n").unwrap();
        assert_eq!(BridgeConfig::load(&path).unwrap().module, "other");

        let err = BridgeConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn environment_appends_executable_directory() {
        let config = BridgeConfig::default().with_env();
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert!(config.search_paths.contains(&exe_dir));
    }
}
