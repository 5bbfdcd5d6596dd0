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

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the bridge.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failures at the native boundary.
///
/// None of these are transient, they point at a packaging or deployment defect. Values are
/// `Clone` so that a failed load can be reported again to every later caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("invalid module name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("native module {name:?} not found, searched {searched:?}")]
    ModuleNotFound { name: String, searched: Vec<PathBuf> },

    #[error("failed to load native module {name:?} from {}: {reason}", .path.display())]
    Load { name: String, path: PathBuf, reason: String },

    #[error("symbol {symbol} is not exported by native module {module:?}")]
    SymbolResolution { module: String, symbol: String },

    #[error("{symbol} in native module {module:?} returned an invalid value: {reason}")]
    InvalidReturn { module: String, symbol: String, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid bridge configuration: {0}")]
    Config(String),
}

/// Fieldless discriminant of [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeErrorKind {
    InvalidName,
    ModuleNotFound,
    Load,
    SymbolResolution,
    InvalidReturn,
    InvalidArgument,
    Config,
}

impl BridgeError {
    pub fn kind(&self) -> BridgeErrorKind {
        match self {
            BridgeError::InvalidName { .. } => BridgeErrorKind::InvalidName,
            BridgeError::ModuleNotFound { .. } => BridgeErrorKind::ModuleNotFound,
            BridgeError::Load { .. } => BridgeErrorKind::Load,
            BridgeError::SymbolResolution { .. } => BridgeErrorKind::SymbolResolution,
            BridgeError::InvalidReturn { .. } => BridgeErrorKind::InvalidReturn,
            BridgeError::InvalidArgument(_) => BridgeErrorKind::InvalidArgument,
            BridgeError::Config(_) => BridgeErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_load_failure_are_distinct() {
        let not_found = BridgeError::ModuleNotFound { name: "bridge".into(), searched: vec![] };
        let load = BridgeError::Load {
            name: "bridge".into(),
            path: PathBuf::from("/data/app/lib/arm64-v8a/libbridge.so"),
            reason: "wrong ELF class".into(),
        };
        assert_eq!(not_found.kind(), BridgeErrorKind::ModuleNotFound);
        assert_eq!(load.kind(), BridgeErrorKind::Load);
        assert_ne!(not_found.kind(), load.kind());
    }

    #[test]
    fn messages_name_the_module_and_path() {
        let load = BridgeError::Load {
            name: "bridge".into(),
            path: PathBuf::from("/tmp/libbridge.so"),
            reason: "bad magic".into(),
        };
        assert_eq!(
            load.to_string(),
            "failed to load native module \"bridge\" from /tmp/libbridge.so: bad magic"
        );
    }
}
