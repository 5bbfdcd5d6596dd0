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

//! # Bridge Loader
//!
//! Resolves a native module by symbolic name, maps it into the process once, and binds its
//! exported entry points.
//!
//! ```no_run
//! let bridge = bridge_loader::ModuleRegistry::global().bridge()?;
//! println!("{}", bridge.string_from_bridge()?);
//! # Ok::<(), bridge_loader::BridgeError>(())
//! ```

mod bridge;
pub mod config;
mod error;
mod library_loader;
pub mod logging;
mod module;
mod registry;
pub mod resolver;
pub mod share_dir;

pub use bridge::NativeBridge;
pub use bridge_abi::{DpadKey, InputEvent};
pub use config::{BridgeConfig, SymbolStrategy};
pub use error::{BridgeError, BridgeErrorKind, Result};
pub use module::{LoadedModule, NativeFn};
pub use registry::{LoadState, ModuleRegistry};

use std::sync::Arc;

/// Loads `name` with the environment's configuration. Load state is shared with every other
/// registry in the process.
pub fn load(name: &str) -> Result<Arc<LoadedModule>> {
    ModuleRegistry::global().load(name)
}
