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

//! Process-wide load state, one entry per symbolic module name.

use crate::bridge::NativeBridge;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::module::LoadedModule;
use crate::resolver::{validate_name, ModuleResolver};
use log::{error, info};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex, OnceLock, PoisonError},
};

type LoadCell = Arc<OnceLock<Result<Arc<LoadedModule>>>>;

// One cell per symbolic name, shared by every registry in the process.
static LOAD_CELLS: LazyLock<Mutex<HashMap<String, LoadCell>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static LOAD_ATTEMPTS: LazyLock<Mutex<HashMap<String, usize>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

// Registry used by `crate::load`. Configured from the environment on first use.
static GLOBAL_REGISTRY: LazyLock<ModuleRegistry> =
    LazyLock::new(|| ModuleRegistry::new(BridgeConfig::from_env()));

/// Observable load state of a symbolic name.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// No attempt has been made.
    Unloaded,
    /// An attempt is running on another thread.
    Loading,
    Loaded(Arc<LoadedModule>),
    /// The attempt failed. The error is replayed to every later caller.
    Failed(BridgeError),
}

/// Loads native modules at most once per name and process.
///
/// The load state is process-wide: a registry only contributes the configuration used to find
/// a module. The first `load` of a name in the process performs the attempt through the calling
/// registry's resolver. Every later call, from any registry and including concurrent ones,
/// observes that attempt's outcome. Loaded modules stay mapped until the process exits.
pub struct ModuleRegistry {
    config: BridgeConfig,
    resolver: ModuleResolver,
}

impl ModuleRegistry {
    pub fn new(config: BridgeConfig) -> Self {
        let resolver = ModuleResolver::from_config(&config);
        Self { config, resolver }
    }

    /// The registry configured from the environment.
    pub fn global() -> &'static ModuleRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Loads the module named `name`, or returns the outcome of the earlier attempt.
    pub fn load(&self, name: &str) -> Result<Arc<LoadedModule>> {
        validate_name(name)?;
        let cell = {
            let mut cells = LOAD_CELLS.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(name.to_owned()).or_default())
        };
        // The map lock is released so that loading one module never blocks another.
        cell.get_or_init(|| self.attempt(name)).clone()
    }

    /// Loads the configured module and binds it with the configured owner and strategy.
    pub fn bridge(&self) -> Result<NativeBridge> {
        let module = self.load(&self.config.module)?;
        Ok(NativeBridge::new(module, self.config.export_owner(), self.config.strategy))
    }

    /// Number of load attempts made for `name` in this process. Never exceeds one.
    pub fn load_attempts(&self, name: &str) -> usize {
        let attempts = LOAD_ATTEMPTS.lock().unwrap_or_else(PoisonError::into_inner);
        attempts.get(name).copied().unwrap_or(0)
    }

    pub fn state(&self, name: &str) -> LoadState {
        let cells = LOAD_CELLS.lock().unwrap_or_else(PoisonError::into_inner);
        match cells.get(name).map(|cell| cell.get()) {
            None => LoadState::Unloaded,
            Some(None) => LoadState::Loading,
            Some(Some(Ok(module))) => LoadState::Loaded(Arc::clone(module)),
            Some(Some(Err(e))) => LoadState::Failed(e.clone()),
        }
    }

    fn attempt(&self, name: &str) -> Result<Arc<LoadedModule>> {
        {
            let mut attempts = LOAD_ATTEMPTS.lock().unwrap_or_else(PoisonError::into_inner);
            *attempts.entry(name.to_owned()).or_default() += 1;
        }
        let module = self
            .resolver
            .resolve(name)
            .and_then(|path| LoadedModule::open(name, &path))
            .inspect_err(|e| error!("{}", e))?;
        info!("Loaded native module {} from {}", name, module.path().display());
        Ok(Arc::new(module))
    }
}
