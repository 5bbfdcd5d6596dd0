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
use bridge_loader::share_dir::resolve_share_dir;
use bridge_loader::{BridgeConfig, ModuleRegistry, NativeBridge, SymbolStrategy};
use clap::Parser;
use log::{info, LevelFilter};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "bridge_host")]
#[command(about = "Load the native bridge module and print the text it returns", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory searched for the module, before any configured ones. Repeatable.
    #[arg(short = 'L', long = "library-path", value_name = "DIR")]
    pub library_paths: Vec<PathBuf>,

    /// Symbolic name of the module to load.
    #[arg(short, long, value_name = "NAME")]
    pub module: Option<String>,

    /// How entry points are located: `derived` or `registered`.
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<SymbolStrategy>,

    /// Share directory handed to the module.
    #[arg(long, value_name = "DIR", conflicts_with = "files_dir")]
    pub share_path: Option<PathBuf>,

    /// Private files directory. The share directory is derived from it when no media
    /// directory is given.
    #[arg(long, value_name = "DIR")]
    pub files_dir: Option<PathBuf>,

    /// External media directory, preferred over the files directory. Repeatable.
    #[arg(long = "media-dir", value_name = "DIR", requires = "files_dir")]
    pub media_dirs: Vec<PathBuf>,

    /// More output per occurrence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Configuration file (or defaults), then flags, then the environment.
    pub fn bridge_config(&self) -> Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => BridgeConfig::default(),
        };
        if !self.library_paths.is_empty() {
            let configured = std::mem::take(&mut config.search_paths);
            config.search_paths = self.library_paths.iter().cloned().chain(configured).collect();
        }
        if let Some(module) = &self.module {
            config.module = module.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        Ok(config.with_env())
    }

    fn share_path(&self) -> Option<PathBuf> {
        self.share_path.clone().or_else(|| {
            let files_dir = self.files_dir.as_deref()?;
            Some(resolve_share_dir(&self.media_dirs, files_dir))
        })
    }
}

/// Owns the loaded module for the life of the process.
///
/// Construction performs the load, so a host that exists always has a usable bridge.
pub struct BridgeHost {
    bridge: NativeBridge,
}

impl BridgeHost {
    pub fn start(cli: &Cli) -> Result<Self> {
        let registry = ModuleRegistry::new(cli.bridge_config()?);
        let bridge = registry
            .bridge()
            .with_context(|| format!("Failed to load native module {}", registry.config().module))?;
        info!("Bound {} from {}", bridge.module().name(), bridge.module().path().display());

        if let Some(share_path) = cli.share_path() {
            bridge
                .set_share_path(&share_path)
                .with_context(|| format!("Failed to hand over {}", share_path.display()))?;
        }
        Ok(Self { bridge })
    }

    pub fn text(&self) -> Result<String> {
        self.bridge.string_from_bridge().context("stringFromBridge failed")
    }
}
