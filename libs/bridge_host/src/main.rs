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

//! Loads the bridge module, calls its entry point and prints the returned text.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod host;

use host::{BridgeHost, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    bridge_loader::logging::init("bridge_host", cli.log_level());
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let host = BridgeHost::start(&cli)?;
    println!("{}", host.text()?);
    Ok(())
}
