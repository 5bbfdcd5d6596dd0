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

use log::LevelFilter;

/// Installs the process logger. Later calls are ignored.
///
/// On device the records go to logcat under `tag`. Elsewhere they go to stderr through
/// `env_logger`, and `RUST_LOG` overrides `max_level`.
pub fn init(tag: &str, max_level: LevelFilter) {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default().with_tag(tag).with_max_level(max_level),
    );

    #[cfg(not(target_os = "android"))]
    {
        let env = env_logger::Env::default().default_filter_or(max_level.as_str());
        if env_logger::Builder::from_env(env).try_init().is_ok() {
            log::debug!(target: tag, "Logging initialized");
        }
    }
}
