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

use log::info;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

static SHARE_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);

pub(crate) fn set(path: PathBuf) {
    info!("Share path set to {}", path.display());
    *SHARE_PATH.lock().unwrap_or_else(PoisonError::into_inner) = Some(path);
}

/// The share directory handed over by the host, if any.
pub fn share_path() -> Option<PathBuf> {
    SHARE_PATH.lock().unwrap_or_else(PoisonError::into_inner).clone()
}
