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

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the storage root that receives shared data.
pub const SHARE_SUBDIR: &str = "openmsx/share";

/// Picks the directory handed to the native module as its share path.
///
/// The first external media directory is preferred because users can reach it. Without one the
/// private files directory is used. The directory is created if needed. A failure to create it
/// is only logged, the path is returned regardless.
pub fn resolve_share_dir(media_dirs: &[PathBuf], files_dir: &Path) -> PathBuf {
    let base = media_dirs.first().map(PathBuf::as_path).unwrap_or(files_dir);
    let share_dir = base.join(SHARE_SUBDIR);
    if !share_dir.exists() {
        match fs::create_dir_all(&share_dir) {
            Ok(()) => info!("Created share directory {}", share_dir.display()),
            Err(e) => warn!("Couldn't create share directory {}: {}", share_dir.display(), e),
        }
    }
    share_dir
}
