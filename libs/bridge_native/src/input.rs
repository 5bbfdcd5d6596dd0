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

//! Input events queued for the emulator's event loop.

use bridge_abi::{DpadKey, InputEvent};
use log::{trace, warn};
use std::collections::VecDeque;
use std::ffi::c_int;
use std::sync::{Mutex, PoisonError};

/// Events beyond this many are dropped until the queue is drained.
pub const MAX_QUEUED_EVENTS: usize = 256;

struct InputState {
    events: VecDeque<InputEvent>,
    ime_enabled: bool,
}

static INPUT: Mutex<InputState> =
    Mutex::new(InputState { events: VecDeque::new(), ime_enabled: true });

fn with_input<T>(f: impl FnOnce(&mut InputState) -> T) -> T {
    f(&mut INPUT.lock().unwrap_or_else(PoisonError::into_inner))
}

impl InputState {
    fn push(&mut self, event: InputEvent) -> bool {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            warn!("Input queue full, dropping {:?}", event);
            return false;
        }
        self.events.push_back(event);
        true
    }
}

/// Queues a press or release of the D-pad key `dir` and turns text input off.
///
/// Returns false when `dir` names no key. Nothing changes in that case.
pub(crate) fn send_dpad(dir: c_int, pressed: bool) -> bool {
    let Some(key) = DpadKey::from_dir(dir) else {
        trace!("Ignoring D-pad direction {}", dir);
        return false;
    };
    with_input(|input| {
        input.ime_enabled = false;
        input.push(InputEvent::Key { key, pressed })
    })
}

/// Queues a request to start or stop text input.
pub(crate) fn request_text_input(enabled: bool) -> bool {
    with_input(|input| input.push(InputEvent::TextInput { enabled }))
}

/// Takes the oldest queued event.
pub fn poll_event() -> Option<InputEvent> {
    with_input(|input| input.events.pop_front())
}

/// Whether text input is enabled. D-pad use turns it off.
pub fn ime_enabled() -> bool {
    with_input(|input| input.ime_enabled)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // The queue is module-global; tests touching it take this lock.
    pub(crate) static QUEUE_LOCK: Mutex<()> = Mutex::new(());

    pub(crate) fn drain() {
        while poll_event().is_some() {}
    }

    #[test]
    fn dpad_events_keep_their_order() {
        let _guard = QUEUE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        for key in DpadKey::ALL {
            assert!(send_dpad(key.dir(), true));
            assert!(send_dpad(key.dir(), false));
        }
        for key in DpadKey::ALL {
            assert_eq!(poll_event(), Some(InputEvent::Key { key, pressed: true }));
            assert_eq!(poll_event(), Some(InputEvent::Key { key, pressed: false }));
        }
        assert_eq!(poll_event(), None);
    }

    #[test]
    fn unknown_direction_changes_nothing() {
        let _guard = QUEUE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        with_input(|input| input.ime_enabled = true);
        assert!(!send_dpad(8, true));
        assert!(!send_dpad(-1, false));
        assert_eq!(poll_event(), None);
        assert!(ime_enabled());

        assert!(send_dpad(DpadKey::Escape.dir(), true));
        assert!(!ime_enabled());
        drain();
    }

    #[test]
    fn full_queue_drops_new_events() {
        let _guard = QUEUE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        drain();
        for _ in 0..MAX_QUEUED_EVENTS {
            assert!(request_text_input(true));
        }
        assert!(!request_text_input(false));
        let queued = std::iter::from_fn(poll_event).count();
        assert_eq!(queued, MAX_QUEUED_EVENTS);
    }
}
