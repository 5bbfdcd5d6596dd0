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

//! D-pad and text-input events handed from the host to the module.

use std::ffi::c_int;

/// `InputEventRecord::kind` of a key press.
pub const INPUT_KEY_DOWN: c_int = 1;
/// `InputEventRecord::kind` of a key release.
pub const INPUT_KEY_UP: c_int = 2;
/// `InputEventRecord::kind` of a text-input request. `value` is 1 to enable, 0 to disable.
pub const INPUT_TEXT_INPUT: c_int = 3;

/// Keys reachable from the on-screen D-pad, numbered as the activity sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DpadKey {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Return = 4,
    Space = 5,
    Tab = 6,
    Escape = 7,
}

impl DpadKey {
    pub const ALL: [DpadKey; 8] = [
        DpadKey::Up,
        DpadKey::Down,
        DpadKey::Left,
        DpadKey::Right,
        DpadKey::Return,
        DpadKey::Space,
        DpadKey::Tab,
        DpadKey::Escape,
    ];

    /// The key for direction code `dir`, or `None` for codes the activity never sends.
    pub fn from_dir(dir: c_int) -> Option<Self> {
        usize::try_from(dir).ok().and_then(|index| Self::ALL.get(index)).copied()
    }

    pub fn dir(self) -> c_int {
        self as c_int
    }
}

/// An input event as queued by the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: DpadKey, pressed: bool },
    TextInput { enabled: bool },
}

impl InputEvent {
    pub fn to_record(self) -> InputEventRecord {
        match self {
            InputEvent::Key { key, pressed } => InputEventRecord {
                kind: if pressed { INPUT_KEY_DOWN } else { INPUT_KEY_UP },
                code: key.dir(),
                value: 0,
            },
            InputEvent::TextInput { enabled } => {
                InputEventRecord { kind: INPUT_TEXT_INPUT, code: 0, value: c_int::from(enabled) }
            }
        }
    }

    /// Decodes a record. Returns `None` for an unknown kind or key code.
    pub fn from_record(record: &InputEventRecord) -> Option<Self> {
        match record.kind {
            INPUT_KEY_DOWN | INPUT_KEY_UP => Some(InputEvent::Key {
                key: DpadKey::from_dir(record.code)?,
                pressed: record.kind == INPUT_KEY_DOWN,
            }),
            INPUT_TEXT_INPUT => Some(InputEvent::TextInput { enabled: record.value != 0 }),
            _ => None,
        }
    }
}

/// C layout of an [`InputEvent`], filled in by the module's poll export.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputEventRecord {
    pub kind: c_int,
    pub code: c_int,
    pub value: c_int,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_codes_follow_the_activity_numbering() {
        assert_eq!(DpadKey::from_dir(0), Some(DpadKey::Up));
        assert_eq!(DpadKey::from_dir(4), Some(DpadKey::Return));
        assert_eq!(DpadKey::from_dir(7), Some(DpadKey::Escape));
        assert_eq!(DpadKey::from_dir(8), None);
        assert_eq!(DpadKey::from_dir(-1), None);
        assert!(DpadKey::ALL.iter().all(|key| DpadKey::from_dir(key.dir()) == Some(*key)));
    }

    #[test]
    fn unknown_records_are_rejected() {
        let unknown_kind = InputEventRecord { kind: 9, code: 0, value: 0 };
        assert_eq!(InputEvent::from_record(&unknown_kind), None);
        let unknown_key = InputEventRecord { kind: INPUT_KEY_DOWN, code: 12, value: 0 };
        assert_eq!(InputEvent::from_record(&unknown_key), None);
        assert_eq!(InputEvent::from_record(&InputEventRecord::default()), None);
    }

    #[test]
    fn text_input_record_carries_the_flag() {
        let record = InputEvent::TextInput { enabled: true }.to_record();
        assert_eq!(record, InputEventRecord { kind: INPUT_TEXT_INPUT, code: 0, value: 1 });
        let record = InputEvent::Key { key: DpadKey::Tab, pressed: false }.to_record();
        assert_eq!(record, InputEventRecord { kind: INPUT_KEY_UP, code: 6, value: 0 });
    }
}
