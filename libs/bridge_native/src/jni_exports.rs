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

//! # Java bindings
//!
//! Entry points for a JVM host. They are found by their JNI names, or registered explicitly by
//! `JNI_OnLoad` when the `register-natives` feature is enabled.
use jni::objects::{JClass, JObject, JString};
use jni::sys::{jboolean, jint, jstring, JNI_FALSE};
use jni::JNIEnv;
use log::{error, trace};
use std::path::PathBuf;

/// Returns the greeting as a Java string, or null with a pending exception on failure.
#[no_mangle]
pub extern "system" fn Java_com_openmsx_openmsx4android_MainActivity_stringFromJNI<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    crate::init_logging();
    match env.new_string(crate::GREETING) {
        Ok(text) => text.into_raw(),
        Err(e) => {
            error!("Failed to create the greeting string: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Stores the share directory chosen by the SDL activity.
#[no_mangle]
pub extern "system" fn Java_org_libsdl_app_OpenMSX4AndroidSDLActivity_nativeSetSharePath<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    path: JString<'local>,
) {
    crate::init_logging();
    if path.is_null() {
        error!("nativeSetSharePath called with null");
        return;
    }
    let path: String = match env.get_string(&path) {
        Ok(path) => path.into(),
        Err(e) => {
            error!("Failed to read the share path: {}", e);
            return;
        }
    };
    trace!("nativeSetSharePath with {}", path);
    crate::share_path::set(PathBuf::from(path));
}

/// Queues a press or release of an on-screen D-pad key. Unknown directions are ignored.
#[no_mangle]
pub extern "system" fn Java_org_libsdl_app_OpenMSX4AndroidSDLActivity_nativeSendDpad(
    _env: JNIEnv,
    _class: JClass,
    dir: jint,
    is_down: jboolean,
) {
    crate::init_logging();
    crate::input::send_dpad(dir, is_down != JNI_FALSE);
}

#[no_mangle]
pub extern "system" fn Java_org_libsdl_app_OpenMSX4AndroidSDLActivity_nativeRequestTextInput(
    _env: JNIEnv,
    _class: JClass,
    enable: jboolean,
) {
    crate::init_logging();
    crate::input::request_text_input(enable != JNI_FALSE);
}

#[cfg(feature = "register-natives")]
mod register {
    use bridge_abi::{
        ExportOwner, DEFAULT_NAMESPACE, DEFAULT_TYPE_NAME, NATIVE_REQUEST_TEXT_INPUT,
        NATIVE_SEND_DPAD, NATIVE_SET_SHARE_PATH, SDL_NAMESPACE, SDL_TYPE_NAME, STRING_FROM_JNI,
    };
    use jni::sys::{jint, JNI_ERR, JNI_VERSION_1_6};
    use jni::{JNIEnv, JavaVM, NativeMethod};
    use log::{error, info, warn};
    use std::ffi::c_void;

    fn register(env: &mut JNIEnv, owner: &ExportOwner, methods: &[NativeMethod]) -> bool {
        let class = owner.class_path();
        match env.register_native_methods(class.as_str(), methods) {
            Ok(()) => {
                info!("Registered {} native methods for {}", methods.len(), class);
                true
            }
            Err(e) => {
                warn!("Failed to register natives for {}: {}", class, e);
                // A missing class leaves a NoClassDefFoundError pending.
                let _ = env.exception_clear();
                false
            }
        }
    }

    /// Registers the entry points against their owning classes when a JVM loads the module.
    ///
    /// The activity class is required. The SDL activity is optional, its methods keep their JNI
    /// names when it is absent.
    #[no_mangle]
    pub extern "system" fn JNI_OnLoad(vm: JavaVM, _reserved: *mut c_void) -> jint {
        crate::init_logging();
        let mut env = match vm.get_env() {
            Ok(env) => env,
            Err(e) => {
                error!("Failed to get the JNI environment: {}", e);
                return JNI_ERR;
            }
        };
        let activity = [NativeMethod {
            name: STRING_FROM_JNI.into(),
            sig: "()Ljava/lang/String;".into(),
            fn_ptr: super::Java_com_openmsx_openmsx4android_MainActivity_stringFromJNI
                as *mut c_void,
        }];
        if !register(&mut env, &ExportOwner::new(DEFAULT_NAMESPACE, DEFAULT_TYPE_NAME), &activity)
        {
            return JNI_ERR;
        }
        let sdl_activity = [
            NativeMethod {
                name: NATIVE_SET_SHARE_PATH.into(),
                sig: "(Ljava/lang/String;)V".into(),
                fn_ptr: super::Java_org_libsdl_app_OpenMSX4AndroidSDLActivity_nativeSetSharePath
                    as *mut c_void,
            },
            NativeMethod {
                name: NATIVE_SEND_DPAD.into(),
                sig: "(IZ)V".into(),
                fn_ptr: super::Java_org_libsdl_app_OpenMSX4AndroidSDLActivity_nativeSendDpad
                    as *mut c_void,
            },
            NativeMethod {
                name: NATIVE_REQUEST_TEXT_INPUT.into(),
                sig: "(Z)V".into(),
                fn_ptr:
                    super::Java_org_libsdl_app_OpenMSX4AndroidSDLActivity_nativeRequestTextInput
                        as *mut c_void,
            },
        ];
        register(&mut env, &ExportOwner::new(SDL_NAMESPACE, SDL_TYPE_NAME), &sdl_activity);
        JNI_VERSION_1_6
    }
}
