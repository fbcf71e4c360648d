/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! generic utilities shared by the CDSE crates: datetime formatting and ranges, HTTP helpers,
//! file system helpers, RON config loading and error definition macros

pub mod macros;
pub mod datetime;
pub mod fs;
pub mod net;
pub mod config;

use tracing_subscriber::EnvFilter;

/// install a global fmt subscriber that is controlled by RUST_LOG (defaults to `info` if not set).
/// Note this only succeeds if there is no global subscriber set yet, which is why we ignore the result
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

// a global fn that can be used with serde(skip_serializing_if="cdse_common::is_none")
#[inline] pub fn is_none<T> (opt: &Option<T>)->bool { opt.is_none() }
