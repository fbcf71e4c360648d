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

//! config loading. Structural configuration lives in RON files, secrets and endpoints come from
//! environment variables and are never stored in config files

use std::{env, path::Path};
use serde::Deserialize;

use crate::{define_error, fs::filepath_contents};

define_error!{ pub ConfigError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    RonError(#[from] ron::error::SpannedError) : "RON error: {0}",
    MissingEnvVar(String) : "environment variable {0} not set",
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// load a RON config file into the respective config struct
pub fn load_config<C,P> (path: P) -> Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let data = filepath_contents( &path)?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// parse a RON config from a string (useful for inlined defaults and tests)
pub fn config_from_str<C> (s: &str) -> Result<C> where C: for <'a> Deserialize<'a> {
    Ok( ron::de::from_str(s)? )
}

/// value of a required environment variable. Empty values count as not set
pub fn required_env (name: &str) -> Result<String> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err( ConfigError::MissingEnvVar(name.to_string()))
    }
}

pub fn optional_env (name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
