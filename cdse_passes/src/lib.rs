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

//! collect Sentinel-1 pass metadata from the Copernicus Data Space Ecosystem (CDSE) catalog over a
//! lon/lat/time grid, cache the resulting pass table and derive pass density data from it.
//! The crate also supports retrieval of sample imagery through the Sentinel Hub process API

use std::{fmt, time::Duration};
use serde::{Deserialize, Serialize};
use cdse_common::{config::{optional_env, required_env}, datetime::{deserialize_optional_duration, serialize_optional_duration}};

pub mod errors;
pub use errors::{CdseError, Result};

pub mod grid;
pub use grid::*;

pub mod table;
pub use table::*;

pub mod catalog;
pub use catalog::*;

pub mod session;
pub use session::*;

pub mod collect;
pub use collect::*;

pub mod cache;
pub use cache::*;

pub mod density;
pub use density::*;

pub mod imagery;
pub use imagery::*;

pub use cdse_common::config::load_config;

pub const DEFAULT_PROCESS_URL: &str = "https://sh.dataspace.copernicus.eu/api/v1/process";

/// the structural (non-secret) configuration of a collection run, normally read from a RON file
#[derive(Debug,Clone,Serialize,Deserialize,Default)]
pub struct CdseConfig {
    pub catalog: CatalogConfig,
    pub grid: GridConfig,
    pub strategy: FetchStrategy,
    pub retry: RetryConfig,
    pub cache: CacheConfig,

    #[serde(default, deserialize_with="deserialize_optional_duration", serialize_with="serialize_optional_duration")]
    pub request_timeout: Option<Duration>,
}

/// credentials and endpoints, which are only taken from the environment
#[derive(Clone)]
pub struct CdseEnv {
    pub client_id: String,
    pub client_secret: String,
    pub search_url: String,
    pub token_url: String,
    pub process_url: String,
}

impl CdseEnv {
    /// CLIENT_ID, CLIENT_SECRET, URL and TOKEN_URL have to be set, PROCESS_URL is optional
    pub fn from_env()->Result<Self> {
        Ok( CdseEnv {
            client_id: required_env("CLIENT_ID")?,
            client_secret: required_env("CLIENT_SECRET")?,
            search_url: required_env("URL")?,
            token_url: required_env("TOKEN_URL")?,
            process_url: optional_env("PROCESS_URL").unwrap_or_else(|| DEFAULT_PROCESS_URL.to_string()),
        })
    }
}

impl fmt::Debug for CdseEnv {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        f.debug_struct("CdseEnv")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("search_url", &self.search_url)
            .field("token_url", &self.token_url)
            .field("process_url", &self.process_url)
            .finish()
    }
}
