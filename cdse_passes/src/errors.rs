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

use std::{path::PathBuf, time::Duration};
use thiserror::Error;
use cdse_common::{config::ConfigError, map_to_opaque_error, net::NetError};

pub type Result<T> = std::result::Result<T, CdseError>;

#[derive(Error,Debug)]
pub enum CdseError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("CSV error {0}")]
    CsvError( #[from] csv::Error),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("environment error {0}")]
    EnvError(String),

    #[error("http error {0}")]
    HttpError( #[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    AuthError(String),

    /// the provider rejected the request because our request quota is used up (HTTP 429)
    #[error("request quota exceeded, retry after {0:?} sec")]
    QuotaExceeded(Option<u64>),

    /// a network level failure that can be retried
    #[error("transient network error {0}")]
    TransientNetworkError(String),

    /// the response could not be parsed or is inconsistent. Only affects the current query
    #[error("malformed response {0}")]
    MalformedResponse(String),

    #[error("no cache file {0:?}")]
    CacheMissing(PathBuf),

    #[error("cache file {0:?} is stale (age {1:?})")]
    StaleCache(PathBuf, Duration),

    /// a generic error
    #[error("operation failed {0}")]
    OpFailed(String)
}

impl CdseError {
    pub fn is_transient (&self)->bool {
        matches!( self, CdseError::TransientNetworkError(_))
    }
}

impl From<NetError> for CdseError {
    fn from (e: NetError)->Self {
        if e.is_transient() {
            return CdseError::TransientNetworkError( e.to_string())
        }

        match e {
            NetError::IOError(e) => CdseError::IOError(e),
            NetError::HttpError(e) => CdseError::HttpError(e),
            NetError::RateLimited(retry_after) => CdseError::QuotaExceeded(retry_after),
            NetError::Unauthorized(code) => CdseError::AuthError( format!("response status {code}")),
            NetError::ParseError(msg) => CdseError::MalformedResponse(msg),
            other => CdseError::OpFailed( other.to_string())
        }
    }
}

impl From<ConfigError> for CdseError {
    fn from (e: ConfigError)->Self {
        match e {
            ConfigError::MissingEnvVar(name) => CdseError::EnvError( format!("{name} not set")),
            ConfigError::IOError(e) => CdseError::IOError(e),
            other => CdseError::ConfigError( other.to_string())
        }
    }
}

map_to_opaque_error!{ ron::error::SpannedError => CdseError::ConfigError }

pub fn op_failed (msg: impl ToString)->CdseError {
    CdseError::OpFailed(msg.to_string())
}

pub fn malformed (msg: impl ToString)->CdseError {
    CdseError::MalformedResponse(msg.to_string())
}

#[macro_export]
macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::op_failed( format!( $fmt $(, $arg)* ))
    };
}
