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

//! common utility functions for network operations

use std::{io::Write, path::Path};
use reqwest::{header::{HeaderValue, ACCEPT, RETRY_AFTER}, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{define_error, fs::{ensure_writable_dir, parent_dir}};

define_error!{ pub NetError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    NotFoundError(String) : "not found {0}",
    RateLimited(Option<u64>) : "rate limited, retry after {0:?} sec",
    Unauthorized(u16) : "not authorized, response status {0}",
    ServerError(u16,String) : "server error {0}: {1}",
    StatusError(u16,String) : "response status {0}: {1}",
    ParseError(String) : "parse error: {0}"
}

pub type Result<T> = std::result::Result<T, NetError>;

impl NetError {
    /// is this an error condition that might go away if we just try again later
    pub fn is_transient (&self)->bool {
        match self {
            NetError::HttpError(e) => e.is_timeout() || e.is_connect(),
            NetError::ServerError(..) => true,
            NetError::StatusError(code,_) => *code == StatusCode::REQUEST_TIMEOUT.as_u16(),
            _ => false
        }
    }
}

fn with_bearer (req: RequestBuilder, bearer: Option<&str>)->RequestBuilder {
    if let Some(token) = bearer { req.bearer_auth(token) } else { req }
}

/// POST the serialized data as JSON and parse the JSON response into U
pub async fn post_json<T,U> (client: &Client, url: &str, bearer: Option<&str>, data: &T) -> Result<U>
    where T: Serialize + ?Sized, U: DeserializeOwned
{
    let req = client.post(url)
        .header( ACCEPT, HeaderValue::from_static("application/json"))
        .json(data);

    debug!("POST {url}");
    let response = with_bearer(req, bearer).send().await?;
    let response = check_status( url, response).await?;
    from_json( response).await
}

/// POST form encoded parameters and parse the JSON response into U
pub async fn post_form<T,U> (client: &Client, url: &str, params: &T) -> Result<U>
    where T: Serialize + ?Sized, U: DeserializeOwned
{
    let response = client.post(url)
        .header( ACCEPT, HeaderValue::from_static("application/json"))
        .form(params)
        .send().await?;

    let response = check_status( url, response).await?;
    from_json( response).await
}

/// POST the serialized data as JSON and store the (binary) response body in the given file.
/// The body is retrieved in chunks into a temp file that is only renamed to `path` once complete.
/// Returns the number of bytes written
pub async fn post_json_to_file<T> (client: &Client, url: &str, bearer: Option<&str>, data: &T, path: impl AsRef<Path>) -> Result<u64>
    where T: Serialize + ?Sized
{
    let path = path.as_ref();
    let dir = parent_dir(path);
    ensure_writable_dir(&dir)?;

    let req = client.post(url).json(data);
    let response = with_bearer(req, bearer).send().await?;
    let mut response = check_status( url, response).await?;

    let mut file = NamedTempFile::new_in(&dir)?; // don't use path yet as that would expose partial downloads
    let mut len: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        len += chunk.len() as u64;
        file.write_all(&chunk)?;
    }
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    debug!("stored {len} bytes from {url} in {path:?}");

    Ok(len)
}

/// map non-success response status codes into respective NetErrors
pub async fn check_status (url: &str, response: Response)->Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response)
    }

    match status {
        StatusCode::NOT_FOUND => {
            Err( NetError::NotFoundError(url.to_string()))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response.headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            Err( NetError::RateLimited(retry_after))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err( NetError::Unauthorized(status.as_u16()))
        }
        other => {
            let code = other.as_u16();
            let msg = response.text().await.unwrap_or_else(|_| "(failed to read error body)".to_string());
            if other.is_server_error() {
                Err( NetError::ServerError(code, msg))
            } else {
                Err( NetError::StatusError(code, msg))
            }
        }
    }
}

pub async fn from_json<T> (response: Response)->Result<T> where T: DeserializeOwned {
    let bytes = response.bytes().await?;
    serde_json::from_slice( &bytes).map_err(|e| NetError::ParseError(e.to_string()))
}
