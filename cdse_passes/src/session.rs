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

//! bearer-authenticated access to the CDSE APIs. Tokens are obtained through the OAuth2
//! client-credentials grant and refreshed once they are about to expire

use std::{path::Path, time::Duration};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use cdse_common::{datetime::utc_now, net::{post_form, post_json, post_json_to_file, NetError}};

use crate::CdseEnv;
use crate::catalog::{CatalogSearch, SearchRequest, SearchResponse};
use crate::errors::{CdseError, Result};

/// we refresh tokens this long before they actually expire
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug,Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug,Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new (token: impl ToString, expires: Option<DateTime<Utc>>)->Self {
        AccessToken { token: token.to_string(), expires }
    }

    pub fn is_expired (&self, now: DateTime<Utc>)->bool {
        match self.expires {
            Some(t) => now + TimeDelta::seconds(EXPIRY_MARGIN_SECS) >= t,
            None => false
        }
    }
}

/// obtain a new access token through the client-credentials grant (client id is sent in the body)
pub async fn fetch_token (client: &Client, env: &CdseEnv)->Result<AccessToken> {
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", env.client_id.as_str()),
        ("client_secret", env.client_secret.as_str()),
    ];

    // all token endpoint failures abort, including unparseable responses
    let response: TokenResponse = post_form( client, &env.token_url, &params).await.map_err(|e| match e {
        NetError::Unauthorized(code) => CdseError::AuthError( format!("token request rejected with status {code}")),
        other => CdseError::AuthError( format!("token request to {} failed: {other}", env.token_url))
    })?;

    let expires = response.expires_in.map(|secs| utc_now() + TimeDelta::seconds(secs));
    debug!("obtained access token (expires {:?})", expires);
    Ok( AccessToken::new( response.access_token, expires))
}

pub fn build_http_client (timeout: Option<Duration>)->Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok( builder.build()?)
}

/// an authenticated session. Requests are sequential, the mutex only guards token refreshes
pub struct CdseSession {
    client: Client,
    env: Option<CdseEnv>, // None if we were created from a fixed token
    search_url: String,
    process_url: String,
    token: Mutex<AccessToken>,
}

impl CdseSession {
    pub async fn connect (env: &CdseEnv, timeout: Option<Duration>)->Result<Self> {
        let client = build_http_client(timeout)?;
        let token = fetch_token( &client, env).await?;
        info!("authenticated as client {}", env.client_id);

        Ok( CdseSession {
            client,
            env: Some(env.clone()),
            search_url: env.search_url.clone(),
            process_url: env.process_url.clone(),
            token: Mutex::new(token)
        })
    }

    /// a session with a given (non-refreshable) token
    pub fn with_token (client: Client, token: AccessToken, search_url: impl ToString, process_url: impl ToString)->Self {
        CdseSession {
            client,
            env: None,
            search_url: search_url.to_string(),
            process_url: process_url.to_string(),
            token: Mutex::new(token)
        }
    }

    pub fn search_url (&self)->&str { &self.search_url }

    pub fn process_url (&self)->&str { &self.process_url }

    /// current bearer token, refreshed if it is about to expire and we have credentials to do so
    pub async fn bearer (&self)->Result<String> {
        let mut token = self.token.lock().await;
        if token.is_expired( utc_now()) {
            match &self.env {
                Some(env) => {
                    info!("refreshing access token");
                    *token = fetch_token( &self.client, env).await?;
                }
                None => return Err( CdseError::AuthError("access token expired".into()))
            }
        }
        Ok( token.token.clone())
    }

    /// POST a JSON request to the process API and store the response body in the given file
    pub async fn post_for_file<T> (&self, request: &T, path: impl AsRef<Path>)->Result<u64> where T: Serialize + Sync {
        let bearer = self.bearer().await?;
        Ok( post_json_to_file( &self.client, &self.process_url, Some(&bearer), request, path).await? )
    }
}

#[async_trait]
impl CatalogSearch for CdseSession {
    async fn search (&self, request: &SearchRequest)->Result<SearchResponse> {
        let bearer = self.bearer().await?;
        Ok( post_json( &self.client, &self.search_url, Some(&bearer), request).await? )
    }
}
