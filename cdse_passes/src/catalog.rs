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

//! queries against the Sentinel Hub catalog (STAC) search endpoint.
//! see https://documentation.dataspace.copernicus.eu/APIs/SentinelHub/Catalog.html

use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use cdse_common::datetime::{deserialize_duration, iso_interval_string, secs, serialize_duration};

use crate::errors::{malformed, Result};
use crate::grid::{BboxOrder, GridCell, SpatialCell};
use crate::table::{feature_datetime, Feature, PassRecord};

/// upper bound for the number of result pages we follow for a single query
pub const MAX_PAGES: usize = 100;

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct CatalogConfig {
    pub collections: Vec<String>,
    pub limit: usize,
    #[serde(default)]
    pub bbox_order: BboxOrder,
}

impl Default for CatalogConfig {
    fn default()->Self {
        CatalogConfig { collections: vec!["sentinel-1-grd".to_string()], limit: 10, bbox_order: BboxOrder::LatLon }
    }
}

/// how we map grid cells to catalog queries
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize,Default)]
pub enum FetchStrategy {
    /// one query per grid cell. Simple, but uses up the request quota quickly
    #[default]
    PerCell,

    /// one (paged) query per spatial cell and `window_steps` consecutive time cells. Results are
    /// sorted into time cells by their `properties.datetime`
    Batched { window_steps: usize },
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct RetryConfig {
    pub max_retry: usize,
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub retry_delay: Duration,
}

impl Default for RetryConfig {
    fn default()->Self { RetryConfig { max_retry: 3, retry_delay: secs(5) } }
}

/* #region request/response ******************************************************************************/

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SearchRequest {
    pub collections: Vec<String>,
    pub limit: usize,
    pub bbox: [f64;4],
    pub datetime: String,

    /// paging token from a previous response context
    #[serde(default, skip_serializing_if="cdse_common::is_none")]
    pub next: Option<u64>,
}

impl SearchRequest {
    pub fn for_cell (config: &CatalogConfig, cell: &GridCell)->Self {
        SearchRequest {
            collections: config.collections.clone(),
            limit: config.limit,
            bbox: cell.bbox( config.bbox_order),
            datetime: cell.datetime_interval(),
            next: None
        }
    }

    pub fn for_window (config: &CatalogConfig, sc: &SpatialCell, window: &[GridCell])->Option<Self> {
        let first = window.first()?;
        let last = window.last()?;

        Some( SearchRequest {
            collections: config.collections.clone(),
            limit: config.limit,
            bbox: sc.bbox( config.bbox_order),
            datetime: iso_interval_string( &first.time_start, &last.time_end),
            next: None
        })
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SearchContext {
    pub returned: usize,

    #[serde(default, skip_serializing_if="cdse_common::is_none")]
    pub limit: Option<usize>,

    #[serde(default, skip_serializing_if="cdse_common::is_none")]
    pub next: Option<u64>,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct SearchResponse {
    pub context: SearchContext,

    #[serde(default)]
    pub features: Vec<Feature>,
}

/* #endregion request/response */

/// the abstraction of something we can send catalog search requests to
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search (&self, request: &SearchRequest)->Result<SearchResponse>;
}

/// send request, retrying transient errors up to `retry.max_retry` times. Other errors are returned right away
pub async fn search_with_retry<S> (search: &S, request: &SearchRequest, retry: &RetryConfig)->Result<SearchResponse>
    where S: CatalogSearch + ?Sized
{
    let mut n_retry = 0;
    loop {
        match search.search(request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_transient() && n_retry < retry.max_retry => {
                n_retry += 1;
                warn!("{e}, retry {}/{} in {:?}", n_retry, retry.max_retry, retry.retry_delay);
                tokio::time::sleep( retry.retry_delay).await;
            }
            Err(e) => return Err(e)
        }
    }
}

/// turn the response for a single grid cell into an optional pass record.
/// If there are several candidates we keep the first one (in response order) and record the candidate count
pub fn record_from_response (cell: &GridCell, response: SearchResponse)->Result<Option<PassRecord>> {
    let returned = response.context.returned;
    if returned == 0 {
        return Ok(None)
    }

    let n_features = response.features.len();
    match response.features.into_iter().next() {
        Some(feature) => {
            let n_returned = returned.max(n_features);
            if n_returned > 1 {
                warn!("multiple ({}) images found for single time slot {}", n_returned, cell);
            }
            Ok( Some( PassRecord::new( cell, feature, n_returned)))
        }
        None => Err( malformed( format!("{returned} matches reported but no features for {cell}")))
    }
}

pub async fn fetch_cell<S> (search: &S, config: &CatalogConfig, retry: &RetryConfig, cell: &GridCell)->Result<Option<PassRecord>>
    where S: CatalogSearch + ?Sized
{
    let request = SearchRequest::for_cell( config, cell);
    let response = search_with_retry( search, &request, retry).await?;
    record_from_response( cell, response)
}

/// result of a batched query over several time cells of the same spatial cell
#[derive(Debug,Default)]
pub struct WindowFetch {
    pub records: Vec<PassRecord>,
    pub n_queries: usize,
    pub n_undated: usize,
}

/// query all features of a spatial cell within the time span of `window` (following result pages) and
/// sort them into the window cells. Each cell gets at most one record (the first matching feature).
/// `result.n_queries` also counts the pages that were requested before an error occurred
pub async fn fetch_window<S> (search: &S, config: &CatalogConfig, retry: &RetryConfig, sc: &SpatialCell, window: &[GridCell],
                              result: &mut WindowFetch)->Result<()>
    where S: CatalogSearch + ?Sized
{
    let Some(mut request) = SearchRequest::for_window( config, sc, window) else {
        return Ok(())
    };

    let mut features: Vec<(chrono::DateTime<chrono::Utc>,Feature)> = Vec::new();
    let mut n_pages = 0;
    loop {
        let response = search_with_retry( search, &request, retry).await;
        n_pages += 1;
        result.n_queries += 1;
        let response = response?;

        if response.context.returned > 0 && response.features.is_empty() {
            return Err( malformed( format!("{} matches reported but no features for {}", response.context.returned, sc)))
        }

        for feature in response.features {
            match feature_datetime( &feature) {
                Some(date) => features.push( (date,feature)),
                None => {
                    warn!("ignoring feature without valid properties.datetime: {:?}", feature.get("id"));
                    result.n_undated += 1;
                }
            }
        }

        match response.context.next {
            None => break,
            Some(next) if request.next == Some(next) => break,
            Some(next) if n_pages >= MAX_PAGES => {
                warn!("stopped after {} result pages for {} (next page {} not retrieved)", n_pages, sc, next);
                break
            }
            Some(next) => {
                debug!("following result page {next} for {sc}");
                request.next = Some(next);
            }
        }
    }

    for cell in window {
        let mut matches = features.iter().filter( |(date,_)| cell.contains_time(date));
        if let Some((_,feature)) = matches.next() {
            let n_returned = 1 + matches.count();
            if n_returned > 1 {
                warn!("multiple ({}) images found for single time slot {}", n_returned, cell);
            }
            result.records.push( PassRecord::new( cell, feature.clone(), n_returned));
        }
    }

    Ok(())
}
