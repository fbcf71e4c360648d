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

//! Sentinel Hub process API requests for sample Sentinel-1 GRD imagery.
//! see https://documentation.dataspace.copernicus.eu/APIs/SentinelHub/Process/Examples/S1GRD.html
//!
//! We only store the raw response bytes, images are not decoded here

use std::path::Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use cdse_common::{datetime::iso_instant_string, fs::remove_file_if_exists};

use crate::errors::Result;
use crate::op_failed;
use crate::session::CdseSession;

/// render the VV band with a fixed gain
pub const S1_VV_EVALSCRIPT: &str = r#"//VERSION=3
function setup() {
  return {
    input: ["VV"],
    output: { id: "default", bands: 1 },
  }
}

function evaluatePixel(samples) {
  return [2 * samples.VV]
}
"#;

pub const S1_GRD_COLLECTION: &str = "sentinel-1-grd";

pub fn epsg_crs_uri (epsg: u32)->String {
    format!("http://www.opengis.net/def/crs/EPSG/0/{epsg}")
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct BoundsProperties {
    pub crs: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Bounds {
    pub bbox: [f64;4],
    pub properties: BoundsProperties,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct DataFilter {
    pub time_range: TimeRange,
    pub resolution: String,
    pub acquisition_mode: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct Processing {
    pub orthorectify: String, // the API expects a "true"/"false" string here
    pub dem_instance: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(rename_all="camelCase")]
pub struct DataSource {
    pub data_filter: DataFilter,
    pub processing: Processing,
    #[serde(rename="type")]
    pub data_type: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ProcessInput {
    pub bounds: Bounds,
    pub data: Vec<DataSource>,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct OutputFormat {
    #[serde(rename="type")]
    pub mime_type: String,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct OutputResponse {
    pub identifier: String,
    pub format: OutputFormat,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ProcessOutput {
    pub resx: f64,
    pub resy: f64,
    pub responses: Vec<OutputResponse>,
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ProcessRequest {
    pub input: ProcessInput,
    pub output: ProcessOutput,
    pub evalscript: String,
}

impl ProcessRequest {
    /// orthorectified high resolution IW image of the VV band as PNG with 10m pixels.
    /// `bbox` is given in the coordinates of the `epsg` reference system
    pub fn s1_grd_vv (bbox: [f64;4], epsg: u32, from: &DateTime<Utc>, to: &DateTime<Utc>)->Self {
        ProcessRequest {
            input: ProcessInput {
                bounds: Bounds { bbox, properties: BoundsProperties { crs: epsg_crs_uri(epsg) } },
                data: vec![
                    DataSource {
                        data_filter: DataFilter {
                            time_range: TimeRange { from: iso_instant_string(from), to: iso_instant_string(to) },
                            resolution: "HIGH".to_string(),
                            acquisition_mode: "IW".to_string(),
                        },
                        processing: Processing { orthorectify: "true".to_string(), dem_instance: "COPERNICUS_30".to_string() },
                        data_type: S1_GRD_COLLECTION.to_string(),
                    }
                ]
            },
            output: ProcessOutput {
                resx: 10.0,
                resy: 10.0,
                responses: vec![
                    OutputResponse { identifier: "default".to_string(), format: OutputFormat { mime_type: "image/png".to_string() } }
                ]
            },
            evalscript: S1_VV_EVALSCRIPT.to_string(),
        }
    }
}

/// send the request to the process API of the session and store the response in `path`.
/// Returns the number of bytes written
pub async fn fetch_image (session: &CdseSession, request: &ProcessRequest, path: impl AsRef<Path>)->Result<u64> {
    let path = path.as_ref();
    let len = session.post_for_file( request, path).await?;
    if len == 0 {
        remove_file_if_exists(path)?;
        return Err( op_failed!("empty image response from {}", session.process_url()))
    }

    info!("image saved in {:?} ({} bytes)", path, len);
    Ok(len)
}
