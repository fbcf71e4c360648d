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

use std::path::PathBuf;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use lazy_static::lazy_static;
use cdse_common::init_tracing;
use cdse_passes::{fetch_image, CdseEnv, CdseSession, ProcessRequest};

#[derive(Parser, Debug)]
#[command(version, about = "retrieve a Sentinel-1 GRD sample image through the Sentinel Hub process API")]
struct Args {
    /// bounding box in the units of the given EPSG reference system (min_x,min_y,max_x,max_y)
    #[arg(long, num_args=4, value_delimiter=',', allow_negative_numbers=true,
          default_values_t=[268574.43, 4624494.84, 276045.41, 4631696.16])]
    bbox: Vec<f64>,

    /// EPSG code of the bbox reference system
    #[arg(long, default_value_t = 32633)]
    epsg: u32,

    #[arg(long, default_value = "2019-02-02T00:00:00Z")]
    from: DateTime<Utc>,

    #[arg(long, default_value = "2019-04-02T23:59:59Z")]
    to: DateTime<Utc>,

    /// output file
    #[arg(short, long, default_value = "img.png")]
    output: PathBuf,
}

lazy_static! {
    static ref ARGS: Args = Args::parse();
}

#[tokio::main]
async fn main()->Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let bbox: [f64;4] = match ARGS.bbox.as_slice() {
        [x0,y0,x1,y1] => [*x0,*y0,*x1,*y1],
        other => anyhow::bail!("bbox needs 4 values, got {}", other.len())
    };

    let env = CdseEnv::from_env()?;
    let session = CdseSession::connect( &env, None).await?;

    let request = ProcessRequest::s1_grd_vv( bbox, ARGS.epsg, &ARGS.from, &ARGS.to);
    let len = fetch_image( &session, &request, &ARGS.output).await?;

    println!("image saved in {:?} ({} bytes)", ARGS.output, len);
    Ok(())
}
