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

use std::{fs::File, io::stdout, path::PathBuf};
use anyhow::Result;
use clap::{Parser, Subcommand};
use lazy_static::lazy_static;
use cdse_common::init_tracing;
use cdse_passes::{
    collect_passes, load_config, CacheStatus, CdseConfig, CdseEnv, CdseError, CdseSession, GridAxes, PassCache, PassDensity, PassTable
};

#[derive(Parser, Debug)]
#[command(version, about = "collect Sentinel-1 passes from the CDSE catalog over a lon/lat/time grid")]
struct Args {
    /// RON config file (defaults are used if not set)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// query the catalog unless the cache is fresh, and store the results
    Refresh {
        /// ignore an existing cache
        #[arg(short, long)]
        force: bool,
    },

    /// print the pass density of the cached table
    Show {
        /// also use caches that are older than the configured max_age
        #[arg(short, long)]
        allow_stale: bool,

        /// write the density as CSV to this file ('-' for stdout)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// remove the cache file
    Clear,
}

lazy_static! {
    static ref ARGS: Args = Args::parse();
}

#[tokio::main]
async fn main()->Result<()> {
    let _ = dotenvy::dotenv(); // a .env file is optional
    init_tracing();

    let config: CdseConfig = match &ARGS.config {
        Some(path) => load_config(path)?,
        None => CdseConfig::default()
    };
    let cache = PassCache::from_config( &config.cache);

    match &ARGS.mode {
        Mode::Refresh { force } => refresh( &config, &cache, *force).await,
        Mode::Show { allow_stale, csv } => show( &cache, *allow_stale, csv.as_ref()),
        Mode::Clear => {
            if cache.invalidate()? {
                println!("removed cache {:?}", cache.path());
            } else {
                println!("no cache {:?}", cache.path());
            }
            Ok(())
        }
    }
}

async fn refresh (config: &CdseConfig, cache: &PassCache, force: bool)->Result<()> {
    if !force {
        if let CacheStatus::Fresh(age) = cache.status() {
            println!("cache {:?} is fresh (age {:?}), use --force to refresh", cache.path(), age);
            return Ok(())
        }
    }

    let env = CdseEnv::from_env()?;
    let session = CdseSession::connect( &env, config.request_timeout).await?;
    let axes = GridAxes::from_config( &config.grid);
    println!("querying {} grid cells", axes.n_cells());

    let (table, stats) = collect_passes( &session, config, &axes).await?;
    cache.store( &table)?;

    println!("{stats}");
    println!("stored {} passes in {:?}", table.len(), cache.path());
    Ok(())
}

fn show (cache: &PassCache, allow_stale: bool, csv: Option<&PathBuf>)->Result<()> {
    let table: PassTable = match cache.load_fresh() {
        Ok(table) => table,
        Err(CdseError::StaleCache(..)) if allow_stale => cache.load()?,
        Err(e) => return Err(e.into())
    };

    let density = PassDensity::from_table( &table);
    match csv {
        Some(path) if path.as_os_str() == "-" => density.write_csv( stdout())?,
        Some(path) => density.write_csv( File::create(path)?)?,
        None => print!("{density}")
    }
    Ok(())
}
