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

//! local file cache for pass tables

use std::{collections::HashMap, io::ErrorKind, path::{Path, PathBuf}, time::Duration};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use cdse_common::{
    datetime::{deserialize_optional_duration, serialize_optional_duration},
    fs::{file_age, filepath_contents, remove_file_if_exists, write_file_atomically}
};

use crate::errors::{CdseError, Result};
use crate::op_failed;
use crate::table::{PassRecord, PassTable};

/// the key under which rows are stored in the cache file
pub const CACHE_KEY: &str = "data";

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct CacheConfig {
    pub path: PathBuf,

    /// caches older than this are stale. None means a cache never expires
    #[serde(default, deserialize_with="deserialize_optional_duration", serialize_with="serialize_optional_duration")]
    pub max_age: Option<Duration>,
}

impl Default for CacheConfig {
    fn default()->Self { CacheConfig { path: PathBuf::from("passes.json"), max_age: None } }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum CacheStatus {
    Missing,
    Fresh(Duration),
    Stale(Duration),
}

#[derive(Debug,Clone)]
pub struct PassCache {
    path: PathBuf,
    max_age: Option<Duration>,
}

impl PassCache {
    pub fn new (path: impl AsRef<Path>, max_age: Option<Duration>)->Self {
        PassCache { path: path.as_ref().to_path_buf(), max_age }
    }

    pub fn from_config (config: &CacheConfig)->Self {
        PassCache::new( &config.path, config.max_age)
    }

    pub fn path (&self)->&Path { &self.path }

    /// age based status of the cache file (using the file modification time)
    pub fn status (&self)->CacheStatus {
        match file_age( &self.path) {
            None => CacheStatus::Missing,
            Some(age) => match self.max_age {
                Some(max_age) if age >= max_age => CacheStatus::Stale(age),
                _ => CacheStatus::Fresh(age)
            }
        }
    }

    /// load the table regardless of its age
    pub fn load (&self)->Result<PassTable> {
        let data = filepath_contents( &self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound { CdseError::CacheMissing(self.path.clone()) } else { CdseError::IOError(e) }
        })?;

        let mut doc: Map<String,Value> = serde_json::from_slice( &data)?;
        let rows = doc.remove(CACHE_KEY).ok_or_else(|| op_failed!("no '{}' entry in cache file {:?}", CACHE_KEY, self.path))?;
        let rows: Vec<PassRecord> = serde_json::from_value(rows)?;

        info!("loaded {} passes from {:?}", rows.len(), self.path);
        Ok( PassTable::from_rows(rows))
    }

    /// load the table if the cache exists and is not stale
    pub fn load_fresh (&self)->Result<PassTable> {
        match self.status() {
            CacheStatus::Missing => Err( CdseError::CacheMissing( self.path.clone())),
            CacheStatus::Stale(age) => Err( CdseError::StaleCache( self.path.clone(), age)),
            CacheStatus::Fresh(_) => self.load()
        }
    }

    /// replace the cache contents with the given table. This never leaves a partially written file
    pub fn store (&self, table: &PassTable)->Result<()> {
        let doc = HashMap::from([(CACHE_KEY, table.rows())]);
        let data = serde_json::to_vec( &doc)?;
        write_file_atomically( &self.path, &data)?;

        info!("stored {} passes in {:?}", table.len(), self.path);
        Ok(())
    }

    /// remove the cache file. Answer if there was one
    pub fn invalidate (&self)->Result<bool> {
        Ok( remove_file_if_exists( &self.path)?)
    }
}
