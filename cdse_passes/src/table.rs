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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use cdse_common::datetime::parse_datetime;

use crate::grid::GridCell;

/// a raw STAC feature as returned by the catalog (id, type, geometry, properties, assets, links..)
pub type Feature = Map<String,Value>;

/// one satellite overpass matching a grid cell. The feature attributes of the provider are kept
/// as-is and merged (flattened) with the bounds of the grid cell that produced the match
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct PassRecord {
    #[serde(flatten)]
    pub feature: Feature,

    pub lat_bot: f64,
    pub lat_up: f64,
    pub lon_left: f64,
    pub lon_right: f64,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,

    /// number of candidate features the provider reported for this cell (only the first one is kept)
    pub n_returned: usize,
}

impl PassRecord {
    pub fn new (cell: &GridCell, feature: Feature, n_returned: usize)->Self {
        PassRecord {
            feature,
            lat_bot: cell.lat_bot,
            lat_up: cell.lat_up,
            lon_left: cell.lon_left,
            lon_right: cell.lon_right,
            time_start: cell.time_start,
            time_end: cell.time_end,
            n_returned
        }
    }

    pub fn cell (&self)->GridCell {
        GridCell {
            lat_bot: self.lat_bot, lat_up: self.lat_up,
            lon_left: self.lon_left, lon_right: self.lon_right,
            time_start: self.time_start, time_end: self.time_end
        }
    }

    pub fn id (&self)->Option<&str> {
        self.feature.get("id").and_then(|v| v.as_str())
    }

    pub fn acquisition_time (&self)->Option<DateTime<Utc>> {
        feature_datetime( &self.feature)
    }
}

/// the `properties.datetime` of a STAC feature
pub fn feature_datetime (feature: &Feature)->Option<DateTime<Utc>> {
    feature.get("properties")
        .and_then(|p| p.get("datetime"))
        .and_then(|v| v.as_str())
        .and_then(parse_datetime)
}

/// ordered collection of pass records, which is what we cache
#[derive(Debug,Clone,PartialEq,Default)]
pub struct PassTable {
    rows: Vec<PassRecord>
}

impl PassTable {
    pub fn new()->Self { PassTable { rows: Vec::new() } }

    pub fn from_rows (rows: Vec<PassRecord>)->Self { PassTable { rows } }

    pub fn push (&mut self, rec: PassRecord) { self.rows.push(rec) }

    pub fn append (&mut self, other: &mut Vec<PassRecord>) { self.rows.append(other) }

    pub fn len (&self)->usize { self.rows.len() }

    pub fn is_empty (&self)->bool { self.rows.is_empty() }

    pub fn rows (&self)->&[PassRecord] { &self.rows }

    pub fn iter (&self)->impl Iterator<Item=&PassRecord> { self.rows.iter() }

    /// `[min(time_start), max(time_end))` over all rows
    pub fn time_interval (&self)->Option<(DateTime<Utc>,DateTime<Utc>)> {
        let start = self.rows.iter().map(|r| r.time_start).min()?;
        let end = self.rows.iter().map(|r| r.time_end).max()?;
        Some((start,end))
    }
}

impl FromIterator<PassRecord> for PassTable {
    fn from_iter<I: IntoIterator<Item=PassRecord>> (iter: I)->Self {
        PassTable { rows: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a PassTable {
    type Item = &'a PassRecord;
    type IntoIter = std::slice::Iter<'a,PassRecord>;

    fn into_iter (self)->Self::IntoIter { self.rows.iter() }
}
