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

//! the lon/lat/time grid we query the catalog for

use std::{fmt, ops::Range, time::Duration};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use cdse_common::datetime::{self, arange_datetimes, deserialize_duration, iso_interval_string, serialize_duration};

/// axis order of bbox arrays we send to the catalog
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Default)]
pub enum BboxOrder {
    /// `[lat_bot, lon_left, lat_up, lon_right]`
    #[default]
    LatLon,
    /// `[lon_left, lat_bot, lon_right, lat_up]` (STAC / GeoJSON order)
    LonLat,
}

/// half-open `[start, stop)` range of axis boundaries in degrees
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct AxisRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn values (&self)->Vec<f64> { arange( self.start, self.stop, self.step) }
}

/// half-open `[start, end)` range of time boundaries
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct TimeAxis {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub step: Duration,
}

impl TimeAxis {
    pub fn values (&self)->Vec<DateTime<Utc>> { arange_datetimes( self.start, self.end, self.step) }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct GridConfig {
    pub lat: AxisRange,
    pub lon: AxisRange,
    pub time: TimeAxis,
}

impl Default for GridConfig {
    /// northern Europe in 1 degree bands, 6h time windows from 2018-01-01 to 2024-01-01
    fn default()->Self {
        GridConfig {
            lat: AxisRange { start: 47.0, stop: 70.0, step: 1.0 },
            lon: AxisRange { start: 0.0, stop: 30.0, step: 1.0 },
            time: TimeAxis {
                start: utc_midnight( 2018, 1, 1),
                end: utc_midnight( 2024, 1, 1),
                step: datetime::hours(6),
            }
        }
    }
}

/// 00:00:00 UTC of the given (valid) calendar date
fn utc_midnight (year: i32, month: u32, day: u32)->DateTime<Utc> {
    Utc.with_ymd_and_hms( year, month, day, 0, 0, 0).single().unwrap_or_default()
}

/// numpy-style `arange`: `start + i*step` for all values below `stop`. Empty for non-positive steps
pub fn arange (start: f64, stop: f64, step: f64)->Vec<f64> {
    if !(step > 0.0) || !(stop > start) {
        return Vec::new()
    }

    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// the spatial part of a grid cell
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct SpatialCell {
    pub lat_bot: f64,
    pub lat_up: f64,
    pub lon_left: f64,
    pub lon_right: f64,
}

impl SpatialCell {
    pub fn with_time (&self, time_start: DateTime<Utc>, time_end: DateTime<Utc>)->GridCell {
        GridCell {
            lat_bot: self.lat_bot, lat_up: self.lat_up,
            lon_left: self.lon_left, lon_right: self.lon_right,
            time_start, time_end
        }
    }

    pub fn bbox (&self, order: BboxOrder)->[f64;4] {
        match order {
            BboxOrder::LatLon => [self.lat_bot, self.lon_left, self.lat_up, self.lon_right],
            BboxOrder::LonLat => [self.lon_left, self.lat_bot, self.lon_right, self.lat_up],
        }
    }
}

impl fmt::Display for SpatialCell {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!(f, "lat=[{:.2}, {:.2}], lon=[{:.2}, {:.2}]", self.lat_bot, self.lat_up, self.lon_left, self.lon_right)
    }
}

/// a bounding box plus time window, which is the discrete query unit
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GridCell {
    pub lat_bot: f64,
    pub lat_up: f64,
    pub lon_left: f64,
    pub lon_right: f64,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
}

impl GridCell {
    pub fn spatial (&self)->SpatialCell {
        SpatialCell { lat_bot: self.lat_bot, lat_up: self.lat_up, lon_left: self.lon_left, lon_right: self.lon_right }
    }

    pub fn bbox (&self, order: BboxOrder)->[f64;4] {
        self.spatial().bbox(order)
    }

    /// `<start>/<end>` ISO-8601 interval
    pub fn datetime_interval (&self)->String {
        iso_interval_string( &self.time_start, &self.time_end)
    }

    /// is t within `[time_start, time_end)`
    pub fn contains_time (&self, t: &DateTime<Utc>)->bool {
        *t >= self.time_start && *t < self.time_end
    }
}

impl fmt::Display for GridCell {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!(f, "{}, time={}", self.spatial(), self.datetime_interval())
    }
}

/// the boundary arrays of a grid. Cells are formed by adjacent boundary pairs of each axis
#[derive(Debug,Clone,PartialEq)]
pub struct GridAxes {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    pub times: Vec<DateTime<Utc>>,
}

impl GridAxes {
    pub fn new (lats: Vec<f64>, lons: Vec<f64>, times: Vec<DateTime<Utc>>)->Self {
        GridAxes { lats, lons, times }
    }

    pub fn from_config (config: &GridConfig)->Self {
        GridAxes::new( config.lat.values(), config.lon.values(), config.time.values())
    }

    pub fn n_time_steps (&self)->usize { self.times.len().saturating_sub(1) }

    pub fn n_spatial_cells (&self)->usize {
        self.lats.len().saturating_sub(1) * self.lons.len().saturating_sub(1)
    }

    pub fn n_cells (&self)->usize {
        self.n_spatial_cells() * self.n_time_steps()
    }

    /// spatial cells in longitude-major order
    pub fn spatial_cells (&self)->impl Iterator<Item=SpatialCell> + '_ {
        self.lons.windows(2).flat_map( move |lon| {
            self.lats.windows(2).map( move |lat| {
                SpatialCell { lat_bot: lat[0], lat_up: lat[1], lon_left: lon[0], lon_right: lon[1] }
            })
        })
    }

    /// all time cells of a given spatial cell in time order
    pub fn time_cells (&self, sc: SpatialCell)->impl Iterator<Item=GridCell> + '_ {
        self.times.windows(2).map( move |t| sc.with_time( t[0], t[1]))
    }

    /// all grid cells: longitude-major, then latitude, then time
    pub fn cells (&self)->impl Iterator<Item=GridCell> + '_ {
        self.spatial_cells().flat_map( move |sc| self.time_cells(sc))
    }

    /// split the time cell indices into consecutive windows of (at most) `n_steps` cells
    pub fn time_windows (&self, n_steps: usize)->Vec<Range<usize>> {
        let n = self.n_time_steps();
        let n_steps = n_steps.max(1);

        (0..n).step_by(n_steps).map( |i| i..(i + n_steps).min(n)).collect()
    }
}
