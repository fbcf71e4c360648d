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
use cdse_common::datetime::{hours, parse_datetime};
use cdse_passes::{arange, BboxOrder, GridAxes, GridConfig};

fn dt (s: &str)->DateTime<Utc> { parse_datetime(s).unwrap() }

fn small_axes()->GridAxes {
    GridAxes::new(
        vec![47.0, 48.0, 49.0],
        vec![0.0, 1.0, 2.0],
        vec![dt("2018-01-01T00:00:00Z"), dt("2018-01-01T06:00:00Z"), dt("2018-01-01T12:00:00Z")]
    )
}

#[test]
fn test_arange() {
    assert_eq!( arange( 47.0, 50.0, 1.0), vec![47.0, 48.0, 49.0]);
    assert_eq!( arange( 0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
    assert_eq!( arange( 0.0, 1.1, 0.5), vec![0.0, 0.5, 1.0]);
    assert!( arange( 1.0, 1.0, 1.0).is_empty());
    assert!( arange( 0.0, 1.0, 0.0).is_empty());
}

#[test]
fn test_cell_count() {
    let axes = small_axes();
    assert_eq!( axes.n_spatial_cells(), 4);
    assert_eq!( axes.n_time_steps(), 2);
    assert_eq!( axes.n_cells(), 8);
    assert_eq!( axes.cells().count(), axes.n_cells());

    let degenerate = GridAxes::new( vec![47.0], vec![0.0, 1.0], vec![dt("2018-01-01T00:00:00Z"), dt("2018-01-01T06:00:00Z")]);
    assert_eq!( degenerate.n_cells(), 0);
    assert_eq!( degenerate.cells().count(), 0);
}

#[test]
fn test_cell_order() {
    let axes = small_axes();
    let cells: Vec<_> = axes.cells().collect();

    // longitude-major, then latitude, then time
    let keys: Vec<(f64,f64,DateTime<Utc>)> = cells.iter().map(|c| (c.lon_left, c.lat_bot, c.time_start)).collect();
    let mut sorted = keys.clone();
    sorted.sort_by( |a,b| a.0.total_cmp(&b.0).then( a.1.total_cmp(&b.1)).then( a.2.cmp(&b.2)));
    assert_eq!( keys, sorted);

    let c = cells[0];
    assert_eq!( (c.lat_bot, c.lat_up, c.lon_left, c.lon_right), (47.0, 48.0, 0.0, 1.0));
    assert_eq!( c.time_start, dt("2018-01-01T00:00:00Z"));
    assert_eq!( c.time_end, dt("2018-01-01T06:00:00Z"));

    let c = cells[2]; // next latitude band of the first longitude band
    assert_eq!( (c.lat_bot, c.lat_up, c.lon_left, c.lon_right), (48.0, 49.0, 0.0, 1.0));

    // bounds are adjacent axis entries
    for c in &cells {
        assert_eq!( c.lat_up - c.lat_bot, 1.0);
        assert_eq!( c.lon_right - c.lon_left, 1.0);
        assert_eq!( (c.time_end - c.time_start).num_hours(), 6);
    }
}

#[test]
fn test_cell_query_params() {
    let c = small_axes().cells().next().unwrap();
    assert_eq!( c.bbox( BboxOrder::LatLon), [47.0, 0.0, 48.0, 1.0]);
    assert_eq!( c.bbox( BboxOrder::LonLat), [0.0, 47.0, 1.0, 48.0]);
    assert_eq!( c.datetime_interval(), "2018-01-01T00:00:00Z/2018-01-01T06:00:00Z");

    assert!( c.contains_time( &dt("2018-01-01T00:00:00Z")));
    assert!( c.contains_time( &dt("2018-01-01T05:59:59Z")));
    assert!( !c.contains_time( &dt("2018-01-01T06:00:00Z")));
}

#[test]
fn test_default_grid() {
    let config = GridConfig::default();
    assert_eq!( config.time.start, dt("2018-01-01T00:00:00Z"));
    assert_eq!( config.time.end, dt("2024-01-01T00:00:00Z"));
    assert_eq!( config.time.step, hours(6));

    let axes = GridAxes::from_config( &config);
    assert_eq!( axes.lats.len(), 23);
    assert_eq!( axes.lons.len(), 30);
    assert_eq!( axes.times.len(), 2191 * 4);
    assert_eq!( axes.n_cells(), 22 * 29 * (2191 * 4 - 1));
}

#[test]
fn test_time_windows() {
    let times: Vec<DateTime<Utc>> = (0..11).map(|i| dt("2018-01-01T00:00:00Z") + chrono::TimeDelta::hours(6*i)).collect();
    let axes = GridAxes::new( vec![47.0, 48.0], vec![0.0, 1.0], times);

    assert_eq!( axes.time_windows(4), vec![0..4, 4..8, 8..10]);
    assert_eq!( axes.time_windows(10), vec![0..10]);
    assert_eq!( axes.time_windows(0).len(), 10);
}
