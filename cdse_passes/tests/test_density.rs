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

use serde_json::Map;
use cdse_common::datetime::parse_datetime;
use cdse_passes::{GridCell, PassDensity, PassRecord, PassTable};

fn record (lon_left: f64, lat_bot: f64, start: &str, end: &str)->PassRecord {
    let cell = GridCell {
        lat_bot, lat_up: lat_bot + 1.0, lon_left, lon_right: lon_left + 1.0,
        time_start: parse_datetime(start).unwrap(),
        time_end: parse_datetime(end).unwrap(),
    };
    PassRecord::new( &cell, Map::new(), 1)
}

fn table()->PassTable {
    vec![
        record( 1.0, 47.0, "2018-01-01T06:00:00Z", "2018-01-01T12:00:00Z"),
        record( 0.0, 47.0, "2018-01-01T00:00:00Z", "2018-01-01T06:00:00Z"),
        record( 0.0, 47.0, "2018-01-02T00:00:00Z", "2018-01-02T06:00:00Z"),
        record( 0.0, 48.0, "2018-01-01T12:00:00Z", "2018-01-01T18:00:00Z"),
        record( 0.0, 47.0, "2018-01-03T18:00:00Z", "2018-01-04T00:00:00Z"),
    ].into_iter().collect()
}

#[test]
fn test_counts() {
    let density = PassDensity::from_table( &table());

    assert_eq!( density.lons, vec![0.0, 1.0]);
    assert_eq!( density.lats, vec![47.0, 48.0]);
    assert_eq!( density.counts, vec![ vec![3, 1], vec![1, 0] ]);

    assert_eq!( density.count( 0.0, 47.0), 3);
    assert_eq!( density.count( 1.0, 48.0), 0);
    assert_eq!( density.count( 5.0, 47.0), 0);
    assert_eq!( density.total(), 5);
    assert_eq!( density.non_zero(), 3);

    let (start,end) = density.interval.unwrap();
    assert_eq!( start, parse_datetime("2018-01-01T00:00:00Z").unwrap());
    assert_eq!( end, parse_datetime("2018-01-04T00:00:00Z").unwrap());
}

#[test]
fn test_csv() {
    let density = PassDensity::from_table( &table());
    let mut buf: Vec<u8> = Vec::new();
    density.write_csv( &mut buf).unwrap();

    let s = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!( lines, vec!["lon_left,lat_bot,count", "0.0,47.0,3", "0.0,48.0,1", "1.0,47.0,1"]);
}

#[test]
fn test_display() {
    let density = PassDensity::from_table( &table());
    let s = density.to_string();
    println!("{s}");

    assert!( s.starts_with("# passes in interval: [2018-01-01 00:00:00 UTC, 2018-01-04 00:00:00 UTC)"));
    assert_eq!( s.lines().count(), 4); // title, lon header and one line per latitude
}

#[test]
fn test_empty() {
    let density = PassDensity::from_table( &PassTable::new());
    assert!( density.is_empty());
    assert_eq!( density.total(), 0);
    assert!( density.interval.is_none());
}
