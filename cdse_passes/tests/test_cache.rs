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

use serde_json::json;
use cdse_common::datetime::{days, parse_datetime};
use cdse_passes::{CacheConfig, CacheStatus, CdseError, GridCell, PassCache, PassRecord, PassTable, CACHE_KEY};

fn record (lat_bot: f64, lon_left: f64, id: &str)->PassRecord {
    let cell = GridCell {
        lat_bot, lat_up: lat_bot + 1.0, lon_left, lon_right: lon_left + 1.0,
        time_start: parse_datetime("2018-01-01T00:00:00Z").unwrap(),
        time_end: parse_datetime("2018-01-01T06:00:00Z").unwrap(),
    };
    let feature = json!({
        "id": id,
        "type": "Feature",
        "properties": {"datetime": "2018-01-01T05:17:32Z", "sat:orbit_state": "descending"},
        "assets": {}
    });
    PassRecord::new( &cell, feature.as_object().unwrap().clone(), 1)
}

fn table()->PassTable {
    PassTable::from_rows( vec![ record( 47.0, 0.0, "a"), record( 48.0, 0.0, "b"), record( 47.0, 1.0, "c") ])
}

#[test]
fn test_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PassCache::new( dir.path().join("passes.json"), None);
    assert_eq!( cache.status(), CacheStatus::Missing);

    let table = table();
    cache.store( &table).unwrap();
    assert!( matches!( cache.status(), CacheStatus::Fresh(_)));

    let loaded = cache.load().unwrap();
    assert_eq!( loaded.len(), table.len());
    assert_eq!( loaded, table);
    assert_eq!( loaded.rows()[1].feature["properties"]["sat:orbit_state"], json!("descending"));

    // the rows are stored under a fixed key
    let doc: serde_json::Value = serde_json::from_slice( &std::fs::read( cache.path()).unwrap()).unwrap();
    assert_eq!( doc[CACHE_KEY].as_array().unwrap().len(), 3);
}

#[test]
fn test_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PassCache::new( dir.path().join("passes.json"), None);

    cache.store( &PassTable::new()).unwrap();
    assert!( cache.load().unwrap().is_empty());
}

#[test]
fn test_missing_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PassCache::new( dir.path().join("nope.json"), None);

    assert!( matches!( cache.load(), Err(CdseError::CacheMissing(_))));
    assert!( matches!( cache.load_fresh(), Err(CdseError::CacheMissing(_))));
    assert!( !cache.invalidate().unwrap());
}

#[test]
fn test_stale_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("passes.json");

    let cache = PassCache::new( &path, Some( std::time::Duration::ZERO));
    cache.store( &table()).unwrap();
    assert!( matches!( cache.status(), CacheStatus::Stale(_)));
    assert!( matches!( cache.load_fresh(), Err(CdseError::StaleCache(..))));
    assert_eq!( cache.load().unwrap().len(), 3); // explicit loads ignore the age

    let cache = PassCache::from_config( &CacheConfig { path: path.clone(), max_age: Some( days(30)) });
    assert!( matches!( cache.status(), CacheStatus::Fresh(_)));
    assert_eq!( cache.load_fresh().unwrap().len(), 3);
}

#[test]
fn test_invalidate() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PassCache::new( dir.path().join("passes.json"), None);

    cache.store( &table()).unwrap();
    assert!( cache.invalidate().unwrap());
    assert_eq!( cache.status(), CacheStatus::Missing);
}

#[test]
fn test_wrong_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("passes.json");
    std::fs::write( &path, r#"{"rows": []}"#).unwrap();

    let cache = PassCache::new( &path, None);
    assert!( matches!( cache.load(), Err(CdseError::OpFailed(_))));
}

#[test]
fn test_store_replaces_previous() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PassCache::new( dir.path().join("passes.json"), None);

    cache.store( &table()).unwrap();
    cache.store( &PassTable::from_rows( vec![ record( 50.0, 5.0, "z") ])).unwrap();

    let loaded = cache.load().unwrap();
    assert_eq!( loaded.len(), 1);
    assert_eq!( loaded.rows()[0].id(), Some("z"));
    assert_eq!( std::fs::read_dir( dir.path()).unwrap().count(), 1); // no temp files left behind
}
