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

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;
use parse_duration::parse;

/// the instant format used by the Sentinel Hub APIs (no fractional seconds, literal 'Z')
pub const ISO_INSTANT_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn hours (n: u64)->Duration { Duration::from_secs(n * 3600) }
#[inline] pub fn days (n: u64)->Duration { Duration::from_secs(n * 86400) }

#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

pub fn iso_instant_string (dt: &DateTime<Utc>) -> String {
    dt.format(ISO_INSTANT_FMT).to_string()
}

/// `<start>/<end>` interval as used in STAC `datetime` query parameters
pub fn iso_interval_string (start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    format!("{}/{}", iso_instant_string(start), iso_instant_string(end))
}

pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Some(dt.to_utc()),
        Err(_) => None
    }
}

/// half-open range of instants `[start, end)` with the given step. Returns an empty vec for a zero step
/// or a step that does not fit into a TimeDelta
pub fn arange_datetimes (start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Vec<DateTime<Utc>> {
    let mut v = Vec::new();
    if let Ok(dt) = TimeDelta::from_std(step) {
        if dt > TimeDelta::zero() {
            let mut t = start;
            while t < end {
                v.push(t);
                t = t + dt;
            }
        }
    }
    v
}

//--- support for serde

pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn deserialize_optional_duration <'a,D>(deserializer: D) -> Result<Option<Duration>,D::Error>
    where D: Deserializer<'a>
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        let d =  parse(s.as_str()).map_err( |e| serde::de::Error::custom(format!("{:?}",e)))?;
        return Ok( Some(d) )
    }

    Ok(None)
}

/// serializes as seconds with unit suffix ("21600s"), which can be read back by [`deserialize_duration`]
pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_str( &format!("{}s", dur.as_secs()))
}

pub fn serialize_optional_duration<S: Serializer> (dur: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match dur {
        Some(d) => s.serialize_some( &format!("{}s", d.as_secs())),
        None => s.serialize_none()
    }
}
