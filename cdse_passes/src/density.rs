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

//! pass density over the spatial grid, which is the input for polar pass plots (rendering is done elsewhere)

use std::{fmt, io::Write};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::Result;
use crate::table::PassTable;

#[derive(Debug,Serialize)]
struct DensityRow {
    lon_left: f64,
    lat_bot: f64,
    count: usize,
}

/// number of passes per `(lon_left, lat_bot)` cell
#[derive(Debug,Clone,PartialEq)]
pub struct PassDensity {
    /// sorted unique `lon_left` values of the table
    pub lons: Vec<f64>,
    /// sorted unique `lat_bot` values of the table
    pub lats: Vec<f64>,
    /// `counts[lon_idx][lat_idx]`
    pub counts: Vec<Vec<usize>>,
    /// `[min(time_start), max(time_end))` of the table rows
    pub interval: Option<(DateTime<Utc>,DateTime<Utc>)>,
}

fn sorted_unique (mut vs: Vec<f64>)->Vec<f64> {
    vs.sort_by( |a,b| a.total_cmp(b));
    vs.dedup();
    vs
}

fn index_of (vs: &[f64], v: f64)->Option<usize> {
    vs.binary_search_by( |x| x.total_cmp(&v)).ok()
}

impl PassDensity {
    pub fn from_table (table: &PassTable)->Self {
        let lons = sorted_unique( table.iter().map(|r| r.lon_left).collect());
        let lats = sorted_unique( table.iter().map(|r| r.lat_bot).collect());
        let mut counts = vec![ vec![0usize; lats.len()]; lons.len()];

        for rec in table {
            if let (Some(i), Some(j)) = (index_of( &lons, rec.lon_left), index_of( &lats, rec.lat_bot)) {
                counts[i][j] += 1;
            }
        }

        PassDensity { lons, lats, counts, interval: table.time_interval() }
    }

    /// number of passes for the cell with the given lower left corner. 0 for unknown cells
    pub fn count (&self, lon_left: f64, lat_bot: f64)->usize {
        match (index_of( &self.lons, lon_left), index_of( &self.lats, lat_bot)) {
            (Some(i), Some(j)) => self.counts[i][j],
            _ => 0
        }
    }

    pub fn total (&self)->usize {
        self.counts.iter().map(|row| row.iter().sum::<usize>()).sum()
    }

    /// number of cells with at least one pass
    pub fn non_zero (&self)->usize {
        self.counts.iter().flatten().filter(|c| **c > 0).count()
    }

    pub fn is_empty (&self)->bool { self.lons.is_empty() }

    /// write `lon_left,lat_bot,count` records for all cells with passes
    pub fn write_csv<W: Write> (&self, writer: W)->Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        for (i,lon) in self.lons.iter().enumerate() {
            for (j,lat) in self.lats.iter().enumerate() {
                let count = self.counts[i][j];
                if count > 0 {
                    wtr.serialize( DensityRow { lon_left: *lon, lat_bot: *lat, count })?;
                }
            }
        }

        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for PassDensity {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        match &self.interval {
            Some((start,end)) => writeln!(f, "# passes in interval: [{start}, {end})")?,
            None => return writeln!(f, "# no passes")
        }

        write!(f, "{:>8}", "lat\\lon")?;
        for lon in &self.lons { write!(f, " {:>6.1}", lon)?; }
        writeln!(f)?;

        for (j,lat) in self.lats.iter().enumerate().rev() {
            write!(f, "{:>8.1}", lat)?;
            for i in 0..self.lons.len() { write!(f, " {:>6}", self.counts[i][j])?; }
            writeln!(f)?;
        }
        Ok(())
    }
}
