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

//! traversal of the whole grid and aggregation of the per-cell results into a single table

use std::fmt;
use tracing::{info, warn};

use crate::CdseConfig;
use crate::catalog::{fetch_cell, fetch_window, CatalogSearch, FetchStrategy, WindowFetch};
use crate::errors::{CdseError, Result};
use crate::grid::{GridAxes, GridCell};
use crate::table::PassTable;

#[derive(Debug,Clone,Default,PartialEq,Eq)]
pub struct CollectStats {
    /// number of grid cells we covered
    pub n_cells: usize,
    /// number of catalog queries (not counting retries)
    pub n_queries: usize,
    /// cells without matches
    pub n_empty: usize,
    /// cells with more than one candidate (of which we only kept the first)
    pub n_multiple: usize,
    /// cells that were skipped because of malformed responses
    pub n_malformed: usize,
    /// batched mode features that could not be assigned to a time cell (no `properties.datetime`)
    pub n_undated: usize,
}

impl fmt::Display for CollectStats {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!(f, "cells: {}, queries: {}, empty: {}, multiple: {}, malformed: {}, undated: {}",
               self.n_cells, self.n_queries, self.n_empty, self.n_multiple, self.n_malformed, self.n_undated)
    }
}

/// query the catalog for all cells of the grid and collect the matches in traversal order
/// (longitude-major, then latitude, then time).
/// Malformed responses only skip the affected cells, all other errors abort the collection
pub async fn collect_passes<S> (search: &S, config: &CdseConfig, axes: &GridAxes)->Result<(PassTable,CollectStats)>
    where S: CatalogSearch + ?Sized
{
    let mut table = PassTable::new();
    let mut stats = CollectStats::default();

    for sc in axes.spatial_cells() {
        info!("Processing {}", sc);

        match config.strategy {
            FetchStrategy::PerCell => {
                for cell in axes.time_cells(sc) {
                    stats.n_cells += 1;
                    stats.n_queries += 1;

                    match fetch_cell( search, &config.catalog, &config.retry, &cell).await {
                        Ok(Some(rec)) => {
                            if rec.n_returned > 1 { stats.n_multiple += 1 }
                            table.push(rec);
                        }
                        Ok(None) => stats.n_empty += 1,
                        Err(CdseError::MalformedResponse(msg)) => {
                            warn!("skipping cell {}: {}", cell, msg);
                            stats.n_malformed += 1;
                        }
                        Err(e) => return Err(e)
                    }
                }
            }

            FetchStrategy::Batched { window_steps } => {
                let cells: Vec<GridCell> = axes.time_cells(sc).collect();

                for range in axes.time_windows( window_steps) {
                    let window = &cells[range];
                    stats.n_cells += window.len();

                    let mut wf = WindowFetch::default();
                    let res = fetch_window( search, &config.catalog, &config.retry, &sc, window, &mut wf).await;
                    stats.n_queries += wf.n_queries;
                    stats.n_undated += wf.n_undated;

                    match res {
                        Ok(()) => {
                            stats.n_empty += window.len() - wf.records.len();
                            stats.n_multiple += wf.records.iter().filter(|r| r.n_returned > 1).count();
                            table.append( &mut wf.records);
                        }
                        Err(CdseError::MalformedResponse(msg)) => {
                            warn!("skipping {} cells of {}: {}", window.len(), sc, msg);
                            stats.n_malformed += window.len();
                        }
                        Err(e) => return Err(e)
                    }
                }
            }
        }

        info!("currently found passes: {}", table.len());
    }

    Ok((table,stats))
}
