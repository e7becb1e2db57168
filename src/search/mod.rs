// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod bfs;
mod error;
mod greedy;
mod limits;
mod weighted;

pub use bfs::find_route_fewest_edges;
pub use error::SearchError;
pub use greedy::{find_route_greedy, DEFAULT_GREEDY_TOLERANCE_M};
pub use limits::{CancelToken, SearchLimits, DEFAULT_STEP_LIMIT};
pub use weighted::find_route_weighted;

use crate::{GeoPoint, PathGraph};

/// Resolves the start and end points of a search to node indices.
fn endpoints(g: &PathGraph, start: GeoPoint, end: GeoPoint) -> Result<(usize, usize), SearchError> {
    let Some(from) = g.node_index(start) else {
        return Err(SearchError::InvalidReference(start));
    };
    let Some(to) = g.node_index(end) else {
        return Err(SearchError::InvalidReference(end));
    };
    Ok((from, to))
}

/// Walks `came_from` back from `last`, returning the path from the search origin.
fn reconstruct_path(g: &PathGraph, came_from: &[Option<usize>], mut last: usize) -> Vec<GeoPoint> {
    let mut path = vec![g.point(last)];

    while let Some(nd) = came_from[last] {
        path.push(g.point(nd));
        last = nd;
    }

    path.reverse();
    path
}
