// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Error, GeoPoint, PathGraph};

impl PathGraph {
    /// Snaps an arbitrary position to the closest node of the graph.
    ///
    /// This function requires computing the distance to every node in the graph,
    /// and is not suitable for large graphs; use a [KDTree](crate::KDTree) instead.
    /// When several nodes are equally close, the one inserted first wins,
    /// so repeated calls with the same input always agree.
    pub fn snap(&self, query: GeoPoint) -> Result<GeoPoint, Error> {
        self.nearest_node_index(query)
            .map(|idx| self.point(idx))
            .ok_or(Error::EmptyNetwork)
    }

    pub(crate) fn nearest_node_index(&self, query: GeoPoint) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, node) in self.nodes().enumerate() {
            let dist = earth_distance(query, node);
            match best {
                Some((_, best_dist)) if best_dist <= dist => {}
                _ => best = Some((idx, dist)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}
