// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, GeoPoint, PathGraph};

/// A node of a [PathGraph] together with its insertion index.
#[derive(Debug, Clone, Copy)]
struct Pivot {
    idx: usize,
    point: GeoPoint,
}

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up snapping for large networks. [PathGraph::snap]
/// scans every node and is only practical for networks of up to a few thousand nodes;
/// a k-d tree trades memory usage for CPU time.
///
/// As with [PathGraph::snap], ties are resolved in favor of the node inserted first.
///
/// This implementation assumes euclidean geometry, even though the distance function
/// used is [earth_distance]. This may return a node which is not the closest when points
/// are close to the ante meridian (180°/-180° longitude) or poles (90°/-90° latitude),
/// or when the data spans multiple continents.
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: Pivot,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the closest node to the given position.
    pub fn snap(&self, query: GeoPoint) -> GeoPoint {
        self.snap_impl(query, false).0.point
    }

    fn snap_impl(&self, query: GeoPoint, lon_divides: bool) -> (Pivot, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot;
        let mut best_dist = earth_distance(query, best.point);

        // Select which branch to recurse into first
        let first_left = if lon_divides {
            query.longitude < best.point.longitude
        } else {
            query.latitude < best.point.latitude
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(ref branch) = first {
            let (alt, alt_dist) = branch.snap_impl(query, !lon_divides);
            if Self::is_better(alt, alt_dist, best, best_dist) {
                best = alt;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch
        if let Some(ref branch) = second {
            // A closer (or equally close) node is possible in the second branch if and only if
            // the splitting axis is not further away than the current best candidate.
            let axis = if lon_divides {
                GeoPoint {
                    latitude: query.latitude,
                    longitude: self.pivot.point.longitude,
                }
            } else {
                GeoPoint {
                    latitude: self.pivot.point.latitude,
                    longitude: query.longitude,
                }
            };

            if earth_distance(query, axis) <= best_dist {
                let (alt, alt_dist) = branch.snap_impl(query, !lon_divides);
                if Self::is_better(alt, alt_dist, best, best_dist) {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        (best, best_dist)
    }

    fn is_better(candidate: Pivot, candidate_dist: f64, best: Pivot, best_dist: f64) -> bool {
        candidate_dist < best_dist || (candidate_dist == best_dist && candidate.idx < best.idx)
    }

    /// Builds a k-d tree over all nodes of a [PathGraph].
    /// Returns `None` if the graph is empty.
    pub fn from_graph(g: &PathGraph) -> Option<Self> {
        let mut pivots = g
            .nodes()
            .enumerate()
            .map(|(idx, point)| Pivot { idx, point })
            .collect::<Vec<_>>();
        let tree = Self::build_impl(pivots.as_mut_slice(), false);
        log::debug!("built k-d tree over {} nodes", pivots.len());
        tree
    }

    fn build_impl(pivots: &mut [Pivot], lon_divides: bool) -> Option<Self> {
        match pivots.len() {
            0 => None,
            1 => Some(Self {
                pivot: pivots[0],
                left: None,
                right: None,
            }),
            _ => {
                if lon_divides {
                    pivots.sort_by(|a, b| a.point.longitude.total_cmp(&b.point.longitude));
                } else {
                    pivots.sort_by(|a, b| a.point.latitude.total_cmp(&b.point.latitude));
                }
                let median = pivots.len() / 2;
                let pivot = pivots[median];
                let (left, right_and_pivot) = pivots.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !lon_divides).map(Box::new),
                    right: Self::build_impl(right, !lon_divides).map(Box::new),
                })
            }
        }
    }
}
