// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::{endpoints, reconstruct_path, SearchError, SearchLimits};
use crate::graph::Link;
use crate::{earth_distance, GeoPoint, PathGraph};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: usize,
    cost: f64,
    score: f64,
    seq: u64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        // Among equal scores, items pushed earlier win.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two nodes in the provided graph.
/// Since every edge costs exactly its great-circle length, the crow-flies distance
/// is an admissible heuristic, and the result matches Dijkstra's algorithm.
///
/// `start` and `end` must be nodes of the graph (see [PathGraph::snap]).
/// Returns `Ok(None)` if the two nodes are not connected, and a single-node
/// path if `start` and `end` are the same node.
///
/// When multiple shortest routes exist, the one discovered first wins:
/// a node's predecessor is only replaced by a strictly cheaper one, and
/// edges are explored in insertion order.
///
/// Concluding that no route exists requires expanding all nodes reachable from
/// the start; [SearchLimits] bound how much work that may take.
pub fn find_route_weighted(
    g: &PathGraph,
    start: GeoPoint,
    end: GeoPoint,
    limits: &SearchLimits,
) -> Result<Option<Vec<GeoPoint>>, SearchError> {
    let (from_idx, to_idx) = endpoints(g, start, end)?;
    let to_node = g.point(to_idx);

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: Vec<Option<usize>> = vec![None; g.len()];
    let mut known_costs: Vec<f64> = vec![f64::INFINITY; g.len()];
    let mut steps: usize = 0;
    let mut seq: u64 = 0;

    queue.push(QueueItem {
        at: from_idx,
        cost: 0.0,
        score: earth_distance(g.point(from_idx), to_node),
        seq,
    });
    known_costs[from_idx] = 0.0;

    while let Some(item) = queue.pop() {
        if item.at == to_idx {
            log::trace!("weighted search: found route after {steps} expansion(s)");
            return Ok(Some(reconstruct_path(g, &came_from, to_idx)));
        }

        // Contrary to the wikipedia definition, the queue may hold several items for the same node.
        if item.cost > known_costs[item.at] {
            continue;
        }

        steps += 1;
        limits.check(steps)?;

        for &Link {
            to: neighbor_idx,
            cost: edge_cost,
        } in g.links(item.at)
        {
            // Check if this is the cheapest way to the neighbor
            let neighbor_cost = item.cost + edge_cost;
            if neighbor_cost >= known_costs[neighbor_idx] {
                continue;
            }

            // Push the new item into the queue
            came_from[neighbor_idx] = Some(item.at);
            known_costs[neighbor_idx] = neighbor_cost;
            seq += 1;
            queue.push(QueueItem {
                at: neighbor_idx,
                cost: neighbor_cost,
                score: neighbor_cost + earth_distance(g.point(neighbor_idx), to_node),
                seq,
            });
        }
    }

    log::trace!("weighted search: no route after {steps} expansion(s)");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::{chain, detour, islands};
    use crate::test_util::pt;
    use crate::CancelToken;

    fn path_length(path: &[GeoPoint]) -> f64 {
        path.windows(2).map(|w| earth_distance(w[0], w[1])).sum()
    }

    #[test]
    fn chain_visits_all_nodes_in_order() {
        let (g, points) = chain(12);
        let path = find_route_weighted(&g, points[0], points[11], &SearchLimits::default())
            .unwrap()
            .unwrap();
        assert_eq!(path, points);
        assert_almost_eq!(path_length(&path), 110.0, 1e-6);
    }

    #[test]
    fn prefers_shorter_distance_over_fewer_edges() {
        let g = detour();
        let path = find_route_weighted(&g, pt(0.0, 0.0), pt(0.0, 0.003), &SearchLimits::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            path,
            vec![
                pt(0.0, 0.0),
                pt(0.0, 0.00075),
                pt(0.0, 0.0015),
                pt(0.0, 0.00225),
                pt(0.0, 0.003),
            ]
        );
    }

    #[test]
    fn same_start_and_end() {
        let (g, points) = chain(3);
        let path = find_route_weighted(&g, points[1], points[1], &SearchLimits::default());
        assert_eq!(path, Ok(Some(vec![points[1]])));
    }

    #[test]
    fn disconnected_components() {
        let g = islands();
        let (start, end) = (pt(0.0, 0.0), pt(0.01, 0.001));
        let path = find_route_weighted(&g, start, end, &SearchLimits::default());
        assert_eq!(path, Ok(None));
    }

    #[test]
    fn invalid_reference() {
        let (g, points) = chain(3);
        let outside = pt(5.0, 5.0);
        assert_eq!(
            find_route_weighted(&g, points[0], outside, &SearchLimits::default()),
            Err(SearchError::InvalidReference(outside))
        );
    }

    #[test]
    fn equal_routes_resolve_to_first_discovered() {
        // A square: both A-B-D and A-C-D have the same length
        let a = pt(0.0, -0.001);
        let b = pt(0.001, 0.0);
        let c = pt(-0.001, 0.0);
        let d = pt(0.0, 0.001);
        let g = PathGraph::build(vec![
            crate::Polyline::new(vec![a, b, d]),
            crate::Polyline::new(vec![a, c, d]),
        ])
        .unwrap();

        for _ in 0..3 {
            let path = find_route_weighted(&g, a, d, &SearchLimits::default())
                .unwrap()
                .unwrap();
            assert_eq!(path, vec![a, b, d]);
        }
    }

    #[test]
    fn step_limit_exceeded() {
        let (g, points) = chain(50);
        let limits = SearchLimits::default().with_step_limit(10);
        assert_eq!(
            find_route_weighted(&g, points[0], points[49], &limits),
            Err(SearchError::StepLimitExceeded)
        );
    }

    #[test]
    fn cancelled() {
        let (g, points) = chain(5);
        let token = CancelToken::new();
        token.cancel();
        let limits = SearchLimits::default().with_cancel(token);
        assert_eq!(
            find_route_weighted(&g, points[0], points[4], &limits),
            Err(SearchError::Cancelled)
        );
    }
}
