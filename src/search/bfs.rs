// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;

use super::{endpoints, reconstruct_path, SearchError, SearchLimits};
use crate::{GeoPoint, PathGraph};

/// Uses [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search)
/// to find the route with the fewest edges between two nodes, ignoring edge lengths.
///
/// This is a cheap reachability check, not a distance-correct router;
/// use [find_route_weighted](crate::find_route_weighted) for shortest routes.
/// Otherwise behaves like the weighted search: `Ok(None)` on disconnected nodes,
/// a single-node path when `start` and `end` are the same node.
pub fn find_route_fewest_edges(
    g: &PathGraph,
    start: GeoPoint,
    end: GeoPoint,
    limits: &SearchLimits,
) -> Result<Option<Vec<GeoPoint>>, SearchError> {
    let (from_idx, to_idx) = endpoints(g, start, end)?;

    let mut queue: VecDeque<usize> = VecDeque::from([from_idx]);
    let mut came_from: Vec<Option<usize>> = vec![None; g.len()];
    let mut visited: Vec<bool> = vec![false; g.len()];
    let mut steps: usize = 0;
    visited[from_idx] = true;

    while let Some(at) = queue.pop_front() {
        if at == to_idx {
            log::trace!("fewest-edges search: found route after {steps} expansion(s)");
            return Ok(Some(reconstruct_path(g, &came_from, to_idx)));
        }

        steps += 1;
        limits.check(steps)?;

        for link in g.links(at) {
            if !visited[link.to] {
                visited[link.to] = true;
                came_from[link.to] = Some(at);
                queue.push_back(link.to);
            }
        }
    }

    log::trace!("fewest-edges search: no route after {steps} expansion(s)");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::{chain, detour, islands};
    use crate::test_util::pt;
    use crate::CancelToken;

    #[test]
    fn prefers_fewer_edges_over_shorter_distance() {
        let g = detour();
        let (start, end) = (pt(0.0, 0.0), pt(0.0, 0.003));
        let path = find_route_fewest_edges(&g, start, end, &SearchLimits::default());
        assert_eq!(path, Ok(Some(vec![start, pt(-0.002, 0.0015), end])));
    }

    #[test]
    fn reversed_chain() {
        let (g, points) = chain(6);
        let path = find_route_fewest_edges(&g, points[5], points[0], &SearchLimits::default());
        let mut expected = points.clone();
        expected.reverse();
        assert_eq!(path, Ok(Some(expected)));
    }

    #[test]
    fn same_start_and_end() {
        let (g, points) = chain(2);
        assert_eq!(
            find_route_fewest_edges(&g, points[0], points[0], &SearchLimits::default()),
            Ok(Some(vec![points[0]]))
        );
    }

    #[test]
    fn disconnected_components() {
        let g = islands();
        let (start, end) = (pt(0.0, 0.001), pt(0.01, 0.0));
        let path = find_route_fewest_edges(&g, start, end, &SearchLimits::default());
        assert_eq!(path, Ok(None));
    }

    #[test]
    fn step_limit_exceeded() {
        let (g, points) = chain(50);
        let limits = SearchLimits::default().with_step_limit(10);
        assert_eq!(
            find_route_fewest_edges(&g, points[0], points[49], &limits),
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
            find_route_fewest_edges(&g, points[0], points[4], &limits),
            Err(SearchError::Cancelled)
        );
    }
}
