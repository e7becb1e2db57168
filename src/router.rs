// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    find_route_fewest_edges, find_route_greedy, find_route_weighted, Error, GeoPoint, PathGraph,
    Route, RouteKind, SearchLimits, DEFAULT_GREEDY_TOLERANCE_M,
};

/// Two positions to route between. Neither has to be a node of the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    pub origin: GeoPoint,
    pub target: GeoPoint,
}

impl RouteQuery {
    pub fn new(origin: GeoPoint, target: GeoPoint) -> Self {
        Self { origin, target }
    }
}

/// Policy used to search the network between the two snapped nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Solver {
    /// Shortest route by distance, see [find_route_weighted].
    #[default]
    Weighted,

    /// Route with the fewest edges, see [find_route_fewest_edges].
    FewestEdges,

    /// Best-effort polyline chaining, see [find_route_greedy].
    Greedy,
}

/// Controls for answering a [RouteQuery].
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub solver: Solver,
    pub limits: SearchLimits,

    /// Distance from the destination at which [Solver::Greedy] stops, in meters.
    pub greedy_tolerance_m: f64,

    /// Retry with [Solver::Greedy] when the selected solver finds no route.
    /// Such routes are labeled [RouteKind::BestEffort].
    pub fallback_to_greedy: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            solver: Solver::default(),
            limits: SearchLimits::default(),
            greedy_tolerance_m: DEFAULT_GREEDY_TOLERANCE_M,
            fallback_to_greedy: false,
        }
    }
}

/// Finds a route between two arbitrary positions over the provided network.
///
/// Both query positions are validated, then [snapped](PathGraph::snap) to their nearest
/// nodes, and the network is searched between those nodes. The resulting [Route]
/// starts at `query.origin` and ends at `query.target`.
///
/// Returns `Ok(None)` when the snapped nodes are not connected (and, if enabled,
/// the greedy fallback also failed). Fails with [Error::Input] on invalid coordinates,
/// [Error::EmptyNetwork] on an empty graph and [Error::Search] when the search is
/// aborted by its [SearchLimits].
pub fn find_route(
    g: &PathGraph,
    query: &RouteQuery,
    options: &RouteOptions,
) -> Result<Option<Route>, Error> {
    query.origin.validate()?;
    query.target.validate()?;
    if g.is_empty() {
        return Err(Error::EmptyNetwork);
    }

    let start = g.snap(query.origin)?;
    let end = g.snap(query.target)?;
    log::debug!(
        "routing {} -> {} via snapped nodes {} -> {}",
        query.origin,
        query.target,
        start,
        end,
    );

    let greedy = || find_route_greedy(g, start, end, options.greedy_tolerance_m, &options.limits);

    let (path, kind) = match options.solver {
        Solver::Weighted => (
            find_route_weighted(g, start, end, &options.limits)?,
            RouteKind::Exact,
        ),
        Solver::FewestEdges => (
            find_route_fewest_edges(g, start, end, &options.limits)?,
            RouteKind::Exact,
        ),
        Solver::Greedy => (greedy()?, RouteKind::BestEffort),
    };

    let (path, kind) = match path {
        None if options.fallback_to_greedy && options.solver != Solver::Greedy => {
            log::info!("no route between {start} and {end}, falling back to greedy chaining");
            (greedy()?, RouteKind::BestEffort)
        }
        path => (path, kind),
    };

    match path {
        Some(path) => Ok(Some(Route::assemble(
            query.origin,
            query.target,
            &path,
            kind,
        ))),
        None => {
            log::debug!("no route between {start} and {end}");
            Ok(None)
        }
    }
}

/// Holder of the current [PathGraph], shared between concurrent queries.
///
/// Queries take a [snapshot](Network::snapshot) and search it without any locking.
/// [Replacing](Network::replace) the graph never affects snapshots already taken,
/// so in-flight searches keep running against a consistent network.
#[derive(Debug, Default)]
pub struct Network(RwLock<Arc<PathGraph>>);

impl Network {
    pub fn new(g: PathGraph) -> Self {
        Self(RwLock::new(Arc::new(g)))
    }

    /// Returns the current graph.
    pub fn snapshot(&self) -> Arc<PathGraph> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Atomically swaps in a new graph, returning the previous one.
    pub fn replace(&self, g: PathGraph) -> Arc<PathGraph> {
        let mut current = self.0.write().unwrap_or_else(PoisonError::into_inner);
        log::debug!(
            "replacing path network: {} -> {} nodes",
            current.len(),
            g.len()
        );
        std::mem::replace(&mut *current, Arc::new(g))
    }

    /// Routes over the current snapshot, see [find_route].
    pub fn find_route(
        &self,
        query: &RouteQuery,
        options: &RouteOptions,
    ) -> Result<Option<Route>, Error> {
        find_route(&self.snapshot(), query, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fixtures::{chain, TEN_METERS_LAT};
    use crate::test_util::pt;
    use crate::{earth_distance, InputError, Polyline, SearchError};

    fn two_segments() -> PathGraph {
        PathGraph::build(vec![
            Polyline::new(vec![pt(0.0, 0.0), pt(0.0, 0.0001)]),
            Polyline::new(vec![pt(0.0, 0.0001), pt(0.0, 0.0002)]),
        ])
        .unwrap()
    }

    #[test]
    fn end_to_end_on_network_nodes() {
        let g = two_segments();
        let query = RouteQuery::new(pt(0.0, 0.0), pt(0.0, 0.0002));
        let route = find_route(&g, &query, &RouteOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(
            route.points(),
            &[pt(0.0, 0.0), pt(0.0, 0.0001), pt(0.0, 0.0002)]
        );
        assert_almost_eq!(route.total_length_m(), 22.2, 0.1);
        assert_eq!(route.kind(), RouteKind::Exact);
    }

    #[test]
    fn end_to_end_off_network() {
        let (g, points) = chain(5);
        // ~20 m west of the first node and ~20 m east of the last
        let origin = pt(points[0].latitude, points[0].longitude - 0.00018);
        let target = pt(points[4].latitude, points[4].longitude + 0.00018);
        let query = RouteQuery::new(origin, target);
        let route = find_route(&g, &query, &RouteOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(route.points().len(), 7);
        assert_eq!(route.points()[0], origin);
        assert_eq!(&route.points()[1..6], points.as_slice());
        assert_eq!(route.points()[6], target);
        let expected = 40.0 + earth_distance(origin, points[0]) + earth_distance(points[4], target);
        assert_almost_eq!(route.total_length_m(), expected, 1e-6);
    }

    #[test]
    fn disconnected_network_has_no_route() {
        // Two segments 1 km apart, queried from 50 m beyond the outer ends
        let g = PathGraph::build(vec![
            Polyline::new(vec![pt(0.0, 0.0), pt(0.0, 0.001)]),
            Polyline::new(vec![pt(0.0, 0.01), pt(0.0, 0.011)]),
        ])
        .unwrap();
        let fifty_m = 5.0 * TEN_METERS_LAT;
        let query = RouteQuery::new(pt(0.0, -fifty_m), pt(0.0, 0.011 + fifty_m));
        assert_eq!(find_route(&g, &query, &RouteOptions::default()), Ok(None));

        let options = RouteOptions {
            solver: Solver::FewestEdges,
            ..RouteOptions::default()
        };
        assert_eq!(find_route(&g, &query, &options), Ok(None));
    }

    #[test]
    fn greedy_fallback_is_labeled() {
        let g = PathGraph::build(vec![
            Polyline::new(vec![pt(0.0, 0.0), pt(0.0, 0.001)]),
            Polyline::new(vec![pt(0.0, 0.002), pt(0.0, 0.003)]),
        ])
        .unwrap();
        let query = RouteQuery::new(pt(0.0, 0.0), pt(0.0, 0.003));
        let options = RouteOptions {
            fallback_to_greedy: true,
            ..RouteOptions::default()
        };
        let route = find_route(&g, &query, &options).unwrap().unwrap();
        assert_eq!(route.kind(), RouteKind::BestEffort);
        assert_eq!(route.points().first(), Some(&pt(0.0, 0.0)));
        assert_eq!(route.points().last(), Some(&pt(0.0, 0.003)));
    }

    #[test]
    fn greedy_solver() {
        let g = two_segments();
        let query = RouteQuery::new(pt(0.0, 0.0), pt(0.0, 0.0002));
        let options = RouteOptions {
            solver: Solver::Greedy,
            greedy_tolerance_m: 5.0,
            ..RouteOptions::default()
        };
        let route = find_route(&g, &query, &options).unwrap().unwrap();
        assert_eq!(route.kind(), RouteKind::BestEffort);
        assert_eq!(route.points().len(), 3);
    }

    #[test]
    fn rejects_invalid_input_before_graph_access() {
        let query = RouteQuery::new(pt(0.0, 0.0), pt(0.0, 200.0));
        // Even an empty network reports the input error first
        assert_eq!(
            find_route(&PathGraph::default(), &query, &RouteOptions::default()),
            Err(Error::Input(InputError::LongitudeOutOfRange(200.0)))
        );
    }

    #[test]
    fn empty_network() {
        let query = RouteQuery::new(pt(0.0, 0.0), pt(0.0, 0.0001));
        assert_eq!(
            find_route(&PathGraph::default(), &query, &RouteOptions::default()),
            Err(Error::EmptyNetwork)
        );
    }

    #[test]
    fn search_errors_are_propagated() {
        let (g, points) = chain(20);
        let query = RouteQuery::new(points[0], points[19]);
        let options = RouteOptions {
            limits: SearchLimits::default().with_step_limit(3),
            ..RouteOptions::default()
        };
        assert_eq!(
            find_route(&g, &query, &options),
            Err(Error::Search(SearchError::StepLimitExceeded))
        );
    }

    #[test]
    fn snapshots_survive_replacement() {
        let network = Network::new(two_segments());
        let before = network.snapshot();

        let old = network.replace(PathGraph::default());
        assert!(Arc::ptr_eq(&before, &old));
        assert_eq!(before.len(), 3);
        assert!(network.snapshot().is_empty());

        let query = RouteQuery::new(pt(0.0, 0.0), pt(0.0, 0.0002));
        let route = find_route(&before, &query, &RouteOptions::default());
        assert!(matches!(route, Ok(Some(_))));
        assert_eq!(
            network.find_route(&query, &RouteOptions::default()),
            Err(Error::EmptyNetwork)
        );
    }

    #[test]
    fn concurrent_queries_share_a_snapshot() {
        let network = Network::new(chain(30).0);
        let (_, points) = chain(30);
        let query = RouteQuery::new(points[0], points[29]);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| network.find_route(&query, &RouteOptions::default())))
                .collect();
            for h in handles {
                let route = h.join().unwrap().unwrap().unwrap();
                assert_almost_eq!(route.total_length_m(), 290.0, 1e-6);
            }
        });
    }
}
