// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Routing between arbitrary coordinates over a network of path segments.
//!
//! A [PathGraph] is built from a collection of [polylines](Polyline), with every
//! pair of consecutive points becoming an undirected edge weighted by its
//! [great-circle length](earth_distance). Query coordinates do not need to lie on
//! the network: they are snapped to their nearest node, the network is searched
//! between the two snapped nodes, and the resulting [Route] runs from the raw
//! origin, through the network, to the raw destination.
//!
//! # Example
//!
//! ```no_run
//! use pathroute::{GeoPoint, RouteOptions, RouteQuery};
//!
//! let options = pathroute::dataset::Options::default();
//! let g = pathroute::dataset::load_from_file(&options, "path/to/paths.json")
//!     .expect("failed to load the path dataset");
//!
//! let query = RouteQuery::new(
//!     GeoPoint::new(-0.7148, 37.1479).unwrap(),
//!     GeoPoint::new(-0.7157, 37.1476).unwrap(),
//! );
//! match pathroute::find_route(&g, &query, &RouteOptions::default()) {
//!     Ok(Some(route)) => println!("{}", route.to_json().unwrap()),
//!     Ok(None) => println!("no route"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

#[cfg(test)]
#[macro_use]
mod test_util;

pub mod dataset;
mod distance;
mod error;
mod graph;
mod kd;
mod nearest;
pub mod palette;
mod route;
mod router;
mod search;

pub use distance::earth_distance;
pub use error::{Error, InputError};
pub use graph::{GraphBuilder, NodeKey, PathGraph, PolylineView, QUANTIZATION_DIGITS};
pub use kd::KDTree;
pub use route::{Route, RouteKind, WireRoute};
pub use router::{find_route, Network, RouteOptions, RouteQuery, Solver};
pub use search::{
    find_route_fewest_edges, find_route_greedy, find_route_weighted, CancelToken, SearchError,
    SearchLimits, DEFAULT_GREEDY_TOLERANCE_M, DEFAULT_STEP_LIMIT,
};

/// A position on Earth, in degrees.
///
/// Equality is exact. Graph nodes are identified by the coarser [NodeKey] instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point, rejecting non-finite and out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InputError> {
        let p = Self {
            latitude,
            longitude,
        };
        p.validate()?;
        Ok(p)
    }

    /// Checks that latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            Err(InputError::NonFinite)
        } else if !(-90.0..=90.0).contains(&self.latitude) {
            Err(InputError::LatitudeOutOfRange(self.latitude))
        } else if !(-180.0..=180.0).contains(&self.longitude) {
            Err(InputError::LongitudeOutOfRange(self.longitude))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// An undirected connection between two nodes of a [PathGraph].
///
/// `length_m` always equals the [earth_distance] between `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: GeoPoint,
    pub b: GeoPoint,
    pub length_m: f64,
}

/// An ordered sequence of points representing one walkable stretch of the network.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub name: Option<String>,
    pub points: Vec<GeoPoint>,
}

impl Polyline {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { name: None, points }
    }

    pub fn named<S: Into<String>>(name: S, points: Vec<GeoPoint>) -> Self {
        Self {
            name: Some(name.into()),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_validation() {
        assert!(GeoPoint::new(-0.7148, 37.1479).is_ok());
        assert!(GeoPoint::new(90.0, -180.0).is_ok());
        assert_eq!(
            GeoPoint::new(90.5, 0.0),
            Err(InputError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -180.5),
            Err(InputError::LongitudeOutOfRange(-180.5))
        );
        assert_eq!(GeoPoint::new(f64::NAN, 0.0), Err(InputError::NonFinite));
        assert_eq!(
            GeoPoint::new(0.0, f64::INFINITY),
            Err(InputError::NonFinite)
        );
    }
}
