// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::{earth_distance, palette, GeoPoint, InputError, NodeKey};

/// Largest accepted difference between a decoded route's declared and recomputed length.
const LENGTH_TOLERANCE_M: f64 = 1e-6;

/// Which kind of solver produced a [Route].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Produced by a graph search; every segment between the first and last point
    /// is an edge of the network.
    #[default]
    Exact,

    /// Produced by [greedy chaining](crate::find_route_greedy),
    /// with no guarantee of optimality or connectivity.
    BestEffort,
}

impl RouteKind {
    fn is_exact(&self) -> bool {
        *self == RouteKind::Exact
    }
}

/// A route from a query origin, through the network, to a query destination.
///
/// Serializes to (and from) the [WireRoute] representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireRoute", try_from = "WireRoute")]
pub struct Route {
    points: Vec<GeoPoint>,
    total_length_m: f64,
    kind: RouteKind,
}

impl Route {
    /// Builds a route by concatenating `origin`, the network path and `destination`.
    ///
    /// The first and last elements of `path` are dropped if they share a [NodeKey] with
    /// `origin` and `destination` respectively, so that the route never starts or ends with
    /// a zero-length segment.
    pub fn assemble(
        origin: GeoPoint,
        destination: GeoPoint,
        path: &[GeoPoint],
        kind: RouteKind,
    ) -> Self {
        let mut points = Vec::with_capacity(path.len() + 2);
        points.push(origin);

        for &p in path.iter().chain(std::iter::once(&destination)) {
            let last = points[points.len() - 1];
            if NodeKey::of(last) != NodeKey::of(p) {
                points.push(p);
            }
        }

        Self {
            total_length_m: path_length(&points),
            points,
            kind,
        }
    }

    /// Returns the points of the route, from origin to destination.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Returns the sum of great-circle distances between consecutive points, in meters.
    pub fn total_length_m(&self) -> f64 {
        self.total_length_m
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Serializes the route as a GeoJSON Feature with a LineString geometry.
    /// As mandated by [RFC 7946](https://datatracker.ietf.org/doc/html/rfc7946#section-3.1.1),
    /// coordinates are longitude-first.
    pub fn to_geojson(&self) -> serde_json::Value {
        let coordinates: Vec<_> = self
            .points
            .iter()
            .map(|p| [p.longitude, p.latitude])
            .collect();

        serde_json::json!({
            "type": "Feature",
            "properties": {
                "length_m": self.total_length_m,
                "kind": self.kind,
                "stroke": palette::ROUTE_COLOR,
            },
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
        })
    }
}

/// Transport representation of a [Route]:
/// `{"route": [[lat, lon], ...], "length_m": 123.4}`.
///
/// Coordinate pairs are always **latitude-first**. Routes from the
/// [greedy fallback](crate::find_route_greedy) additionally carry `"kind": "best_effort"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRoute {
    pub route: Vec<[f64; 2]>,
    pub length_m: f64,
    #[serde(default, skip_serializing_if = "RouteKind::is_exact")]
    pub kind: RouteKind,
}

impl From<Route> for WireRoute {
    fn from(r: Route) -> Self {
        Self {
            route: r.points.iter().map(|p| [p.latitude, p.longitude]).collect(),
            length_m: r.total_length_m,
            kind: r.kind,
        }
    }
}

impl TryFrom<WireRoute> for Route {
    type Error = InputError;

    /// Validates a decoded route. The declared `length_m` must agree with the points,
    /// and the stored length is always the recomputed one.
    fn try_from(w: WireRoute) -> Result<Self, Self::Error> {
        if !w.length_m.is_finite() {
            return Err(InputError::NonFinite);
        }
        if w.route.is_empty() {
            return Err(InputError::EmptyRoute);
        }

        let points = w
            .route
            .iter()
            .map(|&[latitude, longitude]| GeoPoint::new(latitude, longitude))
            .collect::<Result<Vec<_>, _>>()?;

        let computed = path_length(&points);
        if (computed - w.length_m).abs() > LENGTH_TOLERANCE_M {
            return Err(InputError::LengthMismatch {
                declared: w.length_m,
                computed,
            });
        }

        Ok(Self {
            points,
            total_length_m: computed,
            kind: w.kind,
        })
    }
}

fn path_length(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| earth_distance(w[0], w[1])).sum()
}
