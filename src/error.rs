// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::SearchError;

/// Rejection of a malformed or out-of-range coordinate, or of an inconsistent decoded route.
///
/// Input errors are always raised before any graph access.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("coordinate is not a finite number")]
    NonFinite,

    #[error("latitude {0} is outside of [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside of [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// A coordinate pair at the given position within a polyline
    /// did not have exactly 2 components.
    #[error("coordinate pair #{0} must have exactly 2 components")]
    MalformedPair(usize),

    #[error("route has no points")]
    EmptyRoute,

    /// A decoded route declared a length different from the sum of its segments.
    #[error("route length {declared} m does not match its points ({computed} m)")]
    LengthMismatch { declared: f64, computed: f64 },
}

/// Error conditions which may occur when building a [PathGraph](crate::PathGraph)
/// or answering a [RouteQuery](crate::RouteQuery).
///
/// Absence of a route is not an error; operations report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid coordinate: {0}")]
    Input(#[from] InputError),

    /// The network has no nodes. Not retryable without reloading the dataset.
    #[error("path network is empty")]
    EmptyNetwork,

    /// A polyline with fewer than 2 points was provided when building a graph.
    #[error("polyline #{index} has {len} point(s), at least 2 are required")]
    InvalidPolyline { index: usize, len: usize },

    /// All points of a polyline resolve to the same node.
    #[error("polyline #{index} has no two distinct points")]
    DegeneratePolyline { index: usize },

    #[error(transparent)]
    Search(#[from] SearchError),
}
