// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::GeoPoint;

/// Error conditions which may occur during a route search.
///
/// A search which completes without connecting the two nodes is not an error,
/// and is reported as `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The start or end point is not a node of the graph.
    #[error("not a node of the graph: {0}")]
    InvalidReference(GeoPoint),

    /// Route search has exceeded its limit of steps.
    /// Either the nodes are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole component,
    /// which can result in a denial-of-service. The step limit protects
    /// against resource exhaustion.
    #[error("step limit exceeded")]
    StepLimitExceeded,

    /// The search was aborted by its deadline or [CancelToken](crate::CancelToken).
    #[error("search cancelled")]
    Cancelled,
}
