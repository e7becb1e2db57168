// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Deterministic display colors for polylines and routes.

/// Colors handed out in order, then repeated.
/// Source: https://www.tableau.com/blog/colors-upgrade-tableau-10-56782
pub const PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

/// Color used for routes drawn on top of the network.
pub const ROUTE_COLOR: &str = "#1f1f9e";

/// Returns the display color of the polyline at the given index.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
