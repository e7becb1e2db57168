// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

macro_rules! assert_almost_eq {
    ($a:expr, $b:expr) => {
        assert_almost_eq!($a, $b, 1e-6)
    };
    ($a:expr, $b:expr, $eps:expr) => {
        assert!(
            (($a - $b) as f64).abs() < $eps,
            "assertion failed: {} ≈ {}",
            $a,
            $b
        )
    };
}

use crate::GeoPoint;

pub(crate) fn pt(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint {
        latitude,
        longitude,
    }
}
