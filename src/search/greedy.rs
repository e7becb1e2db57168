// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::{endpoints, SearchError, SearchLimits};
use crate::{earth_distance, GeoPoint, PathGraph};

/// Recommended distance from the destination, in meters, at which
/// [find_route_greedy] considers the destination reached.
pub const DEFAULT_GREEDY_TOLERANCE_M: f64 = 25.0;

/// Best-effort route built by chaining whole polylines, without any search.
///
/// Starting at `start`, repeatedly picks the not-yet-used polyline minimizing
/// the distance from the current position to its entry endpoint plus the distance
/// from its exit endpoint to `end` (polylines may be walked in either direction),
/// and appends all of its points. Stops once the current position is within
/// `tolerance_m` meters of `end`, at which point `end` is appended.
///
/// **This is a fallback, not a router.** The result is not optimal, and may contain
/// straight-line jumps between polylines which do not share a node, as well as
/// detours. Polylines are used at most once, but nodes may repeat. Returns `Ok(None)`
/// if all polylines are used up before reaching the tolerance radius.
/// [find_route](crate::find_route) labels such routes
/// [RouteKind::BestEffort](crate::RouteKind::BestEffort).
pub fn find_route_greedy(
    g: &PathGraph,
    start: GeoPoint,
    end: GeoPoint,
    tolerance_m: f64,
    limits: &SearchLimits,
) -> Result<Option<Vec<GeoPoint>>, SearchError> {
    let (from_idx, to_idx) = endpoints(g, start, end)?;
    let target = g.point(to_idx);
    let stretches = g.stretches();

    let mut used = vec![false; stretches.len()];
    let mut at = from_idx;
    let mut path = vec![g.point(from_idx)];
    let mut steps: usize = 0;

    loop {
        if earth_distance(g.point(at), target) <= tolerance_m {
            if at != to_idx {
                path.push(target);
            }
            log::debug!("greedy chaining: reached destination using {steps} polyline(s)");
            return Ok(Some(path));
        }

        steps += 1;
        limits.check(steps)?;

        let current = g.point(at);
        let mut best: Option<(f64, usize, bool)> = None;
        for (i, s) in stretches.iter().enumerate().filter(|&(i, _)| !used[i]) {
            let (Some(&first), Some(&last)) = (s.nodes.first(), s.nodes.last()) else {
                continue;
            };
            let forward =
                earth_distance(current, g.point(first)) + earth_distance(g.point(last), target);
            let backward =
                earth_distance(current, g.point(last)) + earth_distance(g.point(first), target);

            for (score, reversed) in [(forward, false), (backward, true)] {
                if best.is_none_or(|(best_score, _, _)| score < best_score) {
                    best = Some((score, i, reversed));
                }
            }
        }

        let Some((_, i, reversed)) = best else {
            log::debug!("greedy chaining: ran out of polylines before reaching destination");
            return Ok(None);
        };
        used[i] = true;

        let mut nodes = stretches[i].nodes.clone();
        if reversed {
            nodes.reverse();
        }

        let entry = nodes[0];
        let skip = usize::from(entry == at);
        if entry != at {
            log::warn!(
                "greedy chaining: jumping {:.1} m from {} to {}",
                earth_distance(current, g.point(entry)),
                current,
                g.point(entry),
            );
        }

        for idx in nodes.into_iter().skip(skip) {
            path.push(g.point(idx));
            at = idx;
        }
    }
}
