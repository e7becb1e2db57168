// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::hash_map::{Entry, HashMap};

use crate::{earth_distance, palette, Edge, Error, GeoPoint, Polyline};

/// Number of decimal digits of a degree preserved by a [NodeKey].
/// 7 digits amount to roughly 1 cm at the equator.
pub const QUANTIZATION_DIGITS: i32 = 7;

/// Identity of a [PathGraph] node: a coordinate rounded to
/// [QUANTIZATION_DIGITS] decimal digits.
///
/// Two dataset points with the same key are treated as the same junction,
/// even when their raw coordinates differ slightly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    lat: i64,
    lon: i64,
}

impl NodeKey {
    pub fn of(p: GeoPoint) -> Self {
        let scale = 10f64.powi(QUANTIZATION_DIGITS);
        Self {
            lat: (p.latitude * scale).round() as i64,
            lon: (p.longitude * scale).round() as i64,
        }
    }
}

/// Outgoing connection from a node, referring to other nodes by their index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Link {
    pub(crate) to: usize,
    pub(crate) cost: f64,
}

/// A polyline as stored in the graph, with points replaced by node indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Stretch {
    pub(crate) name: Option<String>,
    pub(crate) nodes: Vec<usize>,
}

/// An undirected, weighted graph of path segments.
///
/// Nodes are kept in insertion order (the order in which they first appear in the
/// source polylines), and all iteration over the graph follows that order.
/// Every edge is stored in both directions with the same cost, which always equals
/// the [earth_distance] between its endpoints.
///
/// A graph is immutable once built. To change the network, build a new graph
/// and swap it in via a [Network](crate::Network).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PathGraph {
    nodes: Vec<GeoPoint>,
    index: HashMap<NodeKey, usize>,
    adjacency: Vec<Vec<Link>>,
    stretches: Vec<Stretch>,
    edge_count: usize,
}

impl PathGraph {
    /// Builds a graph from an ordered collection of polylines.
    ///
    /// Fails if any polyline has fewer than 2 distinct points or contains an invalid coordinate.
    pub fn build<I: IntoIterator<Item = Polyline>>(polylines: I) -> Result<Self, Error> {
        let mut b = GraphBuilder::new();
        for p in polylines {
            b.add(p)?;
        }
        Ok(b.finish())
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of undirected edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns an iterator over all nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.nodes.iter().copied()
    }

    /// Returns an iterator over all undirected edges. Each edge is yielded once,
    /// with `a` being the node inserted earlier.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(move |(from, links)| {
                links
                    .iter()
                    .filter(move |link| link.to > from)
                    .map(move |link| Edge {
                        a: self.nodes[from],
                        b: self.nodes[link.to],
                        length_m: link.cost,
                    })
            })
    }

    /// Returns an iterator over the polylines the graph was built from.
    pub fn polylines(&self) -> impl Iterator<Item = PolylineView<'_>> {
        self.stretches.iter().map(move |s| PolylineView {
            graph: self,
            stretch: s,
        })
    }

    /// Checks whether a node with the same [NodeKey] as `p` exists.
    pub fn contains(&self, p: GeoPoint) -> bool {
        self.index.contains_key(&NodeKey::of(p))
    }

    /// Returns the stored coordinates of the node sharing a [NodeKey] with `p`.
    pub fn resolve(&self, p: GeoPoint) -> Option<GeoPoint> {
        self.node_index(p).map(|idx| self.nodes[idx])
    }

    /// Returns an iterator over `(neighbor, length_m)` pairs of a node.
    /// Yields nothing if `p` is not a node of the graph.
    pub fn neighbors(&self, p: GeoPoint) -> impl Iterator<Item = (GeoPoint, f64)> + '_ {
        self.node_index(p)
            .map(|idx| self.adjacency[idx].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |link| (self.nodes[link.to], link.cost))
    }

    /// Gets the length of the edge between two nodes, if such an edge exists.
    pub fn edge_length(&self, a: GeoPoint, b: GeoPoint) -> Option<f64> {
        let from = self.node_index(a)?;
        let to = self.node_index(b)?;
        self.adjacency[from]
            .iter()
            .find(|link| link.to == to)
            .map(|link| link.cost)
    }

    /// Serializes the network as a GeoJSON FeatureCollection with one
    /// LineString per polyline, colored with the [palette].
    pub fn to_geojson(&self) -> serde_json::Value {
        let features: Vec<_> = self
            .polylines()
            .enumerate()
            .map(|(i, p)| {
                let coordinates: Vec<_> =
                    p.points().map(|pt| [pt.longitude, pt.latitude]).collect();
                serde_json::json!({
                    "type": "Feature",
                    "properties": {
                        "name": p.name(),
                        "stroke": palette::color_for(i),
                    },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": coordinates,
                    },
                })
            })
            .collect();

        serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    pub(crate) fn node_index(&self, p: GeoPoint) -> Option<usize> {
        self.index.get(&NodeKey::of(p)).copied()
    }

    pub(crate) fn point(&self, idx: usize) -> GeoPoint {
        self.nodes[idx]
    }

    pub(crate) fn links(&self, idx: usize) -> &[Link] {
        &self.adjacency[idx]
    }

    pub(crate) fn stretches(&self) -> &[Stretch] {
        &self.stretches
    }
}

/// Read-only view over a polyline stored in a [PathGraph].
#[derive(Debug, Clone, Copy)]
pub struct PolylineView<'a> {
    graph: &'a PathGraph,
    stretch: &'a Stretch,
}

impl<'a> PolylineView<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.stretch.name.as_deref()
    }

    /// Returns the points of the polyline, as resolved to graph nodes.
    /// Consecutive points sharing a [NodeKey] are collapsed.
    pub fn points(&self) -> impl Iterator<Item = GeoPoint> + 'a {
        let graph = self.graph;
        let stretch = self.stretch;
        stretch.nodes.iter().map(move |&idx| graph.nodes[idx])
    }
}

/// Incrementally builds a [PathGraph] from polylines.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    g: PathGraph,
    skipped_segments: usize,
}

impl GraphBuilder {
    /// Creates a new, empty graph builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a polyline to the graph, connecting every pair of its consecutive points.
    ///
    /// The polyline is validated in full before the graph is touched,
    /// so a failed call leaves the builder unchanged.
    pub fn add(&mut self, polyline: Polyline) -> Result<(), Error> {
        let index = self.g.stretches.len();
        if polyline.points.len() < 2 {
            return Err(Error::InvalidPolyline {
                index,
                len: polyline.points.len(),
            });
        }
        for p in &polyline.points {
            p.validate()?;
        }
        let first_key = NodeKey::of(polyline.points[0]);
        if polyline.points.iter().all(|&p| NodeKey::of(p) == first_key) {
            return Err(Error::DegeneratePolyline { index });
        }

        let mut nodes: Vec<usize> = Vec::with_capacity(polyline.points.len());
        for &p in &polyline.points {
            let idx = self.add_node(p);
            match nodes.last().copied() {
                Some(prev) if prev == idx => {
                    log::warn!("polyline #{index}: skipping zero-length segment at {p}");
                    self.skipped_segments += 1;
                }
                Some(prev) => {
                    self.add_edge(prev, idx);
                    nodes.push(idx);
                }
                None => nodes.push(idx),
            }
        }

        self.g.stretches.push(Stretch {
            name: polyline.name,
            nodes,
        });
        Ok(())
    }

    /// Finishes building, returning the immutable graph.
    pub fn finish(self) -> PathGraph {
        log::debug!(
            "built path graph: {} polylines, {} nodes, {} edges ({} zero-length segments skipped)",
            self.g.stretches.len(),
            self.g.len(),
            self.g.edge_count,
            self.skipped_segments,
        );
        self.g
    }

    fn add_node(&mut self, p: GeoPoint) -> usize {
        match self.g.index.entry(NodeKey::of(p)) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let idx = self.g.nodes.len();
                e.insert(idx);
                self.g.nodes.push(p);
                self.g.adjacency.push(Vec::default());
                idx
            }
        }
    }

    /// Creates or updates the edge between two nodes, in both directions.
    fn add_edge(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b);
        let cost = earth_distance(self.g.nodes[a], self.g.nodes[b]);
        let created = Self::set_link(&mut self.g.adjacency[a], Link { to: b, cost });
        Self::set_link(&mut self.g.adjacency[b], Link { to: a, cost });
        if created {
            self.g.edge_count += 1;
        }
    }

    fn set_link(links: &mut Vec<Link>, link: Link) -> bool {
        if let Some(candidate) = links.iter_mut().find(|l| l.to == link.to) {
            *candidate = link;
            false
        } else {
            links.push(link);
            true
        }
    }
}
