// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading [PathGraphs](PathGraph) from JSON datasets of path segments.
//!
//! The following layouts are recognized:
//!
//! - a list of segments: `[{"name": "Main St", "coordinates": [[a, b], ...]}, ...]`
//!   (`name` may be omitted, `points` and `path` are accepted instead of `coordinates`),
//! - a list of bare polylines: `[[[a, b], ...], ...]`,
//! - a single bare polyline: `[[a, b], ...]`,
//! - a single segment object: `{"name": "Main St", "coordinates": [[a, b], ...]}`,
//! - a dictionary of saved paths: `{"Main St": [[a, b], ...], ...}`, loaded in name order.
//!
//! The meaning of `[a, b]` pairs is given by [Options::axis_order].

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use model::RawDataset;

use crate::{GeoPoint, GraphBuilder, InputError, PathGraph, Polyline};

mod model;

/// Order of the two components in dataset coordinate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisOrder {
    /// `[latitude, longitude]`
    #[default]
    LatLon,

    /// `[longitude, latitude]`, as in GeoJSON
    LonLat,
}

impl AxisOrder {
    /// Converts a coordinate pair into a validated [GeoPoint].
    /// `position` is the index of the pair within its polyline, used for error reporting.
    pub fn point(self, pair: &[f64], position: usize) -> Result<GeoPoint, InputError> {
        let &[first, second] = pair else {
            return Err(InputError::MalformedPair(position));
        };
        match self {
            Self::LatLon => GeoPoint::new(first, second),
            Self::LonLat => GeoPoint::new(second, first),
        }
    }
}

/// Compression of the input dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    /// Unknown format - guess the compression based on the content
    #[default]
    Unknown,

    /// Force uncompressed JSON
    Json,

    /// Force JSON with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    JsonGz,

    /// Force JSON with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    JsonBz2,
}

impl FileFormat {
    /// Guesses the format based on the leading bytes of the data.
    fn sniff(head: &[u8]) -> Self {
        if head.starts_with(&[0x1f, 0x8b]) {
            Self::JsonGz
        } else if head.starts_with(b"BZh") {
            Self::JsonBz2
        } else {
            Self::Json
        }
    }
}

/// Additional controls for interpreting a dataset as a [PathGraph].
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Order of components in every coordinate pair of the dataset.
    pub axis_order: AxisOrder,

    /// Compression of the input data.
    pub file_format: FileFormat,
}

/// Error conditions which may occur when loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// A segment was structurally invalid; no graph is produced.
    #[error("segment {segment}: {source}")]
    Segment {
        segment: String,
        #[source]
        source: crate::Error,
    },
}

/// Parse a dataset from a reader into a [PathGraph] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn load_from_io<R: io::Read>(options: &Options, reader: R) -> Result<PathGraph, Error> {
    let mut reader = io::BufReader::new(reader);
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::sniff(reader.fill_buf()?),
        format => format,
    };

    let raw: RawDataset = match format {
        FileFormat::Unknown | FileFormat::Json => serde_json::from_reader(reader)?,

        FileFormat::JsonGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            serde_json::from_reader(io::BufReader::new(d))?
        }

        FileFormat::JsonBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            serde_json::from_reader(io::BufReader::new(d))?
        }
    };

    build_graph(options, raw)
}

/// Parse a dataset from a file at the provided path into a [PathGraph]
/// as per the provided [Options].
pub fn load_from_file<P: AsRef<Path>>(options: &Options, path: P) -> Result<PathGraph, Error> {
    let f = File::open(path)?;
    load_from_io(options, f)
}

/// Parse a dataset from an in-memory buffer into a [PathGraph] as per the provided [Options].
pub fn load_from_buffer(options: &Options, data: &[u8]) -> Result<PathGraph, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::sniff(data),
        format => format,
    };

    if format == FileFormat::Json {
        // Fast path is available for in-memory JSON data
        build_graph(options, serde_json::from_slice(data)?)
    } else {
        let options = Options {
            file_format: format,
            ..options.clone()
        };
        load_from_io(&options, data)
    }
}

fn build_graph(options: &Options, raw: RawDataset) -> Result<PathGraph, Error> {
    let mut b = GraphBuilder::new();
    for (idx, segment) in raw.into_segments().into_iter().enumerate() {
        let label = match segment.name {
            Some(ref name) => format!("{name:?}"),
            None => format!("#{idx}"),
        };
        let on_error = |source: crate::Error| Error::Segment {
            segment: label.clone(),
            source,
        };

        let points = segment
            .coordinates
            .iter()
            .enumerate()
            .map(|(position, pair)| options.axis_order.point(pair, position))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| on_error(e.into()))?;

        b.add(Polyline {
            name: segment.name,
            points,
        })
        .map_err(on_error)?;
    }
    Ok(b.finish())
}
