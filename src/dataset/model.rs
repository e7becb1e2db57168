// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::Deserialize;

/// Coordinate pair exactly as found in the dataset. Kept as a list,
/// so that pairs with a wrong number of components can be reported precisely.
pub(super) type RawPair = Vec<f64>;

/// A single, possibly named, path segment.
///
/// Unknown keys are rejected, so that a saved-path dictionary
/// is never mistaken for a lone segment object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawSegment {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(alias = "points", alias = "path")]
    pub coordinates: Vec<RawPair>,
}

/// Union over all supported dataset layouts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(super) enum RawDataset {
    Segments(Vec<RawSegment>),
    Polylines(Vec<Vec<RawPair>>),
    Polyline(Vec<RawPair>),
    Segment(RawSegment),
    SavedPaths(BTreeMap<String, Vec<RawPair>>),
}

impl RawDataset {
    pub(super) fn into_segments(self) -> Vec<RawSegment> {
        match self {
            Self::Segments(segments) => segments,
            Self::Polylines(polylines) => polylines
                .into_iter()
                .map(|coordinates| RawSegment {
                    name: None,
                    coordinates,
                })
                .collect(),
            Self::Polyline(coordinates) => vec![RawSegment {
                name: None,
                coordinates,
            }],
            Self::Segment(segment) => vec![segment],
            Self::SavedPaths(paths) => paths
                .into_iter()
                .map(|(name, coordinates)| RawSegment {
                    name: Some(name),
                    coordinates,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_layouts() {
        let parse = |s: &str| serde_json::from_str::<RawDataset>(s).unwrap();

        assert!(matches!(
            parse(r#"[{"coordinates": [[0, 0], [1, 1]]}]"#),
            RawDataset::Segments(_)
        ));
        assert!(matches!(
            parse(r#"[{"name": "a", "points": [[0, 0], [1, 1]]}]"#),
            RawDataset::Segments(_)
        ));
        assert!(matches!(
            parse("[[[0, 0], [1, 1]], [[1, 1], [2, 2]]]"),
            RawDataset::Polylines(_)
        ));
        assert!(matches!(parse("[[0, 0], [1, 1]]"), RawDataset::Polyline(_)));
        assert!(matches!(
            parse(r#"{"name": "a", "coordinates": [[0, 0], [1, 1]]}"#),
            RawDataset::Segment(_)
        ));
        assert!(matches!(
            parse(r#"{"a": [[0, 0], [1, 1]]}"#),
            RawDataset::SavedPaths(_)
        ));
    }

    #[test]
    fn saved_paths_become_named_segments() {
        let raw: RawDataset = serde_json::from_str(r#"{"b": [[0, 0]], "a": [[1, 1]]}"#).unwrap();
        let names: Vec<_> = raw.into_segments().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec![Some("a".to_string()), Some("b".to_string())]);
    }

    #[test]
    fn lone_segment_object() {
        let json = r#"{"coordinates": [[0, 0], [1, 1]]}"#;
        let raw: RawDataset = serde_json::from_str(json).unwrap();
        let segments = raw.into_segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].name, None);
        assert_eq!(segments[0].coordinates.len(), 2);
    }

    #[test]
    fn dictionary_with_a_coordinates_key_is_saved_paths() {
        let json = r#"{"coordinates": [[0, 0]], "School Road": [[1, 1]]}"#;
        let raw: RawDataset = serde_json::from_str(json).unwrap();
        assert!(matches!(raw, RawDataset::SavedPaths(_)));
    }
}
