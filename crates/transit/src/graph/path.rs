//! Search results and their distance/duration totals.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::{line::Line, types::*};

/// One traversed hop, copied from the line it belongs to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSegment {
    pub line_id: LineIdentifier,
    pub from: StationIdentifier,
    pub to: StationIdentifier,
    pub distance: u32,
    pub duration: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathTotals {
    pub distance: u64,
    pub duration: u64,
}

/// A route found under one [`EdgeWeightType`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    stations: Vec<StationIdentifier>,
    segments: Vec<PathSegment>,
    weight_type: EdgeWeightType,
    weight: u64,
}

impl Path {
    pub(crate) fn trivial(station: StationIdentifier, weight_type: EdgeWeightType) -> Self {
        Self {
            stations: vec![station],
            segments: Vec::new(),
            weight_type,
            weight: 0,
        }
    }

    pub(crate) fn from_segments(
        source: StationIdentifier,
        segments: Vec<PathSegment>,
        weight_type: EdgeWeightType,
        weight: u64,
    ) -> Self {
        let mut stations = Vec::with_capacity(segments.len() + 1);
        stations.push(source);
        stations.extend(segments.iter().map(|segment| segment.to.clone()));

        Self {
            stations,
            segments,
            weight_type,
            weight,
        }
    }

    /// Stations from departure to arrival, both included
    pub fn stations(&self) -> &[StationIdentifier] {
        &self.stations
    }

    /// `segments()[i]` joins `stations()[i]` and `stations()[i + 1]`
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn weight_type(&self) -> EdgeWeightType {
        self.weight_type
    }

    /// Total under [`Path::weight_type`]
    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn total_distance(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.distance)).sum()
    }

    pub fn total_duration(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.duration)).sum()
    }

    pub fn totals(&self) -> PathTotals {
        PathTotals {
            distance: self.total_distance(),
            duration: self.total_duration(),
        }
    }
}

/// Sum both metrics of `path` against a line snapshot.
///
/// Each consecutive station pair is matched to the hop of the line the search
/// actually rode, never to a cheaper parallel hop of another line. Returns
/// `Err(GraphConstruction)` if the snapshot no longer holds that hop.
pub fn aggregate(path: &Path, lines: &[Arc<Line>]) -> Result<PathTotals> {
    let by_id: HashMap<&LineIdentifier, &Line> =
        lines.iter().map(|line| (&line.id, &**line)).collect();

    let mut totals = PathTotals::default();
    for (pair, segment) in path.stations.windows(2).zip(&path.segments) {
        let (from, to) = (&pair[0], &pair[1]);

        let hop = by_id
            .get(&segment.line_id)
            .and_then(|line| line.hop_to(to))
            .filter(|hop| hop.pre_station_id.as_ref() == Some(from))
            .ok_or_else(|| {
                TransitError::GraphConstruction(format!(
                    "line {} has no hop {} -> {}",
                    segment.line_id, from, to
                ))
            })?;

        totals.distance += u64::from(hop.distance);
        totals.duration += u64::from(hop.duration);
    }

    Ok(totals)
}
