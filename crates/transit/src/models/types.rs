//! Core data types and enums for subway data.

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Criterion used to weight the edges of a [`SubwayMap`](crate::graph::SubwayMap)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EdgeWeightType {
    Distance,
    Duration,
}

impl EdgeWeightType {
    pub const ALL: [EdgeWeightType; 2] = [EdgeWeightType::Distance, EdgeWeightType::Duration];

    /// Pick the metric of a hop that acts as the edge weight
    pub fn weight_of(self, line_station: &LineStation) -> u32 {
        match self {
            Self::Distance => line_station.distance,
            Self::Duration => line_station.duration,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "DISTANCE",
            Self::Duration => "DURATION",
        }
    }
}

impl std::fmt::Display for EdgeWeightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// One hop of a line's chain: `pre_station_id -> station_id`.
///
/// A hop without a predecessor is the origin of its line; its distance and
/// duration carry no meaning and never become graph edges.
/// Distance is in metres, duration in minutes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineStation {
    pub pre_station_id: Option<StationIdentifier>,
    pub station_id: StationIdentifier,
    pub distance: u32,
    pub duration: u32,
}

impl LineStation {
    pub fn new(
        pre_station_id: Option<StationIdentifier>,
        station_id: StationIdentifier,
        distance: u32,
        duration: u32,
    ) -> Self {
        Self {
            pre_station_id,
            station_id,
            distance,
            duration,
        }
    }

    /// Origin hop of a line
    pub fn head(station_id: StationIdentifier) -> Self {
        Self::new(None, station_id, 0, 0)
    }

    pub fn is_head(&self) -> bool {
        self.pre_station_id.is_none()
    }

    pub(crate) fn repoint(&mut self, pre_station_id: Option<StationIdentifier>) {
        self.pre_station_id = pre_station_id;
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("No station named: {0}")]
    UnknownStationName(String),

    #[error("Station not found: {0}")]
    UnknownStation(StationIdentifier),

    #[error("No path from {from} to {to}")]
    NoPathFound {
        from: StationIdentifier,
        to: StationIdentifier,
    },

    #[error("Line not found: {0}")]
    LineNotFound(LineIdentifier),

    #[error("Graph construction failed: {0}")]
    GraphConstruction(String),

    #[error("Invalid line chain: {0}")]
    InvalidChain(String),

    #[error("Shortest path search exceeded its deadline")]
    DeadlineExceeded,

    #[error("Invalid routing config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
