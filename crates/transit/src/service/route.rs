//! Route queries over the whole subway.
//!
//! Every query reads one line snapshot from the provider and builds a fresh
//! [`SubwayMap`] per criterion; nothing is cached between queries.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::graph::{aggregate, shortest_path, shortest_path_until, Path, PathTotals, SubwayMap};
use crate::identifiers::*;
use crate::models::{line::Line, traits::*, types::*};
use crate::service::config::RoutingConfig;

/// Departure and arrival, by station name
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathInfo {
    pub departure_station_name: String,
    pub arrival_station_name: String,
}

impl PathInfo {
    pub fn new(departure: impl Into<String>, arrival: impl Into<String>) -> Self {
        Self {
            departure_station_name: departure.into(),
            arrival_station_name: arrival.into(),
        }
    }
}

/// The best route under one criterion, with both of its totals
#[derive(Clone)]
pub struct PathResult {
    pub stations: Vec<Arc<dyn TransitStation>>,
    pub total_distance: u64,
    pub total_duration: u64,
}

impl PathResult {
    pub fn station_names(&self) -> Vec<&str> {
        self.stations.iter().map(|station| station.name()).collect()
    }
}

/// One [`PathResult`] per configured criterion
#[derive(Clone, Default)]
pub struct PathResults {
    by_criterion: BTreeMap<EdgeWeightType, PathResult>,
}

impl PathResults {
    pub fn get(&self, criterion: EdgeWeightType) -> Option<&PathResult> {
        self.by_criterion.get(&criterion)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeWeightType, &PathResult)> {
        self.by_criterion.iter().map(|(&criterion, result)| (criterion, result))
    }

    pub fn len(&self) -> usize {
        self.by_criterion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_criterion.is_empty()
    }
}

/// A line with its stations resolved, origin first
#[derive(Clone)]
pub struct LineDetail {
    pub line: Arc<Line>,
    pub stations: Vec<Arc<dyn TransitStation>>,
}

pub struct RouteService {
    provider: Arc<dyn TransitProvider>,
    config: RoutingConfig,
}

impl RouteService {
    /// Returns `Err(Config)` if the config does not validate
    pub fn new(provider: Arc<dyn TransitProvider>, config: RoutingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Station id for a display name
    pub fn find_id_by_name(&self, name: &str) -> Result<StationIdentifier> {
        self.provider
            .find_station_by_name(name)
            .map(|station| station.id().clone())
            .ok_or_else(|| TransitError::UnknownStationName(name.to_string()))
    }

    /// Best route between two named stations under every configured criterion
    pub fn find_paths(&self, info: &PathInfo) -> Result<PathResults> {
        let departure = self.find_id_by_name(&info.departure_station_name)?;
        let arrival = self.find_id_by_name(&info.arrival_station_name)?;

        info!(
            departure = %info.departure_station_name,
            arrival = %info.arrival_station_name,
            "finding paths"
        );

        let lines = self.provider.all_lines();
        let mut by_criterion = BTreeMap::new();

        for &criterion in &self.config.criteria {
            let path = self.search(&lines, &departure, &arrival, criterion)?;
            let totals = aggregate(&path, &lines)?;
            by_criterion.insert(criterion, self.to_path_result(&path, totals)?);
        }

        Ok(PathResults { by_criterion })
    }

    /// Best route between two station ids under a single criterion
    pub fn find_path_by_ids(
        &self,
        departure: &StationIdentifier,
        arrival: &StationIdentifier,
        criterion: EdgeWeightType,
    ) -> Result<Path> {
        let lines = self.provider.all_lines();
        self.search(&lines, departure, arrival, criterion)
    }

    fn search(
        &self,
        lines: &[Arc<Line>],
        departure: &StationIdentifier,
        arrival: &StationIdentifier,
        criterion: EdgeWeightType,
    ) -> Result<Path> {
        let map = SubwayMap::build(lines, criterion)?;

        let found = match self.config.search_timeout() {
            Some(timeout) => {
                shortest_path_until(&map, departure, arrival, Instant::now() + timeout)
            }
            None => shortest_path(&map, departure, arrival),
        };

        if let Err(e @ (TransitError::NoPathFound { .. } | TransitError::DeadlineExceeded)) = &found {
            warn!(%criterion, %departure, %arrival, "{e}");
        }
        found
    }

    fn to_path_result(&self, path: &Path, totals: PathTotals) -> Result<PathResult> {
        Ok(PathResult {
            stations: self.resolve_stations(path.stations())?,
            total_distance: totals.distance,
            total_duration: totals.duration,
        })
    }

    fn resolve_stations(&self, ids: &[StationIdentifier]) -> Result<Vec<Arc<dyn TransitStation>>> {
        ids.iter()
            .map(|id| {
                self.provider
                    .get_station(id)
                    .ok_or_else(|| TransitError::UnknownStation(id.clone()))
            })
            .collect()
    }

    /// A line's stations, origin first
    pub fn line_with_stations(&self, line_id: &LineIdentifier) -> Result<LineDetail> {
        let line = self
            .provider
            .get_line(line_id)
            .ok_or_else(|| TransitError::LineNotFound(line_id.clone()))?;
        self.line_detail(line)
    }

    /// Every line with its stations, origin first
    ///
    /// The registry is read once and shared across lines.
    pub fn whole_subway(&self) -> Result<Vec<LineDetail>> {
        let registry: HashMap<StationIdentifier, Arc<dyn TransitStation>> = self
            .provider
            .all_stations()
            .into_iter()
            .map(|station| (station.id().clone(), station))
            .collect();

        self.provider
            .all_lines()
            .into_iter()
            .map(|line| -> Result<LineDetail> {
                let stations: Vec<Arc<dyn TransitStation>> = line
                    .station_ids()
                    .into_iter()
                    .map(|id| {
                        registry
                            .get(&id)
                            .cloned()
                            .ok_or(TransitError::UnknownStation(id))
                    })
                    .collect::<Result<_>>()?;
                Ok(LineDetail { line, stations })
            })
            .collect()
    }

    fn line_detail(&self, line: Arc<Line>) -> Result<LineDetail> {
        let stations = self.resolve_stations(&line.station_ids())?;
        Ok(LineDetail { line, stations })
    }
}
