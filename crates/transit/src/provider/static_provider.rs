//! In-memory subway provider.
//!
//! Holds the station registry and every line's chain. Lines are shared as
//! `Arc<Line>` and mutated copy-on-write, so a snapshot taken by a running
//! query is never affected by later edits.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::identifiers::*;
use crate::models::{line::Line, traits::*, types::*};

// ============================================================================
// Concrete Implementations of Traits
// ============================================================================

#[derive(Clone, Debug)]
pub struct StationImpl {
    pub id: StationIdentifier,
    pub name: Arc<str>,
}

impl StationImpl {
    pub fn new(id: impl Into<StationIdentifier>, name: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl TransitStation for StationImpl {
    fn id(&self) -> &StationIdentifier {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Static Provider
// ============================================================================

/// In-memory station registry and line store
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone, Default)]
pub struct StaticTransitProvider {
    // Core data
    stations: Vec<Arc<StationImpl>>,
    lines: Vec<Arc<Line>>,

    // Lookup maps
    station_map: HashMap<StationIdentifier, Arc<StationImpl>>,
    name_map: HashMap<Arc<str>, StationIdentifier>,
    line_map: HashMap<LineIdentifier, usize>,
}

impl StaticTransitProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Build provider from raw data
    ///
    /// When two stations share a name, the first one wins name lookups.
    /// A later line with an already used id replaces the earlier one.
    pub fn from_data(stations: Vec<StationImpl>, lines: Vec<Line>) -> Self {
        let mut provider = Self::new();
        for station in stations {
            provider.insert_station(station);
        }
        for line in lines {
            provider.insert_line(line);
        }
        provider
    }

    pub fn insert_station(&mut self, station: StationImpl) {
        let station = Arc::new(station);
        if self
            .station_map
            .insert(station.id.clone(), station.clone())
            .is_some()
        {
            self.stations.retain(|s| s.id != station.id);
            self.name_map.retain(|_, id| *id != station.id);
            // Names the replaced station held fall back to the earliest holder
            for s in &self.stations {
                self.name_map
                    .entry(s.name.clone())
                    .or_insert_with(|| s.id.clone());
            }
        }
        self.name_map
            .entry(station.name.clone())
            .or_insert_with(|| station.id.clone());
        self.stations.push(station);
    }

    pub fn insert_line(&mut self, line: Line) {
        match self.line_map.get(&line.id) {
            Some(&slot) => self.lines[slot] = Arc::new(line),
            None => {
                self.line_map.insert(line.id.clone(), self.lines.len());
                self.lines.push(Arc::new(line));
            }
        }
    }

    /// Splice a hop into a stored line
    pub fn add_line_station(&mut self, line_id: &LineIdentifier, line_station: LineStation) -> Result<()> {
        let line = self.line_mut(line_id)?;
        debug!(line = %line_id, station = %line_station.station_id, "adding line station");
        line.add_line_station(line_station)
    }

    /// Remove a station from a stored line
    pub fn remove_line_station(
        &mut self,
        line_id: &LineIdentifier,
        station_id: &StationIdentifier,
    ) -> Result<LineStation> {
        let line = self.line_mut(line_id)?;
        debug!(line = %line_id, station = %station_id, "removing line station");
        line.remove_line_station(station_id)
    }

    fn line_mut(&mut self, line_id: &LineIdentifier) -> Result<&mut Line> {
        let slot = *self
            .line_map
            .get(line_id)
            .ok_or_else(|| TransitError::LineNotFound(line_id.clone()))?;
        Ok(Arc::make_mut(&mut self.lines[slot]))
    }
}

impl TransitProvider for StaticTransitProvider {
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<dyn TransitStation>> {
        self.station_map.get(id).map(|s| s.clone() as Arc<dyn TransitStation>)
    }

    fn find_station_by_name(&self, name: &str) -> Option<Arc<dyn TransitStation>> {
        self.name_map
            .get(name)
            .and_then(|id| self.get_station(id))
    }

    fn all_stations(&self) -> Vec<Arc<dyn TransitStation>> {
        self.stations
            .iter()
            .map(|s| s.clone() as Arc<dyn TransitStation>)
            .collect()
    }

    fn get_line(&self, id: &LineIdentifier) -> Option<Arc<Line>> {
        self.line_map.get(id).map(|&slot| self.lines[slot].clone())
    }

    fn all_lines(&self) -> Vec<Arc<Line>> {
        self.lines.clone()
    }
}
