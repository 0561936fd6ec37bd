//! A subway line and its chain of stations.
//!
//! Hops are kept in an arena and linked by station id rather than by
//! position, so splicing a station into the middle of a line only touches
//! the hop that used to follow the splice point.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::types::*;

/// Id-based links over a hop arena.
///
/// Only ever constructed through [`ChainIndex::build`], so holding one means
/// the chain has a single head, no cycles and no duplicate stations.
#[derive(Clone, Debug, Default)]
struct ChainIndex {
    head: Option<usize>,
    /// predecessor station -> slot of the hop that follows it
    successors: HashMap<StationIdentifier, usize>,
    /// station -> slot of the hop that reaches it
    positions: HashMap<StationIdentifier, usize>,
}

impl ChainIndex {
    fn build(hops: &[LineStation]) -> std::result::Result<Self, String> {
        let mut index = ChainIndex::default();

        for (slot, hop) in hops.iter().enumerate() {
            if index.positions.insert(hop.station_id.clone(), slot).is_some() {
                return Err(format!("station {} appears twice", hop.station_id));
            }

            match &hop.pre_station_id {
                None => {
                    if let Some(existing) = index.head {
                        return Err(format!(
                            "both {} and {} have no predecessor",
                            hops[existing].station_id, hop.station_id
                        ));
                    }
                    index.head = Some(slot);
                }
                Some(pre) => {
                    if let Some(other) = index.successors.insert(pre.clone(), slot) {
                        return Err(format!(
                            "{} and {} both follow {}",
                            hops[other].station_id, hop.station_id, pre
                        ));
                    }
                }
            }
        }

        if let Some(hop) = hops.iter().find(|hop| {
            hop.pre_station_id
                .as_ref()
                .is_some_and(|pre| !index.positions.contains_key(pre))
        }) {
            return Err(format!(
                "{} follows {} which is not on the line",
                hop.station_id,
                hop.pre_station_id.as_ref().map_or("", |pre| pre.as_str())
            ));
        }

        if !hops.is_empty() && index.head.is_none() {
            return Err("no origin station, the chain is cyclic".to_string());
        }

        // Every station reachable from the head, each visited once.
        let mut visited = 0;
        let mut cursor = index.head;
        while let Some(slot) = cursor {
            visited += 1;
            if visited > hops.len() {
                break;
            }
            cursor = index.successors.get(&hops[slot].station_id).copied();
        }
        if visited != hops.len() {
            return Err("chain contains a cycle detached from its origin".to_string());
        }

        Ok(index)
    }
}

/// A named subway line owning its station chain
#[derive(Clone, Debug)]
pub struct Line {
    pub id: LineIdentifier,
    pub name: Arc<str>,
    hops: Vec<LineStation>,
    index: ChainIndex,
}

impl Line {
    /// Create a line with no stations
    pub fn new(id: LineIdentifier, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
            hops: Vec::new(),
            index: ChainIndex::default(),
        }
    }

    /// Assemble a line from a persisted, unordered set of hops
    ///
    /// Returns `Err(GraphConstruction)` if the hops do not form a single chain.
    pub fn from_line_stations(
        id: LineIdentifier,
        name: impl Into<Arc<str>>,
        hops: Vec<LineStation>,
    ) -> Result<Self> {
        let index = ChainIndex::build(&hops)
            .map_err(|reason| TransitError::GraphConstruction(format!("line {id}: {reason}")))?;

        Ok(Self {
            id,
            name: name.into(),
            hops,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn contains(&self, station_id: &StationIdentifier) -> bool {
        self.index.positions.contains_key(station_id)
    }

    /// Hops in arena order (unordered with respect to the chain)
    pub fn hops(&self) -> &[LineStation] {
        &self.hops
    }

    /// Hop reaching `station_id` on this line
    pub fn hop_to(&self, station_id: &StationIdentifier) -> Option<&LineStation> {
        self.index.positions.get(station_id).map(|&slot| &self.hops[slot])
    }

    /// Hops from the origin to the terminus
    pub fn line_stations(&self) -> Vec<&LineStation> {
        let mut ordered = Vec::with_capacity(self.hops.len());
        let mut cursor = self.index.head;
        while let Some(slot) = cursor {
            let hop = &self.hops[slot];
            ordered.push(hop);
            cursor = self.index.successors.get(&hop.station_id).copied();
        }
        ordered
    }

    /// Station ids from the origin to the terminus
    pub fn station_ids(&self) -> Vec<StationIdentifier> {
        self.line_stations()
            .into_iter()
            .map(|hop| hop.station_id.clone())
            .collect()
    }

    /// Insert a hop into the chain.
    ///
    /// The hop currently following `pre_station_id` (or the current origin,
    /// when the new hop has no predecessor) is re-pointed to follow the new
    /// station. Every hop that ends up with a predecessor must carry a
    /// non-zero distance and duration, including an origin displaced by a
    /// new one. The line is unchanged if the insertion fails.
    pub fn add_line_station(&mut self, line_station: LineStation) -> Result<()> {
        if self.contains(&line_station.station_id) {
            return Err(TransitError::InvalidChain(format!(
                "station {} is already on line {}",
                line_station.station_id, self.id
            )));
        }

        let displaced = match &line_station.pre_station_id {
            None => self.index.head,
            Some(pre) => {
                if !self.contains(pre) {
                    return Err(TransitError::InvalidChain(format!(
                        "predecessor {} is not on line {}",
                        pre, self.id
                    )));
                }
                self.check_metrics(&line_station)?;
                self.index.successors.get(pre).copied()
            }
        };

        if let (None, Some(slot)) = (&line_station.pre_station_id, displaced) {
            self.check_metrics(&self.hops[slot])?;
        }

        let mut hops = self.hops.clone();
        if let Some(slot) = displaced {
            hops[slot].repoint(Some(line_station.station_id.clone()));
        }
        hops.push(line_station);

        self.commit(hops)
    }

    /// Remove the hop reaching `station_id`, joining its neighbours.
    pub fn remove_line_station(&mut self, station_id: &StationIdentifier) -> Result<LineStation> {
        let Some(&slot) = self.index.positions.get(station_id) else {
            return Err(TransitError::InvalidChain(format!(
                "station {} is not on line {}",
                station_id, self.id
            )));
        };

        let mut hops = self.hops.clone();
        if let Some(&next) = self.index.successors.get(station_id) {
            hops[next].repoint(self.hops[slot].pre_station_id.clone());
        }
        let removed = hops.remove(slot);

        self.commit(hops)?;
        Ok(removed)
    }

    fn check_metrics(&self, hop: &LineStation) -> Result<()> {
        if hop.distance == 0 || hop.duration == 0 {
            return Err(TransitError::InvalidChain(format!(
                "hop to {} on line {} needs a non-zero distance ({}) and duration ({})",
                hop.station_id, self.id, hop.distance, hop.duration
            )));
        }
        Ok(())
    }

    fn commit(&mut self, hops: Vec<LineStation>) -> Result<()> {
        let index = ChainIndex::build(&hops).map_err(TransitError::InvalidChain)?;
        self.hops = hops;
        self.index = index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hop(pre: Option<&str>, station: &str, distance: u32, duration: u32) -> LineStation {
        LineStation::new(pre.map(StationIdentifier::new), station.into(), distance, duration)
    }

    fn ids(line: &Line) -> Vec<String> {
        line.station_ids().iter().map(|id| id.to_string()).collect()
    }

    fn line_abc() -> Line {
        let mut line = Line::new("line_1".into(), "Line 1");
        line.add_line_station(LineStation::head("a".into())).unwrap();
        line.add_line_station(hop(Some("a"), "b", 10, 2)).unwrap();
        line.add_line_station(hop(Some("b"), "c", 10, 2)).unwrap();
        line
    }

    #[test]
    fn test_append_stations() {
        let line = line_abc();
        assert_eq!(ids(&line), vec!["a", "b", "c"]);
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_insert_mid_line() {
        let mut line = line_abc();
        line.add_line_station(hop(Some("a"), "x", 4, 1)).unwrap();

        assert_eq!(ids(&line), vec!["a", "x", "b", "c"]);
        assert_eq!(
            line.hop_to(&"b".into()).unwrap().pre_station_id,
            Some(StationIdentifier::new("x"))
        );
    }

    #[test]
    fn test_insert_new_origin() {
        let mut line = Line::new("line_1".into(), "Line 1");
        line.add_line_station(hop(None, "a", 6, 2)).unwrap();
        line.add_line_station(hop(Some("a"), "b", 10, 2)).unwrap();
        line.add_line_station(LineStation::head("z".into())).unwrap();

        assert_eq!(ids(&line), vec!["z", "a", "b"]);
        assert!(line.hop_to(&"z".into()).unwrap().is_head());
        assert_eq!(
            line.hop_to(&"a".into()).unwrap().pre_station_id,
            Some(StationIdentifier::new("z"))
        );
    }

    #[test]
    fn test_insert_rejects_zero_metrics() {
        let mut line = line_abc();

        // "a" was added as a bare origin, so it cannot become a hop
        assert!(matches!(
            line.add_line_station(LineStation::head("z".into())),
            Err(TransitError::InvalidChain(_))
        ));
        assert!(matches!(
            line.add_line_station(hop(Some("c"), "d", 0, 0)),
            Err(TransitError::InvalidChain(_))
        ));
        assert!(matches!(
            line.add_line_station(hop(Some("a"), "x", 3, 0)),
            Err(TransitError::InvalidChain(_))
        ));
        assert_eq!(ids(&line), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_strangers() {
        let mut line = line_abc();

        assert!(matches!(
            line.add_line_station(hop(Some("c"), "a", 1, 1)),
            Err(TransitError::InvalidChain(_))
        ));
        assert!(matches!(
            line.add_line_station(hop(Some("nowhere"), "d", 1, 1)),
            Err(TransitError::InvalidChain(_))
        ));
        assert_eq!(ids(&line), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_first_station_needs_no_predecessor() {
        let mut line = Line::new("line_1".into(), "Line 1");
        assert!(line.add_line_station(hop(Some("a"), "b", 1, 1)).is_err());
        assert!(line.is_empty());
    }

    #[test]
    fn test_remove_middle_station() {
        let mut line = line_abc();
        let removed = line.remove_line_station(&"b".into()).unwrap();

        assert_eq!(removed.station_id, StationIdentifier::new("b"));
        assert_eq!(ids(&line), vec!["a", "c"]);
        assert_eq!(
            line.hop_to(&"c".into()).unwrap().pre_station_id,
            Some(StationIdentifier::new("a"))
        );
    }

    #[test]
    fn test_remove_origin_promotes_successor() {
        let mut line = line_abc();
        line.remove_line_station(&"a".into()).unwrap();

        assert_eq!(ids(&line), vec!["b", "c"]);
        assert!(line.hop_to(&"b".into()).unwrap().is_head());
    }

    #[test]
    fn test_remove_unknown_station() {
        let mut line = line_abc();
        assert!(line.remove_line_station(&"q".into()).is_err());
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_from_unordered_hops() {
        let line = Line::from_line_stations(
            "line_2".into(),
            "Line 2",
            vec![
                hop(Some("b"), "c", 1, 1),
                hop(None, "a", 0, 0),
                hop(Some("a"), "b", 1, 1),
            ],
        )
        .unwrap();

        assert_eq!(ids(&line), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_broken_hops() {
        let two_heads = vec![hop(None, "a", 0, 0), hop(None, "b", 0, 0)];
        let cycle = vec![
            hop(None, "a", 0, 0),
            hop(Some("c"), "b", 1, 1),
            hop(Some("b"), "c", 1, 1),
        ];
        let dangling = vec![hop(None, "a", 0, 0), hop(Some("ghost"), "b", 1, 1)];
        let branch = vec![
            hop(None, "a", 0, 0),
            hop(Some("a"), "b", 1, 1),
            hop(Some("a"), "c", 1, 1),
        ];

        for hops in [two_heads, cycle, dangling, branch] {
            assert!(matches!(
                Line::from_line_stations("bad".into(), "Bad", hops),
                Err(TransitError::GraphConstruction(_))
            ));
        }
    }
}
