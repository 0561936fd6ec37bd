//! The merged subway graph for one weighting criterion.
//!
//! Every line contributes one directed edge per hop that has a predecessor.
//! A station served by several lines becomes a single node, which is how
//! transfers appear in the graph. Parallel edges between the same pair of
//! stations are kept; the search simply relaxes the cheaper one first.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::identifiers::*;
use crate::models::{line::Line, types::*};

/// Directed edge produced from a single hop record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubwayEdge {
    pub line_id: LineIdentifier,
    pub from: usize,
    pub to: usize,
    pub distance: u32,
    pub duration: u32,
    /// `distance` or `duration`, per the map's [`EdgeWeightType`]
    pub weight: u32,
}

#[derive(Clone, Debug)]
pub struct SubwayMap {
    weight_type: EdgeWeightType,
    // Node index -> station, ascending by station id
    stations: Vec<StationIdentifier>,
    node_index: HashMap<StationIdentifier, usize>,
    edges: Vec<SubwayEdge>,
    // Node index -> edge indices, ordered by (weight, line id, target)
    outgoing: Vec<Vec<usize>>,
}

impl SubwayMap {
    /// Build the graph over every line of a snapshot.
    ///
    /// Returns `Err(GraphConstruction)` if a hop with a predecessor has a zero
    /// distance or duration.
    pub fn build(lines: &[Arc<Line>], weight_type: EdgeWeightType) -> Result<Self> {
        let stations: Vec<StationIdentifier> = lines
            .iter()
            .flat_map(|line| line.hops().iter())
            .flat_map(|hop| hop.pre_station_id.iter().chain(std::iter::once(&hop.station_id)))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let node_index: HashMap<StationIdentifier, usize> = stations
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        let mut edges = Vec::new();
        let mut outgoing = vec![Vec::new(); stations.len()];

        for line in lines {
            for hop in line.hops() {
                let Some(pre) = &hop.pre_station_id else {
                    continue;
                };

                if hop.distance == 0 || hop.duration == 0 {
                    return Err(TransitError::GraphConstruction(format!(
                        "line {}: hop {} -> {} has non-positive distance ({}) or duration ({})",
                        line.id, pre, hop.station_id, hop.distance, hop.duration
                    )));
                }

                let from = node_index[pre];
                let to = node_index[&hop.station_id];

                outgoing[from].push(edges.len());
                edges.push(SubwayEdge {
                    line_id: line.id.clone(),
                    from,
                    to,
                    distance: hop.distance,
                    duration: hop.duration,
                    weight: weight_type.weight_of(hop),
                });
            }
        }

        for adjacent in &mut outgoing {
            adjacent.sort_by(|&a, &b| {
                let (a, b) = (&edges[a], &edges[b]);
                a.weight
                    .cmp(&b.weight)
                    .then_with(|| a.line_id.cmp(&b.line_id))
                    .then_with(|| a.to.cmp(&b.to))
            });
        }

        debug!(
            criterion = %weight_type,
            lines = lines.len(),
            nodes = stations.len(),
            edges = edges.len(),
            "built subway map"
        );

        Ok(Self {
            weight_type,
            stations,
            node_index,
            edges,
            outgoing,
        })
    }

    pub fn edge_weight_type(&self) -> EdgeWeightType {
        self.weight_type
    }

    pub fn node_count(&self) -> usize {
        self.stations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_station(&self, station_id: &StationIdentifier) -> bool {
        self.node_index.contains_key(station_id)
    }

    pub(crate) fn node_of(&self, station_id: &StationIdentifier) -> Option<usize> {
        self.node_index.get(station_id).copied()
    }

    pub(crate) fn station(&self, node: usize) -> &StationIdentifier {
        &self.stations[node]
    }

    pub(crate) fn edge(&self, edge: usize) -> &SubwayEdge {
        &self.edges[edge]
    }

    pub(crate) fn outgoing_edges(&self, node: usize) -> &[usize] {
        &self.outgoing[node]
    }

    /// Edges leaving a station, cheapest first
    pub fn edges_from(&self, station_id: &StationIdentifier) -> impl Iterator<Item = &SubwayEdge> {
        self.node_of(station_id)
            .map(|node| self.outgoing[node].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&edge| &self.edges[edge])
    }
}
