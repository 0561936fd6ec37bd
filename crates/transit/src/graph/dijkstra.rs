//! Single-source shortest path over a [`SubwayMap`].
//!
//! Ties are resolved deterministically: the heap pops equal costs in
//! ascending station-id order, each node's edges are relaxed cheapest first
//! (lowest line id among equal weights), and relaxation is strict, so the
//! first predecessor to reach a cost keeps it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::graph::path::{Path, PathSegment};
use crate::graph::subway_map::SubwayMap;
use crate::identifiers::*;
use crate::models::types::*;

// Heap pops between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Cheapest path from `source` to `destination` under the map's criterion.
///
/// Returns `Err(UnknownStation)` if either station is not a node of the map,
/// `Err(NoPathFound)` if both are nodes but disconnected.
pub fn shortest_path(
    map: &SubwayMap,
    source: &StationIdentifier,
    destination: &StationIdentifier,
) -> Result<Path> {
    search(map, source, destination, || false)
}

/// [`shortest_path`] that gives up with `Err(DeadlineExceeded)` once
/// `deadline` has passed.
pub fn shortest_path_until(
    map: &SubwayMap,
    source: &StationIdentifier,
    destination: &StationIdentifier,
    deadline: Instant,
) -> Result<Path> {
    search(map, source, destination, || Instant::now() >= deadline)
}

// `expired` is consulted once before the search and then every
// DEADLINE_CHECK_INTERVAL pops.
fn search(
    map: &SubwayMap,
    source: &StationIdentifier,
    destination: &StationIdentifier,
    mut expired: impl FnMut() -> bool,
) -> Result<Path> {
    let src = map
        .node_of(source)
        .ok_or_else(|| TransitError::UnknownStation(source.clone()))?;
    let dst = map
        .node_of(destination)
        .ok_or_else(|| TransitError::UnknownStation(destination.clone()))?;

    if expired() {
        return Err(TransitError::DeadlineExceeded);
    }

    if src == dst {
        return Ok(Path::trivial(source.clone(), map.edge_weight_type()));
    }

    let mut cost = vec![u64::MAX; map.node_count()];
    // Edge used to reach each node
    let mut via: Vec<Option<usize>> = vec![None; map.node_count()];
    let mut heap = BinaryHeap::new();

    cost[src] = 0;
    heap.push(Reverse((0u64, src)));

    let mut pops = 0usize;
    while let Some(Reverse((current, node))) = heap.pop() {
        pops += 1;
        if pops % DEADLINE_CHECK_INTERVAL == 0 && expired() {
            return Err(TransitError::DeadlineExceeded);
        }

        if current > cost[node] {
            continue;
        }
        if node == dst {
            break;
        }

        for &edge_idx in map.outgoing_edges(node) {
            let edge = map.edge(edge_idx);
            let next = current + u64::from(edge.weight);

            if next < cost[edge.to] {
                cost[edge.to] = next;
                via[edge.to] = Some(edge_idx);
                heap.push(Reverse((next, edge.to)));
            }
        }
    }

    if cost[dst] == u64::MAX {
        return Err(TransitError::NoPathFound {
            from: source.clone(),
            to: destination.clone(),
        });
    }

    let mut segments = Vec::new();
    let mut cursor = dst;
    while let Some(edge_idx) = via[cursor] {
        let edge = map.edge(edge_idx);
        segments.push(PathSegment {
            line_id: edge.line_id.clone(),
            from: map.station(edge.from).clone(),
            to: map.station(edge.to).clone(),
            distance: edge.distance,
            duration: edge.duration,
        });
        cursor = edge.from;
    }
    segments.reverse();

    Ok(Path::from_segments(
        source.clone(),
        segments,
        map.edge_weight_type(),
        cost[dst],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::line::Line;
    use std::sync::Arc;
    use std::time::Duration;

    fn line(id: &str, stations: &[(&str, u32, u32)]) -> Arc<Line> {
        let mut hops = Vec::new();
        let mut pre: Option<StationIdentifier> = None;
        for &(station, distance, duration) in stations {
            hops.push(LineStation::new(pre.clone(), station.into(), distance, duration));
            pre = Some(station.into());
        }
        Arc::new(Line::from_line_stations(id.into(), id, hops).unwrap())
    }

    fn ids(path: &Path) -> Vec<&str> {
        path.stations().iter().map(StationIdentifier::as_str).collect()
    }

    /// Two routes from s1 to s4: short but slow via s2, long but fast via s3.
    fn diamond() -> Vec<Arc<Line>> {
        vec![
            line("line_1", &[("s1", 0, 0), ("s2", 2, 10), ("s4", 2, 10)]),
            line("line_2", &[("s1", 0, 0), ("s3", 6, 2), ("s4", 6, 2)]),
        ]
    }

    #[test]
    fn test_criterion_changes_route() {
        let lines = diamond();

        let by_distance = SubwayMap::build(&lines, EdgeWeightType::Distance).unwrap();
        let path = shortest_path(&by_distance, &"s1".into(), &"s4".into()).unwrap();
        assert_eq!(ids(&path), vec!["s1", "s2", "s4"]);
        assert_eq!(path.weight(), 4);

        let by_duration = SubwayMap::build(&lines, EdgeWeightType::Duration).unwrap();
        let path = shortest_path(&by_duration, &"s1".into(), &"s4".into()).unwrap();
        assert_eq!(ids(&path), vec!["s1", "s3", "s4"]);
        assert_eq!(path.weight(), 4);
    }

    #[test]
    fn test_weight_matches_traversed_edges() {
        let lines = diamond();
        let map = SubwayMap::build(&lines, EdgeWeightType::Duration).unwrap();
        let path = shortest_path(&map, &"s1".into(), &"s4".into()).unwrap();

        let summed: u64 = path.segments().iter().map(|s| u64::from(s.duration)).sum();
        assert_eq!(summed, path.weight());
        assert_eq!(path.stations().first(), Some(&StationIdentifier::new("s1")));
        assert_eq!(path.stations().last(), Some(&StationIdentifier::new("s4")));
    }

    #[test]
    fn test_transfer_between_lines() {
        let lines = vec![
            line("a", &[("s1", 0, 0), ("s2", 5, 3), ("s3", 4, 6)]),
            line("b", &[("s2", 0, 0), ("s4", 2, 10)]),
        ];
        let map = SubwayMap::build(&lines, EdgeWeightType::Distance).unwrap();
        let path = shortest_path(&map, &"s1".into(), &"s4".into()).unwrap();

        assert_eq!(ids(&path), vec!["s1", "s2", "s4"]);
        let lines_used: Vec<&str> = path.segments().iter().map(|s| s.line_id.as_str()).collect();
        assert_eq!(lines_used, vec!["a", "b"]);
    }

    #[test]
    fn test_parallel_edge_tie_prefers_lowest_line() {
        let lines = vec![
            line("line_7", &[("s1", 0, 0), ("s2", 3, 1)]),
            line("line_3", &[("s1", 0, 0), ("s2", 3, 8)]),
        ];
        let map = SubwayMap::build(&lines, EdgeWeightType::Distance).unwrap();
        let path = shortest_path(&map, &"s1".into(), &"s2".into()).unwrap();

        assert_eq!(path.segments()[0].line_id.as_str(), "line_3");
        assert_eq!(path.total_duration(), 8);
    }

    #[test]
    fn test_idempotent_rebuild() {
        let first = SubwayMap::build(&diamond(), EdgeWeightType::Distance).unwrap();
        let second = SubwayMap::build(&diamond(), EdgeWeightType::Distance).unwrap();

        let a = shortest_path(&first, &"s1".into(), &"s4".into()).unwrap();
        let b = shortest_path(&second, &"s1".into(), &"s4".into()).unwrap();
        assert_eq!(a.weight(), b.weight());
        assert_eq!(a.stations(), b.stations());
    }

    #[test]
    fn test_trivial_path() {
        let map = SubwayMap::build(&diamond(), EdgeWeightType::Distance).unwrap();
        let path = shortest_path(&map, &"s2".into(), &"s2".into()).unwrap();

        assert_eq!(ids(&path), vec!["s2"]);
        assert_eq!(path.weight(), 0);
        assert_eq!(path.total_distance(), 0);
        assert_eq!(path.total_duration(), 0);
    }

    #[test]
    fn test_unreachable_and_unknown() {
        let map = SubwayMap::build(&diamond(), EdgeWeightType::Distance).unwrap();

        // edges are directed, s4 is a terminus
        assert!(matches!(
            shortest_path(&map, &"s4".into(), &"s1".into()),
            Err(TransitError::NoPathFound { .. })
        ));
        assert!(matches!(
            shortest_path(&map, &"s1".into(), &"s99".into()),
            Err(TransitError::UnknownStation(id)) if id.as_str() == "s99"
        ));
    }

    #[test]
    fn test_deadline() {
        let map = SubwayMap::build(&diamond(), EdgeWeightType::Distance).unwrap();

        assert!(matches!(
            shortest_path_until(&map, &"s1".into(), &"s4".into(), Instant::now()),
            Err(TransitError::DeadlineExceeded)
        ));

        let later = Instant::now() + Duration::from_secs(60);
        let path = shortest_path_until(&map, &"s1".into(), &"s4".into(), later).unwrap();
        assert_eq!(path.weight(), 4);
    }

    #[test]
    fn test_deadline_expires_mid_search() {
        let names: Vec<String> = (0..200).map(|i| format!("s{i:03}")).collect();
        let stations: Vec<(&str, u32, u32)> = names.iter().map(|name| (name.as_str(), 1, 1)).collect();
        let map = SubwayMap::build(&[line("long", &stations)], EdgeWeightType::Distance).unwrap();

        // Passes the check before the search, expires at the first in-loop check.
        let mut checks = 0;
        let found = search(&map, &"s000".into(), &"s199".into(), || {
            checks += 1;
            checks > 1
        });

        assert!(matches!(found, Err(TransitError::DeadlineExceeded)));
        assert_eq!(checks, 2);
    }

    #[test]
    fn test_deadline_checked_every_interval() {
        let names: Vec<String> = (0..200).map(|i| format!("s{i:03}")).collect();
        let stations: Vec<(&str, u32, u32)> = names.iter().map(|name| (name.as_str(), 1, 1)).collect();
        let map = SubwayMap::build(&[line("long", &stations)], EdgeWeightType::Distance).unwrap();

        let mut checks = 0;
        let path = search(&map, &"s000".into(), &"s199".into(), || {
            checks += 1;
            false
        })
        .unwrap();

        assert_eq!(path.weight(), 199);
        // one up front, then at pops 64, 128 and 192
        assert_eq!(checks, 4);
    }
}
