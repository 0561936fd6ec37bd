//! Subway graph construction and shortest-path search.

pub mod dijkstra;
pub mod path;
pub mod subway_map;

pub use dijkstra::{shortest_path, shortest_path_until};
pub use path::{aggregate, Path, PathSegment, PathTotals};
pub use subway_map::{SubwayEdge, SubwayMap};
