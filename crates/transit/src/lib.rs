//! # subway-transit
//!
//! Multi-criterion route finding over a subway network.
//!
//! ## Features
//!
//! - **Line chains**: each line is a linked chain of stations that supports
//!   splicing stations in and out anywhere along the line
//! - **Merged graph**: all lines combine into one directed graph; shared
//!   stations become transfers
//! - **Selectable criterion**: search by distance or by duration, and always
//!   get both totals for the route found
//! - **Snapshot queries**: graphs are rebuilt per query, nothing is cached
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use subway_transit::prelude::*;
//!
//! let mut line = Line::new(LineIdentifier::new("line_2"), "Line 2");
//! line.add_line_station(LineStation::head("s1".into())).unwrap();
//! line.add_line_station(LineStation::new(Some("s1".into()), "s2".into(), 5, 3)).unwrap();
//!
//! let provider = StaticTransitProvider::from_data(
//!     vec![StationImpl::new("s1", "Gangnam"), StationImpl::new("s2", "Yeoksam")],
//!     vec![line],
//! );
//!
//! let service = RouteService::new(Arc::new(provider), RoutingConfig::default()).unwrap();
//! let results = service.find_paths(&PathInfo::new("Gangnam", "Yeoksam")).unwrap();
//!
//! let by_duration = results.get(EdgeWeightType::Duration).unwrap();
//! assert_eq!(by_duration.total_distance, 5);
//! assert_eq!(by_duration.total_duration, 3);
//! ```

pub mod graph;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod service;

// Re-exports for convenience
pub mod prelude {
    pub use crate::graph::{
        aggregate, shortest_path, shortest_path_until, Path, PathSegment, PathTotals, SubwayMap,
    };
    pub use crate::identifiers::*;
    pub use crate::models::{line::Line, traits::*, types::*};
    pub use crate::provider::{StaticTransitProvider, StationImpl};
    pub use crate::service::{
        LineDetail, PathInfo, PathResult, PathResults, RouteService, RoutingConfig,
    };
}

pub use prelude::*;
