//! Query orchestration over a [`TransitProvider`](crate::models::TransitProvider).

pub mod config;
pub mod route;

pub use config::RoutingConfig;
pub use route::{LineDetail, PathInfo, PathResult, PathResults, RouteService};
