//! Core traits for subway entities.
//!
//! These traits define the public interface for subway data.
//! Implementations can be in-memory, database-backed, or remote.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::line::Line;

// ============================================================================
// Core Entity Traits
// ============================================================================

/// A subway station
pub trait TransitStation: Send + Sync {
    fn id(&self) -> &StationIdentifier;
    fn name(&self) -> &str;
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Station registry and line store consumed by the routing core
pub trait TransitProvider: Send + Sync {
    // ---- Station lookups ----
    fn get_station(&self, id: &StationIdentifier) -> Option<Arc<dyn TransitStation>>;

    /// Resolve a display name to a station
    fn find_station_by_name(&self, name: &str) -> Option<Arc<dyn TransitStation>>;

    fn all_stations(&self) -> Vec<Arc<dyn TransitStation>>;

    // ---- Lines ----
    fn get_line(&self, id: &LineIdentifier) -> Option<Arc<Line>>;

    /// Consistent snapshot of every line and its chain
    fn all_lines(&self) -> Vec<Arc<Line>>;
}
