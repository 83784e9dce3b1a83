//! Parameters structure for the planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::ctrl::CtrlParams;
use crate::segment::SegmentParams;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How targets are derived from the marker map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Targets directly above each marker, at the cruise depth.
    Down,

    /// Targets in front of each marker, facing it.
    Forward,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory synthesis and target sequencing.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerParams {
    pub sequence: SequenceKind,

    /// Keep station indefinitely at the final target of a map sequence.
    pub keep_station: bool,

    /// Depth for map-derived targets.
    ///
    /// Units: meters (z is negative below the surface)
    pub z_target_m: f64,

    /// Stand-off distance from a marker for Forward sequences.
    ///
    /// Units: meters
    pub xy_offset_m: f64,

    /// Translation below which a vertical or line segment is elided.
    ///
    /// Units: meters
    pub epsilon_xyz_m: f64,

    /// Rotation below which a rotate segment is elided.
    ///
    /// Units: radians
    pub epsilon_yaw_rad: f64,
}

/// Everything needed to build a planner: its own parameters plus those of
/// the segments and controllers it constructs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuvConfig {
    pub planner: PlannerParams,
    pub segment: SegmentParams,
    pub ctrl: CtrlParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            sequence: SequenceKind::Down,
            keep_station: true,
            z_target_m: -0.5,
            xy_offset_m: 1.0,
            epsilon_xyz_m: 0.05,
            epsilon_yaw_rad: 0.05,
        }
    }
}
