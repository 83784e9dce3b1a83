//! Parameters structure for the motion segments

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Cruise rates and ramp accelerations for the motion segments.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentParams {
    /// Cruise speed for line segments.
    ///
    /// Units: meters/second
    pub xy_cruise_ms: f64,

    /// Ramp acceleration for line segments.
    ///
    /// Units: meters/second^2
    pub xy_accel_mss: f64,

    /// Cruise speed for vertical segments.
    ///
    /// Units: meters/second
    pub z_cruise_ms: f64,

    /// Ramp acceleration for vertical segments.
    ///
    /// Units: meters/second^2
    pub z_accel_mss: f64,

    /// Cruise rate for rotate segments.
    ///
    /// Units: radians/second
    pub yaw_cruise_rads: f64,

    /// Ramp acceleration for rotate segments.
    ///
    /// Units: radians/second^2
    pub yaw_accel_radss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            xy_cruise_ms: 0.5,
            xy_accel_mss: 0.25,
            z_cruise_ms: 0.3,
            z_accel_mss: 0.15,
            yaw_cruise_rads: 0.7,
            yaw_accel_radss: 0.35,
        }
    }
}
