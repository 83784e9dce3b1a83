//! # Equipment message definitions
//!
//! One module per collaborator. The wire pose representation lives here as
//! it is shared by the estimator, map and mission messages.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod driver;
pub mod estimate;
pub mod joy;
pub mod map;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A 6-DOF pose as it appears on the wire: a position and an orientation
/// quaternion.
///
/// The control core works in 4 DOF (x, y, z, yaw). Conversion between the
/// two representations is performed by `auv_lib::geom`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WirePose {
    /// Position in the world frame, in meters.
    pub position: [f64; 3],

    /// Orientation quaternion in (x, y, z, w) order.
    pub orientation: [f64; 4],
}

impl Default for WirePose {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            // Identity rotation, not the all-zero quaternion
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}
