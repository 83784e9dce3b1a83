//! # Thruster mixing

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::params::ThrusterConfig;
use crate::geom::Efforts;
use comms_if::eqpt::driver::ThrusterDem;
use util::maths::clamp;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Mix body-frame efforts into per-thruster demands.
///
/// Each thruster sums the body efforts weighted by its contribution
/// factors; the sum is clamped back into [-1, 1] since opposing demands
/// can otherwise exceed the range.
pub fn mix(thrusters: &[ThrusterConfig], efforts: &Efforts) -> Vec<ThrusterDem> {
    thrusters
        .iter()
        .map(|thruster| {
            let effort = efforts.forward() * thruster.forward_factor
                + efforts.strafe() * thruster.strafe_factor
                + efforts.yaw() * thruster.yaw_factor
                + efforts.vertical() * thruster.vertical_factor;

            ThrusterDem {
                effort: clamp(&effort, &-1.0, &1.0),
                reverse: thruster.ccw,
            }
        })
        .collect()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
