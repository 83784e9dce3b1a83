//! # Operator joystick messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::stamp::Timestamp;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Button state of the operator joystick.
///
/// Mode buttons are acted on at the rising edge only, so a held button does
/// not retrigger its transition.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoyButtons {
    pub disarm: bool,
    pub arm: bool,
    pub rov: bool,
    pub rov_hold_pressure: bool,
    pub auv_keep_station: bool,
    pub auv_keep_origin: bool,
    pub auv_random: bool,
    pub tilt_down: bool,
    pub tilt_up: bool,
    pub bright_down: bool,
    pub bright_up: bool,
}

/// A joystick sample.
///
/// Axes are normalised to [-1, 1] by the input device layer.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoyMsg {
    pub t: Timestamp,

    /// Surge demand, positive forward.
    pub forward: f64,

    /// Sway demand, positive left.
    pub strafe: f64,

    /// Heave demand, positive up.
    pub vertical: f64,

    /// Yaw rate demand, positive counter-clockwise.
    pub yaw: f64,

    pub buttons: JoyButtons,
}
