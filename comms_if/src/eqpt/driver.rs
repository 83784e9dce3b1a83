//! # Hardware driver messages
//!
//! The driver consumes one [`ControlMsg`] per control cycle and reports the
//! barometer, battery and leak sensors which are wired directly to it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::stamp::Timestamp;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Operating mode of the vehicle.
///
/// The AUV modes form a contiguous ordered range starting at
/// [`Mode::AuvKeepStation`], so "is this an AUV mode" is an ordering test
/// rather than a per-value match. The predicates live in
/// `auv_lib::vehicle::mode`.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Mode {
    /// All thrusters off, no control authority.
    Disarmed,

    /// Teleoperated, thruster efforts derive from the joystick.
    Rov,

    /// Teleoperated, with the vertical axis held by a pressure loop.
    RovHoldPressure,

    /// Autonomous, keep station at the pose held when the mode was entered.
    AuvKeepStation,

    /// Autonomous, move to a goal pose (the origin by default) and keep
    /// station there.
    AuvKeepOrigin,

    /// Autonomous, visit every map target in a shuffled order.
    AuvRandom,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Disarmed
    }
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demand for a single thruster.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct ThrusterDem {
    /// Normalised effort in [-1, 1].
    pub effort: f64,

    /// True if this thruster spins counter-clockwise. The driver uses this
    /// to orient the PWM mapping.
    pub reverse: bool,
}

/// The per-cycle control message consumed by the hardware driver.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ControlMsg {
    /// Time at which this message was produced.
    pub t: Timestamp,

    /// Operating mode at the time the message was produced.
    pub mode: Mode,

    /// Body-frame efforts before thruster mixing, each in [-1, 1], in
    /// (forward, strafe, vertical, yaw) order. Telemetry only, the driver
    /// actuates `thrusters`.
    pub efforts: [f64; 4],

    /// Per-thruster demands, in the fixed thruster order of the vehicle
    /// configuration.
    pub thrusters: Vec<ThrusterDem>,

    /// Plan-minus-estimate pose error in (x, y, z, yaw) order. Zero outside
    /// the AUV modes. Telemetry only.
    pub error: [f64; 4],

    /// Camera tilt demand in degrees, in [-45, 45].
    pub tilt: i32,

    /// Light brightness demand in percent, in [0, 100].
    pub brightness: i32,
}

/// Barometer reading, reported by the driver.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaroMsg {
    pub t: Timestamp,

    /// Absolute pressure in pascals.
    pub pressure_pa: f64,
}

/// Battery state, reported by the driver.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryMsg {
    pub t: Timestamp,

    /// Pack voltage in volts.
    pub voltage_v: f64,

    /// True if the driver considers the pack too low to continue.
    pub low: bool,
}

/// Leak detector state, reported by the driver.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeakMsg {
    pub t: Timestamp,

    /// True if water has been detected inside the hull.
    pub leak: bool,
}
