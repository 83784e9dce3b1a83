//! Parameters structure for the vehicle control loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::mode::Mode;
use crate::ctrl::PidGains;
use crate::geom::Dynamics;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One thruster of the vehicle. Order in the parameter file must match the
/// driver's channel order.
#[derive(Debug, Clone, Deserialize)]
pub struct ThrusterConfig {
    /// Name of the thruster, for logs and telemetry.
    pub name: String,

    /// True if the propeller spins counter-clockwise; forwarded to the
    /// driver which orients the PWM mapping with it.
    pub ccw: bool,

    /// Contribution factors of each body-frame effort to this thruster.
    pub forward_factor: f64,
    pub strafe_factor: f64,
    pub yaw_factor: f64,
    pub vertical_factor: f64,
}

/// Parameters for the vehicle control loop.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleParams {
    /// Target period of one control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Disarm if no joystick message within this window (ROV modes).
    ///
    /// Units: seconds
    pub joy_timeout_s: f64,

    /// Disarm if no pose estimate within this window (AUV modes and
    /// pressure hold).
    ///
    /// Units: seconds
    pub odom_timeout_s: f64,

    /// Disarm if no barometer message within this window (pressure hold).
    ///
    /// Units: seconds
    pub baro_timeout_s: f64,

    /// Refuse to arm below this roll/pitch stability.
    pub min_arm_stability: f64,

    /// Mode entered when a mission ends or is cancelled.
    pub mode_after_mission: Mode,

    /// Joystick axis gains for the ROV modes.
    pub rov_gain_xy: f64,
    pub rov_gain_vertical: f64,
    pub rov_gain_yaw: f64,

    /// Gains of the pressure-hold loop, applied to (target - measured)
    /// pressure in pascals and producing a vertical effort. Pressure grows
    /// as the vehicle descends while positive effort drives it up, so `kp`
    /// is negative on this vehicle.
    pub hold_pressure: PidGains,

    /// Camera tilt button step and limit.
    ///
    /// Units: degrees
    pub tilt_step_deg: i32,
    pub tilt_limit_deg: i32,

    /// Light brightness button step.
    ///
    /// Units: percent
    pub brightness_step_pct: i32,

    pub dynamics: Dynamics,

    pub thrusters: Vec<ThrusterConfig>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for VehicleParams {
    fn default() -> Self {
        let thruster = |name: &str, ccw, f, s, y, v| ThrusterConfig {
            name: name.to_string(),
            ccw,
            forward_factor: f,
            strafe_factor: s,
            yaw_factor: y,
            vertical_factor: v,
        };

        Self {
            cycle_period_s: 0.1,
            joy_timeout_s: 1.0,
            odom_timeout_s: 1.0,
            baro_timeout_s: 1.0,
            min_arm_stability: 0.65,
            mode_after_mission: Mode::Disarmed,
            rov_gain_xy: 1.0,
            rov_gain_vertical: 1.0,
            rov_gain_yaw: 0.7,
            hold_pressure: PidGains {
                kp: -5e-5,
                ki: 0.0,
                kd: 0.0,
            },
            tilt_step_deg: 5,
            tilt_limit_deg: 45,
            brightness_step_pct: 10,
            dynamics: Dynamics::default(),
            thrusters: vec![
                thruster("front_right", false, 1.0, 1.0, 1.0, 0.0),
                thruster("front_left", false, 1.0, -1.0, -1.0, 0.0),
                thruster("rear_right", true, 1.0, -1.0, 1.0, 0.0),
                thruster("rear_left", true, 1.0, 1.0, -1.0, 0.0),
                thruster("vertical_right", false, 0.0, 0.0, 0.0, 1.0),
                thruster("vertical_left", true, 0.0, 0.0, 0.0, -1.0),
            ],
        }
    }
}
