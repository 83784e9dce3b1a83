//! Parameters structure for the controller cascade

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::pid::PidGains;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which feedback law to run.
///
/// Selected from configuration at startup; one policy is active per planner
/// instance, never mixed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlPolicy {
    /// PID on every trusted axis, plus feedforward.
    Simple,

    /// PID only outside the per-axis deadzone, feedforward otherwise.
    Deadzone,

    /// PID with the change in output limited per tick, feedforward
    /// applied outside the limit.
    Jerk,

    /// Deadzone gating combined with jerk limiting.
    Best,

    /// PID on depth only, feedforward elsewhere.
    Depth,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the controller cascade.
#[derive(Debug, Clone, Deserialize)]
pub struct CtrlParams {
    pub policy: ControlPolicy,

    pub x: PidGains,
    pub y: PidGains,
    pub z: PidGains,
    pub yaw: PidGains,

    /// An axis whose estimate variance is at or above this value is treated
    /// as unobserved.
    pub trust_covariance: f64,

    /// Planar deadzone for the Deadzone/Best policies.
    ///
    /// Units: meters
    pub epsilon_xy_m: f64,

    /// Vertical deadzone.
    ///
    /// Units: meters
    pub epsilon_z_m: f64,

    /// Angular deadzone.
    ///
    /// Units: radians
    pub epsilon_yaw_rad: f64,

    /// Maximum change of commanded planar acceleration per second.
    ///
    /// Units: meters/second^3
    pub jerk_xy_msss: f64,

    /// Maximum change of commanded vertical acceleration per second.
    ///
    /// Units: meters/second^3
    pub jerk_z_msss: f64,

    /// Maximum change of commanded yaw acceleration per second.
    ///
    /// Units: radians/second^3
    pub jerk_yaw_radsss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CtrlParams {
    fn default() -> Self {
        Self {
            policy: ControlPolicy::Simple,
            x: PidGains {
                kp: 0.8,
                ki: 0.0,
                kd: 0.2,
            },
            y: PidGains {
                kp: 0.8,
                ki: 0.0,
                kd: 0.2,
            },
            z: PidGains {
                kp: 0.5,
                ki: 0.0,
                kd: 0.1,
            },
            yaw: PidGains {
                kp: 0.9,
                ki: 0.0,
                kd: 0.15,
            },
            trust_covariance: 1e4,
            epsilon_xy_m: 0.1,
            epsilon_z_m: 0.1,
            epsilon_yaw_rad: 0.15,
            jerk_xy_msss: 0.5,
            jerk_z_msss: 0.5,
            jerk_yaw_radsss: 0.7,
        }
    }
}
