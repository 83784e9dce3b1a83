//! # Body-frame thruster efforts
//!
//! Efforts are the normalised commands handed to thruster mixing, one per
//! controllable body axis. Every field is clamped into [-1, 1] at the
//! moment it is set, so an `Efforts` value is always safe to mix.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{Acceleration, Dynamics};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Thruster efforts from the joystick or the controllers, in the body
/// frame. Each ranges from 1.0 for full positive to -1.0 for full reverse.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Efforts {
    forward: f64,
    strafe: f64,
    vertical: f64,
    yaw: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Efforts {
    pub fn forward(&self) -> f64 {
        self.forward
    }

    pub fn strafe(&self) -> f64 {
        self.strafe
    }

    pub fn vertical(&self) -> f64 {
        self.vertical
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn set_forward(&mut self, forward: f64) {
        self.forward = clamp(&forward, &-1.0, &1.0);
    }

    pub fn set_strafe(&mut self, strafe: f64) {
        self.strafe = clamp(&strafe, &-1.0, &1.0);
    }

    pub fn set_vertical(&mut self, vertical: f64) {
        self.vertical = clamp(&vertical, &-1.0, &1.0);
    }

    pub fn set_yaw(&mut self, yaw: f64) {
        self.yaw = clamp(&yaw, &-1.0, &1.0);
    }

    /// Zero every axis.
    pub fn all_stop(&mut self) {
        self.forward = 0.0;
        self.strafe = 0.0;
        self.vertical = 0.0;
        self.yaw = 0.0;
    }

    /// Convert a world-frame acceleration command into body-frame efforts.
    ///
    /// The per-axis nonlinear accel to effort curves are applied first,
    /// then the horizontal pair is rotated into the body frame using the
    /// current yaw.
    pub fn from_acceleration(dynamics: &Dynamics, u_bar: &Acceleration, current_yaw: f64) -> Self {
        let x_effort = dynamics.accel_to_effort_xy(u_bar.x);
        let y_effort = dynamics.accel_to_effort_xy(u_bar.y);
        let (forward, strafe) = rotate_frame(x_effort, y_effort, current_yaw);

        let mut efforts = Self::default();
        efforts.set_forward(forward);
        efforts.set_strafe(strafe);
        efforts.set_vertical(dynamics.accel_to_effort_z(u_bar.z));
        efforts.set_yaw(dynamics.accel_to_effort_yaw(u_bar.yaw));
        efforts
    }

    /// The four efforts in (forward, strafe, vertical, yaw) order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.forward, self.strafe, self.vertical, self.yaw]
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotate a world-frame (x, y) pair into the body frame:
/// `(forward, strafe) = R(-yaw) * (x, y)`.
pub fn rotate_frame(x: f64, y: f64, yaw: f64) -> (f64, f64) {
    let forward = x * yaw.cos() + y * yaw.sin();
    let strafe = -x * yaw.sin() + y * yaw.cos();
    (forward, strafe)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const FRAC_PI_2: f64 = std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_setters_clamp() {
        let mut e = Efforts::default();

        e.set_forward(2.0);
        e.set_strafe(-7.5);
        e.set_vertical(0.25);
        e.set_yaw(-1.0);

        assert_eq!(e.forward(), 1.0);
        assert_eq!(e.strafe(), -1.0);
        assert_eq!(e.vertical(), 0.25);
        assert_eq!(e.yaw(), -1.0);
    }

    #[test]
    fn test_from_acceleration_is_bounded() {
        let dynamics = Dynamics::default();

        // Absurd accelerations still produce efforts within [-1, 1]
        let u_bar = Acceleration {
            x: 1e6,
            y: -1e6,
            z: 1e6,
            yaw: -1e6,
        };

        for &yaw in &[0.0, 0.3, -2.8] {
            let e = Efforts::from_acceleration(&dynamics, &u_bar, yaw);
            for v in e.to_array().iter() {
                assert!(*v >= -1.0 && *v <= 1.0);
            }
        }
    }

    #[test]
    fn test_rotate_frame() {
        // Facing +y, a world +x demand becomes a starboard strafe
        let (forward, strafe) = rotate_frame(1.0, 0.0, FRAC_PI_2);
        assert!(forward.abs() < 1e-12);
        assert!((strafe + 1.0).abs() < 1e-12);

        // Facing +x the frames coincide
        let (forward, strafe) = rotate_frame(0.5, -0.25, 0.0);
        assert_eq!(forward, 0.5);
        assert_eq!(strafe, -0.25);
    }

    #[test]
    fn test_all_stop() {
        let mut e = Efforts::default();
        e.set_forward(0.5);
        e.set_yaw(-0.5);

        e.all_stop();
        assert_eq!(e.to_array(), [0.0; 4]);
    }
}
