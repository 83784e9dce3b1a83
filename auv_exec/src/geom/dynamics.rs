//! # Rigid-body constants and the acceleration to effort mapping
//!
//! Thrust from the propeller-type thrusters scales with the square of the
//! normalised effort, so the inverse mapping from a demanded force to an
//! effort is a signed square root against the bollard (maximum static)
//! force of the axis.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle rigid-body constants.
#[derive(Debug, Clone, Deserialize)]
pub struct Dynamics {
    /// Vehicle mass including entrained water.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Moment of inertia about the body z axis.
    ///
    /// Units: kilogram meters squared
    pub moment_z_kgm2: f64,

    /// Combined bollard force available on the x/y plane.
    ///
    /// Units: newtons
    pub bollard_xy_n: f64,

    /// Combined bollard force available on the vertical axis.
    ///
    /// Units: newtons
    pub bollard_z_n: f64,

    /// Combined bollard torque available about the z axis.
    ///
    /// Units: newton meters
    pub bollard_yaw_nm: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Dynamics {
    fn default() -> Self {
        Self {
            mass_kg: 9.75,
            moment_z_kgm2: 0.38,
            bollard_xy_n: 72.0,
            bollard_z_n: 36.0,
            bollard_yaw_nm: 18.0,
        }
    }
}

impl Dynamics {
    /// Effort required for a horizontal acceleration component.
    pub fn accel_to_effort_xy(&self, accel: f64) -> f64 {
        force_to_effort(self.mass_kg * accel, self.bollard_xy_n)
    }

    /// Effort required for a vertical acceleration.
    pub fn accel_to_effort_z(&self, accel: f64) -> f64 {
        force_to_effort(self.mass_kg * accel, self.bollard_z_n)
    }

    /// Effort required for a yaw angular acceleration.
    pub fn accel_to_effort_yaw(&self, accel: f64) -> f64 {
        force_to_effort(self.moment_z_kgm2 * accel, self.bollard_yaw_nm)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Invert the quadratic thrust curve: thrust = bollard * effort * |effort|.
///
/// Unclamped, the caller bounds the result to [-1, 1].
fn force_to_effort(force: f64, bollard: f64) -> f64 {
    force.signum() * (force.abs() / bollard).sqrt()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_curve_is_odd() {
        let model = Dynamics::default();

        for &a in &[0.1, 0.5, 1.0, 3.0] {
            let pos = model.accel_to_effort_xy(a);
            let neg = model.accel_to_effort_xy(-a);
            assert!((pos + neg).abs() < 1e-12);
            assert!(pos > 0.0);
        }

        assert_eq!(model.accel_to_effort_xy(0.0), 0.0);
    }

    #[test]
    fn test_bollard_accel_gives_unit_effort() {
        let model = Dynamics::default();

        // The acceleration matching the full bollard force maps to 1.0
        let a = model.bollard_z_n / model.mass_kg;
        assert!((model.accel_to_effort_z(a) - 1.0).abs() < 1e-12);
    }
}
