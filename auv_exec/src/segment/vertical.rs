//! # Vertical segment

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use super::{profile::Trapezoid, SegmentParams};
use crate::geom::{Acceleration, Pose};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Ascend or descend to the goal depth along a trapezoidal ramp.
#[derive(Debug, Clone)]
pub struct Vertical {
    start: Pose,
    goal: Pose,
    plan: Pose,
    profile: Trapezoid,

    /// +1.0 descending towards larger z, -1.0 otherwise.
    dir: f64,

    elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Vertical {
    /// Build a vertical segment. `goal` must differ from `start` in z only.
    pub fn new(start: Pose, goal: Pose, params: &SegmentParams) -> Self {
        let dz = goal.z - start.z;

        Self {
            start,
            goal,
            plan: start,
            profile: Trapezoid::new(dz.abs(), params.z_cruise_ms, params.z_accel_mss),
            dir: if dz < 0.0 { -1.0 } else { 1.0 },
            elapsed_s: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed_s += dt;

        if self.elapsed_s < self.profile.duration() {
            self.plan.z = self.start.z + self.dir * self.profile.position(self.elapsed_s);
            true
        } else {
            self.plan = self.goal;
            false
        }
    }

    pub fn plan(&self) -> Pose {
        self.plan
    }

    pub fn ff(&self) -> Acceleration {
        Acceleration {
            z: self.dir * self.profile.accel_at(self.elapsed_s),
            ..Default::default()
        }
    }

    pub fn goal(&self) -> Pose {
        self.goal
    }

    pub fn log_info(&self) {
        info!(
            "vertical: z {:.2} -> {:.2}, {:.1} s",
            self.start.z,
            self.goal.z,
            self.profile.duration()
        );
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ramp_reaches_goal() {
        let params = SegmentParams::default();
        let start = Pose::new(0.5, -0.5, -1.0, 0.2);
        let goal = Pose::new(0.5, -0.5, -2.5, 0.2);
        let mut seg = Vertical::new(start, goal, &params);

        let mut prev_z = start.z;
        while seg.advance(0.05) {
            let plan = seg.plan();

            // Only z moves, monotonically towards the goal
            assert_eq!(plan.x, start.x);
            assert_eq!(plan.y, start.y);
            assert_eq!(plan.yaw, start.yaw);
            assert!(plan.z <= prev_z + 1e-12);
            prev_z = plan.z;
        }

        assert_eq!(seg.plan(), goal);
    }

    #[test]
    fn test_ff_only_during_ramps() {
        let params = SegmentParams::default();
        let start = Pose::new(0.0, 0.0, 0.0, 0.0);
        let goal = Pose::new(0.0, 0.0, -10.0, 0.0);
        let mut seg = Vertical::new(start, goal, &params);

        // First advance is inside the ramp-up phase
        assert!(seg.advance(0.1));
        assert!((seg.ff().z - (-params.z_accel_mss)).abs() < 1e-12);

        // Mid-profile is cruising with no feedforward
        let t_mid = seg.profile.duration() / 2.0;
        while seg.elapsed_s < t_mid {
            seg.advance(0.1);
        }
        assert_eq!(seg.ff().z, 0.0);
    }
}
