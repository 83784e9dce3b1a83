//! # Line segment

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use super::{profile::Trapezoid, SegmentParams};
use crate::geom::{Acceleration, Pose};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Straight-line planar travel at constant depth and yaw.
#[derive(Debug, Clone)]
pub struct Line {
    start: Pose,
    goal: Pose,
    plan: Pose,
    profile: Trapezoid,

    /// Unit direction of travel on the xy plane.
    ux: f64,
    uy: f64,

    elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Line {
    /// Build a line segment. `goal` must differ from `start` in x/y only.
    pub fn new(start: Pose, goal: Pose, params: &SegmentParams) -> Self {
        let dx = goal.x - start.x;
        let dy = goal.y - start.y;
        let distance = dx.hypot(dy);

        Self {
            start,
            goal,
            plan: start,
            profile: Trapezoid::new(distance, params.xy_cruise_ms, params.xy_accel_mss),
            ux: dx / distance,
            uy: dy / distance,
            elapsed_s: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed_s += dt;

        if self.elapsed_s < self.profile.duration() {
            let s = self.profile.position(self.elapsed_s);
            self.plan.x = self.start.x + self.ux * s;
            self.plan.y = self.start.y + self.uy * s;
            true
        } else {
            self.plan = self.goal;
            false
        }
    }

    pub fn plan(&self) -> Pose {
        self.plan
    }

    /// Feedforward along the line's bearing.
    pub fn ff(&self) -> Acceleration {
        let a = self.profile.accel_at(self.elapsed_s);

        Acceleration {
            x: self.ux * a,
            y: self.uy * a,
            ..Default::default()
        }
    }

    pub fn goal(&self) -> Pose {
        self.goal
    }

    pub fn log_info(&self) {
        info!(
            "line: ({:.2}, {:.2}) -> ({:.2}, {:.2}), {:.1} s",
            self.start.x,
            self.start.y,
            self.goal.x,
            self.goal.y,
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
    fn test_travels_along_bearing() {
        let params = SegmentParams::default();
        let start = Pose::new(0.0, 0.0, -2.0, 0.3);
        let goal = Pose::new(3.0, 4.0, -2.0, 0.3);
        let mut seg = Line::new(start, goal, &params);

        while seg.advance(0.1) {
            let plan = seg.plan();

            // z and yaw are untouched
            assert_eq!(plan.z, start.z);
            assert_eq!(plan.yaw, start.yaw);

            // The plan stays on the line y = (4/3) x
            assert!((plan.y - plan.x * 4.0 / 3.0).abs() < 1e-9);
        }

        assert_eq!(seg.plan(), goal);
    }

    #[test]
    fn test_ff_points_along_line() {
        let params = SegmentParams::default();
        let start = Pose::new(0.0, 0.0, 0.0, 0.0);
        let goal = Pose::new(10.0, 0.0, 0.0, 0.0);
        let mut seg = Line::new(start, goal, &params);

        assert!(seg.advance(0.1));
        let ff = seg.ff();
        assert!((ff.x - params.xy_accel_mss).abs() < 1e-12);
        assert_eq!(ff.y, 0.0);
        assert_eq!(ff.z, 0.0);
    }
}
