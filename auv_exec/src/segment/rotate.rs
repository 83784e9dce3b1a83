//! # Rotate segment

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use super::{profile::Trapezoid, SegmentParams};
use crate::geom::{Acceleration, Pose};
use util::maths::norm_angle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Rotate in place to the goal yaw, taking the shortest angular path.
#[derive(Debug, Clone)]
pub struct Rotate {
    start: Pose,
    goal: Pose,
    plan: Pose,
    profile: Trapezoid,

    /// Sense of rotation, +1.0 counter-clockwise.
    dir: f64,

    elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Rotate {
    /// Build a rotate segment. `goal` must differ from `start` in yaw only.
    pub fn new(start: Pose, goal: Pose, params: &SegmentParams) -> Self {
        // Shortest signed path, wrapped into (-pi, pi]
        let delta = norm_angle(goal.yaw - start.yaw);

        Self {
            start,
            goal,
            plan: start,
            profile: Trapezoid::new(delta.abs(), params.yaw_cruise_rads, params.yaw_accel_radss),
            dir: if delta < 0.0 { -1.0 } else { 1.0 },
            elapsed_s: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed_s += dt;

        if self.elapsed_s < self.profile.duration() {
            self.plan.yaw =
                norm_angle(self.start.yaw + self.dir * self.profile.position(self.elapsed_s));
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
            yaw: self.dir * self.profile.accel_at(self.elapsed_s),
            ..Default::default()
        }
    }

    pub fn goal(&self) -> Pose {
        self.goal
    }

    pub fn log_info(&self) {
        info!(
            "rotate: yaw {:.2} -> {:.2}, {:.1} s",
            self.start.yaw,
            self.goal.yaw,
            self.profile.duration()
        );
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
