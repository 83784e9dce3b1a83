//! # Pause segment

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use crate::geom::{Acceleration, Pose};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Hold the start pose for a fixed duration.
///
/// Station-keeping uses a very large duration so the segment effectively
/// never completes.
#[derive(Debug, Clone)]
pub struct Pause {
    plan: Pose,
    duration_s: f64,
    elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pause {
    pub fn new(start: Pose, duration_s: f64) -> Self {
        Self {
            plan: start,
            duration_s,
            elapsed_s: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) -> bool {
        self.elapsed_s += dt;
        self.elapsed_s < self.duration_s
    }

    pub fn plan(&self) -> Pose {
        self.plan
    }

    pub fn ff(&self) -> Acceleration {
        Acceleration::default()
    }

    pub fn goal(&self) -> Pose {
        self.plan
    }

    pub fn log_info(&self) {
        info!(
            "pause: {:.0} s at ({:.2}, {:.2}, {:.2})",
            self.duration_s, self.plan.x, self.plan.y, self.plan.z
        );
    }
}
