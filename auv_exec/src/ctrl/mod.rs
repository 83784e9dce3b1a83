//! # Controller cascade
//!
//! A [`Controller`] turns (plan pose, pose estimate, feedforward) into a
//! world-frame commanded acceleration, once per tick. Five feedback laws
//! are available, selected from configuration; see [`ControlPolicy`].
//!
//! Each controller instance is paired 1:1 with a motion segment and both
//! are discarded together on replan, so PID state never leaks across
//! segments and is never reset mid-segment.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod pid;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::{ControlPolicy, CtrlParams};
pub use pid::{Pid, PidGains};

use crate::geom::{Acceleration, Estimate, Pose};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One instance of the configured feedback law, with its per-axis PID
/// state.
#[derive(Debug, Clone)]
pub struct Controller {
    params: CtrlParams,

    x: Pid,
    y: Pid,
    z: Pid,
    yaw: Pid,

    /// Previous commanded acceleration, for the jerk-limited policies.
    prev_u_bar: Acceleration,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Controller {
    pub fn new(params: &CtrlParams) -> Self {
        Self {
            x: Pid::new(params.x, false),
            y: Pid::new(params.y, false),
            z: Pid::new(params.z, false),
            yaw: Pid::new(params.yaw, true),
            prev_u_bar: Acceleration::default(),
            params: params.clone(),
        }
    }

    /// Compute the commanded world-frame acceleration for this tick.
    pub fn calc(
        &mut self,
        dt: f64,
        plan: &Pose,
        estimate: &Estimate,
        ff: &Acceleration,
    ) -> Acceleration {
        self.x.set_target(plan.x);
        self.y.set_target(plan.y);
        self.z.set_target(plan.z);
        self.yaw.set_target(plan.yaw);

        match self.params.policy {
            ControlPolicy::Simple => self.calc_simple(dt, estimate, ff),
            ControlPolicy::Deadzone => self.calc_deadzone(dt, plan, estimate, ff),
            ControlPolicy::Jerk => self.calc_jerk(dt, estimate, ff),
            ControlPolicy::Best => self.calc_best(dt, plan, estimate, ff),
            ControlPolicy::Depth => self.calc_depth(dt, estimate, ff),
        }
    }

    /// PID on every axis whose estimate is trusted, feedforward alone on
    /// the rest. Required for dead reckoning through unobserved stretches.
    fn calc_simple(&mut self, dt: f64, estimate: &Estimate, ff: &Acceleration) -> Acceleration {
        let mut u_bar = *ff;
        let trust = self.params.trust_covariance;

        if estimate.covariance[0] < trust {
            u_bar.x = self.x.calc(estimate.pose.x, dt) + ff.x;
        }
        if estimate.covariance[1] < trust {
            u_bar.y = self.y.calc(estimate.pose.y, dt) + ff.y;
        }
        if estimate.covariance[2] < trust {
            u_bar.z = self.z.calc(estimate.pose.z, dt) + ff.z;
        }
        if estimate.covariance[3] < trust {
            u_bar.yaw = self.yaw.calc(estimate.pose.yaw, dt) + ff.yaw;
        }

        u_bar
    }

    /// PID only once the tracking error leaves the per-group deadzone.
    fn calc_deadzone(
        &mut self,
        dt: f64,
        plan: &Pose,
        estimate: &Estimate,
        ff: &Acceleration,
    ) -> Acceleration {
        let mut u_bar = *ff;

        if plan.distance_xy(&estimate.pose) > self.params.epsilon_xy_m {
            u_bar.x = self.x.calc(estimate.pose.x, dt) + ff.x;
            u_bar.y = self.y.calc(estimate.pose.y, dt) + ff.y;
        }

        if plan.distance_z(&estimate.pose) > self.params.epsilon_z_m {
            u_bar.z = self.z.calc(estimate.pose.z, dt) + ff.z;
        }

        if plan.distance_yaw(&estimate.pose) > self.params.epsilon_yaw_rad {
            u_bar.yaw = self.yaw.calc(estimate.pose.yaw, dt) + ff.yaw;
        }

        u_bar
    }

    /// PID without feedforward, jerk limited against the previous tick,
    /// feedforward added back outside the limit.
    fn calc_jerk(&mut self, dt: f64, estimate: &Estimate, ff: &Acceleration) -> Acceleration {
        let mut u_bar = Acceleration {
            x: self.x.calc(estimate.pose.x, dt),
            y: self.y.calc(estimate.pose.y, dt),
            z: self.z.calc(estimate.pose.z, dt),
            yaw: self.yaw.calc(estimate.pose.yaw, dt),
        };

        self.limit_jerk(&mut u_bar, dt);
        u_bar.add(ff);
        u_bar
    }

    /// Deadzone gating (zero inside, not feedforward) plus jerk limiting.
    fn calc_best(
        &mut self,
        dt: f64,
        plan: &Pose,
        estimate: &Estimate,
        ff: &Acceleration,
    ) -> Acceleration {
        let mut u_bar = Acceleration::default();

        if plan.distance_xy(&estimate.pose) > self.params.epsilon_xy_m {
            u_bar.x = self.x.calc(estimate.pose.x, dt);
            u_bar.y = self.y.calc(estimate.pose.y, dt);
        }

        if plan.distance_z(&estimate.pose) > self.params.epsilon_z_m {
            u_bar.z = self.z.calc(estimate.pose.z, dt);
        }

        if plan.distance_yaw(&estimate.pose) > self.params.epsilon_yaw_rad {
            u_bar.yaw = self.yaw.calc(estimate.pose.yaw, dt);
        }

        self.limit_jerk(&mut u_bar, dt);
        u_bar.add(ff);
        u_bar
    }

    /// Depth hold only: x, y and yaw pass straight through from the
    /// feedforward.
    fn calc_depth(&mut self, dt: f64, estimate: &Estimate, ff: &Acceleration) -> Acceleration {
        let mut u_bar = *ff;
        u_bar.z = self.z.calc(estimate.pose.z, dt) + ff.z;
        u_bar
    }

    /// Bound the change from the previous commanded acceleration and
    /// remember the result for the next tick.
    fn limit_jerk(&mut self, u_bar: &mut Acceleration, dt: f64) {
        u_bar.x = limit(self.prev_u_bar.x, u_bar.x, dt, self.params.jerk_xy_msss);
        u_bar.y = limit(self.prev_u_bar.y, u_bar.y, dt, self.params.jerk_xy_msss);
        u_bar.z = limit(self.prev_u_bar.z, u_bar.z, dt, self.params.jerk_z_msss);
        u_bar.yaw = limit(self.prev_u_bar.yaw, u_bar.yaw, dt, self.params.jerk_yaw_radsss);

        self.prev_u_bar = *u_bar;
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Move from `previous` towards `next` by at most `dt * rate`.
fn limit(previous: f64, next: f64, dt: f64, rate: f64) -> f64 {
    let diff = (next - previous).abs().min(dt * rate);

    if next < previous {
        previous - diff
    } else {
        previous + diff
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
