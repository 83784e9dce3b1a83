//! # Trajectory planner
//!
//! The planner owns an ordered list of target poses and decomposes the
//! transition to each target into motion segments, paired one-to-one with
//! controllers. Each control tick [`Planner::advance`] moves the active
//! segment along, rolls over to the next segment or target as they
//! complete, and replans when the vehicle has drifted too far off the plan.
//!
//! Waypoints between the current pose and a target come from an external
//! route source; when it declines, the planner falls back to a direct
//! point-to-point trajectory.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod targets;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info, warn};

// Internal
pub use params::{AuvConfig, PlannerParams, SequenceKind};
pub use targets::targets_from_map;

use crate::ctrl::Controller;
use crate::geom::{Acceleration, Estimate, Pose, PoseStamped};
use crate::segment::{Line, Pause, Rotate, Segment, Vertical};
use comms_if::eqpt::WirePose;
use util::session;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Planar drift from the plan beyond which an immediate replan is forced.
///
/// Units: meters
pub const MAX_POSE_ERROR_M: f64 = 0.6;

/// Duration sentinel for indefinite station-keeping pauses.
///
/// Units: seconds
const KEEP_STATION_DURATION_S: f64 = 1e6;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// External source of intermediate waypoints between two poses.
///
/// Implemented by the map/obstacle-avoidance collaborator. Returning `None`
/// declines the request, and the planner goes point-to-point.
pub trait WaypointSource {
    fn get_waypoints(&self, start: &Pose, goal: &Pose) -> Option<Vec<Pose>>;
}

/// Route source that always declines, leaving every leg direct.
pub struct DirectRoute;

impl WaypointSource for DirectRoute {
    fn get_waypoints(&self, _start: &Pose, _goal: &Pose) -> Option<Vec<Pose>> {
        None
    }
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur when constructing a planner.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Attempted to create a planner with no targets")]
    NoTargets,
}

/// Result of one planner tick.
#[derive(Debug, Clone)]
pub enum AdvanceOutput {
    /// Mission continues: reference pose and commanded acceleration for
    /// this tick.
    Continue { plan: Pose, u_bar: Acceleration },

    /// All targets have been consumed.
    Success,

    /// The mission cannot proceed (no usable pose estimate at bootstrap).
    Failure,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The trajectory planner.
pub struct Planner {
    cfg: AuvConfig,

    /// Ordered targets. Immutable after construction apart from the cursor.
    targets: Vec<Pose>,
    target_idx: usize,

    /// Keep station indefinitely at the last target.
    keep_station: bool,

    /// Segments of the current trajectory, executed strictly in order.
    segments: Vec<Segment>,

    /// Controllers paired 1:1 with `segments`.
    controllers: Vec<Controller>,

    segment_idx: usize,

    route: Box<dyn WaypointSource>,

    /// Number of trajectories planned so far, for diagnostics naming.
    num_plans: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Planner {
    /// Create a planner over the given target sequence.
    pub fn new(
        cfg: AuvConfig,
        targets: Vec<Pose>,
        keep_station: bool,
        route: Box<dyn WaypointSource>,
    ) -> Result<Self, PlannerError> {
        if targets.is_empty() {
            return Err(PlannerError::NoTargets);
        }

        info!("planner created with {} target(s)", targets.len());

        Ok(Self {
            cfg,
            targets,
            target_idx: 0,
            keep_station,
            segments: vec![],
            controllers: vec![],
            segment_idx: 0,
            route,
            num_plans: 0,
        })
    }

    /// Advance the plan by `dt` seconds.
    ///
    /// `feedback` is invoked with `(targets_completed, targets_total)` each
    /// time a target is consumed and another remains; the final target ends
    /// the mission through [`AdvanceOutput::Success`] instead.
    pub fn advance(
        &mut self,
        dt: f64,
        estimate: &Estimate,
        feedback: &mut dyn FnMut(usize, usize),
    ) -> AdvanceOutput {
        let trust = self.cfg.ctrl.trust_covariance;
        let current = PoseStamped {
            t: estimate.t,
            pose: estimate.pose,
        };

        // Bootstrap: the very first tick needs a fully determined estimate
        if self.segments.is_empty() {
            if estimate.fully_determined(trust) {
                info!("bootstrap plan");
                self.plan_trajectory(&current);
            } else {
                error!("pose not fully determined, can't bootstrap");
                return AdvanceOutput::Failure;
            }
        }

        let plan: Pose;
        let ff: Acceleration;

        if self.segments[self.segment_idx].advance(dt) {
            // Advance the current motion segment
            plan = self.segments[self.segment_idx].plan();
            ff = self.segments[self.segment_idx].ff();
        } else if self.segment_idx + 1 < self.segments.len() {
            // The segment is done, move to the next segment
            self.segment_idx += 1;
            info!("segment {} of {}", self.segment_idx + 1, self.segments.len());
            self.segments[self.segment_idx].log_info();

            plan = self.segments[self.segment_idx].plan();
            ff = self.segments[self.segment_idx].ff();
        } else if self.target_idx + 1 < self.targets.len() {
            // Current trajectory complete, move to the next target
            self.target_idx += 1;
            info!("target {} of {}", self.target_idx + 1, self.targets.len());
            feedback(self.target_idx, self.targets.len());

            if estimate.fully_determined(trust) {
                // Start from a known location
                self.plan_trajectory(&current);
            } else {
                // Plan as if the vehicle is at the previous target. It
                // probably isn't, but a guessed trajectory beats none at
                // all until the estimate recovers.
                warn!("didn't find target, planning for next target anyway");
                let nominal = PoseStamped {
                    t: estimate.t,
                    pose: self.targets[self.target_idx - 1],
                };
                self.plan_trajectory(&nominal);
            }

            plan = self.segments[self.segment_idx].plan();
            ff = self.segments[self.segment_idx].ff();
        } else {
            return AdvanceOutput::Success;
        }

        // Compute the commanded acceleration
        let u_bar = self.controllers[self.segment_idx].calc(dt, &plan, estimate, &ff);

        // Open-loop drift recovery: replan to the same target if the
        // estimate has wandered too far from the plan
        if estimate.fully_determined(trust)
            && current.pose.distance_xy(&plan) > MAX_POSE_ERROR_M
        {
            warn!(
                "off by {:.2} m, replan to existing target",
                current.pose.distance_xy(&plan)
            );
            self.plan_trajectory(&current);
        }

        AdvanceOutput::Continue { plan, u_bar }
    }

    /// Number of targets in this planner.
    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    /// Number of trajectories planned so far.
    pub fn num_plans(&self) -> u32 {
        self.num_plans
    }

    /// Build a fresh trajectory from `start` to the current target,
    /// discarding all existing segments and controllers.
    fn plan_trajectory(&mut self, start: &PoseStamped) {
        let target = self.targets[self.target_idx];

        info!(
            "plan trajectory to ({:.2}, {:.2}, {:.2}) yaw {:.2}",
            target.x, target.y, target.z, target.yaw
        );

        // Waypoints reduce dead reckoning; fall back to a direct leg
        let waypoints = match self.route.get_waypoints(&start.pose, &target) {
            Some(w) => w,
            None => {
                warn!("no route available, going direct");
                vec![target]
            }
        };

        debug!("planning through {} waypoint(s)", waypoints.len());

        self.segments.clear();
        self.controllers.clear();
        self.segment_idx = 0;

        // Plan cursor, advanced axis group by axis group
        let mut plan = start.pose;

        // Travel to each waypoint, breaking down z, yaw and xy phases
        for waypoint in &waypoints {
            self.add_vertical_segment(&mut plan, waypoint.z);

            if plan.distance_xy(waypoint) > self.cfg.planner.epsilon_xyz_m {
                // Point in the direction of travel, then go
                let bearing = (waypoint.y - plan.y).atan2(waypoint.x - plan.x);
                self.add_rotate_segment(&mut plan, bearing);
                self.add_line_segment(&mut plan, waypoint.x, waypoint.y);
            } else {
                debug!("skip travel");
            }
        }

        // Always rotate to the target yaw
        self.add_rotate_segment(&mut plan, target.yaw);

        // Keep station at the last target
        if self.keep_station && self.target_idx == self.targets.len() - 1 {
            self.add_keep_station_segment(&mut plan, KEEP_STATION_DURATION_S);
        }

        // Degenerate case: start coincides with the target on every axis.
        // A zero-length pause completes on its first advance, so the
        // trajectory rolls straight over to the next target.
        if self.segments.is_empty() {
            debug!("already at target");
            self.segments.push(Segment::Pause(Pause::new(plan, 0.0)));
            self.controllers.push(Controller::new(&self.cfg.ctrl));
        }

        self.num_plans += 1;
        self.save_planned_path(start);

        info!("segment 1 of {}", self.segments.len());
        self.segments[0].log_info();
    }

    fn add_keep_station_segment(&mut self, plan: &mut Pose, seconds: f64) {
        self.segments.push(Segment::Pause(Pause::new(*plan, seconds)));
        self.controllers.push(Controller::new(&self.cfg.ctrl));
    }

    fn add_vertical_segment(&mut self, plan: &mut Pose, z: f64) {
        let mut goal = *plan;
        goal.z = z;

        if plan.distance_z(&goal) > self.cfg.planner.epsilon_xyz_m {
            self.segments
                .push(Segment::Vertical(Vertical::new(*plan, goal, &self.cfg.segment)));
            self.controllers.push(Controller::new(&self.cfg.ctrl));
        } else {
            info!("skip vertical");
        }

        *plan = goal;
    }

    fn add_rotate_segment(&mut self, plan: &mut Pose, yaw: f64) {
        let mut goal = *plan;
        goal.yaw = util::maths::norm_angle(yaw);

        if plan.distance_yaw(&goal) > self.cfg.planner.epsilon_yaw_rad {
            self.segments
                .push(Segment::Rotate(Rotate::new(*plan, goal, &self.cfg.segment)));
            self.controllers.push(Controller::new(&self.cfg.ctrl));
        } else {
            info!("skip rotate");
        }

        *plan = goal;
    }

    fn add_line_segment(&mut self, plan: &mut Pose, x: f64, y: f64) {
        let mut goal = *plan;
        goal.x = x;
        goal.y = y;

        if plan.distance_xy(&goal) > self.cfg.planner.epsilon_xyz_m {
            self.segments
                .push(Segment::Line(Line::new(*plan, goal, &self.cfg.segment)));
            self.controllers.push(Controller::new(&self.cfg.ctrl));
        } else {
            info!("skip line");
        }

        *plan = goal;
    }

    /// Save the planned path into the session directory for diagnostics.
    fn save_planned_path(&self, _start: &PoseStamped) {
        let mut path: Vec<WirePose> = self.segments.iter().map(|s| s.plan().to_wire()).collect();

        if let Some(last) = self.segments.last() {
            path.push(last.goal().to_wire());
        }

        session::save(
            format!("planner/trajectory_{:03}.json", self.num_plans),
            path,
        );
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::Timestamp;

    fn trusted_estimate(pose: Pose, t_s: f64) -> Estimate {
        Estimate {
            t: Timestamp::from_seconds(t_s),
            pose,
            covariance: [1.0; 4],
            stability: 1.0,
            ..Default::default()
        }
    }

    fn unknown_estimate(pose: Pose, t_s: f64) -> Estimate {
        Estimate {
            t: Timestamp::from_seconds(t_s),
            pose,
            covariance: [1e6; 4],
            stability: 1.0,
            ..Default::default()
        }
    }

    fn planner(targets: Vec<Pose>, keep_station: bool) -> Planner {
        Planner::new(AuvConfig::default(), targets, keep_station, Box::new(DirectRoute))
            .unwrap()
    }

    #[test]
    fn test_no_targets_is_an_error() {
        assert!(Planner::new(
            AuvConfig::default(),
            vec![],
            false,
            Box::new(DirectRoute)
        )
        .is_err());
    }

    #[test]
    fn test_bootstrap_requires_full_pose() {
        let mut p = planner(vec![Pose::new(5.0, 0.0, -1.0, 0.0)], false);

        let est = unknown_estimate(Pose::default(), 0.1);
        let mut feedback = |_: usize, _: usize| {};

        assert!(matches!(
            p.advance(0.1, &est, &mut feedback),
            AdvanceOutput::Failure
        ));
    }

    #[test]
    fn test_yaw_only_transition_is_a_single_rotate() {
        // Two targets sharing a position and differing only in yaw
        let t0 = Pose::new(1.0, 1.0, -2.0, 0.0);
        let t1 = Pose::new(1.0, 1.0, -2.0, 1.0);
        let mut p = planner(vec![t0, t1], false);

        // Plan the transition into the second target directly
        p.target_idx = 1;
        p.plan_trajectory(&PoseStamped {
            t: Timestamp(1),
            pose: t0,
        });

        assert_eq!(p.segments.len(), 1);
        assert_eq!(p.controllers.len(), 1);
        assert!(matches!(p.segments[0], Segment::Rotate(_)));
    }

    #[test]
    fn test_trajectory_breakdown() {
        // Dive, turn, travel, and face the target yaw
        let start = Pose::new(0.0, 0.0, 0.0, 0.0);
        let target = Pose::new(0.0, 5.0, -2.0, 0.0);
        let mut p = planner(vec![target], false);

        p.plan_trajectory(&PoseStamped {
            t: Timestamp(1),
            pose: start,
        });

        // Vertical, rotate-to-bearing (pi/2), line, rotate-to-target-yaw
        assert_eq!(p.segments.len(), 4);
        assert!(matches!(p.segments[0], Segment::Vertical(_)));
        assert!(matches!(p.segments[1], Segment::Rotate(_)));
        assert!(matches!(p.segments[2], Segment::Line(_)));
        assert!(matches!(p.segments[3], Segment::Rotate(_)));
        assert_eq!(p.segments.len(), p.controllers.len());
    }

    #[test]
    fn test_keep_station_appends_pause() {
        let start = Pose::new(0.0, 0.0, -0.5, 0.0);
        let target = Pose::new(0.0, 0.0, -2.0, 0.0);
        let mut p = planner(vec![target], true);

        p.plan_trajectory(&PoseStamped {
            t: Timestamp(1),
            pose: start,
        });

        assert!(matches!(p.segments.last(), Some(Segment::Pause(_))));
    }

    #[test]
    fn test_perfect_tracking_gives_feedforward_and_one_feedback() {
        // Two yaw-only targets, each one radian past the last, so every
        // trajectory is a single rotate whose reference we can reproduce
        // with the same profile maths and feed back as a zero-error
        // estimate.
        let start = Pose::new(0.0, 0.0, -1.0, 0.0);
        let t0 = Pose::new(0.0, 0.0, -1.0, 1.0);
        let t1 = Pose::new(0.0, 0.0, -1.0, 2.0);

        let cfg = AuvConfig::default();
        let profile = crate::segment::Trapezoid::new(
            1.0,
            cfg.segment.yaw_cruise_rads,
            cfg.segment.yaw_accel_radss,
        );

        let mut p = Planner::new(cfg, vec![t0, t1], false, Box::new(DirectRoute)).unwrap();

        let mut feedback_calls: Vec<(usize, usize)> = vec![];

        let dt = 0.1;
        let mut estimate = trusted_estimate(start, 0.0);

        // Yaw the current trajectory started from, and the tick it started
        // on, so the expected reference yaw can be computed ahead of the
        // planner
        let mut traj_start_yaw = 0.0;
        let mut traj_start_tick = 0u32;
        let mut on_first_target = true;

        let mut ticks = 0u32;
        loop {
            ticks += 1;
            assert!(ticks < 1000, "mission never completed");

            let elapsed = (ticks - traj_start_tick) as f64 * dt;
            estimate.t = Timestamp::from_seconds(ticks as f64 * dt);
            estimate.pose.yaw = util::maths::norm_angle(
                traj_start_yaw + profile.position(elapsed),
            );

            let mut fb = |completed: usize, total: usize| {
                feedback_calls.push((completed, total));
            };

            match p.advance(dt, &estimate, &mut fb) {
                AdvanceOutput::Continue { plan, u_bar } => {
                    // The harness reproduced the reference exactly
                    assert!((plan.yaw - estimate.pose.yaw).abs() < 1e-9);

                    // With a zero tracking error the PID contributes
                    // nothing, so the command equals the feedforward
                    let ff = p.segments[p.segment_idx].ff();
                    assert!((u_bar.x - ff.x).abs() < 1e-9);
                    assert!((u_bar.y - ff.y).abs() < 1e-9);
                    assert!((u_bar.z - ff.z).abs() < 1e-9);
                    assert!((u_bar.yaw - ff.yaw).abs() < 1e-9);

                    if on_first_target && p.target_idx == 1 {
                        // Rolled over to the second trajectory this tick
                        on_first_target = false;
                        traj_start_yaw = 1.0;
                        traj_start_tick = ticks;
                    }
                }
                AdvanceOutput::Success => break,
                AdvanceOutput::Failure => panic!("unexpected failure"),
            }
        }

        // Feedback fires once, after the first target only
        assert_eq!(feedback_calls, vec![(1, 2)]);
    }

    #[test]
    fn test_drift_triggers_exactly_one_replan() {
        let start = Pose::new(0.0, 0.0, -1.0, 0.0);
        let target = Pose::new(10.0, 0.0, -1.0, 0.0);
        let mut p = planner(vec![target], false);

        let mut feedback = |_: usize, _: usize| {};

        // Bootstrap and settle into the trajectory
        let mut estimate = trusted_estimate(start, 0.1);
        let out = p.advance(0.1, &estimate, &mut feedback);
        assert!(matches!(out, AdvanceOutput::Continue { .. }));
        assert_eq!(p.num_plans(), 1);

        // Track the plan for a few ticks: no replanning
        for i in 0..5 {
            estimate.t = Timestamp::from_seconds(0.2 + i as f64 * 0.1);
            if let AdvanceOutput::Continue { plan, .. } =
                p.advance(0.1, &estimate, &mut feedback)
            {
                estimate.pose = plan;
            }
        }
        assert_eq!(p.num_plans(), 1);

        // Jump sideways by more than the drift threshold
        estimate.pose.y += 2.0;
        estimate.t = Timestamp::from_seconds(1.0);
        p.advance(0.1, &estimate, &mut feedback);
        assert_eq!(p.num_plans(), 2);

        // The replan starts from the drifted pose, so the error is back
        // under the threshold and no further replan fires
        estimate.t = Timestamp::from_seconds(1.1);
        if let AdvanceOutput::Continue { plan, .. } = p.advance(0.1, &estimate, &mut feedback) {
            estimate.pose = plan;
        }
        assert_eq!(p.num_plans(), 2);
    }

    #[test]
    fn test_replan_rebuilds_from_current_pose() {
        let start = Pose::new(0.0, 0.0, 0.0, 0.0);
        let target = Pose::new(10.0, 5.0, -2.0, 1.0);
        let mut p = planner(vec![target], false);

        let mut feedback = |_: usize, _: usize| {};
        let estimate = trusted_estimate(start, 0.1);
        p.advance(0.1, &estimate, &mut feedback);

        // Vertical, rotate, line, rotate from the start pose
        assert_eq!(p.segments.len(), 4);
        assert_eq!(p.segments.len(), p.controllers.len());

        // Drift far off the plan: the rebuilt trajectory starts at index 0
        // from the new pose, with no leaked segments
        let drifted = trusted_estimate(Pose::new(0.0, 5.0, -2.0, 0.0), 0.2);
        p.advance(0.1, &drifted, &mut feedback);

        assert_eq!(p.segment_idx, 0);
        assert_eq!(p.segments.len(), p.controllers.len());

        // The drifted pose is already at depth, so the rebuilt trajectory
        // has no vertical leg
        assert!(p.segments.iter().all(|s| !matches!(s, Segment::Vertical(_))));
    }

    #[test]
    fn test_degraded_replan_uses_previous_target() {
        // Two separated targets; lose the estimate at the transition
        let start = Pose::new(0.0, 0.0, -1.0, 0.0);
        let t0 = Pose::new(0.0, 0.0, -1.0, 1.0);
        let t1 = Pose::new(3.0, 0.0, -1.0, 0.0);
        let mut p = planner(vec![t0, t1], false);

        let mut feedback = |_: usize, _: usize| {};

        let dt = 0.1;
        let mut estimate = trusted_estimate(start, 0.0);
        let mut ticks = 0;

        // Run the first (yaw-only) trajectory to completion with the
        // estimate blind after bootstrap
        loop {
            ticks += 1;
            assert!(ticks < 1000);
            estimate.t = Timestamp::from_seconds(ticks as f64 * dt);

            let out = p.advance(dt, &estimate, &mut feedback);

            if ticks == 1 {
                // After bootstrap, drop to a degenerate covariance
                estimate = unknown_estimate(estimate.pose, ticks as f64 * dt);
            }

            match out {
                AdvanceOutput::Continue { .. } => {
                    if p.target_idx == 1 {
                        break;
                    }
                }
                _ => panic!("mission ended early"),
            }
        }

        // The second trajectory was planned from t0's nominal pose: its
        // first moving segment starts there, not at the estimate
        let first_plan = p.segments[0].plan();
        assert!(first_plan.distance_xy(&t0) < 1e-9);
    }
}
