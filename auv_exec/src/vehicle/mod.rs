//! # Vehicle mode state machine and control loop
//!
//! [`Vehicle`] owns the operating mode, the latest-value caches for every
//! input stream, the in-flight mission, and the control outbox. It is
//! driven two ways:
//!
//! - asynchronously, by the `on_*` callbacks, which only gate and cache
//!   incoming data (plus operator button edges);
//! - synchronously, by [`Vehicle::advance_tick`] at the fixed control rate,
//!   which evaluates the safety interlocks and runs the active control law.
//!
//! [`Vehicle::set_mode`] is the single mutation point for the mode and must
//! only be called from the control-tick execution context (the callbacks
//! run there too; no two entry points ever run concurrently). If this core
//! is ever hosted multi-threaded, wrap the whole `Vehicle` in one mutually
//! exclusive region rather than locking fields individually.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod mode;
mod params;
mod thrusters;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{error, info, trace, warn};

// Internal
pub use mode::Mode;
pub use params::{ThrusterConfig, VehicleParams};

use self::mode::{is_auv_mode, is_disarmed_mode, is_hold_pressure_mode, is_rov_mode};
use crate::ctrl::Pid;
use crate::geom::{Efforts, Estimate, Pose};
use crate::mission::Mission;
use crate::planner::{
    targets_from_map, AdvanceOutput, AuvConfig, DirectRoute, Planner, PlannerError,
};
use comms_if::eqpt::driver::{BaroMsg, BatteryMsg, ControlMsg, LeakMsg};
use comms_if::eqpt::estimate::EstimateMsg;
use comms_if::eqpt::joy::JoyMsg;
use comms_if::eqpt::map::MapMsg;
use comms_if::mission::{GoalHandle, GoalResponse, MissionGoal, MissionOutcome};
use comms_if::Timestamp;
use util::maths::norm_angle;
use util::monotonic::{MonotonicGate, ValidGate};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur while operating the vehicle.
#[derive(Debug, thiserror::Error)]
pub enum VehicleError {
    #[error("No pose estimate available")]
    NoEstimate,

    #[error("No marker map available")]
    NoMap,

    #[error("Planner error: {0}")]
    PlannerError(#[from] PlannerError),
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The vehicle control core.
pub struct Vehicle {
    params: VehicleParams,
    auv_cfg: AuvConfig,

    /// Operating mode. Mutated only through [`Vehicle::set_mode`].
    mode: Mode,

    // Latest-value input caches, each behind its timestamp gate
    pressure_pa: f64,
    baro_gate: MonotonicGate,

    joy: JoyMsg,
    joy_gate: MonotonicGate,

    estimate: Option<Estimate>,
    odom_gate: MonotonicGate,

    map: Option<MapMsg>,
    map_gate: ValidGate,

    /// Leak detection is latched and never auto-clears.
    leak_latched: bool,

    /// Low battery clears only on a healthy battery report.
    battery_low: bool,

    // ROV operation
    pressure_hold_pid: Option<Pid>,

    // AUV operation
    mission: Option<Mission>,

    // Outputs
    tilt_deg: i32,
    brightness_pct: i32,
    outbox: Vec<ControlMsg>,

    prev_tick: Timestamp,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Vehicle {
    pub fn new(params: VehicleParams, auv_cfg: AuvConfig) -> Self {
        Self {
            params,
            auv_cfg,
            mode: Mode::Disarmed,
            pressure_pa: 0.0,
            baro_gate: MonotonicGate::default(),
            joy: JoyMsg::default(),
            joy_gate: MonotonicGate::default(),
            estimate: None,
            odom_gate: MonotonicGate::default(),
            map: None,
            map_gate: ValidGate::default(),
            leak_latched: false,
            battery_low: false,
            pressure_hold_pid: None,
            mission: None,
            tilt_deg: 0,
            brightness_pct: 0,
            outbox: vec![],
            prev_tick: Timestamp::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tilt_deg(&self) -> i32 {
        self.tilt_deg
    }

    pub fn brightness_pct(&self) -> i32 {
        self.brightness_pct
    }

    /// Drain the control messages produced since the last call.
    pub fn take_outbox(&mut self) -> Vec<ControlMsg> {
        std::mem::take(&mut self.outbox)
    }

    // ---- INPUT CALLBACKS ----

    /// Barometer stream, strictly monotonic.
    pub fn on_barometer(&mut self, msg: &BaroMsg) {
        if self.baro_gate.accept(msg.t).is_some() {
            self.pressure_pa = msg.pressure_pa;
        }
    }

    /// Joystick stream, strictly monotonic. Button edges are handled here;
    /// axes are read by the tick.
    pub fn on_joystick(&mut self, msg: &JoyMsg) {
        if let Some(first) = self.joy_gate.accept(msg.t) {
            // No previous buttons on the first message, so no edges
            if !first {
                self.handle_buttons(msg);
            }
            self.joy = *msg;
        }
    }

    /// Pose estimate stream, strictly monotonic.
    pub fn on_pose(&mut self, msg: &EstimateMsg) {
        if self.odom_gate.accept(msg.t).is_some() {
            self.estimate = Some(Estimate::from_msg(msg));
        }
    }

    /// Battery reports from the driver. A low report disarms and latches
    /// until a healthy one arrives.
    pub fn on_battery(&mut self, msg: &BatteryMsg) {
        if msg.low {
            if !self.battery_low {
                error!("battery low ({:.1} V)", msg.voltage_v);
            }
            self.battery_low = true;

            if !is_disarmed_mode(self.mode) {
                self.set_mode(msg.t, Mode::Disarmed, None, None);
            }
        } else {
            self.battery_low = false;
        }
    }

    /// Leak reports from the driver. Latched, never auto-clears.
    pub fn on_leak(&mut self, msg: &LeakMsg) {
        if msg.leak && !self.leak_latched {
            error!("leak detected");
            self.leak_latched = true;

            if !is_disarmed_mode(self.mode) {
                self.set_mode(msg.t, Mode::Disarmed, None, None);
            }
        }
    }

    /// Marker map stream, latest-wins.
    pub fn on_map(&mut self, msg: &MapMsg) {
        if self.map_gate.accept(msg.t) {
            self.map = Some(msg.clone());
        }
    }

    /// A mission goal request from the goal source. On acceptance the
    /// handle is owned by the mission until it terminates; on rejection
    /// the handle is released immediately.
    pub fn on_goal_request(
        &mut self,
        now: Timestamp,
        goal: &MissionGoal,
        handle: GoalHandle,
    ) -> GoalResponse {
        let mode = if goal.random {
            Mode::AuvRandom
        } else if goal.target.is_some() {
            Mode::AuvKeepOrigin
        } else {
            Mode::AuvKeepStation
        };

        self.set_mode(now, mode, Some(goal), Some(handle));

        if self.mode == mode {
            GoalResponse::Accept
        } else {
            GoalResponse::Reject
        }
    }

    /// A cancel request for the in-flight mission. Observed by the next
    /// control tick.
    pub fn on_cancel_request(&mut self) -> GoalResponse {
        match self.mission.as_ref() {
            Some(mission) => {
                mission.request_cancel();
                GoalResponse::Accept
            }
            None => GoalResponse::Reject,
        }
    }

    // ---- MODE MANAGEMENT ----

    /// Change the operating mode.
    ///
    /// This is the only place the mode is mutated. Any in-flight mission is
    /// torn down first and its goal handle completed; dropping out of a
    /// powered mode always publishes an all-stop.
    pub fn set_mode(
        &mut self,
        now: Timestamp,
        new_mode: Mode,
        goal: Option<&MissionGoal>,
        handle: Option<GoalHandle>,
    ) {
        let old = self.mode;

        // Tear down any in-flight mission
        if let Some(mission) = self.mission.take() {
            let outcome = if mission.cancel_requested() {
                MissionOutcome::Canceled
            } else {
                MissionOutcome::Aborted
            };
            mission.complete(outcome);
        }
        self.pressure_hold_pid = None;

        let mode = self.enter_mode(new_mode, goal, handle);
        self.mode = mode;

        if mode != old {
            info!("mode {:?} -> {:?}", old, mode);
        }

        // All-stop on leaving the AUV modes, and on any disarm
        if (is_auv_mode(old) && !is_auv_mode(mode))
            || (mode == Mode::Disarmed && old != Mode::Disarmed)
        {
            self.all_stop(now);
        }
    }

    /// Attempt to enter a mode, returning the mode actually entered
    /// (`Disarmed` when the requested one is not available).
    fn enter_mode(
        &mut self,
        new_mode: Mode,
        goal: Option<&MissionGoal>,
        handle: Option<GoalHandle>,
    ) -> Mode {
        if is_disarmed_mode(new_mode) {
            if let Some(h) = handle {
                h.complete(MissionOutcome::Aborted);
            }
            return Mode::Disarmed;
        }

        if !self.can_arm() {
            warn!(
                "cannot arm: leak {}, battery low {}, stability {:.2}",
                self.leak_latched,
                self.battery_low,
                self.estimate.map(|e| e.stability).unwrap_or(1.0)
            );
            if let Some(h) = handle {
                h.complete(MissionOutcome::Aborted);
            }
            return Mode::Disarmed;
        }

        match new_mode {
            Mode::Rov => Mode::Rov,

            Mode::RovHoldPressure => {
                if !self.baro_gate.receiving() {
                    warn!("no barometer reading, cannot hold pressure");
                    return Mode::Disarmed;
                }

                // Capture the current pressure as the setpoint
                let mut pid = Pid::new(self.params.hold_pressure, false);
                pid.set_target(self.pressure_pa);
                self.pressure_hold_pid = Some(pid);

                info!("holding pressure at {:.0} Pa", self.pressure_pa);
                Mode::RovHoldPressure
            }

            auv_mode => match self.build_planner(auv_mode, goal) {
                Ok(planner) => {
                    self.mission = Some(Mission::new(planner, handle));
                    auv_mode
                }
                Err(e) => {
                    warn!("cannot start mission: {}", e);
                    if let Some(h) = handle {
                        h.complete(MissionOutcome::Aborted);
                    }
                    Mode::Disarmed
                }
            },
        }
    }

    /// Build the planner for an AUV mode.
    fn build_planner(
        &self,
        auv_mode: Mode,
        goal: Option<&MissionGoal>,
    ) -> Result<Planner, VehicleError> {
        let cfg = self.auv_cfg.clone();

        let (targets, keep_station) = match auv_mode {
            Mode::AuvKeepStation => {
                // Hold the pose we have right now
                let estimate = self.estimate.ok_or(VehicleError::NoEstimate)?;
                (vec![estimate.pose], true)
            }

            Mode::AuvKeepOrigin => {
                let target = goal
                    .and_then(|g| g.target.as_ref())
                    .map(Pose::from_wire)
                    .unwrap_or_else(|| Pose::new(0.0, 0.0, cfg.planner.z_target_m, 0.0));
                (vec![target], true)
            }

            _ => {
                // Visit the map targets in a shuffled order
                let map = self.map.as_ref().ok_or(VehicleError::NoMap)?;
                let targets = targets_from_map(map, &cfg.planner, true);
                (targets, cfg.planner.keep_station)
            }
        };

        Ok(Planner::new(
            cfg,
            targets,
            keep_station,
            Box::new(DirectRoute),
        )?)
    }

    /// True if the vehicle may leave Disarmed.
    fn can_arm(&self) -> bool {
        if self.leak_latched || self.battery_low {
            return false;
        }

        // With no estimate yet, ROV arming is still allowed
        match self.estimate {
            Some(estimate) => estimate.stability >= self.params.min_arm_stability,
            None => true,
        }
    }

    // ---- CONTROL TICK ----

    /// Run one control cycle at time `now`.
    ///
    /// Evaluates the safety interlocks, then dispatches to the control law
    /// of the current mode. Control messages appear in the outbox.
    pub fn advance_tick(&mut self, now: Timestamp) {
        let dt = if self.prev_tick.is_valid() {
            now.seconds_since(self.prev_tick)
        } else {
            self.params.cycle_period_s
        };
        self.prev_tick = now;

        // Safety interlocks, each independently forcing Disarmed
        if !is_disarmed_mode(self.mode) {
            if self.leak_latched {
                error!("leak latched, disarming");
                self.set_mode(now, Mode::Disarmed, None, None);
            } else if self.battery_low {
                error!("battery low, disarming");
                self.set_mode(now, Mode::Disarmed, None, None);
            } else if is_rov_mode(self.mode) && !self.joy_ok(now) {
                error!("joystick stale, disarming");
                self.set_mode(now, Mode::Disarmed, None, None);
            } else if (is_auv_mode(self.mode) || is_hold_pressure_mode(self.mode))
                && !self.odom_ok(now)
            {
                error!("pose estimate stale, disarming");
                self.set_mode(now, Mode::Disarmed, None, None);
            } else if is_hold_pressure_mode(self.mode) && !self.baro_ok(now) {
                error!("barometer stale, disarming");
                self.set_mode(now, Mode::Disarmed, None, None);
            }
        }

        match self.mode {
            Mode::Disarmed => (),
            Mode::Rov | Mode::RovHoldPressure => self.rov_advance(now, dt),
            _ => self.auv_advance(now, dt),
        }
    }

    /// Teleoperated control: efforts straight from the joystick axes, with
    /// the vertical axis overridden by the pressure loop when holding.
    fn rov_advance(&mut self, now: Timestamp, dt: f64) {
        let joy = self.joy;
        let mut efforts = Efforts::default();

        efforts.set_forward(joy.forward * self.params.rov_gain_xy);
        efforts.set_strafe(joy.strafe * self.params.rov_gain_xy);
        efforts.set_yaw(joy.yaw * self.params.rov_gain_yaw);

        if let Some(pid) = self.pressure_hold_pid.as_mut() {
            efforts.set_vertical(pid.calc(self.pressure_pa, dt));
        } else {
            efforts.set_vertical(joy.vertical * self.params.rov_gain_vertical);
        }

        self.publish_control(now, &Pose::default(), &efforts);
    }

    /// Autonomous control: advance the mission and convert its commanded
    /// acceleration into efforts.
    fn auv_advance(&mut self, now: Timestamp, dt: f64) {
        // Cancellation is observed once per tick
        if self
            .mission
            .as_ref()
            .map_or(false, |m| m.cancel_requested())
        {
            info!("mission cancel observed");
            if let Some(mission) = self.mission.take() {
                mission.complete(MissionOutcome::Canceled);
            }
            let after = self.params.mode_after_mission;
            self.set_mode(now, after, None, None);
            return;
        }

        let estimate = match self.estimate {
            Some(e) => e,
            None => {
                error!("no pose estimate in an AUV mode, disarming");
                self.set_mode(now, Mode::Disarmed, None, None);
                return;
            }
        };

        let output = match self.mission.as_mut() {
            Some(mission) => mission.advance(dt, &estimate),
            None => {
                error!("no mission in an AUV mode, disarming");
                self.set_mode(now, Mode::Disarmed, None, None);
                return;
            }
        };

        match output {
            AdvanceOutput::Continue { plan, u_bar } => {
                let efforts =
                    Efforts::from_acceleration(&self.params.dynamics, &u_bar, estimate.pose.yaw);

                let error = Pose {
                    x: plan.x - estimate.pose.x,
                    y: plan.y - estimate.pose.y,
                    z: plan.z - estimate.pose.z,
                    yaw: norm_angle(plan.yaw - estimate.pose.yaw),
                };

                self.publish_control(now, &error, &efforts);
            }

            AdvanceOutput::Success => {
                info!("mission complete");
                if let Some(mission) = self.mission.take() {
                    mission.complete(MissionOutcome::Succeeded);
                }
                let after = self.params.mode_after_mission;
                self.set_mode(now, after, None, None);
            }

            AdvanceOutput::Failure => {
                error!("mission failed");
                if let Some(mission) = self.mission.take() {
                    mission.complete(MissionOutcome::Aborted);
                }
                self.set_mode(now, Mode::Disarmed, None, None);
            }
        }
    }

    // ---- OUTPUT ----

    /// Publish an all-zero effort command. Safe to call in any mode.
    fn all_stop(&mut self, now: Timestamp) {
        let mut efforts = Efforts::default();
        efforts.all_stop();
        self.publish_control(now, &Pose::default(), &efforts);
    }

    fn publish_control(&mut self, now: Timestamp, error: &Pose, efforts: &Efforts) {
        let msg = ControlMsg {
            t: now,
            mode: self.mode,
            efforts: efforts.to_array(),
            thrusters: thrusters::mix(&self.params.thrusters, efforts),
            error: [error.x, error.y, error.z, error.yaw],
            tilt: self.tilt_deg,
            brightness: self.brightness_pct,
        };

        trace!("control: {:?}", msg);
        self.outbox.push(msg);
    }

    // ---- INPUT FRESHNESS ----

    fn joy_ok(&self, t: Timestamp) -> bool {
        self.joy_gate.receiving()
            && t.seconds_since(self.joy_gate.prev()) < self.params.joy_timeout_s
    }

    fn odom_ok(&self, t: Timestamp) -> bool {
        self.odom_gate.receiving()
            && t.seconds_since(self.odom_gate.prev()) < self.params.odom_timeout_s
    }

    fn baro_ok(&self, t: Timestamp) -> bool {
        self.baro_gate.receiving()
            && t.seconds_since(self.baro_gate.prev()) < self.params.baro_timeout_s
    }

    // ---- OPERATOR BUTTONS ----

    /// Act on joystick button rising edges.
    fn handle_buttons(&mut self, msg: &JoyMsg) {
        let now = msg.t;
        let prev = self.joy.buttons;
        let b = msg.buttons;
        let pressed = |current: bool, previous: bool| current && !previous;

        if pressed(b.disarm, prev.disarm) {
            info!("operator disarm");
            self.set_mode(now, Mode::Disarmed, None, None);
        } else if pressed(b.arm, prev.arm) {
            info!("operator arm");
            self.set_mode(now, Mode::Rov, None, None);
        } else if pressed(b.rov, prev.rov) {
            self.set_mode(now, Mode::Rov, None, None);
        } else if pressed(b.rov_hold_pressure, prev.rov_hold_pressure) {
            self.set_mode(now, Mode::RovHoldPressure, None, None);
        } else if pressed(b.auv_keep_station, prev.auv_keep_station) {
            self.set_mode(now, Mode::AuvKeepStation, None, None);
        } else if pressed(b.auv_keep_origin, prev.auv_keep_origin) {
            self.set_mode(now, Mode::AuvKeepOrigin, None, None);
        } else if pressed(b.auv_random, prev.auv_random) {
            self.set_mode(now, Mode::AuvRandom, None, None);
        }

        if pressed(b.tilt_up, prev.tilt_up) {
            self.tilt_deg =
                (self.tilt_deg + self.params.tilt_step_deg).min(self.params.tilt_limit_deg);
        }
        if pressed(b.tilt_down, prev.tilt_down) {
            self.tilt_deg =
                (self.tilt_deg - self.params.tilt_step_deg).max(-self.params.tilt_limit_deg);
        }
        if pressed(b.bright_up, prev.bright_up) {
            self.brightness_pct =
                (self.brightness_pct + self.params.brightness_step_pct).min(100);
        }
        if pressed(b.bright_down, prev.bright_down) {
            self.brightness_pct =
                (self.brightness_pct - self.params.brightness_step_pct).max(0);
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::estimate::TwistMsg;
    use comms_if::eqpt::map::Marker;
    use comms_if::mission::goal_channel;

    fn ts(seconds: f64) -> Timestamp {
        Timestamp::from_seconds(seconds)
    }

    fn vehicle() -> Vehicle {
        Vehicle::new(VehicleParams::default(), AuvConfig::default())
    }

    fn pose_msg(t_s: f64, pose: Pose) -> EstimateMsg {
        EstimateMsg {
            t: ts(t_s),
            pose: pose.to_wire(),
            twist: TwistMsg::default(),
            covariance: [1.0; 4],
            stability: 1.0,
        }
    }

    fn joy_msg(t_s: f64) -> JoyMsg {
        JoyMsg {
            t: ts(t_s),
            ..Default::default()
        }
    }

    fn baro_msg(t_s: f64, pressure_pa: f64) -> BaroMsg {
        BaroMsg {
            t: ts(t_s),
            pressure_pa,
        }
    }

    /// Arm the vehicle into ROV via the joystick arm button edge.
    fn arm_rov(v: &mut Vehicle, t0_s: f64) {
        v.on_joystick(&joy_msg(t0_s));

        let mut arm = joy_msg(t0_s + 0.1);
        arm.buttons.arm = true;
        v.on_joystick(&arm);
    }

    #[test]
    fn test_disarmed_emits_nothing() {
        let mut v = vehicle();

        for i in 1..=10 {
            let t = i as f64 * 0.1;
            v.on_pose(&pose_msg(t, Pose::default()));
            v.on_barometer(&baro_msg(t, 101_325.0));
            v.on_joystick(&joy_msg(t));

            v.advance_tick(ts(t));

            assert!(v.take_outbox().is_empty());
            assert_eq!(v.mode(), Mode::Disarmed);
        }
    }

    #[test]
    fn test_rov_efforts_follow_joystick() {
        let mut v = vehicle();
        arm_rov(&mut v, 0.1);
        assert_eq!(v.mode(), Mode::Rov);

        let mut drive = joy_msg(0.3);
        drive.forward = 0.5;
        drive.yaw = -1.0;
        v.on_joystick(&drive);

        v.advance_tick(ts(0.35));
        let out = v.take_outbox();
        assert_eq!(out.len(), 1);

        let msg = &out[0];
        assert_eq!(msg.mode, Mode::Rov);
        assert_eq!(msg.efforts[0], 0.5);
        // Yaw gain is 0.7
        assert!((msg.efforts[3] + 0.7).abs() < 1e-12);
        assert_eq!(msg.thrusters.len(), 6);
    }

    #[test]
    fn test_joystick_stale_disarms_rov() {
        let mut v = vehicle();
        arm_rov(&mut v, 0.1);
        v.advance_tick(ts(0.3));
        assert_eq!(v.take_outbox().len(), 1);

        // Last joystick message was at 0.2, so at 1.25 it is stale
        v.advance_tick(ts(1.25));
        let out = v.take_outbox();

        assert_eq!(v.mode(), Mode::Disarmed);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].efforts, [0.0; 4]);

        // And nothing more once disarmed
        v.advance_tick(ts(1.35));
        assert!(v.take_outbox().is_empty());
    }

    #[test]
    fn test_baro_stale_disarms_hold_pressure_with_one_all_stop() {
        let mut v = vehicle();

        v.on_barometer(&baro_msg(0.1, 2.0e5));
        v.on_joystick(&joy_msg(0.1));
        v.on_pose(&pose_msg(0.1, Pose::default()));

        v.set_mode(ts(0.15), Mode::RovHoldPressure, None, None);
        assert_eq!(v.mode(), Mode::RovHoldPressure);

        // Barometer stops after 0.1; joystick and pose stay fresh
        for k in 2..=10 {
            let t = k as f64 * 0.1;
            v.on_joystick(&joy_msg(t));
            v.on_pose(&pose_msg(t, Pose::default()));

            v.advance_tick(ts(t));

            let out = v.take_outbox();
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].mode, Mode::RovHoldPressure);
        }

        // First tick past the barometer timeout: one all-zero message
        v.on_joystick(&joy_msg(1.15));
        v.on_pose(&pose_msg(1.15, Pose::default()));
        v.advance_tick(ts(1.15));

        let out = v.take_outbox();
        assert_eq!(v.mode(), Mode::Disarmed);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].efforts, [0.0; 4]);

        // Then silence
        v.on_joystick(&joy_msg(1.25));
        v.on_pose(&pose_msg(1.25, Pose::default()));
        v.advance_tick(ts(1.25));
        assert!(v.take_outbox().is_empty());
    }

    #[test]
    fn test_leak_latches_and_blocks_arming() {
        let mut v = vehicle();
        arm_rov(&mut v, 0.1);
        assert_eq!(v.mode(), Mode::Rov);

        v.on_leak(&LeakMsg {
            t: ts(0.3),
            leak: true,
        });

        assert_eq!(v.mode(), Mode::Disarmed);
        let out = v.take_outbox();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].efforts, [0.0; 4]);

        // Arming again is refused while the leak is latched
        v.on_joystick(&joy_msg(0.4));
        let mut arm = joy_msg(0.5);
        arm.buttons.arm = true;
        v.on_joystick(&arm);

        assert_eq!(v.mode(), Mode::Disarmed);
    }

    #[test]
    fn test_mission_runs_to_success() {
        let mut cfg = AuvConfig::default();
        cfg.planner.z_target_m = 0.0;
        cfg.planner.keep_station = false;
        let mut v = Vehicle::new(VehicleParams::default(), cfg);

        let start = Pose::new(0.0, 0.0, 0.0, 0.0);
        v.on_pose(&pose_msg(0.1, start));

        // Two markers at the start position differing only in yaw, so each
        // trajectory is a single rotate
        v.on_map(&MapMsg {
            t: ts(0.1),
            markers: vec![
                Marker {
                    id: 0,
                    pose: Pose::new(0.0, 0.0, 0.0, 1.0).to_wire(),
                },
                Marker {
                    id: 1,
                    pose: Pose::new(0.0, 0.0, 0.0, 2.0).to_wire(),
                },
            ],
        });

        let (handle, monitor) = goal_channel(1);
        let goal = MissionGoal {
            target: None,
            random: true,
        };

        assert_eq!(
            v.on_goal_request(ts(0.15), &goal, handle),
            GoalResponse::Accept
        );
        assert_eq!(v.mode(), Mode::AuvRandom);

        let mut ticks = 0;
        while is_auv_mode(v.mode()) {
            ticks += 1;
            assert!(ticks < 500, "mission never completed");

            let t = 0.1 + ticks as f64 * 0.1;
            v.on_pose(&pose_msg(t, start));
            v.advance_tick(ts(t));
            v.take_outbox();
        }

        assert_eq!(v.mode(), Mode::Disarmed);
        assert_eq!(monitor.try_outcome(), Some(MissionOutcome::Succeeded));

        // One feedback per target transition; the second target ends the
        // mission through Success instead
        assert_eq!(monitor.take_feedback().len(), 1);
    }

    #[test]
    fn test_cancel_ends_mission_as_canceled() {
        let mut v = vehicle();
        v.on_pose(&pose_msg(0.1, Pose::new(1.0, 2.0, -1.5, 0.3)));

        let (handle, monitor) = goal_channel(2);
        let goal = MissionGoal::default(); // keep station at the current pose

        assert_eq!(
            v.on_goal_request(ts(0.15), &goal, handle),
            GoalResponse::Accept
        );
        assert_eq!(v.mode(), Mode::AuvKeepStation);

        // Station keeping runs indefinitely
        for k in 2..=5 {
            let t = k as f64 * 0.1;
            v.on_pose(&pose_msg(t, Pose::new(1.0, 2.0, -1.5, 0.3)));
            v.advance_tick(ts(t));
            assert_eq!(v.take_outbox().len(), 1);
        }

        monitor.cancel();
        assert_eq!(v.on_cancel_request(), GoalResponse::Accept);

        v.on_pose(&pose_msg(0.6, Pose::new(1.0, 2.0, -1.5, 0.3)));
        v.advance_tick(ts(0.6));

        assert_eq!(v.mode(), Mode::Disarmed);
        assert_eq!(monitor.try_outcome(), Some(MissionOutcome::Canceled));

        // The teardown published exactly one all-stop
        let out = v.take_outbox();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].efforts, [0.0; 4]);
    }

    #[test]
    fn test_estimate_stale_aborts_mission() {
        let mut v = vehicle();
        v.on_pose(&pose_msg(0.1, Pose::default()));

        let (handle, monitor) = goal_channel(3);
        assert_eq!(
            v.on_goal_request(ts(0.15), &MissionGoal::default(), handle),
            GoalResponse::Accept
        );

        // Run on the cached estimate while it is still fresh
        for k in 2..=10 {
            let t = k as f64 * 0.1;
            v.advance_tick(ts(t));
            assert_eq!(v.take_outbox().len(), 1);
        }

        // Past the odometry timeout the mission is torn down
        v.advance_tick(ts(1.15));
        let out = v.take_outbox();

        assert_eq!(v.mode(), Mode::Disarmed);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].efforts, [0.0; 4]);
        assert_eq!(monitor.try_outcome(), Some(MissionOutcome::Aborted));
    }

    #[test]
    fn test_goal_rejected_without_map() {
        let mut v = vehicle();
        v.on_pose(&pose_msg(0.1, Pose::default()));

        let (handle, monitor) = goal_channel(4);
        let goal = MissionGoal {
            target: None,
            random: true,
        };

        assert_eq!(
            v.on_goal_request(ts(0.15), &goal, handle),
            GoalResponse::Reject
        );
        assert_eq!(v.mode(), Mode::Disarmed);
        assert_eq!(monitor.try_outcome(), Some(MissionOutcome::Aborted));
    }

    #[test]
    fn test_tilt_and_brightness_buttons_clamp() {
        let mut v = vehicle();
        v.on_joystick(&joy_msg(0.05));

        // 20 press/release cycles on tilt up and brightness up
        for i in 0..20 {
            let t = 0.1 + i as f64 * 0.2;

            let mut press = joy_msg(t);
            press.buttons.tilt_up = true;
            press.buttons.bright_up = true;
            v.on_joystick(&press);

            v.on_joystick(&joy_msg(t + 0.1));
        }

        // Steps of 5 and 10, clamped to 45 and 100
        assert_eq!(v.tilt_deg(), 45);
        assert_eq!(v.brightness_pct(), 100);

        let mut down = joy_msg(10.0);
        down.buttons.tilt_down = true;
        down.buttons.bright_down = true;
        v.on_joystick(&down);

        assert_eq!(v.tilt_deg(), 40);
        assert_eq!(v.brightness_pct(), 90);
    }

    #[test]
    fn test_non_monotonic_inputs_are_dropped() {
        let mut v = vehicle();

        v.on_pose(&pose_msg(0.5, Pose::new(1.0, 0.0, 0.0, 0.0)));

        // Older and duplicate stamps are silently ignored
        v.on_pose(&pose_msg(0.4, Pose::new(9.0, 9.0, 9.0, 0.0)));
        v.on_pose(&pose_msg(0.5, Pose::new(9.0, 9.0, 9.0, 0.0)));

        let estimate = v.estimate.unwrap();
        assert_eq!(estimate.pose.x, 1.0);
    }
}
