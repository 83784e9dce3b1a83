//! Main AUV-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Main loop at the fixed control rate:
//!         - Inject any scenario TCs that are due
//!         - Run one control tick of the vehicle
//!         - Hand the produced control messages to the driver layer
//!         - Report mission feedback and outcomes
//!
//! The executable is driven by a scenario file (see `auv_lib::scenario`)
//! standing in for the live transport, which is outside the scope of this
//! repository.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use auv_lib::planner::AuvConfig;
use auv_lib::scenario::{PendingTcs, ScenarioInterpreter};
use auv_lib::vehicle::{mode::is_auv_mode, Vehicle, VehicleParams};
use comms_if::mission::{goal_channel, GoalMonitor, GoalResponse};
use comms_if::tc::Tc;
use comms_if::Timestamp;
use util::{
    logger::{logger_init, LevelFilter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    let session = Session::new("auv_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Tethys AUV Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let vehicle_params: VehicleParams =
        util::params::load("vehicle.toml").wrap_err("Could not load vehicle params")?;
    let auv_cfg: AuvConfig =
        util::params::load("auv.toml").wrap_err("Could not load AUV params")?;

    info!("Exec parameters loaded");

    let cycle_period_s = vehicle_params.cycle_period_s;

    // ---- INITIALISE SCENARIO ----

    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected exactly one argument (the scenario path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading scenario from \"{}\"", &args[1]);

    let mut scenario =
        ScenarioInterpreter::new(&args[1]).wrap_err("Failed to load the scenario")?;

    info!(
        "Loaded scenario lasts {:.02} s and contains {} TC(s)\n",
        scenario.get_duration(),
        scenario.get_num_tcs()
    );

    // ---- INITIALISE VEHICLE ----

    let mut vehicle = Vehicle::new(vehicle_params, auv_cfg);
    let mut monitors: Vec<GoalMonitor> = vec![];
    let mut next_goal_id = 0u32;

    info!("Vehicle initialised, beginning main loop\n");

    // ---- MAIN LOOP ----

    let mut end_of_scenario = false;

    loop {
        let cycle_start_instant = Instant::now();

        let now = Timestamp::from_seconds(session::get_elapsed_seconds());

        // ---- TELECOMMAND PROCESSING ----

        match scenario.get_pending_tcs() {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec {
                    exec_tc(&mut vehicle, tc, now, &mut monitors, &mut next_goal_id);
                }
            }
            PendingTcs::EndOfScenario => end_of_scenario = true,
        }

        // ---- CONTROL TICK ----

        vehicle.advance_tick(now);

        // ---- OUTPUT ----

        // The driver transport lives outside this repository; the bench
        // executable logs what it would have sent
        for control in vehicle.take_outbox() {
            debug!(
                "control: mode {:?}, efforts {:?}, tilt {}, brightness {}",
                control.mode, control.efforts, control.tilt, control.brightness
            );
        }

        // ---- MISSION REPORTING ----

        monitors.retain(|monitor| {
            for feedback in monitor.take_feedback() {
                info!(
                    "goal {}: completed target {} of {}",
                    monitor.goal_id, feedback.targets_completed, feedback.targets_total
                );
            }

            match monitor.try_outcome() {
                Some(outcome) => {
                    info!("goal {}: {:?}", monitor.goal_id, outcome);
                    false
                }
                None => true,
            }
        });

        // Once the scenario is exhausted, run on until any mission ends
        if end_of_scenario && !is_auv_mode(vehicle.mode()) {
            info!("End of scenario reached, stopping");
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match Duration::from_secs_f64(cycle_period_s).checked_sub(cycle_dur) {
            Some(remaining) => thread::sleep(remaining),
            None => {
                warn!("Cycle overran by {:.06} s", cycle_dur.as_secs_f64() - cycle_period_s);
            }
        }
    }

    // ---- SHUTDOWN ----

    session.exit();

    info!("End of execution");

    Ok(())
}

/// Execute a single TC against the vehicle.
fn exec_tc(
    vehicle: &mut Vehicle,
    tc: Tc,
    now: Timestamp,
    monitors: &mut Vec<GoalMonitor>,
    next_goal_id: &mut u32,
) {
    match tc {
        Tc::Joy(mut msg) => {
            msg.t = stamped(msg.t, now);
            vehicle.on_joystick(&msg);
        }
        Tc::Baro(mut msg) => {
            msg.t = stamped(msg.t, now);
            vehicle.on_barometer(&msg);
        }
        Tc::Battery(mut msg) => {
            msg.t = stamped(msg.t, now);
            vehicle.on_battery(&msg);
        }
        Tc::Leak(mut msg) => {
            msg.t = stamped(msg.t, now);
            vehicle.on_leak(&msg);
        }
        Tc::Pose(mut msg) => {
            msg.t = stamped(msg.t, now);
            vehicle.on_pose(&msg);
        }
        Tc::Map(mut msg) => {
            msg.t = stamped(msg.t, now);
            vehicle.on_map(&msg);
        }
        Tc::Goal(goal) => {
            *next_goal_id += 1;
            let (handle, monitor) = goal_channel(*next_goal_id);

            match vehicle.on_goal_request(now, &goal, handle) {
                GoalResponse::Accept => {
                    info!("goal {} accepted", monitor.goal_id);
                    monitors.push(monitor);
                }
                GoalResponse::Reject => warn!("goal {} rejected", monitor.goal_id),
            }
        }
        Tc::Cancel => match vehicle.on_cancel_request() {
            GoalResponse::Accept => info!("cancel accepted"),
            GoalResponse::Reject => warn!("cancel rejected, no mission in flight"),
        },
    }
}

/// Use the message's own stamp when it has one, the injection time
/// otherwise.
fn stamped(t: Timestamp, now: Timestamp) -> Timestamp {
    if t.is_valid() {
        t
    } else {
        now
    }
}
