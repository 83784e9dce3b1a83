//! # Mission
//!
//! A mission binds a [`Planner`] to the goal handle of the request that
//! started it. Joystick-triggered missions have no handle; externally
//! requested ones report progress and their terminal outcome through it.
//! The handle is completed exactly once, when the mission ends.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;

// Internal
use crate::geom::Estimate;
use crate::planner::{AdvanceOutput, Planner};
use comms_if::mission::{CancelToken, GoalHandle, MissionOutcome};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A running mission.
pub struct Mission {
    planner: Planner,
    handle: Option<GoalHandle>,

    /// Shared with the goal source when a handle exists, local otherwise,
    /// so operator-triggered missions can still be cancelled.
    cancel: CancelToken,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Mission {
    pub fn new(planner: Planner, handle: Option<GoalHandle>) -> Self {
        info!("mission started, {} target(s)", planner.num_targets());

        let cancel = handle
            .as_ref()
            .map(|h| h.cancel_token())
            .unwrap_or_default();

        Self {
            planner,
            handle,
            cancel,
        }
    }

    /// Advance the mission by `dt` seconds, reporting per-target progress
    /// through the goal handle.
    pub fn advance(&mut self, dt: f64, estimate: &Estimate) -> AdvanceOutput {
        let Mission {
            planner, handle, ..
        } = self;

        planner.advance(dt, estimate, &mut |completed, total| {
            info!("completed target {} of {}", completed, total);

            if let Some(h) = handle.as_ref() {
                h.send_feedback(completed as u32, total as u32);
            }
        })
    }

    /// True if this mission has been asked to stop.
    pub fn cancel_requested(&self) -> bool {
        self.cancel.is_requested()
    }

    /// Flag this mission for cancellation; observed on the next tick.
    pub fn request_cancel(&self) {
        self.cancel.request();
    }

    /// End the mission, completing the goal handle exactly once.
    pub fn complete(self, outcome: MissionOutcome) {
        info!("mission over: {:?}", outcome);

        if let Some(handle) = self.handle {
            handle.complete(outcome);
        }
    }
}
