//! # Mission goal interface
//!
//! The mission goal source (a ground station or a mission sequencer) hands
//! the control core a [`MissionGoal`] together with a [`GoalHandle`]. The
//! handle is a linear resource: the core completes it exactly once, at
//! mission termination, and may send progress feedback through it while the
//! mission runs. The goal source keeps the matching [`GoalMonitor`] and can
//! request cancellation at any time through the shared [`CancelToken`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::eqpt::WirePose;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A mission request.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionGoal {
    /// Explicit target pose. `None` means "visit the map targets" when
    /// `random` is set, or "keep station at the current pose" otherwise.
    pub target: Option<WirePose>,

    /// Visit every map target in a shuffled order.
    pub random: bool,
}

/// Progress feedback sent once per completed target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionFeedback {
    pub targets_completed: u32,
    pub targets_total: u32,
}

/// Shared cancellation flag between the goal source and the control core.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

/// The control core's end of an accepted goal.
#[derive(Debug)]
pub struct GoalHandle {
    goal_id: u32,
    feedback_tx: Sender<MissionFeedback>,
    result_tx: Sender<MissionOutcome>,
    cancel: CancelToken,
}

/// The goal source's end of an accepted goal.
#[derive(Debug)]
pub struct GoalMonitor {
    pub goal_id: u32,
    feedback_rx: Receiver<MissionFeedback>,
    result_rx: Receiver<MissionOutcome>,
    cancel: CancelToken,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Terminal state of a mission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionOutcome {
    Succeeded,
    Aborted,
    Canceled,
}

/// Immediate response to a goal or cancel request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GoalResponse {
    Accept,
    Reject,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Create a connected handle/monitor pair for a new goal.
pub fn goal_channel(goal_id: u32) -> (GoalHandle, GoalMonitor) {
    let (feedback_tx, feedback_rx) = channel();
    let (result_tx, result_rx) = channel();
    let cancel = CancelToken::default();

    (
        GoalHandle {
            goal_id,
            feedback_tx,
            result_tx,
            cancel: cancel.clone(),
        },
        GoalMonitor {
            goal_id,
            feedback_rx,
            result_rx,
            cancel,
        },
    )
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CancelToken {
    /// Request cancellation. Irreversible.
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl GoalHandle {
    pub fn goal_id(&self) -> u32 {
        self.goal_id
    }

    /// A clone of the cancellation token shared with the goal source.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Send a progress update. A vanished goal source is logged, not fatal.
    pub fn send_feedback(&self, targets_completed: u32, targets_total: u32) {
        if self
            .feedback_tx
            .send(MissionFeedback {
                targets_completed,
                targets_total,
            })
            .is_err()
        {
            warn!(
                "Goal {}: feedback receiver has gone away",
                self.goal_id
            );
        }
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.is_requested()
    }

    /// Ask the mission to stop. Used when the core itself must tear a
    /// mission down in response to a cancel request.
    pub fn request_cancel(&self) {
        self.cancel.request();
    }

    /// Complete the goal. Consumes the handle, so a goal can only ever be
    /// completed once.
    pub fn complete(self, outcome: MissionOutcome) {
        if self.result_tx.send(outcome).is_err() {
            warn!(
                "Goal {}: result receiver has gone away, outcome {:?} dropped",
                self.goal_id, outcome
            );
        }
    }
}

impl GoalMonitor {
    /// Request cancellation of the running mission.
    pub fn cancel(&self) {
        self.cancel.request();
    }

    /// Drain any pending feedback messages.
    pub fn take_feedback(&self) -> Vec<MissionFeedback> {
        let mut fbs = vec![];
        while let Ok(fb) = self.feedback_rx.try_recv() {
            fbs.push(fb);
        }
        fbs
    }

    /// The mission outcome, if the mission has terminated.
    pub fn try_outcome(&self) -> Option<MissionOutcome> {
        self.result_rx.try_recv().ok()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_goal_lifecycle() {
        let (handle, monitor) = goal_channel(7);

        assert!(!handle.cancel_requested());
        handle.send_feedback(1, 3);
        handle.send_feedback(2, 3);

        monitor.cancel();
        assert!(handle.cancel_requested());

        assert_eq!(monitor.try_outcome(), None);
        handle.complete(MissionOutcome::Canceled);

        let fbs = monitor.take_feedback();
        assert_eq!(fbs.len(), 2);
        assert_eq!(
            fbs[0],
            MissionFeedback {
                targets_completed: 1,
                targets_total: 3
            }
        );
        assert_eq!(monitor.try_outcome(), Some(MissionOutcome::Canceled));
    }
}
