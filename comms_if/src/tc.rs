//! # Bench telecommands
//!
//! A [`Tc`] is a single timed event injected into the control core by the
//! bench scenario runner: either an operator/mission request or a synthetic
//! sensor message. On the real vehicle these arrive through the transport
//! layer instead; the enum exists so scripted bench runs and tests can
//! drive the exact same callback surface.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eqpt::driver::{BaroMsg, BatteryMsg, LeakMsg};
use crate::eqpt::estimate::EstimateMsg;
use crate::eqpt::joy::JoyMsg;
use crate::eqpt::map::MapMsg;
use crate::mission::MissionGoal;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A single bench event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Tc {
    /// Inject a joystick sample.
    Joy(JoyMsg),

    /// Inject a barometer reading.
    Baro(BaroMsg),

    /// Inject a battery report.
    Battery(BatteryMsg),

    /// Inject a leak detector report.
    Leak(LeakMsg),

    /// Inject a pose estimate.
    Pose(EstimateMsg),

    /// Inject a marker map.
    Map(MapMsg),

    /// Submit a mission goal.
    Goal(MissionGoal),

    /// Request cancellation of the in-flight mission goal.
    Cancel,
}

/// An error which can occur when parsing a TC from JSON.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC is not valid JSON: {0}")]
    NotJson(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Tc {
    /// Parse a TC from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json).map_err(TcParseError::NotJson)
    }

    /// Serialise this TC to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
