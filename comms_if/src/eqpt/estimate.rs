//! # Pose estimator messages
//!
//! The estimation filter is external to this repository. Each cycle it
//! publishes its best pose estimate together with a per-axis uncertainty
//! indicator; the control core treats an axis as usable only when its
//! variance is below a trust threshold.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::WirePose;
use crate::stamp::Timestamp;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Body velocities reported alongside the pose estimate.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwistMsg {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

/// A timestamped pose estimate from the filter.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateMsg {
    pub t: Timestamp,

    /// Estimated pose in the world frame.
    pub pose: WirePose,

    /// Estimated velocities.
    pub twist: TwistMsg,

    /// Variance of the (x, y, z, yaw) estimates. An axis with a variance at
    /// or above the trust threshold is effectively unobserved.
    pub covariance: [f64; 4],

    /// Roll/pitch stability indicator, 1.0 when flat, 0.0 at or beyond 90
    /// degrees of tilt.
    pub stability: f64,
}
