//! # 4-DOF geometry and motion types
//!
//! The vehicle is roll/pitch stabilised by thruster placement and buoyancy,
//! so the control core works in 4 degrees of freedom: x, y, z and yaw. The
//! wire representation (position + quaternion) from `comms_if` is converted
//! at this boundary and never used further in.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod dynamics;
mod efforts;

pub use dynamics::Dynamics;
pub use efforts::{rotate_frame, Efforts};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

// Internal
use comms_if::eqpt::estimate::EstimateMsg;
use comms_if::eqpt::WirePose;
use comms_if::Timestamp;
use util::maths::norm_angle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A 4-DOF rigid pose in the world frame.
///
/// The yaw is always stored in normalised form, in (-pi, pi].
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

/// A pose plus the monotonic time it refers to.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct PoseStamped {
    pub t: Timestamp,
    pub pose: Pose,
}

/// World-frame velocities.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct Twist {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

/// A world-frame acceleration command.
///
/// Unclamped, used as the intermediate between the controllers and
/// [`Efforts`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

/// The decoded pose estimate used by the controllers and planner.
#[derive(Debug, Default, Copy, Clone)]
pub struct Estimate {
    pub t: Timestamp,
    pub pose: Pose,
    pub twist: Twist,

    /// Variance of the (x, y, z, yaw) estimates.
    pub covariance: [f64; 4],

    /// Roll/pitch stability, 1.0 flat to 0.0 at 90 degrees of tilt.
    pub stability: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Build a pose, normalising the yaw.
    pub fn new(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self {
            x,
            y,
            z,
            yaw: norm_angle(yaw),
        }
    }

    /// Distance between two poses on the xy plane.
    pub fn distance_xy(&self, that: &Pose) -> f64 {
        (self.x - that.x).hypot(self.y - that.y)
    }

    /// Vertical distance between two poses.
    pub fn distance_z(&self, that: &Pose) -> f64 {
        (self.z - that.z).abs()
    }

    /// Angular distance between two poses, in [0, pi].
    pub fn distance_yaw(&self, that: &Pose) -> f64 {
        norm_angle(self.yaw - that.yaw).abs()
    }

    /// Decode a wire pose, extracting the yaw from the orientation
    /// quaternion under the zero roll/pitch assumption.
    pub fn from_wire(msg: &WirePose) -> Self {
        let o = msg.orientation;
        let q = UnitQuaternion::from_quaternion(Quaternion::new(o[3], o[0], o[1], o[2]));
        let (_, _, yaw) = q.euler_angles();

        Self::new(msg.position[0], msg.position[1], msg.position[2], yaw)
    }

    /// Encode this pose for the wire.
    pub fn to_wire(&self) -> WirePose {
        let q = UnitQuaternion::from_euler_angles(0.0, 0.0, self.yaw);
        let c = q.into_inner().coords;

        WirePose {
            position: [self.x, self.y, self.z],
            orientation: [c[0], c[1], c[2], c[3]],
        }
    }
}

impl Acceleration {
    /// Add another acceleration onto this one, component-wise.
    pub fn add(&mut self, other: &Acceleration) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self.yaw += other.yaw;
    }
}

impl Estimate {
    /// Decode an estimator message.
    pub fn from_msg(msg: &EstimateMsg) -> Self {
        Self {
            t: msg.t,
            pose: Pose::from_wire(&msg.pose),
            twist: Twist {
                x: msg.twist.x,
                y: msg.twist.y,
                z: msg.twist.z,
                yaw: msg.twist.yaw,
            },
            covariance: msg.covariance,
            stability: msg.stability,
        }
    }

    /// True if every axis variance is below the trust threshold, i.e. the
    /// estimate is usable for planning.
    pub fn fully_determined(&self, trust_covariance: f64) -> bool {
        self.covariance.iter().all(|&c| c < trust_covariance)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
