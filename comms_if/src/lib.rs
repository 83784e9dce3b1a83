//! # Communications interface definitions for the Tethys AUV software
//!
//! This crate defines the message types exchanged with the external
//! collaborators of the motion-control executable:
//!
//! - the hardware driver (thruster demands out, barometer/battery/leak in)
//! - the pose estimation filter
//! - the operator joystick
//! - the fiducial marker map source
//! - the mission goal source
//!
//! The crate contains data definitions only. All control logic lives in
//! `auv_exec`, and the transport used to move these messages is outside the
//! scope of this repository.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod eqpt;
pub mod mission;
pub mod stamp;
pub mod tc;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use stamp::Timestamp;
