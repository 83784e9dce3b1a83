//! # Fiducial marker map messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::WirePose;
use crate::stamp::Timestamp;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single fiducial marker.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Marker {
    /// Marker id as printed on the tag.
    pub id: u32,

    /// Marker pose in the map frame.
    pub pose: WirePose,
}

/// The full marker map.
///
/// The map stream is latest-wins: any message with a valid stamp replaces
/// the previous map, out-of-order delivery included.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapMsg {
    pub t: Timestamp,

    pub markers: Vec<Marker>,
}
