//! # Message timestamps
//!
//! All sensor streams stamp their messages with a monotonic timestamp in
//! nanoseconds. A zero (or negative) stamp is invalid, which matches the
//! behaviour of simulators that occasionally emit messages before their
//! clock has started.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A monotonic timestamp in nanoseconds.
///
/// `Timestamp(0)` is the invalid sentinel, used both for "never received"
/// and for messages which arrive without a stamp.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(pub i64);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Timestamp {
    /// Build a timestamp from a number of seconds.
    pub fn from_seconds(seconds: f64) -> Self {
        Self((seconds * NANOS_PER_SECOND as f64) as i64)
    }

    /// True if this stamp is valid (strictly positive).
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }

    /// Number of seconds between `earlier` and this stamp.
    ///
    /// Negative if `earlier` is actually later than this stamp.
    pub fn seconds_since(&self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) as f64 / NANOS_PER_SECOND as f64
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
