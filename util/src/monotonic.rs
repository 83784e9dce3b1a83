//! Timestamp gating for incoming message streams
//!
//! Common simulation problems:
//! - a message stamp might be zero
//! - a stamp might repeat over consecutive messages, or arrive out of order
//!
//! Streams which are differentiated (pose, joystick, barometer) must only
//! accept strictly increasing stamps, otherwise a dt of zero or less leaks
//! into the control maths. Streams which are latest-wins (map, goals) only
//! need the stamp to be valid.
//!
//! These gates are deliberately independent of any message type: the caller
//! extracts the stamp, asks the gate, and only then touches its cache.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::Timestamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gate for streams requiring strictly monotonic stamps.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicGate {
    curr: Timestamp,
    prev: Timestamp,
}

/// Gate for latest-wins streams, which only require a valid stamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidGate {
    curr: Timestamp,
    prev: Timestamp,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MonotonicGate {
    /// Offer a stamp to the gate.
    ///
    /// Returns `Some(first)` if the message shall be processed, with `first`
    /// true for the first accepted message of the stream (dt-dependent logic
    /// must skip its derivative/integral on that one). Returns `None` if the
    /// message shall be silently dropped.
    pub fn accept(&mut self, t: Timestamp) -> Option<bool> {
        self.curr = t;

        if !t.is_valid() {
            return None;
        }

        if self.prev.is_valid() {
            if t > self.prev {
                self.prev = t;
                Some(false)
            } else {
                // Out of order or duplicate
                None
            }
        } else {
            self.prev = t;
            Some(true)
        }
    }

    /// True once at least one message has been accepted.
    pub fn receiving(&self) -> bool {
        self.prev.is_valid()
    }

    /// Stamp of the last accepted message.
    pub fn prev(&self) -> Timestamp {
        self.prev
    }

    /// Seconds between the last two offered stamps.
    pub fn dt(&self) -> f64 {
        self.curr.seconds_since(self.prev)
    }
}

impl ValidGate {
    /// Offer a stamp to the gate. Returns true if the message shall be
    /// processed.
    pub fn accept(&mut self, t: Timestamp) -> bool {
        self.curr = t;

        if t.is_valid() {
            self.prev = t;
            true
        } else {
            false
        }
    }

    pub fn receiving(&self) -> bool {
        self.prev.is_valid()
    }

    pub fn prev(&self) -> Timestamp {
        self.prev
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_monotonic_accepts_increasing() {
        let mut gate = MonotonicGate::default();

        assert!(!gate.receiving());
        assert_eq!(gate.accept(Timestamp(100)), Some(true));
        assert_eq!(gate.accept(Timestamp(200)), Some(false));
        assert!(gate.receiving());
        assert_eq!(gate.prev(), Timestamp(200));
    }

    #[test]
    fn test_monotonic_drops_bad_stamps() {
        let mut gate = MonotonicGate::default();

        // Invalid before anything was accepted
        assert_eq!(gate.accept(Timestamp(0)), None);
        assert!(!gate.receiving());

        assert_eq!(gate.accept(Timestamp(100)), Some(true));

        // Duplicate, out of order, and invalid are all dropped
        assert_eq!(gate.accept(Timestamp(100)), None);
        assert_eq!(gate.accept(Timestamp(50)), None);
        assert_eq!(gate.accept(Timestamp(0)), None);

        // The gate still remembers the last good stamp
        assert_eq!(gate.prev(), Timestamp(100));
        assert_eq!(gate.accept(Timestamp(101)), Some(false));
    }

    #[test]
    fn test_valid_gate_is_latest_wins() {
        let mut gate = ValidGate::default();

        assert!(gate.accept(Timestamp(200)));
        // Out of order is fine for latest-wins streams
        assert!(gate.accept(Timestamp(100)));
        assert!(!gate.accept(Timestamp(0)));
        assert_eq!(gate.prev(), Timestamp(100));
    }
}
