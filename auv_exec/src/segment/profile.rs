//! # Trapezoidal velocity profile
//!
//! Shared by every moving segment: ramp up at a constant acceleration,
//! cruise, ramp down. When the distance is too short to reach the cruise
//! rate the profile degenerates to a triangle with a lower peak rate.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A scalar trapezoidal motion profile over a non-negative distance.
#[derive(Debug, Clone, Copy)]
pub struct Trapezoid {
    /// Ramp acceleration magnitude.
    accel: f64,

    /// Duration of each ramp phase.
    t_ramp: f64,

    /// Duration of the cruise phase, zero for a triangular profile.
    t_cruise: f64,

    /// Total distance covered.
    distance: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Trapezoid {
    /// Build a profile covering `distance` at up to `cruise_rate`, ramping
    /// at `accel`. All three arguments must be non-negative, with
    /// `cruise_rate` and `accel` strictly positive.
    pub fn new(distance: f64, cruise_rate: f64, accel: f64) -> Self {
        // Distance consumed by a full ramp up to the cruise rate
        let d_ramp_full = cruise_rate * cruise_rate / (2.0 * accel);

        if distance < 2.0 * d_ramp_full {
            // Triangular: ramp up then straight back down
            Self {
                accel,
                t_ramp: (distance / accel).sqrt(),
                t_cruise: 0.0,
                distance,
            }
        } else {
            Self {
                accel,
                t_ramp: cruise_rate / accel,
                t_cruise: (distance - 2.0 * d_ramp_full) / cruise_rate,
                distance,
            }
        }
    }

    /// Total duration of the profile.
    pub fn duration(&self) -> f64 {
        2.0 * self.t_ramp + self.t_cruise
    }

    /// Distance covered after `t` seconds, clamped to [0, distance].
    pub fn position(&self, t: f64) -> f64 {
        let peak_rate = self.accel * self.t_ramp;

        if t <= 0.0 {
            0.0
        } else if t < self.t_ramp {
            0.5 * self.accel * t * t
        } else if t < self.t_ramp + self.t_cruise {
            0.5 * self.accel * self.t_ramp * self.t_ramp + peak_rate * (t - self.t_ramp)
        } else if t < self.duration() {
            let remaining = self.duration() - t;
            self.distance - 0.5 * self.accel * remaining * remaining
        } else {
            self.distance
        }
    }

    /// Signed ramp acceleration at `t`: positive while ramping up, zero
    /// while cruising, negative while ramping down, zero once complete.
    pub fn accel_at(&self, t: f64) -> f64 {
        if t < 0.0 || t >= self.duration() {
            0.0
        } else if t < self.t_ramp {
            self.accel
        } else if t < self.t_ramp + self.t_cruise {
            0.0
        } else {
            -self.accel
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_trapezoid_covers_distance() {
        let p = Trapezoid::new(10.0, 0.5, 0.25);

        assert_eq!(p.position(0.0), 0.0);
        assert!((p.position(p.duration()) - 10.0).abs() < 1e-9);
        assert_eq!(p.position(p.duration() + 5.0), 10.0);

        // Monotonic non-decreasing
        let mut last = 0.0;
        let mut t = 0.0;
        while t < p.duration() {
            let s = p.position(t);
            assert!(s >= last - 1e-12);
            last = s;
            t += 0.05;
        }
    }

    #[test]
    fn test_triangular_degenerate() {
        // Far too short to reach 1 m/s
        let p = Trapezoid::new(0.1, 1.0, 0.5);

        assert!((p.position(p.duration()) - 0.1).abs() < 1e-9);

        // Peak rate stays below the cruise rate
        let mid = p.position(p.duration() / 2.0 + 0.01) - p.position(p.duration() / 2.0 - 0.01);
        assert!(mid / 0.02 < 1.0);
    }

    #[test]
    fn test_accel_phases() {
        let p = Trapezoid::new(10.0, 0.5, 0.25);
        let t_ramp = 0.5 / 0.25;

        assert_eq!(p.accel_at(t_ramp * 0.5), 0.25);
        assert_eq!(p.accel_at(t_ramp + 0.1), 0.0);
        assert_eq!(p.accel_at(p.duration() - 0.1), -0.25);
        assert_eq!(p.accel_at(p.duration() + 0.1), 0.0);
    }
}
