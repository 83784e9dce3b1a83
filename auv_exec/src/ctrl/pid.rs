//! # Single-axis PID controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use util::maths::norm_angle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains for one PID axis.
#[derive(Debug, Default, Copy, Clone, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// A single-axis PID controller.
///
/// For angular axes the controller is constructed with `wrap` set, and the
/// error is normalised into (-pi, pi] so the response always takes the
/// short way round.
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    wrap: bool,

    target: f64,
    prev_error: Option<f64>,
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pid {
    pub fn new(gains: PidGains, wrap: bool) -> Self {
        Self {
            gains,
            wrap,
            target: 0.0,
            prev_error: None,
            integral: 0.0,
        }
    }

    /// Set the setpoint for subsequent calls to [`Pid::calc`].
    pub fn set_target(&mut self, target: f64) {
        self.target = if self.wrap { norm_angle(target) } else { target };
    }

    /// Compute the response to the observed value.
    ///
    /// The integral and derivative are skipped when `dt` is not positive,
    /// and the derivative is additionally skipped on the first sample.
    pub fn calc(&mut self, observed: f64, dt: f64) -> f64 {
        let error = if self.wrap {
            norm_angle(self.target - observed)
        } else {
            self.target - observed
        };

        let mut deriv = 0.0;

        if dt > 0.0 {
            self.integral += error * dt;

            if let Some(prev) = self.prev_error {
                deriv = (error - prev) / dt;
            }
        }

        self.prev_error = Some(error);

        self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * deriv
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;

    fn gains(kp: f64, ki: f64, kd: f64) -> PidGains {
        PidGains { kp, ki, kd }
    }

    #[test]
    fn test_proportional() {
        let mut pid = Pid::new(gains(2.0, 0.0, 0.0), false);

        pid.set_target(1.0);
        assert!((pid.calc(0.0, 0.1) - 2.0).abs() < 1e-12);
        assert!((pid.calc(0.5, 0.1) - 1.0).abs() < 1e-12);
        assert_eq!(pid.calc(1.0, 0.1), 0.0);
    }

    #[test]
    fn test_integral_accumulates() {
        let mut pid = Pid::new(gains(0.0, 1.0, 0.0), false);

        pid.set_target(1.0);
        assert!((pid.calc(0.0, 0.5) - 0.5).abs() < 1e-12);
        assert!((pid.calc(0.0, 0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_skips_first_sample() {
        let mut pid = Pid::new(gains(0.0, 0.0, 1.0), false);

        pid.set_target(0.0);
        assert_eq!(pid.calc(1.0, 0.1), 0.0);
        // Error went -1.0 -> -0.5, derivative 5.0
        assert!((pid.calc(0.5, 0.1) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrapped_error_goes_short_way() {
        let mut pid = Pid::new(gains(1.0, 0.0, 0.0), true);

        pid.set_target(PI - 0.1);
        // Observed just past the wrap, the short-way error is -0.2
        let out = pid.calc(-PI + 0.1, 0.1);
        assert!((out + 0.2).abs() < 1e-9);
    }
}
