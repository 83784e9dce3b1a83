//! # Operating mode predicates
//!
//! The [`Mode`] enum itself lives in `comms_if` because it appears in the
//! control message; the predicates over it live here. The AUV modes are a
//! contiguous ordered range, so membership is an ordering test.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use comms_if::eqpt::driver::Mode;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

pub fn is_disarmed_mode(mode: Mode) -> bool {
    mode == Mode::Disarmed
}

pub fn is_hold_pressure_mode(mode: Mode) -> bool {
    mode == Mode::RovHoldPressure
}

pub fn is_rov_mode(mode: Mode) -> bool {
    mode == Mode::Rov || mode == Mode::RovHoldPressure
}

pub fn is_auv_mode(mode: Mode) -> bool {
    mode >= Mode::AuvKeepStation
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_predicates_partition_the_modes() {
        let all = [
            Mode::Disarmed,
            Mode::Rov,
            Mode::RovHoldPressure,
            Mode::AuvKeepStation,
            Mode::AuvKeepOrigin,
            Mode::AuvRandom,
        ];

        for &mode in &all {
            let auv = is_auv_mode(mode);
            let rov = is_rov_mode(mode);
            let disarmed = is_disarmed_mode(mode);

            // Exactly one of the three groups applies
            assert_eq!(
                [auv, rov, disarmed].iter().filter(|&&b| b).count(),
                1,
                "{:?}",
                mode
            );
        }

        assert!(is_hold_pressure_mode(Mode::RovHoldPressure));
        assert!(!is_hold_pressure_mode(Mode::Rov));
    }
}
