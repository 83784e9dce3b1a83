//! # Bench scenario interpreter
//!
//! A scenario is a TOML file of timed events, each carrying one TC to
//! inject into the vehicle. It stands in for the live transport during
//! bench runs, so a whole dive can be replayed from a file:
//!
//! ```toml
//! [[event]]
//! time_s = 1.0
//!
//! [event.tc.Joy]
//! forward = 0.5
//! ```
//!
//! Events whose messages carry no stamp are stamped at injection time by
//! the runner.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use comms_if::tc::Tc;
use serde::Deserialize;
use util::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A TC scheduled to occur at a specific time.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Session-elapsed time the event fires at.
    pub time_s: f64,

    /// The TC to inject.
    pub tc: Tc,
}

/// A scenario interpreter.
///
/// After initialising with the path of the scenario to run, use
/// `get_pending_tcs` each cycle to acquire the TCs that are due.
pub struct ScenarioInterpreter {
    _scenario_path: PathBuf,
    events: VecDeque<Event>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Could not find the scenario at {0}")]
    ScenarioNotFound(String),

    #[error("Could not load the scenario: {0}")]
    ScenarioLoadError(std::io::Error),

    #[error("Could not parse the scenario: {0}")]
    ScenarioParseError(toml::de::Error),

    #[error("The scenario contains no events")]
    ScenarioEmpty,
}

pub enum PendingTcs {
    None,
    Some(Vec<Tc>),
    EndOfScenario,
}

// ---------------------------------------------------------------------------
// PRIVATE DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The raw file format: a list of `[[event]]` tables.
#[derive(Debug, Deserialize)]
struct ScenarioFile {
    event: Vec<Event>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScenarioInterpreter {
    /// Create a new interpreter from the given scenario path.
    pub fn new<P: AsRef<Path>>(scenario_path: P) -> Result<Self, ScenarioError> {
        let path = PathBuf::from(scenario_path.as_ref());

        if !path.exists() {
            return Err(ScenarioError::ScenarioNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let raw = fs::read_to_string(&path).map_err(ScenarioError::ScenarioLoadError)?;

        let file: ScenarioFile =
            toml::from_str(&raw).map_err(ScenarioError::ScenarioParseError)?;

        if file.event.is_empty() {
            return Err(ScenarioError::ScenarioEmpty);
        }

        // Events fire in time order regardless of file order
        let mut events = file.event;
        events.sort_by(|a, b| a.time_s.partial_cmp(&b.time_s).unwrap());

        Ok(ScenarioInterpreter {
            _scenario_path: path,
            events: events.into(),
        })
    }

    /// Return the TCs due at the current session time, or `None` when no
    /// TC needs executing yet.
    pub fn get_pending_tcs(&mut self) -> PendingTcs {
        if self.events.is_empty() {
            return PendingTcs::EndOfScenario;
        }

        let current_time_s = get_elapsed_seconds();
        let mut tc_vec: Vec<Tc> = vec![];

        while self
            .events
            .front()
            .map_or(false, |event| event.time_s < current_time_s)
        {
            tc_vec.push(self.events.pop_front().unwrap().tc);
        }

        if tc_vec.is_empty() {
            PendingTcs::None
        } else {
            PendingTcs::Some(tc_vec)
        }
    }

    /// Number of events remaining.
    pub fn get_num_tcs(&self) -> usize {
        self.events.len()
    }

    /// Time of the last event in seconds.
    pub fn get_duration(&self) -> f64 {
        self.events.back().map_or(0.0, |event| event.time_s)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
