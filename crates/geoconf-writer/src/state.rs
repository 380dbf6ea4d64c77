// crates/geoconf-writer/src/state.rs
//
// Per-run state machine of the configuration writer.
//
// Valid transitions:
//   Idle -> CollectingPrevious -> CollectingCurrent -> Comparing -> Persisting -> Idle
//   Any state -> Idle (aborted pass)

use std::fmt;

use geoconf_core::error::GeoError;

/// Phases of one writer pass over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Waiting for the next run to open.
    Idle,
    /// Reading the previous configuration from the run.
    CollectingPrevious,
    /// Reading the configuration of the live geometry.
    CollectingCurrent,
    /// Checking previous against current.
    Comparing,
    /// Writing the authoritative record into the run.
    Persisting,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterState::Idle => write!(f, "Idle"),
            WriterState::CollectingPrevious => write!(f, "CollectingPrevious"),
            WriterState::CollectingCurrent => write!(f, "CollectingCurrent"),
            WriterState::Comparing => write!(f, "Comparing"),
            WriterState::Persisting => write!(f, "Persisting"),
        }
    }
}

/// State machine guarding the order of a writer pass.
#[derive(Debug)]
pub struct WriterStateMachine {
    current: WriterState,
}

impl WriterStateMachine {
    /// Create a new state machine starting in the Idle state.
    pub fn new() -> Self {
        Self {
            current: WriterState::Idle,
        }
    }

    pub fn current(&self) -> WriterState {
        self.current
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns an error if the transition is not valid.
    pub fn transition(&mut self, new_state: WriterState) -> Result<(), GeoError> {
        let valid = matches!(
            (self.current, new_state),
            (_, WriterState::Idle)
                | (WriterState::Idle, WriterState::CollectingPrevious)
                | (WriterState::CollectingPrevious, WriterState::CollectingCurrent)
                | (WriterState::CollectingCurrent, WriterState::Comparing)
                | (WriterState::Comparing, WriterState::Persisting)
        );

        if !valid {
            return Err(GeoError::InvalidState(format!(
                "Invalid writer transition: {} -> {}",
                self.current, new_state
            )));
        }

        tracing::trace!("Writer state transition: {} -> {}", self.current, new_state);
        self.current = new_state;
        Ok(())
    }

    /// Return to Idle from wherever the pass stopped.
    pub fn reset(&mut self) {
        if self.current != WriterState::Idle {
            tracing::trace!("Writer pass aborted in state {}", self.current);
        }
        self.current = WriterState::Idle;
    }
}

impl Default for WriterStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
