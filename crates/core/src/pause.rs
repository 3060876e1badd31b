//! Global halt switch.
//!
//! The flag is persisted and toggled, but no project or milestone operation
//! consults it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PauseGate {
    paused: bool,
}

impl PauseGate {
    pub fn new(paused: bool) -> Self {
        Self { paused }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) -> Result<(), CoreError> {
        if self.paused {
            return Err(CoreError::InvalidState("ledger is already paused".into()));
        }
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self) -> Result<(), CoreError> {
        if !self.paused {
            return Err(CoreError::InvalidState("ledger is not paused".into()));
        }
        self.paused = false;
        Ok(())
    }
}
