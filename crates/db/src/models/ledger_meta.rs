//! Row model for the singleton `ledger_meta` table.

use sqlx::FromRow;
use tracker_core::lifecycle::CompletionEffect;
use tracker_core::pause::PauseGate;
use tracker_core::revision::LogicRevision;
use tracker_core::state::LedgerState;

use crate::{decode_error, encode_error};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LedgerMetaRow {
    pub initialized_version: i16,
    pub revision_number: i32,
    pub completion_effect: String,
    pub paused: bool,
}

impl LedgerMetaRow {
    /// Fails when the revision number does not fit the INTEGER column.
    pub fn from_state(state: &LedgerState) -> Result<Self, sqlx::Error> {
        let revision_number = i32::try_from(state.revision.number).map_err(|_| {
            encode_error(format!(
                "revision number {} out of range",
                state.revision.number
            ))
        })?;
        Ok(Self {
            initialized_version: i16::from(state.initialized_version),
            revision_number,
            completion_effect: state.revision.completion.as_str().to_string(),
            paused: state.pause.is_paused(),
        })
    }

    /// Seed an empty state with the persisted meta fields.
    pub fn into_state(self) -> Result<LedgerState, sqlx::Error> {
        let initialized_version = u8::try_from(self.initialized_version).map_err(|_| {
            decode_error(format!(
                "initialized_version {} out of range",
                self.initialized_version
            ))
        })?;
        let number = u32::try_from(self.revision_number).map_err(|_| {
            decode_error(format!("revision_number {} out of range", self.revision_number))
        })?;
        let completion = self
            .completion_effect
            .parse::<CompletionEffect>()
            .map_err(decode_error)?;

        Ok(LedgerState {
            initialized_version,
            pause: PauseGate::new(self.paused),
            revision: LogicRevision { number, completion },
            ..LedgerState::default()
        })
    }
}
