use thiserror::Error;

use crate::ledger::{RecordId, RecordKind};

/// Coarse classification used to decide whether an error reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty required field. Shown to the operator, nothing is mutated.
    Validation,
    /// A record position or id no longer exists.
    Index,
    /// Ledger and scoreboard disagree. Logged only.
    Invariant,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please provide both speaker and bill.")]
    MissingSpeechFields,

    #[error("Please enter a questioner name.")]
    MissingQuestioner,

    #[error("no {kind} record at index {index} (have {len})")]
    IndexOutOfBounds {
        kind: RecordKind,
        index: usize,
        len: usize,
    },

    #[error("no {kind} record with id {id}")]
    UnknownRecord { kind: RecordKind, id: RecordId },

    #[error("{kind} count for {participant} is already zero")]
    NegativeCount {
        kind: RecordKind,
        participant: String,
    },
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::MissingSpeechFields | SessionError::MissingQuestioner => {
                ErrorKind::Validation
            }
            SessionError::IndexOutOfBounds { .. } | SessionError::UnknownRecord { .. } => {
                ErrorKind::Index
            }
            SessionError::NegativeCount { .. } => ErrorKind::Invariant,
        }
    }

    /// Whether the message is meant for the operator's status line
    pub fn is_user_facing(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
