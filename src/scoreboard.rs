use itertools::Itertools;
use tracing::error;

use crate::error::SessionError;
use crate::ledger::RecordKind;

pub const SPEECH_WEIGHT: f64 = 1.0;
pub const QUESTION_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticipantStats {
    pub speeches: u32,
    pub questions: u32,
}

impl ParticipantStats {
    /// Presidency score: a point per speech, half a point per question
    pub fn score(&self) -> f64 {
        self.speeches as f64 * SPEECH_WEIGHT + self.questions as f64 * QUESTION_WEIGHT
    }

    pub fn is_empty(&self) -> bool {
        self.speeches == 0 && self.questions == 0
    }

    fn count_mut(&mut self, kind: RecordKind) -> &mut u32 {
        match kind {
            RecordKind::Speech => &mut self.speeches,
            RecordKind::Question => &mut self.questions,
        }
    }
}

/// One row of the presidency ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub participant: String,
    pub score: f64,
    pub speeches: u32,
    pub questions: u32,
}

/// Per-participant counters for the current round, in first-seen order
#[derive(Debug, Default)]
pub struct ScoreBoard {
    entries: Vec<(String, ParticipantStats)>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: RecordKind, participant: &str) {
        let idx = match self.entries.iter().position(|(name, _)| name == participant) {
            Some(idx) => idx,
            None => {
                self.entries
                    .push((participant.to_string(), ParticipantStats::default()));
                self.entries.len() - 1
            }
        };
        *self.entries[idx].1.count_mut(kind) += 1;
    }

    /// Decrement a count. Going below zero means the ledger and the undo
    /// history disagree; the count stays at zero and the error is returned.
    pub fn unrecord(&mut self, kind: RecordKind, participant: &str) -> Result<(), SessionError> {
        let Some(idx) = self.entries.iter().position(|(name, _)| name == participant) else {
            error!(%kind, participant, "unrecord for unknown participant");
            return Err(SessionError::NegativeCount {
                kind,
                participant: participant.to_string(),
            });
        };

        let stats = &mut self.entries[idx].1;
        let count = stats.count_mut(kind);
        let result = if *count == 0 {
            error!(%kind, participant, "count would go negative, clamping at zero");
            Err(SessionError::NegativeCount {
                kind,
                participant: participant.to_string(),
            })
        } else {
            *count -= 1;
            Ok(())
        };

        if stats.is_empty() {
            self.entries.remove(idx);
        }
        result
    }

    pub fn get(&self, participant: &str) -> Option<&ParticipantStats> {
        self.entries
            .iter()
            .find(|(name, _)| name == participant)
            .map(|(_, stats)| stats)
    }

    /// Score descending; equal scores keep first-seen order
    pub fn ranking(&self) -> Vec<Standing> {
        self.entries
            .iter()
            .map(|(name, stats)| Standing {
                participant: name.clone(),
                score: stats.score(),
                speeches: stats.speeches,
                questions: stats.questions,
            })
            .sorted_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
