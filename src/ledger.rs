use std::fmt;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::error::SessionError;

/// Stable identifier for a ledger record. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Speech,
    Question,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Side {
    #[default]
    Aff,
    Neg,
}

impl Side {
    pub fn toggled(self) -> Self {
        match self {
            Side::Aff => Side::Neg,
            Side::Neg => Side::Aff,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRecord {
    pub id: RecordId,
    pub speaker: String,
    pub bill: String,
    pub side: Side,
    /// `m:ss` as entered, or empty
    pub duration: String,
    pub timestamp: DateTime<Local>,
    pub round: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub id: RecordId,
    pub questioner: String,
    pub timestamp: DateTime<Local>,
    pub round: u32,
}

/// Ordered, de-duplicated list of known names used for autocompletion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    entries: Vec<String>,
}

impl Roster {
    /// Returns true when the name was not known before
    pub fn register(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }

    /// First known entry that starts with `prefix`, ignoring case.
    /// An exact match is not a suggestion.
    pub fn suggest(&self, prefix: &str) -> Option<&str> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        let needle = prefix.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.to_lowercase().starts_with(&needle) && e.as_str() != prefix)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Speech and question records of the current round
#[derive(Debug, Default)]
pub struct Ledger {
    speeches: Vec<SpeechRecord>,
    questions: Vec<QuestionRecord>,
    next_id: u64,
    speakers: Roster,
    bills: Roster,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_speech(
        &mut self,
        speaker: &str,
        bill: &str,
        side: Side,
        duration: &str,
        round: u32,
    ) -> Result<RecordId, SessionError> {
        let speaker = speaker.trim();
        let bill = bill.trim();
        if speaker.is_empty() || bill.is_empty() {
            return Err(SessionError::MissingSpeechFields);
        }

        let id = self.allocate_id();
        self.speakers.register(speaker);
        self.bills.register(bill);
        self.speeches.push(SpeechRecord {
            id,
            speaker: speaker.to_string(),
            bill: bill.to_string(),
            side,
            duration: duration.trim().to_string(),
            timestamp: Local::now(),
            round,
        });
        Ok(id)
    }

    pub fn add_question(&mut self, questioner: &str, round: u32) -> Result<RecordId, SessionError> {
        let questioner = questioner.trim();
        if questioner.is_empty() {
            return Err(SessionError::MissingQuestioner);
        }

        let id = self.allocate_id();
        self.speakers.register(questioner);
        self.questions.push(QuestionRecord {
            id,
            questioner: questioner.to_string(),
            timestamp: Local::now(),
            round,
        });
        Ok(id)
    }

    pub fn len(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Speech => self.speeches.len(),
            RecordKind::Question => self.questions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.speeches.is_empty() && self.questions.is_empty()
    }

    pub fn position(&self, kind: RecordKind, id: RecordId) -> Option<usize> {
        match kind {
            RecordKind::Speech => self.speeches.iter().position(|r| r.id == id),
            RecordKind::Question => self.questions.iter().position(|r| r.id == id),
        }
    }

    /// Remove by position. Later records shift down by one.
    pub fn remove_at(&mut self, kind: RecordKind, index: usize) -> Result<RecordId, SessionError> {
        let len = self.len(kind);
        if index >= len {
            warn!(%kind, index, len, "remove by position out of bounds");
            return Err(SessionError::IndexOutOfBounds { kind, index, len });
        }
        let id = match kind {
            RecordKind::Speech => self.speeches.remove(index).id,
            RecordKind::Question => self.questions.remove(index).id,
        };
        debug!(%kind, index, %id, "removed record by position");
        Ok(id)
    }

    pub fn remove(&mut self, kind: RecordKind, id: RecordId) -> Result<(), SessionError> {
        let index = self
            .position(kind, id)
            .ok_or(SessionError::UnknownRecord { kind, id })?;
        match kind {
            RecordKind::Speech => {
                self.speeches.remove(index);
            }
            RecordKind::Question => {
                self.questions.remove(index);
            }
        }
        debug!(%kind, %id, "removed record");
        Ok(())
    }

    /// Drop every record. Rosters are kept.
    pub fn clear(&mut self) {
        self.speeches.clear();
        self.questions.clear();
    }

    pub fn speeches(&self) -> &[SpeechRecord] {
        &self.speeches
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    /// Speakers and questioners seen this process
    pub fn speakers(&self) -> &Roster {
        &self.speakers
    }

    pub fn bills(&self) -> &Roster {
        &self.bills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn add_speech_trims_and_registers_rosters() {
        let mut ledger = Ledger::new();
        let id = ledger
            .add_speech("  Alice ", " HR1", Side::Neg, " 1:30 ", 2)
            .unwrap();

        let rec = &ledger.speeches()[0];
        assert_eq!(rec.id, id);
        assert_eq!(rec.speaker, "Alice");
        assert_eq!(rec.bill, "HR1");
        assert_eq!(rec.side, Side::Neg);
        assert_eq!(rec.duration, "1:30");
        assert_eq!(rec.round, 2);
        assert!(ledger.speakers().contains("Alice"));
        assert!(ledger.bills().contains("HR1"));
    }

    #[test]
    fn add_speech_rejects_blank_fields() {
        let mut ledger = Ledger::new();
        assert_matches!(
            ledger.add_speech("   ", "HR1", Side::Aff, "", 1),
            Err(SessionError::MissingSpeechFields)
        );
        assert_matches!(
            ledger.add_speech("Alice", "", Side::Aff, "", 1),
            Err(SessionError::MissingSpeechFields)
        );
        assert!(ledger.is_empty());
        assert!(ledger.speakers().is_empty());
        assert!(ledger.bills().is_empty());
    }

    #[test]
    fn add_question_rejects_blank_name() {
        let mut ledger = Ledger::new();
        assert_matches!(
            ledger.add_question("\t", 1),
            Err(SessionError::MissingQuestioner)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn questioners_join_the_speaker_roster() {
        let mut ledger = Ledger::new();
        ledger.add_question("Bob", 1).unwrap();
        ledger.add_question("Bob", 1).unwrap();
        assert_eq!(ledger.speakers().len(), 1);
        assert_eq!(ledger.questions().len(), 2);
    }

    #[test]
    fn ids_are_unique_across_kinds_and_clears() {
        let mut ledger = Ledger::new();
        let a = ledger.add_speech("A", "B1", Side::Aff, "", 1).unwrap();
        let b = ledger.add_question("Q", 1).unwrap();
        ledger.clear();
        let c = ledger.add_question("Q", 2).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn remove_at_shifts_later_positions() {
        let mut ledger = Ledger::new();
        let first = ledger.add_question("A", 1).unwrap();
        let second = ledger.add_question("B", 1).unwrap();
        let third = ledger.add_question("C", 1).unwrap();

        assert_eq!(ledger.remove_at(RecordKind::Question, 0).unwrap(), first);
        assert_eq!(ledger.position(RecordKind::Question, second), Some(0));
        assert_eq!(ledger.position(RecordKind::Question, third), Some(1));
    }

    #[test]
    fn remove_at_out_of_bounds_is_reported() {
        let mut ledger = Ledger::new();
        ledger.add_speech("A", "B", Side::Aff, "", 1).unwrap();
        assert_matches!(
            ledger.remove_at(RecordKind::Speech, 1),
            Err(SessionError::IndexOutOfBounds {
                kind: RecordKind::Speech,
                index: 1,
                len: 1
            })
        );
        assert_eq!(ledger.len(RecordKind::Speech), 1);
    }

    #[test]
    fn remove_by_id_survives_out_of_order_removal() {
        let mut ledger = Ledger::new();
        let first = ledger.add_speech("A", "B", Side::Aff, "", 1).unwrap();
        let second = ledger.add_speech("C", "D", Side::Neg, "", 1).unwrap();

        ledger.remove_at(RecordKind::Speech, 0).unwrap();
        ledger.remove(RecordKind::Speech, second).unwrap();
        assert!(ledger.is_empty());
        assert_matches!(
            ledger.remove(RecordKind::Speech, first),
            Err(SessionError::UnknownRecord { .. })
        );
    }

    #[test]
    fn clear_keeps_rosters() {
        let mut ledger = Ledger::new();
        ledger.add_speech("Alice", "HR1", Side::Aff, "", 1).unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.speakers().contains("Alice"));
        assert!(ledger.bills().contains("HR1"));
    }

    #[test]
    fn roster_suggests_by_case_insensitive_prefix() {
        let mut roster = Roster::default();
        roster.register("Alice");
        roster.register("Albert");
        roster.register("Bob");
        assert!(!roster.register("Bob"));

        assert_eq!(roster.suggest("al"), Some("Alice"));
        assert_eq!(roster.suggest("Alb"), Some("Albert"));
        assert_eq!(roster.suggest("b"), Some("Bob"));
        assert_eq!(roster.suggest("Bob"), None);
        assert_eq!(roster.suggest("z"), None);
        assert_eq!(roster.suggest(""), None);
    }
}
