use crate::ledger::{RecordId, RecordKind};

/// What is needed to reverse one add: the record to drop and whose
/// counter to decrement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub kind: RecordKind,
    pub id: RecordId,
    pub participant: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Applied(UndoEntry),
    NothingToUndo,
}

impl UndoOutcome {
    pub fn message(&self) -> String {
        match self {
            UndoOutcome::Applied(entry) => {
                format!("Undid last {} by {}", entry.kind, entry.participant)
            }
            UndoOutcome::NothingToUndo => "Nothing to undo".to_string(),
        }
    }
}

/// LIFO history of adds in the current round
#[derive(Debug, Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: RecordKind, id: RecordId, participant: &str) {
        self.entries.push(UndoEntry {
            kind,
            id,
            participant: participant.to_string(),
        });
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Ledger, Side};

    #[test]
    fn pops_in_reverse_order() {
        let mut ledger = Ledger::new();
        let a = ledger.add_speech("A", "B", Side::Aff, "", 1).unwrap();
        let b = ledger.add_question("C", 1).unwrap();

        let mut stack = UndoStack::new();
        stack.push(RecordKind::Speech, a, "A");
        stack.push(RecordKind::Question, b, "C");
        assert_eq!(stack.len(), 2);

        let top = stack.pop().unwrap();
        assert_eq!(top.id, b);
        assert_eq!(top.participant, "C");
        assert_eq!(stack.pop().unwrap().kind, RecordKind::Speech);
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(UndoOutcome::NothingToUndo.message(), "Nothing to undo");

        let mut ledger = Ledger::new();
        let id = ledger.add_question("Bob", 1).unwrap();
        let applied = UndoOutcome::Applied(UndoEntry {
            kind: RecordKind::Question,
            id,
            participant: "Bob".into(),
        });
        assert_eq!(applied.message(), "Undid last question by Bob");
    }
}
