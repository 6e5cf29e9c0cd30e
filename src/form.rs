//! Input forms for the speech and question entries.
//!
//! Forms only hold text; validation happens in [`crate::session::Session`].

use unicode_width::UnicodeWidthStr;

use crate::ledger::{Roster, Side};

/// Single-line text input with the cursor always at the end
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextField {
    value: String,
}

impl TextField {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Terminal columns taken by the value, for cursor placement
    pub fn display_width(&self) -> usize {
        self.value.width()
    }

    /// Rest of the roster suggestion that is not typed yet
    pub fn completion_tail<'a>(&self, roster: &'a Roster) -> Option<&'a str> {
        let suggestion = roster.suggest(&self.value)?;
        suggestion.get(self.value.trim().len()..)
    }

    /// Replace the value with the roster suggestion. Returns true if changed.
    pub fn accept_completion(&mut self, roster: &Roster) -> bool {
        match roster.suggest(&self.value) {
            Some(s) => {
                self.value = s.to_string();
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeechField {
    #[default]
    Speaker,
    Bill,
    Duration,
    Side,
}

impl SpeechField {
    pub fn next(self) -> Self {
        match self {
            SpeechField::Speaker => SpeechField::Bill,
            SpeechField::Bill => SpeechField::Duration,
            SpeechField::Duration => SpeechField::Side,
            SpeechField::Side => SpeechField::Speaker,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SpeechField::Speaker => SpeechField::Side,
            SpeechField::Bill => SpeechField::Speaker,
            SpeechField::Duration => SpeechField::Bill,
            SpeechField::Side => SpeechField::Duration,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeechForm {
    pub speaker: TextField,
    pub bill: TextField,
    pub duration: TextField,
    pub side: Side,
    pub focus: SpeechField,
}

impl SpeechForm {
    /// The text field under focus, or None on the side selector
    pub fn focused_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            SpeechField::Speaker => Some(&mut self.speaker),
            SpeechField::Bill => Some(&mut self.bill),
            SpeechField::Duration => Some(&mut self.duration),
            SpeechField::Side => None,
        }
    }

    /// Roster that completes the focused field
    pub fn roster_for<'a>(&self, speakers: &'a Roster, bills: &'a Roster) -> Option<&'a Roster> {
        match self.focus {
            SpeechField::Speaker => Some(speakers),
            SpeechField::Bill => Some(bills),
            SpeechField::Duration | SpeechField::Side => None,
        }
    }

    /// Clear after a successful add. Bill and side are kept since consecutive
    /// speeches are usually on the same bill and alternate sides.
    pub fn reset_after_submit(&mut self) {
        self.speaker.clear();
        self.duration.clear();
        self.side = self.side.toggled();
        self.focus = SpeechField::Speaker;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionForm {
    pub questioner: TextField,
}
