use tracing::{error, info, warn};

use crate::clock::{Clock, SystemTimeSource, TimeSource, TimerReading, TimerSettings};
use crate::error::SessionError;
use crate::ledger::{Ledger, QuestionRecord, RecordId, RecordKind, Roster, Side, SpeechRecord};
use crate::round::{RoundState, Thresholds};
use crate::scoreboard::{ParticipantStats, ScoreBoard, Standing};
use crate::undo::{UndoOutcome, UndoStack};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub total_competitors: u32,
    pub timer: TimerSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_competitors: 16,
            timer: TimerSettings::default(),
        }
    }
}

/// Everything the presiding officer is tracking. Each method is one user
/// action: it either applies fully or returns an error without mutating.
#[derive(Debug)]
pub struct Session<T: TimeSource = SystemTimeSource> {
    round: RoundState,
    ledger: Ledger,
    scoreboard: ScoreBoard,
    undo: UndoStack,
    clock: Clock<T>,
    pending_duration: Option<String>,
}

impl Session<SystemTimeSource> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_time_source(SystemTimeSource, config)
    }
}

impl Default for Session<SystemTimeSource> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<T: TimeSource> Session<T> {
    pub fn with_time_source(source: T, config: SessionConfig) -> Self {
        Self {
            round: RoundState::new(config.total_competitors),
            ledger: Ledger::new(),
            scoreboard: ScoreBoard::new(),
            undo: UndoStack::new(),
            clock: Clock::with_source(source, config.timer),
            pending_duration: None,
        }
    }

    /// An empty `duration` falls back to the value captured by the last
    /// `stop_timer`, which is consumed by a successful add.
    pub fn add_speech(
        &mut self,
        speaker: &str,
        bill: &str,
        side: Side,
        duration: &str,
    ) -> Result<RecordId, SessionError> {
        let duration = if duration.trim().is_empty() {
            self.pending_duration.clone().unwrap_or_default()
        } else {
            duration.to_string()
        };
        self.add_speech_as_entered(speaker, bill, side, &duration)
    }

    /// Store `duration` exactly as given, blank included. Forms that were
    /// prefilled from the stopped timer submit through here.
    pub fn add_speech_as_entered(
        &mut self,
        speaker: &str,
        bill: &str,
        side: Side,
        duration: &str,
    ) -> Result<RecordId, SessionError> {
        let id = self
            .ledger
            .add_speech(speaker, bill, side, duration, self.round.number)
            .inspect_err(|e| warn!(error = %e, "speech rejected"))?;

        let speaker = speaker.trim();
        self.scoreboard.record(RecordKind::Speech, speaker);
        self.undo.push(RecordKind::Speech, id, speaker);
        self.pending_duration = None;
        info!(round = self.round.number, %id, speaker, bill = bill.trim(), %side, "speech added");
        Ok(id)
    }

    pub fn add_question(&mut self, questioner: &str) -> Result<RecordId, SessionError> {
        let id = self
            .ledger
            .add_question(questioner, self.round.number)
            .inspect_err(|e| warn!(error = %e, "question rejected"))?;

        let questioner = questioner.trim();
        self.scoreboard.record(RecordKind::Question, questioner);
        self.undo.push(RecordKind::Question, id, questioner);
        info!(round = self.round.number, %id, questioner, "question added");
        Ok(id)
    }

    /// Reverse the most recent add. A ledger miss here means the history is
    /// corrupt and is returned as an error; a scoreboard underflow is only
    /// logged.
    pub fn undo(&mut self) -> Result<UndoOutcome, SessionError> {
        let Some(entry) = self.undo.pop() else {
            info!("nothing to undo");
            return Ok(UndoOutcome::NothingToUndo);
        };

        if let Err(e) = self.ledger.remove(entry.kind, entry.id) {
            error!(error = %e, kind = %entry.kind, id = %entry.id, "undo history out of sync with ledger");
            return Err(e);
        }
        if let Err(e) = self.scoreboard.unrecord(entry.kind, &entry.participant) {
            error!(error = %e, "scoreboard out of sync with undo history");
        }

        info!(kind = %entry.kind, id = %entry.id, participant = %entry.participant, "undid last action");
        Ok(UndoOutcome::Applied(entry))
    }

    pub fn next_round(&mut self) -> RoundState {
        self.round.advance();
        self.clear_round_activity();
        info!(round = self.round.number, "advanced to next round");
        self.round
    }

    pub fn reset(&mut self) -> RoundState {
        self.round.reset();
        self.clear_round_activity();
        info!("session reset to round 1");
        self.round
    }

    fn clear_round_activity(&mut self) {
        self.ledger.clear();
        self.scoreboard.clear();
        self.undo.clear();
    }

    pub fn set_total_competitors(&mut self, n: u32) -> Thresholds {
        let thresholds = self.round.set_total_competitors(n);
        info!(
            total = self.round.total_competitors,
            majority = thresholds.majority,
            two_thirds = thresholds.two_thirds,
            "total competitors updated"
        );
        thresholds
    }

    pub fn thresholds(&self) -> Thresholds {
        self.round.thresholds()
    }

    pub fn start_timer(&mut self) -> bool {
        let started = self.clock.start();
        if started {
            info!("timer started");
        }
        started
    }

    /// Returns false when the timer was not running
    pub fn pause_timer(&mut self) -> bool {
        if !self.clock.is_running() {
            return false;
        }
        let elapsed = self.clock.pause();
        info!(elapsed_secs = elapsed.as_secs(), "timer paused");
        true
    }

    /// Stop the timer and keep its value as the default duration of the
    /// next speech
    pub fn stop_timer(&mut self) -> String {
        let shown = self.clock.stop();
        info!(elapsed = %shown, "timer stopped");
        self.pending_duration = Some(shown.clone());
        shown
    }

    pub fn toggle_timer(&mut self) -> Option<String> {
        if self.clock.is_running() {
            Some(self.stop_timer())
        } else {
            self.start_timer();
            None
        }
    }

    /// Poll the clock; call once per render
    pub fn tick(&mut self) -> TimerReading {
        self.clock.tick();
        self.clock.reading()
    }

    pub fn timer_reading(&self) -> TimerReading {
        self.clock.reading()
    }

    pub fn pending_duration(&self) -> Option<&str> {
        self.pending_duration.as_deref()
    }

    pub fn ranking(&self) -> Vec<Standing> {
        self.scoreboard.ranking()
    }

    pub fn stats(&self, participant: &str) -> Option<&ParticipantStats> {
        self.scoreboard.get(participant)
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn speeches(&self) -> &[SpeechRecord] {
        self.ledger.speeches()
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        self.ledger.questions()
    }

    pub fn speakers(&self) -> &Roster {
        self.ledger.speakers()
    }

    pub fn bills(&self) -> &Roster {
        self.ledger.bills()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}
