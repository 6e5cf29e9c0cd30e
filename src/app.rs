use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::clock::{SystemTimeSource, TimeSource};
use crate::error::SessionError;
use crate::form::{QuestionForm, SpeechField, SpeechForm};
use crate::ledger::Side;
use crate::session::{Session, SessionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    SpeechEntry,
    QuestionEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line feedback shown under the tables until the next action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<T: TimeSource = SystemTimeSource> {
    pub session: Session<T>,
    pub mode: Mode,
    pub speech_form: SpeechForm,
    pub question_form: QuestionForm,
    pub status: Option<Status>,
}

impl App<SystemTimeSource> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_session(Session::new(config))
    }
}

impl<T: TimeSource> App<T> {
    pub fn with_session(session: Session<T>) -> Self {
        Self {
            session,
            mode: Mode::Normal,
            speech_form: SpeechForm::default(),
            question_form: QuestionForm::default(),
            status: None,
        }
    }

    /// Poll the timer before a redraw
    pub fn on_tick(&mut self) {
        self.session.tick();
    }

    /// Apply one key press. The only error is a corrupt undo history.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Control, SessionError> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Control::Quit);
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::SpeechEntry => {
                self.handle_speech_key(key);
                Ok(Control::Continue)
            }
            Mode::QuestionEntry => {
                self.handle_question_key(key);
                Ok(Control::Continue)
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<Control, SessionError> {
        match key.code {
            KeyCode::Esc => return Ok(Control::Quit),
            KeyCode::Char('s') => {
                if self.speech_form.duration.is_empty() {
                    if let Some(pending) = self.session.pending_duration() {
                        self.speech_form.duration.set(pending);
                    }
                }
                self.speech_form.focus = SpeechField::Speaker;
                self.mode = Mode::SpeechEntry;
            }
            KeyCode::Char('q') => {
                self.mode = Mode::QuestionEntry;
            }
            KeyCode::Char(' ') => match self.session.toggle_timer() {
                Some(display) => {
                    self.speech_form.duration.set(&display);
                    self.status = Some(Status::new(
                        StatusKind::Info,
                        format!("Timer stopped at {display}"),
                    ));
                }
                None => {
                    self.status = Some(Status::new(StatusKind::Info, "Timer started"));
                }
            },
            KeyCode::Char('p') => {
                if self.session.pause_timer() {
                    self.status = Some(Status::new(StatusKind::Info, "Timer paused"));
                }
            }
            KeyCode::Char('u') => {
                let outcome = self.session.undo()?;
                self.status = Some(Status::new(StatusKind::Info, outcome.message()));
            }
            KeyCode::Char('n') => {
                let round = self.session.next_round();
                self.status = Some(Status::new(
                    StatusKind::Info,
                    format!("Round {} started", round.number),
                ));
            }
            KeyCode::Char('R') => {
                self.session.reset();
                self.speech_form = SpeechForm::default();
                self.question_form = QuestionForm::default();
                self.status = Some(Status::new(StatusKind::Info, "Reset to round 1"));
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let total = self.session.round().total_competitors.saturating_add(1);
                self.session.set_total_competitors(total);
            }
            KeyCode::Char('-') => {
                let total = self.session.round().total_competitors.saturating_sub(1);
                self.session.set_total_competitors(total);
            }
            _ => {}
        }
        Ok(Control::Continue)
    }

    fn handle_speech_key(&mut self, key: KeyEvent) {
        let on_side = self.speech_form.focus == SpeechField::Side;
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => self.submit_speech(),
            KeyCode::Tab => self.speech_form.focus = self.speech_form.focus.next(),
            KeyCode::BackTab => self.speech_form.focus = self.speech_form.focus.prev(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if on_side => {
                self.speech_form.side = self.speech_form.side.toggled();
            }
            KeyCode::Char('a') | KeyCode::Char('A') if on_side => {
                self.speech_form.side = Side::Aff;
            }
            KeyCode::Char('n') | KeyCode::Char('N') if on_side => {
                self.speech_form.side = Side::Neg;
            }
            KeyCode::Right => {
                let roster = self
                    .speech_form
                    .roster_for(self.session.speakers(), self.session.bills());
                if let (Some(roster), Some(field)) = (roster, self.speech_form.focused_mut()) {
                    field.accept_completion(roster);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.speech_form.focused_mut() {
                    field.backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.speech_form.focused_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_question_key(&mut self, key: KeyEvent) {
        let field = &mut self.question_form.questioner;
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => self.submit_question(),
            KeyCode::Right => {
                field.accept_completion(self.session.speakers());
            }
            KeyCode::Backspace => field.backspace(),
            KeyCode::Char(c) => field.push(c),
            _ => {}
        }
    }

    fn submit_speech(&mut self) {
        let form = &self.speech_form;
        match self.session.add_speech_as_entered(
            form.speaker.value(),
            form.bill.value(),
            form.side,
            form.duration.value(),
        ) {
            Ok(id) => {
                debug!(%id, "speech form submitted");
                self.speech_form.reset_after_submit();
                self.mode = Mode::Normal;
                self.status = Some(Status::new(StatusKind::Success, "Speech added"));
            }
            Err(e) => self.report(e),
        }
    }

    /// Validation messages go to the status line as is; anything else is
    /// already logged by the session and only gets a generic notice
    fn report(&mut self, e: SessionError) {
        let text = if e.is_user_facing() {
            e.to_string()
        } else {
            "Could not apply that action, see the log".to_string()
        };
        self.status = Some(Status::new(StatusKind::Error, text));
    }

    fn submit_question(&mut self) {
        match self
            .session
            .add_question(self.question_form.questioner.value())
        {
            Ok(id) => {
                debug!(%id, "question form submitted");
                self.question_form.questioner.clear();
                self.mode = Mode::Normal;
                self.status = Some(Status::new(StatusKind::Success, "Question added"));
            }
            Err(e) => self.report(e),
        }
    }
}
