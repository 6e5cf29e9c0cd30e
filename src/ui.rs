pub mod forms;
pub mod tables;
pub mod timer;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::app::{App, Mode, StatusKind};
use crate::clock::TimeSource;

const HORIZONTAL_MARGIN: u16 = 1;

/// Screen regions, computed once per frame so the cursor can be placed in
/// the same rectangles the widgets were drawn into
pub struct Areas {
    pub header: Rect,
    pub timer: Rect,
    pub speech_form: Rect,
    pub question_form: Rect,
    pub speeches: Rect,
    pub questions: Rect,
    pub ranking: Rect,
    pub status: Rect,
    pub legend: Rect,
}

impl Areas {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Length(6), // timer and forms
                Constraint::Min(5),    // tables
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(45),
                Constraint::Percentage(30),
            ])
            .split(rows[1]);

        let tables = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Percentage(22),
                Constraint::Percentage(33),
            ])
            .split(rows[2]);

        Self {
            header: rows[0],
            timer: controls[0],
            speech_form: controls[1],
            question_form: controls[2],
            speeches: tables[0],
            questions: tables[1],
            ranking: tables[2],
            status: rows[3],
            legend: rows[4],
        }
    }
}

impl<T: TimeSource> Widget for &App<T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let areas = Areas::new(area);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let round = self.session.round();
        let thresholds = self.session.thresholds();
        let header = Paragraph::new(Line::from(vec![
            Span::styled(format!("Round {}", round.number), bold_style.fg(Color::Cyan)),
            Span::raw("   "),
            Span::raw(format!("Competitors {}", round.total_competitors)),
            Span::raw("   "),
            Span::styled(format!("Majority {}", thresholds.majority), bold_style),
            Span::raw("   "),
            Span::styled(format!("2/3 {}", thresholds.two_thirds), bold_style),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Congress PO Tracker"),
        );
        header.render(areas.header, buf);

        timer::render_timer(&self.session.timer_reading(), areas.timer, buf);
        forms::render_speech_form(self, areas.speech_form, buf);
        forms::render_question_form(self, areas.question_form, buf);

        tables::render_speeches(self.session.speeches(), areas.speeches, buf);
        tables::render_questions(self.session.questions(), areas.questions, buf);
        tables::render_ranking(&self.session.ranking(), areas.ranking, buf);

        if let Some(status) = &self.status {
            let color = match status.kind {
                StatusKind::Info => Color::Gray,
                StatusKind::Success => Color::Green,
                StatusKind::Error => Color::Red,
            };
            Paragraph::new(Span::styled(status.text.as_str(), bold_style.fg(color)))
                .render(areas.status, buf);
        }

        let legend = match self.mode {
            Mode::Normal => {
                "(s)peech / (q)uestion / (space) timer / (p)ause / (u)ndo / (n)ext round / (R)eset / (+/-) competitors / (esc)ape"
            }
            Mode::SpeechEntry => {
                "(tab) next field / (→) accept suggestion / (←/→) side / (enter) add / (esc) cancel"
            }
            Mode::QuestionEntry => "(→) accept suggestion / (enter) add / (esc) cancel",
        };
        Paragraph::new(Span::styled(legend, italic_style)).render(areas.legend, buf);
    }
}

/// Draw the whole screen and place the text cursor in the active form
pub fn draw<T: TimeSource>(app: &App<T>, f: &mut Frame) {
    let area = f.area();
    f.render_widget(app, area);

    let areas = Areas::new(area);
    let cursor = match app.mode {
        Mode::Normal => None,
        Mode::SpeechEntry => forms::speech_cursor(&app.speech_form, areas.speech_form),
        Mode::QuestionEntry => Some(forms::question_cursor(
            &app.question_form,
            areas.question_form,
        )),
    };
    if let Some(Position { x, y }) = cursor {
        f.set_cursor_position((x, y));
    }
}
