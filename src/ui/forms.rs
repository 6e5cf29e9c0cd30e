use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::{App, Mode};
use crate::clock::TimeSource;
use crate::form::{QuestionForm, SpeechField, SpeechForm, TextField};
use crate::ledger::{Roster, Side};

/// Columns reserved for the field label, including the focus marker
pub const LABEL_WIDTH: u16 = 12;

fn label_span(label: &str, focused: bool) -> Span<'static> {
    let marker = if focused { "> " } else { "  " };
    let text = format!("{marker}{label:<width$}", width = LABEL_WIDTH as usize - 2);
    if focused {
        Span::styled(
            text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(text, Style::default().fg(Color::Gray))
    }
}

pub fn field_line<'a>(
    label: &str,
    field: &'a TextField,
    focused: bool,
    roster: Option<&'a Roster>,
) -> Line<'a> {
    let mut spans = vec![label_span(label, focused), Span::raw(field.value())];
    if focused {
        if let Some(tail) = roster.and_then(|r| field.completion_tail(r)) {
            spans.push(Span::styled(tail, Style::default().fg(Color::DarkGray)));
        }
    }
    Line::from(spans)
}

pub fn side_line(side: Side, focused: bool) -> Line<'static> {
    let selected = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let unselected = Style::default().fg(Color::Gray);
    let style_for = |s: Side| if s == side { selected } else { unselected };

    Line::from(vec![
        label_span("Side", focused),
        Span::styled(" Aff ", style_for(Side::Aff)),
        Span::raw(" "),
        Span::styled(" Neg ", style_for(Side::Neg)),
    ])
}

fn form_block(title: &str, active: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if active {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

pub fn render_speech_form<T: TimeSource>(app: &App<T>, area: Rect, buf: &mut Buffer) {
    let form = &app.speech_form;
    let active = app.mode == Mode::SpeechEntry;
    let focus = |f: SpeechField| active && form.focus == f;

    let lines = vec![
        field_line(
            "Speaker",
            &form.speaker,
            focus(SpeechField::Speaker),
            Some(app.session.speakers()),
        ),
        field_line(
            "Bill",
            &form.bill,
            focus(SpeechField::Bill),
            Some(app.session.bills()),
        ),
        field_line(
            "Time (m:ss)",
            &form.duration,
            focus(SpeechField::Duration),
            None,
        ),
        side_line(form.side, focus(SpeechField::Side)),
    ];

    Paragraph::new(lines)
        .block(form_block("Add Speech (s)", active))
        .render(area, buf);
}

pub fn render_question_form<T: TimeSource>(app: &App<T>, area: Rect, buf: &mut Buffer) {
    let active = app.mode == Mode::QuestionEntry;
    let line = field_line(
        "Questioner",
        &app.question_form.questioner,
        active,
        Some(app.session.speakers()),
    );

    Paragraph::new(line)
        .block(form_block("Add Question (q)", active))
        .render(area, buf);
}

fn cursor_in(area: Rect, row: u16, field: &TextField) -> Position {
    let width = u16::try_from(field.display_width()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(1 + LABEL_WIDTH)
        .saturating_add(width);
    Position {
        x: x.min(area.right().saturating_sub(2)),
        y: area
            .y
            .saturating_add(1 + row)
            .min(area.bottom().saturating_sub(1)),
    }
}

/// Text cursor for the focused speech field; none on the side selector
pub fn speech_cursor(form: &SpeechForm, area: Rect) -> Option<Position> {
    let (row, field) = match form.focus {
        SpeechField::Speaker => (0, &form.speaker),
        SpeechField::Bill => (1, &form.bill),
        SpeechField::Duration => (2, &form.duration),
        SpeechField::Side => return None,
    };
    Some(cursor_in(area, row, field))
}

pub fn question_cursor(form: &QuestionForm, area: Rect) -> Position {
    cursor_in(area, 0, &form.questioner)
}
