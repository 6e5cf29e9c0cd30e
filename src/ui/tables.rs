use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

use crate::ledger::{QuestionRecord, Side, SpeechRecord};
use crate::scoreboard::Standing;

const STAMP_FORMAT: &str = "%H:%M:%S";

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Rows that fit inside a bordered table with a header line
fn visible_capacity(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

/// Newest entries are at the end; keep the tail that fits
fn tail<T>(items: &[T], capacity: usize) -> &[T] {
    &items[items.len().saturating_sub(capacity)..]
}

/// Pure presenter for a single speech row. `number` is 1-based.
pub fn present_speech(number: usize, record: &SpeechRecord) -> Row<'static> {
    let side_color = match record.side {
        Side::Aff => Color::Green,
        Side::Neg => Color::Magenta,
    };
    let duration = if record.duration.is_empty() {
        "—".to_string()
    } else {
        record.duration.clone()
    };

    Row::new(vec![
        Cell::from(number.to_string()),
        Cell::from(record.speaker.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(record.bill.clone()),
        Cell::from(record.side.to_string()).style(Style::default().fg(side_color)),
        Cell::from(duration),
        Cell::from(record.timestamp.format(STAMP_FORMAT).to_string()),
        Cell::from(record.round.to_string()),
    ])
}

pub fn present_question(record: &QuestionRecord) -> Row<'static> {
    Row::new(vec![
        Cell::from(record.questioner.clone()),
        Cell::from(record.timestamp.format(STAMP_FORMAT).to_string()),
        Cell::from(record.round.to_string()),
    ])
}

pub fn present_standing(place: usize, standing: &Standing) -> Row<'static> {
    let style = if place == 1 {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(place.to_string()),
        Cell::from(standing.participant.clone()),
        Cell::from(format!("{:.1}", standing.score)),
        Cell::from(standing.speeches.to_string()),
        Cell::from(standing.questions.to_string()),
    ])
    .style(style)
}

pub fn render_speeches(speeches: &[SpeechRecord], area: Rect, buf: &mut Buffer) {
    let visible = tail(speeches, visible_capacity(area));
    let offset = speeches.len() - visible.len();
    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, record)| present_speech(offset + i + 1, record))
        .collect();

    let header = Row::new(vec!["#", "Speaker", "Bill", "Side", "Time", "Stamp", "Rd"])
        .style(header_style());
    let widths = [
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Min(8),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(3),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Speeches ({})", speeches.len())),
        )
        .column_spacing(1)
        .render(area, buf);
}

pub fn render_questions(questions: &[QuestionRecord], area: Rect, buf: &mut Buffer) {
    let rows: Vec<Row> = tail(questions, visible_capacity(area))
        .iter()
        .map(present_question)
        .collect();

    let header = Row::new(vec!["Questioner", "Stamp", "Rd"]).style(header_style());
    let widths = [
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Length(3),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Questions ({})", questions.len())),
        )
        .column_spacing(1)
        .render(area, buf);
}

/// Ranking is shown from the top, so the leaders stay visible
pub fn render_ranking(ranking: &[Standing], area: Rect, buf: &mut Buffer) {
    let rows: Vec<Row> = ranking
        .iter()
        .take(visible_capacity(area))
        .enumerate()
        .map(|(i, standing)| present_standing(i + 1, standing))
        .collect();

    let header = Row::new(vec!["#", "Speaker", "Score", "Sp", "Q"]).style(header_style());
    let widths = [
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(3),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Ranking"))
        .column_spacing(1)
        .render(area, buf);
}
