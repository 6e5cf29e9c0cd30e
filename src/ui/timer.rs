use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::clock::{TimerReading, TimerTier};

pub fn tier_color(tier: TimerTier) -> Color {
    match tier {
        TimerTier::Neutral => Color::Reset,
        TimerTier::Warning => Color::Yellow,
        TimerTier::Elevated => Color::LightRed,
        TimerTier::Critical => Color::Red,
    }
}

pub fn tier_style(tier: TimerTier) -> Style {
    let style = Style::default()
        .fg(tier_color(tier))
        .add_modifier(Modifier::BOLD);
    if tier == TimerTier::Critical {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

fn state_label(reading: &TimerReading) -> &'static str {
    if reading.running {
        "● running"
    } else if reading.elapsed.is_zero() {
        "■ stopped"
    } else {
        "‖ paused"
    }
}

pub fn render_timer(reading: &TimerReading, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            format!(" {} ", reading.display),
            tier_style(reading.tier),
        )),
        Line::from(Span::styled(
            state_label(reading),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Timer"))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn reading(secs: u64, running: bool, tier: TimerTier) -> TimerReading {
        TimerReading {
            running,
            elapsed: Duration::from_secs(secs),
            display: crate::clock::format_elapsed(Duration::from_secs(secs)),
            tier,
        }
    }

    #[test]
    fn tier_colors_escalate() {
        assert_eq!(tier_color(TimerTier::Neutral), Color::Reset);
        assert_eq!(tier_color(TimerTier::Warning), Color::Yellow);
        assert_eq!(tier_color(TimerTier::Elevated), Color::LightRed);
        assert_eq!(tier_color(TimerTier::Critical), Color::Red);
        assert!(tier_style(TimerTier::Critical)
            .add_modifier
            .contains(Modifier::REVERSED));
    }

    #[test]
    fn state_labels() {
        assert_eq!(state_label(&reading(0, false, TimerTier::Neutral)), "■ stopped");
        assert_eq!(state_label(&reading(3, true, TimerTier::Neutral)), "● running");
        assert_eq!(state_label(&reading(3, false, TimerTier::Neutral)), "‖ paused");
    }

    #[test]
    fn critical_reading_is_drawn_in_red() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        render_timer(&reading(185, true, TimerTier::Critical), area, &mut buf);

        let content: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("3:05"));
        let digit = buf
            .content
            .iter()
            .find(|c| c.symbol() == "3")
            .expect("timer digits rendered");
        assert_eq!(digit.fg, Color::Red);
    }
}
