//! Debug panel: configuration dump plus the disassembled program.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use beatrix::matrix::Config;

pub fn render_program(frame: &mut Frame, area: Rect, config: &Config, listing: &[String]) {
    let title = format!(" Program ({} ops) ", listing.len());
    let block = Block::default().title(title).borders(Borders::ALL);

    let masks: Vec<String> = config
        .columns
        .iter()
        .map(|mask| format!("{:02x}", mask.bits()))
        .collect();

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "constant={} shifts={}/{}/{} audio>>{} t={}",
                config.constant,
                config.shift1,
                config.shift2,
                config.shift3,
                config.audio_shift,
                config.t
            ),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            format!("columns = [{}]", masks.join(" ")),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];

    let visible = (area.height as usize).saturating_sub(2 + lines.len());
    for op in listing.iter().take(visible) {
        lines.push(Line::from(format!("  {op}")));
    }
    if listing.len() > visible {
        lines.push(Line::from(Span::styled(
            format!("  … {} more", listing.len() - visible),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
