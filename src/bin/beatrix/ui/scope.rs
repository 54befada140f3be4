//! Oscilloscope widget over the most recent synth samples.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

pub fn render_scope(frame: &mut Frame, area: Rect, samples: &[f32]) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    // Braille halves the horizontal resolution need; more points than that
    // just burn cycles.
    let max_points = (area.width as usize).saturating_mul(2).max(2);
    let step = (samples.len() / max_points).max(1);

    let data: Vec<(f64, f64)> = samples
        .iter()
        .step_by(step)
        .enumerate()
        .map(|(i, &sample)| (i as f64 * step as f64, f64::from(sample)))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::LightGreen))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, samples.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
