//! FFT spectrum widget: log-spaced bands rendered as bars.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{BarChart, Block, Borders},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of bands across the panel.
const BANDS: usize = 24;

/// Recompute every N draw frames; the FFT does not need 60 Hz.
const UPDATE_INTERVAL: usize = 4;

/// Bar height range maps to this many dB below full scale.
const FLOOR_DB: f64 = 72.0;

pub struct SpectrumView {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    bands: [u64; BANDS],
    frame_counter: usize,
}

impl SpectrumView {
    pub fn new(fft_size: usize) -> SpectrumView {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        // Hann window keeps bytebeat's hard edges from smearing everywhere
        let window = (0..fft_size)
            .map(|i| {
                let phase = std::f32::consts::TAU * i as f32 / fft_size as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        SpectrumView {
            fft,
            fft_size,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            bands: [0; BANDS],
            frame_counter: 0,
        }
    }

    /// Feed the latest scope window; recomputes on a throttle.
    pub fn update(&mut self, samples: &[f32]) {
        self.frame_counter = self.frame_counter.wrapping_add(1);
        if self.frame_counter % UPDATE_INTERVAL != 0 || samples.len() < self.fft_size {
            return;
        }

        let tail = &samples[samples.len() - self.fft_size..];
        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(tail).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let half = self.fft_size / 2;
        for band in 0..BANDS {
            // log-spaced bin ranges from bin 1 to the Nyquist bin
            let lo = band_edge(band, half);
            let hi = band_edge(band + 1, half).max(lo + 1);
            let peak = self.scratch[lo..hi]
                .iter()
                .map(|c| f64::from(c.norm()))
                .fold(0.0, f64::max);

            let db = 20.0 * (peak / self.fft_size as f64 + 1e-12).log10();
            let scaled = ((db + FLOOR_DB) / FLOOR_DB).clamp(0.0, 1.0);
            self.bands[band] = (scaled * 64.0) as u64;
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let data: Vec<(&str, u64)> = self.bands.iter().map(|&v| ("", v)).collect();

        let chart = BarChart::default()
            .block(Block::default().title(" Spectrum ").borders(Borders::ALL))
            .bar_width(2)
            .bar_gap(1)
            .max(64)
            .bar_style(Style::default().fg(Color::Magenta))
            .value_style(Style::default().fg(Color::Magenta))
            .data(&data);

        frame.render_widget(chart, area);
    }
}

fn band_edge(band: usize, half: usize) -> usize {
    let t = band as f64 / BANDS as f64;
    let edge = (half as f64).powf(t);
    (edge as usize).clamp(1, half)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_monotonic() {
        let half = 256;
        let edges: Vec<usize> = (0..=BANDS).map(|b| band_edge(b, half)).collect();
        for pair in edges.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(edges[BANDS], half);
    }

    #[test]
    fn a_constant_signal_lights_only_the_lowest_band() {
        let mut view = SpectrumView::new(64);
        let samples = vec![0.5f32; 64];
        for _ in 0..UPDATE_INTERVAL {
            view.update(&samples);
        }
        assert!(view.bands[0] > 0);
        assert!(view.bands[BANDS - 1] < view.bands[0]);
    }
}
