//! Application wiring: audio device, shared engine, terminal handoff.

use std::sync::{Arc, Mutex};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use beatrix::io::converter::sample_to_f32;
use beatrix::{Engine, BATCH_SIZE};

use super::ui::UiApp;

/// The matrix's native rate. The original hardware clocked its counter at
/// 8 kHz and the patch vocabulary (shift amounts, wrap period) assumes it,
/// so the synth runs here and gets sample-held up to the device rate.
pub const SYNTH_RATE: u32 = 8_000;

/// Ring-buffer capacity for scope samples headed to the UI.
const SCOPE_CAPACITY: usize = 1 << 14;

pub struct App {
    engine: Engine,
}

impl App {
    pub fn new() -> App {
        App {
            engine: Engine::default(),
        }
    }

    /// Run the application (takes over the terminal, plays audio).
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let device_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        // Hold each synth sample for this many device frames.
        let hold = (device_rate / SYNTH_RATE).max(1) as usize;

        let engine = Arc::new(Mutex::new(self.engine));
        let (mut scope_tx, scope_rx) = rtrb::RingBuffer::<f32>::new(SCOPE_CAPACITY);

        let callback_engine = engine.clone();
        let mut pending = [0.0f32; BATCH_SIZE];
        let mut pending_pos = BATCH_SIZE;
        let mut current = 0.0f32;
        let mut repeat_left = 0usize;

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let mut engine = callback_engine.lock().unwrap();

                for frame in data.chunks_mut(channels) {
                    if repeat_left == 0 {
                        if pending_pos == BATCH_SIZE {
                            let batch = engine.next_batch();
                            for (slot, sample) in pending.iter_mut().zip(batch) {
                                *slot = sample_to_f32(sample);
                            }
                            pending_pos = 0;
                        }
                        current = pending[pending_pos];
                        pending_pos += 1;
                        repeat_left = hold;
                        // drop scope samples when the UI lags
                        let _ = scope_tx.push(current);
                    }
                    repeat_left -= 1;

                    // mono to all channels
                    for out in frame.iter_mut() {
                        *out = current;
                    }
                }
            },
            |err| eprintln!("audio error: {err}"),
            None,
        )?;
        stream.play()?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(engine, scope_rx).run(&mut terminal);
        ratatui::restore();
        result
    }
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}
