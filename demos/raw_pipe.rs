//! Stream the demo patch as raw 8-bit samples on stdout, paced to 8 kHz.
//!
//! Run with: cargo run --example raw_pipe | aplay -r 8000

use std::io::Write;
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{Result as EyreResult, WrapErr};

use beatrix::io::{converter::batch_to_u8, BatchPacer};
use beatrix::Engine;

const SAMPLE_RATE: u32 = 8_000;
const RUN_SECONDS: u64 = 30;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let mut engine = Engine::default();
    let mut pacer = BatchPacer::new(SAMPLE_RATE);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let deadline = std::time::Instant::now() + Duration::from_secs(RUN_SECONDS);
    while std::time::Instant::now() < deadline {
        for _ in 0..pacer.poll() {
            let bytes = batch_to_u8(engine.next_batch());
            out.write_all(&bytes).wrap_err("failed to write samples")?;
        }
        out.flush().wrap_err("failed to flush samples")?;
        thread::sleep(Duration::from_millis(20));
    }

    Ok(())
}
