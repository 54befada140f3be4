//! Wall-clock pacing for push-style audio sinks.
//!
//! The core produces one batch per call and assumes nothing about sample
//! rate; something has to decide how many batches are due right now. For a
//! pull sink (cpal callback) the device clock does that. For a push sink
//! (a pipe into `aplay`) this pacer converts elapsed wall-clock time into a
//! whole number of batches and carries the fractional remainder forward so
//! the long-run rate is exact.

use std::time::{Duration, Instant};

use crate::BATCH_SIZE;

pub struct BatchPacer {
    sample_rate: u32,
    carry: Duration,
    last: Instant,
}

impl BatchPacer {
    pub fn new(sample_rate: u32) -> BatchPacer {
        assert!(sample_rate > 0);
        BatchPacer {
            sample_rate,
            carry: Duration::ZERO,
            last: Instant::now(),
        }
    }

    /// How many whole batches are due after `elapsed` more time has passed.
    /// Time not covered by the returned batches is carried to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let pending = self.carry + elapsed;
        let samples = pending.as_nanos() * u128::from(self.sample_rate) / 1_000_000_000;
        let batches = (samples / BATCH_SIZE as u128) as u32;

        let consumed_nanos = u128::from(batches) * BATCH_SIZE as u128 * 1_000_000_000
            / u128::from(self.sample_rate);
        self.carry = pending - Duration::from_nanos(consumed_nanos as u64);
        batches
    }

    /// `advance` against the real clock since the last poll.
    pub fn poll(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        self.advance(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_milliseconds_produce_whole_batches() {
        let mut pacer = BatchPacer::new(8_000);
        // 8 samples per millisecond = 2 batches
        assert_eq!(pacer.advance(Duration::from_millis(1)), 2);
        assert_eq!(pacer.advance(Duration::from_millis(10)), 20);
    }

    #[test]
    fn fractional_batches_carry_forward() {
        let mut pacer = BatchPacer::new(8_000);
        // 0.6 ms = 4.8 samples: one batch now, the remainder later
        assert_eq!(pacer.advance(Duration::from_micros(600)), 1);
        // another 0.6 ms brings the carry to 1.2 ms = 9.6 samples total,
        // 4 already consumed, so one more batch
        assert_eq!(pacer.advance(Duration::from_micros(600)), 1);
    }

    #[test]
    fn long_run_rate_is_exact() {
        let mut pacer = BatchPacer::new(8_000);
        let mut batches = 0u64;
        for _ in 0..1_000 {
            batches += u64::from(pacer.advance(Duration::from_micros(700)));
        }
        // 0.7 s of audio at 8 kHz = 5600 samples = 1400 batches
        assert_eq!(batches, 1_400);
    }

    #[test]
    fn odd_sample_rates_do_not_drift() {
        let mut pacer = BatchPacer::new(44_100);
        let mut batches = 0u64;
        for _ in 0..1_000 {
            batches += u64::from(pacer.advance(Duration::from_millis(1)));
        }
        // 1 s at 44.1 kHz = 44100 samples = 11025 batches
        assert_eq!(batches, 11_025);
    }
}
