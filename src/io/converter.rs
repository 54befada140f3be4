//! Reduce 16-bit sample batches to whatever width the audio sink speaks.

use crate::matrix::{Batch, Sample};
use crate::BATCH_SIZE;

/// Scale a sample into the [-1.0, 1.0) range cpal's f32 formats expect.
#[inline]
pub fn sample_to_f32(sample: Sample) -> f32 {
    f32::from(sample) / 32_768.0
}

/// Truncate a sample to its low byte, the raw u8 stream `aplay` eats.
#[inline]
pub fn sample_to_u8(sample: Sample) -> u8 {
    (sample as u16 & 0xff) as u8
}

pub fn batch_to_f32(batch: Batch) -> [f32; BATCH_SIZE] {
    batch.map(sample_to_f32)
}

pub fn batch_to_u8(batch: Batch) -> [u8; BATCH_SIZE] {
    batch.map(sample_to_u8)
}
