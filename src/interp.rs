//! Accumulator-based bytecode interpreter.
//!
//! One call executes a compiled program against the row store and yields one
//! output batch. All sample arithmetic wraps at the 16-bit width and all
//! shifts are arithmetic; both are part of the sound, not hazards.

use crate::bytecode::{Op, Opcode, Program};
use crate::matrix::{Batch, Config, RowId, Sample, MATRIX_ROWS};
use crate::BATCH_SIZE;

/// The seven row buffers plus the accumulator.
///
/// Rows are only written while a program runs. Combinator rows keep their
/// last-batch contents between calls, which is exactly what a cyclic wiring
/// reads; primitive rows are repopulated fresh every batch.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: [Batch; MATRIX_ROWS],
    accumulator: Batch,
}

impl RowStore {
    pub fn new() -> RowStore {
        RowStore::default()
    }

    fn fill_time_row(&mut self, row: RowId, t: Sample, shift: u8) {
        let buf = &mut self.rows[row.index()];
        for (i, sample) in buf.iter_mut().enumerate() {
            *sample = t.wrapping_add(i as Sample).wrapping_shr(shift as u32);
        }
    }
}

/// Execute one compiled program for the current batch.
///
/// Populates the primitive rows from `config`, runs every instruction, then
/// returns the accumulator right-shifted by the output shift. The only
/// state that persists across calls is the advanced time counter (and the
/// combinator rows' leftover contents, which cyclic wirings rely on).
pub fn interpret_batch(config: &mut Config, program: &Program, store: &mut RowStore) -> Batch {
    store.rows[RowId::Const.index()] = [config.constant; BATCH_SIZE];
    store.fill_time_row(RowId::Shift1, config.t, config.shift1);
    store.fill_time_row(RowId::Shift2, config.t, config.shift2);
    store.fill_time_row(RowId::Shift3, config.t, config.shift3);

    for op in program.ops() {
        step(store, op);
    }

    let mut out = store.accumulator;
    for sample in &mut out {
        *sample = sample.wrapping_shr(config.audio_shift as u32);
    }

    config.t = config.t.wrapping_add(BATCH_SIZE as Sample);
    out
}

fn step(store: &mut RowStore, op: Op) {
    let index = op.row.index();
    match op.opcode {
        Opcode::And => {
            let row = store.rows[index];
            for (acc, sample) in store.accumulator.iter_mut().zip(row) {
                *acc &= sample;
            }
        }
        Opcode::Clear => store.accumulator = [-1; BATCH_SIZE],
        Opcode::Set => store.rows[index] = store.accumulator,
        Opcode::Add => {
            let acc = store.accumulator;
            for (sample, a) in store.rows[index].iter_mut().zip(acc) {
                *sample = sample.wrapping_add(a);
            }
        }
        Opcode::Mul => {
            let acc = store.accumulator;
            for (sample, a) in store.rows[index].iter_mut().zip(acc) {
                *sample = sample.wrapping_mul(a);
            }
        }
        Opcode::Xor => {
            let acc = store.accumulator;
            for (sample, a) in store.rows[index].iter_mut().zip(acc) {
                *sample ^= a;
            }
        }
    }
}
