//! Engine facade tying the matrix, compiler, and interpreter together.
//!
//! The surrounding application (UI thread, audio callback) talks to this one
//! struct: wiring edits set a dirty flag and the program is rebuilt before
//! the next batch, while numeric edits take effect immediately because the
//! interpreter reads them fresh every call.

use crate::bytecode::Program;
use crate::compile::compile_matrix;
use crate::interp::{interpret_batch, RowStore};
use crate::matrix::{Batch, Config, RowId, Sample, MATRIX_COLS};

/// Maximum meaningful shift for a 16-bit sample.
pub const MAX_SHIFT: u8 = 15;

pub struct Engine {
    config: Config,
    program: Program,
    store: RowStore,
    dirty: bool,
}

impl Engine {
    pub fn new(config: Config) -> Engine {
        let program = compile_matrix(&config);
        Engine {
            config,
            program,
            store: RowStore::new(),
            dirty: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Toggle the connection between `row` and sink column `col`.
    ///
    /// # Panics
    /// Panics if `col` is out of range; column indices are fixed by the
    /// matrix geometry and callers index it directly.
    pub fn toggle(&mut self, row: RowId, col: usize) {
        assert!(col < MATRIX_COLS);
        self.config.columns[col].toggle(row);
        self.dirty = true;
    }

    pub fn set_constant(&mut self, constant: Sample) {
        self.config.constant = constant;
    }

    /// Set one of the three time-row shifts (`index` 0..3), clamped to the
    /// sample width.
    pub fn set_time_shift(&mut self, index: usize, shift: u8) {
        let shift = shift.min(MAX_SHIFT);
        match index {
            0 => self.config.shift1 = shift,
            1 => self.config.shift2 = shift,
            2 => self.config.shift3 = shift,
            _ => panic!("time shift index out of range: {index}"),
        }
    }

    pub fn set_audio_shift(&mut self, shift: u8) {
        self.config.audio_shift = shift.min(MAX_SHIFT);
    }

    /// Rebuild the program from the current wiring.
    pub fn recompile(&mut self) {
        self.program = compile_matrix(&self.config);
        self.dirty = false;
    }

    /// Produce the next output batch, recompiling first if the wiring
    /// changed since the last one.
    pub fn next_batch(&mut self) -> Batch {
        if self.dirty {
            self.recompile();
        }
        interpret_batch(&mut self.config, &self.program, &mut self.store)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Config::demo())
    }
}
