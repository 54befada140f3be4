//! Matrix-to-bytecode compiler.
//!
//! Walks the wiring backwards from the audio column and emits a linear
//! program that leaves the column's AND-composite in the accumulator. The
//! traversal is a bounded topological sort: a per-compile scheduled set,
//! seeded with the primitive rows, guarantees no row is scheduled twice, so
//! compilation always terminates, even on cyclic wirings, which simply read
//! whatever a row's buffer held before (see `interp`).

use crate::bytecode::{Op, Opcode, Program, MAX_PROGRAM_LEN};
use crate::matrix::{
    Config, RowId, RowSet, AUDIO_COL, FIRST_PRODUCT_COL, FIRST_SUM_COL, FIRST_XOR_COL,
};

/// Compile the current wiring into a program for the audio column.
///
/// Only the column masks are consulted; numeric parameters (constant,
/// shifts) are read at interpretation time, so callers need to recompile
/// after wiring edits and only after wiring edits. Always succeeds.
pub fn compile_matrix(config: &Config) -> Program {
    let mut ctx = CompileCtx {
        config,
        scheduled: RowSet::PRIMITIVES,
        ops: Vec::with_capacity(MAX_PROGRAM_LEN),
    };
    ctx.column(AUDIO_COL);
    Program::new(ctx.ops)
}

/// State threaded through one compile: the wiring being compiled, the rows
/// whose computation is already scheduled, and the program so far.
struct CompileCtx<'a> {
    config: &'a Config,
    scheduled: RowSet,
    ops: Vec<Op>,
}

impl CompileCtx<'_> {
    fn emit(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Ensure every row wired into `col` is computed, then emit the CLEAR
    /// and AND sequence that leaves the column's composite in the
    /// accumulator. Rows go in increasing id order throughout; the order is
    /// what makes compiled byte streams reproducible.
    fn column(&mut self, col: usize) {
        let mask = self.config.columns[col];
        for row in RowId::ALL {
            if mask.contains(row) && !self.scheduled.contains(row) {
                // Mark before descending: a cyclic reference back to this
                // row must not recurse, it reads the stale buffer instead.
                self.scheduled.insert(row);
                self.row(row);
            }
        }

        self.emit(Op::clear());
        for row in mask.iter() {
            self.emit(Op::and(row));
        }
    }

    /// Emit the program for a combinator row: its three feed columns, each
    /// folded into the row's buffer. The first wired column seeds the row
    /// with SET; later wired columns combine with the row's operation.
    /// Unwired feed columns contribute nothing at all; folding their CLEAR
    /// identity in would add, multiply, or xor an all-ones batch.
    fn row(&mut self, row: RowId) {
        let (first_col, combine) = match row {
            RowId::Sum => (FIRST_SUM_COL, Opcode::Add),
            RowId::Product => (FIRST_PRODUCT_COL, Opcode::Mul),
            RowId::Xor => (FIRST_XOR_COL, Opcode::Xor),
            // Primitive rows are pre-seeded in the scheduled set and never
            // reach here; nothing to emit.
            _ => return,
        };

        let mut seeded = false;
        for col in first_col..first_col + 3 {
            if self.config.columns[col].is_empty() {
                continue;
            }
            self.column(col);
            if seeded {
                self.emit(Op::new(combine, row));
            } else {
                self.emit(Op::set(row));
                seeded = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MATRIX_COLS;

    fn dense_config() -> Config {
        let mut config = Config::default();
        for col in 0..MATRIX_COLS {
            config.columns[col] = RowSet::from_bits(0x7f);
        }
        config
    }

    #[test]
    fn empty_matrix_compiles_to_a_lone_clear() {
        let program = compile_matrix(&Config::default());
        assert_eq!(program.to_bytes(), vec![Op::clear().to_byte()]);
    }

    #[test]
    fn audio_wired_to_primitives_needs_no_row_computation() {
        let mut config = Config::default();
        config.columns[AUDIO_COL].insert(RowId::Shift1);
        config.columns[AUDIO_COL].insert(RowId::Shift2);

        let ops: Vec<Op> = compile_matrix(&config).ops().collect();
        assert_eq!(
            ops,
            vec![Op::clear(), Op::and(RowId::Shift1), Op::and(RowId::Shift2)]
        );
    }

    #[test]
    fn sum_row_schedules_its_feed_columns_in_order() {
        let mut config = Config::default();
        config.constant = 1;
        config.columns[FIRST_SUM_COL].insert(RowId::Const);
        config.columns[FIRST_SUM_COL + 1].insert(RowId::Shift1);
        config.columns[AUDIO_COL].insert(RowId::Sum);

        let ops: Vec<Op> = compile_matrix(&config).ops().collect();
        assert_eq!(
            ops,
            vec![
                Op::clear(),
                Op::and(RowId::Const),
                Op::set(RowId::Sum),
                Op::clear(),
                Op::and(RowId::Shift1),
                Op::new(Opcode::Add, RowId::Sum),
                Op::clear(),
                Op::and(RowId::Sum),
            ]
        );
    }

    #[test]
    fn unchanged_wiring_compiles_to_identical_bytes() {
        let config = Config::demo();
        assert_eq!(
            compile_matrix(&config).to_bytes(),
            compile_matrix(&config).to_bytes()
        );
    }

    #[test]
    fn numeric_parameters_do_not_affect_the_program() {
        let mut a = Config::demo();
        let mut b = Config::demo();
        a.constant = 7;
        a.shift2 = 1;
        b.t = 12_345;
        assert_eq!(compile_matrix(&a).to_bytes(), compile_matrix(&b).to_bytes());
    }

    #[test]
    fn dense_matrix_stays_within_the_program_bound() {
        let program = compile_matrix(&dense_config());
        assert!(program.len() <= MAX_PROGRAM_LEN);
        // Every column wired to every row: 10 columns of CLEAR + 7 ANDs,
        // plus a SET and two combines per combinator row.
        assert_eq!(program.len(), 89);
    }

    #[test]
    fn each_combinator_row_is_scheduled_at_most_once() {
        let program = compile_matrix(&dense_config());
        for row in [RowId::Xor, RowId::Product, RowId::Sum] {
            let sets = program
                .ops()
                .filter(|op| op.opcode == Opcode::Set && op.row == row)
                .count();
            assert_eq!(sets, 1, "row {row} seeded more than once");
            let combines = program
                .ops()
                .filter(|op| {
                    matches!(op.opcode, Opcode::Add | Opcode::Mul | Opcode::Xor)
                        && op.row == row
                })
                .count();
            assert_eq!(combines, 2, "row {row} combined the wrong number of times");
        }
    }

    #[test]
    fn cyclic_wiring_terminates_without_recursing() {
        let mut config = Config::default();
        // xor's first feed column references xor itself
        config.columns[FIRST_XOR_COL].insert(RowId::Xor);
        config.columns[AUDIO_COL].insert(RowId::Xor);

        let ops: Vec<Op> = compile_matrix(&config).ops().collect();
        assert_eq!(
            ops,
            vec![
                // xor row, fed by the stale contents of its own buffer
                Op::clear(),
                Op::and(RowId::Xor),
                Op::set(RowId::Xor),
                // audio column
                Op::clear(),
                Op::and(RowId::Xor),
            ]
        );
    }
}
