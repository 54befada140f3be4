//! Bytecode the matrix compiles down to.
//!
//! Every instruction is an opcode plus a row id. The interpreter keeps a
//! single accumulator batch: AND folds row buffers into it, CLEAR resets it
//! to the all-bits-set AND identity, and SET/ADD/MUL/XOR store it back into
//! a combinator row. In-memory programs use the tagged `Op` type; the packed
//! 4+4-bit byte encoding the original hardware build used is kept for byte
//! dumps, sizing, and determinism checks.

use std::fmt;

use crate::matrix::{RowId, MATRIX_COLS, MATRIX_ROWS};

/// Longest program the compiler can emit: one CLEAR plus up to seven ANDs
/// per column, plus a SET and two combine ops per combinator row.
pub const MAX_PROGRAM_LEN: usize = (MATRIX_ROWS + 1) * MATRIX_COLS + 3 * 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// accumulator &= row
    And = 0,
    /// accumulator = all bits set (the AND identity); row id unused
    Clear = 1,
    /// row = accumulator
    Set = 2,
    /// row += accumulator, wrapping
    Add = 3,
    /// row *= accumulator, wrapping
    Mul = 4,
    /// row ^= accumulator
    Xor = 5,
}

impl Opcode {
    fn from_nibble(nibble: u8) -> Option<Opcode> {
        match nibble {
            0 => Some(Opcode::And),
            1 => Some(Opcode::Clear),
            2 => Some(Opcode::Set),
            3 => Some(Opcode::Add),
            4 => Some(Opcode::Mul),
            5 => Some(Opcode::Xor),
            _ => None,
        }
    }

    fn mnemonic(self) -> &'static str {
        match self {
            Opcode::And => "and",
            Opcode::Clear => "clear",
            Opcode::Set => "set",
            Opcode::Add => "add",
            Opcode::Mul => "mul",
            Opcode::Xor => "xor",
        }
    }
}

/// One instruction. CLEAR carries a row id too (always `Const`) so the
/// packed encoding stays a plain bijection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Op {
    pub opcode: Opcode,
    pub row: RowId,
}

impl Op {
    pub fn new(opcode: Opcode, row: RowId) -> Op {
        Op { opcode, row }
    }

    pub fn clear() -> Op {
        Op::new(Opcode::Clear, RowId::Const)
    }

    pub fn and(row: RowId) -> Op {
        Op::new(Opcode::And, row)
    }

    pub fn set(row: RowId) -> Op {
        Op::new(Opcode::Set, row)
    }

    /// Pack into one byte: row id in the high nibble, opcode in the low.
    /// Caps the design at 16 rows and 16 opcodes, plenty for a 7-row matrix.
    pub fn to_byte(self) -> u8 {
        (self.row as u8) << 4 | self.opcode as u8
    }

    /// Decode a packed byte. `None` for bytes no compiler would emit.
    pub fn from_byte(byte: u8) -> Option<Op> {
        let opcode = Opcode::from_nibble(byte & 0x0f)?;
        let row = RowId::from_index((byte >> 4) as usize)?;
        Some(Op { opcode, row })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode {
            Opcode::Clear => f.write_str("clear"),
            opcode => write!(f, "{} {}", opcode.mnemonic(), self.row),
        }
    }
}

/// A compiled program: the linear instruction sequence that computes the
/// audio column's composite into the accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub(crate) fn new(ops: Vec<Op>) -> Program {
        debug_assert!(ops.len() <= MAX_PROGRAM_LEN);
        Program { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> impl Iterator<Item = Op> + '_ {
        self.ops.iter().copied()
    }

    /// Packed byte image of the program. Two compiles of the same wiring
    /// produce identical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.ops.iter().map(|op| op.to_byte()).collect()
    }

    /// One mnemonic line per instruction, for the debug panel.
    pub fn disassemble(&self) -> Vec<String> {
        self.ops.iter().map(|op| op.to_string()).collect()
    }
}
