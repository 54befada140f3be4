//! The editable signal-flow matrix.
//!
//! Seven source rows feed ten sink columns through togglable connections.
//! Each column AND-combines the rows wired into it; columns 0-2 feed the sum
//! row, 3-5 the product row, 6-8 the xor row, and column 9 is the audio
//! output. Everything here is plain data; the compiler and interpreter give
//! it meaning.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::BATCH_SIZE;

/// One audio sample. All arithmetic on samples wraps silently; the
/// wraparound is load-bearing: the waveform's texture depends on it.
pub type Sample = i16;

/// One batch of samples, produced and consumed as a unit.
pub type Batch = [Sample; BATCH_SIZE];

pub const MATRIX_ROWS: usize = 7;
pub const MATRIX_COLS: usize = 10;

/// First of the three columns feeding the sum row.
pub const FIRST_SUM_COL: usize = 0;
/// First of the three columns feeding the product row.
pub const FIRST_PRODUCT_COL: usize = 3;
/// First of the three columns feeding the xor row.
pub const FIRST_XOR_COL: usize = 6;
/// The output column: its AND-composite, right-shifted, is what you hear.
pub const AUDIO_COL: usize = 9;

/// Identifies one of the seven matrix rows.
///
/// The numeric order matters: the compiler walks rows in increasing id order
/// and the emitted bytecode depends on it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum RowId {
    /// Broadcast constant.
    Const = 0,
    /// Time counter shifted right by `Config::shift1`.
    Shift1 = 1,
    /// Time counter shifted right by `Config::shift2`.
    Shift2 = 2,
    /// Time counter shifted right by `Config::shift3`.
    Shift3 = 3,
    /// XOR of its three feed columns.
    Xor = 4,
    /// Product of its three feed columns.
    Product = 5,
    /// Sum of its three feed columns.
    Sum = 6,
}

impl RowId {
    /// All rows, in increasing id order.
    pub const ALL: [RowId; MATRIX_ROWS] = [
        RowId::Const,
        RowId::Shift1,
        RowId::Shift2,
        RowId::Shift3,
        RowId::Xor,
        RowId::Product,
        RowId::Sum,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<RowId> {
        RowId::ALL.get(index).copied()
    }

    /// Short name used by the disassembler and the grid labels.
    pub fn label(self) -> &'static str {
        match self {
            RowId::Const => "const",
            RowId::Shift1 => "shift1",
            RowId::Shift2 => "shift2",
            RowId::Shift3 => "shift3",
            RowId::Xor => "xor",
            RowId::Product => "product",
            RowId::Sum => "sum",
        }
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of rows, packed one bit per row.
///
/// Doubles as a column's connection mask and as the compiler's
/// already-scheduled set. Construction goes through `RowId`, so bits beyond
/// the seven rows are unrepresentable, which is the mask-validation boundary the
/// surrounding application would otherwise have to police.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowSet(u8);

impl RowSet {
    pub const EMPTY: RowSet = RowSet(0);

    /// The four rows that need no computation: the constant and the three
    /// time-derived rows. Used to seed the compiler's scheduled set.
    pub const PRIMITIVES: RowSet = RowSet(
        1 << RowId::Const as u8
            | 1 << RowId::Shift1 as u8
            | 1 << RowId::Shift2 as u8
            | 1 << RowId::Shift3 as u8,
    );

    /// Build a set from raw bits, discarding anything beyond the seven rows.
    pub fn from_bits(bits: u8) -> RowSet {
        RowSet(bits & ((1 << MATRIX_ROWS) - 1))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, row: RowId) -> bool {
        self.0 & (1 << row as u8) != 0
    }

    pub fn insert(&mut self, row: RowId) {
        self.0 |= 1 << row as u8;
    }

    pub fn toggle(&mut self, row: RowId) {
        self.0 ^= 1 << row as u8;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Rows in the set, in increasing id order.
    pub fn iter(self) -> impl Iterator<Item = RowId> {
        RowId::ALL.into_iter().filter(move |&r| self.contains(r))
    }
}

/// The whole editable state of the synthesizer.
///
/// Numeric fields are read fresh on every interpreted batch, so edits to
/// them take effect immediately. The `columns` wiring is only consulted at
/// compile time: change it and recompile.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Value broadcast across the constant row.
    pub constant: Sample,
    /// Right shift applied to `t` for the first time row.
    pub shift1: u8,
    /// Right shift applied to `t` for the second time row.
    pub shift2: u8,
    /// Right shift applied to `t` for the third time row.
    pub shift3: u8,
    /// Arithmetic right shift applied to the audio column's composite.
    pub audio_shift: u8,
    /// Which rows feed each of the ten sink columns.
    pub columns: [RowSet; MATRIX_COLS],
    /// Running time counter. Wraps at the sample width, which bounds the
    /// waveform's fundamental period.
    pub t: Sample,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            constant: 0,
            shift1: 0,
            shift2: 0,
            shift3: 0,
            audio_shift: 0,
            columns: [RowSet::EMPTY; MATRIX_COLS],
            t: 0,
        }
    }
}

impl Config {
    /// The seed patch: audio is `(t & (t >> 8)) >> 8`, with some extra
    /// wiring left on the grid for the player to pull into the mix.
    pub fn demo() -> Self {
        let mut columns = [RowSet::EMPTY; MATRIX_COLS];
        let wire = |columns: &mut [RowSet; MATRIX_COLS], col: usize, rows: &[RowId]| {
            for &row in rows {
                columns[col].insert(row);
            }
        };
        wire(&mut columns, 0, &[RowId::Shift1]);
        wire(&mut columns, 1, &[RowId::Shift2]);
        wire(&mut columns, 3, &[RowId::Const, RowId::Shift1]);
        wire(&mut columns, 4, &[RowId::Shift1]);
        wire(&mut columns, 7, &[RowId::Sum]);
        wire(&mut columns, 8, &[RowId::Shift2]);
        wire(&mut columns, AUDIO_COL, &[RowId::Shift1, RowId::Shift2]);

        Config {
            constant: 160 << 6,
            shift1: 0,
            shift2: 8,
            shift3: 3,
            audio_shift: 8,
            columns,
            t: 0,
        }
    }
}
