pub mod bytecode;
pub mod compile;
pub mod engine;
pub mod interp;
pub mod io;
pub mod matrix; // Editable signal-flow matrix state

pub use compile::compile_matrix;
pub use engine::Engine;
pub use interp::interpret_batch;

/// Samples per batch. Every row buffer, the accumulator, and one interpreter
/// call all work in units of this many samples; batching amortizes per-op
/// dispatch cost without spending much memory on buffers.
pub const BATCH_SIZE: usize = 4;
