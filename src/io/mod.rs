// Purpose - sample-width reduction for audio sinks, batch pacing

pub mod converter;
pub mod pacer;

pub use pacer::BatchPacer;
