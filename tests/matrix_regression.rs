use beatrix::bytecode::MAX_PROGRAM_LEN;
use beatrix::io::converter::sample_to_f32;
use beatrix::matrix::{Config, Sample};
use beatrix::{compile_matrix, Engine, BATCH_SIZE};

/// Batches in one full period of the 16-bit time counter.
const PERIOD_BATCHES: usize = 1 << 16 >> 2;

#[test]
fn demo_patch_renders_a_full_period() {
    let mut engine = Engine::new(Config::demo());
    let mut heard_something = false;
    let mut peak = 0.0f32;

    for _ in 0..PERIOD_BATCHES {
        let batch = engine.next_batch();
        for sample in batch {
            let value = sample_to_f32(sample);
            assert!((-1.0..1.0).contains(&value));
            if sample != 0 {
                heard_something = true;
            }
            peak = peak.max(value.abs());
        }
    }

    assert!(heard_something, "demo patch rendered a whole period of silence");
    assert!(peak > 0.0);
    // a full period brings the counter back to its start
    assert_eq!(engine.config().t, 0);
}

#[test]
fn two_engines_render_identical_audio() {
    let mut a = Engine::new(Config::demo());
    let mut b = Engine::new(Config::demo());

    for _ in 0..4_096 {
        assert_eq!(a.next_batch(), b.next_batch());
    }
}

#[test]
fn time_counter_tracks_batches_rendered() {
    let mut engine = Engine::new(Config::demo());
    let calls = 10_000usize;
    for _ in 0..calls {
        engine.next_batch();
    }

    let expected = (calls * BATCH_SIZE) as u16 as Sample;
    assert_eq!(engine.config().t, expected);
}

#[test]
fn every_wiring_compiles_within_bounds() {
    // one-hot and a few mixed masks across every column
    for bits in [0x01u8, 0x40, 0x55, 0x7f] {
        let mut config = Config::default();
        for mask in config.columns.iter_mut() {
            *mask = beatrix::matrix::RowSet::from_bits(bits);
        }
        let program = compile_matrix(&config);
        assert!(program.len() <= MAX_PROGRAM_LEN);
        assert!(!program.is_empty());
    }
}
