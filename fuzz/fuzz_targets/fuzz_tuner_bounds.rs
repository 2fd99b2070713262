#![no_main]
use std::sync::Arc;

use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use yatuli_core::mocks::ScriptedInput;
use yatuli_core::{RangeCfg, TunerCfg, build_tuner};
use yatuli_traits::ManualClock;

#[derive(Debug, Arbitrary)]
struct Input {
    start: i32,
    span: u16,
    step: u16,
    edge_step: u16,
    raws: Vec<u16>,
    sets: Vec<i32>,
}

fuzz_target!(|input: Input| {
    let start = i64::from(input.start);
    let end = start + i64::from(input.span);
    let raws: Vec<u16> = input.raws.iter().map(|r| r % 1024).collect();
    let polls = raws.len();
    let clock = ManualClock::new();
    let cfg = TunerCfg::new(
        0,
        RangeCfg::new(start, end, u32::from(input.step), u32::from(input.edge_step)),
    );
    let Ok(mut t) = build_tuner(
        ScriptedInput::new(raws),
        cfg,
        Some(Arc::new(clock.clone())),
    ) else {
        return;
    };
    let mut sets = input.sets.iter();
    for i in 0..polls {
        clock.advance(97);
        let _ = t.poll();
        if i % 7 == 0 {
            if let Some(&v) = sets.next() {
                let _ = t.set(i64::from(v));
            }
        }
        assert!(t.value() >= start && t.value() <= end);
    }
});
