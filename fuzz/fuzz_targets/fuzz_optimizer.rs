#![no_main]
use libfuzzer_sys::fuzz_target;
use vend_core::optimizer::{OptimizerParams, optimize_with};

fuzz_target!(|input: (f64, f64, f64, Option<f64>)| {
    let (weight, vibration, rpm, reference) = input;
    let params = OptimizerParams {
        medicine_weight: weight,
        ..OptimizerParams::default()
    };
    let r = optimize_with(&params, vibration, rpm, reference);
    // Any input, including NaN and infinities, yields a speed in the anchor range.
    assert!((10..=80).contains(&r.optimal_rpm));
});
