#![no_main]

use libfuzzer_sys::fuzz_target;

use mparith_core::{Float, RoundingMode};
use mparith_nat::Context;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // keep decimal exponents small enough to finish quickly
    if s.len() > 64 {
        return;
    }
    let ctx = Context::default();

    // Should not panic
    let Ok((x, _)) = Float::parse_float(s, 0, 80, RoundingMode::ToNearestEven, &ctx) else {
        return;
    };
    if x.is_inf() {
        return;
    }

    // hexadecimal output is exact and must read back unchanged
    let hex = x.text('x', -1);
    let (back, _) = Float::parse_float(&hex, 0, 80, RoundingMode::ToNearestEven, &ctx)
        .unwrap_or_else(|e| panic!("{hex:?} from {s:?}: {e}"));
    assert_eq!(back, x, "{hex}");

    let _ = x.text('g', -1);
    let _ = x.text('e', 30);
});
