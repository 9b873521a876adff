#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::{BigInt, Sign};

use mparith_core::Int;
use mparith_nat::{Context, Thresholds};

fn big(x: &Int) -> BigInt {
    let sign = if x.is_negative() { Sign::Minus } else { Sign::Plus };
    BigInt::from_bytes_be(sign, &x.to_bytes_be())
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    // first byte picks the sign bits and the split point
    let flags = data[0];
    let split = 1 + usize::from(data[1]) % (data.len() - 1);
    let mut x = Int::from_bytes_be(&data[1..split]);
    let mut y = Int::from_bytes_be(&data[split..]);
    if flags & 1 != 0 {
        x = -x;
    }
    if flags & 2 != 0 {
        y = -y;
    }

    let ctx = Context::with_thresholds(Thresholds {
        karatsuba: 4,
        div_recursive: 6,
        ..Thresholds::default()
    });

    let mut z = Int::new();
    z.mul(&x, &y, &ctx);
    assert_eq!(big(&z), big(&x) * big(&y));

    if y.is_zero() {
        return;
    }
    let (mut q, mut r) = (Int::new(), Int::new());
    q.quo_rem(&mut r, &x, &y, &ctx);
    assert_eq!(big(&q), big(&x) / big(&y));
    assert_eq!(big(&r), big(&x) % big(&y));

    let (mut d, mut m) = (Int::new(), Int::new());
    d.div_mod(&mut m, &x, &y, &ctx);
    assert!(!m.is_negative());
    assert_eq!(big(&d) * big(&y) + big(&m), big(&x));
});
