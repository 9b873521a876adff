//! End-to-end checks of documented `Int` and `Float` behavior.

use mparith_core::{Accuracy, Float, Int, RoundingMode};
use mparith_nat::{Context, Thresholds};

fn int(s: &str) -> Int {
    s.parse().unwrap()
}

#[test]
fn large_product() {
    let x = int("123456789012345678901234567890");
    let y = int("987654321098765432109876543210");
    let want = int("121932631137021795226185032733622923332237463801111263526900");

    // also with a threshold low enough that these operands recurse
    let eager = Context::with_thresholds(Thresholds { karatsuba: 2, ..Thresholds::default() });
    for ctx in [Context::default(), eager] {
        let mut z = Int::new();
        z.mul(&x, &y, &ctx);
        assert_eq!(z, want);
        z.mul(&x.clone(), &-&y, &ctx);
        assert_eq!(z, -&want);
    }
}

#[test]
fn one_third_prints_like_f64() {
    let ctx = Context::default();
    let mut z = Float::with_prec(53);
    z.set_f64(1.0).unwrap();
    let mut three = Float::new();
    three.set_f64(3.0).unwrap();
    let mut q = Float::with_prec(53);
    q.quo(&z, &three, &ctx).unwrap();
    assert_eq!(q.text('g', -1), "0.3333333333333333");
    assert_eq!(q.to_string(), (1.0f64 / 3.0).to_string());
}

#[test]
fn jacobi_symbols() {
    let ctx = Context::default();
    let j = |x: i64, y: i64| Int::jacobi(&Int::from_i64(x), &Int::from_i64(y), &ctx);
    assert_eq!(j(5, 9), 1);
    assert_eq!(j(2, 7), 1);
    assert_eq!(j(3, 7), -1);
    assert_eq!(j(7, 11), -1);
    assert_eq!(j(5, 11), 1);
}

#[test]
fn mod_sqrt_three_mod_four() {
    let ctx = Context::default();
    let p = Int::from_i64(11);

    // 7 is not a residue mod 11
    assert_eq!(Int::jacobi(&Int::from_i64(7), &p, &ctx), -1);
    assert_eq!(Int::from_i64(7).mod_sqrt(&p, &ctx), None);

    let r = Int::from_i64(5).mod_sqrt(&p, &ctx).unwrap();
    let mut sq = Int::new();
    sq.mul(&r, &r, &ctx);
    let mut m = Int::new();
    m.modulo(&sq, &p, &ctx);
    assert_eq!(m, Int::from_i64(5));
}

#[test]
fn euclidean_and_truncated_division() {
    let ctx = Context::default();
    let (x, y) = (Int::from_i64(-7), Int::from_i64(3));

    let (mut d, mut m) = (Int::new(), Int::new());
    d.div_mod(&mut m, &x, &y, &ctx);
    assert_eq!((d, m), (Int::from_i64(-3), Int::from_i64(2)));

    let (mut q, mut r) = (Int::new(), Int::new());
    q.quo_rem(&mut r, &x, &y, &ctx);
    assert_eq!((q, r), (Int::from_i64(-2), Int::from_i64(-1)));
}

#[test]
fn hex_float_literal() {
    let ctx = Context::default();
    let (x, base) = Float::parse_float("0x1.8p1", 0, 0, RoundingMode::ToNearestEven, &ctx).unwrap();
    assert_eq!(base, 16);
    assert_eq!(x, Float::from_f64(3.0).unwrap());
    assert_eq!(x.to_f64(), (3.0, Accuracy::Exact));
    assert_eq!(x.acc(), Accuracy::Exact);
}

#[test]
fn zero_results_are_non_negative() {
    let ctx = Context::default();
    let (a, b) = (Int::from_i64(-6), Int::from_i64(6));
    let mut z = Int::new();
    z.add(&a, &b);
    assert_eq!(z.sign(), 0);
    assert!(!z.is_negative());
    z.mul(&a, &Int::new(), &ctx);
    assert!(!z.is_negative());
    z.rem(&a, &Int::from_i64(3), &ctx);
    assert!(!z.is_negative());

    let (x, y) = (Float::from_f64(-2.5).unwrap(), Float::from_f64(2.5).unwrap());
    for mode in [
        RoundingMode::ToNearestEven,
        RoundingMode::ToNearestAway,
        RoundingMode::ToZero,
        RoundingMode::AwayFromZero,
        RoundingMode::ToPositiveInf,
    ] {
        let mut f = Float::new();
        f.set_mode(mode);
        f.add(&x, &y).unwrap();
        assert!(f.is_zero() && !f.signbit(), "{mode}");
    }
    let mut f = Float::new();
    f.set_mode(RoundingMode::ToNegativeInf);
    f.add(&x, &y).unwrap();
    assert!(f.is_zero() && f.signbit());
}
