//! On-ledger verification formula
//!
//! Re-implements the pricing contract from `kernel` in integer
//! fixed-point arithmetic, mirroring what the ledger contract can
//! afford to execute: no floats, Newton square root, exponential by
//! power-of-two argument reduction with a short polynomial.
//!
//! The off-ledger engine must stay within the configured tolerance of
//! this formula over the whole supported parameter range; divergence
//! is a correctness alarm, never auto-corrected.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixed-point scale shared with the ledger: 8 decimal places
pub const PRICE_SCALE: i128 = 100_000_000;

/// ln(2) at `PRICE_SCALE`
const LN2_FP: i128 = 69_314_718;

/// 1 / sqrt(2 * pi) at `PRICE_SCALE`
const INV_SQRT_2PI_FP: i128 = 39_894_228;

/// Absolute slack when comparing premia near zero
const DIVERGENCE_EPSILON: Decimal = dec!(0.0001);

/// Per-unit PUT premium in fixed point.
///
/// All price-like arguments are at `PRICE_SCALE`; the result is too.
pub fn onledger_premium(
    spot_fp: i128,
    strike_fp: i128,
    duration_days: u32,
    volatility_fp: i128,
) -> i128 {
    let intrinsic = (strike_fp - spot_fp).max(0);

    if duration_days == 0 || volatility_fp <= 0 || spot_fp <= 0 {
        return intrinsic;
    }

    let t_fp = duration_days as i128 * PRICE_SCALE / 365;
    let vol_time = volatility_fp * sqrt_fp(t_fp) / PRICE_SCALE;
    if vol_time == 0 {
        return intrinsic;
    }

    let denom = spot_fp * vol_time / PRICE_SCALE;
    if denom == 0 {
        return intrinsic;
    }
    let z = (strike_fp - spot_fp) * PRICE_SCALE / denom;
    let z2_half = z * z / PRICE_SCALE / 2;

    // The pdf tail spans many orders of magnitude; the exponential's
    // binary shift is applied after multiplying its mantissa through,
    // so deep out-of-the-money tails keep their leading digits instead
    // of collapsing to a few fixed-point ulps.
    let (mantissa, shift) = match exp_neg_parts(z2_half) {
        Some(parts) => parts,
        None => return intrinsic,
    };
    let time_value =
        (denom * mantissa / PRICE_SCALE * INV_SQRT_2PI_FP / PRICE_SCALE) >> shift;

    intrinsic + time_value
}

/// Compare the engines' premia; logs at ERROR on divergence beyond
/// tolerance and returns whether they agree.
pub fn check_divergence(off_ledger: Decimal, on_ledger: Decimal, tolerance: Decimal) -> bool {
    let diff = (off_ledger - on_ledger).abs();
    let agrees = if off_ledger.is_zero() {
        diff <= DIVERGENCE_EPSILON
    } else {
        diff / off_ledger <= tolerance || diff <= DIVERGENCE_EPSILON
    };
    if !agrees {
        tracing::error!(
            %off_ledger,
            %on_ledger,
            %tolerance,
            "on-ledger verification formula diverged from pricing engine"
        );
    }
    agrees
}

/// Decimal to fixed point, truncating below `PRICE_SCALE` resolution
pub fn to_fixed_point(value: Decimal) -> i128 {
    (value * Decimal::from(PRICE_SCALE as i64))
        .trunc()
        .to_i128()
        .unwrap_or(0)
}

/// Fixed point back to `Decimal`
pub fn from_fixed_point(value_fp: i128) -> Decimal {
    Decimal::from_i128_with_scale(value_fp, 8)
}

/// Square root in fixed point: sqrt(x / S) * S
fn sqrt_fp(x: i128) -> i128 {
    if x <= 0 {
        return 0;
    }
    isqrt(x * PRICE_SCALE)
}

/// Integer square root by Newton's method
fn isqrt(n: i128) -> i128 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// e^(-x) for x >= 0, decomposed as mantissa * 2^(-shift).
///
/// Reduces x = k*ln2 + r and evaluates a degree-4 polynomial for
/// e^(-r) on [0, ln2). Returns `None` once the shift would zero any
/// value the premium formula can produce.
fn exp_neg_parts(x: i128) -> Option<(i128, u32)> {
    if x <= 0 {
        return Some((PRICE_SCALE, 0));
    }
    let k = x / LN2_FP;
    if k >= 63 {
        return None;
    }
    let r = x - k * LN2_FP;
    let r2 = r * r / PRICE_SCALE;
    let r3 = r2 * r / PRICE_SCALE;
    let r4 = r3 * r / PRICE_SCALE;
    let poly = PRICE_SCALE - r + r2 / 2 - r3 / 6 + r4 / 24;
    Some((poly.max(0), k as u32))
}

#[cfg(test)]
mod tests {
    use super::super::kernel::per_unit_premium;
    use super::*;

    fn fp(v: f64) -> i128 {
        (v * PRICE_SCALE as f64).round() as i128
    }

    fn exp_neg_fp(x: i128) -> i128 {
        match exp_neg_parts(x) {
            Some((mantissa, shift)) => mantissa >> shift,
            None => 0,
        }
    }

    #[test]
    fn test_isqrt_exact() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(144), 12);
        assert_eq!(isqrt(10_000_000_000), 100_000);
    }

    #[test]
    fn test_sqrt_fp_quarter() {
        // sqrt(0.25) = 0.5
        let r = sqrt_fp(PRICE_SCALE / 4);
        assert!((r - PRICE_SCALE / 2).abs() <= 1);
    }

    #[test]
    fn test_exp_neg_against_float() {
        for x in [0.0f64, 0.1, 0.5, 1.0, 2.0, 4.0, 8.0] {
            let approx = exp_neg_fp(fp(x)) as f64 / PRICE_SCALE as f64;
            let exact = (-x).exp();
            let err = (approx - exact).abs();
            assert!(
                err <= exact * 0.005 + 1e-8,
                "exp(-{x}): approx {approx} vs exact {exact}"
            );
        }
    }

    #[test]
    fn test_exp_neg_huge_argument_is_zero() {
        assert_eq!(exp_neg_fp(fp(100.0)), 0);
    }

    #[test]
    fn test_zero_duration_returns_intrinsic() {
        let spot = fp(94_260.0);
        let strike = fp(100_000.0);
        assert_eq!(onledger_premium(spot, strike, 0, fp(0.425)), strike - spot);
    }

    #[test]
    fn test_zero_volatility_returns_intrinsic() {
        let spot = fp(94_260.0);
        assert_eq!(onledger_premium(spot, spot, 30, 0), 0);
    }

    #[test]
    fn test_matches_kernel_atm() {
        let spot = 94_260.0;
        let on = onledger_premium(fp(spot), fp(spot), 30, fp(0.425)) as f64
            / PRICE_SCALE as f64;
        let off = per_unit_premium(spot, spot, 30.0 / 365.0, 0.425).total();
        assert!((on - off).abs() / off < 0.02, "on {on} vs off {off}");
    }

    #[test]
    fn test_matches_kernel_itm() {
        let spot = 94_260.0;
        let strike = spot * 1.2;
        let on = onledger_premium(fp(spot), fp(strike), 90, fp(0.425)) as f64
            / PRICE_SCALE as f64;
        let off = per_unit_premium(spot, strike, 90.0 / 365.0, 0.425).total();
        assert!((on - off).abs() / off < 0.02, "on {on} vs off {off}");
    }

    #[test]
    fn test_matches_kernel_deep_otm() {
        // Strike at half of spot: the pdf tail is around 1e-8, right
        // where fixed-point quantization bites hardest.
        let spot = 150_000.0;
        let strike = spot * 0.5;
        let on = onledger_premium(fp(spot), fp(strike), 30, fp(0.30)) as f64
            / PRICE_SCALE as f64;
        let off = per_unit_premium(spot, strike, 30.0 / 365.0, 0.30).total();
        assert!((on - off).abs() / off < 0.02, "on {on} vs off {off}");
    }

    #[test]
    fn test_dust_spot_returns_intrinsic_without_panicking() {
        // spot * sigma * sqrt(t) below one fixed-point ulp
        assert_eq!(onledger_premium(1, 2, 30, fp(0.0001)), 1);
    }

    #[test]
    fn test_fixed_point_round_trip() {
        let v = dec!(94260.12345678);
        assert_eq!(from_fixed_point(to_fixed_point(v)), v);
    }

    #[test]
    fn test_check_divergence_within_tolerance() {
        assert!(check_divergence(dec!(100), dec!(101), dec!(0.02)));
        assert!(check_divergence(dec!(100), dec!(99), dec!(0.02)));
    }

    #[test]
    fn test_check_divergence_beyond_tolerance() {
        assert!(!check_divergence(dec!(100), dec!(110), dec!(0.02)));
    }

    #[test]
    fn test_check_divergence_near_zero() {
        assert!(check_divergence(Decimal::ZERO, dec!(0.00005), dec!(0.02)));
        assert!(!check_divergence(Decimal::ZERO, dec!(1), dec!(0.02)));
    }
}
