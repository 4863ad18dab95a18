//! Cross-implementation consistency tests
//!
//! The off-ledger pricing engine and the on-ledger fixed-point
//! verification formula implement one mathematical contract; these
//! tests drive both over the supported parameter space.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strike_shield::pricing::{
    check_divergence, from_fixed_point, onledger_premium, per_unit_premium, to_fixed_point,
};

const SPOTS: [f64; 3] = [30_000.0, 94_260.0, 150_000.0];
const STRIKE_PERCENTS: [f64; 7] = [50.0, 75.0, 90.0, 100.0, 110.0, 125.0, 150.0];
const DURATIONS: [u32; 4] = [30, 90, 180, 360];
const VOLATILITIES: [f64; 6] = [0.15, 0.30, 0.425, 0.60, 0.90, 1.20];

fn fp(v: f64) -> i128 {
    to_fixed_point(Decimal::try_from(v).unwrap())
}

#[test]
fn off_ledger_agrees_with_on_ledger_across_grid() {
    let tolerance = dec!(0.02);
    let mut checked = 0usize;

    for spot in SPOTS {
        for strike_pct in STRIKE_PERCENTS {
            for duration in DURATIONS {
                for sigma in VOLATILITIES {
                    let strike = spot * strike_pct / 100.0;
                    let t = duration as f64 / 365.0;

                    let off = per_unit_premium(spot, strike, t, sigma).total();
                    let off_dec = Decimal::try_from(off).unwrap_or(Decimal::ZERO);

                    let on_fp =
                        onledger_premium(fp(spot), fp(strike), duration, fp(sigma));
                    let on_dec = from_fixed_point(on_fp);

                    assert!(
                        check_divergence(off_dec, on_dec, tolerance),
                        "diverged at spot {spot} strike {strike_pct}% \
                         duration {duration}d sigma {sigma}: off {off_dec} on {on_dec}"
                    );
                    checked += 1;
                }
            }
        }
    }

    assert_eq!(checked, SPOTS.len() * STRIKE_PERCENTS.len() * DURATIONS.len() * VOLATILITIES.len());
}

#[test]
fn no_arbitrage_floor_across_grid() {
    for spot in SPOTS {
        for strike_pct in STRIKE_PERCENTS {
            for duration in DURATIONS {
                for sigma in VOLATILITIES {
                    let strike = spot * strike_pct / 100.0;
                    let p = per_unit_premium(spot, strike, duration as f64 / 365.0, sigma);
                    assert!(p.total() >= p.intrinsic);
                    assert!(p.time_value >= 0.0);
                }
            }
        }
    }
}

#[test]
fn premium_monotone_in_duration_across_grid() {
    for spot in SPOTS {
        for strike_pct in STRIKE_PERCENTS {
            for sigma in VOLATILITIES {
                let strike = spot * strike_pct / 100.0;
                let mut last = 0.0;
                for duration in DURATIONS {
                    let p = per_unit_premium(spot, strike, duration as f64 / 365.0, sigma)
                        .total();
                    assert!(
                        p >= last,
                        "premium fell from {last} to {p} as duration rose to {duration}d"
                    );
                    last = p;
                }
            }
        }
    }
}

#[test]
fn premium_monotone_in_volatility_across_grid() {
    for spot in SPOTS {
        for strike_pct in STRIKE_PERCENTS {
            for duration in DURATIONS {
                let strike = spot * strike_pct / 100.0;
                let t = duration as f64 / 365.0;
                let mut last = 0.0;
                for sigma in VOLATILITIES {
                    let p = per_unit_premium(spot, strike, t, sigma).total();
                    assert!(
                        p >= last,
                        "premium fell from {last} to {p} as sigma rose to {sigma}"
                    );
                    last = p;
                }
            }
        }
    }
}

#[test]
fn on_ledger_deterministic() {
    let a = onledger_premium(fp(94_260.0), fp(94_260.0), 30, fp(0.425));
    let b = onledger_premium(fp(94_260.0), fp(94_260.0), 30, fp(0.425));
    assert_eq!(a, b);
}
