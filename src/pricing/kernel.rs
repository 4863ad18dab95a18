//! Shared pricing kernel
//!
//! Documented contract implemented by both the off-ledger engine and
//! the on-ledger verification formula:
//!
//! ```text
//! intrinsic  = max(0, K - S)
//! z          = (K - S) / (S * sigma * sqrt(t))
//! time_value = S * sigma * sqrt(t) * phi(z)      phi = N'(z)
//! per-unit premium = intrinsic + time_value
//! ```
//!
//! Properties: monotone increasing in sigma and t, zero extrinsic
//! value as t -> 0, ATM extrinsic value S * sigma * sqrt(t) / sqrt(2*pi)
//! (Brenner-Subrahmanyam approximation).

use rust_decimal::Decimal;

/// 1 / sqrt(2 * pi)
const INV_SQRT_2PI: f64 = 0.3989422804014327;

/// Per-unit premium components in quote currency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerUnitPremium {
    pub intrinsic: f64,
    pub time_value: f64,
}

impl PerUnitPremium {
    /// Total per-unit premium
    pub fn total(&self) -> f64 {
        self.intrinsic + self.time_value
    }
}

/// Evaluate the pricing contract for one unit of protected asset.
///
/// Inputs are plain floats; `Decimal` conversion happens at the engine
/// boundary so both engines feed the kernel identically.
pub fn per_unit_premium(spot: f64, strike: f64, t_years: f64, sigma: f64) -> PerUnitPremium {
    let intrinsic = (strike - spot).max(0.0);

    if t_years <= 0.0 || sigma <= 0.0 || spot <= 0.0 {
        return PerUnitPremium {
            intrinsic,
            time_value: 0.0,
        };
    }

    let vol_time = sigma * t_years.sqrt();
    let z = (strike - spot) / (spot * vol_time);
    let time_value = spot * vol_time * normal_pdf(z);

    PerUnitPremium {
        intrinsic,
        time_value,
    }
}

/// Standard normal density
fn normal_pdf(z: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * z * z).exp()
}

/// Year fraction for a whole-day duration
pub fn year_fraction(duration_days: u32) -> f64 {
    duration_days as f64 / 365.0
}

/// Lossy `Decimal` to `f64` for kernel input
pub fn to_f64(value: Decimal) -> f64 {
    value.try_into().unwrap_or(0.0)
}

/// Kernel output back to `Decimal`; saturates underflow to zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}
