//! Ledger price publisher
//!
//! Decides when the aggregated price has moved enough to justify an
//! on-ledger write and packages that write as a fixed-point payload

mod guard;
mod policy;

pub use guard::{PublishAttempt, PublishGuard};
pub use policy::PublishPolicy;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The last value known to be written on-ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedPrice {
    pub price: Decimal,
    /// Ledger inclusion time as observed by us
    pub published_at: DateTime<Utc>,
}

/// An on-ledger price write.
///
/// Carries only the fixed-point price; the recorded timestamp is the
/// ledger's own clock at inclusion, never supplied from here. No
/// floating point crosses this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishPayload {
    /// Price scaled by `PRICE_SCALE` (decimal shift of 8)
    pub price_fp: i64,
}

/// Decimal shift applied to `price_fp`; consumers on both sides of
/// the ledger boundary must agree on it
pub const PAYLOAD_DECIMALS: u32 = 8;

impl PublishPayload {
    /// Recover the decimal price for logging and display
    pub fn price(&self) -> Decimal {
        Decimal::from_i128_with_scale(self.price_fp as i128, PAYLOAD_DECIMALS)
    }
}
