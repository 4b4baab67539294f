use crate::core::Currency;
use crate::modules::commerce::{RateId, TaxBucket};
use rust_decimal::Decimal;

/// Rate id used for cart tax buckets. Carts are ephemeral, so their buckets
/// carry a single synthetic row instead of persisted rate ids.
pub const SYNTHETIC_RATE_ID: RateId = 0;

/// Tax on an amount at a rate, rounded to the currency minor unit.
///
/// Rounding happens per line before any accumulation so that displayed line
/// taxes always sum to the displayed totals.
pub fn line_tax_from_rate(amount: Decimal, rate: Decimal, currency: Currency) -> Decimal {
    currency.round(amount * rate)
}

/// Single-row bucket for a cart line.
pub fn synthetic_bucket(tax: Decimal) -> TaxBucket {
    let mut bucket = TaxBucket::new();
    bucket.insert(SYNTHETIC_RATE_ID, tax);
    bucket
}

/// Single-row bucket under a persisted rate id.
pub fn rate_bucket(rate_id: RateId, tax: Decimal) -> TaxBucket {
    let mut bucket = TaxBucket::new();
    bucket.insert(rate_id, tax);
    bucket
}

/// Accumulates `from` into `into`, summing amounts per rate id.
pub fn merge_tax_buckets(into: &mut TaxBucket, from: &TaxBucket) {
    for (rate_id, amount) in from {
        *into.entry(*rate_id).or_insert(Decimal::ZERO) += *amount;
    }
}

pub fn bucket_total(bucket: &TaxBucket) -> Decimal {
    bucket.values().copied().sum()
}
