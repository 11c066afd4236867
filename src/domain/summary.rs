//! Dashboard summary metrics.

use rust_decimal::Decimal;
use serde::Serialize;

use super::money::Price;
use super::quote::Quote;

/// Aggregate metrics over the latest quote of each symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_symbols: usize,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub avg_price: Price,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub avg_atr: Decimal,
}

impl Summary {
    /// Compute the summary, or `None` when there is nothing to average.
    #[must_use]
    pub fn from_quotes(quotes: &[Quote]) -> Option<Self> {
        if quotes.is_empty() {
            return None;
        }
        Some(Self {
            total_symbols: quotes.len(),
            avg_price: mean(quotes.iter().map(|q| q.price)),
            avg_atr: mean(quotes.iter().map(|q| q.atr)),
        })
    }
}

/// Arithmetic mean that never overflows.
///
/// Sums exactly while the total fits in a `Decimal`; past that it switches
/// to a running mean, which stays between the smallest and largest input.
fn mean(values: impl Iterator<Item = Decimal> + Clone) -> Decimal {
    let mut count = 0u64;
    let exact = values.clone().try_fold(Decimal::ZERO, |sum, value| {
        count += 1;
        sum.checked_add(value)
    });
    if count == 0 {
        return Decimal::ZERO;
    }
    if let Some(sum) = exact {
        return sum / Decimal::from(count);
    }

    let mut running = Decimal::ZERO;
    for (seen, value) in (1u64..).zip(values) {
        running += (value - running) / Decimal::from(seen);
    }
    running
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::NewQuote;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn quote(symbol: &str, price: Decimal, atr: Decimal) -> Quote {
        NewQuote::new(symbol, price, atr)
            .unwrap()
            .into_quote(1, Utc::now())
    }

    #[test]
    fn empty_input_has_no_summary() {
        assert!(Summary::from_quotes(&[]).is_none());
    }

    #[test]
    fn averages_price_and_atr() {
        let quotes = vec![
            quote("AAPL", dec!(150), dec!(2)),
            quote("MSFT", dec!(410), dec!(6)),
        ];
        let summary = Summary::from_quotes(&quotes).unwrap();
        assert_eq!(summary.total_symbols, 2);
        assert_eq!(summary.avg_price, dec!(280));
        assert_eq!(summary.avg_atr, dec!(4));
    }

    #[test]
    fn averages_prices_whose_sum_exceeds_decimal_range() {
        let huge = dec!(50000000000000000000000000000);
        let quotes = vec![quote("AAA", huge, dec!(1)), quote("BBB", huge, dec!(3))];

        let summary = Summary::from_quotes(&quotes).unwrap();

        assert_eq!(summary.avg_price, huge);
        assert_eq!(summary.avg_atr, dec!(2));
    }

    #[test]
    fn averages_mixed_magnitudes_past_overflow() {
        let quotes = vec![
            quote("AAA", Decimal::MAX, dec!(0)),
            quote("BBB", Decimal::MAX, dec!(0)),
            quote("CCC", dec!(1), dec!(0)),
        ];

        let summary = Summary::from_quotes(&quotes).unwrap();

        assert!(summary.avg_price > dec!(1));
        assert!(summary.avg_price < Decimal::MAX);
    }
}
