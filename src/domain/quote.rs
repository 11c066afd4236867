//! Quotes received from TradingView alerts.
//!
//! A [`NewQuote`] is a validated alert that has not been stored yet. A
//! [`Quote`] is a stored row with its id and ingest timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::id::Symbol;
use super::money::Price;

/// Timestamp layout used for display and CSV export.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One ATR below the current price: a volatility-based stop-loss level.
#[must_use]
pub fn exit_price(price: Price, atr: Decimal) -> Price {
    price - atr
}

/// Validated quote awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    symbol: Symbol,
    price: Price,
    atr: Decimal,
}

impl NewQuote {
    /// Validate raw alert fields.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] when the symbol is blank or too long, the
    /// price is not strictly positive, or the ATR is negative.
    pub fn new(symbol: &str, price: Price, atr: Decimal) -> Result<Self, DomainError> {
        let symbol = Symbol::parse(symbol)?;
        if price <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice { price });
        }
        if atr < Decimal::ZERO {
            return Err(DomainError::NegativeAtr { atr });
        }
        Ok(Self { symbol, price, atr })
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub fn atr(&self) -> Decimal {
        self.atr
    }

    #[must_use]
    pub fn exit_price(&self) -> Price {
        exit_price(self.price, self.atr)
    }

    /// Attach storage identity, producing the persisted form.
    #[must_use]
    pub fn into_quote(self, id: i64, recorded_at: DateTime<Utc>) -> Quote {
        Quote {
            id,
            symbol: self.symbol,
            price: self.price,
            atr: self.atr,
            recorded_at,
        }
    }
}

/// Stored quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: i64,
    pub symbol: Symbol,
    pub price: Price,
    pub atr: Decimal,
    pub recorded_at: DateTime<Utc>,
}

impl Quote {
    #[must_use]
    pub fn exit_price(&self) -> Price {
        exit_price(self.price, self.atr)
    }

    /// Ingest time as `YYYY-MM-DD HH:MM:SS` (UTC).
    #[must_use]
    pub fn display_timestamp(&self) -> String {
        self.recorded_at.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
    }
}

/// Fixed-width RFC 3339 encoding used for storage.
///
/// Microsecond precision with a `Z` suffix keeps every value the same
/// length, so string order equals chronological order.
#[must_use]
pub fn storage_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn new_quote_accepts_zero_atr() {
        let quote = NewQuote::new("AAPL", dec!(150.25), dec!(0)).unwrap();
        assert_eq!(quote.exit_price(), dec!(150.25));
    }

    #[test]
    fn new_quote_rejects_non_positive_price() {
        assert!(matches!(
            NewQuote::new("AAPL", dec!(0), dec!(1)),
            Err(DomainError::NonPositivePrice { .. })
        ));
        assert!(matches!(
            NewQuote::new("AAPL", dec!(-3), dec!(1)),
            Err(DomainError::NonPositivePrice { .. })
        ));
    }

    #[test]
    fn new_quote_rejects_negative_atr() {
        assert!(matches!(
            NewQuote::new("AAPL", dec!(10), dec!(-0.01)),
            Err(DomainError::NegativeAtr { .. })
        ));
    }

    #[test]
    fn price_is_checked_before_atr() {
        assert!(matches!(
            NewQuote::new("AAPL", dec!(0), dec!(-1)),
            Err(DomainError::NonPositivePrice { .. })
        ));
    }

    #[test]
    fn exit_price_may_go_negative() {
        let quote = NewQuote::new("PENNY", dec!(0.5), dec!(2)).unwrap();
        assert_eq!(quote.exit_price(), dec!(-1.5));
    }

    #[test]
    fn into_quote_keeps_fields() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 14, 30, 5).unwrap();
        let quote = NewQuote::new("ETHUSD", dec!(3200), dec!(85.5))
            .unwrap()
            .into_quote(7, at);
        assert_eq!(quote.id, 7);
        assert_eq!(quote.symbol.as_str(), "ETHUSD");
        assert_eq!(quote.exit_price(), dec!(3114.5));
        assert_eq!(quote.display_timestamp(), "2026-03-01 14:30:05");
    }

    #[test]
    fn storage_timestamp_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(1);
        let (sa, sb) = (storage_timestamp(a), storage_timestamp(b));
        assert_eq!(sa, "2026-03-01T09:00:00.000000Z");
        assert_eq!(sa.len(), sb.len());
        assert!(sa < sb);
    }
}
