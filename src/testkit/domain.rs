//! Builders for domain primitives.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::quote::{NewQuote, Quote};

/// A validated quote. Panics on invalid input, which is a test bug.
pub fn new_quote(symbol: &str, price: Decimal, atr: Decimal) -> NewQuote {
    NewQuote::new(symbol, price, atr).expect("valid test quote")
}

/// A stored quote with the given id, recorded at `minute` past a fixed hour.
pub fn quote(id: i64, symbol: &str, price: Decimal, atr: Decimal, minute: u32) -> Quote {
    new_quote(symbol, price, atr).into_quote(id, at_minute(minute))
}

/// 2026-05-04 15:MM:00 UTC.
pub fn at_minute(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 15, minute, 0)
        .single()
        .expect("valid test timestamp")
}
