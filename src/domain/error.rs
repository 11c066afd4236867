//! Domain validation errors for core domain types.
//!
//! These errors are returned by the `parse`/`new` constructors that guard
//! quote invariants. Their messages are shown verbatim to webhook callers.
//!
//! # Examples
//!
//! ```
//! use riskboard::domain::error::DomainError;
//! use riskboard::domain::quote::NewQuote;
//! use rust_decimal_macros::dec;
//!
//! let result = NewQuote::new("AAPL", dec!(0), dec!(1.5));
//! assert!(matches!(result, Err(DomainError::NonPositivePrice { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Symbols must contain at least one non-whitespace character.
    #[error("Symbol cannot be empty")]
    EmptySymbol,

    /// Symbols are capped to keep rows and table cells bounded.
    #[error("Symbol exceeds {max} characters")]
    SymbolTooLong {
        /// The maximum accepted length.
        max: usize,
    },

    /// A quote price must be strictly positive.
    #[error("Price must be positive")]
    NonPositivePrice {
        /// The rejected price.
        price: Decimal,
    },

    /// Average True Range is a volatility magnitude and cannot be negative.
    #[error("ATR cannot be negative")]
    NegativeAtr {
        /// The rejected ATR.
        atr: Decimal,
    },
}
