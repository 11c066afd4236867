//! Ticker symbol newtype.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Longest symbol accepted from a webhook.
pub const MAX_SYMBOL_LEN: usize = 64;

/// Stock or crypto ticker symbol as sent by TradingView (`{{ticker}}`).
///
/// The inner String is private so every value has passed [`Symbol::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Validate and build a symbol. Surrounding whitespace is trimmed; case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptySymbol`] or [`DomainError::SymbolTooLong`].
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptySymbol);
        }
        if trimmed.chars().count() > MAX_SYMBOL_LEN {
            return Err(DomainError::SymbolTooLong {
                max: MAX_SYMBOL_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let symbol = Symbol::parse("  BTCUSDT ").unwrap();
        assert_eq!(symbol.as_str(), "BTCUSDT");
    }

    #[test]
    fn parse_preserves_case_and_exchange_prefix() {
        let symbol = Symbol::parse("NASDAQ:aapl").unwrap();
        assert_eq!(symbol.to_string(), "NASDAQ:aapl");
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(Symbol::parse("   "), Err(DomainError::EmptySymbol));
    }

    #[test]
    fn parse_rejects_overlong() {
        let raw = "X".repeat(MAX_SYMBOL_LEN + 1);
        assert!(matches!(
            Symbol::parse(&raw),
            Err(DomainError::SymbolTooLong { .. })
        ));
        assert!(Symbol::parse(&"X".repeat(MAX_SYMBOL_LEN)).is_ok());
    }
}
