//! Quote domain: symbols, validated quotes, exit-price math, and summaries.

pub mod error;
pub mod id;
pub mod money;
pub mod quote;
pub mod summary;

pub use error::DomainError;
pub use id::Symbol;
pub use money::{format_currency, Price};
pub use quote::{exit_price, NewQuote, Quote};
pub use summary::Summary;
