//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   webhook / dashboard ──▶ application ──▶ QuoteStore ◀── sqlite adapter
//! ```

pub mod outbound;
