//! Inbound adapters (driving side): HTTP services and the CLI.

pub mod cli;
pub mod http;
