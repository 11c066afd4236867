//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic. This layer handles configuration, runtime wiring, and the
//! in-process service supervisor.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`supervisor`] - Restarting supervisor for long-running services

pub mod bootstrap;
pub mod config;
pub mod supervisor;
