//! Miette-based error diagnostics for CLI error presentation.
//!
//! TOML syntax errors are shown against the configuration file with the
//! offending span labeled.

use std::path::Path;

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(riskboard::config))]
pub struct ConfigDiagnostic {
    /// Human-readable error message.
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Build a diagnostic for a TOML parse failure in `content` read from `path`.
    #[must_use]
    pub fn from_toml(path: &Path, content: &str, error: &toml::de::Error) -> Self {
        let span = error
            .span()
            .map_or_else(|| (0, 0).into(), |range| (range.start, range.len()).into());
        Self {
            message: error.message().to_string(),
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span,
            help: Some("see `riskboard config show` for every key and its default".to_string()),
        }
    }
}

/// Render a diagnostic with source context to stderr.
pub fn print(diagnostic: ConfigDiagnostic) {
    eprintln!("{:?}", Report::new(diagnostic));
}
