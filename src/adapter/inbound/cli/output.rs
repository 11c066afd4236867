//! CLI output formatting.
//!
//! Human-readable output uses colored markers and indented fields. With
//! `--json` every line is a JSON object `{"type": .., "payload": ..}` so
//! scripts can consume it; `--quiet` suppresses everything except warnings,
//! errors, and data.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Verbosity level (0 = normal, 1+ = increasingly verbose).
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    *config_cell().read()
}

fn suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *config_cell().write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Global verbosity from `-v` flags.
#[must_use]
pub fn verbosity() -> u8 {
    read_config().verbose
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("header", json!({ "app": "riskboard", "version": version }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("{} {}", "riskboard".bold(), version.dimmed());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();
    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {:<14} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line. Shown even in quiet mode.
pub fn warning(message: &str) {
    if is_json() {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a dimmed note.
pub fn note(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("note", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {}", message.dimmed());
}

/// Print a hint with a `hint:` prefix.
pub fn hint(message: &str) {
    let config = read_config();
    if config.json {
        emit_json_line("hint", json!({ "message": message }));
        return;
    }
    if suppressed(config) {
        return;
    }
    println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
}

/// Print a rendered table, or emit `rows` as JSON. Data is shown in quiet mode.
pub fn table<T: Serialize>(rendered: &str, rows: &[T]) {
    if is_json() {
        let rows = serde_json::to_value(rows).unwrap_or(serde_json::Value::Null);
        emit_json_line("table", json!({ "rows": rows }));
        return;
    }
    for line in rendered.lines() {
        println!("  {line}");
    }
}

/// Emit a structured JSON record (JSON mode only).
pub fn record(kind: &str, payload: serde_json::Value) {
    if is_json() {
        emit_json_line(kind, payload);
    }
}

/// Format a highlighted value in cyan.
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.cyan())
}
