//! Command output
//!
//! Results go to stdout and problems to stderr; tracing logs also go to
//! stderr, so `galsync check --json > verdict.json` or `galsync sync --json`
//! leave stdout holding exactly one JSON document.
//!
//! In human mode `success` carries the headline (a `check` verdict, the
//! `sync` summary line) and `info` the indented detail lines under it, which
//! `--quiet` suppresses. In JSON mode each command builds one document and
//! hands it to `print_json`; `info` lines are dropped.

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

pub trait OutputFormatter {
    /// Headline result, e.g. "Changes detected in Summer Trip"
    fn success(&self, message: &str);
    /// Fatal error, printed once before exiting with status 2
    fn error(&self, message: &str);
    /// Non-fatal problem such as skipped gallery items
    fn warn(&self, message: &str);
    /// Detail line under the headline
    fn info(&self, message: &str);
    fn print_json(&self, value: &serde_json::Value);
}

/// Terminal output with status marks
pub struct HumanFormatter {
    quiet: bool,
}

impl HumanFormatter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

fn mark(symbol: char, label: Option<&str>, message: &str) -> String {
    match label {
        Some(label) => format!("{symbol} {label}: {message}"),
        None => format!("{symbol} {message}"),
    }
}

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", mark('\u{2713}', None, message));
        }
    }
    fn error(&self, message: &str) {
        eprintln!("{}", mark('\u{2717}', Some("Error"), message));
    }
    fn warn(&self, message: &str) {
        eprintln!("{}", mark('\u{26a0}', Some("Warning"), message));
    }
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("  {message}");
        }
    }
    fn print_json(&self, _value: &serde_json::Value) {}
}

/// Machine-readable output for CI steps
pub struct JsonFormatter;

fn error_document(message: &str) -> serde_json::Value {
    serde_json::json!({"success": false, "error": message})
}

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!("{}", serde_json::json!({"success": true, "message": message}));
    }
    fn error(&self, message: &str) {
        eprintln!("{}", error_document(message));
    }
    fn warn(&self, message: &str) {
        eprintln!("{}", serde_json::json!({"level": "warning", "message": message}));
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &serde_json::Value) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("{}", error_document(&format!("failed to encode output: {e}"))),
        }
    }
}

pub fn get_formatter(format: OutputFormat, quiet: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter::new(quiet)),
    }
}
