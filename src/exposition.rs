//! Plaintext exposition-format emitter.
//!
//! Renders metric families as `# TYPE` headers followed by sample lines
//! (`name{label="value",...} value`). Rendering is append-only text
//! production into a request-local buffer: scrapers stream samples as they
//! parse, so memory stays flat regardless of CPU/device/protocol
//! cardinality.

use std::fmt::Write;

/// Metric type as declared in the `# TYPE` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Summary,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Summary => "summary",
        }
    }
}

/// Streaming exposition-format writer.
///
/// `begin_family` writes the type header exactly once per family and
/// remembers the family name; subsequent `emit` calls write one sample
/// line each under that name. Values are passed as already-formatted text
/// and rendered verbatim.
#[derive(Debug, Default)]
pub struct Exposition {
    buf: String,
    family: String,
}

impl Exposition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new metric family: writes its `# TYPE` header.
    pub fn begin_family(&mut self, name: &str, kind: MetricType) {
        self.family.clear();
        self.family.push_str(name);
        let _ = writeln!(self.buf, "# TYPE {} {}", name, kind.as_str());
    }

    /// Emits one sample line for the current family.
    pub fn emit(&mut self, labels: &[(&str, &str)], value: &str) {
        let family = std::mem::take(&mut self.family);
        self.emit_named(&family, labels, value);
        self.family = family;
    }

    /// Emits one sample line with an explicit metric name.
    ///
    /// Used for the `_sum`/`_count` lines of a summary family, whose names
    /// differ from the family name in the type header.
    pub fn emit_named(&mut self, name: &str, labels: &[(&str, &str)], value: &str) {
        self.buf.push_str(name);
        if !labels.is_empty() {
            self.buf.push('{');
            for (i, (key, val)) in labels.iter().enumerate() {
                if i > 0 {
                    self.buf.push(',');
                }
                let _ = write!(self.buf, "{}=\"{}\"", key, val);
            }
            self.buf.push('}');
        }
        self.buf.push(' ');
        self.buf.push_str(value);
        self.buf.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
