//! Conversion diagnostics
//!
//! A conversion never fails because the prose is odd. When an extractor cannot map a phrasing
//! to a typed field, or a section it expects is missing, it emits a [`Diagnostic`] and leaves
//! the prose in place for manual fix-up. The caller decides where diagnostics go by passing a
//! [`DiagnosticSink`]: an ordered list ([`Diagnostics`]) or an injected callback ([`FnSink`]).
//!
//! Diagnostics are delivered in the order their condition is detected.

use std::fmt;

/// A recoverable, human-readable conversion warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Short stable identifier of the check that fired (`"size"`, `"speed"`, ...).
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.code, self.message)
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    /// Convenience wrapper around [`emit`](Self::emit).
    fn warn(&mut self, code: &'static str, message: String) {
        log::warn!("{}: {}", code, message);
        self.emit(Diagnostic::new(code, message));
    }
}

/// Ordered, accumulating list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Count diagnostics carrying the given code.
    pub fn count_code(&self, code: &str) -> usize {
        self.items.iter().filter(|d| d.code == code).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl DiagnosticSink for Diagnostics {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Adapter forwarding every diagnostic to a closure.
pub struct FnSink<F: FnMut(Diagnostic)>(pub F);

impl<F: FnMut(Diagnostic)> DiagnosticSink for FnSink<F> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (self.0)(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_keep_emission_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("size", "first".to_string());
        diagnostics.warn("speed", "second".to_string());
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(diagnostics.count_code("size"), 1);
    }

    #[test]
    fn fn_sink_forwards_to_closure() {
        let mut seen = Vec::new();
        {
            let mut sink = FnSink(|d: Diagnostic| seen.push(d.to_string()));
            sink.warn("speed", "odd phrasing".to_string());
        }
        assert_eq!(seen, vec!["warning[speed]: odd phrasing".to_string()]);
    }
}
