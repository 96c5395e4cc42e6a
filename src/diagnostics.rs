//! Leveled diagnostics collected during one build pass.
//!
//! Annotation problems never abort a build. Every compiler, resolver and
//! renderer call writes into a [`Diagnostics`] owned by the pass; the caller
//! clears it at pass start and flushes it at the end.

use colored::Colorize;
use std::io::{self, Write};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl Level {
    /// Default flush order: most severe first.
    pub const SEVERITY_ORDER: [Level; 3] = [Level::Error, Level::Warning, Level::Info];
}

/// A single collected message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

/// Collector with one ordered bucket per level.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
    infos: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.infos.push(message.into());
    }

    /// Drop everything collected so far. Called at the start of each pass.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
        self.infos.clear();
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn infos(&self) -> &[String] {
        &self.infos
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drain all buckets in the given level order.
    ///
    /// Levels missing from `order` are still drained, after the listed ones,
    /// in severity order.
    pub fn flush_in(&mut self, order: &[Level]) -> Vec<Diagnostic> {
        let mut out = Vec::with_capacity(self.len());
        let rest = Level::SEVERITY_ORDER
            .iter()
            .filter(|l| !order.contains(l))
            .copied()
            .collect::<Vec<_>>();
        for &level in order.iter().chain(rest.iter()) {
            for message in self.bucket_mut(level).drain(..) {
                out.push(Diagnostic { level, message });
            }
        }
        out
    }

    /// Drain all buckets, errors first.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.flush_in(&Level::SEVERITY_ORDER)
    }

    /// Flush and print a colored report.
    pub fn report<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for diag in self.flush() {
            let line = match diag.level {
                Level::Error => diag.message.red(),
                Level::Warning => diag.message.yellow(),
                Level::Info => diag.message.green(),
            };
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    fn bucket_mut(&mut self, level: Level) -> &mut Vec<String> {
        match level {
            Level::Error => &mut self.errors,
            Level::Warning => &mut self.warnings,
            Level::Info => &mut self.infos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_keep_insertion_order() {
        let mut diags = Diagnostics::new();
        diags.warning("w1");
        diags.error("e1");
        diags.warning("w2");
        assert_eq!(diags.warnings(), ["w1", "w2"]);
        assert_eq!(diags.errors(), ["e1"]);
        assert_eq!(diags.len(), 3);
    }

    #[test]
    fn flush_is_error_first_and_drains() {
        let mut diags = Diagnostics::new();
        diags.info("i");
        diags.warning("w");
        diags.error("e");
        let levels: Vec<Level> = diags.flush().into_iter().map(|d| d.level).collect();
        assert_eq!(levels, [Level::Error, Level::Warning, Level::Info]);
        assert!(diags.is_empty());
    }

    #[test]
    fn flush_in_custom_order() {
        let mut diags = Diagnostics::new();
        diags.error("e");
        diags.info("i");
        diags.warning("w");
        let messages: Vec<String> = diags
            .flush_in(&[Level::Info])
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(messages, ["i", "e", "w"]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut diags = Diagnostics::new();
        diags.error("boom");
        diags.info("note");
        diags.clear();
        assert!(!diags.has_errors());
        assert!(diags.is_empty());
    }

    #[test]
    fn report_writes_one_line_per_message() {
        colored::control::set_override(false);
        let mut diags = Diagnostics::new();
        diags.error("missing docs");
        diags.warning("odd path");
        let mut buf = Vec::new();
        diags.report(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "missing docs\nodd path\n");
    }
}
