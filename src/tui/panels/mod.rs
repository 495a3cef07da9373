//! Panel content builders for the detail view.
//!
//! Builders are pure: they take a resource snapshot (or log lines) and
//! return a value. The view controller compares that value with what is on
//! screen and decides whether to repaint. No ratatui types appear here; the
//! renderer maps [`TextClass`] to styles.

pub mod gauges;
pub mod log_tail;
pub mod status;

pub use gauges::{GaugeChange, GaugeEntry, GaugeSet};
pub use log_tail::{log_line_budget, render_log_tail};
pub use status::{TXT_UNCONFIGURED, render_missing, render_status, render_unconfigured};

use crate::stats::Health;

/// Styling class of a text segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextClass {
    #[default]
    Plain,
    /// Bold section label ("Resource", "Local Disc", ...).
    Label,
    /// State label colored by health.
    State(Health),
}

/// A run of text with one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub class: TextClass,
}

/// One display line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelLine {
    pub segments: Vec<Segment>,
}

impl PanelLine {
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Styled text block for the single-panel modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelText {
    pub lines: Vec<PanelLine>,
}

impl PanelText {
    /// Unstyled text, lines joined with `\n`.
    pub fn to_plain(&self) -> String {
        self.lines
            .iter()
            .map(PanelLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Appends segments to a [`PanelText`], starting a new line on `newline()`.
#[derive(Debug, Default)]
pub struct TextWriter {
    done: Vec<PanelLine>,
    current: PanelLine,
}

impl TextWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, text: impl Into<String>, class: TextClass) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        // Merge into the previous segment when the class matches.
        match self.current.segments.last_mut() {
            Some(last) if last.class == class => last.text.push_str(&text),
            _ => self.current.segments.push(Segment { text, class }),
        }
        self
    }

    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text, TextClass::Plain)
    }

    pub fn label(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text, TextClass::Label)
    }

    pub fn state(&mut self, text: impl Into<String>, health: Health) -> &mut Self {
        self.push(text, TextClass::State(health))
    }

    pub fn newline(&mut self) -> &mut Self {
        self.done.push(std::mem::take(&mut self.current));
        self
    }

    /// Finishes the text. A trailing unterminated line is kept.
    pub fn finish(mut self) -> PanelText {
        if !self.current.segments.is_empty() {
            self.done.push(self.current);
        }
        PanelText { lines: self.done }
    }
}
