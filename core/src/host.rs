//! Output sinks owned by the host.
//!
//! The engine touches the host in exactly two ways: it sets page-break mode
//! and, when help is requested, emits the rendered help text.

use tracing::debug;

/// Host-side output the engine writes to.
pub trait OutputSink {
    /// Enables or disables paged output.
    fn set_page_break(&mut self, enabled: bool);

    /// Writes text verbatim.
    fn emit(&mut self, text: &str);
}

/// Sink writing to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    page_break: bool,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_break(&self) -> bool {
        self.page_break
    }
}

impl OutputSink for StdoutSink {
    fn set_page_break(&mut self, enabled: bool) {
        debug!(enabled, "page break mode");
        self.page_break = enabled;
    }

    fn emit(&mut self, text: &str) {
        print!("{text}");
    }
}

/// In-memory sink, mostly for tests and for hosts that post-process help.
///
/// # Examples
///
/// ```
/// use shell_args_core::{CapturedOutput, OutputSink};
///
/// let mut out = CapturedOutput::default();
/// out.set_page_break(true);
/// out.emit("hello");
/// assert_eq!(out.text, "hello");
/// assert_eq!(out.page_break, Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub text: String,
    /// Last page-break setting, `None` if never set.
    pub page_break: Option<bool>,
}

impl OutputSink for CapturedOutput {
    fn set_page_break(&mut self, enabled: bool) {
        self.page_break = Some(enabled);
    }

    fn emit(&mut self, text: &str) {
        self.text.push_str(text);
    }
}
