//! Styled terminal output for progress and summary lines.
//!
//! Styling is dropped when stdout is not a terminal or `NO_COLOR` is set,
//! so captured output (tests, CI logs, `--report` pipelines) stays plain.

use std::io::{self, IsTerminal, Write};

/// ANSI styles used by the install and clean commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Heading,
    Step,
    Ok,
    Degraded,
    Label,
    Accent,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Self::Heading => "\x1b[1m",
            Self::Step => "\x1b[34m",
            Self::Ok => "\x1b[32m",
            Self::Degraded => "\x1b[33m",
            Self::Label => "\x1b[2m",
            Self::Accent => "\x1b[36m",
        }
    }

    /// Wrap `text` in this style when stdout supports it.
    pub fn paint(self, text: impl AsRef<str>) -> String {
        self.paint_if(enabled(), text)
    }

    fn paint_if(self, enabled: bool, text: impl AsRef<str>) -> String {
        if enabled {
            format!("{}{}\x1b[0m", self.code(), text.as_ref())
        } else {
            text.as_ref().to_string()
        }
    }
}

/// Whether stdout should receive ANSI styling.
pub fn enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

/// Flush stdout so a progress line without a newline shows up immediately.
#[inline]
pub fn flush_stdout() {
    io::stdout().flush().ok();
}
