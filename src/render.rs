//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction that allows for different output
//! styles.  The default implementation uses ANSI escape codes to set the mentor's replies apart
//! from status lines.

use std::io::{self, Stdout, Write};

use crate::session::TurnProgress;

/// ANSI escape code for dim text (used for the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the mentor label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for notices).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI sequence that returns to column zero and erases the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Text of the typing indicator.
pub const TYPING_INDICATOR: &str = "⏳ MentorAI is typing...";

/// Trait for rendering chat output.
///
/// Renderers double as the session's [`TurnProgress`] observer so they can show the typing
/// indicator while a request is in flight.
pub trait Renderer: TurnProgress {
    /// Print the mentor's reply to the last message.
    fn print_reply(&mut self, text: &str);

    /// Print a turn that failed and was recorded as an error notice.
    fn print_notice(&mut self, text: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    typing: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            typing: false,
        }
    }

    /// Flushes stdout so partial lines appear immediately.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn label(&self) -> String {
        if self.use_color {
            format!("{ANSI_CYAN}MentorAI:{ANSI_RESET}")
        } else {
            "MentorAI:".to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgress for PlainTextRenderer {
    fn typing_started(&mut self) {
        self.typing = true;
        if self.use_color {
            print!("{ANSI_DIM}{TYPING_INDICATOR}{ANSI_RESET}");
        } else {
            print!("{TYPING_INDICATOR}");
        }
        self.flush();
    }

    fn typing_finished(&mut self) {
        if !self.typing {
            return;
        }
        self.typing = false;
        if self.use_color {
            print!("{ANSI_CLEAR_LINE}");
        } else {
            println!();
        }
        self.flush();
    }
}

impl Renderer for PlainTextRenderer {
    fn print_reply(&mut self, text: &str) {
        println!("{}\n{text}\n", self.label());
        self.flush();
    }

    fn print_notice(&mut self, text: &str) {
        if self.use_color {
            println!("{}\n{ANSI_YELLOW}{text}{ANSI_RESET}\n", self.label());
        } else {
            println!("{}\n{text}\n", self.label());
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
        assert!(renderer.label().contains(ANSI_CYAN));
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
        assert_eq!(renderer.label(), "MentorAI:");
    }

    #[test]
    fn typing_indicator_tracks_state() {
        let mut renderer = PlainTextRenderer::with_color(false);
        renderer.typing_started();
        assert!(renderer.typing);
        renderer.typing_finished();
        assert!(!renderer.typing);
        renderer.typing_finished();
        assert!(!renderer.typing);
    }
}
