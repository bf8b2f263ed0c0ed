//! Terminal rendering for `sprocket` reports.
//!
//! Color goes through `termcolor`; setting `NO_COLOR` disables it regardless
//! of `--color`.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Pick the color mode for this invocation.
///
/// `NO_COLOR` overrides the flag. `--color always|never` is honored and any
/// other value leaves terminal detection to termcolor.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    let no_color = std::env::var_os("NO_COLOR").is_some();
    match flag {
        _ if no_color => ColorChoice::Never,
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Report writer over stdout
pub struct StyledOutput {
    stdout: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    fn colored(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut style = ColorSpec::new();
        style.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&style);
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Bold heading on its own line
    pub fn heading(&mut self, text: &str) {
        self.colored(text, None, true);
        self.newline();
    }

    /// Right-aligned `[tick]` prefix for a say-log line
    pub fn tick_stamp(&mut self, tick: u64) {
        self.colored(&format!("[{:>4}] ", tick), Some(Color::Cyan), false);
    }

    /// Closing status line: green when the run went idle, yellow when it was cut off
    pub fn summary(&mut self, text: &str, cut_off: bool) {
        let color = if cut_off { Color::Yellow } else { Color::Green };
        self.colored(text, Some(color), true);
        self.newline();
    }

    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{}", text);
    }

    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }

    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}
