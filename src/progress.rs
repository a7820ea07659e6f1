use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Console feedback while sizes are being collected.
///
/// Shows a spinner followed by the path currently being scanned on stderr. Redraws are
/// rate limited, so reporting every path of a large tree stays cheap. A hidden reporter
/// accepts the same calls and draws nothing.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr_with_hz(10));
        let style = ProgressStyle::with_template("{spinner} scanning {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Picks a visible or hidden reporter.
    pub fn enabled(show: bool) -> Self {
        if show {
            Self::new()
        } else {
            Self::hidden()
        }
    }

    pub fn report(&self, path: &str) {
        self.bar.set_message(path.to_string());
    }

    /// The path reported last.
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Removes the spinner line so the chart starts on a clean line.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}
