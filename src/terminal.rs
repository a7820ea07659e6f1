use std::env;

/// Width and height of the output terminal in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: usize,
    pub height: usize,
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self {
            width: 80,
            height: 25,
        }
    }
}

/// Best effort guess of the terminal size.
///
/// Asks the terminal attached to stdout first, then falls back to the `COLUMNS` and `LINES`
/// environment variables, and finally to 80×25.
pub fn terminal_size() -> TerminalSize {
    ioctl_size()
        .or_else(|| {
            env_size(
                env::var("COLUMNS").ok().as_deref(),
                env::var("LINES").ok().as_deref(),
            )
        })
        .unwrap_or_default()
}

#[cfg(unix)]
fn ioctl_size() -> Option<TerminalSize> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ only writes into the winsize struct we pass.
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    if rc == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(TerminalSize {
            width: usize::from(ws.ws_col),
            height: usize::from(ws.ws_row),
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
fn ioctl_size() -> Option<TerminalSize> {
    None
}

fn env_size(columns: Option<&str>, lines: Option<&str>) -> Option<TerminalSize> {
    let width = columns?.trim().parse().ok().filter(|&w: &usize| w > 0)?;
    let height = lines
        .and_then(|l| l.trim().parse().ok())
        .filter(|&h: &usize| h > 0)
        .unwrap_or(TerminalSize::default().height);
    Some(TerminalSize { width, height })
}
