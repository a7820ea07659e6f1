//! Abstract color markers and their substitution with ANSI codes.
//!
//! Renderers first wrap blocks in [`START`]/[`END`] markers, which keep the text measurable
//! with [`visible_len`]. Once a chart is assembled, each line passes through a [`ColorCycle`]
//! that turns every start marker into the next color of its palette.

pub const START: char = '\u{1}';
pub const END: char = '\u{2}';

pub const RESET: &str = "\x1b[0m";

/// A fixed three-color background palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Red, green, yellow.
    Rgy,
    /// Blue, magenta, cyan.
    Bmc,
}

impl Palette {
    pub fn colors(self) -> &'static [&'static str; 3] {
        match self {
            Palette::Rgy => &["\x1b[41;97m", "\x1b[42;30m", "\x1b[43;30m"],
            Palette::Bmc => &["\x1b[44;97m", "\x1b[45;30m", "\x1b[46;30m"],
        }
    }

    /// Palette for a nesting depth: even depths are red/green/yellow, odd ones blue/magenta/cyan.
    pub fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Palette::Rgy
        } else {
            Palette::Bmc
        }
    }
}

/// Wraps `s` in color markers.
pub fn wrap(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(START);
    out.push_str(s);
    out.push(END);
    out
}

/// Character count of `s` ignoring color markers.
///
/// ```
/// use ferris_usage::colorizer::{visible_len, wrap};
/// assert_eq!(visible_len(&wrap("abc")), 3);
/// ```
pub fn visible_len(s: &str) -> usize {
    s.chars().filter(|&c| c != START && c != END).count()
}

/// Paints `s` with a concrete color code directly, without going through markers.
pub fn paint(s: &str, code: &str) -> String {
    format!("{code}{s}{RESET}")
}

/// Cursor over one palette; each start marker it substitutes takes the next color.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    palette: Palette,
    cursor: usize,
}

impl ColorCycle {
    pub fn new(palette: Palette) -> Self {
        Self { palette, cursor: 0 }
    }

    fn next_color(&mut self) -> &'static str {
        let colors = self.palette.colors();
        let color = colors[self.cursor % colors.len()];
        self.cursor += 1;
        color
    }

    /// Replaces the markers of one line with color codes.
    pub fn colorize(&mut self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() + 16);
        for c in line.chars() {
            match c {
                START => out.push_str(self.next_color()),
                END => out.push_str(RESET),
                other => out.push(other),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_advances_per_block() {
        let mut cycle = ColorCycle::new(Palette::Rgy);
        let line = format!("{}{}", wrap("a"), wrap("b"));
        assert_eq!(
            cycle.colorize(&line),
            "\x1b[41;97ma\x1b[0m\x1b[42;30mb\x1b[0m"
        );
        assert_eq!(cycle.colorize(&wrap("c")), "\x1b[43;30mc\x1b[0m");
        assert_eq!(cycle.colorize(&wrap("d")), "\x1b[41;97md\x1b[0m");
    }

    #[test]
    fn test_plain_text_untouched() {
        let mut cycle = ColorCycle::new(Palette::Bmc);
        assert_eq!(cycle.colorize("   "), "   ");
        assert_eq!(visible_len("   "), 3);
    }

    #[test]
    fn test_palette_by_depth() {
        assert_eq!(Palette::for_depth(0), Palette::Rgy);
        assert_eq!(Palette::for_depth(1), Palette::Bmc);
        assert_eq!(Palette::for_depth(4), Palette::Rgy);
    }
}
