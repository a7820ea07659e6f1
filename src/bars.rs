//! Horizontal bar charts.
//!
//! Each node is drawn as a bar spanning its share of the parent's width, with its children
//! stacked underneath:
//!
//! ```text
//! ________________________________________
//! [                 foo                  ]
//! [_______________49.15KB________________]
//! [          bar           ][    baz     ]
//! [________32.77KB_________][__16.38KB___]
//! ```
//!
//! A [`LineStyle`] decides which rows a node produces, a [`Paint`] decides whether those rows
//! are ASCII art or colored blocks. All four combinations share one layout routine.

use crate::bar::{bar, char_len, BarStyle};
use crate::colorizer::{self, ColorCycle, Palette};
use crate::size_format::SizeFormatter;
use crate::size_tree::{partition, SizeTree};
use crate::traits::TreeRenderer;

/// How many rows a single node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// A name row followed by a size row.
    Double,
    /// One `name: size` row.
    Single,
}

/// How rows are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Bracketed bars with fill characters.
    Ascii,
    /// Borderless bars on ANSI background colors.
    Color,
}

const ASCII_NAME: BarStyle<'static> = BarStyle {
    fill: ' ',
    left: "[",
    right: "]",
    small: "|",
    label_padding: "",
};

const ASCII_SIZE: BarStyle<'static> = BarStyle {
    fill: '_',
    ..ASCII_NAME
};

const ASCII_SINGLE: BarStyle<'static> = BarStyle {
    fill: '.',
    label_padding: " ",
    ..ASCII_NAME
};

const COLOR_BLOCK: BarStyle<'static> = BarStyle {
    fill: ' ',
    left: "",
    right: "",
    small: " ",
    label_padding: "",
};

/// Renders a [`SizeTree`] as nested horizontal bars.
#[derive(Debug, Clone)]
pub struct BarRenderer {
    pub max_depth: usize,
    pub formatter: SizeFormatter,
    pub lines: LineStyle,
    pub paint: Paint,
}

impl BarRenderer {
    pub fn new(lines: LineStyle, paint: Paint) -> Self {
        Self {
            max_depth: 5,
            formatter: SizeFormatter::count(),
            lines,
            paint,
        }
    }

    pub fn ascii_double() -> Self {
        Self::new(LineStyle::Double, Paint::Ascii)
    }

    pub fn ascii_single() -> Self {
        Self::new(LineStyle::Single, Paint::Ascii)
    }

    pub fn color_double() -> Self {
        Self::new(LineStyle::Double, Paint::Color)
    }

    pub fn color_single() -> Self {
        Self::new(LineStyle::Single, Paint::Color)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_formatter(mut self, formatter: SizeFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Rows for a single node, without its children.
    fn node_rows(&self, node: &SizeTree, width: usize) -> Vec<String> {
        let size = self.formatter.format(node.size);
        match (self.lines, self.paint) {
            (LineStyle::Double, Paint::Ascii) => vec![
                bar(&node.name, width, &ASCII_NAME),
                bar(&size, width, &ASCII_SIZE),
            ],
            (LineStyle::Single, Paint::Ascii) => {
                vec![bar(&format!("{}: {}", node.name, size), width, &ASCII_SINGLE)]
            }
            (LineStyle::Double, Paint::Color) => vec![
                colorizer::wrap(&bar(&node.name, width, &COLOR_BLOCK)),
                colorizer::wrap(&bar(&size, width, &COLOR_BLOCK)),
            ],
            (LineStyle::Single, Paint::Color) => vec![colorizer::wrap(&bar(
                &format!("{}: {}", node.name, size),
                width,
                &COLOR_BLOCK,
            ))],
        }
    }

    /// Visible width of a rendered row.
    fn str_len(&self, s: &str) -> usize {
        match self.paint {
            Paint::Ascii => char_len(s),
            Paint::Color => colorizer::visible_len(s),
        }
    }

    fn render_subtree(&self, node: &SizeTree, width: usize, depth: usize) -> Vec<String> {
        if width < 1 {
            return Vec::new();
        }

        let mut lines = self.node_rows(node, width);
        if depth == 0 {
            return lines;
        }

        let children = node.sorted_children();
        if children.is_empty() {
            return lines;
        }

        let widths = partition(width, node.size, children.iter().map(|c| c.size));
        let subtrees: Vec<Vec<String>> = children
            .iter()
            .zip(widths)
            .map(|(child, child_width)| self.render_subtree(child, child_width, depth - 1))
            .collect();

        let height = subtrees.iter().map(Vec::len).max().unwrap_or(0);
        for i in 0..height {
            let mut line = String::new();
            for subtree in &subtrees {
                if let Some(row) = subtree.get(i) {
                    line.push_str(row);
                } else if let Some(first) = subtree.first() {
                    line.push_str(&" ".repeat(self.str_len(first)));
                }
            }
            let pad = width.saturating_sub(self.str_len(&line));
            line.push_str(&" ".repeat(pad));
            lines.push(line);
        }

        lines
    }

    /// One independent color cycle per row slot; row `i` is colored by slot `i % len`.
    fn color_cycles(&self) -> Vec<ColorCycle> {
        let palettes: &[Palette] = match self.lines {
            LineStyle::Double => &[Palette::Rgy, Palette::Rgy, Palette::Bmc, Palette::Bmc],
            LineStyle::Single => &[Palette::Rgy, Palette::Bmc],
        };
        palettes.iter().map(|&p| ColorCycle::new(p)).collect()
    }
}

impl TreeRenderer for BarRenderer {
    fn render(&self, tree: &SizeTree, width: usize) -> Vec<String> {
        if width == 0 {
            return Vec::new();
        }

        let mut lines = Vec::new();
        if self.lines == LineStyle::Double && self.paint == Paint::Ascii {
            lines.push("_".repeat(width));
        }
        lines.extend(self.render_subtree(tree, width, self.max_depth));

        match self.paint {
            Paint::Ascii => lines,
            Paint::Color => {
                let mut cycles = self.color_cycles();
                let slots = cycles.len();
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| cycles[i % slots].colorize(line))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SizeTree {
        SizeTree::new("foo", 60)
            .with_child(
                SizeTree::new("bar", 40)
                    .with_child(SizeTree::new("xe", 20))
                    .with_child(SizeTree::new("vo", 10)),
            )
            .with_child(SizeTree::new("baz", 20).with_child(SizeTree::new("pu", 10)))
    }

    #[test]
    fn test_single_line_ascii() {
        let lines = BarRenderer::ascii_single().render(&sample(), 36);
        assert_eq!(
            lines,
            vec![
                "[............ foo: 60 .............]",
                "[...... bar: 40 .......][ baz: 20 .]",
                "[. xe: 20 .][vo: ]      [pu: ]      ",
            ]
        );
    }

    #[test]
    fn test_max_depth_limits_levels() {
        let renderer = BarRenderer::ascii_double().with_max_depth(1);
        let lines = renderer.render(&sample(), 36);
        assert_eq!(lines.len(), 5);
        let renderer = BarRenderer::ascii_double().with_max_depth(0);
        assert_eq!(renderer.render(&sample(), 36).len(), 3);
    }

    #[test]
    fn test_color_rows_strip_to_width() {
        for renderer in [BarRenderer::color_double(), BarRenderer::color_single()] {
            let lines = renderer.render(&sample(), 30);
            assert!(!lines.is_empty());
            for line in &lines {
                assert_eq!(strip_ansi(line).chars().count(), 30, "{:?}", line);
            }
        }
    }

    #[test]
    fn test_color_double_pairs_name_and_size_colors() {
        let lines = BarRenderer::color_double().render(&sample(), 36);
        assert_eq!(lines.len(), 6);
        // name and size rows of the root use the first red/green/yellow color
        assert!(lines[0].starts_with("\x1b[41;97m"));
        assert!(lines[1].starts_with("\x1b[41;97m"));
        // first level switches to blue/magenta/cyan, advancing per block
        assert!(lines[2].starts_with("\x1b[44;97m"));
        assert!(lines[2].contains("\x1b[45;30m"));
    }

    #[test]
    fn test_color_state_does_not_leak_between_renders() {
        let renderer = BarRenderer::color_single();
        let first = renderer.render(&sample(), 36);
        let second = renderer.render(&sample(), 36);
        assert_eq!(first, second);
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
