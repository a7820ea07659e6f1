//! Two-dimensional column layout.
//!
//! Every depth level gets its own column of equal width and children are stacked top to
//! bottom in the column right of their parent, each block as tall as its share of the
//! parent's height:
//!
//! ```text
//! [   foo    ][   bar    ][    xe    ]
//! [    60    ][    40    ][____20____]
//! [          ][          ][__vo: 10__]
//! [          ][__________]............
//! [          ][   baz    ][__pu: 10__]
//! [          ][    20    ]............
//! [__________][__________]............
//! ```

use unicode_normalization::UnicodeNormalization;

use crate::bar::{bar, char_len, BarStyle};
use crate::bars::Paint;
use crate::colorizer::{self, Palette};
use crate::size_format::SizeFormatter;
use crate::size_tree::{boundary, SizeTree};
use crate::traits::TreeRenderer;

const FILLER_LABEL: &str = "...";
const TRUNCATED: char = '~';

const ASCII_CELL: BarStyle<'static> = BarStyle {
    fill: ' ',
    left: "[",
    right: "]",
    small: "|",
    label_padding: "",
};

const ASCII_CELL_BOTTOM: BarStyle<'static> = BarStyle {
    fill: '_',
    ..ASCII_CELL
};

const COLOR_CELL: BarStyle<'static> = BarStyle {
    fill: ' ',
    left: "",
    right: "",
    small: " ",
    label_padding: "",
};

/// What occupies a block of rows in a column.
#[derive(Debug, Clone, Copy)]
enum Block<'a> {
    Node(&'a SizeTree),
    /// Rows given up by the height caps, standing in for the smallest children.
    Filler,
}

/// Renders a [`SizeTree`] into a `width` × `height` grid of nested blocks.
#[derive(Debug, Clone)]
pub struct ColumnsRenderer {
    pub max_depth: usize,
    pub formatter: SizeFormatter,
    pub height: usize,
    pub paint: Paint,
}

impl ColumnsRenderer {
    pub fn new(height: usize, paint: Paint) -> Self {
        Self {
            max_depth: 5,
            formatter: SizeFormatter::count(),
            height,
            paint,
        }
    }

    pub fn ascii(height: usize) -> Self {
        Self::new(height, Paint::Ascii)
    }

    pub fn color(height: usize) -> Self {
        Self::new(height, Paint::Color)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_formatter(mut self, formatter: SizeFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    fn shade(&self) -> char {
        match self.paint {
            Paint::Ascii => '.',
            Paint::Color => '\u{2591}',
        }
    }

    /// Widths of the columns a chart of `tree` can reach.
    ///
    /// `width` is split into `max_depth + 1` columns whose widths differ by at most one, but
    /// only the levels down to the deepest node of `tree` are materialized.
    fn column_widths(&self, tree: &SizeTree, width: usize) -> Vec<usize> {
        let levels = self.max_depth as u128 + 1;
        let shown = self.max_depth.min(tree.depth()) + 1;
        (0..shown)
            .map(|level| {
                let start = width as u128 * level as u128 / levels;
                let end = width as u128 * (level as u128 + 1) / levels;
                (end - start) as usize
            })
            .collect()
    }

    /// Heights of the children of `node` within `height` rows, plus the deficit the caps
    /// created.
    ///
    /// Each child starts from its boundary-accumulated share, is capped at twice its plain
    /// proportional height, and is never taller than the sibling before it.
    fn child_heights(
        &self,
        node: &SizeTree,
        children: &[&SizeTree],
        height: usize,
    ) -> (Vec<usize>, usize) {
        let mut cumulative: u128 = 0;
        let mut last = 0usize;
        let mut previous: Option<usize> = None;
        let mut deficit = 0usize;

        let heights = children
            .iter()
            .map(|child| {
                cumulative += u128::from(child.size);
                let b = boundary(height, cumulative, node.size);
                let raw = b.saturating_sub(last);
                last = last.max(b);

                let doubled = if node.size == 0 {
                    0
                } else {
                    (2 * height as u128 * u128::from(child.size) / u128::from(node.size)) as usize
                };
                let mut allocated = raw.min(doubled);
                if let Some(previous) = previous {
                    allocated = allocated.min(previous);
                }
                deficit += raw - allocated;
                previous = Some(allocated);
                allocated
            })
            .collect();

        (heights, deficit)
    }

    /// Clips `label` to `interior` characters, marking the cut with a trailing `~`.
    fn fit(label: &str, interior: usize) -> String {
        let label: String = label.nfc().collect();
        if char_len(&label) > interior && interior >= 1 {
            let mut clipped: String = label.chars().take(interior - 1).collect();
            clipped.push(TRUNCATED);
            clipped
        } else {
            label
        }
    }

    /// The `height` rows of a single cell in the column of `depth`.
    fn cell(&self, block: Block, width: usize, height: usize, depth: usize) -> Vec<String> {
        let texts: Vec<String> = match block {
            Block::Node(node) => {
                let size = self.formatter.format(node.size);
                if height == 1 {
                    vec![format!("{}: {}", node.name, size)]
                } else {
                    vec![node.name.clone(), size]
                }
            }
            Block::Filler => vec![FILLER_LABEL.to_string()],
        };

        (0..height)
            .map(|row| {
                let text = texts.get(row).map(String::as_str).unwrap_or("");
                match self.paint {
                    Paint::Ascii => {
                        let style = if row + 1 == height {
                            &ASCII_CELL_BOTTOM
                        } else {
                            &ASCII_CELL
                        };
                        bar(&Self::fit(text, width.saturating_sub(2)), width, style)
                    }
                    Paint::Color => {
                        let cell = bar(&Self::fit(text, width), width, &COLOR_CELL);
                        if width == 0 {
                            cell
                        } else {
                            let colors = Palette::for_depth(depth).colors();
                            colorizer::paint(&cell, colors[(depth / 2) % colors.len()])
                        }
                    }
                }
            })
            .collect()
    }

    /// Rows of `block` and everything right of it. `widths` holds the columns in use and
    /// `width` is the full chart width.
    fn render_block(
        &self,
        block: Block,
        height: usize,
        depth: usize,
        widths: &[usize],
        width: usize,
    ) -> Vec<String> {
        if height == 0 {
            return Vec::new();
        }

        let own = self.cell(block, widths[depth], height, depth);
        if depth >= self.max_depth {
            return own;
        }

        let rest = width.saturating_sub(widths[..=depth].iter().sum());
        let shaded: String = std::iter::repeat(self.shade()).take(rest).collect();

        let mut right = Vec::with_capacity(height);
        if let Block::Node(node) = block {
            let children = node.sorted_children();
            let (heights, deficit) = self.child_heights(node, &children, height);
            for (child, child_height) in children.iter().zip(heights) {
                right.extend(self.render_block(
                    Block::Node(*child),
                    child_height,
                    depth + 1,
                    widths,
                    width,
                ));
            }
            if deficit > 0 {
                right.extend(self.render_block(Block::Filler, deficit, depth + 1, widths, width));
            }
        }
        right.truncate(height);
        right.resize(height, shaded);

        own.into_iter()
            .zip(right)
            .map(|(mut line, tail)| {
                line.push_str(&tail);
                line
            })
            .collect()
    }
}

impl TreeRenderer for ColumnsRenderer {
    fn render(&self, tree: &SizeTree, width: usize) -> Vec<String> {
        if width == 0 || self.height == 0 {
            return Vec::new();
        }
        let widths = self.column_widths(tree, width);
        self.render_block(Block::Node(tree), self.height, 0, &widths, width)
    }
}
