use unicode_normalization::UnicodeNormalization;

/// Border, fill and fallback characters of a rendered bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle<'a> {
    pub fill: char,
    pub left: &'a str,
    pub right: &'a str,
    pub small: &'a str,
    pub label_padding: &'a str,
}

impl Default for BarStyle<'_> {
    fn default() -> Self {
        Self {
            fill: '-',
            left: "[",
            right: "]",
            small: "|",
            label_padding: "",
        }
    }
}

/// Renders a label as a string of exactly `width` characters.
///
/// The label is centered between `left` and `right`, padded with `fill` and clipped when it
/// does not fit. When the borders alone are wider than `width`, the `small` marker is repeated
/// instead. Labels are NFC normalized first so that combining sequences count as a single
/// character wherever a precomposed form exists.
///
/// # Examples
///
/// ```
/// use ferris_usage::bar::{bar, BarStyle};
/// assert_eq!(bar("abcd", 10, &BarStyle::default()), "[--abcd--]");
/// assert_eq!(bar("abcd", 1, &BarStyle::default()), "|");
/// assert_eq!(bar("abcd", 0, &BarStyle::default()), "");
/// ```
pub fn bar(label: &str, width: usize, style: &BarStyle) -> String {
    let borders = char_len(style.left) + char_len(style.right);
    if width < borders {
        let small = if style.small.is_empty() { " " } else { style.small };
        return small.chars().cycle().take(width).collect();
    }

    let inner = width - borders;
    let mut label: String = label.nfc().collect();
    if char_len(&label) < inner {
        label = format!("{pad}{label}{pad}", pad = style.label_padding);
    }
    let clipped: String = label.chars().take(inner).collect();

    let mut out = String::with_capacity(width + style.left.len() + style.right.len());
    out.push_str(style.left);
    out.push_str(&center(&clipped, inner, style.fill));
    out.push_str(style.right);
    out
}

/// Centers `text` in `width` characters.
///
/// When the margin is odd the extra fill character goes to the right, except when the target
/// width is odd as well, in which case it goes to the left.
pub fn center(text: &str, width: usize, fill: char) -> String {
    let len = char_len(text);
    if len >= width {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    let right = margin - left;

    let mut out = String::with_capacity(text.len() + margin * fill.len_utf8());
    out.extend(std::iter::repeat(fill).take(left));
    out.push_str(text);
    out.extend(std::iter::repeat(fill).take(right));
    out
}

/// Number of characters (code points) in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one() {
        let style = BarStyle {
            small: "y",
            ..BarStyle::default()
        };
        assert_eq!(bar("x", 1, &style), "y");
    }

    #[test]
    fn test_zero() {
        assert_eq!(bar("x", 0, &BarStyle::default()), "");
    }

    #[test]
    fn test_default() {
        assert_eq!(bar("abcd", 10, &BarStyle::default()), "[--abcd--]");
    }

    #[test]
    fn test_left_and_right() {
        let style = BarStyle {
            left: "<<",
            right: "**",
            ..BarStyle::default()
        };
        assert_eq!(bar("abcd", 12, &style), "<<--abcd--**");
    }

    #[test]
    fn test_fill() {
        let style = BarStyle {
            fill: '+',
            ..BarStyle::default()
        };
        assert_eq!(bar("abcd", 10, &style), "[++abcd++]");
    }

    #[test]
    fn test_clipping() {
        assert_eq!(bar("abcdefghij", 6, &BarStyle::default()), "[abcd]");
        assert_eq!(bar("abcd", 2, &BarStyle::default()), "[]");
    }

    #[test]
    fn test_label_padding() {
        let style = BarStyle {
            fill: '.',
            label_padding: " ",
            ..BarStyle::default()
        };
        assert_eq!(bar("ab", 10, &style), "[.. ab ..]");
        // label already fills the interior, no padding added
        assert_eq!(bar("abcdefgh", 10, &style), "[abcdefgh]");
    }

    #[test]
    fn test_odd_margins() {
        assert_eq!(center("foo", 34, ' ').find('f'), Some(15));
        assert_eq!(center("foo", 35, ' ').find('f'), Some(16));
        assert_eq!(center("ab", 5, '-'), "--ab-");
    }

    #[test]
    fn test_small_marker_is_truncated() {
        let style = BarStyle {
            left: "<<",
            right: ">>",
            small: "ab",
            ..BarStyle::default()
        };
        assert_eq!(bar("x", 3, &style), "aba");
    }

    #[test]
    fn test_combining_characters_are_composed() {
        // "e" followed by a combining acute accent
        let label = "caf\u{0065}\u{0301}";
        let rendered = bar(label, 8, &BarStyle::default());
        assert_eq!(char_len(&rendered), 8);
        assert_eq!(rendered, "[-caf\u{e9}-]");
    }
}
