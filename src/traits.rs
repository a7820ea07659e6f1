use crate::size_tree::SizeTree;

/// Turns a [`SizeTree`] into chart lines of a fixed width.
///
/// Every returned line is exactly `width` visible characters wide (escape sequences of
/// colored renderers excluded), so the caller only has to join them with newlines.
/// Implementations keep no state between calls: rendering the same tree twice, or
/// different trees with the same renderer, gives independent results.
///
/// # Examples
///
/// ```
/// use ferris_usage::bars::BarRenderer;
/// use ferris_usage::size_tree::SizeTree;
/// use ferris_usage::traits::TreeRenderer;
///
/// let tree = SizeTree::new("foo", 60)
///     .with_child(SizeTree::new("bar", 40))
///     .with_child(SizeTree::new("baz", 20));
/// let lines = BarRenderer::ascii_double().render(&tree, 12);
/// assert!(lines.iter().all(|l| l.chars().count() == 12));
/// ```
pub trait TreeRenderer {
    fn render(&self, tree: &SizeTree, width: usize) -> Vec<String>;
}
