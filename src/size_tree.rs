use std::collections::HashMap;

use crate::errors::VizError;

/// How the sizes in (path, size) pairs relate to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Each pair carries the total size of its node, descendants included (`du` output).
    #[default]
    Cumulative,
    /// Each pair carries only the node's own contribution; totals are summed afterwards.
    LeafExclusive,
}

/// A tree of named nodes where each node has a size and zero or more children.
///
/// Once built, `size` is the total footprint of a node including everything below it.
/// Children are keyed by name and exclusively owned by their parent.
///
/// # Examples
///
/// ```
/// use ferris_usage::size_tree::{SizeMode, SizeTree};
/// let pairs = vec![
///     (vec!["a".to_string()], 10),
///     (vec!["a".to_string(), "b".to_string()], 5),
///     (vec![], 3),
/// ];
/// let tree = SizeTree::from_path_size_pairs(pairs, "/", SizeMode::LeafExclusive).unwrap();
/// assert_eq!(tree.size, 18);
/// assert_eq!(tree.children["a"].size, 15);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeTree {
    pub name: String,
    pub size: u64,
    pub children: HashMap<String, SizeTree>,
}

impl SizeTree {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            children: HashMap::new(),
        }
    }

    /// Adds `child` (replacing any child with the same name) and returns the node.
    pub fn with_child(mut self, child: SizeTree) -> Self {
        self.children.insert(child.name.clone(), child);
        self
    }

    /// Builds a tree rooted at `root` from (path components, size) pairs.
    ///
    /// Missing intermediate nodes are created with size 0. An empty path addresses the root.
    /// When the same path appears twice, the later size wins. In
    /// [`SizeMode::LeafExclusive`] every size is then replaced by its aggregated total.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::NegativeSize`] for the first pair with a negative size.
    pub fn from_path_size_pairs<I>(pairs: I, root: &str, mode: SizeMode) -> Result<Self, VizError>
    where
        I: IntoIterator<Item = (Vec<String>, i64)>,
    {
        let mut tree = SizeTree::new(root, 0);
        for (path, size) in pairs {
            let size = u64::try_from(size).map_err(|_| VizError::NegativeSize {
                path: path.join("/"),
                size,
            })?;

            let mut cursor = &mut tree;
            for component in path {
                cursor = cursor
                    .children
                    .entry(component)
                    .or_insert_with_key(|name| SizeTree::new(name.clone(), 0));
            }
            cursor.size = size;
        }

        if mode == SizeMode::LeafExclusive {
            let total = tree.recalculate_total_sizes();
            log::debug!("aggregated own sizes of {:?} into total {}", root, total);
        }
        Ok(tree)
    }

    /// Turns own sizes into total sizes with a post-order pass and returns the root total.
    pub fn recalculate_total_sizes(&mut self) -> u64 {
        let below = self
            .children
            .values_mut()
            .map(|child| child.recalculate_total_sizes())
            .fold(0u64, u64::saturating_add);
        self.size = self.size.saturating_add(below);
        self.size
    }

    /// Size not attributable to children. Negative when the children claim more than the node.
    pub fn own_size(&self) -> i128 {
        let children: i128 = self.children.values().map(|c| i128::from(c.size)).sum();
        i128::from(self.size) - children
    }

    /// Children in rendering order: largest first, equal sizes alphabetically.
    pub fn sorted_children(&self) -> Vec<&SizeTree> {
        let mut children: Vec<&SizeTree> = self.children.values().collect();
        children.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
        children
    }

    /// Number of levels below this node (0 for a leaf).
    pub fn depth(&self) -> usize {
        self.children
            .values()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Splits `extent` cells among `sizes` by boundary accumulation.
///
/// Each part ends at `floor(extent * cumulative / total)`, clamped to `extent`, and its length
/// is the distance from the previous boundary. The parts therefore never sum to more than
/// `extent`, and sum to exactly `extent` when the sizes add up to `total`. A zero `total`
/// yields all-zero parts.
///
/// ```
/// use ferris_usage::size_tree::partition;
/// assert_eq!(partition(36, 60, [40, 20]), vec![24, 12]);
/// assert_eq!(partition(10, 3, [1, 1, 1]), vec![3, 3, 4]);
/// assert_eq!(partition(10, 0, [5, 5]), vec![0, 0]);
/// ```
pub fn partition<I>(extent: usize, total: u64, sizes: I) -> Vec<usize>
where
    I: IntoIterator<Item = u64>,
{
    let mut cumulative: u128 = 0;
    let mut last = 0usize;
    sizes
        .into_iter()
        .map(|size| {
            cumulative += u128::from(size);
            let boundary = boundary(extent, cumulative, total);
            let part = boundary.saturating_sub(last);
            last = last.max(boundary);
            part
        })
        .collect()
}

/// `floor(extent * cumulative / total)` clamped to `extent`; 0 when `total` is 0.
pub(crate) fn boundary(extent: usize, cumulative: u128, total: u64) -> usize {
    if total == 0 {
        return 0;
    }
    let scaled = extent as u128 * cumulative / u128::from(total);
    scaled.min(extent as u128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> Vec<String> {
        p.split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_cumulative_build() {
        let pairs = vec![
            (path("a/b"), 20),
            (path("a"), 30),
            (path("c"), 5),
            (path(""), 40),
        ];
        let tree = SizeTree::from_path_size_pairs(pairs, "root", SizeMode::Cumulative).unwrap();
        assert_eq!(tree.name, "root");
        assert_eq!(tree.size, 40);
        assert_eq!(tree.children["a"].size, 30);
        assert_eq!(tree.children["a"].children["b"].size, 20);
        assert_eq!(tree.children["a"].children["b"].name, "b");
        assert_eq!(tree.own_size(), 5);
    }

    #[test]
    fn test_missing_intermediate_defaults_to_zero() {
        let tree =
            SizeTree::from_path_size_pairs(vec![(path("x/y/z"), 7)], "r", SizeMode::Cumulative)
                .unwrap();
        assert_eq!(tree.size, 0);
        assert_eq!(tree.children["x"].size, 0);
        assert_eq!(tree.children["x"].children["y"].children["z"].size, 7);
        assert_eq!(tree.own_size(), 0);
        assert_eq!(tree.children["x"].own_size(), 0);
    }

    #[test]
    fn test_leaf_exclusive_matches_cumulative() {
        let own = vec![
            (path(""), 1),
            (path("a"), 2),
            (path("a/b"), 3),
            (path("a/c"), 4),
            (path("d"), 5),
        ];
        let summed = vec![
            (path(""), 15),
            (path("a"), 9),
            (path("a/b"), 3),
            (path("a/c"), 4),
            (path("d"), 5),
        ];
        let leaf = SizeTree::from_path_size_pairs(own, "r", SizeMode::LeafExclusive).unwrap();
        let cumulative =
            SizeTree::from_path_size_pairs(summed, "r", SizeMode::Cumulative).unwrap();
        assert_eq!(leaf.size, 15);
        assert_eq!(leaf, cumulative);
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let err = SizeTree::from_path_size_pairs(vec![(path("a/b"), -1)], "r", SizeMode::Cumulative)
            .unwrap_err();
        assert!(matches!(err, VizError::NegativeSize { ref path, size: -1 } if path == "a/b"));
    }

    #[test]
    fn test_negative_own_size_is_reported_not_fatal() {
        let tree = SizeTree::new("p", 10).with_child(SizeTree::new("c", 25));
        assert_eq!(tree.own_size(), -15);
    }

    #[test]
    fn test_sorted_children_breaks_ties_by_name() {
        let tree = SizeTree::new("r", 100)
            .with_child(SizeTree::new("b", 10))
            .with_child(SizeTree::new("a", 10))
            .with_child(SizeTree::new("z", 50))
            .with_child(SizeTree::new("c", 5));
        let names: Vec<&str> = tree.sorted_children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_partition_conserves_extent() {
        for extent in 0..=200 {
            let parts = partition(extent, 97, [50, 30, 10, 4, 2, 1]);
            assert_eq!(parts.iter().sum::<usize>(), extent);
        }
    }

    #[test]
    fn test_partition_clamps_overfull_children() {
        // children sum to twice the parent total
        let parts = partition(10, 10, [15, 5]);
        assert_eq!(parts, vec![10, 0]);
    }

    #[test]
    fn test_depth() {
        let tree = SizeTree::new("r", 3)
            .with_child(SizeTree::new("a", 2).with_child(SizeTree::new("b", 1)));
        assert_eq!(tree.depth(), 2);
        assert_eq!(SizeTree::new("leaf", 0).depth(), 0);
    }
}
