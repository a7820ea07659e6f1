//! Size trees from the output of `du` and `ls`.
//!
//! `du -k` reports the cumulative size of every directory, one `<kilobytes> <path>` line each.
//! `ls -aiR` lists every entry with its inode number, one block per directory; inode counts
//! are own counts, so they are summed bottom-up afterwards.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

use crate::errors::VizError;
use crate::progress::ProgressReporter;
use crate::size_tree::{SizeMode, SizeTree};

const SEP: char = '/';

/// Splits a file system path into its components, stopping at `base` if it is reached.
///
/// The base (or a leading `/`) is kept as a single first component.
///
/// # Examples
///
/// ```
/// use ferris_usage::listing::path_split;
/// assert_eq!(path_split("a/b/c", ""), vec!["a", "b", "c"]);
/// assert_eq!(path_split("/a/b", ""), vec!["/", "a", "b"]);
/// assert_eq!(path_split("./a/b", "."), vec![".", "a", "b"]);
/// assert_eq!(path_split("/data/x/y", "/data/"), vec!["/data", "x", "y"]);
/// ```
pub fn path_split(path: &str, base: &str) -> Vec<String> {
    let base = base.trim_end_matches(SEP);

    let mut items = Vec::new();
    let mut path = path;
    loop {
        if path == base {
            items.push(path.to_string());
            break;
        }
        let (head, tail) = split_last(path);
        if !tail.is_empty() {
            items.push(tail.to_string());
        }
        path = head;
        if path.is_empty() {
            break;
        }
        if path == "/" {
            items.push(path.to_string());
            break;
        }
    }
    items.reverse();
    items
}

/// Splits off the last component. Trailing separators are stripped from the head unless the
/// head consists of separators only.
fn split_last(path: &str) -> (&str, &str) {
    match path.rfind(SEP) {
        Some(i) => {
            let head = &path[..=i];
            let trimmed = head.trim_end_matches(SEP);
            let head = if trimmed.is_empty() { head } else { trimmed };
            (head, &path[i + 1..])
        }
        None => ("", path),
    }
}

/// Components of `path` below `root`.
fn relative_components(path: &str, root: &str) -> Vec<String> {
    path_split(path, root).into_iter().skip(1).collect()
}

/// Parses one `du -k` line into kilobytes and path.
fn parse_du_line(line: &str) -> Result<(i64, &str), VizError> {
    let end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    let kilobytes = line[..end].parse().map_err(|_| VizError::Listing {
        line: line.to_string(),
        reason: "expected a leading size in kilobytes".to_string(),
    })?;
    Ok((kilobytes, line[end..].trim_start()))
}

/// Builds a cumulative size tree from `du -k` output lines.
///
/// ```
/// use ferris_usage::listing::tree_from_du_listing;
/// use ferris_usage::progress::ProgressReporter;
/// let listing = ["4\t./a/b", "12\t./a", "20\t."];
/// let tree = tree_from_du_listing(".", listing, &ProgressReporter::hidden()).unwrap();
/// assert_eq!(tree.size, 20 * 1024);
/// assert_eq!(tree.children["a"].children["b"].size, 4 * 1024);
/// ```
pub fn tree_from_du_listing<I, S>(
    root: &str,
    lines: I,
    progress: &ProgressReporter,
) -> Result<SizeTree, VizError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pairs = Vec::new();
    for line in lines {
        let line = line.as_ref().trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            continue;
        }
        let (kilobytes, path) = parse_du_line(line)?;
        progress.report(path);
        pairs.push((relative_components(path, root), kilobytes.saturating_mul(1024)));
    }
    log::debug!("read {} du entries for {:?}", pairs.len(), root);
    SizeTree::from_path_size_pairs(pairs, root, SizeMode::Cumulative)
}

/// Builds an inode-count tree from `ls -aiR` output.
///
/// Every inode is counted once, in the first directory it shows up in, so hard links do not
/// inflate the totals.
pub fn tree_from_ls_listing(
    root: &str,
    listing: &str,
    progress: &ProgressReporter,
) -> Result<SizeTree, VizError> {
    let mut all_inodes: HashSet<u64> = HashSet::new();
    let mut pairs = Vec::new();

    for (i, block) in listing.trim_end_matches('\n').split("\n\n").enumerate() {
        let mut items: Vec<&str> = block.split('\n').collect();
        let has_header = items.first().is_some_and(|first| first.ends_with(':'));
        // BSD ls omits the header of the first block
        let path = if i == 0 && !has_header {
            root.to_string()
        } else {
            items.remove(0).trim_end_matches(':').to_string()
        };

        let mut count: i64 = 0;
        for item in items {
            let item = item.trim_start();
            if item.is_empty() {
                continue;
            }
            let (inode, name) = item.split_once(' ').ok_or_else(|| VizError::Listing {
                line: item.to_string(),
                reason: "expected `<inode> <name>`".to_string(),
            })?;
            if name == ".." {
                continue;
            }
            let inode: u64 = inode.parse().map_err(|_| VizError::Listing {
                line: item.to_string(),
                reason: "invalid inode number".to_string(),
            })?;
            if all_inodes.insert(inode) {
                count += 1;
            }
        }

        progress.report(&path);
        pairs.push((relative_components(&path, root), count));
    }

    log::debug!("counted {} distinct inodes under {:?}", all_inodes.len(), root);
    SizeTree::from_path_size_pairs(pairs, root, SizeMode::LeafExclusive)
}

/// Runs `du -k` on `root` and builds its size tree.
///
/// Sizes are measured in 1024 byte blocks, which both GNU and BSD `du` support.
pub fn du(
    root: &str,
    one_file_system: bool,
    dereference: bool,
    progress: &ProgressReporter,
) -> Result<SizeTree, VizError> {
    let mut command = Command::new("du");
    command.arg("-k");
    if one_file_system {
        command.arg("-x");
    }
    if dereference {
        command.arg("-L");
    }
    command.arg(root).stdout(Stdio::piped());
    log::info!("running {:?}", command);

    let mut child = command.spawn().map_err(|e| {
        VizError::Subprocess(format!(
            "Failed to launch \"du\" utility subprocess ({e}). Is it installed and in your PATH?"
        ))
    })?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| VizError::Subprocess("du produced no output pipe".to_string()))?;

    // lines are parsed while du is still running, so progress follows the scan
    let mut read_error = None;
    let lines = BufReader::new(stdout)
        .split(b'\n')
        .map_while(|line| match line {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                read_error = Some(e);
                None
            }
        });
    let tree = tree_from_du_listing(root, lines, progress);

    let status = child.wait()?;
    if let Some(e) = read_error {
        return Err(e.into());
    }
    if !status.success() {
        // du still reports what it could read, e.g. with unreadable subdirectories
        log::warn!("du exited with {} for {:?}", status, root);
    }
    tree
}

/// Runs `ls -aiR` on `root` and builds its inode-count tree.
pub fn ls(root: &str, progress: &ProgressReporter) -> Result<SizeTree, VizError> {
    let mut command = Command::new("ls");
    command.arg("-aiR").arg(root);
    log::info!("running {:?}", command);

    let output = command
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| VizError::Subprocess(format!("Failed to launch \"ls\" subprocess ({e})")))?;
    if !output.status.success() {
        log::warn!("ls exited with {} for {:?}", output.status, root);
    }
    tree_from_ls_listing(root, &String::from_utf8_lossy(&output.stdout), progress)
}
