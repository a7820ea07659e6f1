use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use filesize::PathExt;

use crate::errors::VizError;
use crate::progress::ProgressReporter;
use crate::size_tree::{SizeMode, SizeTree};

/// Options for an in-process directory walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Skip directories on other file systems than the root.
    pub one_file_system: bool,
    /// Follow symbolic links.
    pub dereference: bool,
}

/// State shared by the recursive walk.
struct Walk<'a> {
    options: WalkOptions,
    device: Option<u64>,
    visited: HashSet<(u64, u64)>,
    pairs: Vec<(Vec<String>, i64)>,
    progress: &'a ProgressReporter,
}

/// Builds a size tree of `root` by walking it directly, without calling `du`.
///
/// Every file contributes its size on disk, directories contribute nothing of their own, and
/// totals are aggregated bottom-up. A file with several hard links is counted at the first
/// link reached, as `du` does. Entries that cannot be read are logged and skipped.
///
/// # Errors
///
/// Fails only when `root` itself cannot be inspected.
pub fn walk(
    root: &str,
    options: WalkOptions,
    progress: &ProgressReporter,
) -> Result<SizeTree, VizError> {
    let root_path = Path::new(root);
    let metadata = entry_metadata(root_path, options.dereference)?;

    let mut state = Walk {
        options,
        device: device_id(&metadata),
        visited: HashSet::new(),
        pairs: vec![(Vec::new(), 0)],
        progress,
    };

    if metadata.is_dir() {
        if let Some(id) = file_id(&metadata) {
            state.visited.insert(id);
        }
        let mut prefix = Vec::new();
        if let Err(e) = visit_dirs(root_path, &mut prefix, &mut state) {
            log::warn!("Error reading {}: {}", root_path.display(), e);
        }
    } else {
        state.pairs[0].1 = on_disk_size(root_path, &metadata)?;
    }

    log::debug!("walked {} entries under {:?}", state.pairs.len(), root);
    SizeTree::from_path_size_pairs(state.pairs, root, SizeMode::LeafExclusive)
}

/// Visits each entry of `dir`; files are sized, directories are recorded and entered.
fn visit_dirs(dir: &Path, prefix: &mut Vec<String>, state: &mut Walk) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error reading entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        let metadata = match entry_metadata(&path, state.options.dereference) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Error reading metadata of {}: {}", path.display(), e);
                continue;
            }
        };

        prefix.push(entry.file_name().to_string_lossy().into_owned());
        if metadata.is_dir() {
            if should_enter(&metadata, state) {
                state.pairs.push((prefix.clone(), 0));
                state.progress.report(&path.to_string_lossy());
                if let Err(e) = visit_dirs(&path, prefix, state) {
                    log::warn!("Error reading {}: {}", path.display(), e);
                }
            }
        } else if is_repeated_link(&metadata, state) {
            log::trace!("skipping hard link {}", path.display());
        } else {
            match on_disk_size(&path, &metadata) {
                Ok(size) => state.pairs.push((prefix.clone(), size)),
                Err(e) => log::warn!("Error sizing {}: {}", path.display(), e),
            }
        }
        prefix.pop();
    }
    Ok(())
}

fn should_enter(metadata: &Metadata, state: &mut Walk) -> bool {
    if state.options.one_file_system && device_id(metadata) != state.device {
        return false;
    }
    // followed symlinks can lead back to a directory that is already being walked
    match file_id(metadata) {
        Some(id) => state.visited.insert(id),
        None => true,
    }
}

fn is_repeated_link(metadata: &Metadata, state: &mut Walk) -> bool {
    if link_count(metadata) < 2 {
        return false;
    }
    match file_id(metadata) {
        Some(id) => !state.visited.insert(id),
        None => false,
    }
}

fn entry_metadata(path: &Path, dereference: bool) -> io::Result<Metadata> {
    if dereference {
        fs::metadata(path)
    } else {
        path.symlink_metadata()
    }
}

fn on_disk_size(path: &Path, metadata: &Metadata) -> io::Result<i64> {
    let size = path.size_on_disk_fast(metadata)?;
    Ok(i64::try_from(size).unwrap_or(i64::MAX))
}

#[cfg(unix)]
fn device_id(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.dev())
}

#[cfg(not(unix))]
fn device_id(_metadata: &Metadata) -> Option<u64> {
    None
}

#[cfg(unix)]
fn link_count(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
fn link_count(_metadata: &Metadata) -> u64 {
    1
}

#[cfg(unix)]
fn file_id(metadata: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((metadata.dev(), metadata.ino()))
}

#[cfg(not(unix))]
fn file_id(_metadata: &Metadata) -> Option<(u64, u64)> {
    None
}
