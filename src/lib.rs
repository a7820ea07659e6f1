pub mod archive;
pub mod args;
pub mod bar;
pub mod bars;
pub mod colorizer;
pub mod columns;
pub mod config;
pub mod errors;
pub mod listing;
pub mod progress;
pub mod size_format;
pub mod size_tree;
pub mod terminal;
pub mod traits;
pub mod walk;


use config::{Config, Source};
use errors::VizError;
use progress::ProgressReporter;
use size_tree::SizeTree;
use walk::WalkOptions;

/// Scans every configured path and prints its chart to stdout.
///
/// Paths are handled one after the other; a failure on one path stops the run.
pub fn run(config: Config) -> Result<(), VizError> {
    for path in &config.paths {
        let source = config.source_for(path);
        let tree = scan(path, source, &config)?;
        log::debug!("{:?}: total {} across {} levels", path, tree.size, tree.depth());
        let renderer = config.renderer(config.formatter_for(source));
        println!("{}", renderer.render(&tree, config.width).join("\n"));
    }
    Ok(())
}

/// Builds the size tree of one path with the given source.
pub fn scan(path: &str, source: Source, config: &Config) -> Result<SizeTree, VizError> {
    let progress = ProgressReporter::enabled(config.show_progress);
    let tree = match source {
        Source::Du => listing::du(path, config.one_file_system, config.dereference, &progress),
        Source::Inodes => listing::ls(path, &progress),
        Source::Walk => walk::walk(
            path,
            WalkOptions {
                one_file_system: config.one_file_system,
                dereference: config.dereference,
            },
            &progress,
        ),
        Source::Zip { compressed } => archive::tree_from_zip(path, compressed, &progress),
        Source::Tar => archive::tree_from_tar(path, &progress),
    };
    progress.finish();
    tree
}
