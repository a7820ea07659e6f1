use crate::archive::{looks_like_tar, looks_like_zip};
use crate::args::Args;
use crate::bars::{BarRenderer, LineStyle, Paint};
use crate::columns::ColumnsRenderer;
use crate::errors::VizError;
use crate::size_format::SizeFormatter;
use crate::terminal::terminal_size;
use crate::traits::TreeRenderer;
use std::path::Path;

/// Where sizes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `du -k`, cumulative byte sizes.
    Du,
    /// `ls -aiR`, inode counts.
    Inodes,
    /// In-process directory walk, on-disk byte sizes.
    Walk,
    /// Member sizes of a ZIP archive, compressed or not.
    Zip { compressed: bool },
    /// Member sizes of a tar archive.
    Tar,
}

/// Chart layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bars { lines: LineStyle, paint: Paint },
    Columns { paint: Paint },
}

/// Configuration structure containing runtime settings.
///
/// # Fields
///
/// * `paths` - Existing paths to chart, one chart each
/// * `width` - Width of every chart line
/// * `height` - Number of lines of a columns chart
/// * `max_depth` - Number of levels rendered below each root
/// * `source` - Size acquisition method for directories
/// * `style` - Chart layout and painting
/// * `formatter` - Byte size label formatting
/// * `force_zip` - Read every path as a ZIP archive
/// * `force_tar` - Read every path as a tar archive
/// * `zip_compressed` - Chart compressed member sizes of ZIP archives
/// * `one_file_system` - Stay on the file system of each root
/// * `dereference` - Follow symbolic links
/// * `show_progress` - Show a spinner while scanning
///
#[derive(Debug, Clone)]
pub struct Config {
    pub paths: Vec<String>,
    pub width: usize,
    pub height: usize,
    pub max_depth: usize,
    pub source: Source,
    pub style: Style,
    pub formatter: SizeFormatter,
    pub force_zip: bool,
    pub force_tar: bool,
    pub zip_compressed: bool,
    pub one_file_system: bool,
    pub dereference: bool,
    pub show_progress: bool,
}

impl Config {
    /// Builds a new Config instance from provided command line arguments.
    ///
    /// # Details
    ///
    /// 1. Drops paths that do not exist, with a warning
    /// 2. Falls back to the terminal geometry for width and height
    /// 3. Picks the size source for directories and the byte formatter
    /// 4. Picks the chart style from the layout flags
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidArgument`] if the width or height is zero.
    pub fn build(args: &Args) -> Result<Config, VizError> {
        let paths: Vec<String> = args
            .paths
            .iter()
            .filter(|path| {
                let exists = Path::new(path).exists();
                if !exists {
                    log::warn!("not a valid path: {:?}", path);
                }
                exists
            })
            .cloned()
            .collect();

        let terminal = terminal_size();
        let width = args.width.unwrap_or(terminal.width);
        if width == 0 {
            return Err(VizError::InvalidArgument("width must be at least 1".to_string()));
        }
        let height = args
            .height
            .unwrap_or_else(|| terminal.height.saturating_sub(1).max(1));
        if height == 0 {
            return Err(VizError::InvalidArgument("height must be at least 1".to_string()));
        }

        let source = if args.inodes {
            Source::Inodes
        } else if args.walk {
            Source::Walk
        } else {
            Source::Du
        };
        let formatter = if args.binary {
            SizeFormatter::bytes_binary()
        } else {
            SizeFormatter::bytes()
        };

        let paint = if args.color { Paint::Color } else { Paint::Ascii };
        let style = if args.columns {
            Style::Columns { paint }
        } else if args.one_line {
            Style::Bars {
                lines: LineStyle::Single,
                paint,
            }
        } else {
            Style::Bars {
                lines: LineStyle::Double,
                paint,
            }
        };

        log::info!(
            "charting {} path(s) at {}x{} with {:?}, {:?}",
            paths.len(),
            width,
            height,
            style,
            source
        );

        Ok(Config {
            paths,
            width,
            height,
            max_depth: args.max_depth,
            source,
            style,
            formatter,
            force_zip: args.zip,
            force_tar: args.tar,
            zip_compressed: !args.unzip_size,
            one_file_system: args.one_file_system,
            dereference: args.dereference,
            show_progress: !args.no_progress,
        })
    }

    /// The source to read `path` with: archives are recognized by the `--zip`/`--tar` flags or
    /// by their file extension, everything else uses the configured source.
    pub fn source_for(&self, path: &str) -> Source {
        if self.force_zip || looks_like_zip(path) {
            Source::Zip {
                compressed: self.zip_compressed,
            }
        } else if self.force_tar || looks_like_tar(path) {
            Source::Tar
        } else {
            self.source
        }
    }

    /// Inode counts are plain numbers, every other source measures bytes.
    pub fn formatter_for(&self, source: Source) -> SizeFormatter {
        match source {
            Source::Inodes => SizeFormatter::count(),
            _ => self.formatter.clone(),
        }
    }

    /// The renderer matching the configured style, labelling sizes with `formatter`.
    pub fn renderer(&self, formatter: SizeFormatter) -> Box<dyn TreeRenderer> {
        match self.style {
            Style::Bars { lines, paint } => Box::new(
                BarRenderer::new(lines, paint)
                    .with_max_depth(self.max_depth)
                    .with_formatter(formatter),
            ),
            Style::Columns { paint } => Box::new(
                ColumnsRenderer::new(self.height, paint)
                    .with_max_depth(self.max_depth)
                    .with_formatter(formatter),
            ),
        }
    }
}
