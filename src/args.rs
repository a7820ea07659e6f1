use clap::Parser;

/// Render ASCII-art representation of disk space usage.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directories or ZIP/tar archives to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<String>,

    /// (optional) Total width of all bars, defaults to the terminal width
    #[arg(short = 'w', long = "width", value_name = "WIDTH")]
    pub width: Option<usize>,

    /// (optional) Total height of the --columns chart, defaults to the terminal height
    #[arg(short = 'H', long = "height", value_name = "HEIGHT")]
    pub height: Option<usize>,

    /// Skip directories on different file systems
    #[arg(short = 'x', long = "one-file-system")]
    pub one_file_system: bool,

    /// Dereference all symbolic links
    #[arg(short = 'L', long = "dereference")]
    pub dereference: bool,

    /// Maximum recursion depth
    #[arg(long = "max-depth", value_name = "N", default_value_t = 5)]
    pub max_depth: usize,

    /// Count inodes instead of file size
    #[arg(short = 'i', long = "inodes")]
    pub inodes: bool,

    /// Size files in-process instead of running `du`
    #[arg(long = "walk", conflicts_with = "inodes")]
    pub walk: bool,

    /// Force ZIP handling of the given paths (e.g. lacking a `.zip` extension)
    #[arg(long = "zip", conflicts_with = "tar")]
    pub zip: bool,

    /// Chart uncompressed instead of compressed member sizes of ZIP archives
    #[arg(long = "unzip-size")]
    pub unzip_size: bool,

    /// Force tar handling of the given paths (e.g. lacking a `.tar`, `.tar.gz`, ... extension)
    #[arg(long = "tar")]
    pub tar: bool,

    /// Use binary units (KiB, MiB, ...) for byte sizes
    #[arg(short = 'b', long = "binary")]
    pub binary: bool,

    /// Disable progress reporting
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Show one line bars instead of two line bars
    #[arg(short = '1', long = "one-line")]
    pub one_line: bool,

    /// Use colors to render bars (instead of ASCII art)
    #[arg(short = 'c', long = "color")]
    pub color: bool,

    /// Lay out depth levels as side-by-side columns
    #[arg(long = "columns", conflicts_with = "one_line")]
    pub columns: bool,

    #[arg(short, long)]
    pub verbose: bool,
}
