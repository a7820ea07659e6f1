/// Error type representing the failures that can occur while collecting sizes or charting them.
///
/// Rendering itself never fails: zero sizes, inconsistent children and overlong labels all
/// degrade into empty or truncated blocks. Errors only arise at the edges, when size data is
/// acquired from a subprocess, a listing or the file system, or when the input violates the
/// non-negative size precondition.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// Represents underlying I/O errors from the standard library.
    ///
    /// This variant wraps [`std::io::Error`] and is used for file system
    /// operations that fail, such as reading directories or subprocess pipes.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A (path, size) pair carried a negative size.
    ///
    /// # Examples
    /// ```
    /// use ferris_usage::errors::VizError;
    /// let err = VizError::NegativeSize { path: "a/b".to_string(), size: -3 };
    /// assert_eq!(format!("{}", err), "Negative size -3 for path \"a/b\"");
    /// ```
    #[error("Negative size {size} for path {path:?}")]
    NegativeSize { path: String, size: i64 },

    /// An external utility (`du`, `ls`) could not be launched or exited with failure.
    #[error("Subprocess error: {0}")]
    Subprocess(String),

    /// A ZIP archive could not be read.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A line of a `du`/`ls` listing could not be interpreted.
    #[error("Listing error on line {line:?}: {reason}")]
    Listing { line: String, reason: String },

    /// A command line value that parsed but makes no sense, such as a zero width.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
