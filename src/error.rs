//! Error types for the compressor.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while resolving a run or compressing a file.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested compression mode is not one of the presets
    #[error("Unknown compression mode `{name}` (expected conservative, balanced, aggressive, nuclear or beast)")]
    InvalidMode {
        /// The name as given on the command line
        name: String,
    },

    /// The input path does not exist
    #[error("{}: No such file or directory", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// A single-file input without a `.pdf` extension
    #[error("{}: Not a PDF file", path.display())]
    NotPdf {
        /// Path to the rejected file
        path: PathBuf,
    },

    /// No usable Ghostscript executable
    #[error("Ghostscript not found{}; install it or pass its path with -g", requested.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    GhostscriptNotFound {
        /// Explicitly requested location, if any
        requested: Option<PathBuf>,
    },

    /// The Ghostscript process could not be started
    #[error("{}: Cannot run Ghostscript: {source}", binary.display())]
    Launch {
        /// Executable that failed to start
        binary: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Ghostscript ran but did not produce a usable file
    #[error("{}: Ghostscript failed ({}){}", path.display(), describe_exit(*code), first_line(stderr))]
    ExternalTool {
        /// Input file being compressed
        path: PathBuf,
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The output directory could not be created
    #[error("{}: Cannot create output directory: {source}", path.display())]
    CreateOutputDir {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The interactive prompt reached end of input without a choice
    #[error("No compression mode selected")]
    NoModeSelected,

    /// Any other filesystem failure
    #[error("{}: {source}", path.display())]
    Io {
        /// Path involved in the failure
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Specialized `Result` type for compressor operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(0) => "no output produced".to_string(),
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn first_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| format!(": {line}"))
        .unwrap_or_default()
}
