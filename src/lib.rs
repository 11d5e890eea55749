//! Compress PDF files by running Ghostscript with preset flag sets.

pub mod batch;
pub mod cli;
pub mod compressor;
pub mod config;
pub mod error;
pub mod files;
pub mod manifest;
pub mod mode;
pub mod report;

pub use compressor::{Compressor, Ghostscript, Job};
pub use config::Config;
pub use error::{Error, Result};
pub use mode::{Mode, ModeProvider, ModeSource};
pub use report::BatchResult;
