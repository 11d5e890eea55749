//! Finds the PDF files a run should process.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// What the input path turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A single PDF file
    File(PathBuf),
    /// A directory and the PDFs directly inside it
    Directory { root: PathBuf, files: Vec<PathBuf> },
}

impl Input {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Input::File(path) => std::slice::from_ref(path),
            Input::Directory { files, .. } => files,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Input::Directory { .. })
    }
}

/// True for paths ending in `.pdf`, ignoring case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Resolves `path` into the files to compress.
///
/// A directory is scanned one level deep; entries come back in the order the
/// filesystem lists them.
pub fn enumerate(path: &Path) -> Result<Input> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    if !meta.is_dir() {
        if !is_pdf(path) {
            return Err(Error::NotPdf {
                path: path.to_path_buf(),
            });
        }
        return Ok(Input::File(path.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(path).to_path_buf();
            Error::io(at, e.into())
        })?;
        // follow symlinks so a linked PDF counts like a regular one
        let is_file = if entry.path_is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_file()
        };
        if is_file && is_pdf(entry.path()) {
            files.push(entry.into_path());
        } else {
            log::debug!("Skipping {}", entry.path().display());
        }
    }

    Ok(Input::Directory {
        root: path.to_path_buf(),
        files,
    })
}
