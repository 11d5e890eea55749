use std::ffi::OsString;
use std::fs::metadata;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempPath;

use crate::error::{Error, Result};
use crate::mode::Mode;

/// One file to compress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: Mode,
}

impl Job {
    pub fn new(input: &Path, output_dir: Option<&Path>, mode: Mode) -> Self {
        Job {
            input: input.to_path_buf(),
            output: output_path_for(input, output_dir),
            mode,
        }
    }
}

/// Turns a job's input into its output.
///
/// On `Ok` the output file exists and is non-empty; on `Err` nothing was
/// written at the output path.
pub trait Compressor {
    fn compress(&self, job: &Job) -> Result<()>;
}

/// Where the compressed copy of `input` goes.
///
/// With an output directory the file keeps its name. Without one it lands
/// next to the input as `<stem>_compressed.pdf`, so the input is never
/// overwritten.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = input.file_name().map(PathBuf::from).unwrap_or_default();
    if let Some(dir) = output_dir {
        let candidate = dir.join(&file_name);
        if !same_file(&candidate, input) {
            return candidate;
        }
        return dir.join(suffixed(input));
    }
    input.with_file_name(suffixed(input))
}

fn suffixed(input: &Path) -> OsString {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push("_compressed.pdf");
    name
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Name prefix of the files Ghostscript writes into before they are renamed.
pub const STAGING_PREFIX: &str = ".pdf-compressor-";

/// Creates the hidden file Ghostscript writes into.
///
/// The suffix is not `.pdf`, so one left behind by a killed run is never
/// picked up as input by the next.
fn staging_file(dir: &Path) -> Result<TempPath> {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map(|file| file.into_temp_path())
        .map_err(|e| Error::io(dir, e))
}

/// Ghostscript treats `%` in the output name as a page-number template.
#[cfg(unix)]
fn output_file_arg(path: &Path) -> Result<OsString> {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let mut arg = b"-sOutputFile=".to_vec();
    for &byte in path.as_os_str().as_bytes() {
        if byte == b'%' {
            arg.push(b'%');
        }
        arg.push(byte);
    }
    Ok(OsString::from_vec(arg))
}

#[cfg(not(unix))]
fn output_file_arg(path: &Path) -> Result<OsString> {
    let Some(utf8) = path.to_str() else {
        return Err(Error::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path is not valid Unicode"),
        ));
    };
    let mut arg = OsString::from("-sOutputFile=");
    arg.push(utf8.replace('%', "%%"));
    Ok(arg)
}

/// Compresses by running the Ghostscript executable.
#[derive(Debug, Clone)]
pub struct Ghostscript {
    binary: PathBuf,
    fallback: bool,
}

impl Ghostscript {
    /// Uses `binary` as-is, without checking that it exists.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Ghostscript {
            binary: binary.into(),
            fallback: false,
        }
    }

    /// Finds a Ghostscript executable.
    ///
    /// An explicit path must exist or be found on `PATH`. Without one the
    /// platform's usual names and install locations are tried.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(Self::new(path));
            }
            return which::which(path)
                .map(Self::new)
                .map_err(|_| Error::GhostscriptNotFound {
                    requested: Some(path.to_path_buf()),
                });
        }

        default_candidates()
            .into_iter()
            .find_map(|candidate| {
                if candidate.is_absolute() {
                    candidate.is_file().then_some(candidate)
                } else {
                    which::which(&candidate).ok()
                }
            })
            .map(Self::new)
            .ok_or(Error::GhostscriptNotFound { requested: None })
    }

    /// Makes one more attempt with minimal settings when the preset fails.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run(&self, job: &Job, flags: &[&str]) -> Result<()> {
        let parent = job
            .output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        // write beside the destination, so a failed run never leaves a
        // partial file under the real name
        let staging = staging_file(parent)?;

        let mut command = Command::new(&self.binary);
        command
            .args(flags)
            .arg(output_file_arg(&staging)?)
            .arg(&job.input)
            .stdin(Stdio::null());
        log::debug!("Running {command:?}");

        let output = command.output().map_err(|source| Error::Launch {
            binary: self.binary.clone(),
            source,
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.trim().is_empty() {
            log::debug!("Ghostscript stderr for {}:\n{}", job.input.display(), stderr.trim_end());
        }

        let produced = metadata(&staging).map(|m| m.len()).unwrap_or(0);
        if !output.status.success() || produced == 0 {
            return Err(Error::ExternalTool {
                path: job.input.clone(),
                code: output.status.code(),
                stderr,
            });
        }

        staging
            .persist(&job.output)
            .map_err(|e| Error::io(&job.output, e.error))
    }
}

impl Compressor for Ghostscript {
    fn compress(&self, job: &Job) -> Result<()> {
        let flags = job.mode.command_flags();
        match self.run(job, &flags) {
            Err(err @ Error::ExternalTool { .. }) if self.fallback => {
                log::warn!("{err}; retrying with minimal settings");
                self.run(job, &job.mode.fallback_flags())
            }
            result => result,
        }
    }
}

#[cfg(windows)]
fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from("gswin64c.exe"), PathBuf::from("gswin32c.exe")];
    for root in [r"C:\Program Files\gs", r"C:\Program Files (x86)\gs"] {
        let Ok(entries) = std::fs::read_dir(root) else {
            continue;
        };
        let mut versions: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        // newest install first
        versions.sort();
        versions.reverse();
        for version in versions {
            candidates.push(version.join("bin").join("gswin64c.exe"));
            candidates.push(version.join("bin").join("gswin32c.exe"));
        }
    }
    candidates
}

#[cfg(not(windows))]
fn default_candidates() -> Vec<PathBuf> {
    vec![PathBuf::from("gs")]
}
