//! SHA-256 manifest of the files a run produced.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

pub const MANIFEST_NAME: &str = "manifest-sha256.txt";

/// Hex SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Writes `<hash>  <file name>` for each file into `dir/manifest-sha256.txt`.
pub fn write_manifest(dir: &Path, files: &[PathBuf]) -> Result<PathBuf> {
    let manifest = dir.join(MANIFEST_NAME);
    let file = File::create(&manifest).map_err(|e| Error::io(&manifest, e))?;
    let mut out = BufWriter::new(file);
    for path in files {
        let hash = sha256_file(path).map_err(|e| Error::io(path, e))?;
        let name = path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy();
        writeln!(out, "{hash}  {name}").map_err(|e| Error::io(&manifest, e))?;
    }
    out.flush().map_err(|e| Error::io(&manifest, e))?;
    Ok(manifest)
}
