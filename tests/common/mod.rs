#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tempfile::TempDir;

/// Bytes written for every fake input PDF.
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% fake document padded so the copy comes out smaller\n%%EOF\n";

/// Size of what the copying script writes.
pub const COMPRESSED_LEN: u64 = 16;

/// Creates a directory holding the named files, each filled with `FAKE_PDF`.
pub fn dir_with(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        fs::write(dir.path().join(name), FAKE_PDF).unwrap();
    }
    dir
}

/// Sorted file names directly inside `dir`.
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Shell scripts that stand in for Ghostscript.
///
/// They are all written once per test binary, before any test spawns a
/// process, so no script is ever executed while still open for writing.
#[cfg(unix)]
pub struct FakeGs {
    dir: TempDir,
}

#[cfg(unix)]
const PARSE_ARGS: &str = r#"#!/bin/sh
out=""
last=""
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
  esac
  last="$arg"
done
"#;

#[cfg(unix)]
impl FakeGs {
    pub fn get() -> &'static FakeGs {
        static FAKE: OnceLock<FakeGs> = OnceLock::new();
        FAKE.get_or_init(|| {
            let fake = FakeGs {
                dir: tempfile::tempdir().unwrap(),
            };
            fake.write("copying", r#"head -c 16 "$last" > "$out""#);
            fake.write("failing", r#"echo "**** Error: cannot find trailer" >&2; exit 1"#);
            fake.write("silent", "exit 0");
            fake.write(
                "picky",
                r#"case "$last" in *bad*) echo "**** Error: broken file" >&2; exit 3 ;; esac
head -c 16 "$last" > "$out""#,
            );
            fake.write(
                "preset-hater",
                r#"case "$*" in *-dJPEGQ=*) echo "preset rejected" >&2; exit 1 ;; esac
head -c 16 "$last" > "$out""#,
            );
            fake.write(
                "recording",
                r#"printf '%s\n' "$@" > "$last.args"
head -c 16 "$last" > "$out""#,
            );
            fake
        })
    }

    fn write(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        fs::write(&path, format!("{PARSE_ARGS}{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn script(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
