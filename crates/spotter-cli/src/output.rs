//! Output writing for the CLI.

use crate::error::Result;
use spotter_domain::OutputFormat;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File written for `--output-path base`: the format extension is appended, never substituted.
pub fn destination(base: &Path, format: OutputFormat) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Write `contents` to `base.<ext>`, or to stdout when no base is given.
///
/// Returns the file written, if any.
pub fn write_output(contents: &str, base: Option<&Path>, format: OutputFormat) -> Result<Option<PathBuf>> {
    match base {
        Some(base) => {
            let path = destination(base, format);
            fs::write(&path, contents)?;
            Ok(Some(path))
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(contents.as_bytes())?;
            handle.flush()?;
            Ok(None)
        }
    }
}
