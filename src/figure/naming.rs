use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use log::debug;

use crate::error::{Error, Result};

/// Smallest `n >= 0` such that no entry of `dir` matches `{base}_{n}.*`.
///
/// The answer is only valid at the time of the scan: another writer using
/// the same directory and base name may pick the same suffix.
pub fn next_free_suffix(dir: &Path, base: &str) -> Result<u32> {
    check_base_name(base)?;
    let names = entry_names(dir)?;
    let mut suffix = 0u32;
    loop {
        let matcher = suffix_matcher(base, suffix)?;
        match names.iter().find(|name| matcher.is_match(name)) {
            Some(taken) => {
                debug!("suffix {suffix} taken by {}", taken.to_string_lossy());
                suffix = suffix.checked_add(1).ok_or_else(|| {
                    Error::InvalidOptions(format!("no free suffix left for '{base}'"))
                })?;
            }
            None => return Ok(suffix),
        }
    }
}

/// `{base}_{suffix}.{ext}` inside `dir`.
pub fn numbered_path(dir: &Path, base: &str, suffix: u32, ext: &str) -> PathBuf {
    dir.join(format!("{base}_{suffix}.{ext}"))
}

/// A base name must be a single, non-empty path component.
pub(crate) fn check_base_name(base: &str) -> Result<()> {
    let mut components = Path::new(base).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !base.contains(['/', '\\']) => Ok(()),
        _ => Err(Error::InvalidOptions(format!(
            "base file name '{base}' must be a plain file name"
        ))),
    }
}

fn suffix_matcher(base: &str, suffix: u32) -> Result<GlobMatcher> {
    let pattern = format!("{}_{suffix}.*", globset::escape(base));
    GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|err| Error::InvalidOptions(format!("bad file name pattern: {err}")))
}

fn entry_names(dir: &Path) -> Result<Vec<OsString>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    entries
        .map(|entry| {
            entry
                .map(|e| e.file_name())
                .map_err(|e| Error::io(dir, e))
        })
        .collect()
}
