//! Canonical output names and collision-safe placement.

use std::path::Path;

/// Canonical filename for an identified document.
///
/// The date is already a 6-digit `YYMMDD` token and the number is used
/// verbatim, without re-padding.
pub fn canonical_name(date: &str, number: &str, extension: &str) -> String {
    format!("{date}_{number}.{extension}")
}

/// Resolve `filename` against the contents of `dir`.
///
/// Returns the name unchanged when unused, otherwise appends `" (n)"`
/// before the extension with the first free `n` starting at 1. The
/// check-then-use sequence is only safe while this run is the sole writer
/// to `dir`.
pub fn unique_name(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }

    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, extension)) => (stem, Some(extension)),
        None => (filename, None),
    };

    let mut counter = 1u32;
    loop {
        let candidate = match extension {
            Some(extension) => format!("{stem} ({counter}).{extension}"),
            None => format!("{stem} ({counter})"),
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}
