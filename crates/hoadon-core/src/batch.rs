//! Batch sorting of invoice files into success and failure directories.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::invoice::{self, DocumentOutcome};
use crate::naming::{canonical_name, unique_name};
use crate::pdf::TextSource;
use crate::xml;

/// Counters reported on the final protocol line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files renamed into the success directory.
    pub success: usize,
    /// Files placed unchanged into the failure directory.
    pub failed: usize,
}

/// Outcome of one file, already reduced to its protocol wording.
enum FileStatus {
    Success,
    Failed,
    Error(String),
}

/// Process every input file and write one protocol line per file to `out`,
/// followed by a summary line. Each line is flushed as soon as it is
/// written so a supervising process can follow along.
///
/// Identified invoices are copied into `success_dir` under their canonical
/// name; everything else, including files that fail to read, is copied
/// unchanged into `failed_dir`. Inputs are never modified or removed.
/// Only a failure to create the destination directories aborts the run.
pub fn run<W: Write>(
    inputs: &[PathBuf],
    success_dir: &Path,
    failed_dir: &Path,
    source: &dyn TextSource,
    out: &mut W,
) -> Result<BatchSummary> {
    fs::create_dir_all(success_dir)?;
    fs::create_dir_all(failed_dir)?;

    let mut summary = BatchSummary::default();
    for input in inputs {
        let name = display_name(input);
        let status = sort_file(input, success_dir, failed_dir, source);
        match status {
            FileStatus::Success => {
                summary.success += 1;
                writeln!(out, "PROGRESS: {} -> SUCCESS", name)?;
            }
            FileStatus::Failed => {
                summary.failed += 1;
                writeln!(out, "PROGRESS: {} -> FAILED", name)?;
            }
            FileStatus::Error(message) => {
                summary.failed += 1;
                writeln!(out, "PROGRESS: {} -> ERROR: {}", name, message)?;
            }
        }
        out.flush()?;
    }

    writeln!(
        out,
        "SUMMARY: SUCCESS={}, FAILED={}",
        summary.success, summary.failed
    )?;
    out.flush()?;
    Ok(summary)
}

/// Route one file into its bucket. Never propagates per-file errors;
/// they become the file's status instead.
fn sort_file(
    input: &Path,
    success_dir: &Path,
    failed_dir: &Path,
    source: &dyn TextSource,
) -> FileStatus {
    let outcome = match identify(input, source) {
        Ok(outcome) => outcome,
        Err(e) => {
            copy_to_failed_best_effort(input, failed_dir);
            return FileStatus::Error(e.to_string());
        }
    };

    if let DocumentOutcome {
        date: Some(date),
        number: Some(number),
    } = &outcome
    {
        let filename = canonical_name(date, number, canonical_extension(input));
        let target = success_dir.join(unique_name(success_dir, &filename));
        debug!("{} identified as {}", input.display(), filename);
        match fs::copy(input, &target) {
            Ok(_) => FileStatus::Success,
            Err(e) => {
                copy_to_failed_best_effort(input, failed_dir);
                FileStatus::Error(e.to_string())
            }
        }
    } else {
        match copy_to_failed(input, failed_dir) {
            Ok(()) => FileStatus::Failed,
            Err(e) => FileStatus::Error(e.to_string()),
        }
    }
}

/// Read the invoice identity, going through the XML reader for e-invoices
/// and through text extraction plus the rule catalogs for everything else.
fn identify(input: &Path, source: &dyn TextSource) -> Result<DocumentOutcome> {
    if is_xml(input) {
        xml::read_identity(input)
    } else {
        let text = source.extract_text(input)?;
        Ok(invoice::classify(&text))
    }
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

/// Extension used in the canonical filename, lowercase regardless of how
/// the input file spells it.
fn canonical_extension(path: &Path) -> &'static str {
    if is_xml(path) { "xml" } else { "pdf" }
}

/// Copy a file into the failure directory under its original name,
/// resolving collisions the same way the success side does.
fn copy_to_failed(input: &Path, failed_dir: &Path) -> std::io::Result<()> {
    let name = display_name(input);
    let target = failed_dir.join(unique_name(failed_dir, &name));
    fs::copy(input, target)?;
    Ok(())
}

/// Failure-side copy for files that already have an error status; a copy
/// failure here must not replace the original error message.
fn copy_to_failed_best_effort(input: &Path, failed_dir: &Path) {
    if let Err(e) = copy_to_failed(input, failed_dir) {
        warn!("could not place {} in failure directory: {}", input.display(), e);
    }
}

/// Name used in protocol lines and failure-side copies.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::PdfError;

    /// Text source backed by a map from file name to page text; files
    /// missing from the map behave like unreadable PDFs.
    struct StubSource {
        texts: HashMap<String, String>,
    }

    impl StubSource {
        fn new(entries: &[(&str, &str)]) -> Self {
            let texts = entries
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect();
            Self { texts }
        }
    }

    impl TextSource for StubSource {
        fn extract_text(&self, path: &Path) -> Result<String> {
            let name = display_name(path);
            self.texts
                .get(&name)
                .cloned()
                .ok_or_else(|| PdfError::Parse("unreadable".to_string()).into())
        }
    }

    const IDENTIFIED: &str = "Ngày 5 tháng 7 năm 2023\nSố: 456";

    struct Workspace {
        _dir: tempfile::TempDir,
        inputs: PathBuf,
        success: PathBuf,
        failed: PathBuf,
    }

    fn workspace() -> Workspace {
        let dir = tempfile::tempdir().unwrap();
        let inputs = dir.path().join("in");
        fs::create_dir(&inputs).unwrap();
        Workspace {
            success: dir.path().join("success"),
            failed: dir.path().join("failed"),
            inputs,
            _dir: dir,
        }
    }

    fn add_input(ws: &Workspace, name: &str, content: &str) -> PathBuf {
        let path = ws.inputs.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run_batch(ws: &Workspace, inputs: &[PathBuf], source: &StubSource) -> (BatchSummary, String) {
        let mut out = Vec::new();
        let summary = run(inputs, &ws.success, &ws.failed, source, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_identified_file_is_renamed_into_success() {
        let ws = workspace();
        let input = add_input(&ws, "a.pdf", "raw bytes");
        let source = StubSource::new(&[("a.pdf", IDENTIFIED)]);

        let (summary, out) = run_batch(&ws, &[input.clone()], &source);

        assert_eq!(out, "PROGRESS: a.pdf -> SUCCESS\nSUMMARY: SUCCESS=1, FAILED=0\n");
        assert_eq!(summary, BatchSummary { success: 1, failed: 0 });
        let target = ws.success.join("230705_456.pdf");
        assert_eq!(fs::read_to_string(target).unwrap(), "raw bytes");
        assert!(input.exists());
    }

    #[test]
    fn test_unrecognized_file_keeps_its_name_in_failed() {
        let ws = workspace();
        let input = add_input(&ws, "menu.pdf", "raw");
        let source = StubSource::new(&[("menu.pdf", "Thực đơn trưa nay")]);

        let (summary, out) = run_batch(&ws, &[input], &source);

        assert_eq!(out, "PROGRESS: menu.pdf -> FAILED\nSUMMARY: SUCCESS=0, FAILED=1\n");
        assert_eq!(summary, BatchSummary { success: 0, failed: 1 });
        assert!(ws.failed.join("menu.pdf").exists());
        assert!(!ws.success.join("menu.pdf").exists());
    }

    #[test]
    fn test_unreadable_file_reports_error_and_run_continues() {
        let ws = workspace();
        let bad = add_input(&ws, "bad.pdf", "raw");
        let good = add_input(&ws, "good.pdf", "raw");
        let source = StubSource::new(&[("good.pdf", IDENTIFIED)]);

        let (summary, out) = run_batch(&ws, &[bad, good], &source);

        assert_eq!(
            out,
            "PROGRESS: bad.pdf -> ERROR: PDF error: failed to parse PDF: unreadable\n\
             PROGRESS: good.pdf -> SUCCESS\n\
             SUMMARY: SUCCESS=1, FAILED=1\n"
        );
        assert_eq!(summary, BatchSummary { success: 1, failed: 1 });
        assert!(ws.failed.join("bad.pdf").exists());
        assert!(ws.success.join("230705_456.pdf").exists());
    }

    #[test]
    fn test_success_collisions_are_suffixed_not_overwritten() {
        let ws = workspace();
        let first = add_input(&ws, "first.pdf", "first bytes");
        let second = add_input(&ws, "second.pdf", "second bytes");
        let source = StubSource::new(&[("first.pdf", IDENTIFIED), ("second.pdf", IDENTIFIED)]);

        let (summary, _out) = run_batch(&ws, &[first, second], &source);

        assert_eq!(summary, BatchSummary { success: 2, failed: 0 });
        assert_eq!(
            fs::read_to_string(ws.success.join("230705_456.pdf")).unwrap(),
            "first bytes"
        );
        assert_eq!(
            fs::read_to_string(ws.success.join("230705_456 (1).pdf")).unwrap(),
            "second bytes"
        );
    }

    #[test]
    fn test_failed_collisions_are_suffixed() {
        let ws = workspace();
        let other = ws.inputs.parent().unwrap().join("other");
        fs::create_dir(&other).unwrap();
        let a = add_input(&ws, "same.pdf", "a");
        let b = other.join("same.pdf");
        fs::write(&b, "b").unwrap();
        let source = StubSource::new(&[("same.pdf", "no invoice here")]);

        let (summary, _out) = run_batch(&ws, &[a, b], &source);

        assert_eq!(summary, BatchSummary { success: 0, failed: 2 });
        assert_eq!(fs::read_to_string(ws.failed.join("same.pdf")).unwrap(), "a");
        assert_eq!(fs::read_to_string(ws.failed.join("same (1).pdf")).unwrap(), "b");
    }

    #[test]
    fn test_xml_input_goes_through_the_e_invoice_reader() {
        let ws = workspace();
        let xml = "<HDon><SHDon>789</SHDon><NLap>2024-01-31</NLap></HDon>";
        let input = add_input(&ws, "inv.xml", xml);
        let source = StubSource::new(&[]);

        let (summary, out) = run_batch(&ws, &[input], &source);

        assert_eq!(out, "PROGRESS: inv.xml -> SUCCESS\nSUMMARY: SUCCESS=1, FAILED=0\n");
        assert_eq!(summary, BatchSummary { success: 1, failed: 0 });
        assert!(ws.success.join("240131_789.xml").exists());
    }

    #[test]
    fn test_missing_input_reports_error_without_aborting() {
        let ws = workspace();
        let ghost = ws.inputs.join("ghost.xml");
        let source = StubSource::new(&[]);

        let (summary, out) = run_batch(&ws, &[ghost], &source);

        assert_eq!(summary, BatchSummary { success: 0, failed: 1 });
        assert!(out.starts_with("PROGRESS: ghost.xml -> ERROR: I/O error:"));
        assert!(out.ends_with("SUMMARY: SUCCESS=0, FAILED=1\n"));
        assert_eq!(fs::read_dir(&ws.failed).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_batch_still_prints_summary() {
        let ws = workspace();
        let source = StubSource::new(&[]);

        let (summary, out) = run_batch(&ws, &[], &source);

        assert_eq!(out, "SUMMARY: SUCCESS=0, FAILED=0\n");
        assert_eq!(summary, BatchSummary::default());
        assert!(ws.success.is_dir());
        assert!(ws.failed.is_dir());
    }
}
