use crate::markers::MarkerMatcher;
use crate::models::{ScanWarning, Task};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Bytes inspected for a NUL when deciding whether a file is binary
const BINARY_SNIFF_LEN: usize = 8 * 1024;

const UTF8_BOM: &str = "\u{feff}";

/// Scan a single file for task markers.
///
/// `display_path` is the root-relative path stored on each task. Binary and
/// non-UTF-8 files yield a warning instead of tasks.
pub fn scan_file(
    path: &Path,
    display_path: &str,
    matcher: &MarkerMatcher,
    markdown: bool,
) -> Result<Vec<Task>, ScanWarning> {
    let file = File::open(path).map_err(|e| ScanWarning::UnreadableFile {
        path: display_path.to_string(),
        message: e.to_string(),
    })?;

    scan_reader(
        BufReader::with_capacity(BINARY_SNIFF_LEN, file),
        display_path,
        matcher,
        markdown,
    )
}

/// Scan any line source. Lines are streamed through a single reusable buffer.
pub fn scan_reader<R: BufRead>(
    mut reader: R,
    display_path: &str,
    matcher: &MarkerMatcher,
    markdown: bool,
) -> Result<Vec<Task>, ScanWarning> {
    let unreadable = |e: std::io::Error| ScanWarning::UnreadableFile {
        path: display_path.to_string(),
        message: e.to_string(),
    };

    let head = reader.fill_buf().map_err(unreadable)?;
    let sniff = &head[..head.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(ScanWarning::BinaryFile {
            path: display_path.to_string(),
        });
    }

    let mut tasks = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(unreadable)? == 0 {
            break;
        }
        line_number += 1;

        let line = std::str::from_utf8(&buf).map_err(|_| ScanWarning::UndecodableFile {
            path: display_path.to_string(),
        })?;
        let line = line.trim_end_matches(['\n', '\r']);
        let line = if line_number == 1 {
            line.strip_prefix(UTF8_BOM).unwrap_or(line)
        } else {
            line
        };

        if let Some(marker) = matcher.match_line(line, markdown) {
            tasks.push(Task {
                file_path: display_path.to_string(),
                line_number,
                marker,
                text: line.trim().to_string(),
            });
        }
    }

    Ok(tasks)
}

/// Check if a file is likely binary based on its extension
pub fn is_likely_binary(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        matches!(
            ext.to_lowercase().as_str(),
            "png" | "jpg" | "jpeg" | "gif" | "ico" | "pdf" | "zip" | "tar" | "gz" | "exe" | "dll" | "so" | "dylib" | "bin" | "dat"
                | "pyc" | "class" | "o" | "a" | "wasm"
        )
    } else {
        false
    }
}

/// Whether checkbox detection applies to this file
pub fn is_markdown(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|m| m.eq_ignore_ascii_case(ext)))
}
