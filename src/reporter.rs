use crate::markers::Marker;
use crate::models::{OutputFormat, ScanResult, SortMode, Task};
use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Presentation switches that don't change the scan itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix text output with the summary panel
    pub summary: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { summary: true }
    }
}

/// Render a scan result in the requested format with default options
pub fn render(result: &ScanResult, format: OutputFormat) -> Result<String> {
    render_with_options(result, format, RenderOptions::default())
}

pub fn render_with_options(
    result: &ScanResult,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<String> {
    let output = match format {
        OutputFormat::Text => format_text(result, options.summary),
        OutputFormat::Markdown => format_markdown(result),
        OutputFormat::Json => format_json(result)?,
    };
    Ok(output)
}

/// Write a rendered report to a file, or stdout when no path is given
pub fn write_report(output: &str, output_path: Option<&Path>) -> Result<()> {
    if let Some(path) = output_path {
        fs::write(path, format!("{}\n", output))
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!("Report written to {}", path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Format tasks as plain text, optionally behind a summary panel
fn format_text(result: &ScanResult, summary: bool) -> String {
    let mut output = String::new();

    if summary {
        output.push_str(&format_summary_panel(result));
    }

    if result.tasks.is_empty() {
        output.push_str("No tasks found!");
        return output;
    }

    let lines: Vec<String> = result.tasks.iter().map(task_line).collect();
    output.push_str(&lines.join("\n"));
    output
}

fn format_summary_panel(result: &ScanResult) -> String {
    let mut output = String::new();

    let line = "─".repeat(58);
    output.push_str(&format!("╭{}╮\n", line));
    output.push_str(&format!("│ {:^56} │\n", "Tickle - Task Summary"));
    output.push_str(&format!("│ {:<56} │\n", total_line(result)));
    output.push_str(&format!("╰{}╯\n\n", line));

    let counts: Vec<(Marker, usize)> = result.nonzero_counts().collect();
    if !counts.is_empty() {
        output.push_str("Tasks by Marker:\n");
        let mut marker_table = Table::new();
        marker_table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Marker").fg(Color::Cyan),
                Cell::new("Count").fg(Color::Cyan),
            ]);

        for (marker, count) in counts {
            marker_table.add_row(vec![marker.name().to_string(), count.to_string()]);
        }

        output.push_str(&format!("{}\n\n", marker_table));
    }

    output
}

fn total_line(result: &ScanResult) -> String {
    let total = result.total();
    let files = result.files_with_tasks;
    format!(
        "Total: {} {} in {} {}",
        total,
        plural(total, "task", "tasks"),
        files,
        plural(files, "file", "files")
    )
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

/// `<file>:<line>: [<MARKER>] <text>`
fn task_line(task: &Task) -> String {
    format!(
        "{}:{}: [{}] {}",
        task.file_path, task.line_number, task.marker, task.text
    )
}

/// Format tasks as Markdown: a table in file order, or one section per
/// marker when sorted by marker
fn format_markdown(result: &ScanResult) -> String {
    let mut output = String::from("# Outstanding Tasks\n\n");

    if result.tasks.is_empty() {
        output.push_str("_No tasks found._");
        return output;
    }

    match result.sort_mode {
        SortMode::File => {
            output.push_str("| File | Line | Marker | Text |\n");
            output.push_str("| --- | --- | --- | --- |\n");
            for task in &result.tasks {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    escape_cell(&task.file_path),
                    task.line_number,
                    task.marker,
                    escape_cell(&task.text)
                ));
            }
        }
        SortMode::Marker => {
            let mut current: Option<Marker> = None;
            for task in &result.tasks {
                if current != Some(task.marker) {
                    if current.is_some() {
                        output.push('\n');
                    }
                    current = Some(task.marker);
                    let count = result.counts_by_marker.get(&task.marker).copied().unwrap_or(0);
                    output.push_str(&format!("## {} ({})\n\n", task.marker, count));
                }
                output.push_str(&format!(
                    "- `{}:{}` {}\n",
                    task.file_path, task.line_number, task.text
                ));
            }
        }
    }

    output.truncate(output.trim_end().len());
    output
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: JsonSummary,
    tasks: &'a [Task],
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    files: usize,
    by_marker: BTreeMap<Marker, usize>,
}

/// Format report as JSON
fn format_json(result: &ScanResult) -> Result<String> {
    let report = JsonReport {
        summary: JsonSummary {
            total: result.total(),
            files: result.files_with_tasks,
            by_marker: result.nonzero_counts().collect(),
        },
        tasks: &result.tasks,
    };

    serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(file: &str, line: usize, marker: Marker, text: &str) -> Task {
        Task {
            file_path: file.to_string(),
            line_number: line,
            marker,
            text: text.to_string(),
        }
    }

    fn create_test_result(sort_mode: SortMode) -> ScanResult {
        let tasks = vec![
            task("src/main.py", 5, Marker::Todo, "# TODO: Implement feature"),
            task("src/main.py", 12, Marker::Fixme, "# FIXME: Fix bug"),
            task("tests/test.py", 3, Marker::Bug, "# BUG: Known issue"),
            task("tests/test.py", 9, Marker::Todo, "x = a | b  # TODO: pipes"),
        ];
        ScanResult::new(tasks, &Marker::DEFAULTS, sort_mode)
    }

    fn empty_result() -> ScanResult {
        ScanResult::new(Vec::new(), &Marker::DEFAULTS, SortMode::File)
    }

    #[test]
    fn test_format_text() {
        let result = create_test_result(SortMode::File);
        let output = format_text(&result, true);

        assert!(output.contains("Tickle - Task Summary"));
        assert!(output.contains("Total: 4 tasks in 2 files"));
        assert!(output.contains("Tasks by Marker:"));
        assert!(output.contains("src/main.py:5: [TODO] # TODO: Implement feature"));
        assert!(output.ends_with("tests/test.py:9: [TODO] x = a | b  # TODO: pipes"));
        // Zero-count markers stay out of the breakdown
        assert!(!output.contains("HACK"));
        assert!(!output.contains("NOTE"));
    }

    #[test]
    fn test_format_text_without_summary() {
        let result = create_test_result(SortMode::Marker);
        let output = format_text(&result, false);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "tests/test.py:3: [BUG] # BUG: Known issue",
                "src/main.py:12: [FIXME] # FIXME: Fix bug",
                "src/main.py:5: [TODO] # TODO: Implement feature",
                "tests/test.py:9: [TODO] x = a | b  # TODO: pipes",
            ]
        );
    }

    #[test]
    fn test_format_text_empty() {
        let output = format_text(&empty_result(), true);
        assert!(output.contains("Total: 0 tasks in 0 files"));
        assert!(!output.contains("Tasks by Marker"));
        assert!(output.ends_with("No tasks found!"));
    }

    #[test]
    fn test_format_text_singular() {
        let result = ScanResult::new(
            vec![task("a.py", 1, Marker::Note, "# NOTE: one")],
            &Marker::DEFAULTS,
            SortMode::File,
        );
        assert!(format_text(&result, true).contains("Total: 1 task in 1 file"));
    }

    #[test]
    fn test_format_markdown_file_mode() {
        let result = create_test_result(SortMode::File);
        let output = format_markdown(&result);

        assert!(output.starts_with("# Outstanding Tasks\n\n| File | Line | Marker | Text |\n"));
        assert!(output.contains("| src/main.py | 5 | TODO | # TODO: Implement feature |"));
        assert!(output.contains("| tests/test.py | 9 | TODO | x = a \\| b  # TODO: pipes |"));
        assert!(!output.contains("## "));
        assert!(!output.contains("Total"));
    }

    #[test]
    fn test_format_markdown_marker_mode() {
        let result = create_test_result(SortMode::Marker);
        let output = format_markdown(&result);

        let bug = output.find("## BUG (1)").unwrap();
        let fixme = output.find("## FIXME (1)").unwrap();
        let todo = output.find("## TODO (2)").unwrap();
        assert!(bug < fixme && fixme < todo);
        assert!(output.contains("- `tests/test.py:3` # BUG: Known issue"));
        assert!(output.ends_with("- `tests/test.py:9` x = a | b  # TODO: pipes"));
    }

    #[test]
    fn test_format_markdown_empty() {
        assert_eq!(
            format_markdown(&empty_result()),
            "# Outstanding Tasks\n\n_No tasks found._"
        );
    }

    #[test]
    fn test_format_json() {
        let result = create_test_result(SortMode::File);
        let output = format_json(&result).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["summary"]["total"], 4);
        assert_eq!(parsed["summary"]["files"], 2);
        assert_eq!(parsed["summary"]["by_marker"]["TODO"], 2);
        assert_eq!(parsed["summary"]["by_marker"]["BUG"], 1);
        assert!(parsed["summary"]["by_marker"].get("HACK").is_none());

        let tasks = parsed["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0]["file"], "src/main.py");
        assert_eq!(tasks[0]["line"], 5);
        assert_eq!(tasks[0]["marker"], "TODO");
        assert_eq!(tasks[0]["text"], "# TODO: Implement feature");
    }

    #[test]
    fn test_format_json_empty() {
        let output = format_json(&empty_result()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            parsed,
            serde_json::json!({
                "summary": { "total": 0, "files": 0, "by_marker": {} },
                "tasks": []
            })
        );
    }

    #[test]
    fn test_render_dispatch_is_stable() {
        let result = create_test_result(SortMode::Marker);
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown] {
            let first = render(&result, format).unwrap();
            let second = render(&result, format).unwrap();
            assert_eq!(first, second);
        }

        let plain = render_with_options(&result, OutputFormat::Text, RenderOptions { summary: false })
            .unwrap();
        assert!(!plain.contains("Total:"));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.md");

        write_report("# Outstanding Tasks", Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Outstanding Tasks\n");
    }
}
