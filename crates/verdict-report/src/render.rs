//! Markdown rendering of a build report
//!
//! The output is a pure function of the report and the decoration URL.
//! Randomness only enters through [`render`], which picks the decoration
//! from the caller's RNG.

use rand::Rng;

use crate::model::{BuildReport, Finding};
use crate::tier::Tier;

/// Substring that identifies a verdict comment among other comments.
pub const VERDICT_MARKER: &str = "## Verdict";

/// First line of every rendered verdict.
pub const VERDICT_HEADING: &str = "## Verdict ⚖️";

const FOOTER: &str = "🚀 _Automated Scan Complete_";

/// Whether a comment body was produced by this renderer.
pub fn contains_marker(body: &str) -> bool {
    body.contains(VERDICT_MARKER)
}

/// Render a report, choosing the tier decoration with `rng`.
pub fn render<R: Rng + ?Sized>(report: &BuildReport, rng: &mut R) -> String {
    let decoration = Tier::for_coverage(report.coverage()).choose_decoration(rng);
    render_with_decoration(report, decoration)
}

/// Render a report with a fixed decoration URL.
pub fn render_with_decoration(report: &BuildReport, decoration: &str) -> String {
    let mut out = String::new();
    out.push_str(VERDICT_HEADING);
    out.push_str("\n\n");

    let info = &report.build_info;
    out.push_str(&format!(
        "_{} {} (build {})_\n\n",
        single_line(&info.app_name),
        single_line(&info.version),
        single_line(&info.build_number)
    ));

    out.push_str(&format!(
        "### 🧪 Test Coverage: **`{}%`**\n\n",
        report.coverage()
    ));
    out.push_str(&format!("![verdict]({})\n\n", decoration));
    out.push_str("---\n\n");

    if !report.errors.is_empty() {
        out.push_str(&format!(
            "### 🚨 Errors: **{} Found**\n\n",
            report.errors.len()
        ));
        push_table(&mut out, &report.errors, "💥");
    }

    if !report.warnings.is_empty() {
        out.push_str(&format!(
            "### ⚠️ Warnings: **{} Found**\n\n",
            report.warnings.len()
        ));
        push_table(&mut out, &report.warnings, "⚠️");
    }

    out.push_str(FOOTER);
    out.push('\n');
    out
}

fn push_table(out: &mut String, findings: &[Finding], badge: &str) {
    out.push_str("| 🗂️ Path | 🔢 Line | 📝 Description |\n");
    out.push_str("| :--- | :--- | :--- |\n");
    for finding in findings {
        let path = finding.path.as_deref().map(code_span).unwrap_or_default();
        let line = finding
            .line_number
            .as_deref()
            .map(escape_cell)
            .unwrap_or_default();
        out.push_str(&format!(
            "| {} | {} | {} {} |\n",
            path,
            line,
            badge,
            escape_cell(&finding.description)
        ));
    }
    out.push_str("\n---\n\n");
}

/// Escape text for a GitHub-flavored markdown table cell.
///
/// Pipes would end the cell and line breaks would end the row. Backslashes
/// are doubled first so text such as `a\|b` keeps its backslash.
pub fn escape_cell(text: &str) -> String {
    single_line(text).replace('\\', "\\\\").replace('|', "\\|")
}

/// Wrap a path in a code span whose fence outlasts any backtick run inside it.
pub fn code_span(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let longest_run = path
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    let pad = if path.starts_with('`') || path.ends_with('`') {
        " "
    } else {
        ""
    };
    // Code spans show backslashes literally; only the pipe needs the table escape.
    format!("{fence}{pad}{}{pad}{fence}", single_line(path).replace('|', "\\|"))
}

fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
