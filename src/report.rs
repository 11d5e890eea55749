use std::io::{self, Write};
use std::path::Path;

use colored::*;

/// Running tally of a batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchResult {
    succeeded: usize,
    failed: usize,
    original_bytes: u64,
    compressed_bytes: u64,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, original_size: u64, compressed_size: u64) {
        self.succeeded += 1;
        self.original_bytes += original_size;
        self.compressed_bytes += compressed_size;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Original bytes of the files that compressed successfully.
    pub fn original_bytes(&self) -> u64 {
        self.original_bytes
    }

    pub fn compressed_bytes(&self) -> u64 {
        self.compressed_bytes
    }

    /// Size change over the successful files; negative means the output grew.
    pub fn reduction_percent(&self) -> Option<f64> {
        reduction_percent(self.original_bytes, self.compressed_bytes)
    }
}

pub fn reduction_percent(original: u64, compressed: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some((original as f64 - compressed as f64) / original as f64 * 100.0)
}

/// Human readable size, one decimal above bytes.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match bytes {
        b if b < KB => format!("{b} B"),
        b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
        b if b < GB => format!("{:.1} MB", b as f64 / MB as f64),
        b => format!("{:.1} GB", b as f64 / GB as f64),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// What the size of an input suggests about its content.
pub fn classify(size_bytes: u64) -> &'static str {
    const MIB: u64 = 1024 * 1024;
    match size_bytes {
        s if s > 50 * MIB => "Large file detected - likely scanned document",
        s if s > 10 * MIB => "Medium file - mixed content likely",
        s if s < 2 * MIB => "Small file - likely text/vector content",
        _ => "Standard document size",
    }
}

/// Writes why a file may have grown and what to try instead.
pub fn write_growth_advice<W: Write>(out: &mut W, original: u64) -> io::Result<()> {
    const KIB: u64 = 1024;
    let content = match original {
        s if s < 512 * KIB => "Small file - likely contains efficient text/vector content",
        s if s < 2048 * KIB => "Medium file - may contain optimized images or vector graphics",
        _ => "Large file - may contain high-quality images or complex content",
    };
    writeln!(out, "  {}", content.dimmed())?;
    writeln!(out, "  Possible reasons for poor compression:")?;
    for reason in [
        "PDF is already optimized",
        "Contains mostly vector graphics or text",
        "Images are already highly compressed",
        "PDF has password protection or encryption",
        "Contains forms, annotations, or complex structures",
    ] {
        writeln!(out, "   - {reason}")?;
    }
    writeln!(out, "  Suggestions:")?;
    for suggestion in [
        "Try a different compression mode",
        "Check if PDF has password protection",
        "Consider if current file size is acceptable",
    ] {
        writeln!(out, "   - {suggestion}")?;
    }
    Ok(())
}

/// One line for a file that compressed.
pub fn success_line(input: &Path, original: u64, compressed: u64, elapsed_secs: f64) -> String {
    let change = match reduction_percent(original, compressed) {
        Some(p) if p > 0.0 => format!("(-{p:.1}%)").green().to_string(),
        Some(p) if p < 0.0 => format!("(+{:.1}%)", -p).yellow().to_string(),
        _ => "(unchanged)".dimmed().to_string(),
    };
    format!(
        "{} {}  {} → {} {} in {:.1} s",
        "✔".green(),
        display_name(input).bold(),
        format_size(original),
        format_size(compressed),
        change,
        elapsed_secs
    )
}

/// One line for a file that failed.
pub fn failure_line(input: &Path, err: &dyn std::fmt::Display) -> String {
    format!("{} {}: {}", "✘".red(), display_name(input).bold(), err)
}

/// Writes the closing summary.
pub fn write_summary<W: Write>(out: &mut W, result: &BatchResult, elapsed_secs: f64) -> io::Result<()> {
    writeln!(out, "\n{}", "📦 Compression summary".bold().green())?;
    writeln!(out, "{} {}", "Files processed:  ".blue(), result.total())?;
    writeln!(out, "{} {}", "Succeeded:        ".green(), result.succeeded())?;
    let failed = format!("{}", result.failed());
    writeln!(
        out,
        "{} {}",
        "Failed:           ".red(),
        if result.failed() > 0 { failed.red().bold().to_string() } else { failed }
    )?;
    writeln!(out, "{} {}", "Total original:   ".blue(), format_size(result.original_bytes()))?;
    writeln!(out, "{} {}", "Total compressed: ".blue(), format_size(result.compressed_bytes()))?;
    match result.reduction_percent() {
        Some(p) if p >= 0.0 => {
            writeln!(out, "{} {:.1}% reduction", "Overall:          ".yellow(), p)?;
            writeln!(
                out,
                "{} {}",
                "Space saved:      ".yellow(),
                format_size(result.original_bytes() - result.compressed_bytes())
            )?;
        }
        Some(p) => writeln!(out, "{} {:.1}% increase", "Overall:          ".yellow(), -p)?,
        None => {}
    }
    writeln!(out, "{} {:.2} s", "Time taken:       ".magenta(), elapsed_secs)
}
