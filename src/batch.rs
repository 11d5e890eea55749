//! Sequential batch driver.

use std::fs::metadata;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::compressor::{Compressor, Job};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::files::Input;
use crate::manifest::write_manifest;
use crate::mode::{Mode, ModeProvider};
use crate::report::{
    BatchResult, classify, failure_line, format_size, success_line, write_growth_advice, write_summary,
};

/// Mode suggested to the provider before anything is compressed.
///
/// A single file is judged by its size; a directory gets the balanced preset.
pub fn recommended_mode(input: &Input) -> Mode {
    match input {
        Input::File(path) => metadata(path)
            .map(|m| Mode::recommend(m.len()))
            .unwrap_or(Mode::Balanced),
        Input::Directory { .. } => Mode::Balanced,
    }
}

/// Compresses every file of `input`, one after another.
///
/// Per-file failures are reported to `out` and counted; only problems that
/// stop the whole run (no mode, output directory not creatable, manifest not
/// writable) come back as `Err`.
pub fn run<C, R, W, O>(
    config: &Config,
    input: &Input,
    compressor: &C,
    provider: &mut ModeProvider<R, W>,
    out: &mut O,
) -> Result<BatchResult>
where
    C: Compressor + ?Sized,
    R: BufRead,
    W: Write,
    O: Write,
{
    let stdout = |e| Error::io("<stdout>", e);
    let files = input.files();
    let mut result = BatchResult::new();

    if files.is_empty() {
        if let Input::Directory { root, .. } = input {
            writeln!(out, "{} No PDF files found in {}", "!".yellow(), root.display())
                .map_err(stdout)?;
        }
        return Ok(result);
    }

    let mode = provider.resolve(recommended_mode(input))?;
    log::info!("Compressing {} file(s) with {} mode", files.len(), mode);

    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir).map_err(|source| Error::CreateOutputDir {
            path: dir.clone(),
            source,
        })?;
    }

    writeln!(
        out,
        "\nProcessing {} file(s) with {} compression",
        files.len(),
        mode.name().to_uppercase().bold()
    )
    .map_err(stdout)?;

    let bar = if files.len() > 1 && config.progress {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::with_draw_target(Some(files.len() as u64), ProgressDrawTarget::hidden())
    };
    bar.set_style(
        ProgressStyle::with_template("{msg:.bold} [{bar:40.green/black}] {pos}/{len} {percent:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let start = Instant::now();
    let mut produced: Vec<PathBuf> = Vec::new();

    for file in files {
        bar.set_message(
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let job = Job::new(file, config.output_dir.as_deref(), mode);
        let original = metadata(&job.input).map(|m| m.len()).unwrap_or(0);
        log::info!("{}: {} ({})", job.input.display(), classify(original), format_size(original));

        let file_start = Instant::now();
        let mut grew = false;
        let line = match compressor.compress(&job) {
            Ok(()) => {
                let compressed = metadata(&job.output).map(|m| m.len()).unwrap_or(0);
                result.record_success(original, compressed);
                produced.push(job.output.clone());
                grew = compressed > original;
                success_line(&job.input, original, compressed, file_start.elapsed().as_secs_f64())
            }
            Err(err) => {
                result.record_failure();
                log::debug!("{}: {:?}", job.input.display(), err);
                failure_line(&job.input, &err)
            }
        };
        bar.suspend(|| -> std::io::Result<()> {
            writeln!(out, "{line}")?;
            if grew {
                write_growth_advice(out, original)?;
            }
            Ok(())
        })
        .map_err(stdout)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    write_summary(out, &result, start.elapsed().as_secs_f64()).map_err(stdout)?;

    if config.manifest && !produced.is_empty() {
        let dir = config
            .output_dir
            .clone()
            .or_else(|| produced[0].parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let manifest = write_manifest(&dir, &produced)?;
        writeln!(out, "{} {}", "Manifest:         ".cyan(), manifest.display()).map_err(stdout)?;
    }

    Ok(result)
}
