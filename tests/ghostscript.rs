#![cfg(unix)]

mod common;

use std::fs;
use std::io;

use pdf_compressor::files::enumerate;
use pdf_compressor::{Compressor, Config, Error, Ghostscript, Job, Mode, ModeProvider, batch};

use common::{COMPRESSED_LEN, FAKE_PDF, FakeGs, dir_with, names_in};

#[test]
fn successful_run_places_output_under_final_name() {
    let input_dir = dir_with(&["a.pdf"]);
    let out_dir = tempfile::tempdir().unwrap();
    let gs = Ghostscript::new(FakeGs::get().script("copying"));
    let job = Job::new(&input_dir.path().join("a.pdf"), Some(out_dir.path()), Mode::Balanced);

    gs.compress(&job).unwrap();

    assert_eq!(names_in(out_dir.path()), ["a.pdf"]);
    assert_eq!(fs::metadata(&job.output).unwrap().len(), COMPRESSED_LEN);
    assert_eq!(fs::read(&job.input).unwrap(), FAKE_PDF);
}

#[test]
fn non_zero_exit_is_external_tool_error_without_output() {
    let input_dir = dir_with(&["a.pdf"]);
    let out_dir = tempfile::tempdir().unwrap();
    let gs = Ghostscript::new(FakeGs::get().script("failing"));
    let job = Job::new(&input_dir.path().join("a.pdf"), Some(out_dir.path()), Mode::Nuclear);

    match gs.compress(&job) {
        Err(Error::ExternalTool { code, stderr, .. }) => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("cannot find trailer"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(names_in(out_dir.path()).is_empty(), "staging file left behind");
}

#[test]
fn zero_exit_without_output_is_a_failure() {
    let input_dir = dir_with(&["a.pdf"]);
    let out_dir = tempfile::tempdir().unwrap();
    let gs = Ghostscript::new(FakeGs::get().script("silent"));
    let job = Job::new(&input_dir.path().join("a.pdf"), Some(out_dir.path()), Mode::Conservative);

    assert!(matches!(
        gs.compress(&job),
        Err(Error::ExternalTool { code: Some(0), .. })
    ));
    assert!(names_in(out_dir.path()).is_empty());
}

#[test]
fn failed_run_keeps_previous_output_intact() {
    let input_dir = dir_with(&["a.pdf"]);
    let out_dir = tempfile::tempdir().unwrap();
    fs::write(out_dir.path().join("a.pdf"), b"earlier result").unwrap();
    let gs = Ghostscript::new(FakeGs::get().script("failing"));
    let job = Job::new(&input_dir.path().join("a.pdf"), Some(out_dir.path()), Mode::Balanced);

    assert!(gs.compress(&job).is_err());
    assert_eq!(fs::read(&job.output).unwrap(), b"earlier result");
}

#[test]
fn passes_mode_flags_output_and_input() {
    let input_dir = dir_with(&["a.pdf"]);
    let out_dir = tempfile::tempdir().unwrap();
    let gs = Ghostscript::new(FakeGs::get().script("recording"));
    let job = Job::new(&input_dir.path().join("a.pdf"), Some(out_dir.path()), Mode::Balanced);

    gs.compress(&job).unwrap();

    let recorded = fs::read_to_string(input_dir.path().join("a.pdf.args")).unwrap();
    let args: Vec<&str> = recorded.lines().collect();
    let flags = Mode::Balanced.command_flags();
    assert_eq!(&args[..flags.len()], flags.as_slice());
    assert!(args[flags.len()].starts_with("-sOutputFile="));
    assert_eq!(args[flags.len() + 1], job.input.to_str().unwrap());
    assert_eq!(args.len(), flags.len() + 2);
}

#[test]
fn fallback_retries_with_minimal_settings() {
    let input_dir = dir_with(&["a.pdf"]);
    let out_dir = tempfile::tempdir().unwrap();
    let script = FakeGs::get().script("preset-hater");
    let job = Job::new(&input_dir.path().join("a.pdf"), Some(out_dir.path()), Mode::Aggressive);

    assert!(Ghostscript::new(&script).compress(&job).is_err());
    assert!(!job.output.exists());

    Ghostscript::new(&script).with_fallback(true).compress(&job).unwrap();
    assert_eq!(fs::metadata(&job.output).unwrap().len(), COMPRESSED_LEN);
}

#[test]
fn missing_binary_is_a_launch_error() {
    FakeGs::get();
    let input_dir = dir_with(&["a.pdf"]);
    let gs = Ghostscript::new(input_dir.path().join("no-such-gs"));
    let job = Job::new(&input_dir.path().join("a.pdf"), Some(input_dir.path()), Mode::Balanced);

    assert!(matches!(gs.compress(&job), Err(Error::Launch { .. })));
    assert_eq!(names_in(input_dir.path()), ["a.pdf"]);
}

#[test]
fn batch_with_some_broken_files() {
    let input_dir = dir_with(&["good.pdf", "bad.pdf", "other.pdf", "notes.txt"]);
    let out_dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_mode(input_dir.path(), Mode::Balanced);
    config.output_dir = Some(out_dir.path().to_path_buf());

    let input = enumerate(&config.input).unwrap();
    let gs = Ghostscript::new(FakeGs::get().script("picky"));
    let mut provider = ModeProvider::new(config.mode_source, io::empty(), io::sink());
    let result = batch::run(&config, &input, &gs, &mut provider, &mut io::sink()).unwrap();

    assert_eq!(result.succeeded(), 2);
    assert_eq!(result.failed(), 1);
    assert_eq!(result.original_bytes(), 2 * FAKE_PDF.len() as u64);
    assert_eq!(result.compressed_bytes(), 2 * COMPRESSED_LEN);
    assert_eq!(names_in(out_dir.path()), ["good.pdf", "other.pdf"]);
}
