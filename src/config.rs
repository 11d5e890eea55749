//! Run configuration, resolved once from the command line.

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::error::Result;
use crate::mode::{Mode, ModeSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub mode_source: ModeSource,
    /// Explicit Ghostscript location; `None` searches the usual places
    pub ghostscript: Option<PathBuf>,
    pub fallback: bool,
    pub manifest: bool,
    /// Draw a progress bar over multi-file runs
    pub progress: bool,
}

impl Config {
    /// Builds the configuration, validating the mode name.
    ///
    /// `interactive` says whether an operator can answer a prompt; it is
    /// ignored when `--batch` or `-c` is given.
    pub fn from_args(args: &CliArgs, interactive: bool) -> Result<Self> {
        let mode_source = match &args.compression {
            Some(name) => ModeSource::Fixed(name.parse::<Mode>()?),
            None if args.batch || !interactive => ModeSource::Default,
            None => ModeSource::Prompt,
        };
        Ok(Config {
            input: args.input.clone(),
            output_dir: args.output.clone(),
            mode_source,
            ghostscript: args.ghostscript.clone(),
            fallback: args.fallback,
            manifest: args.manifest,
            progress: std::io::stderr().is_terminal(),
        })
    }

    /// Configuration for `input` with a fixed mode and everything else off.
    pub fn with_mode(input: impl Into<PathBuf>, mode: Mode) -> Self {
        Config {
            input: input.into(),
            output_dir: None,
            mode_source: ModeSource::Fixed(mode),
            ghostscript: None,
            fallback: false,
            manifest: false,
            progress: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["pdf-compressor", "in.pdf"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_mode_is_fixed() {
        let config = Config::from_args(&args(&["-c", "high"]), true).unwrap();
        assert_eq!(config.mode_source, ModeSource::Fixed(Mode::Aggressive));
    }

    #[test]
    fn unknown_mode_fails_early() {
        let err = Config::from_args(&args(&["-c", "ultra"]), true).unwrap_err();
        assert!(matches!(err, Error::InvalidMode { .. }));
    }

    #[test]
    fn prompt_only_when_interactive_and_not_batch() {
        assert_eq!(Config::from_args(&args(&[]), true).unwrap().mode_source, ModeSource::Prompt);
        assert_eq!(Config::from_args(&args(&[]), false).unwrap().mode_source, ModeSource::Default);
        assert_eq!(
            Config::from_args(&args(&["--batch"]), true).unwrap().mode_source,
            ModeSource::Default
        );
    }

    #[test]
    fn carries_paths_and_switches() {
        let config =
            Config::from_args(&args(&["-o", "out", "-g", "/opt/gs", "--fallback", "--manifest"]), false)
                .unwrap();
        assert_eq!(config.input, PathBuf::from("in.pdf"));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.ghostscript, Some(PathBuf::from("/opt/gs")));
        assert!(config.fallback);
        assert!(config.manifest);
    }
}
