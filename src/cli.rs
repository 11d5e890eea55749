use std::path::PathBuf;

use clap::Parser;

/// Compress PDF files with Ghostscript using preset quality/size trade-offs.
#[derive(Parser, Debug)]
#[command(name = "pdf-compressor", version, about, after_help = MODES_HELP)]
pub struct CliArgs {
    /// Input PDF file or directory of PDFs
    pub input: PathBuf,

    /// Output directory (defaults to `<name>_compressed.pdf` next to each input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compression mode, skips the interactive menu
    #[arg(short = 'c', long = "compression", value_name = "MODE")]
    pub compression: Option<String>,

    /// Never prompt; use the recommended mode when -c is not given
    #[arg(long)]
    pub batch: bool,

    /// Path to the Ghostscript executable
    #[arg(short = 'g', long, env = "GHOSTSCRIPT_PATH", value_name = "PATH")]
    pub ghostscript: Option<PathBuf>,

    /// Retry a failed file once with minimal Ghostscript settings
    #[arg(long)]
    pub fallback: bool,

    /// Write manifest-sha256.txt for the produced files
    #[arg(long)]
    pub manifest: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

const MODES_HELP: &str = "\
COMPRESSION MODES:
  conservative (low)     High quality, minimal compression (10-30% reduction)
  balanced (medium)      Medium quality, moderate compression (30-50% reduction)
  aggressive (high)      Lower quality, high compression (50-70% reduction)
  nuclear (max)          Text-focused, maximum compression (70-90% reduction)
  beast (text-only)      Text only, images sacrificed (90%+ reduction)

EXAMPLES:
  pdf-compressor document.pdf
  pdf-compressor ./pdfs -o ./compressed
  pdf-compressor document.pdf -c aggressive";

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_full_surface() {
        let args = CliArgs::try_parse_from([
            "pdf-compressor",
            "docs",
            "-o",
            "out",
            "-c",
            "medium",
            "--batch",
            "-g",
            "/usr/bin/gs",
            "--manifest",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("docs"));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.compression.as_deref(), Some("medium"));
        assert!(args.batch);
        assert_eq!(args.ghostscript, Some(PathBuf::from("/usr/bin/gs")));
        assert!(args.manifest);
        assert!(!args.fallback);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn input_is_required() {
        assert!(CliArgs::try_parse_from(["pdf-compressor"]).is_err());
    }
}
