//! Compression presets and how a run picks one.
//!
//! A [`Mode`] is a fixed list of Ghostscript `pdfwrite` flags. The flags are
//! passed through untouched; what they do is Ghostscript's business.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use colored::*;

use crate::error::{Error, Result};

const MIB: u64 = 1024 * 1024;

/// Flags shared by every preset.
pub const BASE_FLAGS: &[&str] = &[
    "-sDEVICE=pdfwrite",
    "-dCompatibilityLevel=1.4",
    "-dNOPAUSE",
    "-dQUIET",
    "-dBATCH",
    "-dSAFER",
    "-dDetectDuplicateImages=true",
    "-dCompressFonts=true",
    "-dSubsetFonts=true",
    "-dOptimize=true",
    "-dUseFlateCompression=true",
    "-dFastWebView=true",
];

const CONSERVATIVE: &[&str] = &[
    "-dPDFSETTINGS=/printer",
    "-dDownsampleColorImages=true",
    "-dDownsampleGrayImages=true",
    "-dColorImageResolution=300",
    "-dGrayImageResolution=300",
    "-dMonoImageResolution=1200",
    "-dColorImageDownsampleType=/Bicubic",
    "-dGrayImageDownsampleType=/Bicubic",
    "-dJPEGQ=90",
    "-dEmbedAllFonts=true",
    "-dPreserveAnnots=true",
];

const BALANCED: &[&str] = &[
    "-dPDFSETTINGS=/ebook",
    "-dDownsampleColorImages=true",
    "-dDownsampleGrayImages=true",
    "-dColorImageResolution=200",
    "-dGrayImageResolution=200",
    "-dMonoImageResolution=600",
    "-dColorImageDownsampleType=/Bicubic",
    "-dGrayImageDownsampleType=/Bicubic",
    "-dJPEGQ=85",
    "-dEmbedAllFonts=true",
    "-dPreserveAnnots=false",
];

const AGGRESSIVE: &[&str] = &[
    "-dPDFSETTINGS=/screen",
    "-dDownsampleColorImages=true",
    "-dDownsampleGrayImages=true",
    "-dDownsampleMonoImages=true",
    "-dColorImageDownsampleType=/Bicubic",
    "-dGrayImageDownsampleType=/Bicubic",
    "-dMonoImageDownsampleType=/Bicubic",
    "-dColorImageResolution=150",
    "-dGrayImageResolution=150",
    "-dMonoImageResolution=300",
    "-dColorImageDownsampleThreshold=1.5",
    "-dGrayImageDownsampleThreshold=1.5",
    "-dMonoImageDownsampleThreshold=1.5",
    "-dEncodeColorImages=true",
    "-dEncodeGrayImages=true",
    "-dEncodeMonoImages=true",
    "-dColorImageFilter=/DCTEncode",
    "-dGrayImageFilter=/DCTEncode",
    "-dMonoImageFilter=/CCITTFaxEncode",
    "-dJPEGQ=75",
    "-dEmbedAllFonts=false",
    "-dPreserveAnnots=false",
    "-dPreserveMarkedContent=false",
];

const NUCLEAR: &[&str] = &[
    "-dPDFSETTINGS=/screen",
    "-dDownsampleColorImages=true",
    "-dDownsampleGrayImages=true",
    "-dDownsampleMonoImages=true",
    "-dColorImageDownsampleType=/Subsample",
    "-dGrayImageDownsampleType=/Subsample",
    "-dMonoImageDownsampleType=/Subsample",
    "-dColorImageResolution=72",
    "-dGrayImageResolution=72",
    "-dMonoImageResolution=200",
    "-dColorImageDownsampleThreshold=1.0",
    "-dGrayImageDownsampleThreshold=1.0",
    "-dMonoImageDownsampleThreshold=1.0",
    "-dEncodeColorImages=true",
    "-dEncodeGrayImages=true",
    "-dEncodeMonoImages=true",
    "-dColorImageFilter=/DCTEncode",
    "-dGrayImageFilter=/DCTEncode",
    "-dMonoImageFilter=/CCITTFaxEncode",
    "-dJPEGQ=40",
    "-dEmbedAllFonts=false",
    "-dPreserveAnnots=false",
    "-dPreserveMarkedContent=false",
    "-dPassThroughJPEGImages=false",
    "-dConvertCMYKImagesToRGB=true",
    "-dConvertImagesToIndexed=true",
];

// Text stays readable, images are reduced to the bare minimum.
const BEAST: &[&str] = &[
    "-dPDFSETTINGS=/screen",
    "-dPrinted=false",
    "-dEmbedAllFonts=false",
    "-dDownsampleColorImages=true",
    "-dDownsampleGrayImages=true",
    "-dDownsampleMonoImages=true",
    "-dColorImageDownsampleType=/Subsample",
    "-dGrayImageDownsampleType=/Subsample",
    "-dMonoImageDownsampleType=/Subsample",
    "-dColorImageResolution=50",
    "-dGrayImageResolution=50",
    "-dMonoImageResolution=150",
    "-dColorImageDownsampleThreshold=1.0",
    "-dGrayImageDownsampleThreshold=1.0",
    "-dMonoImageDownsampleThreshold=1.0",
    "-dEncodeColorImages=true",
    "-dEncodeGrayImages=true",
    "-dEncodeMonoImages=true",
    "-dColorImageFilter=/DCTEncode",
    "-dGrayImageFilter=/DCTEncode",
    "-dMonoImageFilter=/CCITTFaxEncode",
    "-dJPEGQ=10",
    "-dAutoFilterColorImages=false",
    "-dAutoFilterGrayImages=false",
    "-dAntiAliasColorImages=false",
    "-dAntiAliasGrayImages=false",
    "-dAntiAliasMonoImages=false",
    "-dPreserveAnnots=false",
    "-dPreserveMarkedContent=false",
    "-dPreserveOPIComments=false",
    "-dPreserveHalftoneInfo=false",
    "-dPreserveOverprintSettings=false",
    "-dPreserveEPSInfo=false",
    "-dUseCIEColor=false",
    "-dColorConversionStrategy=/LeaveColorUnchanged",
    "-dConvertCMYKImagesToRGB=true",
    "-dConvertImagesToIndexed=true",
    "-dUCRandBGInfo=/Remove",
    "-dPassThroughJPEGImages=false",
    "-dPassThroughJPEGQ=false",
];

/// Minimal settings for inputs the full presets choke on.
const FALLBACK_BASE: &[&str] = &[
    "-sDEVICE=pdfwrite",
    "-dCompatibilityLevel=1.4",
    "-dNOPAUSE",
    "-dQUIET",
    "-dBATCH",
    "-dSAFER",
    "-dOptimize=true",
    "-dCompressFonts=true",
    "-dSubsetFonts=true",
];

/// Text-only retry: keeps monochrome encoding, drops everything else.
const BEAST_FALLBACK: &[&str] = &[
    "-sDEVICE=pdfwrite",
    "-dCompatibilityLevel=1.4",
    "-dNOPAUSE",
    "-dQUIET",
    "-dBATCH",
    "-dSAFER",
    "-dPDFSETTINGS=/screen",
    "-dOptimize=true",
    "-dEmbedAllFonts=false",
    "-dSubsetFonts=true",
    "-dCompressFonts=true",
    "-dEncodeColorImages=false",
    "-dEncodeGrayImages=false",
    "-dEncodeMonoImages=true",
    "-dPreserveAnnots=false",
    "-dPreserveMarkedContent=false",
    "-dUseFlateCompression=true",
];

/// A named compression preset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// High quality, minimal compression
    Conservative,
    /// Medium quality, moderate compression
    Balanced,
    /// Lower quality, high compression
    Aggressive,
    /// Text-focused, maximum compression
    Nuclear,
    /// Text only, images sacrificed
    Beast,
}

impl Mode {
    /// All presets, in menu order.
    pub const ALL: [Mode; 5] = [
        Mode::Conservative,
        Mode::Balanced,
        Mode::Aggressive,
        Mode::Nuclear,
        Mode::Beast,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Conservative => "conservative",
            Mode::Balanced => "balanced",
            Mode::Aggressive => "aggressive",
            Mode::Nuclear => "nuclear",
            Mode::Beast => "beast",
        }
    }

    /// Preset-specific flags, without the shared base.
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            Mode::Conservative => CONSERVATIVE,
            Mode::Balanced => BALANCED,
            Mode::Aggressive => AGGRESSIVE,
            Mode::Nuclear => NUCLEAR,
            Mode::Beast => BEAST,
        }
    }

    /// Full flag list handed to Ghostscript before the output and input paths.
    pub fn command_flags(self) -> Vec<&'static str> {
        BASE_FLAGS.iter().chain(self.flags()).copied().collect()
    }

    /// Flags for the single retry made when `--fallback` is on.
    pub fn fallback_flags(self) -> Vec<&'static str> {
        let preset = match self {
            Mode::Beast => return BEAST_FALLBACK.to_vec(),
            Mode::Aggressive | Mode::Nuclear => "-dPDFSETTINGS=/screen",
            Mode::Conservative | Mode::Balanced => "-dPDFSETTINGS=/default",
        };
        FALLBACK_BASE.iter().copied().chain([preset]).collect()
    }

    /// Picks a preset from the size of the input file.
    pub fn recommend(size_bytes: u64) -> Mode {
        match size_bytes {
            s if s > 50 * MIB => Mode::Nuclear,
            s if s > 10 * MIB => Mode::Aggressive,
            s if s > 2 * MIB => Mode::Balanced,
            _ => Mode::Conservative,
        }
    }

    fn summary(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Mode::Conservative => (
                "High quality, minimal compression",
                "Documents with important images, presentations",
                "10-30%",
            ),
            Mode::Balanced => (
                "Medium quality, moderate compression",
                "General documents, mixed content",
                "30-50%",
            ),
            Mode::Aggressive => (
                "Lower quality, high compression",
                "Archival documents, size-critical files",
                "50-70%",
            ),
            Mode::Nuclear => (
                "Text-focused, maximum compression",
                "Text-heavy documents, extreme size reduction",
                "70-90%",
            ),
            Mode::Beast => (
                "Text only, all image quality sacrificed",
                "Archiving documents where only the text matters",
                "90%+",
            ),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" | "low" | "1" => Ok(Mode::Conservative),
            "balanced" | "medium" | "2" => Ok(Mode::Balanced),
            "aggressive" | "high" | "3" => Ok(Mode::Aggressive),
            "nuclear" | "max" | "4" => Ok(Mode::Nuclear),
            "beast" | "text-only" | "5" => Ok(Mode::Beast),
            _ => Err(Error::InvalidMode { name: s.to_string() }),
        }
    }
}

/// Where the mode for a run comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModeSource {
    /// Given on the command line
    Fixed(Mode),
    /// Ask the operator
    Prompt,
    /// Use the recommendation without asking
    Default,
}

/// Resolves the mode for a run.
///
/// The prompt variant reads from any `BufRead` and writes its menu to any
/// `Write`, so the interactive path runs the same way under test as it does
/// on a terminal.
pub enum ModeProvider<R, W> {
    Fixed(Mode),
    Prompt { input: R, output: W },
    Default,
}

impl<R: BufRead, W: Write> ModeProvider<R, W> {
    pub fn new(source: ModeSource, input: R, output: W) -> Self {
        match source {
            ModeSource::Fixed(mode) => ModeProvider::Fixed(mode),
            ModeSource::Prompt => ModeProvider::Prompt { input, output },
            ModeSource::Default => ModeProvider::Default,
        }
    }

    /// Returns the mode to use. `recommended` is shown in the menu and used
    /// as-is by the default provider.
    pub fn resolve(&mut self, recommended: Mode) -> Result<Mode> {
        match self {
            ModeProvider::Fixed(mode) => Ok(*mode),
            ModeProvider::Default => {
                log::info!("Using default compression mode: {recommended}");
                Ok(recommended)
            }
            ModeProvider::Prompt { input, output } => prompt(input, output, recommended),
        }
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, recommended: Mode) -> Result<Mode> {
    let stdout = |e| Error::io("<stdout>", e);

    write_menu(output, recommended).map_err(stdout)?;
    let mut line = String::new();
    loop {
        write!(output, "\nSelect compression mode (1-{}): ", Mode::ALL.len()).map_err(stdout)?;
        output.flush().map_err(stdout)?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| Error::io("<stdin>", e))?;
        if read == 0 {
            return Err(Error::NoModeSelected);
        }
        match line.parse::<Mode>() {
            Ok(mode) => {
                writeln!(output, "\nSelected: {} compression", mode.name().to_uppercase())
                    .map_err(stdout)?;
                return Ok(mode);
            }
            Err(_) => {
                writeln!(output, "Invalid choice. Please select 1-{} or a mode name.", Mode::ALL.len())
                    .map_err(stdout)?;
            }
        }
    }
}

fn write_menu<W: Write>(output: &mut W, recommended: Mode) -> std::io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(output, "\n{rule}")?;
    writeln!(output, "{}", "PDF COMPRESSION MODES".bold())?;
    writeln!(output, "{rule}")?;
    for (i, mode) in Mode::ALL.iter().enumerate() {
        let (quality, best_for, reduction) = mode.summary();
        let title = format!("{}. {} - {}", i + 1, capitalize(mode.name()), quality);
        if *mode == recommended {
            writeln!(output, "{} {}", title.green().bold(), "(recommended)".green())?;
        } else {
            writeln!(output, "{title}")?;
        }
        writeln!(output, "   Best for: {best_for}")?;
        writeln!(output, "   Compression: {reduction} reduction")?;
    }
    writeln!(output, "{rule}")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
