use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pdf_compressor::cli::CliArgs;
use pdf_compressor::{Config, Ghostscript, ModeProvider, batch, files};

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    let config = Config::from_args(&args, io::stdin().is_terminal())?;
    let input = files::enumerate(&config.input)?;

    let ghostscript = Ghostscript::locate(config.ghostscript.as_deref())?.with_fallback(config.fallback);
    log::info!("Using Ghostscript at {}", ghostscript.binary().display());

    let mut provider = ModeProvider::new(config.mode_source, io::stdin().lock(), io::stdout());
    let result = batch::run(&config, &input, &ghostscript, &mut provider, &mut io::stdout())
        .with_context(|| format!("Failed to compress {}", config.input.display()))?;

    Ok(if result.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
