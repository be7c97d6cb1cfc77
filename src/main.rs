// Command-line entry point for c-funcdefs.

use anyhow::{anyhow, Result};
use c_funcdefs::application::ScanUsecase;
use c_funcdefs::domain::funcdef::TypeField;
use c_funcdefs::infrastructure::{CFlavor, FileConfig, LangCParser};
use c_funcdefs::logging;
use c_funcdefs::ports::report_exporter::{exporter_for, OutputFormat};
use clap::Parser;
use log::debug;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// C source file to scan
    #[arg(default_value = "program.c")]
    file: PathBuf,

    /// Parse the file as-is, without running the preprocessor
    #[arg(long)]
    no_cpp: bool,

    /// Preprocessor command (default: gcc, or clang for --flavor clang11)
    #[arg(long)]
    cpp: Option<String>,

    /// Add an include directory (can specify multiple; added after the configured `inc`)
    #[arg(short = 'I', long = "include")]
    include: Vec<PathBuf>,

    /// Define a preprocessor macro, NAME or NAME=VALUE (can specify multiple)
    #[arg(short = 'D', long = "define")]
    define: Vec<String>,

    /// Extra raw preprocessor argument (can specify multiple)
    #[arg(long = "cpp-arg", allow_hyphen_values = true)]
    cpp_arg: Vec<String>,

    /// C dialect (gnu11, std11, clang11)
    #[arg(long)]
    flavor: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Value printed after `type` in text output (initializer, declared)
    #[arg(long)]
    type_field: Option<String>,

    /// Only report functions defined in FILE itself, not in included headers
    #[arg(long)]
    main_file_only: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    // Command-line flags override the config file; lists append.
    let pre = &mut config.preprocessor;
    if cli.no_cpp {
        pre.enabled = false;
    }
    if let Some(cpp) = cli.cpp {
        pre.command = Some(cpp);
    }
    if let Some(flavor) = &cli.flavor {
        pre.flavor = CFlavor::from_str(flavor).ok_or_else(|| anyhow!("Unknown flavor: {}", flavor))?;
    }
    pre.include_dirs.extend(cli.include);
    pre.defines.extend(cli.define);
    pre.args.extend(cli.cpp_arg);

    let report = &mut config.report;
    if let Some(format) = &cli.format {
        report.format =
            OutputFormat::from_str(format).ok_or_else(|| anyhow!("Unknown format: {}", format))?;
    }
    if let Some(field) = &cli.type_field {
        report.type_field =
            TypeField::from_str(field).ok_or_else(|| anyhow!("Unknown type field: {}", field))?;
    }
    if cli.main_file_only {
        report.main_file_only = true;
    }

    if let Ok(cwd) = std::env::current_dir() {
        debug!("working directory: {}", cwd.display());
    }

    let parser = LangCParser::new(config.preprocessor);
    let usecase = ScanUsecase {
        parser: &parser,
        main_file_only: config.report.main_file_only,
    };

    let stdout = io::stdout();
    let mut exporter = exporter_for(config.report.format, config.report.type_field, stdout.lock());
    let count = usecase.run(&cli.file, exporter.as_mut())?;
    debug!("reported {} function definitions", count);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
