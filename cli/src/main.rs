//! fileshift CLI - document and image format conversion
//!
//! A command-line front end for the fileshift conversion registry.

use clap::{Args, Parser, Subcommand};
use colored::*;
use fileshift::{
    detect_format_from_path, ConversionOutcome, ConversionRequest, ConverterConfig, Dispatcher,
    Format, Registry, Workspace,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Convert documents, spreadsheets, presentations and images
#[derive(Parser)]
#[command(
    name = "fileshift",
    author = "iyulab",
    version,
    about = "Convert files between document and image formats",
    long_about = "fileshift - table-driven file format conversion.\n\n\
                  Converts between TXT, DOCX, XLSX, PPTX, PDF, ZIP and common raster \
                  image formats. Presentations, PDF rasterization and OCR need \
                  soffice, pdftoppm and tesseract on the host."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true, env = "FILESHIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Office suite binary
    #[arg(long, global = true, env = "FILESHIFT_OFFICE")]
    office: Option<PathBuf>,

    /// PDF rasterizer binary
    #[arg(long, global = true, env = "FILESHIFT_RASTERIZER")]
    rasterizer: Option<PathBuf>,

    /// OCR engine binary
    #[arg(long, global = true, env = "FILESHIFT_OCR")]
    ocr: Option<PathBuf>,

    /// OCR language
    #[arg(long, global = true)]
    ocr_lang: Option<String>,

    /// Directory for temporary session files
    #[arg(long, global = true, env = "FILESHIFT_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file; formats are taken from the extensions
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path
        output: PathBuf,
    },

    /// Convert a file to a format, naming the result {name}_converted.{ext}
    To {
        /// Input file path
        input: PathBuf,

        /// Target extension (e.g. pdf, png, zip)
        format: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// List supported conversions
    Formats {
        /// Only show targets for this source extension
        extension: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what a file contains and what it converts to
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &GlobalArgs) -> Result<ConverterConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ConverterConfig::from_json_file(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(path) = &args.office {
        config = config.with_office_path(path);
    }
    if let Some(path) = &args.rasterizer {
        config = config.with_rasterizer_path(path);
    }
    if let Some(path) = &args.ocr {
        config = config.with_ocr_path(path);
    }
    if let Some(lang) = &args.ocr_lang {
        config = config.with_ocr_language(lang);
    }
    if let Some(dir) = &args.scratch_dir {
        config = config.with_scratch_dir(dir);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.global)?;

    match cli.command {
        Commands::Convert { input, output } => {
            let pb = create_spinner(&format!("Converting {}...", file_name(&input)));

            let dispatcher = Dispatcher::new(Registry::with_defaults(&config));
            let result = dispatcher.convert(&ConversionRequest::new(&input, &output));
            pb.finish_and_clear();

            let outcome = result?;
            print_success(&outcome, &output);
        }

        Commands::To {
            input,
            format,
            output,
        } => {
            let pb = create_spinner(&format!("Converting {}...", file_name(&input)));

            let workspace = Workspace::new(&config);
            let data = fs::read(&input)?;
            let result = workspace
                .upload(&file_name(&input), &data)
                .and_then(|mut session| {
                    let (download, outcome) = session.convert_with_outcome(&format)?;
                    Ok((download.file_name.clone(), download.read_bytes()?, outcome))
                });
            pb.finish_and_clear();

            let (name, bytes, outcome) = result?;
            fs::create_dir_all(&output)?;
            let path = output.join(name);
            fs::write(&path, bytes)?;
            print_success(&outcome, &path);
        }

        Commands::Formats { extension, json } => {
            let registry = Registry::with_defaults(&config);

            let sources: Vec<Format> = match extension {
                Some(ext) => {
                    let format = Format::from_extension(&ext)
                        .ok_or_else(|| format!("Unknown format: {}", ext))?;
                    vec![format]
                }
                None => Format::ALL.to_vec(),
            };

            let mut table: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for source in sources {
                let targets = registry.targets_for(source);
                if !targets.is_empty() {
                    table.insert(
                        source.extension(),
                        targets.iter().map(|t| t.extension()).collect(),
                    );
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                println!("{}", "Supported Conversions".cyan().bold());
                println!("{}", "─".repeat(40));
                for (source, targets) in &table {
                    println!("{:>6} → {}", source.bold(), targets.join(", "));
                }
            }
        }

        Commands::Info { input } => {
            let detected = detect_format_from_path(&input)?;
            let size = fs::metadata(&input)?.len();
            let registry = Registry::with_defaults(&config);

            println!("{}", "File Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "File".bold(), file_name(&input));
            println!("{}: {} bytes", "Size".bold(), size);
            println!("{}: {}", "Detected".bold(), detected);
            println!("{}: {}", "MIME".bold(), detected.mime_type());

            match Format::from_path(&input) {
                Some(claimed) if claimed != detected => println!(
                    "{} Extension says {} but content is {}",
                    "!".yellow().bold(),
                    claimed,
                    detected
                ),
                _ => {}
            }

            let targets: Vec<&str> = Format::from_path(&input)
                .map(|f| registry.targets_for(f))
                .unwrap_or_default()
                .iter()
                .map(|f| f.extension())
                .collect();
            if targets.is_empty() {
                println!("{}: none", "Converts to".bold());
            } else {
                println!("{}: {}", "Converts to".bold(), targets.join(", "));
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_success(outcome: &ConversionOutcome, path: &Path) {
    println!(
        "{} Converted {} → {}: {} ({} bytes, {})",
        "✓".green().bold(),
        outcome.source_format.extension(),
        outcome.destination_format.extension(),
        path.display(),
        outcome.bytes_written,
        outcome.converter
    );
    if let Some(entries) = outcome.archive_entries {
        println!("  {} entries in archive", entries);
    }
}

fn print_version() {
    println!("{} {}", "fileshift".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Table-driven file format conversion");
    println!();
    println!("Formats: TXT, DOCX, XLSX, PPTX, PDF, ZIP, PNG, JPEG, BMP, GIF, TIFF");
    println!("Host tools: soffice (presentations), pdftoppm (PDF pages), tesseract (OCR)");
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
