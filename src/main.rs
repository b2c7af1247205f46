use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use vbimport::archive::{ArchiveSource, ZipSource};
use vbimport::config::PROGRESS_SCALE;
use vbimport::hash;
use vbimport::{ImportConfig, Importer};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "vbimport")]
#[command(about = "Install voicebank archives into a hash-addressed directory tree")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a voicebank archive
    Install(InstallArgs),
    /// Report the detected filename encoding of an archive
    Detect(DetectArgs),
    /// Print the hashed form of a relative path
    Hash(HashArgs),
}

#[derive(Args)]
struct InstallArgs {
    /// Path to the voicebank archive (.zip)
    #[arg(short, long)]
    input: PathBuf,

    /// Import root (ASCII, at most 80 characters)
    #[arg(short, long)]
    output: PathBuf,

    /// Encoding of entry names, e.g. shift_jis (detected if omitted)
    #[arg(long)]
    archive_encoding: Option<String>,

    /// Encoding of oto.ini/character.txt/prefix.map (defaults to the name encoding)
    #[arg(long)]
    text_encoding: Option<String>,
}

#[derive(Args)]
struct DetectArgs {
    /// Path to the voicebank archive (.zip)
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Args)]
struct HashArgs {
    /// Relative path inside an archive, e.g. "voice/C4/ka.wav"
    path: String,
}

fn make_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(u64::from(PROGRESS_SCALE));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {wide_msg}")
            .unwrap(),
    );
    pb
}

fn run_install(args: InstallArgs) -> Result<()> {
    let config = ImportConfig {
        root: args.output,
        archive_encoding: args.archive_encoding,
        text_encoding: args.text_encoding,
    };
    let importer = Importer::from_config(&config).context("Invalid import configuration")?;

    let start = Instant::now();
    let pb = make_progress_bar();
    let stats = importer
        .install_zip(&args.input, |percent, label| {
            pb.set_position(u64::from(percent));
            pb.set_message(label.to_string());
        })
        .with_context(|| format!("Failed to install: {}", args.input.display()))?;
    pb.finish_and_clear();

    println!();
    println!("=== Summary ===");
    println!("Import root:        {}", importer.root().display());
    println!("Time:               {:.2}s", start.elapsed().as_secs_f64());
    println!("Entries processed:  {}", stats.entries_processed);
    println!("Records written:    {}", stats.records_written);
    println!("Files copied:       {}", stats.files_copied);
    println!("Samples hashed:     {}", stats.files_hashed);
    println!("Entries dropped:    {}", stats.entries_dropped);
    println!("Lines skipped:      {}", stats.lines_skipped);
    println!("Bytes copied:       {}", stats.bytes_copied);

    Ok(())
}

fn run_detect(args: DetectArgs) -> Result<()> {
    let mut source = ZipSource::open_path(&args.input)
        .with_context(|| format!("Failed to open archive: {}", args.input.display()))?;
    let headers = source.headers()?;
    let names: Vec<&[u8]> = headers.iter().map(|h| h.raw_name.as_slice()).collect();
    let detection = vbimport::encoding::detect(&names)?;

    info!(entries = headers.len(), "Detection complete");
    println!(
        "{} ({})",
        detection.name(),
        if detection.confident {
            "confident"
        } else {
            "low confidence"
        }
    );
    Ok(())
}

fn run_hash(args: HashArgs) -> Result<()> {
    println!("{}", hash::hash_key(&args.path));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Install(args) => run_install(args),
        Commands::Detect(args) => run_detect(args),
        Commands::Hash(args) => run_hash(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
