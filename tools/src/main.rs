mod commands;
mod input;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zhvocab_core::{Config, ReferenceData, Vocabulary};

#[derive(Parser)]
#[command(name = "zhvocab", about = "Chinese vocabulary lookups and comprehension estimates")]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding hsk/, cedict_ts.u8 and word-freq.csv (overrides config)
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show grade, pinyin, definitions and frequency for words
    Lookup {
        words: Vec<String>,
        /// Print one JSON object per word
        #[arg(long)]
        json: bool,
    },
    /// Convert numeric-tone pinyin ("ni3 hao3") to tone marks
    Pinyin { text: Vec<String> },
    /// Compute note fields for a TSV of notes and print those that change
    Notes { input: PathBuf },
    /// Estimate comprehension from a `word[<TAB>recall]` file
    Comprehension { input: PathBuf },
    /// Replay `unit<TAB>word<TAB>before<TAB>after` reviews and report coverage changes
    Reviews { input: PathBuf },
    /// Parse the resources and write a bincode snapshot
    Snapshot { output: PathBuf },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(assets) = &args.assets {
        config.assets_dir = assets.clone();
    }
    Ok(config)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn load_vocabulary(config: &Config) -> Result<Vocabulary> {
    let data = ReferenceData::load_or_build(config).context("loading reference data")?;
    Ok(Vocabulary::new(Arc::new(data), config))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(&args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Pinyin { text } => commands::pinyin(&text, &mut out)?,
        Command::Lookup { words, json } => {
            let vocab = load_vocabulary(&config)?;
            commands::lookup(&vocab, &words, json, &mut out)?;
        }
        Command::Notes { input } => {
            let notes = input::read_notes(open(&input)?)?;
            let vocab = load_vocabulary(&config)?;
            let updated = commands::notes(&vocab, &notes, &mut out)?;
            eprintln!("Updated {} notes", updated);
        }
        Command::Comprehension { input } => {
            let known = input::read_known_words(open(&input)?)?;
            let vocab = load_vocabulary(&config)?;
            commands::comprehension(&vocab, known, &mut out)?;
        }
        Command::Reviews { input } => {
            let events = input::read_reviews(open(&input)?)?;
            let vocab = load_vocabulary(&config)?;
            let mut tracker = config.recall_tracker();
            commands::reviews(&vocab, &mut tracker, &events, &mut out)?;
        }
        Command::Snapshot { output } => {
            ReferenceData::build_snapshot(&config, &output)
                .with_context(|| format!("writing snapshot {}", output.display()))?;
            writeln!(out, "Wrote snapshot to {}", output.display())?;
        }
    }
    Ok(())
}
