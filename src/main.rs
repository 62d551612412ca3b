//! wikidict - Wiktionary HTML to DSL/XDXF converter

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;
use tracing_subscriber::EnvFilter;

use wikidict::pipeline::{self, DEFAULT_BATCH_SIZE, DEFAULT_NAME, Options};
use wikidict::{Config, Format, Script};

#[derive(Parser)]
#[command(name = "wikidict")]
#[command(version, about = "Convert Wiktionary HTML pages into a DSL or XDXF dictionary", long_about = None)]
#[command(after_help = "EXAMPLES:
    wikidict -i pages/ -o ca-en.xdxf -s ca -t en
    wikidict -i pages/ -o ca-en.dsl -s ca -t en -f lingvo --scripts latin
    wikidict -i pages/ -o oc.xdxf -s ca -e oc -t ca -l 1000 --profile")]
struct Cli {
    /// Directory of page files, one per headword
    #[arg(short, long, value_name = "DIR")]
    input: PathBuf,

    /// Dictionary file to write
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Language of the Wiktionary edition
    #[arg(short, long, value_name = "CODE")]
    source_lang: String,

    /// Language of the definitions
    #[arg(short, long, value_name = "CODE")]
    target_lang: String,

    /// Language section to extract [default: source language]
    #[arg(short, long, value_name = "CODE")]
    entry_lang: Option<String>,

    /// Dictionary name
    #[arg(short, long, default_value = DEFAULT_NAME)]
    name: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Xdxf)]
    format: Format,

    /// Worker threads [default: available cores]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process at most this many files (0 for all)
    #[arg(short, long, default_value_t = 0)]
    limit: usize,

    /// Files per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Section names to skip [default: built-in list]
    #[arg(long, num_args = 1.., value_name = "NAME")]
    excluded_sections: Option<Vec<String>>,

    /// Only convert words written in these scripts
    #[arg(long, value_enum, num_args = 1.., value_delimiter = ',', default_value = "all")]
    scripts: Vec<ScriptArg>,

    /// JSON file with language_names and excluded_sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Log time spent per phase
    #[arg(long)]
    profile: bool,

    /// No progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScriptArg {
    All,
    Latin,
    Cyrillic,
    Greek,
    Chinese,
    Japanese,
    Korean,
    Arabic,
    Hebrew,
    Devanagari,
    Thai,
}

impl ScriptArg {
    fn script(self) -> Option<Script> {
        match self {
            ScriptArg::All => None,
            ScriptArg::Latin => Some(Script::Latin),
            ScriptArg::Cyrillic => Some(Script::Cyrillic),
            ScriptArg::Greek => Some(Script::Greek),
            ScriptArg::Chinese => Some(Script::Chinese),
            ScriptArg::Japanese => Some(Script::Japanese),
            ScriptArg::Korean => Some(Script::Korean),
            ScriptArg::Arabic => Some(Script::Arabic),
            ScriptArg::Hebrew => Some(Script::Hebrew),
            ScriptArg::Devanagari => Some(Script::Devanagari),
            ScriptArg::Thai => Some(Script::Thai),
        }
    }
}

/// Requested scripts; empty when `all` is among them.
fn selected_scripts(args: &[ScriptArg]) -> Vec<Script> {
    if args.contains(&ScriptArg::All) {
        return Vec::new();
    }
    args.iter().filter_map(|a| a.script()).collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "conversion failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.is_dir() {
        bail!("input is not a directory: {}", cli.input.display());
    }

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(excluded) = cli.excluded_sections {
        config.excluded_sections = excluded;
    }

    let mut options = Options::new(cli.input, cli.output, cli.source_lang, cli.target_lang);
    options.entry_lang = cli.entry_lang;
    options.name = cli.name;
    options.format = cli.format;
    if let Some(jobs) = cli.jobs {
        options.jobs = jobs.max(1);
    }
    options.limit = (cli.limit > 0).then_some(cli.limit);
    options.batch_size = cli.batch_size.max(1);
    options.scripts = selected_scripts(&cli.scripts);
    options.config = config;
    options.profile = cli.profile;

    let bar = if cli.quiet || cli.debug {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} files ({msg})")?
                .progress_chars("=>-"),
        );
        bar
    };

    let stats = pipeline::convert_with_progress(&options, |progress| {
        bar.set_length(progress.files_total as u64);
        bar.set_position(progress.files_done as u64);
        bar.set_message(format!("{} entries", progress.entries));
    })
    .with_context(|| {
        format!(
            "failed to convert {} into {}",
            options.input.display(),
            options.output.display()
        )
    })?;
    bar.finish_and_clear();

    if !cli.quiet {
        eprintln!(
            "{} entries written to {} ({} skipped: {} unreadable, {} without {})",
            stats.processed,
            options.output.display(),
            stats.skipped(),
            stats.parse_failures,
            stats.not_found,
            options.entry_lang(),
        );
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["wikidict", "-i", "pages", "-o", "out.xdxf", "-s", "ca", "-t", "en"]);
        assert_eq!(cli.format, Format::Xdxf);
        assert_eq!(cli.limit, 0);
        assert_eq!(cli.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(cli.name, DEFAULT_NAME);
        assert!(selected_scripts(&cli.scripts).is_empty());
        assert!(cli.excluded_sections.is_none());
    }

    #[test]
    fn test_cli_format_alias_and_scripts() {
        let cli = Cli::parse_from([
            "wikidict", "-i", "p", "-o", "o", "-s", "ru", "-t", "en", "-f", "dsl", "--scripts",
            "cyrillic,latin",
        ]);
        assert_eq!(cli.format, Format::Lingvo);
        assert_eq!(selected_scripts(&cli.scripts), vec![Script::Cyrillic, Script::Latin]);
    }

    #[test]
    fn test_all_overrides_other_scripts() {
        assert!(selected_scripts(&[ScriptArg::Greek, ScriptArg::All]).is_empty());
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
