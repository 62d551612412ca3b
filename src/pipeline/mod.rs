//! Whole-corpus conversion.
//!
//! [`convert`] discovers page files, runs [`process_file`] over them in
//! batches on a worker pool, and writes the surviving entries in input
//! order through a single [`DictionaryWriter`]. A file that cannot be read
//! or yields no entry is counted and skipped; only output and input
//! directory errors end a run.

mod discover;
mod pool;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dom;
use crate::entry::Entry;
use crate::error::{Result, SkipKind};
use crate::export::{DictionaryInfo, DictionaryWriter, Format};
use crate::extract::Extractor;
use crate::text::Script;

pub use discover::discover_files;
pub use pool::{build_pool, default_jobs, map_ordered};

/// Default dictionary base name.
pub const DEFAULT_NAME: &str = "Wiktionary Dictionary";

/// Default number of files per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory of page files.
    pub input: PathBuf,
    /// Dictionary file to create.
    pub output: PathBuf,
    /// Language of the Wiktionary edition.
    pub source_lang: String,
    /// Language of the definitions, for the header.
    pub target_lang: String,
    /// Language section to extract; `source_lang` when unset.
    pub entry_lang: Option<String>,
    pub name: String,
    pub format: Format,
    pub jobs: usize,
    /// Maximum number of files, after script filtering.
    pub limit: Option<usize>,
    pub batch_size: usize,
    /// Scripts to keep; empty keeps all.
    pub scripts: Vec<Script>,
    pub config: Config,
    /// Log per-phase timings.
    pub profile: bool,
}

impl Options {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            entry_lang: None,
            name: DEFAULT_NAME.to_string(),
            format: Format::default(),
            jobs: default_jobs(),
            limit: None,
            batch_size: DEFAULT_BATCH_SIZE,
            scripts: Vec::new(),
            config: Config::default(),
            profile: false,
        }
    }

    pub fn entry_lang(&self) -> &str {
        self.entry_lang.as_deref().unwrap_or(&self.source_lang)
    }

    /// Header info: `"{name} ({entry language}-{target language})"`.
    pub fn dictionary_info(&self) -> DictionaryInfo {
        DictionaryInfo::new(
            &self.name,
            &self.config.language_name(self.entry_lang()),
            &self.config.language_name(&self.target_lang),
        )
    }
}

/// Time spent per phase, summed over files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    pub parse: Duration,
    pub locate: Duration,
    pub extract: Duration,
    pub write: Duration,
}

impl PhaseTimings {
    fn add(&mut self, other: &PhaseTimings) {
        self.parse += other.parse;
        self.locate += other.locate;
        self.extract += other.extract;
        self.write += other.write;
    }

    fn phases(&self) -> [(&'static str, Duration); 4] {
        [
            ("parse", self.parse),
            ("locate", self.locate),
            ("extract", self.extract),
            ("write", self.write),
        ]
    }
}

/// Counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Files selected for processing.
    pub files: usize,
    /// Entries written.
    pub processed: usize,
    /// Files skipped as unreadable or undecodable.
    pub parse_failures: usize,
    /// Files skipped for lack of a language section or definitions.
    pub not_found: usize,
    pub batches: usize,
    pub elapsed: Duration,
    pub timings: PhaseTimings,
}

impl Stats {
    pub fn skipped(&self) -> usize {
        self.parse_failures + self.not_found
    }

    fn record_skip(&mut self, kind: SkipKind) {
        match kind {
            SkipKind::ParseFailure => self.parse_failures += 1,
            SkipKind::NotFound => self.not_found += 1,
        }
    }
}

/// Result of processing one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Entry>,
    pub timings: PhaseTimings,
}

impl FileOutcome {
    /// Why the file was skipped, if it was.
    pub fn skip_kind(&self) -> Option<SkipKind> {
        match &self.result {
            Ok(_) => None,
            Err(e) => Some(e.skip_kind().unwrap_or(SkipKind::ParseFailure)),
        }
    }
}

/// Read, parse, locate and extract one page, timing each phase.
pub fn process_file(extractor: &Extractor, path: &Path) -> FileOutcome {
    let mut timings = PhaseTimings::default();
    let word = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let started = Instant::now();
    let doc = dom::read_document(path);
    timings.parse = started.elapsed();

    let result = doc.and_then(|doc| {
        let started = Instant::now();
        let section = extractor.locate_section(&doc);
        timings.locate = started.elapsed();

        let started = Instant::now();
        let entry = section.and_then(|section| extractor.build_entry(&word, &doc, &section));
        timings.extract = started.elapsed();
        entry
    });

    if let Err(e) = &result {
        debug!(path = %path.display(), reason = %e, "skipping file");
    }

    FileOutcome {
        path: path.to_path_buf(),
        result,
        timings,
    }
}

/// Progress after each written batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based batch number.
    pub batch: usize,
    pub batches: usize,
    pub files_done: usize,
    pub files_total: usize,
    pub entries: usize,
}

/// Run a conversion.
pub fn convert(options: &Options) -> Result<Stats> {
    convert_with_progress(options, |_| {})
}

/// Run a conversion, calling `on_batch` after each batch is written.
pub fn convert_with_progress(
    options: &Options,
    mut on_batch: impl FnMut(&BatchProgress),
) -> Result<Stats> {
    let started = Instant::now();
    let mut stats = Stats::default();

    let files = discover_files(&options.input, &options.scripts, options.limit)?;
    stats.files = files.len();
    info!(files = files.len(), input = %options.input.display(), "found files to process");

    if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let output = BufWriter::new(File::create(&options.output)?);
    let mut writer = DictionaryWriter::new(output, options.format, &options.dictionary_info())?;

    let extractor = Extractor::for_language(options.entry_lang(), &options.config);
    let pool = build_pool(options.jobs)?;
    let batch_size = options.batch_size.max(1);
    let batches = files.len().div_ceil(batch_size);

    for (i, batch) in files.chunks(batch_size).enumerate() {
        let batch_started = Instant::now();
        let outcomes = map_ordered(&pool, batch, |path| process_file(&extractor, path));

        let write_started = Instant::now();
        let mut written = 0;
        for outcome in outcomes {
            stats.timings.add(&outcome.timings);
            match outcome.result {
                Ok(entry) => {
                    writer.write_entry(&entry)?;
                    written += 1;
                }
                Err(e) => {
                    if !e.is_skip() {
                        warn!(path = %outcome.path.display(), error = %e, "unexpected error");
                    }
                    stats.record_skip(e.skip_kind().unwrap_or(SkipKind::ParseFailure));
                }
            }
        }
        writer.flush()?;
        stats.timings.write += write_started.elapsed();

        stats.processed += written;
        stats.batches += 1;
        info!(
            batch = i + 1,
            batches,
            entries = written,
            skipped = batch.len() - written,
            "batch written"
        );
        if options.profile {
            log_timing("batch", batch_started.elapsed());
        }

        on_batch(&BatchProgress {
            batch: i + 1,
            batches,
            files_done: (i * batch_size + batch.len()).min(files.len()),
            files_total: files.len(),
            entries: stats.processed,
        });
    }

    writer.finish()?;
    stats.elapsed = started.elapsed();

    if options.profile {
        for (phase, elapsed) in stats.timings.phases() {
            log_timing(phase, elapsed);
        }
        log_timing("total", stats.elapsed);
    }
    info!(
        processed = stats.processed,
        skipped = stats.skipped(),
        parse_failures = stats.parse_failures,
        not_found = stats.not_found,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        output = %options.output.display(),
        "conversion finished"
    );

    Ok(stats)
}

fn log_timing(phase: &str, elapsed: Duration) {
    info!(phase, elapsed_ms = elapsed.as_millis() as u64, "timing");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const PAGE: &str = r#"<html><body>
        <details data-level="2"><h2><span id="ca">Català</span></h2>
          <details data-level="3"><h3>Nom</h3><ol><li>house</li></ol></details>
        </details></body></html>"#;

    #[test]
    fn test_process_file_outcomes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor = Extractor::for_language("ca", &Config::default());

        let good = dir.path().join("casa");
        fs::write(&good, PAGE).expect("write");
        let outcome = process_file(&extractor, &good);
        assert_eq!(outcome.skip_kind(), None);
        assert_eq!(outcome.result.expect("entry").word(), "casa");

        let bad = dir.path().join("bad");
        fs::write(&bad, b"\xff\xfe<p>").expect("write");
        let outcome = process_file(&extractor, &bad);
        assert_eq!(outcome.skip_kind(), Some(SkipKind::ParseFailure));

        let other = dir.path().join("house");
        fs::write(&other, "<details><h2 id=\"en\">English</h2><ol><li>x</li></ol></details>")
            .expect("write");
        let outcome = process_file(&extractor, &other);
        assert!(matches!(outcome.result, Err(Error::LanguageNotFound(_))));
        assert_eq!(outcome.skip_kind(), Some(SkipKind::NotFound));

        let outcome = process_file(&extractor, dir.path());
        assert_eq!(outcome.skip_kind(), Some(SkipKind::ParseFailure));
    }

    #[test]
    fn test_dictionary_info_uses_entry_lang() {
        let mut options = Options::new("in", "out", "ca", "en");
        assert_eq!(options.dictionary_info().name, "Wiktionary Dictionary (Català-English)");

        options.entry_lang = Some("oc".into());
        options.name = "Diccionari".into();
        let info = options.dictionary_info();
        assert_eq!(info.name, "Diccionari (Occitan-English)");
        assert_eq!(info.index_language, "Occitan");
    }

    #[test]
    fn test_convert_batches_and_progress() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("pages");
        fs::create_dir(&input).expect("mkdir");
        for word in ["casa", "gat", "llar"] {
            fs::write(input.join(word), PAGE).expect("write");
        }
        fs::write(input.join("trencat"), b"<p>\xc3</p>").expect("write");

        let mut options = Options::new(&input, dir.path().join("out/dict.dsl"), "ca", "en");
        options.format = Format::Lingvo;
        options.batch_size = 2;
        options.jobs = 2;

        let mut seen = Vec::new();
        let stats = convert_with_progress(&options, |p| seen.push(*p)).expect("convert");

        assert_eq!(stats.files, 4);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.parse_failures, 1);
        assert_eq!(stats.not_found, 0);
        assert_eq!(stats.batches, 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].files_done, 4);
        assert_eq!(seen[1].entries, 3);

        let out = fs::read_to_string(dir.path().join("out/dict.dsl")).expect("output");
        let heads: Vec<&str> = out
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with(' ') && !l.starts_with('#'))
            .collect();
        assert_eq!(heads, vec!["casa", "gat", "llar"]);
    }
}
