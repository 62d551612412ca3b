//! # wikidict
//!
//! Converts a directory of Wiktionary HTML pages (one page per headword,
//! named after the word) into a single Lingvo DSL or XDXF dictionary.
//!
//! ## Pipeline
//!
//! Each file goes through the same pure steps, independently of every other
//! file:
//!
//! 1. [`dom::read_document`] parses it into an arena [`Document`]
//! 2. a [`Locator`] finds the section for the wanted language
//! 3. [`extract_definitions`] collects part-of-speech labels and definitions
//! 4. the result becomes an [`Entry`], rendered by [`export::format_entry`]
//!
//! [`pipeline::convert`] drives this over a whole directory on a worker
//! pool and writes one dictionary file.
//!
//! ## Quick Start
//!
//! ```
//! use wikidict::{Config, Extractor, Format, format_entry};
//! use wikidict::dom::parse_html_str;
//!
//! let doc = parse_html_str(r#"
//!     <details><h2><span id="ca">Català</span></h2>
//!       <details data-level="3"><h3>Nom</h3>
//!         <ol><li>house</li><li>home</li></ol>
//!       </details>
//!     </details>"#);
//!
//! let extractor = Extractor::for_language("ca", &Config::default());
//! let entry = extractor.extract_document("casa", &doc)?;
//!
//! assert_eq!(
//!     format_entry(&entry, Format::Lingvo),
//!     "casa\n  [c]Nom[/c]\n  house\n  home\n\n"
//! );
//! # Ok::<(), wikidict::Error>(())
//! ```

pub mod config;
pub mod dom;
pub mod entry;
pub mod error;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod text;

pub use config::Config;
pub use dom::Document;
pub use entry::{Definitions, Entry};
pub use error::{Error, Result, SkipKind};
pub use export::{DictionaryInfo, DictionaryWriter, Format, format_entry};
pub use extract::{ExcludedSections, Extractor, LanguageQuery, Locator, Section, extract_definitions};
pub use pipeline::{Options, Stats, convert};
pub use text::{Script, normalize};
