//! Dictionary output in Lingvo DSL and XDXF.
//!
//! Entry rendering is a pure string transform ([`format_entry`]); the
//! one-time header and footer and the ordering of writes belong to a
//! [`DictionaryWriter`], which owns the output stream.
//!
//! # Example
//!
//! ```
//! use wikidict::export::{DictionaryInfo, DictionaryWriter, Format};
//! use wikidict::{Definitions, Entry};
//!
//! let mut defs = Definitions::new();
//! defs.insert("Nom".to_string(), vec!["house".to_string()]);
//! let entry = Entry::new("casa", defs).unwrap();
//!
//! let info = DictionaryInfo::new("Wiktionary Dictionary", "Català", "English");
//! let mut writer = DictionaryWriter::new(Vec::new(), Format::Lingvo, &info)?;
//! writer.write_entry(&entry)?;
//! let out = String::from_utf8(writer.finish()?).unwrap();
//!
//! assert!(out.starts_with("#NAME \"Wiktionary Dictionary (Català-English)\"\n"));
//! assert!(out.ends_with("casa\n  [c]Nom[/c]\n  house\n\n"));
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::entry::Entry;

mod dsl;
mod xdxf;

/// Output dictionary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Format {
    /// Lingvo DSL
    #[cfg_attr(feature = "cli", value(alias = "dsl"))]
    Lingvo,
    /// XDXF (visual)
    #[default]
    Xdxf,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Lingvo => "lingvo",
            Format::Xdxf => "xdxf",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Lingvo => "dsl",
            Format::Xdxf => "xdxf",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lingvo" | "dsl" => Ok(Format::Lingvo),
            "xdxf" => Ok(Format::Xdxf),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

/// What the header says about the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInfo {
    /// Full dictionary name.
    pub name: String,
    /// Language of the headwords.
    pub index_language: String,
    /// Language of the definitions.
    pub contents_language: String,
}

impl DictionaryInfo {
    /// Info named `"{base_name} ({index}-{contents})"`.
    pub fn new(base_name: &str, index_language: &str, contents_language: &str) -> Self {
        Self {
            name: format!("{base_name} ({index_language}-{contents_language})"),
            index_language: index_language.to_string(),
            contents_language: contents_language.to_string(),
        }
    }
}

/// Render one entry in `format`.
pub fn format_entry(entry: &Entry, format: Format) -> String {
    match format {
        Format::Lingvo => dsl::format_entry(entry),
        Format::Xdxf => xdxf::format_entry(entry),
    }
}

pub fn write_header<W: Write>(writer: &mut W, format: Format, info: &DictionaryInfo) -> io::Result<()> {
    let header = match format {
        Format::Lingvo => dsl::header(info),
        Format::Xdxf => xdxf::header(info),
    };
    writer.write_all(header.as_bytes())
}

/// Closing markup, if the format has any.
pub fn write_footer<W: Write>(writer: &mut W, format: Format) -> io::Result<()> {
    match format {
        Format::Lingvo => Ok(()),
        Format::Xdxf => writer.write_all(xdxf::footer().as_bytes()),
    }
}

/// Sequential writer for one dictionary file.
///
/// The header is written on construction and the footer by
/// [`finish`](Self::finish). Dropping the writer without finishing leaves
/// an XDXF file unterminated.
pub struct DictionaryWriter<W: Write> {
    writer: W,
    format: Format,
    entries: usize,
}

impl<W: Write> DictionaryWriter<W> {
    pub fn new(mut writer: W, format: Format, info: &DictionaryInfo) -> io::Result<Self> {
        write_header(&mut writer, format, info)?;
        Ok(Self {
            writer,
            format,
            entries: 0,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Entries written so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn write_entry(&mut self, entry: &Entry) -> io::Result<()> {
        self.writer
            .write_all(format_entry(entry, self.format).as_bytes())?;
        self.entries += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Write the footer, flush, and hand back the stream.
    pub fn finish(mut self) -> io::Result<W> {
        write_footer(&mut self.writer, self.format)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
