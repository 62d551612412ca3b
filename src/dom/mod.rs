//! HTML loading.
//!
//! Pages are parsed whole with html5ever into an arena [`Document`]. The
//! parser is as forgiving as a browser: unclosed tags, stray entities and
//! misnested markup are repaired, never reported as failures. What does fail:
//!
//! - the path is not a regular readable file ([`Error::NotAFile`], [`Error::Io`])
//! - the bytes are not UTF-8 ([`Error::InvalidUtf8`])
//! - there is no markup at all ([`Error::EmptyDocument`])
//!
//! Each of these is a per-file skip for the caller.

mod arena;
mod tree_sink;

use std::fs;
use std::path::Path;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use tracing::trace;

use crate::error::{Error, Result};

pub use arena::{Ancestors, Attribute, Children, Descendants, Document, Node, NodeData, NodeId};
pub use tree_sink::DocumentSink;

/// Parse raw page bytes.
///
/// A UTF-8 byte-order mark is stripped; any other non-UTF-8 input is
/// rejected rather than guessed at.
pub fn parse_html(bytes: &[u8]) -> Result<Document> {
    let (text, malformed) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if malformed {
        return Err(Error::InvalidUtf8);
    }
    if text.trim().is_empty() {
        return Err(Error::EmptyDocument);
    }
    Ok(parse_html_str(&text))
}

/// Parse an already decoded page. Never fails.
pub fn parse_html_str(html: &str) -> Document {
    let sink = parse_document(DocumentSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    if sink.error_count() > 0 {
        trace!(errors = sink.error_count(), "recovered from malformed markup");
    }
    sink.into_document()
}

/// Read and parse one page from disk.
pub fn read_document(path: &Path) -> Result<Document> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    parse_html(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_utf8() {
        let bytes = b"<html><body>caf\xe9</body></html>";
        assert!(matches!(parse_html(bytes), Err(Error::InvalidUtf8)));
    }

    #[test]
    fn test_strips_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("<p id=\"x\">ok</p>".as_bytes());
        let doc = parse_html(&bytes).expect("valid page");
        let p = doc.get_by_id("x").expect("p with id");
        assert_eq!(doc.text_content(p), "ok");
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(parse_html(b""), Err(Error::EmptyDocument)));
        assert!(matches!(parse_html(b"  \n\t"), Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_read_document_rejects_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_document(dir.path()).expect_err("directory is not a page");
        assert!(matches!(err, Error::NotAFile(_)));
    }

    #[test]
    fn test_read_document_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_document(&dir.path().join("absent")).expect_err("missing");
        assert!(matches!(err, Error::Io(_)));
    }
}
