//! Writing-system detection for headwords.
//!
//! Used to filter a corpus by file name before any page is parsed. A word's
//! script is the one covering most of its alphanumeric characters, judged
//! purely by Unicode block ranges.

use std::fmt;
use std::path::Path;

/// Writing systems recognized by the corpus filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
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

impl Script {
    /// All scripts, in classification priority order.
    pub const ALL: [Script; 10] = [
        Script::Latin,
        Script::Cyrillic,
        Script::Greek,
        Script::Chinese,
        Script::Japanese,
        Script::Korean,
        Script::Arabic,
        Script::Hebrew,
        Script::Devanagari,
        Script::Thai,
    ];

    /// Inclusive code point ranges for the script.
    pub fn ranges(self) -> &'static [(u32, u32)] {
        match self {
            Script::Latin => &[
                (0x0041, 0x005A), // Basic Latin uppercase
                (0x0061, 0x007A), // Basic Latin lowercase
                (0x00C0, 0x00FF), // Latin-1 Supplement
                (0x0100, 0x017F), // Latin Extended-A
                (0x0180, 0x024F), // Latin Extended-B
            ],
            Script::Cyrillic => &[(0x0400, 0x04FF), (0x0500, 0x052F)],
            Script::Greek => &[(0x0370, 0x03FF)],
            Script::Chinese => &[(0x4E00, 0x9FFF), (0x3400, 0x4DBF)],
            Script::Japanese => &[
                (0x3040, 0x309F), // Hiragana
                (0x30A0, 0x30FF), // Katakana
                (0x4E00, 0x9FFF), // shared CJK ideographs
            ],
            Script::Korean => &[(0xAC00, 0xD7AF), (0x1100, 0x11FF)],
            Script::Arabic => &[(0x0600, 0x06FF), (0x0750, 0x077F)],
            Script::Hebrew => &[(0x0590, 0x05FF)],
            Script::Devanagari => &[(0x0900, 0x097F)],
            Script::Thai => &[(0x0E00, 0x0E7F)],
        }
    }

    pub fn contains(self, c: char) -> bool {
        let cp = c as u32;
        self.ranges()
            .iter()
            .any(|&(start, end)| (start..=end).contains(&cp))
    }

    pub fn name(self) -> &'static str {
        match self {
            Script::Latin => "latin",
            Script::Cyrillic => "cyrillic",
            Script::Greek => "greek",
            Script::Chinese => "chinese",
            Script::Japanese => "japanese",
            Script::Korean => "korean",
            Script::Arabic => "arabic",
            Script::Hebrew => "hebrew",
            Script::Devanagari => "devanagari",
            Script::Thai => "thai",
        }
    }

    /// The first script (in [`Script::ALL`] order) covering `c`.
    pub fn of_char(c: char) -> Option<Script> {
        Script::ALL.into_iter().find(|s| s.contains(c))
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dominant script of a file name, ignoring any extension.
///
/// Returns `None` when no alphanumeric character falls in a known script.
/// Ties go to the script listed first in [`Script::ALL`].
pub fn word_script(file_name: &str) -> Option<Script> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let mut counts = [0usize; Script::ALL.len()];
    for c in stem.chars().filter(|c| c.is_alphanumeric()) {
        if let Some(pos) = Script::ALL.iter().position(|s| s.contains(c)) {
            counts[pos] += 1;
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (pos, &count) in counts.iter().enumerate() {
        if count > 0 && best.is_none_or(|(_, top)| count > top) {
            best = Some((pos, count));
        }
    }
    best.map(|(pos, _)| Script::ALL[pos])
}

/// Whether a file belongs to one of the requested scripts.
///
/// An empty selection means every script. The first character is checked
/// before falling back to a full count.
pub fn matches_scripts(file_name: &str, scripts: &[Script]) -> bool {
    if scripts.is_empty() {
        return true;
    }
    if let Some(first) = file_name.chars().next()
        && scripts.iter().any(|s| s.contains(first))
    {
        return true;
    }
    word_script(file_name).is_some_and(|s| scripts.contains(&s))
}
