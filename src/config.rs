//! Language names, default exclusions and the run configuration.
//!
//! Nothing here is global mutable state: a [`Config`] is built once (from
//! defaults, optionally overlaid with a JSON file) and passed down
//! explicitly.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Element type used as a collapsible section container.
pub const CONTAINER_TAG: &str = "details";

/// Attribute carrying a container's nesting depth.
pub const LEVEL_ATTR: &str = "data-level";

/// Container depths tried for part-of-speech subsections, in order.
///
/// Level 3 is used by the Russian and Catalan editions, level 2 by
/// Occitan, level 4 by a few others.
pub const POS_SECTION_LEVELS: [u8; 3] = [3, 2, 4];

/// Section names never treated as parts of speech.
pub const DEFAULT_EXCLUDED_SECTIONS: &[&str] = &[
    "Traduccions",
    "Miscel·lània",
    "Vegeu també",
    "Translations",
    "Miscellany",
    "See also",
    "References",
    "Referéncias",
    "Traduccions_2",
    "Traduccions_3",
];

/// Display names for language codes, as they appear in headings.
pub const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ru", "Russian"),
    ("ca", "Català"),
    ("oc", "Occitan"),
    ("fr", "Français"),
    ("es", "Spanish"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("uk", "Ukrainian"),
    ("be", "Belarusian"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("cs", "Czech"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("no", "Norwegian"),
    ("fi", "Finnish"),
    ("hu", "Hungarian"),
    ("el", "Greek"),
    ("tr", "Turkish"),
    ("ar", "Arabic"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
];

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Settings shared by every file of a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language code to display name.
    pub language_names: BTreeMap<String, String>,
    /// Section headings to skip during extraction.
    pub excluded_sections: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language_names: LANGUAGE_NAMES
                .iter()
                .map(|&(code, name)| (code.to_string(), name.to_string()))
                .collect(),
            excluded_sections: DEFAULT_EXCLUDED_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Shape of the JSON config file: everything optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    language_names: BTreeMap<String, String>,
    #[serde(default)]
    excluded_sections: Option<Vec<String>>,
}

impl Config {
    /// Defaults overlaid with a JSON config file.
    ///
    /// `language_names` entries are merged over the built-in table;
    /// `excluded_sections`, when present, replaces the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(data)?;
        let mut config = Config::default();

        for (code, name) in file.language_names {
            if code.trim().is_empty() {
                return Err(Error::Config("empty language code".into()));
            }
            config.language_names.insert(code, name);
        }
        if let Some(excluded) = file.excluded_sections {
            config.excluded_sections = excluded;
        }
        Ok(config)
    }

    /// Display name for a code, if one is known.
    pub fn lookup_language(&self, code: &str) -> Option<&str> {
        self.language_names.get(code).map(String::as_str)
    }

    /// Display name for a code, falling back to the capitalized code, or
    /// `Unknown` for an empty code.
    pub fn language_name(&self, code: &str) -> String {
        if let Some(name) = self.lookup_language(code) {
            return name.to_string();
        }
        if code.is_empty() {
            return "Unknown".to_string();
        }
        capitalize(code)
    }
}
