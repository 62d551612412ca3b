//! Lingvo DSL output.
//!
//! Entries are plain text: the headword on its own line, then each label as
//! `[c]..[/c]` followed by its definitions, all indented by two spaces, and
//! a blank line between entries. Entry text is written as is.

use crate::entry::Entry;

use super::DictionaryInfo;

/// Render one entry, including its trailing blank line.
pub fn format_entry(entry: &Entry) -> String {
    let mut out = String::new();
    out.push_str(&entry.headword());
    out.push('\n');
    for (label, definitions) in entry.definitions() {
        out.push_str("  [c]");
        out.push_str(label);
        out.push_str("[/c]\n");
        for definition in definitions {
            out.push_str("  ");
            out.push_str(definition);
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

pub fn header(info: &DictionaryInfo) -> String {
    format!(
        "#NAME \"{}\"\n#INDEX_LANGUAGE \"{}\"\n#CONTENTS_LANGUAGE \"{}\"\n#CHARSET UTF-8\n\n",
        quote(&info.name),
        quote(&info.index_language),
        quote(&info.contents_language),
    )
}

/// Escape double quotes inside a header value.
fn quote(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Definitions;

    fn entry(word: &str, pairs: &[(&str, &[&str])]) -> Entry {
        let defs: Definitions = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect();
        Entry::new(word, defs).expect("entry")
    }

    #[test]
    fn test_format_entry() {
        let out = format_entry(&entry("casa_gran", &[("Nom", &["house, big"])]));
        assert_eq!(out, "casa gran\n  [c]Nom[/c]\n  house, big\n\n");

        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[..4], ["casa gran", "  [c]Nom[/c]", "  house, big", ""]);
    }

    #[test]
    fn test_multiple_labels_keep_order() {
        let out = format_entry(&entry("run", &[("Verb", &["to go", "to flee"]), ("Noun", &["a run"])]));
        assert_eq!(
            out,
            "run\n  [c]Verb[/c]\n  to go\n  to flee\n  [c]Noun[/c]\n  a run\n\n"
        );
    }

    #[test]
    fn test_header_escapes_quotes() {
        let info = DictionaryInfo {
            name: "My \"best\" dict (Català-English)".into(),
            index_language: "Català".into(),
            contents_language: "English".into(),
        };
        assert_eq!(
            header(&info),
            "#NAME \"My \\\"best\\\" dict (Català-English)\"\n\
             #INDEX_LANGUAGE \"Català\"\n\
             #CONTENTS_LANGUAGE \"English\"\n\
             #CHARSET UTF-8\n\n"
        );
    }
}
