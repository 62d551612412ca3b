//! XDXF output.
//!
//! Each entry is an `<ar>` article with one `<k>` key, a `<pos>` per label
//! and a `<def>` per definition, one element per line. All text and
//! attribute values are XML-escaped.

use quick_xml::escape::escape;

use crate::entry::Entry;

use super::DictionaryInfo;

const DOCTYPE: &str = "<!DOCTYPE xdxf SYSTEM \"https://raw.github.com/soshial/xdxf_makedict/master/format_standard/xdxf_strict.dtd\">";

/// Render one article, newline terminated.
pub fn format_entry(entry: &Entry) -> String {
    let mut out = String::new();
    out.push_str("<ar><k>");
    out.push_str(&escape(entry.headword().as_str()));
    out.push_str("</k>\n");
    for (label, definitions) in entry.definitions() {
        out.push_str("<pos>");
        out.push_str(&escape(label.as_str()));
        out.push_str("</pos>\n");
        for definition in definitions {
            out.push_str("<def>");
            out.push_str(&escape(definition.as_str()));
            out.push_str("</def>\n");
        }
    }
    out.push_str("</ar>\n");
    out
}

pub fn header(info: &DictionaryInfo) -> String {
    let lang_from = info.index_language.to_lowercase();
    let lang_to = info.contents_language.to_lowercase();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
         {DOCTYPE}\n\
         <xdxf lang_from=\"{}\" lang_to=\"{}\" format=\"visual\">\n\
         <full_name>{}</full_name>\n\
         <description>Converted from Wiktionary</description>\n\
         <abbreviations>\n\
         </abbreviations>\n\
         <xdxf_body>\n",
        escape(lang_from.as_str()),
        escape(lang_to.as_str()),
        escape(info.name.as_str()),
    )
}

pub fn footer() -> &'static str {
    "</xdxf_body>\n</xdxf>\n"
}

#[cfg(test)]
mod tests {
    use quick_xml::Reader;
    use quick_xml::escape::unescape;
    use quick_xml::events::Event;

    use super::*;
    use crate::entry::Definitions;

    fn entry(word: &str, pairs: &[(&str, &[&str])]) -> Entry {
        let defs: Definitions = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect();
        Entry::new(word, defs).expect("entry")
    }

    fn is_well_formed(xml: &str) -> bool {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => return true,
                Ok(_) => {}
                Err(_) => return false,
            }
        }
    }

    fn element_text<'a>(xml: &'a str, tag: &str) -> &'a str {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let start = xml.find(&open).expect("open tag") + open.len();
        let end = start + xml[start..].find(&close).expect("close tag");
        &xml[start..end]
    }

    #[test]
    fn test_format_entry() {
        let out = format_entry(&entry("casa_gran", &[("Nom", &["house", "home"])]));
        assert_eq!(
            out,
            "<ar><k>casa gran</k>\n<pos>Nom</pos>\n<def>house</def>\n<def>home</def>\n</ar>\n"
        );
    }

    #[test]
    fn test_escaping() {
        let out = format_entry(&entry("fish_&_chips", &[("Noun \"x\"", &["a < b", "it's"])]));
        assert!(out.contains("<k>fish &amp; chips</k>"));
        assert!(out.contains("<def>a &lt; b</def>"));
        assert!(!out.contains("a < b"));
        assert!(!out.contains('"'));
        assert!(!out.contains("it's"));
    }

    #[test]
    fn test_escaped_entry_parses() {
        let out = format_entry(&entry("R&D", &[("Noun", &["x < y > z"])]));
        assert!(is_well_formed(&out));
        assert_eq!(unescape(element_text(&out, "k")).expect("unescape"), "R&D");
        assert_eq!(unescape(element_text(&out, "def")).expect("unescape"), "x < y > z");
    }

    #[test]
    fn test_header_and_footer() {
        let info = DictionaryInfo {
            name: "Wiktionary Dictionary (Català-English)".into(),
            index_language: "Català".into(),
            contents_language: "English".into(),
        };
        let head = header(&info);
        assert!(head.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<!DOCTYPE xdxf SYSTEM"));
        assert!(head.contains("<xdxf lang_from=\"català\" lang_to=\"english\" format=\"visual\">\n"));
        assert!(head.contains("<full_name>Wiktionary Dictionary (Català-English)</full_name>\n"));
        assert!(head.contains("<description>Converted from Wiktionary</description>\n"));
        assert!(head.ends_with("<abbreviations>\n</abbreviations>\n<xdxf_body>\n"));
        assert_eq!(footer(), "</xdxf_body>\n</xdxf>\n");
    }
}
