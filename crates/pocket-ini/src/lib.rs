//! INI settings documents.
//!
//! A document is an ordered list of sections, each an ordered list of
//! `key=value` pairs. The format is deliberately loose:
//!
//! - `[name]` opens a section; the name runs up to the *last* `]` on the line.
//! - Lines starting with `#` are comments.
//! - Any other line containing `=` is a pair, split on the first `=`. Keys
//!   and values are kept verbatim (no trimming).
//! - Pairs that appear before any section header land in an unnamed `""`
//!   section.
//! - Everything else is ignored.
//!
//! Section and key lookup is case-sensitive and returns the first match.

use std::fmt;
use std::path::Path;

use pocket_types::error::{PocketError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Section {
    name: String,
    pairs: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pairs: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An in-memory INI document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse INI text.
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        let mut current: Option<usize> = None;

        for raw in text.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if let Some(rest) = line.strip_prefix('[') {
                if let Some(end) = rest.rfind(']') {
                    doc.sections.push(Section::new(&rest[..end]));
                    current = Some(doc.sections.len() - 1);
                }
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let idx = match current {
                Some(idx) => idx,
                None => {
                    doc.sections.push(Section::new(""));
                    let idx = doc.sections.len() - 1;
                    current = Some(idx);
                    idx
                },
            };
            doc.sections[idx]
                .pairs
                .push((key.to_string(), value.to_string()));
        }
        doc
    }

    /// Read and parse an INI file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PocketError::Ini(format!("cannot read {}: {e}", path.display())))?;
        let doc = Self::parse(&text);
        log::debug!(
            "loaded {} ini section(s) from {}",
            doc.sections.len(),
            path.display()
        );
        Ok(doc)
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string())
            .map_err(|e| PocketError::Ini(format!("cannot write {}: {e}", path.display())))
    }

    /// Integer value with C `atoi` semantics, or `default` when the key is
    /// missing.
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.locate(section, key).map(atoi).unwrap_or(default)
    }

    /// Stored string value, or `default` when the key is missing.
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.locate(section, key).unwrap_or(default).to_string()
    }

    /// Stored string value if present.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.locate(section, key)
    }

    pub fn set_int(&mut self, section: &str, key: &str, value: i32) {
        self.set_string(section, key, &value.to_string());
    }

    /// Set a value, appending the section and/or key when missing.
    pub fn set_string(&mut self, section: &str, key: &str, value: &str) {
        let sec = match self.sections.iter().position(|s| s.name == section) {
            Some(idx) => &mut self.sections[idx],
            None => {
                self.sections.push(Section::new(section));
                let last = self.sections.len() - 1;
                &mut self.sections[last]
            },
        };
        match sec.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => sec.pairs.push((key.to_string(), value.to_string())),
        }
    }

    /// Section names in document order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Pairs of the first section called `section`.
    pub fn pairs(&self, section: &str) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .iter()
            .find(|s| s.name == section)
            .into_iter()
            .flat_map(|s| s.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn locate(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == section)
            .and_then(|s| s.get(key))
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (k, v) in &section.pairs {
                writeln!(f, "{k}={v}")?;
            }
        }
        Ok(())
    }
}

/// Leading whitespace, optional sign, then decimal digits. Anything else
/// yields 0. Saturates instead of overflowing.
pub fn atoi(s: &str) -> i32 {
    let s = s.trim_start();
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        n = (n * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    let n = if neg { -n } else { n };
    n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# settings
[Video]
Scale=2
VSync=1
[Paths]
Rom=ms0:/PSP/ROMS/a=b.bin
";

    #[test]
    fn parse_sections_and_pairs() {
        let doc = IniDocument::parse(SAMPLE);
        assert_eq!(doc.sections().collect::<Vec<_>>(), ["Video", "Paths"]);
        assert_eq!(doc.get_int("Video", "Scale", 0), 2);
        assert_eq!(doc.get("Paths", "Rom"), Some("ms0:/PSP/ROMS/a=b.bin"));
    }

    #[test]
    fn pairs_before_section_go_to_unnamed() {
        let doc = IniDocument::parse("a=1\n[S]\nb=2\n");
        assert_eq!(doc.get_int("", "a", 0), 1);
        assert_eq!(doc.sections().collect::<Vec<_>>(), ["", "S"]);
    }

    #[test]
    fn section_name_runs_to_last_bracket() {
        let doc = IniDocument::parse("[a]b]\nk=v\n");
        assert_eq!(doc.get("a]b", "k"), Some("v"));
    }

    #[test]
    fn unterminated_header_and_junk_are_ignored() {
        let doc = IniDocument::parse("[oops\njunk line\n#k=v\n");
        assert!(doc.is_empty());
    }

    #[test]
    fn crlf_is_stripped() {
        let doc = IniDocument::parse("[S]\r\nk=v\r\n");
        assert_eq!(doc.get("S", "k"), Some("v"));
    }

    #[test]
    fn keys_are_not_trimmed() {
        let doc = IniDocument::parse("[S]\n key = v\n");
        assert_eq!(doc.get("S", "key"), None);
        assert_eq!(doc.get("S", " key "), Some(" v"));
    }

    #[test]
    fn first_match_wins() {
        let doc = IniDocument::parse("[S]\nk=1\nk=2\n[S]\nk=3\n");
        assert_eq!(doc.get_int("S", "k", 0), 1);
    }

    #[test]
    fn defaults_for_missing_keys() {
        let doc = IniDocument::parse(SAMPLE);
        assert_eq!(doc.get_int("Video", "Missing", 7), 7);
        assert_eq!(doc.get_int("Nope", "Scale", -1), -1);
        assert_eq!(doc.get_string("Video", "Missing", "dflt"), "dflt");
    }

    #[test]
    fn set_appends_section_and_key() {
        let mut doc = IniDocument::parse(SAMPLE);
        doc.set_int("Video", "Scale", 3);
        doc.set_int("Video", "Frameskip", 1);
        doc.set_string("Audio", "Device", "default");
        assert_eq!(doc.get_int("Video", "Scale", 0), 3);
        assert_eq!(
            doc.pairs("Video").map(|(k, _)| k).collect::<Vec<_>>(),
            ["Scale", "VSync", "Frameskip"]
        );
        assert_eq!(doc.sections().last(), Some("Audio"));
    }

    #[test]
    fn display_writes_sections_then_pairs() {
        let mut doc = IniDocument::new();
        doc.set_int("A", "x", 1);
        doc.set_string("B", "y", "two");
        assert_eq!(doc.to_string(), "[A]\nx=1\n[B]\ny=two\n");
    }

    #[test]
    fn atoi_semantics() {
        assert_eq!(atoi("42"), 42);
        assert_eq!(atoi("  -17xyz"), -17);
        assert_eq!(atoi("+5"), 5);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("-"), 0);
        assert_eq!(atoi("99999999999"), i32::MAX);
        assert_eq!(atoi("-99999999999"), i32::MIN);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let mut doc = IniDocument::new();
        doc.set_int("General", "Volume", 8);
        doc.set_string("General", "Skin", "dark");
        doc.save(&path).unwrap();

        let loaded = IniDocument::load(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn load_missing_file_is_ini_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = IniDocument::load(&dir.path().join("missing.ini")).unwrap_err();
        assert!(matches!(err, PocketError::Ini(_)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn key() -> impl Strategy<Value = String> {
            "[A-Za-z][A-Za-z0-9_]{0,8}"
        }

        fn value() -> impl Strategy<Value = String> {
            "[ -~]{0,16}"
        }

        proptest! {
            #[test]
            fn round_trip_preserves_pairs(
                entries in prop::collection::vec((key(), key(), value()), 0..12)
            ) {
                let mut doc = IniDocument::new();
                for (s, k, v) in &entries {
                    doc.set_string(s, k, v);
                }
                let reparsed = IniDocument::parse(&doc.to_string());
                for (s, k, _) in &entries {
                    prop_assert_eq!(reparsed.get(s, k), doc.get(s, k));
                }
            }

            #[test]
            fn int_round_trip(n in any::<i32>()) {
                let mut doc = IniDocument::new();
                doc.set_int("S", "n", n);
                let reparsed = IniDocument::parse(&doc.to_string());
                prop_assert_eq!(reparsed.get_int("S", "n", 0), n);
            }
        }
    }
}
