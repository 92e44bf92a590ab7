use anyhow::{bail, Result};
use indexmap::IndexMap;
use petka_formats::TextCodec;

/// `.ini` configuration with section and key order preserved.
///
/// The engine displays several of these tables in file order (the parts
/// list, inventory captions), so ordering is part of the data, not an
/// artifact of parsing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IniFile {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl IniFile {
    /// Parses `;`-commented, `[Section]`-headed `key=value` text.
    ///
    /// Keys and values are trimmed; lines without `=` are skipped; a
    /// key-value pair before any section header is malformed. A repeated
    /// section header restarts that section's table.
    pub fn parse(bytes: &[u8], codec: TextCodec) -> Result<Self> {
        let text = codec.decode(bytes);
        let mut sections: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        let mut current: Option<String> = None;

        for (line_no, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                let name = name.trim().to_string();
                sections.insert(name.clone(), IndexMap::new());
                current = Some(name);
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let Some(section) = current.clone() else {
                bail!(
                    "line {}: key-value pair before any [section] header",
                    line_no + 1
                );
            };
            sections
                .entry(section)
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(IniFile { sections })
    }

    pub fn section(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.sections.get(name)
    }

    /// Section lookup ignoring ASCII case; shipped data is inconsistent
    /// about `[all]` vs `[ALL]`.
    pub fn section_ignore_case(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.sections
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, section)| section)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &IndexMap<String, String>)> {
        self.sections
            .iter()
            .map(|(name, section)| (name.as_str(), section))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key).map(String::as_str)
    }
}
