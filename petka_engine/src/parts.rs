use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::ini::IniFile;

/// The catalogue of game parts declared by `PARTS.INI`.
///
/// Demo data ships without the file; the default (empty) table stands in
/// for it and yields a single implicit part rooted at the content root.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartsTable {
    start_part: Option<u32>,
    start_chapter: Option<u32>,
    parts: Vec<String>,
    ini: IniFile,
}

/// Per-part settings picked up when a part is opened.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PartSettings {
    /// Prefix prepended to every resource path of the part, separator
    /// included, exactly as the table spells it.
    pub current_path: String,
    pub speech_path: String,
    pub disk_id: Option<String>,
    /// Name of the extra store a chapter loads on top of the part, if any.
    pub chapter_store: Option<String>,
}

impl PartsTable {
    pub fn from_ini(ini: IniFile) -> Result<Self> {
        let mut start_part = None;
        let mut start_chapter = None;
        let mut parts = Vec::new();
        for (name, section) in ini.sections() {
            if name == "All" {
                if let Some(value) = section.get("Part") {
                    start_part = Some(
                        value
                            .parse()
                            .with_context(|| format!("parsing startup part {value:?}"))?,
                    );
                }
                if let Some(value) = section.get("Chapter") {
                    start_chapter = Some(
                        value
                            .parse()
                            .with_context(|| format!("parsing startup chapter {value:?}"))?,
                    );
                }
            } else if name.starts_with("Part ") {
                parts.push(name.to_string());
            }
        }
        Ok(PartsTable {
            start_part,
            start_chapter,
            parts,
            ini,
        })
    }

    pub fn start_part(&self) -> Option<u32> {
        self.start_part
    }

    pub fn start_chapter(&self) -> Option<u32> {
        self.start_chapter
    }

    /// Selectable part section names, in file order.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// True for the implicit single-part catalogue of demo data.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn settings(&self, part: u32, chapter: Option<u32>) -> Result<PartSettings> {
        let section_name = format!("Part {part}");
        let section = self
            .ini
            .section(&section_name)
            .ok_or_else(|| anyhow!("PARTS.INI has no [{section_name}] section"))?;
        let required = |key: &str| {
            section
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow!("[{section_name}] is missing {key}"))
        };
        let chapter_store = chapter.and_then(|chapter| {
            self.ini
                .get(&format!("{section_name} Chapter {chapter}"), "Chapter")
                .map(str::to_string)
        });
        Ok(PartSettings {
            current_path: required("CurrentPath")?,
            speech_path: required("PathSpeech")?,
            disk_id: Some(required("DiskID")?),
            chapter_store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petka_formats::TextCodec;

    fn table(text: &str) -> PartsTable {
        let ini = IniFile::parse(text.as_bytes(), TextCodec::default()).unwrap();
        PartsTable::from_ini(ini).unwrap()
    }

    const PARTS_INI: &str = "[All]\n\
        Part=1\n\
        Chapter=2\n\
        [Part 1]\n\
        CurrentPath=PART1\\\n\
        PathSpeech=PART1\\SPEECH\\\n\
        DiskID=CD1\n\
        [Part 1 Chapter 2]\n\
        Chapter=chapter2.str\n\
        [Part 2]\n\
        CurrentPath=PART2\\\n\
        PathSpeech=PART2\\SPEECH\\\n\
        DiskID=CD2\n";

    #[test]
    fn collects_parts_in_file_order() {
        let table = table(PARTS_INI);
        assert_eq!(table.start_part(), Some(1));
        assert_eq!(table.start_chapter(), Some(2));
        assert_eq!(
            table.parts(),
            &["Part 1", "Part 1 Chapter 2", "Part 2"]
        );
        assert!(!table.is_empty());
    }

    #[test]
    fn settings_resolve_paths_and_chapter_store() {
        let table = table(PARTS_INI);
        let settings = table.settings(1, Some(2)).unwrap();
        assert_eq!(settings.current_path, "PART1\\");
        assert_eq!(settings.speech_path, "PART1\\SPEECH\\");
        assert_eq!(settings.disk_id.as_deref(), Some("CD1"));
        assert_eq!(settings.chapter_store.as_deref(), Some("chapter2.str"));

        let settings = table.settings(2, None).unwrap();
        assert_eq!(settings.current_path, "PART2\\");
        assert!(settings.chapter_store.is_none());
    }

    #[test]
    fn unknown_part_is_an_error() {
        let table = table(PARTS_INI);
        assert!(table.settings(9, None).is_err());
    }

    #[test]
    fn missing_current_path_is_an_error() {
        let table = table("[Part 1]\nDiskID=CD1\nPathSpeech=S\\\n");
        assert!(table.settings(1, None).is_err());
    }

    #[test]
    fn default_table_is_the_demo_catalogue() {
        let table = PartsTable::default();
        assert!(table.is_empty());
        assert_eq!(table.start_part(), None);
    }
}
