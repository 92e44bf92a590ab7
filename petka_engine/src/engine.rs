use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use petka_formats::TextCodec;

use crate::content::ContentDir;
use crate::ini::IniFile;
use crate::part::{PartGraph, PartLoadError, PartLoader};
use crate::parts::PartsTable;

/// Owns the content directory, the parts catalogue, and the currently
/// open part.
///
/// `open_part` builds the next graph completely before swapping it in, so
/// a failed load leaves the previous part untouched.
pub struct Engine {
    content: ContentDir,
    codec: TextCodec,
    parts: PartsTable,
    current: Option<PartGraph>,
}

impl Engine {
    /// Opens the content root and reads the parts catalogue; no part data
    /// is loaded yet.
    pub fn open(root: impl AsRef<Path>, codec: TextCodec) -> Result<Self> {
        let content = ContentDir::open(root)?;
        let parts = if content.exists("parts.ini") {
            let file = content.read("parts.ini")?;
            let ini = IniFile::parse(file.bytes(), codec).context("parsing parts.ini")?;
            PartsTable::from_ini(ini)?
        } else {
            info!("no parts.ini found, assuming single-part data");
            PartsTable::default()
        };
        Ok(Engine {
            content,
            codec,
            parts,
            current: None,
        })
    }

    pub fn parts(&self) -> &PartsTable {
        &self.parts
    }

    pub fn current(&self) -> Option<&PartGraph> {
        self.current.as_ref()
    }

    /// The part to open when the host does not ask for a specific one.
    pub fn start_part(&self) -> u32 {
        self.parts.start_part().unwrap_or(1)
    }

    pub fn start_chapter(&self) -> Option<u32> {
        self.parts.start_chapter()
    }

    /// Loads a part and swaps it in. The previous graph stays published
    /// until the new one has fully loaded.
    pub fn open_part(
        &mut self,
        part: u32,
        chapter: Option<u32>,
    ) -> Result<&PartGraph, PartLoadError> {
        let loader = PartLoader::new(&self.content, self.codec);
        let graph = loader.load(&self.parts, part, chapter)?;
        info!("part {part} opened");
        Ok(self.current.insert(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::LoadStage;
    use std::fs;
    use tempfile::TempDir;

    fn push_u16(buf: &mut Vec<u8>, value: u16) {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    fn push_u32(buf: &mut Vec<u8>, value: u32) {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    // One object (id 10) and one scene (id 100), no actions.
    fn script_dat() -> Vec<u8> {
        let mut buf = Vec::new();
        push_u32(&mut buf, 1);
        push_u32(&mut buf, 1);
        for (id, name) in [(10u16, "hero"), (100u16, "yard")] {
            push_u16(&mut buf, id);
            push_u32(&mut buf, name.len() as u32);
            buf.extend_from_slice(name.as_bytes());
            push_u32(&mut buf, 0);
        }
        buf
    }

    fn backgrnd_bg() -> Vec<u8> {
        let mut buf = Vec::new();
        push_u32(&mut buf, 1);
        push_u16(&mut buf, 100);
        push_u32(&mut buf, 1);
        push_u16(&mut buf, 10);
        for int in [1u32, 2, 3, 4, 5] {
            push_u32(&mut buf, int);
        }
        buf
    }

    fn dialogue_lod() -> Vec<u8> {
        let mut buf = Vec::new();
        push_u32(&mut buf, 1);
        push_u32(&mut buf, 10);
        buf.extend_from_slice(b"A001.WAV\0\0\0\0");
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 0);
        buf.extend_from_slice(b"Hello\0");
        buf
    }

    fn dialogue_fix() -> Vec<u8> {
        let mut buf = Vec::new();
        push_u32(&mut buf, 1); // groups
        push_u32(&mut buf, 1); // id
        push_u32(&mut buf, 1); // acts
        push_u32(&mut buf, 0); // arg1
        push_u16(&mut buf, 1); // act opcode
        push_u16(&mut buf, 10); // act object
        push_u32(&mut buf, 1); // dialogues
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 0); // start offset 0
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 0);
        push_u32(&mut buf, 2); // ops
        push_u16(&mut buf, 0);
        buf.extend_from_slice(&[0, 1]);
        push_u16(&mut buf, 0xFFFF);
        buf.extend_from_slice(&[0, 4]);
        buf
    }

    fn write_part(dir: &TempDir, base: &str) {
        let root = dir.path().join(base);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("script.dat"), script_dat()).unwrap();
        fs::write(root.join("backgrnd.bg"), backgrnd_bg()).unwrap();
        fs::write(root.join("resource.qrc"), "1=main.bmp\n2=flic.flc\n").unwrap();
        fs::write(root.join("bgs.ini"), "[Settings]\nStartRoom=yard\n").unwrap();
        fs::write(root.join("names.ini"), "[all]\nhero=Hero\n").unwrap();
        fs::write(root.join("dialogue.lod"), dialogue_lod()).unwrap();
        fs::write(root.join("dialogue.fix"), dialogue_fix()).unwrap();
    }

    const PARTS_INI: &str = "[All]\n\
        Part=1\n\
        [Part 1]\n\
        CurrentPath=PART1\\\n\
        PathSpeech=PART1\\SPEECH\\\n\
        DiskID=CD1\n\
        [Part 2]\n\
        CurrentPath=PART2\\\n\
        PathSpeech=PART2\\SPEECH\\\n\
        DiskID=CD2\n";

    #[test]
    fn opens_a_full_part() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("parts.ini"), PARTS_INI).unwrap();
        write_part(&dir, "PART1");

        let mut engine = Engine::open(dir.path(), TextCodec::default()).unwrap();
        assert_eq!(engine.start_part(), 1);

        let graph = engine.open_part(1, None).unwrap();
        assert_eq!(graph.script.objects().len(), 1);
        assert_eq!(graph.script.scenes().len(), 1);
        assert_eq!(graph.script.scene(100).unwrap().refs.len(), 1);
        assert_eq!(graph.resources.get(1), Some("main.bmp"));
        assert_eq!(graph.start_scene.as_deref(), Some("yard"));
        assert_eq!(graph.names.get("hero").map(String::as_str), Some("Hero"));
        assert_eq!(graph.messages.len(), 1);
        assert_eq!(graph.messages[0].caption, "Hello");
        assert_eq!(graph.dialogues.len(), 1);
        let dialogue = &graph.dialogues[0].acts[0].dialogues[0];
        assert_eq!(dialogue.operations.len(), 2);
        assert_eq!(
            dialogue.operations[0]
                .message(&graph.messages)
                .unwrap()
                .caption,
            "Hello"
        );
        assert!(dialogue.operations[1].message(&graph.messages).is_none());
    }

    #[test]
    fn failed_load_keeps_the_previous_part() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("parts.ini"), PARTS_INI).unwrap();
        write_part(&dir, "PART1");
        // PART2 exists but has no data files.
        fs::create_dir_all(dir.path().join("PART2")).unwrap();

        let mut engine = Engine::open(dir.path(), TextCodec::default()).unwrap();
        engine.open_part(1, None).unwrap();

        let err = engine.open_part(2, None).unwrap_err();
        assert_eq!(err.stage, LoadStage::Script);
        assert_eq!(err.part, 2);

        let current = engine.current().unwrap();
        assert_eq!(current.part, 1);
        assert_eq!(current.script.objects().len(), 1);
    }

    #[test]
    fn demo_data_without_parts_ini_loads_from_the_root() {
        let dir = TempDir::new().unwrap();
        write_part(&dir, ".");

        let mut engine = Engine::open(dir.path(), TextCodec::default()).unwrap();
        assert!(engine.parts().is_empty());

        let graph = engine.open_part(1, None).unwrap();
        assert_eq!(graph.settings.current_path, "");
        assert_eq!(graph.script.objects().len(), 1);
    }

    #[test]
    fn optional_dialogue_files_may_be_absent() {
        let dir = TempDir::new().unwrap();
        write_part(&dir, ".");
        fs::remove_file(dir.path().join("dialogue.lod")).unwrap();
        fs::remove_file(dir.path().join("dialogue.fix")).unwrap();
        fs::remove_file(dir.path().join("names.ini")).unwrap();

        let mut engine = Engine::open(dir.path(), TextCodec::default()).unwrap();
        let graph = engine.open_part(1, None).unwrap();
        assert!(graph.messages.is_empty());
        assert!(graph.dialogues.is_empty());
        assert!(graph.names.is_empty());
    }

    #[test]
    fn corrupt_dialogue_table_reports_its_stage() {
        let dir = TempDir::new().unwrap();
        write_part(&dir, ".");
        // An act that references an object the script table never declared.
        // The act's object ref sits after the 4-byte header, the 12-byte
        // group record, and the act opcode.
        let mut fix = dialogue_fix();
        fix[18] = 0xEE;
        fix[19] = 0xEE;
        fs::write(dir.path().join("dialogue.fix"), fix).unwrap();

        let mut engine = Engine::open(dir.path(), TextCodec::default()).unwrap();
        let err = engine.open_part(1, None).unwrap_err();
        assert_eq!(err.stage, LoadStage::Dialogues);
        assert!(engine.current().is_none());
    }
}
