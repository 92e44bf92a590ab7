use std::fmt;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::info;
use petka_formats::{
    decode_dialogues, decode_messages, link_scene_refs, DialogueGroup, DialogueMessage,
    ResourceIndex, ScriptGraph, TextCodec,
};
use serde::Serialize;
use thiserror::Error;

use crate::content::ContentDir;
use crate::ini::IniFile;
use crate::parts::{PartSettings, PartsTable};

/// Stage of the part-load pipeline. Failures carry the stage so a host can
/// tell a broken install from a single corrupt table and decide whether to
/// abort or fall back to another part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStage {
    Settings,
    Script,
    SceneRefs,
    Resources,
    Names,
    Inventory,
    Messages,
    Dialogues,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadStage::Settings => "settings",
            LoadStage::Script => "script",
            LoadStage::SceneRefs => "scene references",
            LoadStage::Resources => "resources",
            LoadStage::Names => "names",
            LoadStage::Inventory => "inventory",
            LoadStage::Messages => "messages",
            LoadStage::Dialogues => "dialogues",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("loading part {part} failed at the {stage} stage")]
pub struct PartLoadError {
    pub part: u32,
    pub stage: LoadStage,
    #[source]
    pub source: anyhow::Error,
}

/// Everything reconstructed for one part. Immutable once returned; a host
/// drops the whole graph when another part is opened.
#[derive(Debug, Serialize)]
pub struct PartGraph {
    pub part: u32,
    pub chapter: Option<u32>,
    pub settings: PartSettings,
    pub start_scene: Option<String>,
    pub script: ScriptGraph,
    pub resources: ResourceIndex,
    pub names: IndexMap<String, String>,
    pub inventory: IndexMap<String, String>,
    pub messages: Vec<DialogueMessage>,
    pub dialogues: Vec<DialogueGroup>,
}

/// Runs the loaders of one part in dependency order: the script table
/// first (everything else resolves against its indexes), then scene
/// references, resources, name tables, messages, and the dialogue tree.
pub struct PartLoader<'a> {
    content: &'a ContentDir,
    codec: TextCodec,
}

impl<'a> PartLoader<'a> {
    pub fn new(content: &'a ContentDir, codec: TextCodec) -> Self {
        PartLoader { content, codec }
    }

    pub fn load(
        &self,
        table: &PartsTable,
        part: u32,
        chapter: Option<u32>,
    ) -> Result<PartGraph, PartLoadError> {
        let fail = |stage: LoadStage| move |source: anyhow::Error| PartLoadError {
            part,
            stage,
            source,
        };

        let settings = if table.is_empty() {
            PartSettings::default()
        } else {
            table
                .settings(part, chapter)
                .map_err(fail(LoadStage::Settings))?
        };
        let base = settings.current_path.clone();

        let start_scene = self
            .load_start_scene(&base)
            .map_err(fail(LoadStage::Settings))?;

        let mut script = self
            .load_script(&base)
            .map_err(fail(LoadStage::Script))?;

        self.load_scene_refs(&base, &mut script)
            .map_err(fail(LoadStage::SceneRefs))?;

        let resources = self
            .load_resources(&base)
            .map_err(fail(LoadStage::Resources))?;

        let names = self
            .load_name_table(&base, "names.ini")
            .map_err(fail(LoadStage::Names))?;
        let inventory = self
            .load_name_table(&base, "invntr.txt")
            .map_err(fail(LoadStage::Inventory))?;

        let messages = self
            .load_messages(&base, &script)
            .map_err(fail(LoadStage::Messages))?;

        let dialogues = self
            .load_dialogues(&base, &script)
            .map_err(fail(LoadStage::Dialogues))?;

        Ok(PartGraph {
            part,
            chapter,
            settings,
            start_scene,
            script,
            resources,
            names,
            inventory,
            messages,
            dialogues,
        })
    }

    fn load_start_scene(&self, base: &str) -> Result<Option<String>> {
        let rel = format!("{base}bgs.ini");
        if !self.content.exists(&rel) {
            return Ok(None);
        }
        let file = self.content.read(&rel)?;
        let ini = IniFile::parse(file.bytes(), self.codec)
            .with_context(|| format!("parsing {rel}"))?;
        Ok(ini.get("Settings", "StartRoom").map(str::to_string))
    }

    fn load_script(&self, base: &str) -> Result<ScriptGraph> {
        let rel = format!("{base}script.dat");
        let file = self
            .content
            .read(&rel)
            .context("can't open SCRIPT.DAT")?;
        let script = ScriptGraph::decode(file.bytes(), self.codec)?;
        info!(
            "loaded {} objects and {} scenes from {rel}",
            script.objects().len(),
            script.scenes().len()
        );
        Ok(script)
    }

    fn load_scene_refs(&self, base: &str, script: &mut ScriptGraph) -> Result<()> {
        let rel = format!("{base}backgrnd.bg");
        let file = self.content.read(&rel)?;
        link_scene_refs(script, file.bytes())?;
        info!("linked scene references from {rel}");
        Ok(())
    }

    fn load_resources(&self, base: &str) -> Result<ResourceIndex> {
        let rel = format!("{base}resource.qrc");
        let file = self.content.read(&rel)?;
        let resources = ResourceIndex::parse(file.bytes(), self.codec)?;
        info!("indexed {} resources from {rel}", resources.len());
        Ok(resources)
    }

    fn load_name_table(&self, base: &str, name: &str) -> Result<IndexMap<String, String>> {
        let rel = format!("{base}{name}");
        if !self.content.exists(&rel) {
            return Ok(IndexMap::new());
        }
        let file = self.content.read(&rel)?;
        let ini = IniFile::parse(file.bytes(), self.codec)
            .with_context(|| format!("parsing {rel}"))?;
        Ok(ini
            .section_ignore_case("all")
            .cloned()
            .unwrap_or_default())
    }

    fn load_messages(&self, base: &str, script: &ScriptGraph) -> Result<Vec<DialogueMessage>> {
        let rel = format!("{base}dialogue.lod");
        if !self.content.exists(&rel) {
            return Ok(Vec::new());
        }
        let file = self.content.read(&rel)?;
        let messages = decode_messages(file.bytes(), script, self.codec)?;
        info!("loaded {} dialogue messages from {rel}", messages.len());
        Ok(messages)
    }

    fn load_dialogues(&self, base: &str, script: &ScriptGraph) -> Result<Vec<DialogueGroup>> {
        let rel = format!("{base}dialogue.fix");
        if !self.content.exists(&rel) {
            return Ok(Vec::new());
        }
        let file = self.content.read(&rel)?;
        let dialogues = decode_dialogues(file.bytes(), script)?;
        info!("loaded {} dialogue groups from {rel}", dialogues.len());
        Ok(dialogues)
    }
}
