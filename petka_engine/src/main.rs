use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use petka_formats::TextCodec;
use serde::Serialize;

mod content;
mod engine;
mod ini;
mod part;
mod parts;

use engine::Engine;

/// Host prototype that loads a game part and reports the reconstructed
/// resource graph.
#[derive(Parser, Debug)]
#[command(
    about = "Load a game part and report the reconstructed resource graph",
    version
)]
struct Args {
    /// Path to the game content directory
    #[arg(long, default_value = "data")]
    content_root: PathBuf,

    /// Part number to open (defaults to the startup part from PARTS.INI)
    #[arg(long)]
    part: Option<u32>,

    /// Chapter number within the part
    #[arg(long)]
    chapter: Option<u32>,

    /// Text encoding label for names and captions
    #[arg(long, default_value = "windows-1251")]
    encoding: String,

    /// Path to write the loaded-graph summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// List per-scene references and dialogue groups
    #[arg(long)]
    verbose: bool,
}

#[derive(Serialize)]
struct LoadSummary<'a> {
    part: u32,
    chapter: Option<u32>,
    parts: &'a [String],
    start_scene: Option<&'a str>,
    objects: usize,
    scenes: usize,
    resources: usize,
    names: usize,
    inventory: usize,
    messages: usize,
    dialogue_groups: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let codec = TextCodec::for_label(&args.encoding)
        .with_context(|| format!("unknown encoding label '{}'", args.encoding))?;

    let mut engine = Engine::open(&args.content_root, codec)
        .with_context(|| format!("opening content root {}", args.content_root.display()))?;

    let part = args.part.unwrap_or_else(|| engine.start_part());
    let chapter = args.chapter.or_else(|| engine.start_chapter());
    engine.open_part(part, chapter)?;
    let graph = engine
        .current()
        .context("no part graph published after load")?;

    println!(
        "Part {part} loaded: {} objects, {} scenes, {} resources",
        graph.script.objects().len(),
        graph.script.scenes().len(),
        graph.resources.len()
    );
    println!(
        "Dialogue: {} messages in {} groups",
        graph.messages.len(),
        graph.dialogues.len()
    );
    if let Some(start_scene) = graph.start_scene.as_deref() {
        println!("Start scene: {start_scene}");
    }

    if args.verbose {
        for scene in graph.script.scenes() {
            println!(
                "scene {id:>5}  {name:<32} {actions:>3} actions {refs:>3} refs",
                id = scene.id,
                name = scene.name,
                actions = scene.actions.len(),
                refs = scene.refs.len()
            );
        }
        for group in &graph.dialogues {
            println!("group {:>5}  {:>3} acts", group.id, group.acts.len());
        }
    }

    if let Some(path) = args.summary_json.as_ref() {
        let summary = LoadSummary {
            part,
            chapter,
            parts: engine.parts().parts(),
            start_scene: graph.start_scene.as_deref(),
            objects: graph.script.objects().len(),
            scenes: graph.script.scenes().len(),
            resources: graph.resources.len(),
            names: graph.names.len(),
            inventory: graph.inventory.len(),
            messages: graph.messages.len(),
            dialogue_groups: graph.dialogues.len(),
        };
        let json = serde_json::to_string_pretty(&summary)
            .context("serializing load summary to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing summary JSON to {}", path.display()))?;
        println!("Saved load summary JSON to {}", path.display());
    }

    Ok(())
}
