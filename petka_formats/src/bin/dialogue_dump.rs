use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use petka_formats::{
    DialogueGroup, DialogueMessage, ScriptGraph, TextCodec, decode_dialogues, decode_messages,
};
use serde::Serialize;

/// Inspect the dialogue tables of a game part.
#[derive(Parser)]
struct Args {
    /// Path to SCRIPT.DAT (provides the object index references resolve against)
    script: PathBuf,

    /// Path to DIALOGUE.LOD
    lod: PathBuf,

    /// Path to DIALOGUE.FIX
    fix: Option<PathBuf>,

    /// Text encoding label for names and captions
    #[arg(long, default_value = "windows-1251")]
    encoding: String,

    /// Emit the loaded tables as JSON instead of a listing
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct DialogueDump<'a> {
    messages: &'a [DialogueMessage],
    groups: &'a [DialogueGroup],
}

fn main() -> Result<()> {
    let args = Args::parse();
    let codec = TextCodec::for_label(&args.encoding)
        .with_context(|| format!("unknown encoding label '{}'", args.encoding))?;

    let script_bytes = fs::read(&args.script)?;
    let graph = ScriptGraph::decode(&script_bytes, codec)?;

    let lod_bytes = fs::read(&args.lod)?;
    let messages = decode_messages(&lod_bytes, &graph, codec)?;

    let groups = match args.fix.as_ref() {
        Some(path) => {
            let fix_bytes = fs::read(path)?;
            decode_dialogues(&fix_bytes, &graph)?
        }
        None => Vec::new(),
    };

    if args.json {
        let dump = DialogueDump {
            messages: &messages,
            groups: &groups,
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    println!("{} messages", messages.len());
    for message in &messages {
        let speaker = graph
            .object(message.object_id)
            .map(|object| object.name.as_str())
            .unwrap_or("?");
        println!(
            "{index:>5}  {wav:<12} {speaker:<24} {caption}",
            index = message.index,
            wav = message.wav_name,
            speaker = speaker,
            caption = message.caption
        );
    }

    println!("{} dialogue groups", groups.len());
    for group in &groups {
        println!("group {} ({} acts)", group.id, group.acts.len());
        for act in &group.acts {
            let speaker = graph
                .object(act.object_id)
                .map(|object| object.name.as_str())
                .unwrap_or("?");
            println!(
                "  act op {} obj {} ({speaker}), {} dialogues",
                act.opcode,
                act.object_id,
                act.dialogues.len()
            );
            for dialogue in &act.dialogues {
                println!(
                    "    start {:>5}  {:>3} ops",
                    dialogue.start_offset,
                    dialogue.operations.len()
                );
                for op in &dialogue.operations {
                    let caption = op
                        .message(&messages)
                        .map(|message| message.caption.as_str())
                        .unwrap_or("-");
                    println!(
                        "      op {:>3} arg {:>3} msg {:>5}  {caption}",
                        op.opcode, op.arg, op.message_ref
                    );
                }
            }
        }
    }
    Ok(())
}
