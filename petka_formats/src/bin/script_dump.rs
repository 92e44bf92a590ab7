use std::env;
use std::fs;

use anyhow::{Context, Result};
use petka_formats::{ScriptGraph, TextCodec, opcode_name};

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: script_dump <SCRIPT.DAT file> [object id]")?;
    let bytes = fs::read(&path)?;
    let graph = ScriptGraph::decode(&bytes, TextCodec::default())?;

    if let Some(raw_id) = env::args().nth(2) {
        let id: u16 = raw_id
            .parse()
            .with_context(|| format!("parsing object id '{raw_id}'"))?;
        let object = graph
            .object(id)
            .with_context(|| format!("no object with id {id}"))?;
        println!("object {} {}", object.id, object.name);
        for action in &object.actions {
            println!(
                "  action {} cond {} arg {} ({} ops)",
                action.action_id,
                action.condition,
                action.arg,
                action.operations.len()
            );
            for op in &action.operations {
                println!(
                    "    {name:<12} {operands:?}",
                    name = opcode_name(op.opcode).unwrap_or("?"),
                    operands = op.operands
                );
            }
        }
        return Ok(());
    }

    println!(
        "{} objects, {} scenes in {}",
        graph.objects().len(),
        graph.scenes().len(),
        path
    );
    for object in graph.objects() {
        println!(
            "obj {id:>5}  {name:<32} {actions:>3} actions",
            id = object.id,
            name = object.name,
            actions = object.actions.len()
        );
    }
    for scene in graph.scenes() {
        println!(
            "scn {id:>5}  {name:<32} {actions:>3} actions",
            id = scene.id,
            name = scene.name,
            actions = scene.actions.len()
        );
    }
    Ok(())
}
