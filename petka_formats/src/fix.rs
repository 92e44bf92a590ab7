use std::collections::HashMap;

use serde::Serialize;

use crate::cursor::Cursor;
use crate::error::FormatError;
use crate::lod::DialogueMessage;
use crate::script::ScriptGraph;

const FILE: &str = "DIALOGUE.FIX";

/// One entry of the flat dialogue operation stream.
///
/// `message_ref` is kept raw: values past the end of the message list are
/// sentinel markers, not references, and must survive a reload unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DialogueOp {
    pub opcode: u8,
    pub arg: u8,
    pub message_ref: u16,
}

impl DialogueOp {
    /// The voice line this operation plays, when `message_ref` lands inside
    /// the message list.
    pub fn message<'a>(&self, messages: &'a [DialogueMessage]) -> Option<&'a DialogueMessage> {
        messages.get(usize::from(self.message_ref))
    }
}

/// An individual exchange: a run of operations spliced out of the flat
/// stream, keyed by where in that stream the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dialogue {
    pub start_offset: u32,
    pub arg1: u32,
    pub arg2: u32,
    pub operations: Vec<DialogueOp>,
}

/// A conversation act: which object speaks and the exchanges available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueAct {
    pub opcode: u16,
    pub object_id: u16,
    pub arg1: u32,
    pub arg2: u32,
    pub dialogues: Vec<Dialogue>,
}

/// A dialogue group, the top of the conversation-tree hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueGroup {
    pub id: u32,
    pub arg1: u32,
    pub acts: Vec<DialogueAct>,
}

/// Decodes a DIALOGUE.FIX payload against an already-decoded script graph.
///
/// The file has three sequential sections: the group table, the per-group
/// act and dialogue tables, and a flat operation stream that is
/// re-partitioned into per-dialogue runs. Each dialogue names the stream
/// position its run starts at; a position claimed twice is fatal, as is a
/// stream that begins before the first claimed position (there would be no
/// dialogue open to receive those operations).
pub fn decode_dialogues(
    bytes: &[u8],
    graph: &ScriptGraph,
) -> Result<Vec<DialogueGroup>, FormatError> {
    let mut cur = Cursor::new(bytes, FILE);

    let num_groups = cur.read_u32()? as usize;
    let mut groups = Vec::with_capacity(num_groups);
    let mut act_counts = Vec::with_capacity(num_groups);
    for record in 0..num_groups {
        cur.enter_record(record);
        let id = cur.read_u32()?;
        let num_acts = cur.read_u32()? as usize;
        let arg1 = cur.read_u32()?;
        groups.push(DialogueGroup {
            id,
            arg1,
            acts: Vec::with_capacity(num_acts),
        });
        act_counts.push(num_acts);
    }

    // Acts and dialogues interleave per group: all acts of a group, then
    // the dialogue rows for those acts, then the next group.
    let mut starts: HashMap<u32, (usize, usize, usize)> = HashMap::new();
    for (group_pos, num_acts) in act_counts.into_iter().enumerate() {
        cur.enter_record(group_pos);
        let mut dialogue_counts = Vec::with_capacity(num_acts);
        for _ in 0..num_acts {
            let opcode = cur.read_u16()?;
            let object_ref = cur.read_u16()?;
            let num_dialogues = cur.read_u32()? as usize;
            let arg1 = cur.read_u32()?;
            let arg2 = cur.read_u32()?;
            if !graph.contains_object(object_ref) {
                return Err(FormatError::BadReference {
                    file: FILE,
                    record: group_pos,
                    kind: "object",
                    id: u32::from(object_ref),
                });
            }
            groups[group_pos].acts.push(DialogueAct {
                opcode,
                object_id: object_ref,
                arg1,
                arg2,
                dialogues: Vec::with_capacity(num_dialogues),
            });
            dialogue_counts.push(num_dialogues);
        }
        for (act_pos, num_dialogues) in dialogue_counts.into_iter().enumerate() {
            for _ in 0..num_dialogues {
                let start_offset = cur.read_u32()?;
                let arg1 = cur.read_u32()?;
                let arg2 = cur.read_u32()?;
                let act = &mut groups[group_pos].acts[act_pos];
                let target = (group_pos, act_pos, act.dialogues.len());
                if starts.insert(start_offset, target).is_some() {
                    return Err(FormatError::DuplicateStart {
                        file: FILE,
                        offset: start_offset,
                    });
                }
                act.dialogues.push(Dialogue {
                    start_offset,
                    arg1,
                    arg2,
                    operations: Vec::new(),
                });
            }
        }
    }

    let num_ops = cur.read_u32()? as usize;
    let mut ops = Vec::with_capacity(num_ops);
    for record in 0..num_ops {
        cur.enter_record(record);
        let message_ref = cur.read_u16()?;
        let arg = cur.read_u8()?;
        let opcode = cur.read_u8()?;
        ops.push(DialogueOp {
            opcode,
            arg,
            message_ref,
        });
    }

    // Re-partition the stream: a position claimed as a start offset opens
    // that dialogue's run, and everything up to the next claimed position
    // belongs to it. The trailing run is flushed at end-of-stream.
    let mut open: Option<(usize, usize, usize)> = None;
    let mut run: Vec<DialogueOp> = Vec::new();
    for (position, op) in ops.into_iter().enumerate() {
        if let Some(&target) = starts.get(&(position as u32)) {
            if let Some((g, a, d)) = open.replace(target) {
                groups[g].acts[a].dialogues[d].operations = std::mem::take(&mut run);
            }
        }
        if open.is_none() {
            return Err(FormatError::Malformed {
                file: FILE,
                detail: format!("operation {position} precedes the first dialogue start offset"),
            });
        }
        run.push(op);
    }
    if let Some((g, a, d)) = open {
        groups[g].acts[a].dialogues[d].operations = run;
    }

    Ok(groups)
}
