use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::cursor::Cursor;
use crate::encoding::TextCodec;
use crate::error::FormatError;

const FILE: &str = "SCRIPT.DAT";

/// One opcode plus its four operands, kept uninterpreted.
///
/// Operand meaning depends on the opcode and is left to an interpreter
/// layer; the loader's only contract is that the five fields survive a
/// reload unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawOp {
    pub opcode: u16,
    pub operands: [u16; 4],
}

/// A named, conditioned sequence of operations attached to an object or
/// scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub action_id: u16,
    pub condition: u8,
    pub arg: u16,
    pub operations: Vec<RawOp>,
}

/// An interactive entity (item, character, prop) with named actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptObject {
    pub id: u16,
    pub name: String,
    pub actions: Vec<Action>,
}

/// One object reference attached to a scene, with its five auxiliary
/// integers (placement and state data the loader does not interpret).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SceneRef {
    pub object_id: u16,
    pub ints: [u32; 5],
}

/// A room/location entity. `refs` stays empty until the scene reference
/// table has been linked on top of the script graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    pub id: u16,
    pub name: String,
    pub actions: Vec<Action>,
    pub refs: Vec<SceneRef>,
}

/// The decoded script table: objects and scenes in file order, with
/// id-keyed indexes for O(1) reference resolution by the later loaders.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScriptGraph {
    objects: Vec<ScriptObject>,
    scenes: Vec<Scene>,
    #[serde(skip)]
    object_index: HashMap<u16, usize>,
    #[serde(skip)]
    scene_index: HashMap<u16, usize>,
}

impl ScriptGraph {
    /// Decodes a SCRIPT.DAT payload.
    ///
    /// Layout: `{num_objects: u32, num_scenes: u32}`, then that many
    /// object records followed by that many scene records, all of the same
    /// shape: `{id: u16, name_len: u32, name, num_actions: u32, actions}`.
    pub fn decode(bytes: &[u8], codec: TextCodec) -> Result<Self, FormatError> {
        let mut cur = Cursor::new(bytes, FILE);
        let num_objects = cur.read_u32()? as usize;
        let num_scenes = cur.read_u32()? as usize;

        let mut graph = ScriptGraph::default();
        for record in 0..num_objects {
            cur.enter_record(record);
            let (id, name, actions) = read_record(&mut cur, codec)?;
            graph.insert_object(ScriptObject { id, name, actions })?;
        }
        for record in 0..num_scenes {
            cur.enter_record(num_objects + record);
            let (id, name, actions) = read_record(&mut cur, codec)?;
            graph.insert_scene(Scene {
                id,
                name,
                actions,
                refs: Vec::new(),
            })?;
        }
        Ok(graph)
    }

    fn insert_object(&mut self, object: ScriptObject) -> Result<(), FormatError> {
        match self.object_index.entry(object.id) {
            Entry::Occupied(_) => Err(FormatError::DuplicateId {
                file: FILE,
                kind: "object",
                id: u32::from(object.id),
            }),
            Entry::Vacant(slot) => {
                slot.insert(self.objects.len());
                self.objects.push(object);
                Ok(())
            }
        }
    }

    fn insert_scene(&mut self, scene: Scene) -> Result<(), FormatError> {
        match self.scene_index.entry(scene.id) {
            Entry::Occupied(_) => Err(FormatError::DuplicateId {
                file: FILE,
                kind: "scene",
                id: u32::from(scene.id),
            }),
            Entry::Vacant(slot) => {
                slot.insert(self.scenes.len());
                self.scenes.push(scene);
                Ok(())
            }
        }
    }

    pub fn objects(&self) -> &[ScriptObject] {
        &self.objects
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn object(&self, id: u16) -> Option<&ScriptObject> {
        self.object_index.get(&id).map(|&pos| &self.objects[pos])
    }

    pub fn scene(&self, id: u16) -> Option<&Scene> {
        self.scene_index.get(&id).map(|&pos| &self.scenes[pos])
    }

    pub fn contains_object(&self, id: u16) -> bool {
        self.object_index.contains_key(&id)
    }

    pub fn contains_scene(&self, id: u16) -> bool {
        self.scene_index.contains_key(&id)
    }

    pub(crate) fn scene_mut(&mut self, id: u16) -> Option<&mut Scene> {
        let pos = *self.scene_index.get(&id)?;
        Some(&mut self.scenes[pos])
    }
}

fn read_record(
    cur: &mut Cursor<'_>,
    codec: TextCodec,
) -> Result<(u16, String, Vec<Action>), FormatError> {
    let id = cur.read_u16()?;
    let name_len = cur.read_u32()? as usize;
    let name = cur.read_str(name_len, codec)?;
    let num_actions = cur.read_u32()? as usize;
    let mut actions = Vec::with_capacity(num_actions);
    for _ in 0..num_actions {
        let action_id = cur.read_u16()?;
        let condition = cur.read_u8()?;
        let arg = cur.read_u16()?;
        let num_ops = cur.read_u32()? as usize;
        let mut operations = Vec::with_capacity(num_ops);
        for _ in 0..num_ops {
            let opcode = cur.read_u16()?;
            let operands = [
                cur.read_u16()?,
                cur.read_u16()?,
                cur.read_u16()?,
                cur.read_u16()?,
            ];
            operations.push(RawOp { opcode, operands });
        }
        actions.push(Action {
            action_id,
            condition,
            arg,
            operations,
        });
    }
    Ok((id, name, actions))
}
