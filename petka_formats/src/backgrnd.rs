use crate::cursor::Cursor;
use crate::error::FormatError;
use crate::script::{SceneRef, ScriptGraph};

const FILE: &str = "BACKGRND.BG";

/// Decodes a BACKGRND.BG payload and attaches the per-scene object
/// reference lists to an already-decoded script graph.
///
/// Layout: `{num_records: u32}`, each record `{scene_id: u16,
/// num_refs: u32}` followed by `num_refs` entries of `{object_id: u16,
/// 5 x u32}`. Both the scene id and every object id must already exist in
/// the graph; an unknown id aborts the link citing the id. A scene that
/// appears in a second record has its reference list replaced, not
/// extended.
pub fn link_scene_refs(graph: &mut ScriptGraph, bytes: &[u8]) -> Result<(), FormatError> {
    let mut cur = Cursor::new(bytes, FILE);
    let num_records = cur.read_u32()? as usize;
    for record in 0..num_records {
        cur.enter_record(record);
        let scene_id = cur.read_u16()?;
        let num_refs = cur.read_u32()? as usize;
        if !graph.contains_scene(scene_id) {
            return Err(FormatError::BadReference {
                file: FILE,
                record,
                kind: "scene",
                id: u32::from(scene_id),
            });
        }

        let mut refs = Vec::with_capacity(num_refs);
        for _ in 0..num_refs {
            let object_id = cur.read_u16()?;
            let mut ints = [0u32; 5];
            for slot in &mut ints {
                *slot = cur.read_u32()?;
            }
            if !graph.contains_object(object_id) {
                return Err(FormatError::BadReference {
                    file: FILE,
                    record,
                    kind: "object",
                    id: u32::from(object_id),
                });
            }
            refs.push(SceneRef { object_id, ints });
        }

        if let Some(scene) = graph.scene_mut(scene_id) {
            scene.refs = refs;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::TextCodec;
    use crate::script::test_support::{push_record, push_u16, push_u32};

    fn sample_graph() -> ScriptGraph {
        let mut buf = Vec::new();
        push_u32(&mut buf, 2);
        push_u32(&mut buf, 1);
        push_record(&mut buf, 10, "crowbar", &[]);
        push_record(&mut buf, 11, "door", &[]);
        push_record(&mut buf, 100, "village yard", &[]);
        ScriptGraph::decode(&buf, TextCodec::default()).unwrap()
    }

    fn push_ref(buf: &mut Vec<u8>, object_id: u16, ints: [u32; 5]) {
        push_u16(buf, object_id);
        for int in ints {
            push_u32(buf, int);
        }
    }

    #[test]
    fn attaches_refs_in_file_order() {
        let mut graph = sample_graph();
        let mut buf = Vec::new();
        push_u32(&mut buf, 1);
        push_u16(&mut buf, 100);
        push_u32(&mut buf, 2);
        push_ref(&mut buf, 11, [1, 2, 3, 4, 5]);
        push_ref(&mut buf, 10, [0, 0, 640, 480, 0]);

        link_scene_refs(&mut graph, &buf).unwrap();
        let yard = graph.scene(100).unwrap();
        assert_eq!(yard.refs.len(), 2);
        assert_eq!(yard.refs[0].object_id, 11);
        assert_eq!(yard.refs[0].ints, [1, 2, 3, 4, 5]);
        assert_eq!(yard.refs[1].object_id, 10);
    }

    #[test]
    fn unknown_scene_id_is_reported() {
        let mut graph = sample_graph();
        let mut buf = Vec::new();
        push_u32(&mut buf, 1);
        push_u16(&mut buf, 999);
        push_u32(&mut buf, 0);

        let err = link_scene_refs(&mut graph, &buf).unwrap_err();
        assert!(matches!(
            err,
            FormatError::BadReference {
                kind: "scene",
                id: 999,
                ..
            }
        ));
    }

    #[test]
    fn unknown_object_id_is_reported() {
        let mut graph = sample_graph();
        let mut buf = Vec::new();
        push_u32(&mut buf, 1);
        push_u16(&mut buf, 100);
        push_u32(&mut buf, 1);
        push_ref(&mut buf, 42, [0; 5]);

        let err = link_scene_refs(&mut graph, &buf).unwrap_err();
        assert!(matches!(
            err,
            FormatError::BadReference {
                kind: "object",
                id: 42,
                ..
            }
        ));
    }

    #[test]
    fn truncated_ref_entry_fails() {
        let mut graph = sample_graph();
        let mut buf = Vec::new();
        push_u32(&mut buf, 1);
        push_u16(&mut buf, 100);
        push_u32(&mut buf, 1);
        push_u16(&mut buf, 10);
        push_u32(&mut buf, 7);

        let err = link_scene_refs(&mut graph, &buf).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { .. }));
    }
}
