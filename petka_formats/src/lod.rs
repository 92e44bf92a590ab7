use serde::Serialize;

use crate::cursor::Cursor;
use crate::encoding::TextCodec;
use crate::error::FormatError;
use crate::script::ScriptGraph;

const FILE: &str = "DIALOGUE.LOD";

/// One voice-line record: the WAV it plays, the script object it belongs
/// to, and the caption shown while it plays.
///
/// `index` is the record's position in load order; dialogue operations
/// reference messages by this position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueMessage {
    pub index: u32,
    pub wav_name: String,
    pub object_id: u16,
    pub arg2: u32,
    pub arg3: u32,
    pub caption: String,
}

/// Decodes a DIALOGUE.LOD payload against an already-decoded script graph.
///
/// Layout: `{count: u32}` then `count` fixed 24-byte records
/// `{object_id: u32, wav: [u8; 12], arg2: u32, arg3: u32}`. The object id
/// must resolve in the script-object index. Whatever follows the records
/// is one NUL-delimited caption block assigned positionally: extra caption
/// segments are ignored, messages past the end of the block keep an empty
/// caption.
pub fn decode_messages(
    bytes: &[u8],
    graph: &ScriptGraph,
    codec: TextCodec,
) -> Result<Vec<DialogueMessage>, FormatError> {
    let mut cur = Cursor::new(bytes, FILE);
    let count = cur.read_u32()? as usize;

    let mut messages = Vec::with_capacity(count);
    for record in 0..count {
        cur.enter_record(record);
        let raw_object_id = cur.read_u32()?;
        let wav = cur.read_bytes(12)?;
        let arg2 = cur.read_u32()?;
        let arg3 = cur.read_u32()?;

        let object_id = u16::try_from(raw_object_id)
            .ok()
            .filter(|&id| graph.contains_object(id))
            .ok_or(FormatError::BadReference {
                file: FILE,
                record,
                kind: "object",
                id: raw_object_id,
            })?;

        messages.push(DialogueMessage {
            index: record as u32,
            wav_name: codec.decode_padded(wav),
            object_id,
            arg2,
            arg3,
            caption: String::new(),
        });
    }

    for (message, caption) in messages.iter_mut().zip(cur.remaining().split(|&b| b == 0)) {
        message.caption = codec.decode(caption);
    }

    Ok(messages)
}
