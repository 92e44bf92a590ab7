pub mod backgrnd;
pub mod cursor;
pub mod encoding;
pub mod error;
pub mod fix;
pub mod lod;
pub mod opcodes;
pub mod qrc;
pub mod script;

pub use backgrnd::link_scene_refs;
pub use encoding::TextCodec;
pub use error::FormatError;
pub use fix::{Dialogue, DialogueAct, DialogueGroup, DialogueOp, decode_dialogues};
pub use lod::{DialogueMessage, decode_messages};
pub use opcodes::{OpcodeInfo, opcode_info, opcode_name};
pub use qrc::ResourceIndex;
pub use script::{Action, RawOp, Scene, SceneRef, ScriptGraph, ScriptObject};
