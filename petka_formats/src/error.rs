use thiserror::Error;

/// Error conditions raised while decoding resource files.
///
/// Every variant names the file it came from; reference errors additionally
/// carry the offending numeric id so a corrupted or mismatched data set can
/// be diagnosed without a hex dump.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{file}: record {record}: buffer exhausted at offset {offset}")]
    Truncated {
        file: &'static str,
        record: usize,
        offset: usize,
    },
    #[error("{file}: {detail}")]
    Malformed { file: &'static str, detail: String },
    #[error("{file}: record {record} references unknown {kind} id {id:#06x}")]
    BadReference {
        file: &'static str,
        record: usize,
        kind: &'static str,
        id: u32,
    },
    #[error("{file}: duplicate {kind} id {id:#06x}")]
    DuplicateId {
        file: &'static str,
        kind: &'static str,
        id: u32,
    },
    #[error("{file}: dialogue start offset {offset} referenced more than once")]
    DuplicateStart { file: &'static str, offset: u32 },
}
