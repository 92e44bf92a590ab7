use indexmap::IndexMap;
use serde::Serialize;

use crate::encoding::TextCodec;
use crate::error::FormatError;

const FILE: &str = "RESOURCE.QRC";

/// Ordered id-to-filename table from a RESOURCE.QRC listing.
///
/// Consumers display entries in file order, not numeric order, so the
/// table keeps both: `entries` maps ids to their latest value in
/// first-insertion order, and `encounter_order` records every id as it
/// appeared, repeats included.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIndex {
    entries: IndexMap<u32, String>,
    encounter_order: Vec<u32>,
}

impl ResourceIndex {
    /// Parses the line-oriented `id=value` listing.
    ///
    /// Lines are split on the first `=`; a single leading `=` in the value
    /// is an escape for values that contain `=` themselves and is stripped
    /// once. Blank lines and lines without a separator are skipped; an id
    /// that is not a base-10 integer is a malformed-data error.
    pub fn parse(bytes: &[u8], codec: TextCodec) -> Result<Self, FormatError> {
        let text = codec.decode(bytes);
        let mut index = ResourceIndex::default();
        for (line_no, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, rest)) = line.split_once('=') else {
                continue;
            };
            let mut value = rest.trim();
            if let Some(escaped) = value.strip_prefix('=') {
                value = escaped.trim();
            }
            let id: u32 = key.trim().parse().map_err(|_| FormatError::Malformed {
                file: FILE,
                detail: format!("line {}: invalid resource id {:?}", line_no + 1, key.trim()),
            })?;
            index.entries.insert(id, value.to_string());
            index.encounter_order.push(id);
        }
        Ok(index)
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    /// Entries in first-insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(&id, value)| (id, value.as_str()))
    }

    /// Every id as encountered in the file, repeats included.
    pub fn encounter_order(&self) -> &[u32] {
        &self.encounter_order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
