use encoding_rs::{Encoding, WINDOWS_1251};

/// Decoder for the single-byte encodings the game data ships in.
///
/// Retail discs use Windows-1251; localized releases swap in other code
/// pages, so the codec is chosen once per load and handed to every loader
/// that touches a text field.
#[derive(Debug, Clone, Copy)]
pub struct TextCodec {
    encoding: &'static Encoding,
}

impl TextCodec {
    pub fn new(encoding: &'static Encoding) -> Self {
        TextCodec { encoding }
    }

    /// Resolves a WHATWG encoding label such as `windows-1251` or `ibm866`.
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(TextCodec::new)
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _, _) = self.encoding.decode(bytes);
        text.into_owned()
    }

    /// Decodes a fixed-width field: the payload ends at the first NUL and
    /// surrounding whitespace is padding.
    pub fn decode_padded(&self, bytes: &[u8]) -> String {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.decode(&bytes[..end]).trim().to_string()
    }
}

impl Default for TextCodec {
    fn default() -> Self {
        TextCodec::new(WINDOWS_1251)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_cyrillic_names() {
        let codec = TextCodec::default();
        // "Чапаев" in Windows-1251.
        let bytes = [0xD7, 0xE0, 0xEF, 0xE0, 0xE5, 0xE2];
        assert_eq!(codec.decode(&bytes), "Чапаев");
    }

    #[test]
    fn padded_field_stops_at_nul() {
        let codec = TextCodec::default();
        assert_eq!(codec.decode_padded(b"INTRO.WAV\0\0\0"), "INTRO.WAV");
        assert_eq!(codec.decode_padded(b"SHORT.WAV   "), "SHORT.WAV");
    }

    #[test]
    fn resolves_labels() {
        assert!(TextCodec::for_label("windows-1251").is_some());
        assert!(TextCodec::for_label("no-such-encoding").is_none());
    }
}
