//! Incremental UTF-8 assembly for the retrieval answer stream.
//!
//! The backend's `/rag` body arrives as arbitrary byte chunks, and chunk
//! boundaries may fall inside a multi-byte sequence. [`Utf8Assembler`]
//! decodes each chunk as far as it can, carries an incomplete trailing
//! sequence into the next chunk, and substitutes U+FFFD for bytes that can
//! never complete.

/// Stateful chunk-at-a-time UTF-8 decoder.
///
/// `decode` returns the maximal decodable text for each chunk; `finish`
/// flushes whatever is still pending at end of stream.
#[derive(Debug, Default)]
pub struct Utf8Assembler {
    /// Bytes of an incomplete trailing sequence from the previous chunk.
    pending: Vec<u8>,
}

impl Utf8Assembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, including any bytes held over from earlier
    /// chunks. Invalid sequences become U+FFFD; an incomplete sequence at
    /// the end of the chunk is held back for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.pending.clear();
                    return out;
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid_len]));

                    match err.error_len() {
                        // Bytes that can never start or continue a valid
                        // sequence: replace and keep scanning.
                        Some(bad_len) => {
                            out.push('\u{FFFD}');
                            self.pending.drain(..valid_len + bad_len);
                        }
                        // A sequence cut off by the chunk boundary: keep the
                        // tail and wait for the rest.
                        None => {
                            self.pending.drain(..valid_len);
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Flush the decoder at end of stream.
    ///
    /// A dangling partial sequence decodes to U+FFFD, matching what a
    /// streaming text decoder does on flush.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let out = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut asm = Utf8Assembler::new();
        assert_eq!(asm.decode(b"hello"), "hello");
        assert_eq!(asm.decode(b" world"), " world");
        assert_eq!(asm.finish(), "");
    }

    #[test]
    fn two_byte_sequence_split_across_chunks() {
        // "é" is 0xC3 0xA9.
        let mut asm = Utf8Assembler::new();
        assert_eq!(asm.decode(&[0x63, 0x61, 0x66, 0xC3]), "caf");
        assert_eq!(asm.decode(&[0xA9]), "é");
        assert_eq!(asm.finish(), "");
    }

    #[test]
    fn four_byte_sequence_split_one_byte_at_a_time() {
        // U+1F3AC (🎬) is F0 9F 8E AC.
        let bytes = "🎬".as_bytes();
        let mut asm = Utf8Assembler::new();
        let mut out = String::new();
        for b in bytes {
            out.push_str(&asm.decode(&[*b]));
        }
        assert_eq!(out, "🎬");
        assert_eq!(asm.finish(), "");
    }

    #[test]
    fn split_sequence_in_the_middle_of_a_chunk() {
        let text = "scène à suivre";
        let bytes = text.as_bytes();
        let mut asm = Utf8Assembler::new();
        let mut out = String::new();
        // Split right after the first byte of "è".
        let cut = text.find('è').unwrap() + 1;
        out.push_str(&asm.decode(&bytes[..cut]));
        out.push_str(&asm.decode(&bytes[cut..]));
        assert_eq!(out, text);
    }

    #[test]
    fn invalid_byte_becomes_replacement_char() {
        let mut asm = Utf8Assembler::new();
        assert_eq!(asm.decode(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn truncated_sequence_flushes_as_replacement_char() {
        let mut asm = Utf8Assembler::new();
        assert_eq!(asm.decode(&[b'x', 0xC3]), "x");
        assert_eq!(asm.finish(), "\u{FFFD}");
        // The assembler is reusable after a flush.
        assert_eq!(asm.decode("é".as_bytes()), "é");
    }

    #[test]
    fn empty_chunks_are_harmless() {
        let mut asm = Utf8Assembler::new();
        assert_eq!(asm.decode(&[]), "");
        assert_eq!(asm.decode(&[0xE2, 0x82]), "");
        assert_eq!(asm.decode(&[]), "");
        assert_eq!(asm.decode(&[0xAC]), "€");
    }
}
