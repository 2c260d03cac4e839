//! Byte-level pre-tokenization: words become sequences of printable byte glyphs.

use std::sync::OnceLock;

use super::piece::TokenPiece;
use super::vocab::Vocabulary;

/// Glyph prepended to the first piece of every word that follows whitespace.
///
/// This is the glyph assigned to the space byte (0x20) by the byte table.
pub const WORD_BOUNDARY_MARKER: char = '\u{0120}';

static BYTE_GLYPHS: OnceLock<[char; 256]> = OnceLock::new();

/// Builds the GPT-2 byte-to-unicode table.
///
/// Printable Latin-1 bytes map to themselves; the remaining 68 bytes are projected, in
/// ascending byte order, onto code points starting at U+0100 so that every byte has a
/// visible, distinct glyph.
fn build_byte_glyphs() -> [char; 256] {
    let printable = |b: u8| matches!(b, 33..=126 | 161..=172 | 174..=255);
    let mut glyphs = ['\0'; 256];
    let mut shifted: u32 = 0;
    for byte in 0u8..=255 {
        glyphs[byte as usize] = if printable(byte) {
            char::from(byte)
        } else {
            let glyph = char::from_u32(256 + shifted).unwrap_or(char::REPLACEMENT_CHARACTER);
            shifted += 1;
            glyph
        };
    }
    glyphs
}

/// Returns the visible glyph standing in for `byte`.
pub fn byte_to_glyph(byte: u8) -> char {
    BYTE_GLYPHS.get_or_init(build_byte_glyphs)[byte as usize]
}

/// A maximal run of non-whitespace input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    /// Only the first word of the whole input is encoded without the boundary marker.
    pub is_first: bool,
}

impl<'a> Word<'a> {
    pub fn new(text: &'a str, is_first: bool) -> Self {
        Word { text, is_first }
    }
}

/// Produces the initial piece sequence for one word.
#[derive(Debug, Clone, Copy)]
pub struct ByteLevelEncoder<'v> {
    vocab: &'v Vocabulary,
}

impl<'v> ByteLevelEncoder<'v> {
    pub fn new(vocab: &'v Vocabulary) -> Self {
        ByteLevelEncoder { vocab }
    }

    /// Encodes `word` as either a single whole-word piece or one piece per UTF-8 byte.
    ///
    /// Whole-word lookups are tried first: the marker-prefixed word (or the bare word for
    /// the first word), then the bare word. Otherwise each byte becomes its glyph and, for
    /// words after the first, the marker is fused onto the first glyph.
    pub fn encode_word(&self, word: Word<'_>) -> Vec<TokenPiece> {
        if word.text.is_empty() {
            return Vec::new();
        }

        if !word.is_first {
            let marked = format!("{WORD_BOUNDARY_MARKER}{}", word.text);
            if let Some(piece) = self.vocab.piece(&marked) {
                return vec![piece.clone()];
            }
        }
        if let Some(piece) = self.vocab.piece(word.text) {
            return vec![piece.clone()];
        }

        let mut pieces = Vec::with_capacity(word.text.len());
        let mut glyph = String::with_capacity(2 * WORD_BOUNDARY_MARKER.len_utf8());
        for (idx, byte) in word.text.bytes().enumerate() {
            glyph.clear();
            if idx == 0 && !word.is_first {
                glyph.push(WORD_BOUNDARY_MARKER);
            }
            glyph.push(byte_to_glyph(byte));
            pieces.push(self.vocab.intern(&glyph));
        }
        pieces
    }
}
