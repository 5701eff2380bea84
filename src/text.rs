//! Char-indexed view over the master text.

/// Borrowed master text with a char-offset to byte-offset table.
///
/// Offsets used across the crate count chars, so any offset in
/// `0..=char_len()` is a valid slice point.
#[derive(Debug, Clone)]
pub struct MasterText<'a> {
    text: &'a str,
    byte_offsets: Vec<usize>, // byte index of each char, plus text.len() at the end
}

impl<'a> MasterText<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        byte_offsets.push(text.len());
        Self { text, byte_offsets }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.byte_offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of a char offset, clamped to the end of the text.
    pub fn byte_offset(&self, char_pos: usize) -> usize {
        self.byte_offsets[char_pos.min(self.char_len())]
    }

    /// Char offset of a byte offset that lies on a char boundary.
    ///
    /// Offsets inside a multi-byte char resolve to the char containing them.
    pub fn char_offset(&self, byte_pos: usize) -> usize {
        match self.byte_offsets.binary_search(&byte_pos) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Text between two char offsets. Out-of-range offsets are clamped.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let start = self.byte_offset(start);
        let end = self.byte_offset(end).max(start);
        &self.text[start..end]
    }

    /// Whether the text at char offset `pos` begins with `needle`.
    pub fn starts_with_at(&self, pos: usize, needle: &str) -> bool {
        if pos > self.char_len() {
            return false;
        }
        self.text[self.byte_offset(pos)..].starts_with(needle)
    }

    /// Char at `pos`, if any.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.char_len() {
            return None;
        }
        self.text[self.byte_offset(pos)..].chars().next()
    }
}
