/// Byte cursor over a SMILES line.
///
/// SMILES is ASCII; any other byte is reported as an unexpected character
/// by the caller, which can recover the full `char` through [`CharBuffer::char_at`].
#[derive(Debug, Clone)]
pub(crate) struct CharBuffer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> CharBuffer<'a> {
    pub fn new(text: &'a str) -> CharBuffer<'a> {
        CharBuffer { text, pos: 0 }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }

    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    pub fn get(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    pub fn next_is(&self, c: u8) -> bool {
        self.peek() == Some(c)
    }

    /// Consumes `c` if it is next.
    pub fn get_if(&mut self, c: u8) -> bool {
        if self.next_is(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn next_is_digit(&self) -> bool {
        self.peek().is_some_and(|c| c.is_ascii_digit())
    }

    /// Consumes a run of ASCII digits, possibly empty.
    pub fn digits(&mut self) -> &'a str {
        let start = self.pos;
        while self.next_is_digit() {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    /// The character starting at byte `pos`, decoding multi-byte input.
    pub fn char_at(&self, pos: usize) -> char {
        self.text
            .get(pos..)
            .and_then(|s| s.chars().next())
            .unwrap_or('\u{FFFD}')
    }

    /// Everything from the cursor on.
    pub fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_moves_over_digits() {
        let mut buf = CharBuffer::new("C12=O");
        assert_eq!(buf.get(), Some(b'C'));
        assert_eq!(buf.digits(), "12");
        assert!(buf.get_if(b'='));
        assert!(!buf.get_if(b'='));
        assert_eq!(buf.rest(), "O");
        assert_eq!(buf.get(), Some(b'O'));
        assert_eq!(buf.peek(), None);
        assert_eq!(buf.get(), None);
        assert_eq!(buf.digits(), "");
    }

    #[test]
    fn multibyte_characters_are_recovered() {
        let buf = CharBuffer::new("Cé");
        assert_eq!(buf.char_at(1), 'é');
    }
}
