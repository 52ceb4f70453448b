//! G-code word tokenizer
//!
//! Splits a line into `<letter><value>` words. Spaces between words are
//! optional, so `G1X20Y40F1300` and `G1 X20 Y40 F1300` yield the same
//! words. Anything after `;` is a comment and is ignored.

/// A single G-code word such as `X20.000`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    /// Upper-case address letter
    pub letter: char,
    /// Raw value text following the letter (may be empty)
    pub value: &'a str,
}

/// Iterator over the words of one line
///
/// Yields `Err(c)` for a character that cannot start a word.
pub struct Words<'a> {
    rest: &'a str,
}

impl<'a> Words<'a> {
    /// Tokenize a line, dropping any trailing comment
    pub fn new(line: &'a str) -> Self {
        let code = match line.split_once(';') {
            Some((code, _comment)) => code,
            None => line,
        };
        Self { rest: code }
    }
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-' || c == '+'
}

impl<'a> Iterator for Words<'a> {
    type Item = Result<Word<'a>, char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rest = self.rest.trim_start();
        let mut chars = self.rest.chars();
        let letter = chars.next()?;

        if !letter.is_ascii_alphabetic() {
            // Skip the offending character so iteration can't stall
            self.rest = chars.as_str();
            return Some(Err(letter));
        }

        let after = chars.as_str();
        let end = after.find(|c: char| !is_value_char(c)).unwrap_or(after.len());
        let (value, rest) = after.split_at(end);
        self.rest = rest;

        Some(Ok(Word {
            letter: letter.to_ascii_uppercase(),
            value,
        }))
    }
}
