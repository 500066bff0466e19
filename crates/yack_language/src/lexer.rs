//! Lexer for the Yack dialog language.
//!
//! The [`TokenReader`] converts a source buffer into a lazy, restartable
//! stream of classified tokens. Trivia (whitespace, newlines, comments and
//! unrecognized characters) is produced like any other token; the parser
//! decides what to skip.
//!
//! The reader works on bytes. Every delimiter in the language is ASCII, so
//! token boundaries always fall on UTF-8 character boundaries.

use log::warn;

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for Yack source code.
pub struct TokenReader<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// The same source, as bytes.
    bytes: &'src [u8],
    /// Current byte offset in source.
    position: usize,
    /// Byte offsets of every line start seen so far. Always starts with 0.
    line_starts: Vec<usize>,
    /// Furthest offset scanned, which bounds what `line_starts` covers.
    scanned: usize,
    /// Whether the iterator already yielded `End`.
    finished: bool,
}

impl<'src> TokenReader<'src> {
    /// Creates a new reader for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            position: 0,
            line_starts: vec![0],
            scanned: 0,
            finished: false,
        }
    }

    /// Returns the source this reader tokenizes.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// Restarts tokenization from the beginning of the source.
    ///
    /// The line index built so far is kept.
    pub fn reset(&mut self) {
        self.position = 0;
        self.finished = false;
    }

    /// Returns the next token from the source, trivia included.
    ///
    /// Once the end of input is reached every further call returns `End`.
    pub fn next_token(&mut self) -> Token {
        let start = self.position;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::End, Span::empty(start));
        };

        let kind = match c {
            0 => return Token::new(TokenKind::End, Span::empty(start)),
            b'\n' => {
                self.bump();
                TokenKind::NewLine
            }
            b' ' | b'\t' | b'\r' => {
                while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
                    self.bump();
                }
                TokenKind::Whitespace
            }
            b'!' => {
                self.bump();
                self.scan_code();
                TokenKind::Code
            }
            b':' => {
                self.bump();
                TokenKind::Colon
            }
            b'$' => self.scan_dollar(),
            b'[' => self.scan_condition(),
            b'"' => self.scan_string(),
            b'#' | b';' => self.scan_comment(),
            b'-' if self.peek_n(1) == Some(b'>') => {
                self.bump();
                self.bump();
                TokenKind::Goto
            }
            b'-' | b'0'..=b'9' => self.scan_number(),
            c if c.is_ascii_alphabetic() => self.scan_identifier(),
            _ => {
                self.bump_char();
                let text = &self.source[start..self.position];
                warn!(
                    "unexpected character {text:?} at line {}",
                    self.line_of(start)
                );
                TokenKind::None
            }
        };

        Token::new(kind, Span::new(start, self.position))
    }

    /// Tokenizes all source and returns a vector of tokens, `End` included.
    ///
    /// Trivia is included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        TokenReader::new(source).collect()
    }

    /// Returns the 1-based line number containing the given byte offset.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> u32 {
        let indexed = self.line_starts.partition_point(|&start| start <= offset);
        // Offsets past the scanned region still count their newlines.
        let unscanned = if offset > self.scanned {
            let end = offset.min(self.bytes.len());
            self.bytes[self.scanned.min(end)..end]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
        } else {
            0
        };
        u32::try_from(indexed + unscanned).unwrap_or(u32::MAX)
    }

    /// Returns the 1-based column of the given byte offset.
    #[must_use]
    pub fn column_of(&self, offset: usize) -> u32 {
        let offset = offset.min(self.bytes.len());
        let line_start = self.bytes[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let column = self.source[line_start..offset].chars().count() + 1;
        u32::try_from(column).unwrap_or(u32::MAX)
    }

    /// Returns the full text of the line containing the given byte offset.
    #[must_use]
    pub fn line_text(&self, offset: usize) -> &'src str {
        let offset = offset.min(self.bytes.len());
        let start = self.bytes[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let end = self.bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |i| offset + i);
        &self.source[start..end]
    }

    /// Peeks at the next byte without consuming it.
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    /// Peeks `n` bytes ahead.
    fn peek_n(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.position + n).copied()
    }

    /// Advances past the next byte, indexing line starts.
    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.position += 1;
            if self.position > self.scanned {
                self.scanned = self.position;
                if c == b'\n' {
                    self.line_starts.push(self.position);
                }
            }
        }
    }

    /// Advances past one whole UTF-8 character.
    fn bump_char(&mut self) {
        let len = self.source[self.position..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        for _ in 0..len {
            self.bump();
        }
    }

    /// Scans the body of a code run, up to end of line.
    ///
    /// A space followed by `[` and a non-space ends the run early, leaving
    /// the `[` for the condition that follows.
    fn scan_code(&mut self) {
        let mut previous = 0u8;
        while let Some(c) = self.peek() {
            if c == b'\n' || c == 0 {
                break;
            }
            self.bump();
            if previous == b' ' && c == b'[' && self.peek() != Some(b' ') {
                self.position -= 1;
                break;
            }
            previous = c;
        }
    }

    /// Scans a text id starting with `$`.
    fn scan_dollar(&mut self) -> TokenKind {
        self.bump();
        while let Some(c) = self.peek() {
            if matches!(c, b'[' | b' ' | b'\n' | 0) {
                break;
            }
            self.bump();
        }
        TokenKind::Dollar
    }

    /// Scans a bracketed condition, closing bracket included.
    fn scan_condition(&mut self) -> TokenKind {
        self.bump();
        while let Some(c) = self.peek() {
            self.bump();
            if c == b']' {
                break;
            }
        }
        TokenKind::Condition
    }

    /// Scans a quoted string. No escape processing.
    fn scan_string(&mut self) -> TokenKind {
        self.bump();
        while let Some(c) = self.peek() {
            self.bump();
            if c == b'"' {
                break;
            }
        }
        TokenKind::String
    }

    /// Scans a comment up to, not including, the newline.
    fn scan_comment(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if c == b'\n' {
                break;
            }
            self.bump();
        }
        TokenKind::Comment
    }

    /// Scans a number like `3`, `-1` or `0.25`.
    fn scan_number(&mut self) -> TokenKind {
        if self.peek() == Some(b'-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some(b'.') && self.peek_n(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        TokenKind::Number
    }

    /// Scans an identifier. `waitwhile` swallows the code run after it.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.bump();
        }
        if &self.source[start..self.position] == "waitwhile" {
            self.scan_code();
            TokenKind::WaitWhile
        } else {
            TokenKind::Identifier
        }
    }
}

impl Iterator for TokenReader<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::End {
            self.finished = true;
        }
        Some(token)
    }
}
