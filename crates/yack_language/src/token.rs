//! Token types for the Yack dialog language.
//!
//! Tokens are the output of the [`TokenReader`](crate::lexer::TokenReader)
//! and input to the parser. A token only records its kind and byte range;
//! its text is always read back from the source.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// The classification of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }

    /// Byte offset where the token starts.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.span.start
    }

    /// Byte offset where the token ends (exclusive).
    #[must_use]
    pub const fn end(&self) -> usize {
        self.span.end
    }
}

/// Token classes of the Yack dialog language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bare word like `guybrush` or `shutup`
    Identifier,
    /// Number like `1`, `-3` or `0.5`
    Number,
    /// Quoted text like `"Hello"`
    String,
    /// `:`
    Colon,
    /// Text id like `$30021`
    Dollar,
    /// `->`
    Goto,
    /// Bracketed condition like `[once]`
    Condition,
    /// Inline host code like `!g.talked = YES`
    Code,
    /// `waitwhile` together with the code that follows it
    WaitWhile,
    /// `#` or `;` comment running to end of line
    Comment,
    /// `\n`
    NewLine,
    /// Run of spaces, tabs or carriage returns
    Whitespace,
    /// Unrecognized character
    None,
    /// End of input
    End,
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::Comment | Self::NewLine | Self::Whitespace | Self::None
        )
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::String => "string",
            Self::Colon => "':'",
            Self::Dollar => "text id",
            Self::Goto => "'->'",
            Self::Condition => "condition",
            Self::Code => "code",
            Self::WaitWhile => "waitwhile",
            Self::Comment => "comment",
            Self::NewLine => "newline",
            Self::Whitespace => "whitespace",
            Self::None => "unknown character",
            Self::End => "end of input",
        }
    }
}
