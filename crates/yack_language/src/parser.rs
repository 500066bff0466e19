//! Parser for the Yack dialog language.
//!
//! The parser pulls tokens lazily from a [`TokenReader`], skipping trivia,
//! and builds a [`CompilationUnit`] by recursive descent.

use std::collections::VecDeque;
use std::str::FromStr;

use log::warn;
use yack_foundation::{Error, Result};

use crate::ast::{CompilationUnit, Condition, Expression, Label, Statement};
use crate::lexer::TokenReader;
use crate::token::{Token, TokenKind};

/// Parser for Yack source code.
pub struct Parser<'src> {
    /// The reader providing tokens.
    reader: TokenReader<'src>,
    /// Significant tokens read ahead of the cursor.
    lookahead: VecDeque<Token>,
    /// Source text (for token text and error messages).
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            reader: TokenReader::new(source),
            lookahead: VecDeque::new(),
            source,
        }
    }

    /// Parses the whole source into a compilation unit.
    ///
    /// # Errors
    /// Returns an error on an unknown instruction or a statement that is too
    /// malformed to produce a node.
    pub fn parse(&mut self) -> Result<CompilationUnit> {
        let mut unit = CompilationUnit::new();

        loop {
            match self.peek_kind(0) {
                TokenKind::End => break,
                TokenKind::Colon if !unit.labels.is_empty() || self.at_label_start() => {
                    unit.labels.push(self.parse_label()?);
                }
                _ => self.skip_stray_line(),
            }
        }

        Ok(unit)
    }

    /// Returns true if the next tokens are `:` and a name on the same line.
    fn at_label_start(&mut self) -> bool {
        let colon = self.peek(0);
        let name = self.peek(1);
        colon.kind == TokenKind::Colon
            && name.kind == TokenKind::Identifier
            && self.same_line(colon, name)
    }

    /// Skips every token on the current line. Used before the first label.
    fn skip_stray_line(&mut self) {
        let first = self.advance();
        warn!(
            "skipping {:?} outside of any label at line {}",
            self.reader.line_text(first.start()).trim_end(),
            self.reader.line_of(first.start())
        );
        loop {
            let next = self.peek(0);
            if next.kind == TokenKind::End || !self.same_line(first, next) {
                break;
            }
            self.advance();
        }
    }

    /// Parses a label: `:name` and the statements up to the next label.
    fn parse_label(&mut self) -> Result<Label> {
        let colon = self.advance();
        let name = self.peek(0);
        if name.kind != TokenKind::Identifier || !self.same_line(colon, name) {
            return Err(self.error_at(colon, "expected label name after ':'"));
        }
        self.advance();

        let mut label = Label::new(name.text(self.source));
        while !matches!(self.peek_kind(0), TokenKind::Colon | TokenKind::End) {
            if let Some(statement) = self.parse_statement()? {
                label.statements.push(statement);
            }
        }

        Ok(label)
    }

    /// Parses one expression and the conditions trailing it.
    ///
    /// Returns `None` when the current token cannot start a statement; that
    /// token is skipped.
    fn parse_statement(&mut self) -> Result<Option<Statement>> {
        let Some(expression) = self.parse_expression()? else {
            return Ok(None);
        };

        let mut statement = Statement::new(expression);
        while self.peek_kind(0) == TokenKind::Condition {
            let token = self.advance();
            statement.conditions.push(self.parse_condition(token));
        }

        Ok(Some(statement))
    }

    /// Parses a `[...]` condition token.
    fn parse_condition(&self, token: Token) -> Condition {
        let text = token.text(self.source);
        let inner = text.strip_prefix('[').unwrap_or(text);
        let inner = inner.strip_suffix(']').unwrap_or(inner);
        Condition::from_text(inner, self.reader.line_of(token.start()))
    }

    fn parse_expression(&mut self) -> Result<Option<Expression>> {
        if self.matches(&[TokenKind::Identifier, TokenKind::Colon]) {
            let (actor, colon, text) = (self.peek(0), self.peek(1), self.peek(2));
            if self.same_line(actor, colon) {
                if text.kind != TokenKind::String || !self.same_line(colon, text) {
                    return Err(self.error_at(colon, "expected text after ':'"));
                }
                return Ok(Some(self.parse_say()));
            }
        }

        let expression = match self.peek_kind(0) {
            TokenKind::WaitWhile => {
                let token = self.advance();
                let text = token.text(self.source);
                let condition = text.strip_prefix("waitwhile").unwrap_or(text).trim();
                Expression::WaitWhile {
                    condition: condition.to_string(),
                }
            }
            TokenKind::Identifier => self.parse_instruction()?,
            TokenKind::Goto => {
                let arrow = self.peek(0);
                Expression::Goto {
                    name: self.parse_goto(arrow)?,
                }
            }
            TokenKind::Number => self.parse_choice()?,
            TokenKind::Code => {
                let token = self.advance();
                let text = token.text(self.source);
                let code = text.strip_prefix('!').unwrap_or(text).trim_end();
                Expression::Code {
                    code: code.to_string(),
                }
            }
            _ => {
                let token = self.advance();
                warn!(
                    "skipping unexpected {} {:?} at line {}",
                    token.kind.name(),
                    token.text(self.source),
                    self.reader.line_of(token.start())
                );
                return Ok(None);
            }
        };

        Ok(Some(expression))
    }

    /// Parses `actor: "text"`.
    fn parse_say(&mut self) -> Expression {
        let actor = self.advance();
        self.advance();
        let text = self.advance();
        Expression::Say {
            actor: actor.text(self.source).to_string(),
            text: unquote(text.text(self.source)).to_string(),
        }
    }

    /// Parses an instruction keyword and its argument.
    fn parse_instruction(&mut self) -> Result<Expression> {
        let token = self.advance();
        let name = token.text(self.source);
        let line = self.reader.line_of(token.start());

        let expression = match name {
            "shutup" => Expression::Shutup,
            "pause" => Expression::Pause {
                seconds: self.expect_number(token, "expected duration after 'pause'")?,
            },
            "waitfor" => Expression::WaitFor {
                actor: self.argument(line).unwrap_or_default().to_string(),
            },
            "parrot" => Expression::Parrot {
                active: self.argument(line).is_none_or(|word| word == "yes"),
            },
            "dialog" => Expression::Dialog {
                actor: self.argument(line).unwrap_or_default().to_string(),
            },
            "override" => Expression::Override {
                node: self.argument(line).unwrap_or_default().to_string(),
            },
            "allowobjects" => Expression::AllowObjects {
                allow: self.argument(line).is_none_or(|word| word == "YES"),
            },
            "limit" => Expression::Limit {
                max: self.expect_number(token, "expected number after 'limit'")?,
            },
            _ => return Err(Error::unknown_instruction(name, line)),
        };

        Ok(expression)
    }

    /// Parses `N "text" -> label` or `N $id -> label`.
    fn parse_choice(&mut self) -> Result<Expression> {
        let number_token = self.advance();
        let line = self.reader.line_of(number_token.start());
        let number = number_token
            .text(self.source)
            .parse::<i32>()
            .map_err(|_| self.error_at(number_token, "invalid choice number"))?;

        if self.next_on_line(line) == Some(TokenKind::Colon) {
            self.advance();
        }

        let text = match self.next_on_line(line) {
            Some(TokenKind::String) => unquote(self.advance().text(self.source)).to_string(),
            Some(TokenKind::Dollar) => self.advance().text(self.source).to_string(),
            _ => return Err(self.error_at(number_token, "expected choice text")),
        };

        let goto = self.parse_goto(number_token)?;
        Ok(Expression::Choice { number, text, goto })
    }

    /// Parses `-> label` on the line of `anchor`, returning the label name.
    fn parse_goto(&mut self, anchor: Token) -> Result<String> {
        let line = self.reader.line_of(anchor.start());
        if self.next_on_line(line) != Some(TokenKind::Goto) {
            return Err(self.error_at(anchor, "expected '->'"));
        }
        self.advance();

        if self.next_on_line(line) != Some(TokenKind::Identifier) {
            return Err(self.error_at(anchor, "expected label name after '->'"));
        }
        Ok(self.advance().text(self.source).to_string())
    }

    /// Consumes an identifier argument if one follows on the same line.
    fn argument(&mut self, line: u32) -> Option<&'src str> {
        if self.next_on_line(line) == Some(TokenKind::Identifier) {
            Some(self.advance().text(self.source))
        } else {
            None
        }
    }

    /// Consumes a number argument on the keyword's line, failing when absent or malformed.
    fn expect_number<T: FromStr>(&mut self, keyword: Token, message: &str) -> Result<T> {
        let line = self.reader.line_of(keyword.start());
        let token = self.peek(0);
        if self.next_on_line(line) != Some(TokenKind::Number) {
            return Err(self.error_at(keyword, message));
        }
        self.advance();
        token
            .text(self.source)
            .parse()
            .map_err(|_| self.error_at(token, message))
    }

    /// Returns true if the next tokens have exactly the given kinds.
    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        kinds
            .iter()
            .enumerate()
            .all(|(i, kind)| self.peek_kind(i) == *kind)
    }

    /// Returns the kind of the next token if it starts on the given line.
    fn next_on_line(&mut self, line: u32) -> Option<TokenKind> {
        let token = self.peek(0);
        (token.kind != TokenKind::End && self.reader.line_of(token.start()) == line)
            .then_some(token.kind)
    }

    fn same_line(&self, a: Token, b: Token) -> bool {
        self.reader.line_of(a.start()) == self.reader.line_of(b.start())
    }

    fn peek_kind(&mut self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    /// Returns the `n`th significant token ahead without consuming it.
    fn peek(&mut self, n: usize) -> Token {
        while self.lookahead.len() <= n {
            let token = self.next_significant();
            self.lookahead.push_back(token);
        }
        self.lookahead[n]
    }

    /// Consumes and returns the next significant token.
    fn advance(&mut self) -> Token {
        self.peek(0);
        self.lookahead
            .pop_front()
            .unwrap_or_else(|| self.next_significant())
    }

    fn next_significant(&mut self) -> Token {
        loop {
            let token = self.reader.next_token();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }

    /// Creates a parse error pointing at a token.
    fn error_at(&self, token: Token, message: &str) -> Error {
        Error::parse(
            message,
            self.reader.line_of(token.start()),
            self.reader.column_of(token.start()),
            self.reader.line_text(token.start()).to_string(),
        )
    }
}

/// Strips the surrounding quotes of a string token.
fn unquote(text: &str) -> &str {
    let inner = text.strip_prefix('"').unwrap_or(text);
    inner.strip_suffix('"').unwrap_or(inner)
}

/// Parses dialog source into a compilation unit.
///
/// # Errors
/// Returns an error if the source contains an unknown instruction or a
/// malformed statement.
pub fn parse(source: &str) -> Result<CompilationUnit> {
    Parser::new(source).parse()
}
