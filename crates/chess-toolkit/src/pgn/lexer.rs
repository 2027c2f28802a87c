//! PGN tokenizer.
//!
//! Reads one line at a time and hands out tokens with their 1-based line and
//! column. Comments (`{...}`, `;...`), `%` escape lines, NAGs (`$n`) and
//! variations (`(...)`, nested) never reach the caller.

use std::io::{self, BufRead};

use crate::tags::{is_valid_key, RESULTS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    TagPair { key: String, value: String },
    MoveNumber(u32),
    San(String),
    Result(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
    pub token: Token,
    /// Source text of the token.
    pub text: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
pub(crate) enum LexError {
    Syntax {
        line: usize,
        column: usize,
        token: String,
        reason: &'static str,
    },
    Io(io::Error),
}

impl From<io::Error> for LexError {
    fn from(err: io::Error) -> Self {
        LexError::Io(err)
    }
}

pub(crate) struct Lexer<R> {
    input: R,
    buffer: String,
    chars: Vec<char>,
    pos: usize,
    line: usize,
    in_comment: bool,
    variation_depth: usize,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(input: R) -> Self {
        Lexer {
            input,
            buffer: String::new(),
            chars: Vec::new(),
            pos: 0,
            line: 0,
            in_comment: false,
            variation_depth: 0,
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned>, LexError> {
        loop {
            if self.pos >= self.chars.len() {
                if !self.next_line()? {
                    return Ok(None);
                }
                continue;
            }

            let c = self.chars[self.pos];
            if self.in_comment {
                self.in_comment = c != '}';
                self.pos += 1;
                continue;
            }
            if self.variation_depth > 0 {
                match c {
                    '{' => self.in_comment = true,
                    '(' => self.variation_depth += 1,
                    ')' => self.variation_depth -= 1,
                    ';' => {
                        self.pos = self.chars.len();
                        continue;
                    }
                    _ => {}
                }
                self.pos += 1;
                continue;
            }

            match c {
                _ if c.is_whitespace() => self.pos += 1,
                '{' => {
                    self.in_comment = true;
                    self.pos += 1;
                }
                ';' => self.pos = self.chars.len(),
                '(' => {
                    self.variation_depth = 1;
                    self.pos += 1;
                }
                '[' => return self.tag_pair().map(Some),
                _ => {
                    if let Some(token) = self.symbol()? {
                        return Ok(Some(token));
                    }
                }
            }
        }
    }

    fn next_line(&mut self) -> io::Result<bool> {
        self.buffer.clear();
        if self.input.read_line(&mut self.buffer)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        self.chars.clear();
        self.chars
            .extend(self.buffer.trim_end_matches(['\n', '\r']).chars());
        // A '%' in the first column escapes the whole line.
        self.pos = if self.chars.first() == Some(&'%') {
            self.chars.len()
        } else {
            0
        };
        Ok(true)
    }

    fn syntax(&self, column: usize, token: String, reason: &'static str) -> LexError {
        LexError::Syntax {
            line: self.line,
            column,
            token,
            reason,
        }
    }

    /// `[Key "Value"]`, all on one line.
    fn tag_pair(&mut self) -> Result<Spanned, LexError> {
        let start = self.pos;
        let column = start + 1;
        let fail = |lexer: &mut Self, reason| {
            let token: String = lexer.chars[start..].iter().collect();
            lexer.pos = lexer.chars.len();
            Err(lexer.syntax(column, token.trim_end().to_string(), reason))
        };

        self.pos += 1;
        self.skip_spaces();
        let key_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || "_+#=:-".contains(c))
        {
            self.pos += 1;
        }
        let key: String = self.chars[key_start..self.pos].iter().collect();
        if !is_valid_key(&key) {
            return fail(self, "missing tag name");
        }

        self.skip_spaces();
        if self.peek() != Some('"') {
            return fail(self, "missing tag value");
        }
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return fail(self, "unterminated tag value"),
                Some('"') => break,
                Some('\\') if self.pos + 1 < self.chars.len() => {
                    value.push(self.chars[self.pos + 1]);
                    self.pos += 2;
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
        self.pos += 1;

        self.skip_spaces();
        if self.peek() != Some(']') {
            return fail(self, "missing closing bracket");
        }
        self.pos += 1;

        Ok(Spanned {
            token: Token::TagPair { key, value },
            text: self.chars[start..self.pos].iter().collect(),
            line: self.line,
            column,
        })
    }

    /// A move number, SAN or result. NAGs are consumed and yield `None`.
    fn symbol(&mut self) -> Result<Option<Spanned>, LexError> {
        let start = self.pos;
        let column = start + 1;
        while self.peek().is_some_and(|c| !is_delimiter(c)) {
            self.pos += 1;
        }
        if self.pos == start {
            self.pos += 1;
            let token = self.chars[start].to_string();
            return Err(self.syntax(column, token, "unexpected character"));
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let line = self.line;
        let spanned = move |token, text| Spanned {
            token,
            text,
            line,
            column,
        };

        if RESULTS.contains(&text.as_str()) {
            return Ok(Some(spanned(Token::Result(text.clone()), text)));
        }
        if let Some(digits) = text.strip_prefix('$') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return Ok(None);
            }
        }

        let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 && text[digits..].starts_with('.') {
            let dots = text[digits..].chars().take_while(|c| *c == '.').count();
            let number = text[..digits]
                .parse()
                .map_err(|_| self.syntax(column, text.clone(), "move number out of range"))?;
            // Anything glued to the number, as in "1.e4", is lexed next.
            self.pos = start + digits + dots;
            let consumed = text[..digits + dots].to_string();
            return Ok(Some(spanned(Token::MoveNumber(number), consumed)));
        }

        Ok(Some(spanned(Token::San(text.clone()), text)))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '[' | ']' | '{' | '}' | '(' | ')' | ';' | '"')
}
