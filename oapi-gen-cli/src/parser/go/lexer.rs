//! Tokenizer for Go source files.
//!
//! Produces the token stream the declaration parser needs, with Go's
//! automatic semicolon insertion applied. Comments are not tokens; they are
//! collected into a side list so doc comments can be attached by line.

use super::SyntaxError;

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Integer, float or imaginary literal.
    Number,
    /// Rune literal.
    Char,
    /// Interpreted or raw string literal. `value` holds the decoded content.
    String,
    /// Operator or delimiter.
    Punct,
    /// Explicit `;` or one inserted at a line end.
    Semicolon,
    /// End of input.
    Eof,
}

/// A lexical token with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,

    /// Source text of the token.
    pub text: String,

    /// Decoded value of string literals; the source text otherwise.
    pub value: String,

    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Check if this is the given identifier or keyword.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    /// Check if this is the given operator or delimiter.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }
}

/// A `//` or `/* */` comment with markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Lexer output.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

const PUNCT_3: &[&str] = &["<<=", ">>=", "&^=", "..."];

const PUNCT_2: &[&str] = &[
    "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "<<", ">>", "&^",
];

const PUNCT_1: &str = "+-*/%&|^<>=!()[]{},;.:~";

/// Tokenize a Go source file.
pub fn tokenize(source: &str) -> Result<Lexed, SyntaxError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    out: Lexed,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            out: Lexed::default(),
        }
    }

    fn run(mut self) -> Result<Lexed, SyntaxError> {
        while let Some(c) = self.peek(0) {
            match c {
                '\n' => {
                    self.insert_semicolon();
                    self.bump();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek(1) == Some('/') => self.line_comment(),
                '/' if self.peek(1) == Some('*') => self.block_comment()?,
                c if is_ident_start(c) => self.ident(),
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek(1).is_some_and(|next| next.is_ascii_digit()) => self.number(),
                '"' => self.interpreted_string()?,
                '`' => self.raw_string()?,
                '\'' => self.rune()?,
                _ => self.punct()?,
            }
        }

        self.insert_semicolon();
        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, String::new(), String::new(), line, column);
        Ok(self.out)
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(line, column, message)
    }

    fn push(&mut self, kind: TokenKind, text: String, value: String, line: usize, column: usize) {
        self.out.tokens.push(Token {
            kind,
            text,
            value,
            line,
            column,
        });
    }

    /// Apply the line-end semicolon rule against the last emitted token.
    fn insert_semicolon(&mut self) {
        let Some(last) = self.out.tokens.last() else {
            return;
        };

        let needed = match last.kind {
            TokenKind::Ident => {
                !is_keyword(&last.text)
                    || matches!(last.text.as_str(), "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Number | TokenKind::Char | TokenKind::String => true,
            TokenKind::Punct => matches!(last.text.as_str(), "++" | "--" | ")" | "]" | "}"),
            TokenKind::Semicolon | TokenKind::Eof => false,
        };

        if needed {
            let (line, column) = (last.line, last.column + last.text.chars().count());
            self.push(TokenKind::Semicolon, "\n".to_string(), "\n".to_string(), line, column);
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }

    fn line_comment(&mut self) {
        let line = self.line;
        self.bump();
        self.bump();
        let body = self.take_while(|c| c != '\n');
        let text = body.strip_prefix(' ').unwrap_or(&body).trim_end().to_string();
        self.out.comments.push(Comment {
            text,
            start_line: line,
            end_line: line,
        });
    }

    fn block_comment(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        self.bump();
        self.bump();

        let mut body = String::new();
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some('*'), Some('/')) => {
                    self.bump();
                    self.bump();
                    break;
                }
                (Some(_), _) => {
                    if let Some(c) = self.bump() {
                        body.push(c);
                    }
                }
                (None, _) => return Err(self.error(line, column, "comment not terminated")),
            }
        }

        let end_line = self.line;
        // A comment spanning lines acts like a newline.
        if end_line > line {
            self.insert_semicolon();
        }

        let text = body
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
        self.out.comments.push(Comment {
            text,
            start_line: line,
            end_line,
        });
        Ok(())
    }

    fn ident(&mut self) {
        let (line, column) = (self.line, self.column);
        let text = self.take_while(is_ident_continue);
        self.push(TokenKind::Ident, text.clone(), text, line, column);
    }

    fn number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.peek(0) {
            let exponent_sign = matches!(c, '+' | '-')
                && matches!(text.chars().last(), Some('e' | 'E' | 'p' | 'P'))
                && !text.starts_with("0x")
                && !text.starts_with("0X");
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign) {
                break;
            }
            text.push(c);
            self.bump();
        }
        self.push(TokenKind::Number, text.clone(), text, line, column);
    }

    fn interpreted_string(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        let mut text = String::from('"');
        let mut value = String::new();
        self.bump();

        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => {
                    let Some(escaped) = self.bump() else {
                        return Err(self.error(line, column, "string literal not terminated"));
                    };
                    text.push('\\');
                    text.push(escaped);
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                }
                Some('\n') | None => {
                    return Err(self.error(line, column, "string literal not terminated"));
                }
                Some(c) => {
                    text.push(c);
                    value.push(c);
                }
            }
        }

        text.push('"');
        self.push(TokenKind::String, text, value, line, column);
        Ok(())
    }

    fn raw_string(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        self.bump();

        let mut value = String::new();
        loop {
            match self.bump() {
                Some('`') => break,
                Some('\r') => {}
                Some(c) => value.push(c),
                None => return Err(self.error(line, column, "raw string literal not terminated")),
            }
        }

        let text = format!("`{}`", value);
        self.push(TokenKind::String, text, value, line, column);
        Ok(())
    }

    fn rune(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        let mut text = String::from('\'');
        self.bump();

        loop {
            match self.bump() {
                Some('\'') => break,
                Some('\\') => {
                    text.push('\\');
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                Some('\n') | None => {
                    return Err(self.error(line, column, "rune literal not terminated"));
                }
                Some(c) => text.push(c),
            }
        }

        text.push('\'');
        self.push(TokenKind::Char, text.clone(), text, line, column);
        Ok(())
    }

    fn punct(&mut self) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        let rest: String = self.chars[self.pos..].iter().take(3).collect();

        let matched = PUNCT_3
            .iter()
            .chain(PUNCT_2)
            .find(|op| rest.starts_with(**op))
            .map(|op| op.to_string())
            .or_else(|| {
                rest.chars()
                    .next()
                    .filter(|c| PUNCT_1.contains(*c))
                    .map(String::from)
            });

        let Some(op) = matched else {
            let c = rest.chars().next().unwrap_or_default();
            return Err(self.error(line, column, format!("invalid character {:?}", c)));
        };

        for _ in 0..op.chars().count() {
            self.bump();
        }

        let kind = if op == ";" {
            TokenKind::Semicolon
        } else {
            TokenKind::Punct
        };
        self.push(kind, op.clone(), op, line, column);
        Ok(())
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}
