//! Go front-end.
//!
//! Parses the declaration-level syntax of a Go file: the package clause,
//! imports, and `type` declarations. Function, variable and constant
//! declarations are skipped without being interpreted.

pub mod lexer;
pub mod tag;

use std::path::Path;

use oapi_gen::annotation::DIRECTIVE_MARKER;
use oapi_gen::{FieldDescriptor, TypeDeclaration, TypeExpression};

use self::lexer::{Comment, Token, TokenKind};
use self::tag::TagName;
use super::DeclarationParser;
use crate::error::ParseError;

/// Tag key consulted for field names unless configured otherwise.
pub const DEFAULT_TAG_KEY: &str = "json";

/// A syntax error at a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Parser for `.go` files.
#[derive(Debug, Clone)]
pub struct GoParser {
    tag_key: String,
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GoParser {
    /// Create a parser reading `json` tags.
    pub fn new() -> Self {
        Self {
            tag_key: DEFAULT_TAG_KEY.to_string(),
        }
    }

    /// Read field names from a different tag key.
    pub fn with_tag_key(mut self, key: impl Into<String>) -> Self {
        self.tag_key = key.into();
        self
    }

    /// Parse source text into declarations.
    pub fn parse_source(&self, content: &str) -> Result<Vec<TypeDeclaration>, SyntaxError> {
        let lexed = lexer::tokenize(content)?;
        let mut parser = Parser {
            tokens: lexed.tokens,
            comments: lexed.comments,
            pos: 0,
            tag_key: &self.tag_key,
            declarations: Vec::new(),
        };
        parser.parse_file()?;
        Ok(parser.declarations)
    }
}

impl DeclarationParser for GoParser {
    fn parse(&self, file: &Path, content: &str) -> Result<Vec<TypeDeclaration>, ParseError> {
        self.parse_source(content)
            .map_err(|e| ParseError::syntax(file.to_path_buf(), e.line, e.column, e.message))
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    pos: usize,
    tag_key: &'a str,
    declarations: Vec<TypeDeclaration>,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Token access
    // ========================================================================

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.peek().is_punct(punct)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Semicolon if token.text == "\n" => "newline".to_string(),
            _ => format!("'{}'", token.text),
        };
        SyntaxError::new(token.line, token.column, format!("expected {}, found {}", expected, found))
    }

    fn expect_punct(&mut self, punct: &str) -> Result<(), SyntaxError> {
        if !self.at_punct(punct) {
            return Err(self.unexpected(&format!("'{}'", punct)));
        }
        self.advance();
        Ok(())
    }

    fn expect_name(&mut self) -> Result<String, SyntaxError> {
        let token = self.peek();
        if token.kind != TokenKind::Ident || is_reserved(&token.text) {
            return Err(self.unexpected("identifier"));
        }
        Ok(self.advance().text.clone())
    }

    fn expect_semicolon(&mut self) -> Result<(), SyntaxError> {
        match self.peek().kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("';' or newline")),
        }
    }

    fn skip_semicolons(&mut self) {
        while self.at_kind(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Consume tokens up to and including the bracket closing an already
    /// consumed opening bracket.
    fn skip_to_close(&mut self) -> Result<(), SyntaxError> {
        let mut depth = 1usize;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return Err(self.unexpected("closing bracket")),
                TokenKind::Punct if matches!(token.text.as_str(), "(" | "[" | "{") => depth += 1,
                TokenKind::Punct if matches!(token.text.as_str(), ")" | "]" | "}") => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Source spelling of the tokens in `start..self.pos`.
    fn spelling(&self, start: usize) -> String {
        let mut text = String::new();
        let mut previous: Option<&Token> = None;
        for token in &self.tokens[start..self.pos] {
            let word = |t: &Token| matches!(t.kind, TokenKind::Ident | TokenKind::Number);
            if previous.is_some_and(|p| (word(p) || p.is_punct(")")) && word(token)) {
                text.push(' ');
            }
            text.push_str(&token.text);
            if token.is_punct(",") {
                text.push(' ');
            }
            previous = Some(token);
        }
        text
    }

    /// Text of the comment group that ends on the line directly above the
    /// token at `index` and does not trail an earlier token.
    fn doc_before(&self, index: usize) -> String {
        let Some(token) = self.tokens.get(index) else {
            return String::new();
        };
        let previous_line = self.tokens[..index]
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::Semicolon)
            .map_or(0, |t| t.line);

        let mut lines = Vec::new();
        let mut expected_end = token.line.saturating_sub(1);
        for comment in self.comments.iter().rev() {
            if comment.end_line >= token.line {
                continue;
            }
            if comment.end_line != expected_end || comment.start_line <= previous_line {
                break;
            }
            lines.push(comment.text.as_str());
            expected_end = comment.start_line.saturating_sub(1);
        }

        lines.reverse();
        lines.join("\n")
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_file(&mut self) -> Result<(), SyntaxError> {
        self.skip_semicolons();
        if !self.peek().is_ident("package") {
            return Err(self.unexpected("'package'"));
        }
        self.advance();
        self.expect_name()?;
        self.expect_semicolon()?;

        loop {
            self.skip_semicolons();
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Ident if token.text == "type" => self.type_declaration()?,
                TokenKind::Ident if matches!(token.text.as_str(), "import" | "func" | "var" | "const") => {
                    self.advance();
                    self.skip_declaration()?;
                }
                _ => return Err(self.unexpected("declaration")),
            }
        }
    }

    fn skip_declaration(&mut self) -> Result<(), SyntaxError> {
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Semicolon | TokenKind::Eof => return self.expect_semicolon(),
                TokenKind::Punct if matches!(token.text.as_str(), "(" | "[" | "{") => {
                    self.advance();
                    self.skip_to_close()?;
                }
                TokenKind::Punct if matches!(token.text.as_str(), ")" | "]" | "}") => {
                    return Err(self.unexpected("declaration"));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn type_declaration(&mut self) -> Result<(), SyntaxError> {
        let keyword = self.pos;
        self.advance();

        if !self.at_punct("(") {
            let doc = self.doc_before(keyword);
            self.type_spec(doc)?;
            return self.expect_semicolon();
        }

        self.advance();
        let group_doc = self.doc_before(keyword);
        loop {
            self.skip_semicolons();
            if self.at_punct(")") {
                self.advance();
                return self.expect_semicolon();
            }

            let spec_doc = self.doc_before(self.pos);
            let doc = if spec_doc.contains(DIRECTIVE_MARKER) {
                spec_doc
            } else {
                group_doc.clone()
            };
            self.type_spec(doc)?;

            if !self.at_punct(")") {
                self.expect_semicolon()?;
            }
        }
    }

    fn type_spec(&mut self, doc: String) -> Result<(), SyntaxError> {
        let name = self.expect_name()?;

        if self.at_punct("[") && self.at_type_parameters() {
            self.advance();
            self.skip_to_close()?;
        }
        if self.at_punct("=") {
            self.advance();
        }

        let ty = self.parse_type()?;
        tracing::trace!(name = %name, ty = %ty, "Parsed Go type declaration");
        self.declarations.push(TypeDeclaration::new(name, ty).with_doc(doc));
        Ok(())
    }

    /// `[T any]` opens a type parameter list, `[N]T` an array type.
    fn at_type_parameters(&self) -> bool {
        self.peek_at(1).kind == TokenKind::Ident && !self.peek_at(2).is_punct("]")
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type(&mut self) -> Result<TypeExpression, SyntaxError> {
        let start = self.pos;
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Ident => match token.text.as_str() {
                "map" => {
                    self.advance();
                    self.expect_punct("[")?;
                    let key = self.parse_type()?;
                    self.expect_punct("]")?;
                    let value = self.parse_type()?;
                    Ok(TypeExpression::map(key, value))
                }
                "struct" => {
                    self.advance();
                    Ok(TypeExpression::record(self.struct_fields()?))
                }
                "interface" => {
                    self.advance();
                    self.expect_punct("{")?;
                    self.skip_to_close()?;
                    Ok(TypeExpression::opaque(self.spelling(start)))
                }
                "func" => {
                    self.advance();
                    self.skip_signature()?;
                    Ok(TypeExpression::opaque(self.spelling(start)))
                }
                "chan" => {
                    self.advance();
                    if self.at_punct("<-") {
                        self.advance();
                    }
                    self.parse_type()?;
                    Ok(TypeExpression::opaque(self.spelling(start)))
                }
                _ => self.type_name(),
            },
            TokenKind::Punct => match token.text.as_str() {
                "*" => {
                    self.advance();
                    Ok(TypeExpression::pointer(self.parse_type()?))
                }
                "[" => {
                    self.advance();
                    if self.at_punct("]") {
                        self.advance();
                    } else {
                        self.skip_to_close()?;
                    }
                    Ok(TypeExpression::array(self.parse_type()?))
                }
                "(" => {
                    self.advance();
                    let ty = self.parse_type()?;
                    self.expect_punct(")")?;
                    Ok(ty)
                }
                "<-" => {
                    self.advance();
                    if !self.peek().is_ident("chan") {
                        return Err(self.unexpected("'chan'"));
                    }
                    self.advance();
                    self.parse_type()?;
                    Ok(TypeExpression::opaque(self.spelling(start)))
                }
                _ => Err(self.unexpected("type")),
            },
            _ => Err(self.unexpected("type")),
        }
    }

    fn type_name(&mut self) -> Result<TypeExpression, SyntaxError> {
        let start = self.pos;
        let first = self.expect_name()?;

        let base = if self.at_punct(".") {
            self.advance();
            TypeExpression::qualified(first, self.expect_name()?)
        } else {
            TypeExpression::named(first)
        };

        if !self.at_punct("[") {
            return Ok(base);
        }

        self.advance();
        let mut arguments = vec![self.parse_type()?];
        while self.at_punct(",") {
            self.advance();
            if self.at_punct("]") {
                break;
            }
            arguments.push(self.parse_type()?);
        }
        self.expect_punct("]")?;

        match arguments.pop() {
            Some(argument) if arguments.is_empty() => Ok(TypeExpression::parametrized(base, argument)),
            _ => Ok(TypeExpression::opaque(self.spelling(start))),
        }
    }

    fn skip_signature(&mut self) -> Result<(), SyntaxError> {
        self.expect_punct("(")?;
        self.skip_to_close()?;

        if self.at_punct("(") {
            self.advance();
            return self.skip_to_close();
        }
        if self.at_type_start() {
            self.parse_type()?;
        }
        Ok(())
    }

    fn at_type_start(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::Ident => {
                !is_reserved(&token.text)
                    || matches!(token.text.as_str(), "map" | "struct" | "interface" | "func" | "chan")
            }
            TokenKind::Punct => matches!(token.text.as_str(), "*" | "[" | "(" | "<-"),
            _ => false,
        }
    }

    fn struct_fields(&mut self) -> Result<Vec<FieldDescriptor>, SyntaxError> {
        self.expect_punct("{")?;
        let mut fields = Vec::new();

        loop {
            self.skip_semicolons();
            if self.at_punct("}") {
                self.advance();
                return Ok(fields);
            }
            if self.at_kind(TokenKind::Eof) {
                return Err(self.unexpected("'}'"));
            }

            self.field_declaration(&mut fields)?;

            if !self.at_punct("}") {
                if !self.at_kind(TokenKind::Semicolon) {
                    return Err(self.unexpected("';', newline or '}'"));
                }
                self.advance();
            }
        }
    }

    fn field_declaration(&mut self, fields: &mut Vec<FieldDescriptor>) -> Result<(), SyntaxError> {
        if self.at_embedded_field() {
            let ty = self.parse_type()?;
            self.field_tag();
            tracing::trace!(ty = %ty, "Dropping embedded field");
            return Ok(());
        }

        let mut names = vec![self.expect_name()?];
        while self.at_punct(",") {
            self.advance();
            names.push(self.expect_name()?);
        }

        let ty = self.parse_type()?;
        let raw_tag = self.field_tag();

        for name in names {
            let field = FieldDescriptor::new(name, ty.clone());
            let field = match raw_tag.as_deref().map(|raw| tag::output_name(raw, self.tag_key)) {
                Some(TagName::Rename(output)) => field.with_tag_name(output),
                Some(TagName::Absent) | None => field,
            };
            fields.push(field);
        }
        Ok(())
    }

    fn field_tag(&mut self) -> Option<String> {
        if self.at_kind(TokenKind::String) {
            Some(self.advance().value.clone())
        } else {
            None
        }
    }

    /// An embedded field is a bare (possibly qualified or instantiated) type
    /// name with no field name in front of it.
    fn at_embedded_field(&self) -> bool {
        if self.at_punct("*") {
            return true;
        }

        let next = self.peek_at(1);
        match next.kind {
            TokenKind::Semicolon | TokenKind::String => true,
            TokenKind::Punct if next.text == "." || next.text == "}" => true,
            TokenKind::Punct if next.text == "[" => {
                self.peek_at(2).kind == TokenKind::Ident
                    && self.peek_at(3).is_punct("]")
                    && {
                        let after = self.peek_at(4);
                        matches!(after.kind, TokenKind::Semicolon | TokenKind::String)
                            || after.is_punct("}")
                    }
            }
            _ => false,
        }
    }
}

/// Keywords that cannot start a type name.
fn is_reserved(word: &str) -> bool {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<TypeDeclaration> {
        GoParser::new().parse_source(source).unwrap()
    }

    fn fields(declaration: &TypeDeclaration) -> &[FieldDescriptor] {
        match &declaration.ty {
            TypeExpression::Record(fields) => fields,
            other => panic!("expected record, got {}", other),
        }
    }

    #[test]
    fn test_parse_user_model() {
        let source = r#"
package models

import (
	"time"

	"github.com/aarondl/opt/null"
)

type User struct {
	ID       int              `json:"id"`
	Username string           `json:"username"`
	Email    null.Val[string] `json:"email"`

	Shop   Company           `json:"company"`
	Extras map[string]string `json:"extras,omitempty"`

	CreatedAt time.Time `json:"createdAt"`
}
"#;
        let declarations = parse(source);
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].name, "User");

        let fields = fields(&declarations[0]);
        let names: Vec<_> = fields.iter().map(FieldDescriptor::output_name).collect();
        assert_eq!(names, vec!["id", "username", "email", "company", "extras", "createdAt"]);
        assert_eq!(fields[2].ty.to_string(), "null.Val[string]");
        assert_eq!(fields[3].ty, TypeExpression::named("Company"));
        assert_eq!(fields[4].ty.to_string(), "map[string]string");
        assert_eq!(fields[5].ty, TypeExpression::qualified("time", "Time"));
    }

    #[test]
    fn test_generic_wrapper_with_directive() {
        let source = r#"package models

// Collection is a generic collection type
//
// @oas: kind=response placeholder=T name=%sCollection
type Collection[T any] struct {
	Total int `json:"total"`
	Items []T `json:"items"`
}
"#;
        let declarations = parse(source);
        assert_eq!(declarations[0].name, "Collection");
        assert_eq!(
            declarations[0].doc,
            "Collection is a generic collection type\n\n@oas: kind=response placeholder=T name=%sCollection"
        );
        let fields = fields(&declarations[0]);
        assert_eq!(fields[1].ty, TypeExpression::array(TypeExpression::named("T")));
    }

    #[test]
    fn test_detached_comment_is_not_doc() {
        let source = "package models\n\n// unrelated\n\ntype A struct{}\n";
        assert_eq!(parse(source)[0].doc, "");
    }

    #[test]
    fn test_grouped_declarations() {
        let source = r#"package models

// @oas: kind=response placeholder=T name=%sPage
type (
	Page[T any] struct {
		Items []T
	}

	// List holds items.
	// @oas: kind=response placeholder=T name=%sList
	List[T any] struct{ Items []T }

	Plain struct{}
)
"#;
        let declarations = parse(source);
        let names: Vec<_> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Page", "List", "Plain"]);
        assert!(declarations[0].doc.contains("name=%sPage"));
        assert!(declarations[1].doc.contains("name=%sList"));
        assert!(declarations[2].doc.contains("name=%sPage"));
    }

    #[test]
    fn test_field_lists_and_embedded_fields() {
        let source = r#"package models

type Point struct {
	Base
	*pkg.Mixin
	X, Y float64
	Hidden string `json:"-"`
	Raw []byte
}
"#;
        let declarations = parse(source);
        let fields = fields(&declarations[0]);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y", "Hidden", "Raw"]);
        assert!(!fields[2].skip);
        assert_eq!(fields[2].output_name(), "-");
        assert_eq!(fields[3].ty.to_string(), "[]byte");
    }

    #[test]
    fn test_type_shapes() {
        let source = r#"package models

type Shapes struct {
	Ptr     *User
	Fixed   [4]int
	Nested  map[string][]*Order
	Inline  struct{ A int }
	Any     interface{}
	Fn      func(int) error
	Ch      chan<- string
	Pair    Pair[int, string]
	Grouped (int)
}
"#;
        let declarations = parse(source);
        let spellings: Vec<_> = fields(&declarations[0])
            .iter()
            .map(|f| f.ty.to_string())
            .collect();
        assert_eq!(
            spellings,
            vec![
                "*User",
                "[]int",
                "map[string][]*Order",
                "struct{A int}",
                "interface{}",
                "func(int) error",
                "chan<-string",
                "Pair[int, string]",
                "int",
            ]
        );
        assert!(matches!(fields(&declarations[0])[7].ty, TypeExpression::Opaque(_)));
    }

    #[test]
    fn test_skips_functions_vars_and_consts() {
        let source = r#"package models

const Limit = 10

var (
	defaultName = "x"
)

func (u *User) Name() string {
	if u == nil {
		return ""
	}
	return u.name
}

type User struct {
	name string
}

type Status string

type Alias = User
"#;
        let declarations = parse(source);
        let names: Vec<_> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Status", "Alias"]);
        assert_eq!(declarations[1].ty, TypeExpression::named("string"));
    }

    #[test]
    fn test_array_type_declaration_is_not_type_parameters() {
        let declarations = parse("package models\n\ntype Buffer [N]byte\n");
        assert_eq!(declarations[0].ty.to_string(), "[]byte");
    }

    #[test]
    fn test_missing_package_clause() {
        let err = GoParser::new().parse_source("type A struct{}").unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));
        assert!(err.message.contains("'package'"));
    }

    #[test]
    fn test_syntax_error_position() {
        let source = "package models\n\ntype User struct {\n\tID int `json:\"id\"`\n\tName\n";
        let err = GoParser::new().parse_source(source).unwrap_err();
        assert_eq!(err.line, 6);
    }

    #[test]
    fn test_custom_tag_key() {
        let source = "package models\n\ntype A struct {\n\tID int `json:\"id\" yaml:\"ident\"`\n}\n";
        let declarations = GoParser::new().with_tag_key("yaml").parse_source(source).unwrap();
        assert_eq!(fields(&declarations[0])[0].output_name(), "ident");
    }

    #[test]
    fn test_parse_error_carries_file() {
        let err = GoParser::new()
            .parse(Path::new("models/bad.go"), "package models\ntype {")
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, column: 6, .. }));
        assert_eq!(err.file(), Path::new("models/bad.go"));
    }
}
