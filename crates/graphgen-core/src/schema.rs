//! Minimal GraphQL schema (SDL) parsing.
//!
//! Covers the subset of the schema language Graphgen generates code
//! from: `type`, `input`, `enum` and `scalar` definitions, field
//! arguments, list and non-null modifiers, and simple literal argument
//! defaults. Comments, descriptions and directives are accepted and
//! ignored. Anything else is rejected with a line-numbered error so a
//! typo never turns into silently wrong generated code.

use crate::error::{Error, Result};

/// A parsed schema document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub definitions: Vec<TypeDefinition>,
}

impl Document {
    /// Look up a type definition by name.
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }
}

/// Kind of a schema type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    Input,
    Enum,
    Scalar,
}

/// A single `type`/`input`/`enum`/`scalar` definition.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    pub kind: TypeKind,
    pub name: String,
    /// Fields of an object or input type; empty for enums and scalars
    pub fields: Vec<Field>,
    /// Values of an enum; empty otherwise
    pub values: Vec<String>,
}

/// A field of an object or input type.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub ty: TypeRef,
}

/// A field argument.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: String,
    pub ty: TypeRef,
}

/// A type reference with list/non-null modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named { name: String, non_null: bool },
    List { of: Box<TypeRef>, non_null: bool },
}

impl TypeRef {
    /// Name of the innermost named type.
    pub fn named(&self) -> &str {
        match self {
            TypeRef::Named { name, .. } => name,
            TypeRef::List { of, .. } => of.named(),
        }
    }

    /// Whether the outermost modifier is non-null.
    pub fn non_null(&self) -> bool {
        match self {
            TypeRef::Named { non_null, .. } => *non_null,
            TypeRef::List { non_null, .. } => *non_null,
        }
    }
}

/// Parse SDL source into a [`Document`].
pub fn parse(source: &str) -> Result<Document> {
    let tokens = tokenize(source)?;
    Parser { tokens, pos: 0 }.parse_document()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Punct(char),
    Str(String),
    Number(String),
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn parse_document(mut self) -> Result<Document> {
        let mut definitions = Vec::new();
        while self.peek().is_some() {
            self.skip_description();
            let line = self.line();
            let keyword = self.expect_name("definition keyword")?;
            let definition = match keyword.as_str() {
                "type" => self.parse_fields_definition(TypeKind::Object)?,
                "input" => self.parse_fields_definition(TypeKind::Input)?,
                "enum" => self.parse_enum_definition()?,
                "scalar" => {
                    let name = self.expect_name("scalar name")?;
                    self.skip_directives()?;
                    TypeDefinition {
                        kind: TypeKind::Scalar,
                        name,
                        fields: Vec::new(),
                        values: Vec::new(),
                    }
                }
                "interface" | "union" | "schema" | "extend" | "directive" => {
                    return Err(Error::schema(format!(
                        "unsupported definition `{keyword}` at line {line}"
                    )));
                }
                other => {
                    return Err(Error::schema(format!(
                        "unexpected `{other}` at line {line}, expected a type definition"
                    )));
                }
            };
            definitions.push(definition);
        }
        Ok(Document { definitions })
    }

    fn parse_fields_definition(&mut self, kind: TypeKind) -> Result<TypeDefinition> {
        let name = self.expect_name("type name")?;
        self.skip_directives()?;
        self.expect_punct('{')?;
        let mut fields = Vec::new();
        while !self.eat_punct('}') {
            self.skip_description();
            let field_name = self.expect_name("field name")?;
            let arguments = self.parse_arguments(kind)?;
            self.expect_punct(':')?;
            let ty = self.parse_type()?;
            self.skip_directives()?;
            fields.push(Field {
                name: field_name,
                arguments,
                ty,
            });
        }
        Ok(TypeDefinition {
            kind,
            name,
            fields,
            values: Vec::new(),
        })
    }

    fn parse_arguments(&mut self, kind: TypeKind) -> Result<Vec<Argument>> {
        if !self.eat_punct('(') {
            return Ok(Vec::new());
        }
        if kind == TypeKind::Input {
            return Err(Error::schema(format!(
                "input fields take no arguments (line {})",
                self.line()
            )));
        }
        let mut arguments = Vec::new();
        while !self.eat_punct(')') {
            self.skip_description();
            let name = self.expect_name("argument name")?;
            self.expect_punct(':')?;
            let ty = self.parse_type()?;
            if self.eat_punct('=') {
                self.parse_default_value()?;
            }
            arguments.push(Argument { name, ty });
        }
        Ok(arguments)
    }

    fn parse_enum_definition(&mut self) -> Result<TypeDefinition> {
        let name = self.expect_name("enum name")?;
        self.skip_directives()?;
        self.expect_punct('{')?;
        let mut values = Vec::new();
        while !self.eat_punct('}') {
            self.skip_description();
            values.push(self.expect_name("enum value")?);
            self.skip_directives()?;
        }
        if values.is_empty() {
            return Err(Error::schema(format!(
                "enum {name} declares no values (line {})",
                self.line()
            )));
        }
        Ok(TypeDefinition {
            kind: TypeKind::Enum,
            name,
            fields: Vec::new(),
            values,
        })
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        if self.eat_punct('[') {
            let of = self.parse_type()?;
            self.expect_punct(']')?;
            let non_null = self.eat_punct('!');
            return Ok(TypeRef::List {
                of: Box::new(of),
                non_null,
            });
        }
        let name = self.expect_name("type")?;
        let non_null = self.eat_punct('!');
        Ok(TypeRef::Named { name, non_null })
    }

    // Only scalar literals are supported as defaults.
    fn parse_default_value(&mut self) -> Result<()> {
        match self.next() {
            Some((Token::Name(_), _)) | Some((Token::Number(_), _)) | Some((Token::Str(_), _)) => {
                Ok(())
            }
            Some((token, line)) => Err(Error::schema(format!(
                "unsupported default value {token:?} at line {line}"
            ))),
            None => Err(Error::schema("unexpected end of schema")),
        }
    }

    fn skip_description(&mut self) {
        while matches!(self.peek(), Some(Token::Str(_))) {
            self.pos += 1;
        }
    }

    fn skip_directives(&mut self) -> Result<()> {
        while self.eat_punct('@') {
            self.expect_name("directive name")?;
            if self.eat_punct('(') {
                let mut depth = 1usize;
                while depth > 0 {
                    match self.next() {
                        Some((Token::Punct('('), _)) => depth += 1,
                        Some((Token::Punct(')'), _)) => depth -= 1,
                        Some(_) => {}
                        None => return Err(Error::schema("unterminated directive arguments")),
                    }
                }
            }
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.pos).cloned();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map(|(_, line)| *line)
            .unwrap_or(0)
    }

    fn eat_punct(&mut self, punct: char) -> bool {
        if self.peek() == Some(&Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        match self.next() {
            Some((Token::Punct(found), _)) if found == punct => Ok(()),
            Some((token, line)) => Err(Error::schema(format!(
                "expected `{punct}` at line {line}, found {token:?}"
            ))),
            None => Err(Error::schema(format!(
                "unexpected end of schema, expected `{punct}`"
            ))),
        }
    }

    fn expect_name(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some((Token::Name(name), _)) => Ok(name),
            Some((token, line)) => Err(Error::schema(format!(
                "expected {what} at line {line}, found {token:?}"
            ))),
            None => Err(Error::schema(format!(
                "unexpected end of schema, expected {what}"
            ))),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() || c == ',' => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' => {
                tokens.push((Token::Str(read_string(&mut chars, &mut line)?), line));
            }
            c if c == '_' || c.is_ascii_alphabetic() => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '_' || c.is_ascii_alphanumeric() {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Name(name), line));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut number = String::new();
                number.push(c);
                chars.next();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        number.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Number(number), line));
            }
            '{' | '}' | '(' | ')' | '[' | ']' | ':' | '!' | '=' | '@' | '|' | '&' => {
                tokens.push((Token::Punct(ch), line));
                chars.next();
            }
            other => {
                return Err(Error::schema(format!(
                    "unexpected character `{other}` at line {line}"
                )));
            }
        }
    }

    Ok(tokens)
}

fn read_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: &mut usize,
) -> Result<String> {
    let mut value = String::new();
    chars.next(); // opening quote

    // Block string: two more quotes follow immediately.
    if chars.peek() == Some(&'"') {
        chars.next();
        if chars.peek() != Some(&'"') {
            return Ok(value); // empty "" string
        }
        chars.next();
        let mut quotes = 0usize;
        for c in chars.by_ref() {
            if c == '\n' {
                *line += 1;
            }
            if c == '"' {
                quotes += 1;
                if quotes == 3 {
                    // Trailing quotes were not part of the content.
                    value.truncate(value.len() - 2);
                    return Ok(value);
                }
            } else {
                quotes = 0;
            }
            value.push(c);
        }
        return Err(Error::schema(format!(
            "unterminated block string at line {line}"
        )));
    }

    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(value),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    value.push(escaped);
                }
            }
            '\n' => {
                return Err(Error::schema(format!(
                    "unterminated string at line {line}"
                )));
            }
            c => value.push(c),
        }
    }
    Err(Error::schema(format!("unterminated string at line {line}")))
}
