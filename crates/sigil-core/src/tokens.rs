//! # Tokenizer
//!
//! Lexer for the attribute label language.
//!
//! Turns UTF-8 expression text into a stream of typed, positioned
//! [`Token`]s. The tokenizer validates the *next* token when asked
//! whether one is available, so [`Tokenizer::has_next`] itself can fail
//! on malformed input — this keeps "is there more?" and "is it legal?"
//! as a single question, which is how the parser wants to ask it.
//!
//! Lexical rules:
//! - `#` starts a comment running to end of line; never emitted.
//! - Short strings use `'` or `"`, must not span a line break, and
//!   support `\r \n \f \b \t`, quote and backslash escapes plus
//!   `\uXXXX` / `\UXXXXXXXX`.
//! - Long strings use `'''` or `"""` and may contain embedded quotes.
//! - Numbers are integer, decimal, double (exponent) or hex (`0x`).
//! - Words are identifier-like runs used for attribute names.
//!
//! Every token records the 1-based line and column of its first
//! character. Position is metadata: token equality is kind + text only.

use crate::error::SyntaxError;

// =============================================================================
// TOKEN KINDS
// =============================================================================

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier-like bare word.
    Word,
    /// Quoted string (short or long form, see [`StringKind`]).
    Str,
    /// Integer number, e.g. `42`.
    Integer,
    /// Decimal number with a fractional part, e.g. `1.0`.
    Decimal,
    /// Number with an exponent, e.g. `1e3`.
    Double,
    /// Hexadecimal number, e.g. `0x1F`.
    Hex,
    Semicolon,
    Comma,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Slash,
    RSlash,
    Colon,
    Dot,
    Star,
    QMark,
    EMark,
    /// `=`
    Eq,
    /// `==`
    Equivalent,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `|`
    VBar,
    /// `||`
    LogicalOr,
    /// `&`
    Ampersand,
    /// `&&`
    LogicalAnd,
    Plus,
    Minus,
    /// Newline run; only produced in line mode.
    Newline,
}

impl TokenKind {
    /// The name used in diagnostics, e.g. `LPAREN` in `[LPAREN:(]`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Word => "WORD",
            TokenKind::Str => "STRING",
            TokenKind::Integer => "INTEGER",
            TokenKind::Decimal => "DECIMAL",
            TokenKind::Double => "DOUBLE",
            TokenKind::Hex => "HEX",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Slash => "SLASH",
            TokenKind::RSlash => "RSLASH",
            TokenKind::Colon => "COLON",
            TokenKind::Dot => "DOT",
            TokenKind::Star => "STAR",
            TokenKind::QMark => "QMARK",
            TokenKind::EMark => "EMARK",
            TokenKind::Eq => "EQ",
            TokenKind::Equivalent => "EQUIVALENT",
            TokenKind::Ne => "NE",
            TokenKind::Lt => "LT",
            TokenKind::Le => "LE",
            TokenKind::Gt => "GT",
            TokenKind::Ge => "GE",
            TokenKind::VBar => "VBAR",
            TokenKind::LogicalOr => "LOGICAL_OR",
            TokenKind::Ampersand => "AMPERSAND",
            TokenKind::LogicalAnd => "LOGICAL_AND",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Newline => "NL",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which quoting form a string token used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// `'...'`
    Single,
    /// `"..."`
    Double,
    /// `'''...'''`
    LongSingle,
    /// `"""..."""`
    LongDouble,
}

// =============================================================================
// TOKEN
// =============================================================================

/// One lexed token.
///
/// Immutable once produced. Two tokens are equal iff kind and text
/// match; line and column are metadata and not part of identity.
#[derive(Debug, Clone)]
pub struct Token {
    kind: TokenKind,
    image: String,
    string_kind: Option<StringKind>,
    line: u32,
    column: u32,
}

impl Token {
    fn new(kind: TokenKind, image: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            image: image.into(),
            string_kind: None,
            line,
            column,
        }
    }

    /// The token kind.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The token text, with string escapes already processed.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// The quoting form, for string tokens.
    #[must_use]
    pub fn string_kind(&self) -> Option<StringKind> {
        self.string_kind
    }

    /// 1-based line of the token's first character.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the token's first character.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Whether this token has the given kind.
    #[must_use]
    pub fn has_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Whether this token is a bare word.
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Whether this token is a quoted string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::Str
    }

    /// Whether this token is any numeric kind.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Integer | TokenKind::Decimal | TokenKind::Double | TokenKind::Hex
        )
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.image == other.image
            && self.string_kind == other.string_kind
    }
}

impl Eq for Token {}

impl std::fmt::Display for Token {
    /// Diagnostic form: `[KIND:text]`, as quoted in error messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == TokenKind::Newline {
            return write!(f, "[NL]");
        }
        write!(f, "[{}:{}]", self.kind, self.image)
    }
}

// =============================================================================
// CHARACTER READER
// =============================================================================

/// Character cursor with pushback and 1-based position tracking.
struct Reader {
    chars: Vec<char>,
    /// Position (line, column) of `chars[i]`; one extra entry for EOF.
    positions: Vec<(u32, u32)>,
    pos: usize,
}

impl Reader {
    fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let mut positions = Vec::with_capacity(chars.len() + 1);
        let mut line = 1u32;
        let mut column = 1u32;
        for &ch in &chars {
            positions.push((line, column));
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        positions.push((line, column));
        Self {
            chars,
            positions,
            pos: 0,
        }
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn read(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn pushback(&mut self) {
        debug_assert!(self.pos > 0);
        self.pos = self.pos.saturating_sub(1);
    }

    fn line(&self) -> u32 {
        self.positions[self.pos].0
    }

    fn column(&self) -> u32 {
        self.positions[self.pos].1
    }
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// Tokenizer over label expression text.
///
/// Holds a mutable cursor; one instance per parse task, never shared
/// across concurrent operations.
pub struct Tokenizer {
    reader: Reader,
    pending: Option<Token>,
    finished: bool,
    /// In line mode newlines are tokens, not whitespace.
    line_mode: bool,
}

impl Tokenizer {
    /// Tokenize a string, treating newlines as whitespace.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            reader: Reader::new(input),
            pending: None,
            finished: false,
            line_mode: false,
        }
    }

    /// Tokenize a string, emitting [`TokenKind::Newline`] tokens.
    /// Used when labels are processed one line at a time.
    #[must_use]
    pub fn line_mode(input: &str) -> Self {
        Self {
            line_mode: true,
            ..Self::new(input)
        }
    }

    /// Tokenize raw bytes, failing up front if they are not UTF-8.
    pub fn from_bytes(input: &[u8]) -> Result<Self, SyntaxError> {
        let text = std::str::from_utf8(input)
            .map_err(|_| SyntaxError::new("Bad character encoding"))?;
        Ok(Self::new(text))
    }

    /// Whether another token is available.
    ///
    /// Peeks ahead and fully validates the next token before reporting
    /// availability, so this can fail with a syntax error on malformed
    /// input. The reported position is the offending character, not the
    /// token start.
    pub fn has_next(&mut self) -> Result<bool, SyntaxError> {
        if self.finished {
            return Ok(false);
        }
        if self.pending.is_some() {
            return Ok(true);
        }
        self.skip();
        if self.reader.at_eof() {
            self.finished = true;
            return Ok(false);
        }
        let token = self.parse_token()?;
        self.pending = Some(token);
        Ok(true)
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        if !self.has_next()? {
            return Err(self.err_here("No more tokens"));
        }
        match self.pending.take() {
            Some(token) => Ok(token),
            None => Err(self.err_here("No more tokens")),
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&Token>, SyntaxError> {
        if self.has_next()? {
            Ok(self.pending.as_ref())
        } else {
            Ok(None)
        }
    }

    /// Whether the input is exhausted.
    pub fn eof(&mut self) -> Result<bool, SyntaxError> {
        Ok(!self.has_next()?)
    }

    // ---- Machinery

    fn err_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(message, self.reader.line(), self.reader.column())
    }

    /// Skip whitespace and comments. In line mode, newlines survive.
    fn skip(&mut self) {
        loop {
            let Some(ch) = self.reader.peek() else {
                return;
            };
            if ch == '#' {
                self.reader.read();
                while let Some(c) = self.reader.peek() {
                    if is_newline_char(c) {
                        break;
                    }
                    self.reader.read();
                }
                continue;
            }
            let skippable = if self.line_mode {
                is_horizontal_whitespace(ch)
            } else {
                is_whitespace(ch)
            };
            if !skippable {
                return;
            }
            self.reader.read();
        }
    }

    fn parse_token(&mut self) -> Result<Token, SyntaxError> {
        let line = self.reader.line();
        let column = self.reader.column();
        let Some(ch) = self.reader.peek() else {
            return Err(self.err_here("No more tokens"));
        };

        if ch == '\'' || ch == '"' {
            return self.parse_quote(ch, line, column);
        }

        match ch {
            ';' => return Ok(self.one_char(TokenKind::Semicolon, ch, line, column)),
            ',' => return Ok(self.one_char(TokenKind::Comma, ch, line, column)),
            '{' => return Ok(self.one_char(TokenKind::LBrace, ch, line, column)),
            '}' => return Ok(self.one_char(TokenKind::RBrace, ch, line, column)),
            '(' => return Ok(self.one_char(TokenKind::LParen, ch, line, column)),
            ')' => return Ok(self.one_char(TokenKind::RParen, ch, line, column)),
            '[' => return Ok(self.one_char(TokenKind::LBracket, ch, line, column)),
            ']' => return Ok(self.one_char(TokenKind::RBracket, ch, line, column)),
            '/' => return Ok(self.one_char(TokenKind::Slash, ch, line, column)),
            '\\' => return Ok(self.one_char(TokenKind::RSlash, ch, line, column)),
            ':' => return Ok(self.one_char(TokenKind::Colon, ch, line, column)),
            '.' => return Ok(self.one_char(TokenKind::Dot, ch, line, column)),
            '*' => return Ok(self.one_char(TokenKind::Star, ch, line, column)),
            '?' => return Ok(self.one_char(TokenKind::QMark, ch, line, column)),
            // Two character tokens: == != <= >= || &&
            '=' => {
                return Ok(self.maybe_two_char(
                    '=',
                    '=',
                    TokenKind::Eq,
                    TokenKind::Equivalent,
                    "==",
                    line,
                    column,
                ));
            }
            '!' => {
                return Ok(self.maybe_two_char(
                    '!',
                    '=',
                    TokenKind::EMark,
                    TokenKind::Ne,
                    "!=",
                    line,
                    column,
                ));
            }
            '<' => {
                return Ok(self.maybe_two_char(
                    '<',
                    '=',
                    TokenKind::Lt,
                    TokenKind::Le,
                    "<=",
                    line,
                    column,
                ));
            }
            '>' => {
                return Ok(self.maybe_two_char(
                    '>',
                    '=',
                    TokenKind::Gt,
                    TokenKind::Ge,
                    ">=",
                    line,
                    column,
                ));
            }
            '|' => {
                return Ok(self.maybe_two_char(
                    '|',
                    '|',
                    TokenKind::VBar,
                    TokenKind::LogicalOr,
                    "||",
                    line,
                    column,
                ));
            }
            '&' => {
                return Ok(self.maybe_two_char(
                    '&',
                    '&',
                    TokenKind::Ampersand,
                    TokenKind::LogicalAnd,
                    "&&",
                    line,
                    column,
                ));
            }
            _ => {}
        }

        if is_newline_char(ch) {
            while let Some(c) = self.reader.peek() {
                if !is_newline_char(c) {
                    break;
                }
                self.reader.read();
            }
            return Ok(Token::new(TokenKind::Newline, "", line, column));
        }

        if ch == '+' || ch == '-' || ch.is_ascii_digit() {
            return self.parse_numeric(ch, line, column);
        }

        if is_word_start(ch) {
            let word = self.read_word();
            return Ok(Token::new(TokenKind::Word, word, line, column));
        }

        Err(self.err_here(format!("Bad character: {ch}")))
    }

    fn one_char(&mut self, kind: TokenKind, ch: char, line: u32, column: u32) -> Token {
        self.reader.read();
        Token::new(kind, ch, line, column)
    }

    fn maybe_two_char(
        &mut self,
        first: char,
        second: char,
        one_kind: TokenKind,
        two_kind: TokenKind,
        two_image: &str,
        line: u32,
        column: u32,
    ) -> Token {
        self.reader.read();
        if self.reader.peek() == Some(second) {
            self.reader.read();
            return Token::new(two_kind, two_image, line, column);
        }
        Token::new(one_kind, first, line, column)
    }

    // ---- Strings

    fn parse_quote(&mut self, quote: char, line: u32, column: u32) -> Result<Token, SyntaxError> {
        self.reader.read();
        let (image, string_kind) = if self.reader.peek() == Some(quote) {
            self.reader.read();
            if self.reader.peek() == Some(quote) {
                self.reader.read();
                let image = self.read_long_string(quote)?;
                let kind = if quote == '\'' {
                    StringKind::LongSingle
                } else {
                    StringKind::LongDouble
                };
                (image, kind)
            } else {
                // Two quotes then a non-quote: the empty string.
                let kind = if quote == '\'' {
                    StringKind::Single
                } else {
                    StringKind::Double
                };
                (String::new(), kind)
            }
        } else {
            let image = self.read_string(quote)?;
            let kind = if quote == '\'' {
                StringKind::Single
            } else {
                StringKind::Double
            };
            (image, kind)
        };
        let mut token = Token::new(TokenKind::Str, image, line, column);
        token.string_kind = Some(string_kind);
        Ok(token)
    }

    /// Characters between two short-string delimiters, escapes processed.
    /// The opening delimiter has been read; reads the closing one.
    fn read_string(&mut self, end: char) -> Result<String, SyntaxError> {
        let mut buffer = String::new();
        loop {
            let Some(ch) = self.reader.read() else {
                return Err(self.err_here(format!("Broken token: {buffer}")));
            };
            if ch == '\n' {
                return Err(self.err_here(format!("Broken token (newline): {buffer}")));
            }
            if ch == end {
                return Ok(buffer);
            }
            if ch == '\\' {
                buffer.push(self.read_literal_escape()?);
                continue;
            }
            buffer.push(ch);
        }
    }

    /// Body of a triple-quoted string. Embedded quotes are fine as long
    /// as three in a row do not occur.
    fn read_long_string(&mut self, quote: char) -> Result<String, SyntaxError> {
        let mut buffer = String::new();
        loop {
            let Some(ch) = self.reader.read() else {
                return Err(self.err_here("Broken long string"));
            };
            if ch == quote {
                if self.three_quotes(quote) {
                    return Ok(buffer);
                }
                buffer.push(ch);
                continue;
            }
            if ch == '\\' {
                buffer.push(self.read_literal_escape()?);
                continue;
            }
            buffer.push(ch);
        }
    }

    /// The first closing quote has been read. Reports whether the two
    /// following characters complete the closing delimiter, consuming
    /// them only on success.
    fn three_quotes(&mut self, quote: char) -> bool {
        if self.reader.peek() != Some(quote) {
            return false;
        }
        self.reader.read();
        if self.reader.peek() != Some(quote) {
            self.reader.pushback();
            return false;
        }
        self.reader.read();
        true
    }

    fn read_literal_escape(&mut self) -> Result<char, SyntaxError> {
        let Some(ch) = self.reader.read() else {
            return Err(self.err_here("Escape sequence not completed"));
        };
        match ch {
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'f' => Ok('\u{000C}'),
            'b' => Ok('\u{0008}'),
            '"' => Ok('"'),
            '\'' => Ok('\''),
            '\\' => Ok('\\'),
            'u' => self.read_unicode_escape(4),
            'U' => self.read_unicode_escape(8),
            _ => Err(self.err_here(format!(
                "Illegal escape sequence value: {ch} (0x{:02X})",
                ch as u32
            ))),
        }
    }

    fn read_unicode_escape(&mut self, digits: u32) -> Result<char, SyntaxError> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            let Some(ch) = self.reader.read() else {
                return Err(self.err_here("Not a hexadecimal character (end of file)"));
            };
            let Some(d) = ch.to_digit(16) else {
                return Err(self.err_here(format!("Not a hexadecimal character: '{ch}'")));
            };
            value = (value << 4) + d;
        }
        char::from_u32(value)
            .ok_or_else(|| self.err_here(format!("Illegal code point in \\u sequence value: 0x{value:08X}")))
    }

    // ---- Numbers

    fn parse_numeric(&mut self, ch: char, line: u32, column: u32) -> Result<Token, SyntaxError> {
        let mut buffer = String::new();
        if ch == '+' || ch == '-' {
            self.reader.read();
            match self.reader.peek() {
                Some(c) if c.is_ascii_digit() => buffer.push(ch),
                _ => {
                    // The sign was the whole token.
                    let kind = if ch == '+' {
                        TokenKind::Plus
                    } else {
                        TokenKind::Minus
                    };
                    return Ok(Token::new(kind, ch, line, column));
                }
            }
        }
        self.read_number(buffer, line, column)
    }

    fn read_number(
        &mut self,
        mut buffer: String,
        line: u32,
        column: u32,
    ) -> Result<Token, SyntaxError> {
        let mut digits_before_dot = 0usize;
        let mut is_decimal = false;

        if self.reader.peek() == Some('0') {
            digits_before_dot += 1;
            self.reader.read();
            buffer.push('0');
            if let Some(x) = self.reader.peek() {
                if x == 'x' || x == 'X' {
                    self.reader.read();
                    buffer.push(x);
                    self.read_hex_digits(&mut buffer)?;
                    return Ok(Token::new(TokenKind::Hex, buffer, line, column));
                }
            }
        }

        digits_before_dot += self.read_digits(&mut buffer);
        if self.reader.peek() == Some('.') {
            self.reader.read();
            buffer.push('.');
            is_decimal = true;
            self.read_digits(&mut buffer);
        }

        if digits_before_dot == 0 && !is_decimal {
            return Err(self.err_here("Unrecognized as number"));
        }

        let is_double = self.read_exponent(&mut buffer)?;

        // "123." is the integer 123 followed by a DOT.
        if is_decimal && !is_double && buffer.ends_with('.') {
            buffer.pop();
            self.reader.pushback();
            is_decimal = false;
        }

        let kind = if is_double {
            TokenKind::Double
        } else if is_decimal {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        };
        Ok(Token::new(kind, buffer, line, column))
    }

    fn read_digits(&mut self, buffer: &mut String) -> usize {
        let mut count = 0;
        while let Some(ch) = self.reader.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.reader.read();
            buffer.push(ch);
            count += 1;
        }
        count
    }

    fn read_hex_digits(&mut self, buffer: &mut String) -> Result<(), SyntaxError> {
        let mut count = 0;
        while let Some(ch) = self.reader.peek() {
            if !ch.is_ascii_hexdigit() {
                break;
            }
            self.reader.read();
            buffer.push(ch);
            count += 1;
        }
        if count == 0 {
            return Err(self.err_here(format!("No hex characters after {buffer}")));
        }
        Ok(())
    }

    fn read_exponent(&mut self, buffer: &mut String) -> Result<bool, SyntaxError> {
        match self.reader.peek() {
            Some('e' | 'E') => {}
            _ => return Ok(false),
        }
        let Some(e) = self.reader.read() else {
            return Ok(false);
        };
        buffer.push(e);
        if let Some(sign) = self.reader.peek() {
            if sign == '+' || sign == '-' {
                self.reader.read();
                buffer.push(sign);
            }
        }
        if self.read_digits(buffer) == 0 {
            return Err(self.err_here(format!("Malformed double: {buffer}")));
        }
        Ok(true)
    }

    // ---- Words

    /// Read a word. The first character has been verified but not read.
    /// Characters that are legal mid-word but not word-final (such as a
    /// trailing `:`) are pushed back.
    fn read_word(&mut self) -> String {
        let mut buffer = String::new();
        if let Some(first) = self.reader.read() {
            buffer.push(first);
        }
        let mut chars_read: Vec<char> = Vec::new();
        let mut last_valid_end = 0usize;
        while let Some(ch) = self.reader.peek() {
            if !is_word_middle(ch) {
                break;
            }
            self.reader.read();
            chars_read.push(ch);
            if is_word_end(ch) {
                last_valid_end = chars_read.len();
            }
        }
        // The first character is always a valid last character.
        while chars_read.len() > last_valid_end {
            chars_read.pop();
            self.reader.pushback();
        }
        buffer.extend(chars_read);
        buffer
    }
}

// =============================================================================
// CHARACTER CLASSES
// =============================================================================

fn is_newline_char(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

fn is_horizontal_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

fn is_whitespace(ch: char) -> bool {
    is_horizontal_whitespace(ch) || is_newline_char(ch) || ch == '\u{000C}'
}

fn is_alpha_numeric(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

/// Legal first character of a bare word.
#[must_use]
pub fn is_word_start(ch: char) -> bool {
    is_alpha_numeric(ch) || ch == '_'
}

/// Legal interior character of a bare word.
#[must_use]
pub fn is_word_middle(ch: char) -> bool {
    is_alpha_numeric(ch) || matches!(ch, '_' | '.' | '-' | '+' | ':')
}

/// Legal final character of a bare word.
#[must_use]
pub fn is_word_end(ch: char) -> bool {
    is_alpha_numeric(ch) || ch == '_'
}

/// Whether a whole string is a legal bare word.
#[must_use]
pub fn is_word(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    let Some(first) = chars.next() else {
        return false;
    };
    if !is_word_start(first) {
        return false;
    }
    let mut last = first;
    for ch in chars {
        if !is_word_middle(ch) {
            return false;
        }
        last = ch;
    }
    is_word_end(last)
}

/// Render a string value as legal label syntax: bare if it is a word,
/// quoted otherwise.
#[must_use]
pub fn word_str(text: &str) -> String {
    if is_word(text) {
        text.to_string()
    } else {
        quoted_str(text)
    }
}

/// Render a string value as a double-quoted label string.
#[must_use]
pub fn quoted_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tokens(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        while tokenizer.has_next().expect("lex") {
            tokens.push(tokenizer.next_token().expect("token"));
        }
        tokens
    }

    fn lex_error(input: &str) -> SyntaxError {
        let mut tokenizer = Tokenizer::new(input);
        loop {
            match tokenizer.has_next() {
                Ok(true) => {
                    tokenizer.next_token().expect("token");
                }
                Ok(false) => break,
                Err(e) => return e,
            }
        }
        SyntaxError::new(format!("no lexical error for {input:?}"))
    }

    #[test]
    fn words_and_operators() {
        let tokens = all_tokens("role = engineer & dept=sales");
        let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Eq,
                TokenKind::Word,
                TokenKind::Ampersand,
                TokenKind::Word,
                TokenKind::Eq,
                TokenKind::Word,
            ]
        );
        assert_eq!(tokens[0].image(), "role");
        assert_eq!(tokens[2].image(), "engineer");
    }

    #[test]
    fn word_interior_characters() {
        let tokens = all_tokens("a:x1 b.c-d");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].image(), "a:x1");
        assert_eq!(tokens[1].image(), "b.c-d");
    }

    #[test]
    fn word_trailing_colon_pushed_back() {
        let tokens = all_tokens("status:");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].image(), "status");
        assert_eq!(tokens[1].kind(), TokenKind::Colon);
    }

    #[test]
    fn two_char_operators() {
        let tokens = all_tokens("== != <= >= || &&");
        let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Equivalent,
                TokenKind::Ne,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::LogicalOr,
                TokenKind::LogicalAnd,
            ]
        );
    }

    #[test]
    fn short_string_escapes() {
        let tokens = all_tokens(r#""a\nb\\c\"d""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].image(), "a\nb\\c\"d");
        assert_eq!(tokens[0].string_kind(), Some(StringKind::Double));
    }

    #[test]
    fn empty_string_token() {
        let tokens = all_tokens("''");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Str);
        assert_eq!(tokens[0].image(), "");
    }

    #[test]
    fn long_string_with_embedded_quotes() {
        let tokens = all_tokens(r#"'''it's "fine" here'''"#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].image(), "it's \"fine\" here");
        assert_eq!(tokens[0].string_kind(), Some(StringKind::LongSingle));
    }

    #[test]
    fn unicode_escape() {
        let tokens = all_tokens(r#""A\U00000042""#);
        assert_eq!(tokens[0].image(), "AB");
    }

    #[test]
    fn numbers() {
        let tokens = all_tokens("12 1.0 1e3 0x1F");
        let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Integer,
                TokenKind::Decimal,
                TokenKind::Double,
                TokenKind::Hex,
            ]
        );
        assert_eq!(tokens[1].image(), "1.0");
        assert_eq!(tokens[3].image(), "0x1F");
    }

    #[test]
    fn trailing_dot_is_its_own_token() {
        // A dot with no fractional digits is not part of the number.
        let tokens = all_tokens("123.");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind(), TokenKind::Integer);
        assert_eq!(tokens[0].image(), "123");
        assert_eq!(tokens[1].kind(), TokenKind::Dot);
        assert_eq!(tokens[1].to_string(), "[DOT:.]");
    }

    #[test]
    fn comment_discarded() {
        let tokens = all_tokens("a # comment to end of line\nb");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].image(), "a");
        assert_eq!(tokens[1].image(), "b");
    }

    #[test]
    fn line_mode_emits_newline_tokens() {
        let mut tokenizer = Tokenizer::line_mode("a\nb");
        let t1 = tokenizer.next_token().expect("token");
        let t2 = tokenizer.next_token().expect("token");
        let t3 = tokenizer.next_token().expect("token");
        assert_eq!(t1.kind(), TokenKind::Word);
        assert_eq!(t2.kind(), TokenKind::Newline);
        assert_eq!(t3.kind(), TokenKind::Word);
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = all_tokens("a &\n  b");
        assert_eq!((tokens[0].line(), tokens[0].column()), (1, 1));
        assert_eq!((tokens[1].line(), tokens[1].column()), (1, 3));
        assert_eq!((tokens[2].line(), tokens[2].column()), (2, 3));
    }

    #[test]
    fn equality_ignores_position() {
        let a = all_tokens("x")[0].clone();
        let b = all_tokens("  \n x")[0].clone();
        assert_eq!(a, b);
    }

    #[test]
    fn display_format() {
        let tokens = all_tokens("( 1.0 {");
        assert_eq!(tokens[0].to_string(), "[LPAREN:(]");
        assert_eq!(tokens[1].to_string(), "[DECIMAL:1.0]");
        assert_eq!(tokens[2].to_string(), "[LBRACE:{]");
    }

    #[test]
    fn bad_character() {
        let err = lex_error("a ^ b");
        assert_eq!(err.message, "Bad character: ^");
        assert_eq!(err.line, Some(1));
        assert_eq!(err.column, Some(3));
    }

    #[test]
    fn bad_character_non_ascii() {
        let err = lex_error("a £");
        assert_eq!(err.message, "Bad character: £");
    }

    #[test]
    fn broken_token_at_eof() {
        let err = lex_error("'abc");
        assert_eq!(err.message, "Broken token: abc");
    }

    #[test]
    fn broken_token_newline() {
        let err = lex_error("'ab\ncd'");
        assert_eq!(err.message, "Broken token (newline): ab");
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn broken_long_string() {
        let err = lex_error("'''abc''");
        assert_eq!(err.message, "Broken long string");
    }

    #[test]
    fn escape_not_completed() {
        let err = lex_error("'abc\\");
        assert_eq!(err.message, "Escape sequence not completed");
    }

    #[test]
    fn illegal_escape() {
        let err = lex_error("'a\\qb'");
        assert_eq!(err.message, "Illegal escape sequence value: q (0x71)");
    }

    #[test]
    fn no_hex_characters() {
        let err = lex_error("0xZ");
        assert_eq!(err.message, "No hex characters after 0x");
    }

    #[test]
    fn malformed_double() {
        let err = lex_error("1e+");
        assert_eq!(err.message, "Malformed double: 1e+");
    }

    #[test]
    fn next_after_end() {
        let mut tokenizer = Tokenizer::new("a");
        tokenizer.next_token().expect("token");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn from_bytes_rejects_bad_utf8() {
        let err = Tokenizer::from_bytes(&[0x61, 0xFF, 0x62]).err().expect("error");
        assert_eq!(err.message, "Bad character encoding");
    }

    #[test]
    fn word_predicates() {
        assert!(is_word("abc"));
        assert!(is_word("a:x1"));
        assert!(is_word("_a"));
        assert!(!is_word(""));
        assert!(!is_word("attr:"));
        assert!(!is_word("my attr"));
    }

    #[test]
    fn word_str_quotes_when_needed() {
        assert_eq!(word_str("abc"), "abc");
        assert_eq!(word_str("my attr"), "\"my attr\"");
        assert_eq!(quoted_str("a\"b"), "\"a\\\"b\"");
    }
}
