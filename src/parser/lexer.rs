//! Just enough of a Swift tokenizer to find declarations.
//!
//! Comments and whitespace are dropped, string literals (plain, multi-line,
//! raw, with interpolation) collapse to one `Literal` token, and every other
//! non-identifier character is its own `Punct`. `->` is kept whole so generic
//! angle brackets can be counted.

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Ident,
    Literal,
    Arrow,
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Kind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        &src[self.start..self.end]
    }
    /// Identifier text without surrounding backticks.
    pub fn ident<'s>(&self, src: &'s str) -> &'s str {
        let text = self.text(src);
        text.strip_prefix('`')
            .and_then(|t| t.strip_suffix('`'))
            .unwrap_or(text)
    }
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == Kind::Punct(c)
    }
    /// Unescaped keyword match: `` `case` `` is an identifier, not `case`.
    pub fn is_word(&self, src: &str, word: &str) -> bool {
        self.kind == Kind::Ident && self.text(src) == word
    }
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer { src, bytes: src.as_bytes(), pos: 0, line: 1, line_start: 0 };
    let mut out = Vec::new();
    while let Some(token) = lexer.next_token()? {
        out.push(token);
    }
    Ok(out)
}

struct Lexer<'s> {
    src: &'s str,
    bytes: &'s [u8],
    pos: usize,
    line: usize,
    line_start: usize,
}

fn is_ident_start(b: u8) -> bool {
    b == b'_' || b == b'$' || b.is_ascii_alphabetic() || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

impl<'s> Lexer<'s> {
    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn column_at(&self, pos: usize) -> usize {
        self.src[self.line_start..pos].chars().count() + 1
    }

    fn bump(&mut self) {
        if self.bytes[self.pos] == b'\n' {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_trivia()?;
        let Some(b) = self.peek(0) else {
            return Ok(None);
        };
        let (start, line, column) = (self.pos, self.line, self.column_at(self.pos));
        let kind = if is_ident_start(b) {
            while self.peek(0).is_some_and(is_ident_continue) {
                self.bump();
            }
            Kind::Ident
        } else if b == b'`' {
            self.bump();
            while self.peek(0).is_some_and(|c| c != b'`' && c != b'\n') {
                self.bump();
            }
            if self.peek(0) == Some(b'`') {
                self.bump();
            }
            Kind::Ident
        } else if b.is_ascii_digit() {
            while self.peek(0).is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'.') {
                // `1.foo` is a member access, not part of the number
                if self.peek(0) == Some(b'.') && !self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
                    break;
                }
                self.bump();
            }
            Kind::Literal
        } else if b == b'"' || (b == b'#' && self.raw_string_hashes().is_some()) {
            self.skip_string()?;
            Kind::Literal
        } else if b == b'-' && self.peek(1) == Some(b'>') {
            self.bump();
            self.bump();
            Kind::Arrow
        } else {
            let c = self.src[self.pos..].chars().next().unwrap_or('\0');
            for _ in 0..c.len_utf8() {
                self.bump();
            }
            Kind::Punct(c)
        };
        Ok(Some(Token { kind, start, end: self.pos, line, column }))
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => self.bump(),
                (Some(b'/'), Some(b'/')) => {
                    while self.peek(0).is_some_and(|c| c != b'\n') {
                        self.bump();
                    }
                }
                (Some(b'/'), Some(b'*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    // block comments nest in Swift
    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let (line, column) = (self.line, self.column_at(self.pos));
        let mut depth = 0usize;
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(b'/'), Some(b'*')) => {
                    depth += 1;
                    self.bump();
                    self.bump();
                }
                (Some(b'*'), Some(b'/')) => {
                    depth -= 1;
                    self.bump();
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                (Some(_), _) => self.bump(),
                (None, _) => return Err(ParseError::UnterminatedComment { line, column }),
            }
        }
    }

    /// Number of leading `#` when the cursor sits on a raw string opener.
    fn raw_string_hashes(&self) -> Option<usize> {
        let mut n = 0;
        while self.peek(n) == Some(b'#') {
            n += 1;
        }
        (n > 0 && self.peek(n) == Some(b'"')).then_some(n)
    }

    fn skip_string(&mut self) -> Result<(), ParseError> {
        let (line, column) = (self.line, self.column_at(self.pos));
        let unterminated = ParseError::UnterminatedString { line, column };
        let hashes = self.raw_string_hashes().unwrap_or(0);
        for _ in 0..hashes {
            self.bump();
        }
        let multiline = self.bytes[self.pos..].starts_with(b"\"\"\"");
        let quotes = if multiline { 3 } else { 1 };
        for _ in 0..quotes {
            self.bump();
        }
        loop {
            let Some(b) = self.peek(0) else {
                return Err(unterminated);
            };
            if b == b'\n' && !multiline {
                return Err(unterminated);
            }
            if b == b'\\' && self.escape_matches(hashes) {
                for _ in 0..=hashes {
                    self.bump();
                }
                if self.peek(0) == Some(b'(') {
                    self.skip_interpolation(&unterminated)?;
                } else if self.peek(0).is_some() {
                    self.bump();
                }
                continue;
            }
            if b == b'"' && self.closes_string(quotes, hashes) {
                for _ in 0..quotes + hashes {
                    self.bump();
                }
                return Ok(());
            }
            self.bump();
        }
    }

    fn escape_matches(&self, hashes: usize) -> bool {
        (1..=hashes).all(|i| self.peek(i) == Some(b'#'))
    }

    fn closes_string(&self, quotes: usize, hashes: usize) -> bool {
        (0..quotes).all(|i| self.peek(i) == Some(b'"'))
            && (quotes..quotes + hashes).all(|i| self.peek(i) == Some(b'#'))
    }

    // `\( ... )`, which may itself contain strings
    fn skip_interpolation(&mut self, unterminated: &ParseError) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.peek(0) {
                None => return Err(unterminated.clone()),
                Some(b'(') => {
                    depth += 1;
                    self.bump();
                }
                Some(b')') => {
                    depth -= 1;
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(b'"') => self.skip_string()?,
                Some(_) => self.bump(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Kind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn drops_comments_and_keeps_positions() {
        let src = "// header\nenum /* a /* nested */ b */ State {\n}";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].text(src), "enum");
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
        assert_eq!(tokens[1].text(src), "State");
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn strings_are_single_literals() {
        let src = r####"let a = "x \("y") }" ; let b = #"raw " }"# ; let c = """
        multi " }
        """"####;
        let braces = tokenize(src)
            .unwrap()
            .iter()
            .filter(|t| t.is_punct('}'))
            .count();
        assert_eq!(braces, 0);
    }

    #[test]
    fn arrow_is_one_token() {
        assert_eq!(
            kinds("() -> Void"),
            vec![Kind::Punct('('), Kind::Punct(')'), Kind::Arrow, Kind::Ident]
        );
    }

    #[test]
    fn backticked_identifier() {
        let src = "case `default`";
        let tokens = tokenize(src).unwrap();
        assert_eq!(tokens[1].kind, Kind::Ident);
        assert_eq!(tokens[1].ident(src), "default");
        assert!(!tokens[1].is_word(src, "default"));
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = tokenize("let a = 1\nlet b = \"oops\n").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedString { line: 2, column: 9 });
    }

    #[test]
    fn unterminated_comment_reports_position() {
        let err = tokenize("enum A { /* never").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedComment { line: 1, column: 10 });
    }
}
