//! Swift-subset parser: finds every `enum` declaration in a source file and
//! describes it as a [`VariantDecl`], plus the byte positions `rewrite` needs.
//!
//! Only the enum body itself is consulted for existing members. Members added
//! in an `extension` (same file or not) are invisible here, so a case whose
//! accessor lives in an extension will be synthesized again.
pub mod lexer;

use crate::error::ParseError;
use crate::ir::{Access, CaseDecl, Identifier, Member, PayloadField, TypeRef, VariantDecl};
use lexer::{Kind, Token};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub variants: Vec<ParsedVariant>,
}

#[derive(Debug, Clone)]
pub struct ParsedVariant {
    pub decl: VariantDecl,
    /// Byte offset of the body's `}`.
    pub body_close: usize,
    /// Indentation of the first case or member that starts its own line.
    pub member_indent: Option<String>,
    /// Indentation of the line holding the `enum` keyword.
    pub decl_indent: String,
}

/// Keywords that introduce a named member usable as a collision target.
const NAMED_DECLS: &[&str] = &[
    "func", "typealias", "struct", "class", "enum", "actor", "protocol", "associatedtype",
];

/// Tokens that may sit between a declaration's start and `enum`.
const DECL_MODIFIERS: &[&str] = &[
    "open", "public", "package", "internal", "fileprivate", "private", "indirect", "final",
    "nonisolated", "static",
];

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINT
// ————————————————————————————————————————————————————————————————————————————

pub fn parse(src: &str) -> Result<SourceFile, ParseError> {
    let tokens = lexer::tokenize(src)?;
    let matching = match_delimiters(&tokens)?;
    let parser = Parser { src, tokens: &tokens, matching: &matching };
    let mut variants = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if !token.is_word(src, "enum") {
            continue;
        }
        // `case enum` / `.enum` style uses are not declarations
        let preceded_by_dot = i > 0 && tokens[i - 1].is_punct('.');
        let named = tokens.get(i + 1).is_some_and(|t| t.kind == Kind::Ident);
        if preceded_by_dot || !named {
            continue;
        }
        variants.push(parser.variant(i)?);
    }
    Ok(SourceFile { variants })
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    /// For every opening `(`, `[` or `{`, the index of its closing token.
    matching: &'a [Option<usize>],
}

impl<'a> Parser<'a> {
    fn variant(&self, enum_at: usize) -> Result<ParsedVariant, ParseError> {
        let keyword = self.tokens[enum_at];
        let name = Identifier::new(self.tokens[enum_at + 1].ident(self.src));
        let open = (enum_at + 2..self.tokens.len())
            .find(|&j| self.tokens[j].is_punct('{'))
            .ok_or(ParseError::UnexpectedEof {
                line: keyword.line,
                column: keyword.column,
                context: "enum declaration",
            })?;
        let close = self.matching[open].ok_or(ParseError::Unclosed {
            line: self.tokens[open].line,
            column: self.tokens[open].column,
            open: '{',
        })?;

        let mut members = Vec::new();
        let mut cases = Vec::new();
        self.body(open + 1, close, &mut members, &mut cases)?;

        let member_indent = self.tokens[open + 1..close]
            .iter()
            .find(|t| t.line > self.tokens[open].line)
            .map(|t| line_indent(self.src, t.start).to_string());

        Ok(ParsedVariant {
            decl: VariantDecl { name, access: self.access_before(enum_at), members, cases },
            body_close: self.tokens[close].start,
            member_indent,
            decl_indent: line_indent(self.src, keyword.start).to_string(),
        })
    }

    fn access_before(&self, enum_at: usize) -> Option<Access> {
        self.tokens[..enum_at]
            .iter()
            .rev()
            .take_while(|t| {
                t.kind == Kind::Ident && DECL_MODIFIERS.contains(&t.text(self.src))
            })
            .find_map(|t| Access::from_keyword(t.text(self.src)))
    }

    /// Walks one enum body at its own depth; nested groups are skipped whole.
    fn body(
        &self,
        start: usize,
        end: usize,
        members: &mut Vec<Member>,
        cases: &mut Vec<CaseDecl>,
    ) -> Result<(), ParseError> {
        let mut i = start;
        while i < end {
            let t = self.tokens[i];
            match t.kind {
                Kind::Punct('(' | '[' | '{') => {
                    i = self.skip_group(i);
                    continue;
                }
                Kind::Ident if t.is_word(self.src, "case") => {
                    i = self.case_clause(i, end, cases)?;
                    continue;
                }
                Kind::Ident if t.is_word(self.src, "var") || t.is_word(self.src, "let") => {
                    i = self.bindings(i + 1, end, members);
                    continue;
                }
                Kind::Ident if NAMED_DECLS.contains(&t.text(self.src)) => {
                    if let Some(next) = self.tokens.get(i + 1).filter(|n| n.kind == Kind::Ident) {
                        members.push(Member::Existing(Identifier::new(next.ident(self.src))));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        Ok(())
    }

    fn starts_declaration(&self, at: usize) -> bool {
        let text = self.tokens[at].text(self.src);
        self.tokens[at].kind == Kind::Ident
            && (matches!(text, "case" | "var" | "let") || NAMED_DECLS.contains(&text))
    }

    fn skip_group(&self, open: usize) -> usize {
        self.matching[open].map_or(open + 1, |close| close + 1)
    }

    /// `case a, b(Int), c(code: Int, String) = ...`; returns the next index to scan.
    fn case_clause(
        &self,
        case_at: usize,
        end: usize,
        cases: &mut Vec<CaseDecl>,
    ) -> Result<usize, ParseError> {
        let mut j = case_at + 1;
        loop {
            let Some(name) = self.tokens.get(j).filter(|_| j < end) else {
                let at = self.tokens[case_at];
                return Err(ParseError::UnexpectedEof {
                    line: at.line,
                    column: at.column,
                    context: "case clause",
                });
            };
            if name.kind != Kind::Ident {
                return Ok(j);
            }
            j += 1;
            let mut payload = Vec::new();
            if j < end && self.tokens[j].is_punct('(') {
                let close = self.matching[j].unwrap_or(end);
                payload = self.payload(j + 1, close)?;
                j = close + 1;
            }
            if j < end && self.tokens[j].is_punct('=') {
                // raw value: skipped up to `,` or `;` or the next declaration on its line
                let line = self.tokens[j].line;
                j += 1;
                while j < end
                    && self.tokens[j].line == line
                    && !matches!(self.tokens[j].kind, Kind::Punct(',' | ';'))
                    && !self.starts_declaration(j)
                {
                    j += 1;
                }
            }
            cases.push(CaseDecl { name: Identifier::new(name.ident(self.src)), payload });
            if j < end && self.tokens[j].is_punct(',') {
                j += 1;
                continue;
            }
            return Ok(j);
        }
    }

    fn payload(&self, start: usize, end: usize) -> Result<Vec<PayloadField>, ParseError> {
        let mut fields = Vec::new();
        for (a, b) in self.split_top_level(start, end) {
            if a == b {
                continue;
            }
            fields.push(self.field(a, b)?);
        }
        Ok(fields)
    }

    /// Comma-separated ranges, ignoring commas nested in groups or generics.
    fn split_top_level(&self, start: usize, end: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut angle = 0usize;
        let (mut from, mut i) = (start, start);
        while i < end {
            let t = self.tokens[i];
            match t.kind {
                Kind::Punct('(' | '[' | '{') => {
                    i = self.skip_group(i);
                    continue;
                }
                Kind::Punct('<') => angle += 1,
                Kind::Punct('>') => angle = angle.saturating_sub(1),
                Kind::Punct(',') if angle == 0 => {
                    out.push((from, i));
                    from = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        out.push((from, end));
        out
    }

    /// `label: Type = default`, `_: Type`, `Type`.
    fn field(&self, start: usize, end: usize) -> Result<PayloadField, ParseError> {
        let toks = &self.tokens[start..end];
        let colon_at = match toks {
            [l, c, ..] if l.kind == Kind::Ident && c.is_punct(':') => Some(1),
            [l, _, c, ..] if l.kind == Kind::Ident && toks[1].kind == Kind::Ident && c.is_punct(':') => {
                Some(2)
            }
            _ => None,
        };
        let (label, ty_from) = match colon_at {
            Some(colon) => {
                let label = toks[0].ident(self.src);
                let label = (label != "_").then(|| Identifier::new(label));
                (label, start + colon + 1)
            }
            None => (None, start),
        };
        let ty_to = self.default_value_at(ty_from, end).unwrap_or(end);
        if ty_from >= ty_to {
            let at = toks.last().copied().unwrap_or(self.tokens[start]);
            return Err(ParseError::UnexpectedEof {
                line: at.line,
                column: at.column,
                context: "case payload",
            });
        }
        let text = &self.src[self.tokens[ty_from].start..self.tokens[ty_to - 1].end];
        let ty = text.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(PayloadField { label, ty: TypeRef::new(ty) })
    }

    fn default_value_at(&self, start: usize, end: usize) -> Option<usize> {
        let mut i = start;
        while i < end {
            match self.tokens[i].kind {
                Kind::Punct('(' | '[' | '{') => {
                    i = self.skip_group(i);
                    continue;
                }
                Kind::Punct('=') => return Some(i),
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Names bound by `var`/`let`, including `static let a = 1, b = 2`.
    fn bindings(&self, start: usize, end: usize, members: &mut Vec<Member>) -> usize {
        let mut i = start;
        if let Some(t) = self.tokens.get(i).filter(|t| i < end && t.kind == Kind::Ident) {
            members.push(Member::Existing(Identifier::new(t.ident(self.src))));
            i += 1;
        }
        while i < end {
            let t = self.tokens[i];
            match t.kind {
                Kind::Punct('(' | '[') => {
                    i = self.skip_group(i);
                    continue;
                }
                Kind::Punct('{' | ';' | '@') => break,
                Kind::Punct(',') => {
                    let name = self.tokens.get(i + 1).filter(|n| n.kind == Kind::Ident);
                    let sep = self.tokens.get(i + 2);
                    if let (Some(name), Some(sep)) = (name, sep) {
                        if sep.is_punct(':') || sep.is_punct('=') {
                            members.push(Member::Existing(Identifier::new(name.ident(self.src))));
                            i += 2;
                            continue;
                        }
                    }
                }
                Kind::Ident => {
                    let word = t.text(self.src);
                    if word == "case"
                        || word == "var"
                        || word == "let"
                        || NAMED_DECLS.contains(&word)
                        || DECL_MODIFIERS.contains(&word)
                    {
                        break;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        i
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn match_delimiters(tokens: &[Token]) -> Result<Vec<Option<usize>>, ParseError> {
    let mut matching = vec![None; tokens.len()];
    let mut stack: Vec<(usize, char)> = Vec::new();
    for (i, t) in tokens.iter().enumerate() {
        let Kind::Punct(c) = t.kind else { continue };
        match c {
            '(' | '[' | '{' => stack.push((i, c)),
            ')' | ']' | '}' => {
                let expected = match stack.pop() {
                    Some((open, o)) if closer(o) == c => {
                        matching[open] = Some(i);
                        continue;
                    }
                    Some((_, o)) => closer(o),
                    None => '\0',
                };
                return Err(ParseError::Unbalanced { line: t.line, column: t.column, found: c, expected });
            }
            _ => {}
        }
    }
    match stack.pop() {
        Some((open, c)) => Err(ParseError::Unclosed {
            line: tokens[open].line,
            column: tokens[open].column,
            open: c,
        }),
        None => Ok(matching),
    }
}

fn closer(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(src: &str, offset: usize) -> &str {
    let line_start = src[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &src[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}
