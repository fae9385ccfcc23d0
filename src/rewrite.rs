//! Splices synthesized accessors back into the source text.
//!
//! Accessors go right before the closing brace of their enum body, one level
//! deeper than the brace. Declarations that gain nothing are not touched, so
//! a file with nothing to add comes back byte-for-byte.

use serde::Serialize;
use tracing::debug;

use crate::augment::augment;
use crate::codegen::Codegen;
use crate::ir::Identifier;
use crate::parser::{ParsedVariant, SourceFile, line_indent};

#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Spaces per level when the body gives no indentation to copy.
    pub indent_width: usize,
    pub mirror_access: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self { indent_width: 4, mirror_access: true }
    }
}

#[derive(Debug, Clone)]
pub struct Rewrite {
    pub output: String,
    pub changes: Vec<DeclChange>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        self.changes.iter().any(|c| !c.added.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclChange {
    pub name: Identifier,
    pub added: Vec<Identifier>,
    /// Cases left alone because a member with their name already exists.
    pub skipped: Vec<Identifier>,
}

/// Replaces `src[at..end]` (usually empty) with `text`.
struct Insertion {
    at: usize,
    end: usize,
    text: String,
}

pub fn rewrite(src: &str, file: SourceFile, options: &RewriteOptions) -> Rewrite {
    let newline = if src.contains("\r\n") { "\r\n" } else { "\n" };
    let mut changes = Vec::with_capacity(file.variants.len());
    let mut insertions = Vec::new();

    for variant in file.variants {
        let ParsedVariant { decl, body_close, member_indent, decl_indent, .. } = variant;
        let (decl, changed) = augment(decl);
        let added = decl.accessors().map(|a| a.name.clone()).collect::<Vec<_>>();
        let skipped = decl
            .cases
            .iter()
            .map(|c| c.name.clone())
            .filter(|name| !added.contains(name))
            .collect::<Vec<_>>();
        debug!(decl = %decl.name, added = added.len(), skipped = skipped.len(), "augmented");
        if changed {
            let layout = Layout::at(src, body_close, member_indent, &decl_indent, options);
            let mut cg = Codegen::new(layout.member_indent.clone(), " ".repeat(options.indent_width))
                .mirror_access(options.mirror_access);
            for accessor in decl.accessors() {
                cg.emit(accessor);
            }
            let text = layout.wrap(&cg.into_string());
            insertions.push(Insertion {
                at: layout.at,
                end: layout.end,
                text: text.replace('\n', newline),
            });
        }
        changes.push(DeclChange { name: decl.name, added, skipped });
    }

    let mut output = src.to_string();
    insertions.sort_by(|a, b| b.at.cmp(&a.at));
    for insertion in insertions {
        output.replace_range(insertion.at..insertion.end, &insertion.text);
    }
    Rewrite { output, changes }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

struct Layout {
    at: usize,
    end: usize,
    member_indent: String,
    /// Text before the accessors.
    lead: &'static str,
    /// Text after the accessors, ahead of the closing brace.
    trail: String,
}

impl Layout {
    fn at(
        src: &str,
        body_close: usize,
        member_indent: Option<String>,
        decl_indent: &str,
        options: &RewriteOptions,
    ) -> Self {
        let unit = " ".repeat(options.indent_width);
        let line_start = src[..body_close].rfind('\n').map_or(0, |i| i + 1);
        let brace_on_own_line = src[line_start..body_close].trim().is_empty();

        if brace_on_own_line {
            // `line_start` > 0 here: the body's `{` sits on an earlier line
            let close_indent = line_indent(src, body_close);
            let previous = src[..line_start - 1]
                .rsplit('\n')
                .next()
                .unwrap_or_default()
                .trim();
            let lead = if previous.is_empty() || previous.ends_with('{') { "" } else { "\n" };
            return Self {
                at: line_start,
                end: line_start,
                member_indent: member_indent.unwrap_or_else(|| format!("{close_indent}{unit}")),
                lead,
                trail: String::new(),
            };
        }

        // `enum A { case x }`: break the brace onto its own line
        let content_end = src[..body_close].trim_end_matches([' ', '\t']).len();
        Self {
            at: content_end,
            end: body_close,
            member_indent: member_indent.unwrap_or_else(|| format!("{decl_indent}{unit}")),
            lead: "\n\n",
            trail: decl_indent.to_string(),
        }
    }

    fn wrap(&self, block: &str) -> String {
        format!("{}{block}{}", self.lead, self.trail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn run(src: &str) -> Rewrite {
        rewrite(src, parse(src).unwrap(), &RewriteOptions::default())
    }

    #[test]
    fn appends_before_closing_brace() {
        let src = "enum State {\n    case idle\n}\n";
        let out = run(src);
        assert_eq!(
            out.output,
            "\
enum State {
    case idle

    var idle: Void? {
        get {
            guard case .idle = self else { return nil }
            return ()
        }
        set {
            guard newValue != nil else { return }
            self = .idle
        }
    }
}
"
        );
        assert!(out.changed());
    }

    #[test]
    fn unchanged_source_is_returned_verbatim() {
        let src = "enum State {\n  case idle\n  var idle: Void? { nil }\n}  // trailing\n";
        let out = run(src);
        assert_eq!(out.output, src);
        assert!(!out.changed());
        assert_eq!(out.changes[0].skipped, vec![Identifier::new("idle")]);
    }

    #[test]
    fn one_line_enum_gets_its_brace_moved() {
        let src = "    enum A { case x(Int) }\n";
        let out = run(src);
        assert_eq!(
            out.output,
            "    enum A { case x(Int)

        var x: Int? {
            get {
                guard case let .x(value) = self else { return nil }
                return value
            }
            set {
                guard let newValue = newValue else { return }
                self = .x(newValue)
            }
        }
    }
"
        );
    }

    #[test]
    fn semicolon_separated_raw_value_cases_all_get_accessors() {
        let src = "enum Dir: Int {\n    case up = 1; case down = 2\n}\n";
        let out = run(src);
        assert!(out.output.contains("    var up: Void? {\n"));
        assert!(out.output.contains("    var down: Void? {\n"));
        let added: Vec<&str> = out.changes[0].added.iter().map(|n| n.as_str()).collect();
        assert_eq!(added, vec!["up", "down"]);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let src = "public enum E {\n\tcase a, b(String)\n\n\tcase c(x: Int, y: Int)\n}\n";
        let once = run(src).output;
        let twice = run(&once);
        assert!(!twice.changed());
        assert_eq!(twice.output, once);
    }

    #[test]
    fn uses_member_indentation_and_skips_blank_separator() {
        let src = "enum E {\n\tcase a\n\n}\n";
        let out = run(src).output;
        assert!(out.starts_with("enum E {\n\tcase a\n\n\tvar a: Void? {\n"));
        assert!(out.ends_with("\t}\n}\n"));
    }

    #[test]
    fn nested_enums_are_rewritten_independently() {
        let src = "enum Outer {\n    case a\n    enum Inner {\n        case b\n    }\n}\n";
        let out = run(src);
        let names: Vec<_> = out.changes.iter().map(|c| c.name.as_str().to_string()).collect();
        assert_eq!(names, vec!["Outer", "Inner"]);
        assert!(out.output.contains("        case b\n\n        var b: Void? {\n"));
        assert!(out.output.contains("    }\n\n    var a: Void? {\n"));
        assert!(run(&out.output).changes.iter().all(|c| c.added.is_empty()));
    }

    #[test]
    fn keeps_crlf_line_endings() {
        let src = "enum E {\r\n    case a\r\n}\r\n";
        let out = run(src).output;
        assert!(!out.replace("\r\n", "").contains('\n'));
    }
}
