//! Swift source for synthesized accessors.
//!
//! ```swift
//! var failure: (code: Int, String)? {
//!     get {
//!         guard case let .failure(v0, v1) = self else { return nil }
//!         return (code: v0, v1)
//!     }
//!     set {
//!         guard let newValue = newValue else { return }
//!         self = .failure(code: newValue.0, newValue.1)
//!     }
//! }
//! ```
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{AccessorDecl, GetBody, Identifier, NewValue, PayloadExpr, SetBody, TypeRef};

/// Types that would bind a postfix `?` to the wrong thing.
static NEEDS_PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(some|any)\s|->|&").expect("valid regex"));

const KEYWORDS: &[&str] = &[
    "Any", "Self", "as", "associatedtype", "await", "break", "case", "catch", "class",
    "continue", "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough",
    "false", "fileprivate", "for", "func", "guard", "if", "import", "in", "init", "inout",
    "internal", "is", "let", "nil", "open", "operator", "precedencegroup", "private",
    "Protocol", "protocol", "public", "repeat", "rethrows", "return", "self", "static", "struct",
    "subscript", "super", "switch", "throw", "throws", "true", "try", "Type", "typealias", "var",
    "where", "while",
];

pub struct Codegen {
    out: String,
    indent: String,
    unit: String,
    mirror_access: bool,
}

impl Codegen {
    /// `indent` prefixes every emitted line; `unit` is one nesting level.
    pub fn new(indent: impl Into<String>, unit: impl Into<String>) -> Self {
        Self { out: String::new(), indent: indent.into(), unit: unit.into(), mirror_access: true }
    }

    pub fn mirror_access(mut self, yes: bool) -> Self {
        self.mirror_access = yes;
        self
    }

    /// Appends one accessor, separated from the previous one by a blank line.
    pub fn emit(&mut self, accessor: &AccessorDecl) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let access = match accessor.access {
            Some(access) if self.mirror_access => format!("{} ", access.keyword()),
            _ => String::new(),
        };
        self.line(0, &format!(
            "{access}var {}: {} {{",
            escape(&accessor.name),
            optional_type(&accessor.value_type),
        ));
        self.line(1, "get {");
        self.getter(&accessor.get_body);
        self.line(1, "}");
        if let Some(set_body) = &accessor.set_body {
            self.line(1, "set {");
            self.setter(set_body);
            self.line(1, "}");
        }
        self.line(0, "}");
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, level: usize, text: &str) {
        self.out.push_str(&self.indent);
        for _ in 0..level {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn getter(&mut self, body: &GetBody) {
        let case = escape(&body.case);
        if body.bindings.is_empty() {
            self.line(2, &format!("guard case .{case} = self else {{ return nil }}"));
        } else {
            let bindings = body.bindings.iter().map(escape).collect::<Vec<_>>().join(", ");
            self.line(2, &format!("guard case let .{case}({bindings}) = self else {{ return nil }}"));
        }
        let result = match &body.result {
            PayloadExpr::Unit => "()".to_string(),
            PayloadExpr::Binding(name) => escape(name),
            PayloadExpr::Tuple(elems) => {
                let elems = elems
                    .iter()
                    .map(|(label, name)| labeled(label.as_ref(), escape(name)))
                    .collect::<Vec<_>>();
                format!("({})", elems.join(", "))
            }
        };
        self.line(2, &format!("return {result}"));
    }

    fn setter(&mut self, body: &SetBody) {
        let case = escape(&body.case);
        if body.arguments.is_empty() {
            self.line(2, "guard newValue != nil else { return }");
            self.line(2, &format!("self = .{case}"));
            return;
        }
        let args = body
            .arguments
            .iter()
            .map(|arg| {
                let value = match arg.source {
                    NewValue::Whole => "newValue".to_string(),
                    NewValue::Element(i) => format!("newValue.{i}"),
                };
                labeled(arg.label.as_ref(), value)
            })
            .collect::<Vec<_>>();
        self.line(2, "guard let newValue = newValue else { return }");
        self.line(2, &format!("self = .{case}({})", args.join(", ")));
    }
}

/// `T?`, parenthesised when `T` would not survive a bare postfix `?`.
pub fn optional_type(ty: &TypeRef) -> String {
    if NEEDS_PARENS.is_match(ty.as_str()) {
        format!("({ty})?")
    } else {
        format!("{ty}?")
    }
}

pub fn escape(name: &Identifier) -> String {
    if KEYWORDS.contains(&name.as_str()) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

fn labeled(label: Option<&Identifier>, value: String) -> String {
    match label {
        // labels are argument names, where keywords other than `inout` are fine
        Some(label) => format!("{label}: {value}"),
        None => value,
    }
}
