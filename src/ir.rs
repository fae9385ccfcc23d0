//! Declaration model shared by the parser, the synthesis engine and codegen.
//!
//! Everything here is plain data. Names and type expressions are `Arc<str>`
//! handles: the engine echoes and combines them but never looks inside.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

// ————————————————————————————————————————————————————————————————————————————
// HANDLES
// ————————————————————————————————————————————————————————————————————————————

/// A bare (unescaped) identifier, e.g. `default` for `` `default` ``.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(Arc<str>);

/// An opaque type expression, kept verbatim (`[String: Int]`, `() -> Void`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeRef(Arc<str>);

/// Name under which any existing member of a declaration is known.
pub type MemberName = Identifier;

impl Identifier {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TypeRef {
    pub fn new(ty: impl AsRef<str>) -> Self {
        Self(Arc::from(ty.as_ref()))
    }
    pub fn unit() -> Self {
        Self::new("Void")
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Open,
    Public,
    Package,
    Internal,
    Fileprivate,
    Private,
}

impl Access {
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "open" => Self::Open,
            "public" => Self::Public,
            "package" => Self::Package,
            "internal" => Self::Internal,
            "fileprivate" => Self::Fileprivate,
            "private" => Self::Private,
            _ => return None,
        })
    }
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Public => "public",
            Self::Package => "package",
            Self::Internal => "internal",
            Self::Fileprivate => "fileprivate",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadField {
    pub label: Option<Identifier>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDecl {
    pub name: Identifier,
    pub payload: Vec<PayloadField>, // empty for a simple case
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// Anything already declared in the body: properties, methods, nested types.
    Existing(MemberName),
    /// Appended by `augment`.
    Accessor(AccessorDecl),
}

impl Member {
    pub fn name(&self) -> &MemberName {
        match self {
            Self::Existing(name) => name,
            Self::Accessor(accessor) => &accessor.name,
        }
    }
}

/// One variant-type declaration. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecl {
    pub name: Identifier,
    pub access: Option<Access>,
    pub members: Vec<Member>,  // declaration order
    pub cases: Vec<CaseDecl>,  // declaration order
}

impl VariantDecl {
    pub fn member_names(&self) -> impl Iterator<Item = &MemberName> {
        self.members.iter().map(Member::name)
    }
    pub fn accessors(&self) -> impl Iterator<Item = &AccessorDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Accessor(a) => Some(a),
            Member::Existing(_) => None,
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SYNTHESIZED ACCESSORS
// ————————————————————————————————————————————————————————————————————————————

/// Payload arity, resolved once per case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadShape {
    Unit,
    Single(PayloadField),
    Tuple(Vec<PayloadField>), // two or more
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDecl {
    pub name: Identifier,
    pub shape: PayloadShape,
    /// Payload type; the accessor's read type is `Optional<value_type>`.
    pub value_type: TypeRef,
    pub access: Option<Access>,
    pub get_body: GetBody,
    pub set_body: Option<SetBody>,
}

/// `guard case let .<case>(<bindings>) = self else { return nil }; return <result>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBody {
    pub case: Identifier,
    pub bindings: Vec<Identifier>,
    pub result: PayloadExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadExpr {
    Unit,
    Binding(Identifier),
    Tuple(Vec<(Option<Identifier>, Identifier)>),
}

/// Absent `newValue` is a no-op; present rebuilds `self` as `.<case>(<arguments>)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBody {
    pub case: Identifier,
    pub arguments: Vec<SetArgument>, // empty: presence-only case
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetArgument {
    pub label: Option<Identifier>,
    pub source: NewValue,
}

/// Which part of the unwrapped `newValue` feeds a constructor argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewValue {
    Whole,
    Element(usize),
}
