//! Accessor synthesis: one case in, one computed property (or nothing) out.
//!
//! The accessor is named exactly like its case. Its read type is an optional
//! of the payload: `Void?` for a simple case, `T?` for a single field and a
//! tuple `(label: T, U)?` for two or more fields, labels kept as declared.
//! Reading matches `self` against the case and returns the payload or `nil`.
//! Writing `nil` does nothing; writing a value replaces `self` with the case
//! built from that value, whatever case was active before.

use crate::index::MemberIndex;
use crate::ir::{
    AccessorDecl, CaseDecl, GetBody, Identifier, NewValue, PayloadExpr, PayloadField,
    PayloadShape, SetArgument, SetBody, TypeRef,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    /// A member with the case's name already exists; it wins.
    Skip,
    Accessor(AccessorDecl),
}

impl Synthesis {
    pub fn into_accessor(self) -> Option<AccessorDecl> {
        match self {
            Self::Skip => None,
            Self::Accessor(accessor) => Some(accessor),
        }
    }
}

impl PayloadShape {
    pub fn of(payload: &[PayloadField]) -> Self {
        match payload {
            [] => Self::Unit,
            [field] => Self::Single(field.clone()),
            fields => Self::Tuple(fields.to_vec()),
        }
    }

    /// Non-optional payload type exposed by the accessor.
    pub fn value_type(&self) -> TypeRef {
        match self {
            Self::Unit => TypeRef::unit(),
            Self::Single(field) => field.ty.clone(),
            Self::Tuple(fields) => {
                let elems = fields
                    .iter()
                    .map(|f| match &f.label {
                        Some(label) => format!("{label}: {}", f.ty),
                        None => f.ty.to_string(),
                    })
                    .collect::<Vec<_>>();
                TypeRef::new(format!("({})", elems.join(", ")))
            }
        }
    }
}

pub fn synthesize(case: &CaseDecl, index: &MemberIndex<'_>) -> Synthesis {
    if index.has_member(case.name.as_str()) {
        return Synthesis::Skip;
    }
    let shape = PayloadShape::of(&case.payload);
    let value_type = shape.value_type();
    let get_body = get_body(&case.name, &shape);
    let set_body = set_body(&case.name, &shape);
    Synthesis::Accessor(AccessorDecl {
        name: case.name.clone(),
        shape,
        value_type,
        access: None,
        get_body,
        set_body: Some(set_body),
    })
}

fn get_body(case: &Identifier, shape: &PayloadShape) -> GetBody {
    match shape {
        PayloadShape::Unit => GetBody {
            case: case.clone(),
            bindings: Vec::new(),
            result: PayloadExpr::Unit,
        },
        PayloadShape::Single(_) => {
            let value = Identifier::new("value");
            GetBody {
                case: case.clone(),
                bindings: vec![value.clone()],
                result: PayloadExpr::Binding(value),
            }
        }
        PayloadShape::Tuple(fields) => {
            let bindings = (0..fields.len())
                .map(|i| Identifier::new(format!("v{i}")))
                .collect::<Vec<_>>();
            // labels ride along in the tuple so the setter can rebuild the case
            let elems = fields
                .iter()
                .zip(&bindings)
                .map(|(f, b)| (f.label.clone(), b.clone()))
                .collect();
            GetBody {
                case: case.clone(),
                bindings,
                result: PayloadExpr::Tuple(elems),
            }
        }
    }
}

fn set_body(case: &Identifier, shape: &PayloadShape) -> SetBody {
    let arguments = match shape {
        PayloadShape::Unit => Vec::new(),
        PayloadShape::Single(field) => vec![SetArgument {
            label: field.label.clone(),
            source: NewValue::Whole,
        }],
        PayloadShape::Tuple(fields) => fields
            .iter()
            .enumerate()
            .map(|(i, f)| SetArgument {
                label: f.label.clone(),
                source: NewValue::Element(i),
            })
            .collect(),
    };
    SetBody { case: case.clone(), arguments }
}
