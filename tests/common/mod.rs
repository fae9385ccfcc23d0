//! A tiny evaluator for synthesized accessor bodies, so the get/set laws can
//! be checked without a Swift toolchain.
#![allow(dead_code)]

use enum_props::ir::{AccessorDecl, CaseDecl, NewValue, PayloadExpr};

/// An enum value: the active case and its constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub case: String,
    pub args: Vec<(Option<String>, String)>,
}

/// What an accessor hands out when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Unit,
    One(String),
    Tuple(Vec<(Option<String>, String)>),
}

/// `.case(label: v, ...)` built with the case's declared labels.
pub fn construct(case: &CaseDecl, values: &[String]) -> Value {
    assert_eq!(case.payload.len(), values.len());
    Value {
        case: case.name.to_string(),
        args: case
            .payload
            .iter()
            .zip(values)
            .map(|(f, v)| (f.label.as_ref().map(|l| l.to_string()), v.clone()))
            .collect(),
    }
}

/// The payload a caller would pass to the setter to mean `values`.
pub fn payload_for(case: &CaseDecl, values: &[String]) -> Payload {
    match values {
        [] => Payload::Unit,
        [one] => Payload::One(one.clone()),
        many => Payload::Tuple(
            case.payload
                .iter()
                .zip(many)
                .map(|(f, v)| (f.label.as_ref().map(|l| l.to_string()), v.clone()))
                .collect(),
        ),
    }
}

pub fn get(accessor: &AccessorDecl, value: &Value) -> Option<Payload> {
    let body = &accessor.get_body;
    if value.case != body.case.as_str() {
        return None;
    }
    // pattern bindings are positional
    let bound = |name: &str| -> String {
        let at = body
            .bindings
            .iter()
            .position(|b| b.as_str() == name)
            .expect("unbound name");
        value.args[at].1.clone()
    };
    Some(match &body.result {
        PayloadExpr::Unit => Payload::Unit,
        PayloadExpr::Binding(name) => Payload::One(bound(name.as_str())),
        PayloadExpr::Tuple(elems) => Payload::Tuple(
            elems
                .iter()
                .map(|(label, name)| (label.as_ref().map(|l| l.to_string()), bound(name.as_str())))
                .collect(),
        ),
    })
}

pub fn set(accessor: &AccessorDecl, value: &mut Value, new_value: Option<Payload>) {
    let body = accessor.set_body.as_ref().expect("setter");
    let Some(new_value) = new_value else {
        return;
    };
    let args = body
        .arguments
        .iter()
        .map(|arg| {
            let v = match (arg.source, &new_value) {
                (NewValue::Whole, Payload::One(v)) => v.clone(),
                (NewValue::Element(i), Payload::Tuple(elems)) => elems[i].1.clone(),
                (source, payload) => panic!("{source:?} does not fit {payload:?}"),
            };
            (arg.label.as_ref().map(|l| l.to_string()), v)
        })
        .collect();
    *value = Value { case: body.case.to_string(), args };
}
