use std::collections::HashSet;

use crate::ir::VariantDecl;

/// Names already declared inside a variant declaration's body.
///
/// Built once per declaration and never updated while augmenting it: case
/// names are unique, so an accessor synthesized for one case can never
/// collide with another case's accessor.
#[derive(Debug, Clone, Default)]
pub struct MemberIndex<'a> {
    names: HashSet<&'a str>,
}

impl<'a> MemberIndex<'a> {
    pub fn new(decl: &'a VariantDecl) -> Self {
        let names = decl.member_names().map(|n| n.as_str()).collect();
        Self { names }
    }
    pub fn has_member(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
