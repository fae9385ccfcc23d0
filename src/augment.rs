use tracing::trace;

use crate::index::MemberIndex;
use crate::ir::{Access, Member, VariantDecl};
use crate::synth::synthesize;

/// Adds one accessor per case that has no same-named member yet.
///
/// Returns the augmented declaration and whether anything was added. When
/// nothing was added the declaration comes back equal to the input, and
/// running `augment` on its own output never adds more.
pub fn augment(decl: VariantDecl) -> (VariantDecl, bool) {
    let accessor_access = decl.access.and_then(accessor_access);
    let added = {
        let index = MemberIndex::new(&decl);
        decl.cases
            .iter()
            .filter_map(|case| {
                let accessor = synthesize(case, &index).into_accessor();
                if accessor.is_none() {
                    trace!(decl = %decl.name, case = %case.name, "member exists, skipping case");
                }
                accessor
            })
            .map(|mut accessor| {
                accessor.access = accessor_access;
                Member::Accessor(accessor)
            })
            .collect::<Vec<_>>()
    };
    if added.is_empty() {
        return (decl, false);
    }
    let mut decl = decl;
    decl.members.extend(added);
    (decl, true)
}

// `open` is only valid on classes and their members, so it degrades to `public`.
fn accessor_access(access: Access) -> Option<Access> {
    match access {
        Access::Open | Access::Public => Some(Access::Public),
        Access::Package => Some(Access::Package),
        Access::Internal | Access::Fileprivate | Access::Private => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CaseDecl, Identifier, PayloadField, TypeRef};

    fn case(name: &str, types: &[&str]) -> CaseDecl {
        CaseDecl {
            name: Identifier::new(name),
            payload: types
                .iter()
                .map(|t| PayloadField { label: None, ty: TypeRef::new(t) })
                .collect(),
        }
    }

    fn state(members: &[&str]) -> VariantDecl {
        VariantDecl {
            name: Identifier::new("State"),
            access: None,
            members: members.iter().map(|n| Member::Existing(Identifier::new(n))).collect(),
            cases: vec![
                case("idle", &[]),
                case("success", &["String"]),
                case("failure", &["Int", "String"]),
            ],
        }
    }

    fn added_names(decl: &VariantDecl) -> Vec<&str> {
        decl.accessors().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn appends_accessors_in_case_order() {
        let (out, changed) = augment(state(&["describe"]));
        assert!(changed);
        assert_eq!(added_names(&out), vec!["idle", "success", "failure"]);
        assert_eq!(out.members[0], Member::Existing(Identifier::new("describe")));
        assert_eq!(out.members.len(), 4);
    }

    #[test]
    fn skips_cases_with_existing_members() {
        let (out, changed) = augment(state(&["success"]));
        assert!(changed);
        assert_eq!(added_names(&out), vec!["idle", "failure"]);
    }

    #[test]
    fn fully_covered_declaration_is_untouched() {
        let input = state(&["idle", "success", "failure"]);
        let (out, changed) = augment(input.clone());
        assert!(!changed);
        assert_eq!(out, input);
    }

    #[test]
    fn no_cases_means_no_change() {
        let input = VariantDecl {
            name: Identifier::new("Empty"),
            access: Some(Access::Public),
            members: Vec::new(),
            cases: Vec::new(),
        };
        let (out, changed) = augment(input.clone());
        assert!(!changed);
        assert_eq!(out, input);
    }

    #[test]
    fn second_pass_adds_nothing() {
        let (once, _) = augment(state(&[]));
        let (twice, changed) = augment(once.clone());
        assert!(!changed);
        assert_eq!(twice, once);
    }

    #[test]
    fn mirrors_public_access() {
        let mut decl = state(&[]);
        decl.access = Some(Access::Open);
        let (out, _) = augment(decl);
        assert!(out.accessors().all(|a| a.access == Some(Access::Public)));

        let mut decl = state(&[]);
        decl.access = Some(Access::Private);
        let (out, _) = augment(decl);
        assert!(out.accessors().all(|a| a.access.is_none()));
    }
}
