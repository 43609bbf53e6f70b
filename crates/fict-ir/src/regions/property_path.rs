//! Property-path extraction for dependency sets (§4.4).

use crate::ir::expr::Expression;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPath(pub Vec<String>);

impl PropertyPath {
    pub fn root(&self) -> &str {
        &self.0[0]
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Builds the property path an expression reads, collapsing at the first
/// optional-chain segment: `props?.user?.profile?.title` contributes
/// `props`, not the full chain.
pub fn property_path(expr: &Expression) -> Option<PropertyPath> {
    segments(expr).map(|(path, _)| PropertyPath(path))
}

/// Returns the accumulated path plus whether it has already been collapsed
/// by an optional-chain segment (in which case an enclosing plain `Member`
/// must not extend it further).
fn segments(expr: &Expression) -> Option<(Vec<String>, bool)> {
    match expr {
        Expression::Identifier(id) => Some((vec![id.name.clone()], false)),
        Expression::Member(m) => {
            let (base, collapsed) = segments(&m.object)?;
            if collapsed {
                return Some((base, true));
            }
            let key = m.static_key()?;
            let mut path = base;
            path.push(key.to_string());
            Some((path, false))
        }
        Expression::OptionalMember(m) => {
            let (base, _) = segments(&m.object)?;
            Some((base, true))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::expr::{IdentifierExpr, MemberExpr, MemberKey};
    use fict_ast::Span;

    fn ident(name: &str) -> Expression {
        Expression::Identifier(IdentifierExpr::new(name, Span::synthetic()))
    }

    fn member(object: Expression, key: &str) -> Expression {
        Expression::Member(MemberExpr {
            object: Box::new(object),
            property: MemberKey::Identifier(key.to_string()),
            span: Span::synthetic(),
        })
    }

    fn optional_member(object: Expression, key: &str) -> Expression {
        Expression::OptionalMember(MemberExpr {
            object: Box::new(object),
            property: MemberKey::Identifier(key.to_string()),
            span: Span::synthetic(),
        })
    }

    #[test]
    fn plain_chain() {
        let expr = member(member(ident("props"), "user"), "name");
        assert_eq!(property_path(&expr).unwrap().to_string(), "props.user.name");
    }

    #[test]
    fn optional_chain_collapses_at_first_optional() {
        let expr = optional_member(
            optional_member(optional_member(ident("props"), "user"), "profile"),
            "title",
        );
        assert_eq!(property_path(&expr).unwrap().to_string(), "props");
    }

    #[test]
    fn mixed_chain_collapses_from_first_optional_onward() {
        let expr = member(optional_member(ident("props"), "user"), "profile");
        assert_eq!(property_path(&expr).unwrap().to_string(), "props");
    }

    #[test]
    fn computed_member_has_no_static_path() {
        let expr = Expression::Member(MemberExpr {
            object: Box::new(ident("props")),
            property: MemberKey::Computed(Box::new(ident("key"))),
            span: Span::synthetic(),
        });
        assert!(property_path(&expr).is_none());
    }
}
