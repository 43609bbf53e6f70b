//! Destructuring pattern nodes.
//!
//! Patterns occur in variable declarators, function parameters, `for-of`/
//! `for-in` bindings, and as the left side of destructuring assignment
//! expressions. The HIR builder expands all of these into plain assignments
//! and member loads (§4.1) — by the time IR exists, `Pattern` only survives
//! on `ForOf`/`ForIn` terminators, per the data-model invariants.

use crate::expr::Expr;
use crate::ident::Identifier;
use crate::span::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    Identifier(Identifier),
    Array(ArrayPattern),
    Object(ObjectPattern),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(id) => id.span,
            Pattern::Array(p) => p.span,
            Pattern::Object(p) => p.span,
        }
    }

    /// All leaf identifiers bound by this pattern, in source order. Used to
    /// flatten destructured function parameters into `Function::params`.
    pub fn leaf_names(&self) -> Vec<&Identifier> {
        let mut out = Vec::new();
        self.collect_leaf_names(&mut out);
        out
    }

    fn collect_leaf_names<'a>(&'a self, out: &mut Vec<&'a Identifier>) {
        match self {
            Pattern::Identifier(id) => out.push(id),
            Pattern::Array(p) => {
                for el in p.elements.iter().flatten() {
                    el.pattern.collect_leaf_names(out);
                }
                if let Some(rest) = &p.rest {
                    rest.collect_leaf_names(out);
                }
            }
            Pattern::Object(p) => {
                for prop in &p.properties {
                    prop.value.collect_leaf_names(out);
                }
                if let Some(rest) = &p.rest {
                    out.push(rest);
                }
            }
        }
    }
}

/// `[a, b = 1, , ...rest]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayPattern {
    /// `None` marks an elided element (`[a, , c]`).
    pub elements: Vec<Option<PatternElement>>,
    pub rest: Option<Box<Pattern>>,
    pub span: Span,
}

/// `{ a, b: renamed, c = 1, ...rest }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub rest: Option<Identifier>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatternProperty {
    /// Source property key (`b` in `{ b: renamed }`).
    pub key: String,
    pub value: Pattern,
    pub default: Option<Expr>,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternElement {
    pub pattern: Pattern,
    pub default: Option<Expr>,
    pub span: Span,
}
