//! Identifier nodes.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A bare name reference, e.g. a variable, parameter, or property key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// An identifier with no corresponding source text (destructuring
    /// temporaries, synthesized rest-prop bindings).
    pub fn synthetic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: Span::synthetic(),
        }
    }
}
