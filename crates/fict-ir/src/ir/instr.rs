//! Linear (non-terminator) instructions (§3).

use super::block::BlockId;
use super::expr::{Expression, IdentifierExpr};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
    Function,
}

impl From<fict_ast::DeclarationKind> for DeclarationKind {
    fn from(kind: fict_ast::DeclarationKind) -> Self {
        match kind {
            fict_ast::DeclarationKind::Const => DeclarationKind::Const,
            fict_ast::DeclarationKind::Let => DeclarationKind::Let,
            fict_ast::DeclarationKind::Var => DeclarationKind::Var,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhiSource {
    pub block: BlockId,
    pub id: IdentifierExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// `target = value`.
    Assign {
        target: IdentifierExpr,
        value: Expression,
        declaration_kind: Option<DeclarationKind>,
    },
    /// An expression evaluated for its side effects; the result is
    /// discarded.
    Expression { value: Expression },
    /// A join-point placeholder inserted by the SSA pass (§4.2). `variable`
    /// is the pre-SSA base name; `sources` is ordered by predecessor block
    /// id ascending.
    Phi {
        target: IdentifierExpr,
        variable: String,
        sources: Vec<PhiSource>,
    },
}

impl Instruction {
    /// The name this instruction defines, if any.
    pub fn defined_name(&self) -> Option<&str> {
        match self {
            Instruction::Assign { target, .. } => Some(&target.name),
            Instruction::Phi { target, .. } => Some(&target.name),
            Instruction::Expression { .. } => None,
        }
    }

    pub fn value_expr(&self) -> Option<&Expression> {
        match self {
            Instruction::Assign { value, .. } => Some(value),
            Instruction::Expression { value } => Some(value),
            Instruction::Phi { .. } => None,
        }
    }

    pub fn value_expr_mut(&mut self) -> Option<&mut Expression> {
        match self {
            Instruction::Assign { value, .. } => Some(value),
            Instruction::Expression { value } => Some(value),
            Instruction::Phi { .. } => None,
        }
    }
}
