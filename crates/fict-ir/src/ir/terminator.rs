//! Block terminators — exactly one per block (§3).

use super::block::BlockId;
use super::expr::Expression;
use super::instr::DeclarationKind;
use fict_ast::Pattern;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` marks the default case; if no case is the default, control
    /// falls through to the switch's exit block.
    pub test: Option<Expression>,
    pub target: BlockId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Terminator {
    Jump {
        target: BlockId,
    },
    Branch {
        test: Expression,
        consequent: BlockId,
        alternate: BlockId,
    },
    Switch {
        discriminant: Expression,
        cases: Vec<SwitchCase>,
    },
    Return {
        argument: Option<Expression>,
    },
    Throw {
        argument: Expression,
    },
    Break {
        target: BlockId,
        label: Option<String>,
    },
    Continue {
        target: BlockId,
        label: Option<String>,
    },
    /// `for (<variable_kind>? <variable> of <iterable>) <body>`. `pattern`
    /// carries a destructured loop binding forward for the emitter (§3
    /// invariant 6 — this is the one place a `Pattern` legally survives
    /// past normalization, besides function parameters).
    ForOf {
        variable: String,
        variable_kind: Option<DeclarationKind>,
        pattern: Option<Pattern>,
        iterable: Expression,
        body: BlockId,
        exit: BlockId,
    },
    ForIn {
        variable: String,
        variable_kind: Option<DeclarationKind>,
        pattern: Option<Pattern>,
        object: Expression,
        body: BlockId,
        exit: BlockId,
    },
    Try {
        try_block: BlockId,
        catch_block: Option<BlockId>,
        catch_param: Option<String>,
        finally_block: Option<BlockId>,
        exit: BlockId,
    },
    /// Fills unsealed blocks defensively; only ever legitimate on genuinely
    /// unreachable blocks (§3 invariant 1).
    Unreachable,
}

impl Terminator {
    /// All block ids this terminator can transfer control to, in a stable
    /// order (used by SSA predecessor/successor maps and DCE of unreachable
    /// blocks).
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Jump { target } => vec![*target],
            Terminator::Branch {
                consequent,
                alternate,
                ..
            } => vec![*consequent, *alternate],
            Terminator::Switch { cases, .. } => cases.iter().map(|c| c.target).collect(),
            Terminator::Return { .. } | Terminator::Throw { .. } => vec![],
            Terminator::Break { target, .. } | Terminator::Continue { target, .. } => {
                vec![*target]
            }
            Terminator::ForOf { body, exit, .. } | Terminator::ForIn { body, exit, .. } => {
                vec![*body, *exit]
            }
            Terminator::Try {
                try_block,
                catch_block,
                finally_block,
                exit,
                ..
            } => {
                let mut out = vec![*try_block];
                out.extend(*catch_block);
                out.extend(*finally_block);
                out.push(*exit);
                out
            }
            Terminator::Unreachable => vec![],
        }
    }
}
