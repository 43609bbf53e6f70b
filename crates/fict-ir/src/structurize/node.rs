//! The structured-tree data model (§4.3): the output of the structurizer,
//! shaped so the region analyzer and optimizer can walk nested control flow
//! directly instead of rediscovering it from the CFG each time.

use crate::ir::block::BlockId;
use crate::ir::expr::Expression;
use crate::ir::instr::{DeclarationKind, Instruction};
use fict_ast::Pattern;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructuredNode {
    Sequence(Vec<StructuredNode>),
    Block(Vec<StructuredNode>),
    /// Carries the originating block id alongside the instruction so region
    /// analysis (§4.4) can still report which blocks a region spans.
    Instruction(BlockId, Instruction),
    If {
        test: Expression,
        consequent: Box<StructuredNode>,
        alternate: Option<Box<StructuredNode>>,
    },
    /// Test-at-top loop. Both `while` and `for` lower to this shape in the
    /// CFG (the `for`'s update expression is indistinguishable, after
    /// construction, from an ordinary trailing body statement — see
    /// `DESIGN.md`); a dedicated `For` node is not produced by this pass.
    While {
        test: Expression,
        body: Box<StructuredNode>,
    },
    DoWhile {
        body: Box<StructuredNode>,
        test: Expression,
    },
    ForOf {
        variable: String,
        variable_kind: Option<DeclarationKind>,
        pattern: Option<Pattern>,
        iterable: Expression,
        body: Box<StructuredNode>,
    },
    ForIn {
        variable: String,
        variable_kind: Option<DeclarationKind>,
        pattern: Option<Pattern>,
        object: Expression,
        body: Box<StructuredNode>,
    },
    Switch {
        discriminant: Expression,
        cases: Vec<SwitchCaseNode>,
    },
    Try {
        block: Box<StructuredNode>,
        handler: Option<TryHandlerNode>,
        finalizer: Option<Box<StructuredNode>>,
    },
    Return {
        argument: Option<Expression>,
    },
    Throw {
        argument: Expression,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCaseNode {
    pub test: Option<Expression>,
    pub body: StructuredNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryHandlerNode {
    pub param: Option<String>,
    pub body: StructuredNode,
}

/// A function whose body has been structurized. Mirrors `ir::Function`
/// minus the block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredFunction {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub meta: crate::ir::function::FunctionMeta,
    pub body: StructuredNode,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredProgram {
    pub functions: Vec<StructuredFunction>,
}
