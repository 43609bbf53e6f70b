//! Basic blocks (§3).

use super::instr::Instruction;
use super::terminator::Terminator;
use serde::{Deserialize, Serialize};

/// Dense per-function block identifier, assigned in creation order (§3
/// invariant: the id set of a function's blocks is exactly `{0, .., n-1}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub const ENTRY: BlockId = BlockId(0);

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// A maximal straight-line instruction sequence ending in exactly one
/// terminator (§3, §8 invariant 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            instructions: Vec::new(),
            terminator: Terminator::Unreachable,
        }
    }

    pub fn is_sealed(&self) -> bool {
        !matches!(self.terminator, Terminator::Unreachable)
    }
}
