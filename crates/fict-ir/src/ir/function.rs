//! Function-level IR (§3).

use super::block::BasicBlock;
use fict_ast::Span;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// The accessor role a `@fictReturn` annotation assigns to a return value
/// (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorRole {
    Signal,
    Memo,
}

impl AccessorRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "signal" => Some(AccessorRole::Signal),
            "memo" => Some(AccessorRole::Memo),
            _ => None,
        }
    }
}

/// The parsed `@fictReturn` annotation (§3, §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HookReturnInfo {
    DirectAccessor(AccessorRole),
    ObjectProps(FxHashMap<String, AccessorRole>),
    ArrayProps(FxHashMap<u32, AccessorRole>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionMeta {
    /// Set by an enclosing `"use no memo"` directive or a leading
    /// `@__PURE__`/`@#__PURE__` comment.
    pub no_memo: bool,
    /// Set by `"use pure"` or a purity comment (§4.1).
    pub pure: bool,
    pub is_async: bool,
    pub hook_return_info: Option<HookReturnInfo>,
    /// `true` when this function was lowered from a `const`-bound function
    /// or arrow expression rather than a `function` declaration.
    pub from_expression: bool,
    pub is_arrow: bool,
    pub has_expression_body: bool,
}

/// A lowered, CFG-form function (§3). `params` is the flattened leaf-name
/// list produced by destructuring expansion (§4.1); the original parameter
/// patterns are kept on the side (`original_params`) for the emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub original_params: Vec<fict_ast::Pattern>,
    pub blocks: Vec<BasicBlock>,
    pub meta: FunctionMeta,
    pub span: Span,
}

impl Function {
    pub fn entry_block(&self) -> &BasicBlock {
        &self.blocks[0]
    }

    pub fn block(&self, id: super::block::BlockId) -> &BasicBlock {
        &self.blocks[id.as_u32() as usize]
    }

    pub fn block_mut(&mut self, id: super::block::BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.as_u32() as usize]
    }
}
