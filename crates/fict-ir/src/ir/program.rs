//! Top-level program IR (§3).

use super::function::Function;
use fict_ast::{ImportDeclaration, Stmt};
use serde::{Deserialize, Serialize};

/// A postamble entry: either a recognized export wrapper around a lowered
/// function, or some other top-level statement preserved verbatim because
/// the core does not analyze it (§3, §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostambleEntry {
    ExportFunction { name: String },
    ExportDefault { name: String },
    Verbatim(Stmt),
}

/// `{ preamble, functions, postamble }` (§3). Preamble and postamble are
/// opaque carriers — the core never analyzes their contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub preamble: Vec<ImportDeclaration>,
    pub functions: Vec<Function>,
    pub postamble: Vec<PostambleEntry>,
}
