//! Compilation errors (§7).
//!
//! Three kinds: a [`CompileError`] is either a *build error* (malformed or
//! unsupported input), an *analysis error* (an internal invariant was
//! violated by a later pass — a compiler bug, not a user error), or an
//! *invariant error* (a post-condition checked explicitly after a pass and
//! found false). All three are fatal and unwind through the compilation
//! entry point without being caught by an intermediate pass.

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Build,
    Analysis,
    Invariant,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Build => "BUILD_ERROR",
            ErrorKind::Analysis => "ANALYSIS_ERROR",
            ErrorKind::Invariant => "INVARIANT_ERROR",
        }
    }
}

/// `{ kind, message, file?, line?, blockId? }` per §6's error object contract.
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", kind.as_str())]
pub struct CompileError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub block_id: Option<u32>,
}

impl CompileError {
    pub fn build(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Build,
            message: message.into(),
            file: None,
            line: None,
            block_id: None,
        }
    }

    pub fn build_at(message: impl Into<String>, file: Option<&str>, line: u32) -> Self {
        Self {
            kind: ErrorKind::Build,
            message: message.into(),
            file: file.map(str::to_string),
            line: Some(line),
            block_id: None,
        }
    }

    pub fn analysis(message: impl Into<String>, block_id: Option<u32>) -> Self {
        Self {
            kind: ErrorKind::Analysis,
            message: message.into(),
            file: None,
            line: None,
            block_id,
        }
    }

    pub fn invariant(message: impl Into<String>, block_id: Option<u32>) -> Self {
        Self {
            kind: ErrorKind::Invariant,
            message: message.into(),
            file: None,
            line: None,
            block_id,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A non-fatal diagnostic delivered through `onWarn`. Currently only build
/// errors are reported this way before being thrown; no warning is
/// recoverable yet (reserved, per §7).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Diagnostic {
    pub fn from_error(err: &CompileError) -> Self {
        Self {
            code: err.kind.as_str().to_string(),
            message: err.message.clone(),
            file: err.file.clone(),
            line: err.line,
            column: None,
        }
    }
}
