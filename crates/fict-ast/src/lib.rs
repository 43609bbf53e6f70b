//! AST types for the Fict reactive-UI compiler.
//!
//! This crate defines the input vocabulary the HIR builder (`fict-ir`)
//! expects (§6): a parsed program of statements and expressions, including
//! JSX, already carrying source-location metadata. Parsing itself is out of
//! scope — a parser producing this tree is an external collaborator.

pub mod expr;
pub mod ident;
pub mod pattern;
pub mod span;
pub mod stmt;

pub use expr::*;
pub use ident::Identifier;
pub use pattern::*;
pub use span::Span;
pub use stmt::*;
