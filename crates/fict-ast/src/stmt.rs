//! Statement and top-level program AST nodes (§3, §6).

use crate::expr::Expr;
use crate::ident::Identifier;
use crate::pattern::Pattern;
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A parsed source file, ready for §4.1 normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Leading directive prologue strings (`"use pure"`, `"use no memo"`, …).
    pub directives: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub kind: DeclarationKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub params: Vec<Pattern>,
    pub body: Vec<Stmt>,
    /// Leading directive-prologue entries of the function body.
    pub directives: Vec<String>,
    /// Leading comment text above the declaration, used to detect
    /// `@__PURE__`/`@#__PURE__` and `@fictReturn` annotations.
    pub leading_comments: Vec<String>,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    pub default: Option<Identifier>,
    pub namespace: Option<Identifier>,
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportDeclaration {
    /// `export const x = …` / `export function f() {}`.
    Named {
        declaration: Box<Stmt>,
        span: Span,
    },
    /// `export { a, b as c }`.
    NamedSpecifiers {
        specifiers: Vec<ExportSpecifier>,
        span: Span,
    },
    /// `export default function f() {}` / `export default class {}`.
    DefaultDeclaration { declaration: Box<Stmt>, span: Span },
    /// `export default <expr>`.
    DefaultExpression { expression: Box<Expr>, span: Span },
}

impl ExportDeclaration {
    pub fn span(&self) -> Span {
        match self {
            ExportDeclaration::Named { span, .. } => *span,
            ExportDeclaration::NamedSpecifiers { span, .. } => *span,
            ExportDeclaration::DefaultDeclaration { span, .. } => *span,
            ExportDeclaration::DefaultExpression { span, .. } => *span,
        }
    }
}

/// Class bodies are opaque to this pipeline (§3); only enough is retained to
/// preserve the declaration in postamble/preamble output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: Identifier,
    pub super_class: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStatement {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub test: Expr,
    pub consequent: Box<Stmt>,
    pub alternate: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// `None` denotes the `default:` case.
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub test: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoWhileStatement {
    pub body: Box<Stmt>,
    pub test: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    VariableDeclaration(VariableDeclaration),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// Left-hand binding of a `for-of`/`for-in` loop. `kind` is `None` when the
/// loop assigns into a pre-existing binding rather than declaring a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForBinding {
    pub kind: Option<DeclarationKind>,
    pub pattern: Pattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForOfStatement {
    pub left: ForBinding,
    pub right: Expr,
    pub body: Box<Stmt>,
    pub is_await: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForInStatement {
    pub left: ForBinding,
    pub right: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakStatement {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinueStatement {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub argument: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowStatement {
    pub argument: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStatement {
    pub block: Vec<Stmt>,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<Vec<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStatement {
    pub label: String,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Import(ImportDeclaration),
    Export(ExportDeclaration),
    VariableDecl(VariableDeclaration),
    FunctionDecl(FunctionDeclaration),
    ClassDecl(ClassDeclaration),
    Expression(ExpressionStatement),
    Block(BlockStatement),
    If(IfStatement),
    Switch(SwitchStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    ForOf(ForOfStatement),
    ForIn(ForInStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Return(ReturnStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    Labeled(LabeledStatement),
    Empty(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Import(s) => s.span,
            Stmt::Export(s) => s.span(),
            Stmt::VariableDecl(s) => s.span,
            Stmt::FunctionDecl(s) => s.span,
            Stmt::ClassDecl(s) => s.span,
            Stmt::Expression(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForOf(s) => s.span,
            Stmt::ForIn(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Labeled(s) => s.span,
            Stmt::Empty(span) => *span,
        }
    }
}
