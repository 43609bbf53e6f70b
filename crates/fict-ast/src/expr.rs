//! Expression AST nodes (§3, §6).
//!
//! Type-assertion and non-null wrappers (`expr as T`, `expr!`) and
//! parenthesized expressions are transparent at this layer — the normalizer
//! unwraps them before HIR construction ever sees them, so `Expr` has no
//! variant for either.

use crate::ident::Identifier;
use crate::pattern::Pattern;
use crate::span::Span;
use crate::stmt::Stmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
    NumberLiteral(NumberLiteral),
    BooleanLiteral(BooleanLiteral),
    NullLiteral(Span),
    BigIntLiteral(BigIntLiteral),
    RegExpLiteral(RegExpLiteral),
    TemplateLiteral(TemplateLiteral),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Logical(LogicalExpression),
    Conditional(ConditionalExpression),
    Assignment(AssignmentExpression),
    Update(UpdateExpression),
    Call(CallExpression),
    OptionalCall(CallExpression),
    New(NewExpression),
    Member(MemberExpression),
    OptionalMember(MemberExpression),
    Array(ArrayExpression),
    Object(ObjectExpression),
    Spread(SpreadElement),
    Sequence(SequenceExpression),
    Await(AwaitExpression),
    Yield(YieldExpression),
    Arrow(ArrowFunctionExpression),
    Function(FunctionExpression),
    TaggedTemplate(TaggedTemplateExpression),
    Class(ClassExpression),
    Jsx(JsxExpression),
    This(Span),
    Super(Span),
    Import(ImportExpression),
    MetaProperty(MetaProperty),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier(e) => e.span,
            Expr::StringLiteral(e) => e.span,
            Expr::NumberLiteral(e) => e.span,
            Expr::BooleanLiteral(e) => e.span,
            Expr::NullLiteral(span) => *span,
            Expr::BigIntLiteral(e) => e.span,
            Expr::RegExpLiteral(e) => e.span,
            Expr::TemplateLiteral(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Logical(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::Update(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::OptionalCall(e) => e.span,
            Expr::New(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::OptionalMember(e) => e.span,
            Expr::Array(e) => e.span,
            Expr::Object(e) => e.span,
            Expr::Spread(e) => e.span,
            Expr::Sequence(e) => e.span,
            Expr::Await(e) => e.span,
            Expr::Yield(e) => e.span,
            Expr::Arrow(e) => e.span,
            Expr::Function(e) => e.span,
            Expr::TaggedTemplate(e) => e.span,
            Expr::Class(e) => e.span,
            Expr::Jsx(e) => e.span(),
            Expr::This(span) => *span,
            Expr::Super(span) => *span,
            Expr::Import(e) => e.span,
            Expr::MetaProperty(e) => e.span,
        }
    }

    /// True for literal forms; used by the normalizer's bare-identifier
    /// elision check for destructuring temporaries.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expr::StringLiteral(_)
                | Expr::NumberLiteral(_)
                | Expr::BooleanLiteral(_)
                | Expr::NullLiteral(_)
                | Expr::BigIntLiteral(_)
                | Expr::RegExpLiteral(_)
        )
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, Expr::Identifier(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

/// Stored as source digits rather than a fixed-width integer since BigInt
/// values are opaque to this pipeline — only folded when both operands are
/// present and the emitter's numeric semantics are not required here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigIntLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegExpLiteral {
    pub pattern: String,
    pub flags: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLiteral {
    /// `quasis.len() == expressions.len() + 1`.
    pub quasis: Vec<String>,
    pub expressions: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOp,
    pub argument: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    In,
    Instanceof,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    NullishCoalesce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpression {
    pub operator: LogicalOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpression {
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
}

/// `left` is either an object/array `Pattern` (destructuring assignment,
/// expanded by the normalizer before HIR construction ever sees it) or a
/// plain identifier/member expression target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignmentTarget {
    Identifier(Identifier),
    Member(MemberExpression),
    Pattern(Pattern),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentExpression {
    pub operator: AssignmentOp,
    pub left: AssignmentTarget,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpression {
    pub operator: UpdateOp,
    pub argument: Box<Expr>,
    pub prefix: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Box<Expr>,
    pub arguments: Vec<Argument>,
    /// Set when the callee carries a leading `/* @__PURE__ */` comment.
    pub pure: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Expr(Expr),
    Spread(SpreadElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpression {
    pub callee: Box<Expr>,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberKey {
    Identifier(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpression {
    pub object: Box<Expr>,
    pub property: MemberKey,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpression {
    pub elements: Vec<Option<Argument>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyKey {
    Identifier(String),
    String(String),
    Number(f64),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub key: PropertyKey,
    pub value: Expr,
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectPropertyOrSpread {
    Property(ObjectProperty),
    Spread(SpreadElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectPropertyOrSpread>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadElement {
    pub argument: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceExpression {
    pub expressions: Vec<Expr>,
    pub span: Span,
}

/// Opaque to control-flow lowering — preserved verbatim for the emitter (§9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwaitExpression {
    pub argument: Box<Expr>,
    pub span: Span,
}

/// Opaque to control-flow lowering — preserved verbatim for the emitter (§9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldExpression {
    pub argument: Option<Box<Expr>>,
    pub delegate: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    Expression(Box<Expr>),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowFunctionExpression {
    pub params: Vec<Pattern>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub span: Span,
}

/// Function expressions are always block-bodied, unlike arrows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpression {
    pub name: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: Vec<Stmt>,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedTemplateExpression {
    pub tag: Box<Expr>,
    pub quasi: TemplateLiteral,
    pub span: Span,
}

/// Class bodies are not analyzed by this pipeline; the expression is carried
/// opaquely so the emitter can reproduce it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassExpression {
    pub name: Option<Identifier>,
    pub super_class: Option<Box<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportExpression {
    pub argument: Box<Expr>,
    pub span: Span,
}

/// `import.meta`, `new.target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaProperty {
    pub meta: String,
    pub property: String,
    pub span: Span,
}

// --- JSX -------------------------------------------------------------------

/// JSX tag names are `string | Expression` in the source grammar; modeled as
/// a discriminated sum per the casing convention (lowercase-first ⇒
/// intrinsic DOM tag, uppercase-first ⇒ component reference) and carried
/// alongside the parser's own `is_component` flag rather than re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxTagName {
    Intrinsic(String),
    Component(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttributeValue {
    StringLiteral(String),
    Expression(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxAttribute {
    pub name: String,
    pub value: Option<JsxAttributeValue>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttributeOrSpread {
    Attribute(JsxAttribute),
    Spread(SpreadElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxChild {
    Element(Box<JsxElement>),
    Fragment(Box<JsxFragment>),
    ExpressionContainer(Box<Expr>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxElement {
    pub tag_name: JsxTagName,
    pub is_component: bool,
    pub attributes: Vec<JsxAttributeOrSpread>,
    pub children: Vec<JsxChild>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxFragment {
    pub children: Vec<JsxChild>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxExpression {
    Element(JsxElement),
    Fragment(JsxFragment),
}

impl JsxExpression {
    pub fn span(&self) -> Span {
        match self {
            JsxExpression::Element(e) => e.span,
            JsxExpression::Fragment(f) => f.span,
        }
    }
}
