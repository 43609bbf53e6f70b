//! The HIR expression tree (§3).
//!
//! Structurally close to `fict_ast::Expr`, but: macro-callee identifiers are
//! already canonicalized, purity/optional-chaining flags are first-class
//! fields rather than something a later pass has to rediscover, and arrow
//! and function bodies that need control flow have already been lowered to
//! a basic-block list rather than carrying a statement `Vec`.

use fict_ast::Span;

pub use fict_ast::{AssignmentOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};

use super::block::BasicBlock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Identifier(IdentifierExpr),
    StringLiteral(StringLit),
    NumberLiteral(NumberLit),
    BooleanLiteral(BoolLit),
    NullLiteral(Span),
    BigIntLiteral(BigIntLit),
    RegExpLiteral(RegExpLit),
    TemplateLiteral(TemplateLit),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Conditional(ConditionalExpr),
    Assignment(AssignmentExpr),
    Update(UpdateExpr),
    Call(CallExpr),
    OptionalCall(CallExpr),
    New(NewExpr),
    Member(MemberExpr),
    OptionalMember(MemberExpr),
    Array(ArrayExpr),
    Object(ObjectExpr),
    Spread(SpreadExpr),
    Sequence(SequenceExpr),
    Await(AwaitExpr),
    Yield(YieldExpr),
    Arrow(ArrowExpr),
    Function(FunctionExpr),
    TaggedTemplate(TaggedTemplateExpr),
    Class(ClassExpr),
    Jsx(JsxExpr),
    This(Span),
    Super(Span),
    Import(ImportExpr),
    MetaProperty(MetaPropertyExpr),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(e) => e.span,
            Expression::StringLiteral(e) => e.span,
            Expression::NumberLiteral(e) => e.span,
            Expression::BooleanLiteral(e) => e.span,
            Expression::NullLiteral(span) => *span,
            Expression::BigIntLiteral(e) => e.span,
            Expression::RegExpLiteral(e) => e.span,
            Expression::TemplateLiteral(e) => e.span,
            Expression::Unary(e) => e.span,
            Expression::Binary(e) => e.span,
            Expression::Logical(e) => e.span,
            Expression::Conditional(e) => e.span,
            Expression::Assignment(e) => e.span,
            Expression::Update(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::OptionalCall(e) => e.span,
            Expression::New(e) => e.span,
            Expression::Member(e) => e.span,
            Expression::OptionalMember(e) => e.span,
            Expression::Array(e) => e.span,
            Expression::Object(e) => e.span,
            Expression::Spread(e) => e.span,
            Expression::Sequence(e) => e.span,
            Expression::Await(e) => e.span,
            Expression::Yield(e) => e.span,
            Expression::Arrow(e) => e.span,
            Expression::Function(e) => e.span,
            Expression::TaggedTemplate(e) => e.span,
            Expression::Class(e) => e.span,
            Expression::Jsx(e) => e.span(),
            Expression::This(span) => *span,
            Expression::Super(span) => *span,
            Expression::Import(e) => e.span,
            Expression::MetaProperty(e) => e.span,
        }
    }

    /// Identifier name if this expression is a bare reference, for
    /// dependency/property-path construction (§4.4).
    pub fn as_identifier_name(&self) -> Option<&str> {
        match self {
            Expression::Identifier(id) => Some(&id.name),
            _ => None,
        }
    }

    /// Side-effect-free per §4.5 DCE: literal, identifier, a side-effect-free
    /// member load, a purity-annotated call, or a composition of those.
    pub fn is_side_effect_free(&self) -> bool {
        match self {
            Expression::Identifier(_)
            | Expression::StringLiteral(_)
            | Expression::NumberLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::RegExpLiteral(_)
            | Expression::This(_)
            | Expression::Super(_) => true,
            Expression::Member(m) | Expression::OptionalMember(m) => {
                m.object.is_side_effect_free()
                    && match &m.property {
                        MemberKey::Identifier(_) => true,
                        MemberKey::Computed(e) => e.is_side_effect_free(),
                    }
            }
            Expression::Unary(e) => e.argument.is_side_effect_free(),
            Expression::Binary(e) => e.left.is_side_effect_free() && e.right.is_side_effect_free(),
            Expression::Logical(e) => e.left.is_side_effect_free() && e.right.is_side_effect_free(),
            Expression::Conditional(e) => {
                e.test.is_side_effect_free()
                    && e.consequent.is_side_effect_free()
                    && e.alternate.is_side_effect_free()
            }
            Expression::Array(e) => e.elements.iter().flatten().all(|el| el.is_side_effect_free()),
            Expression::TemplateLiteral(e) => e.expressions.iter().all(Expression::is_side_effect_free),
            Expression::Call(c) | Expression::OptionalCall(c) => c.pure,
            Expression::Sequence(s) => s.expressions.iter().all(Expression::is_side_effect_free),
            Expression::Arrow(_) | Expression::Function(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierExpr {
    pub name: String,
    pub span: Span,
}

impl IdentifierExpr {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLit {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLit {
    pub value: f64,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolLit {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigIntLit {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegExpLit {
    pub pattern: String,
    pub flags: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLit {
    pub quasis: Vec<String>,
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub operator: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpr {
    pub operator: LogicalOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalExpr {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub span: Span,
}

/// An assignment surviving into an expression position after destructuring
/// has been expanded (§4.1 invariant 6): `left` is always a simple name or
/// member target, never a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignmentTarget {
    Identifier(String),
    Member(MemberExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentExpr {
    pub operator: AssignmentOp,
    pub left: AssignmentTarget,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpr {
    pub operator: UpdateOp,
    pub argument: Box<Expression>,
    pub prefix: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    /// `true` when the callee carries a leading `/* @__PURE__ */` comment.
    pub pure: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpr {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberKey {
    Identifier(String),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpr {
    pub object: Box<Expression>,
    pub property: MemberKey,
    pub span: Span,
}

impl MemberExpr {
    /// The static key name, for member loads with a literal/identifier
    /// property — the only ones that contribute a property path (§4.4).
    pub fn static_key(&self) -> Option<&str> {
        match &self.property {
            MemberKey::Identifier(name) => Some(name),
            MemberKey::Computed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpr {
    pub elements: Vec<Option<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyKey {
    Identifier(String),
    String(String),
    Number(f64),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectProp {
    Property {
        key: PropertyKey,
        value: Expression,
        shorthand: bool,
    },
    Spread(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectExpr {
    pub properties: Vec<ObjectProp>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadExpr {
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceExpr {
    pub expressions: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwaitExpr {
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldExpr {
    pub argument: Option<Box<Expression>>,
    pub delegate: bool,
    pub span: Span,
}

/// Either a plain expression body (no control flow to lower) or a
/// basic-block list produced by recursively running the HIR builder over a
/// block-bodied arrow (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    Expression(Box<Expression>),
    Blocks(Vec<BasicBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowExpr {
    pub params: Vec<String>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub span: Span,
}

/// Function expressions are always block-bodied (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpr {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub blocks: Vec<BasicBlock>,
    pub is_async: bool,
    pub is_generator: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedTemplateExpr {
    pub tag: Box<Expression>,
    pub quasi: TemplateLit,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassExpr {
    pub name: Option<String>,
    pub super_class: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportExpr {
    pub argument: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaPropertyExpr {
    pub meta: String,
    pub property: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxTagName {
    Intrinsic(String),
    Component(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttributeValue {
    StringLiteral(String),
    Expression(Box<Expression>),
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
    Spread(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxChild {
    Element(Box<JsxElement>),
    Fragment(Box<JsxFragment>),
    ExpressionContainer(Box<Expression>),
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
pub enum JsxExpr {
    Element(JsxElement),
    Fragment(JsxFragment),
}

impl JsxExpr {
    pub fn span(&self) -> Span {
        match self {
            JsxExpr::Element(e) => e.span,
            JsxExpr::Fragment(f) => f.span,
        }
    }
}
