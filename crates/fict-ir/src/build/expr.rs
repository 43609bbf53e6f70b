//! Expression lowering (§3, §4.1): converts `fict_ast::Expr` into the HIR
//! `Expression` tree, canonicalizing macro-alias callees and recursing into
//! nested function/arrow bodies through a fresh [`Builder`].

use super::Builder;
use crate::error::CompileResult;
use crate::ir::expr::{
    ArrayExpr, ArrowBody, ArrowExpr, AssignmentExpr, AssignmentTarget, AwaitExpr, BigIntLit,
    BinaryExpr, BoolLit, CallExpr, ClassExpr, ConditionalExpr, FunctionExpr, IdentifierExpr,
    ImportExpr, JsxAttribute, JsxAttributeOrSpread, JsxAttributeValue, JsxChild, JsxElement,
    JsxExpr, JsxFragment, JsxTagName, LogicalExpr, MemberExpr, MemberKey, MetaPropertyExpr,
    NewExpr, NumberLit, ObjectExpr, ObjectProp, PropertyKey, RegExpLit, SequenceExpr, SpreadExpr,
    StringLit, TaggedTemplateExpr, TemplateLit, UnaryExpr, UpdateExpr, YieldExpr,
};
use crate::ir::terminator::Terminator;
use crate::ir::Expression;
use fict_ast as ast;

impl<'a, 'w> Builder<'a, 'w> {
    pub(super) fn lower_expr(&mut self, expr: &ast::Expr) -> CompileResult<Expression> {
        match expr {
            ast::Expr::Identifier(id) => {
                Ok(Expression::Identifier(IdentifierExpr::new(id.name.clone(), id.span)))
            }
            ast::Expr::StringLiteral(s) => {
                Ok(Expression::StringLiteral(StringLit { value: s.value.clone(), span: s.span }))
            }
            ast::Expr::NumberLiteral(n) => {
                Ok(Expression::NumberLiteral(NumberLit { value: n.value, span: n.span }))
            }
            ast::Expr::BooleanLiteral(b) => {
                Ok(Expression::BooleanLiteral(BoolLit { value: b.value, span: b.span }))
            }
            ast::Expr::NullLiteral(span) => Ok(Expression::NullLiteral(*span)),
            ast::Expr::BigIntLiteral(b) => {
                Ok(Expression::BigIntLiteral(BigIntLit { value: b.value.clone(), span: b.span }))
            }
            ast::Expr::RegExpLiteral(r) => Ok(Expression::RegExpLiteral(RegExpLit {
                pattern: r.pattern.clone(),
                flags: r.flags.clone(),
                span: r.span,
            })),
            ast::Expr::TemplateLiteral(t) => {
                let expressions = t
                    .expressions
                    .iter()
                    .map(|e| self.lower_expr(e))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Expression::TemplateLiteral(TemplateLit {
                    quasis: t.quasis.clone(),
                    expressions,
                    span: t.span,
                }))
            }
            ast::Expr::Unary(u) => Ok(Expression::Unary(UnaryExpr {
                operator: u.operator,
                argument: Box::new(self.lower_expr(&u.argument)?),
                span: u.span,
            })),
            ast::Expr::Binary(b) => Ok(Expression::Binary(BinaryExpr {
                operator: b.operator,
                left: Box::new(self.lower_expr(&b.left)?),
                right: Box::new(self.lower_expr(&b.right)?),
                span: b.span,
            })),
            ast::Expr::Logical(l) => Ok(Expression::Logical(LogicalExpr {
                operator: l.operator,
                left: Box::new(self.lower_expr(&l.left)?),
                right: Box::new(self.lower_expr(&l.right)?),
                span: l.span,
            })),
            ast::Expr::Conditional(c) => Ok(Expression::Conditional(ConditionalExpr {
                test: Box::new(self.lower_expr(&c.test)?),
                consequent: Box::new(self.lower_expr(&c.consequent)?),
                alternate: Box::new(self.lower_expr(&c.alternate)?),
                span: c.span,
            })),
            ast::Expr::Assignment(assign) => self.lower_assignment(assign),
            ast::Expr::Update(u) => Ok(Expression::Update(UpdateExpr {
                operator: u.operator,
                argument: Box::new(self.lower_expr(&u.argument)?),
                prefix: u.prefix,
                span: u.span,
            })),
            ast::Expr::Call(c) => {
                let callee = Box::new(self.lower_callee(&c.callee)?);
                let arguments = self.lower_arguments(&c.arguments)?;
                Ok(Expression::Call(CallExpr { callee, arguments, pure: c.pure, span: c.span }))
            }
            ast::Expr::OptionalCall(c) => {
                let callee = Box::new(self.lower_callee(&c.callee)?);
                let arguments = self.lower_arguments(&c.arguments)?;
                Ok(Expression::OptionalCall(CallExpr {
                    callee,
                    arguments,
                    pure: c.pure,
                    span: c.span,
                }))
            }
            ast::Expr::New(n) => Ok(Expression::New(NewExpr {
                callee: Box::new(self.lower_expr(&n.callee)?),
                arguments: self.lower_arguments(&n.arguments)?,
                span: n.span,
            })),
            ast::Expr::Member(m) => Ok(Expression::Member(MemberExpr {
                object: Box::new(self.lower_expr(&m.object)?),
                property: self.lower_member_key(&m.property)?,
                span: m.span,
            })),
            ast::Expr::OptionalMember(m) => Ok(Expression::OptionalMember(MemberExpr {
                object: Box::new(self.lower_expr(&m.object)?),
                property: self.lower_member_key(&m.property)?,
                span: m.span,
            })),
            ast::Expr::Array(arr) => {
                let elements = arr
                    .elements
                    .iter()
                    .map(|el| el.as_ref().map(|a| self.lower_argument(a)).transpose())
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Expression::Array(ArrayExpr { elements, span: arr.span }))
            }
            ast::Expr::Object(obj) => {
                let mut properties = Vec::with_capacity(obj.properties.len());
                for prop in &obj.properties {
                    properties.push(self.lower_object_property(prop)?);
                }
                Ok(Expression::Object(ObjectExpr { properties, span: obj.span }))
            }
            ast::Expr::Spread(s) => Ok(Expression::Spread(SpreadExpr {
                argument: Box::new(self.lower_expr(&s.argument)?),
                span: s.span,
            })),
            ast::Expr::Sequence(seq) => {
                let expressions = seq
                    .expressions
                    .iter()
                    .map(|e| self.lower_expr(e))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(Expression::Sequence(SequenceExpr { expressions, span: seq.span }))
            }
            ast::Expr::Await(a) => Ok(Expression::Await(AwaitExpr {
                argument: Box::new(self.lower_expr(&a.argument)?),
                span: a.span,
            })),
            ast::Expr::Yield(y) => {
                let argument = y
                    .argument
                    .as_ref()
                    .map(|e| self.lower_expr(e))
                    .transpose()?
                    .map(Box::new);
                Ok(Expression::Yield(YieldExpr { argument, delegate: y.delegate, span: y.span }))
            }
            ast::Expr::Arrow(arrow) => Ok(Expression::Arrow(self.lower_arrow(arrow)?)),
            ast::Expr::Function(func) => Ok(Expression::Function(self.lower_function_expression(
                func.name.as_ref().map(|id| id.name.clone()),
                &func.params,
                &func.body,
                func.is_async,
                func.is_generator,
                func.span,
            )?)),
            ast::Expr::TaggedTemplate(t) => {
                let tag = Box::new(self.lower_expr(&t.tag)?);
                let quasi_expressions = t
                    .quasi
                    .expressions
                    .iter()
                    .map(|e| self.lower_expr(e))
                    .collect::<CompileResult<Vec<_>>>()?;
                let quasi = TemplateLit {
                    quasis: t.quasi.quasis.clone(),
                    expressions: quasi_expressions,
                    span: t.quasi.span,
                };
                Ok(Expression::TaggedTemplate(TaggedTemplateExpr { tag, quasi, span: t.span }))
            }
            ast::Expr::Class(c) => Ok(Expression::Class(ClassExpr {
                name: c.name.as_ref().map(|id| id.name.clone()),
                super_class: c
                    .super_class
                    .as_ref()
                    .map(|e| self.lower_expr(e))
                    .transpose()?
                    .map(Box::new),
                span: c.span,
            })),
            ast::Expr::Jsx(jsx) => Ok(Expression::Jsx(self.lower_jsx(jsx)?)),
            ast::Expr::This(span) => Ok(Expression::This(*span)),
            ast::Expr::Super(span) => Ok(Expression::Super(*span)),
            ast::Expr::Import(i) => Ok(Expression::Import(ImportExpr {
                argument: Box::new(self.lower_expr(&i.argument)?),
                span: i.span,
            })),
            ast::Expr::MetaProperty(m) => Ok(Expression::MetaProperty(MetaPropertyExpr {
                meta: m.meta.clone(),
                property: m.property.clone(),
                span: m.span,
            })),
        }
    }

    fn lower_assignment(&mut self, assign: &ast::AssignmentExpression) -> CompileResult<Expression> {
        let left = match &assign.left {
            ast::AssignmentTarget::Identifier(id) => AssignmentTarget::Identifier(id.name.clone()),
            ast::AssignmentTarget::Member(m) => AssignmentTarget::Member(MemberExpr {
                object: Box::new(self.lower_expr(&m.object)?),
                property: self.lower_member_key(&m.property)?,
                span: m.span,
            }),
            ast::AssignmentTarget::Pattern(_) => {
                let err =
                    self.error("destructuring assignment must appear as a statement", assign.span);
                return Err(self.fail(err));
            }
        };
        let right = Box::new(self.lower_expr(&assign.right)?);
        Ok(Expression::Assignment(AssignmentExpr { operator: assign.operator, left, right, span: assign.span }))
    }

    /// Resolves a call callee to its canonical macro name when it is a bare
    /// alias identifier (§4.1); any other callee form lowers normally.
    fn lower_callee(&mut self, expr: &ast::Expr) -> CompileResult<Expression> {
        if let ast::Expr::Identifier(id) = expr {
            if let Some(canonical) = self.options.macro_aliases.canonicalize(&id.name) {
                return Ok(Expression::Identifier(IdentifierExpr::new(canonical, id.span)));
            }
        }
        self.lower_expr(expr)
    }

    fn lower_arguments(&mut self, args: &[ast::Argument]) -> CompileResult<Vec<Expression>> {
        args.iter().map(|a| self.lower_argument(a)).collect()
    }

    fn lower_argument(&mut self, arg: &ast::Argument) -> CompileResult<Expression> {
        match arg {
            ast::Argument::Expr(e) => self.lower_expr(e),
            ast::Argument::Spread(s) => Ok(Expression::Spread(SpreadExpr {
                argument: Box::new(self.lower_expr(&s.argument)?),
                span: s.span,
            })),
        }
    }

    fn lower_member_key(&mut self, key: &ast::MemberKey) -> CompileResult<MemberKey> {
        Ok(match key {
            ast::MemberKey::Identifier(name) => MemberKey::Identifier(name.clone()),
            ast::MemberKey::Computed(e) => MemberKey::Computed(Box::new(self.lower_expr(e)?)),
        })
    }

    fn lower_property_key(&mut self, key: &ast::PropertyKey) -> CompileResult<PropertyKey> {
        Ok(match key {
            ast::PropertyKey::Identifier(s) => PropertyKey::Identifier(s.clone()),
            ast::PropertyKey::String(s) => PropertyKey::String(s.clone()),
            ast::PropertyKey::Number(n) => PropertyKey::Number(*n),
            ast::PropertyKey::Computed(e) => PropertyKey::Computed(Box::new(self.lower_expr(e)?)),
        })
    }

    fn lower_object_property(&mut self, prop: &ast::ObjectPropertyOrSpread) -> CompileResult<ObjectProp> {
        Ok(match prop {
            ast::ObjectPropertyOrSpread::Property(p) => {
                let key = self.lower_property_key(&p.key)?;
                let value = self.lower_expr(&p.value)?;
                ObjectProp::Property { key, value, shorthand: p.shorthand }
            }
            ast::ObjectPropertyOrSpread::Spread(s) => {
                ObjectProp::Spread(Box::new(self.lower_expr(&s.argument)?))
            }
        })
    }

    /// Lowers an arrow function. When every parameter is a bare identifier
    /// and the body is an expression, no nested block list is needed; a
    /// destructured parameter or a block body forces the block-list form
    /// (§3's `ArrowBody`).
    fn lower_arrow(&mut self, arrow: &ast::ArrowFunctionExpression) -> CompileResult<ArrowExpr> {
        let mut nested = self.nested();
        let mut flat_params = Vec::with_capacity(arrow.params.len());
        let mut has_prologue = false;
        for p in &arrow.params {
            let before = nested.current_instruction_count();
            flat_params.push(nested.destructure_param(p)?);
            if nested.current_instruction_count() != before {
                has_prologue = true;
            }
        }

        let body = match &arrow.body {
            ast::ArrowBody::Expression(expr) if !has_prologue => {
                ArrowBody::Expression(Box::new(nested.lower_expr(expr)?))
            }
            ast::ArrowBody::Expression(expr) => {
                let value = nested.lower_expr(expr)?;
                nested.seal(Terminator::Return { argument: Some(value) });
                ArrowBody::Blocks(nested.finish(arrow.span))
            }
            ast::ArrowBody::Block(stmts) => {
                nested.lower_body(stmts)?;
                ArrowBody::Blocks(nested.finish(arrow.span))
            }
        };

        Ok(ArrowExpr { params: flat_params, body, is_async: arrow.is_async, span: arrow.span })
    }

    /// Lowers a block-bodied function expression (or nested function
    /// declaration hoisted into an `Assign`) via a fresh nested builder.
    pub(super) fn lower_function_expression(
        &mut self,
        name: Option<String>,
        params: &[ast::Pattern],
        body: &[ast::Stmt],
        is_async: bool,
        is_generator: bool,
        span: ast::Span,
    ) -> CompileResult<FunctionExpr> {
        let mut nested = self.nested();
        let mut flat_params = Vec::with_capacity(params.len());
        for p in params {
            flat_params.push(nested.destructure_param(p)?);
        }
        nested.lower_body(body)?;
        let blocks = nested.finish(span);
        Ok(FunctionExpr { name, params: flat_params, blocks, is_async, is_generator, span })
    }

    fn lower_jsx(&mut self, jsx: &ast::JsxExpression) -> CompileResult<JsxExpr> {
        Ok(match jsx {
            ast::JsxExpression::Element(e) => JsxExpr::Element(self.lower_jsx_element(e)?),
            ast::JsxExpression::Fragment(f) => JsxExpr::Fragment(self.lower_jsx_fragment(f)?),
        })
    }

    fn lower_jsx_tag_name(&mut self, tag: &ast::JsxTagName) -> CompileResult<JsxTagName> {
        Ok(match tag {
            ast::JsxTagName::Intrinsic(s) => JsxTagName::Intrinsic(s.clone()),
            ast::JsxTagName::Component(e) => JsxTagName::Component(Box::new(self.lower_expr(e)?)),
        })
    }

    fn lower_jsx_attribute(
        &mut self,
        attr: &ast::JsxAttributeOrSpread,
    ) -> CompileResult<JsxAttributeOrSpread> {
        Ok(match attr {
            ast::JsxAttributeOrSpread::Attribute(a) => {
                let value = match &a.value {
                    Some(ast::JsxAttributeValue::StringLiteral(s)) => {
                        Some(JsxAttributeValue::StringLiteral(s.clone()))
                    }
                    Some(ast::JsxAttributeValue::Expression(e)) => {
                        Some(JsxAttributeValue::Expression(Box::new(self.lower_expr(e)?)))
                    }
                    None => None,
                };
                JsxAttributeOrSpread::Attribute(JsxAttribute { name: a.name.clone(), value, span: a.span })
            }
            ast::JsxAttributeOrSpread::Spread(s) => {
                JsxAttributeOrSpread::Spread(Box::new(self.lower_expr(&s.argument)?))
            }
        })
    }

    fn lower_jsx_child(&mut self, child: &ast::JsxChild) -> CompileResult<JsxChild> {
        Ok(match child {
            ast::JsxChild::Element(e) => JsxChild::Element(Box::new(self.lower_jsx_element(e)?)),
            ast::JsxChild::Fragment(f) => JsxChild::Fragment(Box::new(self.lower_jsx_fragment(f)?)),
            ast::JsxChild::ExpressionContainer(e) => {
                JsxChild::ExpressionContainer(Box::new(self.lower_expr(e)?))
            }
            ast::JsxChild::Text(t) => JsxChild::Text(t.clone()),
        })
    }

    fn lower_jsx_element(&mut self, el: &ast::JsxElement) -> CompileResult<JsxElement> {
        let tag_name = self.lower_jsx_tag_name(&el.tag_name)?;
        let attributes = el
            .attributes
            .iter()
            .map(|a| self.lower_jsx_attribute(a))
            .collect::<CompileResult<Vec<_>>>()?;
        let children = el
            .children
            .iter()
            .map(|c| self.lower_jsx_child(c))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(JsxElement { tag_name, is_component: el.is_component, attributes, children, span: el.span })
    }

    fn lower_jsx_fragment(&mut self, frag: &ast::JsxFragment) -> CompileResult<JsxFragment> {
        let children = frag
            .children
            .iter()
            .map(|c| self.lower_jsx_child(c))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(JsxFragment { children, span: frag.span })
    }
}
