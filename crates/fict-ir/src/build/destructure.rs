//! Destructuring expansion (§4.1): rewrites pattern bindings into a
//! temporary assignment followed by member-load assignments, so that by the
//! time IR exists a `Pattern` survives only on `ForOf`/`ForIn` terminators
//! and function parameters (§3 invariant 6).

use super::Builder;
use crate::error::CompileResult;
use crate::ir::expr::{
    ArrayExpr, BinaryExpr, ConditionalExpr, IdentifierExpr, MemberExpr, MemberKey, NumberLit,
};
use crate::ir::instr::{DeclarationKind, Instruction};
use crate::ir::{BinaryOp, Expression};
use crate::normalize::destructure::{excluded_keys, fresh_destructure_temp, REST_PROP_HELPER};
use fict_ast as ast;

impl<'a, 'w> Builder<'a, 'w> {
    /// Expands a declarator/assignment pattern into `Assign` instructions
    /// against `source`, pushed onto the current block in source order.
    /// `declaration_kind` is `None` for a plain assignment target.
    pub(super) fn destructure_into(
        &mut self,
        pattern: &ast::Pattern,
        source: Expression,
        declaration_kind: Option<DeclarationKind>,
    ) -> CompileResult<()> {
        match pattern {
            ast::Pattern::Identifier(id) => {
                self.push_instr(Instruction::Assign {
                    target: IdentifierExpr::new(id.name.clone(), id.span),
                    value: source,
                    declaration_kind,
                });
                Ok(())
            }
            ast::Pattern::Array(arr) => self.destructure_array(arr, source, declaration_kind),
            ast::Pattern::Object(obj) => self.destructure_object(obj, source, declaration_kind),
        }
    }

    /// Binds a top-level variable declarator whose id is a pattern. Elides
    /// the temporary when the RHS is already a bare identifier (§4.1).
    pub(super) fn destructure_declarator(
        &mut self,
        pattern: &ast::Pattern,
        init: Expression,
        declaration_kind: DeclarationKind,
    ) -> CompileResult<()> {
        if let ast::Pattern::Identifier(id) = pattern {
            self.push_instr(Instruction::Assign {
                target: IdentifierExpr::new(id.name.clone(), id.span),
                value: init,
                declaration_kind: Some(declaration_kind),
            });
            return Ok(());
        }

        let source = if matches!(init, Expression::Identifier(_)) {
            init
        } else {
            let temp = fresh_destructure_temp();
            let temp_id = IdentifierExpr::new(temp.clone(), pattern.span());
            self.push_instr(Instruction::Assign {
                target: temp_id.clone(),
                value: init,
                declaration_kind: Some(declaration_kind),
            });
            Expression::Identifier(temp_id)
        };

        self.destructure_into(pattern, source, Some(declaration_kind))
    }

    /// Flattens a function parameter into its bound leaf name(s), emitting
    /// any destructuring prologue into the (already-current, empty) entry
    /// block. Returns the name that belongs in `Function::params`.
    pub(super) fn destructure_param(&mut self, pattern: &ast::Pattern) -> CompileResult<String> {
        match pattern {
            ast::Pattern::Identifier(id) => Ok(id.name.clone()),
            _ => {
                let temp = fresh_destructure_temp();
                let temp_id = IdentifierExpr::new(temp.clone(), pattern.span());
                let source = Expression::Identifier(temp_id);
                self.destructure_into(pattern, source, Some(DeclarationKind::Let))?;
                Ok(temp)
            }
        }
    }

    fn destructure_object(
        &mut self,
        obj: &ast::ObjectPattern,
        source: Expression,
        declaration_kind: Option<DeclarationKind>,
    ) -> CompileResult<()> {
        for prop in &obj.properties {
            let member = Expression::Member(MemberExpr {
                object: Box::new(source.clone()),
                property: MemberKey::Identifier(prop.key.clone()),
                span: prop.span,
            });
            let value = self.apply_default(member, prop.default.as_ref())?;
            self.destructure_into(&prop.value, value, declaration_kind)?;
        }

        if let Some(rest) = &obj.rest {
            let excluded = excluded_keys(obj);
            let keys_array = Expression::Array(ArrayExpr {
                elements: excluded
                    .into_iter()
                    .map(|k| {
                        Some(Expression::StringLiteral(crate::ir::expr::StringLit {
                            value: k,
                            span: rest.span,
                        }))
                    })
                    .collect(),
                span: rest.span,
            });
            let call = Expression::Call(crate::ir::expr::CallExpr {
                callee: Box::new(Expression::Identifier(IdentifierExpr::new(
                    REST_PROP_HELPER,
                    rest.span,
                ))),
                arguments: vec![source, keys_array],
                pure: true,
                span: rest.span,
            });
            self.push_instr(Instruction::Assign {
                target: IdentifierExpr::new(rest.name.clone(), rest.span),
                value: call,
                declaration_kind,
            });
        }

        Ok(())
    }

    fn destructure_array(
        &mut self,
        arr: &ast::ArrayPattern,
        source: Expression,
        declaration_kind: Option<DeclarationKind>,
    ) -> CompileResult<()> {
        for (index, element) in arr.elements.iter().enumerate() {
            let Some(element) = element else { continue };
            let member = Expression::Member(MemberExpr {
                object: Box::new(source.clone()),
                property: MemberKey::Computed(Box::new(Expression::NumberLiteral(NumberLit {
                    value: index as f64,
                    span: element.span,
                }))),
                span: element.span,
            });
            let value = self.apply_default(member, element.default.as_ref())?;
            self.destructure_into(&element.pattern, value, declaration_kind)?;
        }

        if let Some(rest) = &arr.rest {
            let slice_callee = Expression::Member(MemberExpr {
                object: Box::new(source),
                property: MemberKey::Identifier("slice".to_string()),
                span: rest.span(),
            });
            let call = Expression::Call(crate::ir::expr::CallExpr {
                callee: Box::new(slice_callee),
                arguments: vec![Expression::NumberLiteral(NumberLit {
                    value: arr.elements.len() as f64,
                    span: rest.span(),
                })],
                pure: true,
                span: rest.span(),
            });
            self.destructure_into(rest, call, declaration_kind)?;
        }

        Ok(())
    }

    /// `default` is applied as `value === undefined ? default : value`
    /// (§4.1). `value` is duplicated across both the test and the
    /// fallthrough arm; both sites are member loads, which are
    /// side-effect-free, so the duplication is observationally harmless.
    fn apply_default(
        &mut self,
        value: Expression,
        default: Option<&ast::Expr>,
    ) -> CompileResult<Expression> {
        let Some(default) = default else { return Ok(value) };
        let default = self.lower_expr(default)?;
        let span = value.span();
        let undefined = Expression::Identifier(IdentifierExpr::new("undefined", span));
        let test = Expression::Binary(BinaryExpr {
            operator: BinaryOp::StrictEq,
            left: Box::new(value.clone()),
            right: Box::new(undefined),
            span,
        });
        Ok(Expression::Conditional(ConditionalExpr {
            test: Box::new(test),
            consequent: Box::new(default),
            alternate: Box::new(value),
            span,
        }))
    }
}
