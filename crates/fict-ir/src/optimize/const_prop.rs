//! Cross-block constant propagation (§4.5, gated by `cross_block_const_prop`):
//! substitutes reads of a `const` name whose value folded to a literal with
//! that literal, wherever the name is read in the function — including
//! inside nested closures, since SSA names are unique across the whole
//! program and true shadowing cannot occur.

use crate::ir::block::BasicBlock;
use crate::ir::expr::{
    ArrayExpr, ArrowBody, ArrowExpr, AssignmentExpr, AssignmentTarget, AwaitExpr, BinaryExpr,
    CallExpr, ConditionalExpr, Expression, FunctionExpr, JsxAttributeOrSpread, JsxAttributeValue,
    JsxChild, JsxElement, JsxExpr, JsxFragment, JsxTagName, LogicalExpr, MemberExpr, MemberKey,
    NewExpr, ObjectExpr, ObjectProp, PropertyKey, SequenceExpr, SpreadExpr, TaggedTemplateExpr,
    UnaryExpr, UpdateExpr, YieldExpr,
};
use crate::ir::function::Function;
use crate::ir::instr::{DeclarationKind, Instruction};
use crate::ir::terminator::Terminator;
use rustc_hash::FxHashMap;

pub fn run(function: &mut Function) {
    let mut literals = FxHashMap::default();
    for block in &function.blocks {
        for instr in &block.instructions {
            if let Instruction::Assign { target, value, declaration_kind: Some(DeclarationKind::Const) } = instr {
                if is_literal(value) {
                    literals.insert(target.name.clone(), value.clone());
                }
            }
        }
    }
    if literals.is_empty() {
        return;
    }
    for block in &mut function.blocks {
        substitute_block(block, &literals);
    }
}

fn is_literal(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::StringLiteral(_)
            | Expression::NumberLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::BigIntLiteral(_)
    )
}

pub(super) fn substitute_block(block: &mut BasicBlock, literals: &FxHashMap<String, Expression>) {
    for instr in &mut block.instructions {
        match instr {
            Instruction::Assign { value, .. } | Instruction::Expression { value } => substitute(value, literals),
            Instruction::Phi { .. } => {}
        }
    }
    match &mut block.terminator {
        Terminator::Branch { test, .. } => substitute(test, literals),
        Terminator::Switch { discriminant, cases } => {
            substitute(discriminant, literals);
            for case in cases {
                if let Some(test) = &mut case.test {
                    substitute(test, literals);
                }
            }
        }
        Terminator::Return { argument: Some(e) } => substitute(e, literals),
        Terminator::Throw { argument } => substitute(argument, literals),
        Terminator::ForOf { iterable, .. } => substitute(iterable, literals),
        Terminator::ForIn { object, .. } => substitute(object, literals),
        _ => {}
    }
}

fn substitute(expr: &mut Expression, literals: &FxHashMap<String, Expression>) {
    if let Expression::Identifier(id) = expr {
        if let Some(literal) = literals.get(&id.name) {
            *expr = literal.clone();
            return;
        }
    }
    match expr {
        Expression::Identifier(_)
        | Expression::StringLiteral(_)
        | Expression::NumberLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::This(_)
        | Expression::Super(_)
        | Expression::MetaProperty(_) => {}
        Expression::TemplateLiteral(t) => t.expressions.iter_mut().for_each(|e| substitute(e, literals)),
        Expression::Unary(UnaryExpr { argument, .. }) => substitute(argument, literals),
        Expression::Binary(BinaryExpr { left, right, .. })
        | Expression::Logical(LogicalExpr { left, right, .. }) => {
            substitute(left, literals);
            substitute(right, literals);
        }
        Expression::Conditional(ConditionalExpr { test, consequent, alternate, .. }) => {
            substitute(test, literals);
            substitute(consequent, literals);
            substitute(alternate, literals);
        }
        Expression::Assignment(AssignmentExpr { left, right, .. }) => {
            if let AssignmentTarget::Member(m) = left {
                substitute(&mut m.object, literals);
                if let MemberKey::Computed(k) = &mut m.property {
                    substitute(k, literals);
                }
            }
            substitute(right, literals);
        }
        Expression::Update(UpdateExpr { argument, .. }) => substitute(argument, literals),
        Expression::Call(CallExpr { callee, arguments, .. })
        | Expression::OptionalCall(CallExpr { callee, arguments, .. })
        | Expression::New(NewExpr { callee, arguments, .. }) => {
            substitute(callee, literals);
            arguments.iter_mut().for_each(|a| substitute(a, literals));
        }
        Expression::Member(MemberExpr { object, property, .. })
        | Expression::OptionalMember(MemberExpr { object, property, .. }) => {
            substitute(object, literals);
            if let MemberKey::Computed(k) = property {
                substitute(k, literals);
            }
        }
        Expression::Array(ArrayExpr { elements, .. }) => {
            elements.iter_mut().flatten().for_each(|e| substitute(e, literals));
        }
        Expression::Object(ObjectExpr { properties, .. }) => {
            for prop in properties {
                match prop {
                    ObjectProp::Property { key, value, .. } => {
                        if let PropertyKey::Computed(k) = key {
                            substitute(k, literals);
                        }
                        substitute(value, literals);
                    }
                    ObjectProp::Spread(e) => substitute(e, literals),
                }
            }
        }
        Expression::Spread(SpreadExpr { argument, .. }) => substitute(argument, literals),
        Expression::Sequence(SequenceExpr { expressions, .. }) => {
            expressions.iter_mut().for_each(|e| substitute(e, literals));
        }
        Expression::Await(AwaitExpr { argument, .. }) => substitute(argument, literals),
        Expression::Yield(YieldExpr { argument, .. }) => {
            if let Some(a) = argument {
                substitute(a, literals);
            }
        }
        Expression::Arrow(ArrowExpr { body, .. }) => match body {
            ArrowBody::Expression(e) => substitute(e, literals),
            ArrowBody::Blocks(blocks) => blocks.iter_mut().for_each(|b| substitute_block(b, literals)),
        },
        Expression::Function(FunctionExpr { blocks, .. }) => {
            blocks.iter_mut().for_each(|b| substitute_block(b, literals));
        }
        Expression::TaggedTemplate(TaggedTemplateExpr { tag, quasi, .. }) => {
            substitute(tag, literals);
            quasi.expressions.iter_mut().for_each(|e| substitute(e, literals));
        }
        Expression::Class(c) => {
            if let Some(sup) = &mut c.super_class {
                substitute(sup, literals);
            }
        }
        Expression::Jsx(j) => substitute_jsx(j, literals),
        Expression::Import(i) => substitute(&mut i.argument, literals),
    }
}

fn substitute_jsx(jsx: &mut JsxExpr, literals: &FxHashMap<String, Expression>) {
    match jsx {
        JsxExpr::Element(el) => substitute_jsx_element(el, literals),
        JsxExpr::Fragment(frag) => substitute_jsx_fragment(frag, literals),
    }
}

fn substitute_jsx_element(el: &mut JsxElement, literals: &FxHashMap<String, Expression>) {
    if let JsxTagName::Component(e) = &mut el.tag_name {
        substitute(e, literals);
    }
    for attr in &mut el.attributes {
        match attr {
            JsxAttributeOrSpread::Attribute(a) => {
                if let Some(JsxAttributeValue::Expression(e)) = &mut a.value {
                    substitute(e, literals);
                }
            }
            JsxAttributeOrSpread::Spread(e) => substitute(e, literals),
        }
    }
    for child in &mut el.children {
        substitute_jsx_child(child, literals);
    }
}

fn substitute_jsx_fragment(frag: &mut JsxFragment, literals: &FxHashMap<String, Expression>) {
    for child in &mut frag.children {
        substitute_jsx_child(child, literals);
    }
}

fn substitute_jsx_child(child: &mut JsxChild, literals: &FxHashMap<String, Expression>) {
    match child {
        JsxChild::Element(e) => substitute_jsx_element(e, literals),
        JsxChild::Fragment(f) => substitute_jsx_fragment(f, literals),
        JsxChild::ExpressionContainer(e) => substitute(e, literals),
        JsxChild::Text(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::block::{BasicBlock, BlockId};
    use crate::ir::expr::{Expression, IdentifierExpr, NumberLit};
    use fict_ast::Span;

    fn num(v: f64) -> Expression {
        Expression::NumberLiteral(NumberLit { value: v, span: Span::synthetic() })
    }

    #[test]
    fn substitutes_const_read_in_later_block() {
        let mut entry = BasicBlock::new(BlockId::ENTRY);
        entry.instructions.push(Instruction::Assign {
            target: IdentifierExpr::new("x$$ssa1", Span::synthetic()),
            value: num(3.0),
            declaration_kind: Some(DeclarationKind::Const),
        });
        entry.terminator = Terminator::Jump { target: BlockId(1) };

        let mut second = BasicBlock::new(BlockId(1));
        second.terminator = Terminator::Return {
            argument: Some(Expression::Identifier(IdentifierExpr::new("x$$ssa1", Span::synthetic()))),
        };

        let mut function = Function {
            name: Some("f".to_string()),
            params: vec![],
            original_params: vec![],
            blocks: vec![entry, second],
            meta: Default::default(),
            span: Span::synthetic(),
        };

        run(&mut function);

        match &function.blocks[1].terminator {
            Terminator::Return { argument: Some(Expression::NumberLiteral(n)) } => assert_eq!(n.value, 3.0),
            other => panic!("expected folded literal, got {other:?}"),
        }
    }
}
