//! Optimizer (§4.5): deterministic, semantics-preserving passes over the
//! SSA IR. Reference order: DCE → constant folding → cross-block constant
//! propagation (gated) → a second DCE pass standing in for reactive-graph
//! DCE (see DESIGN.md) → CSE → single-use inlining.

mod const_prop;
mod constant_fold;
mod cse;
mod dce;
mod inline;

use crate::context::CompileOptions;
use crate::error::CompileResult;
use crate::ir::expr::{
    ArrayExpr, ArrowBody, ArrowExpr, AssignmentExpr, AssignmentTarget, AwaitExpr, BinaryExpr,
    CallExpr, ConditionalExpr, Expression, FunctionExpr, JsxAttributeOrSpread, JsxAttributeValue,
    JsxChild, JsxElement, JsxExpr, JsxFragment, JsxTagName, LogicalExpr, MemberExpr, MemberKey,
    NewExpr, ObjectExpr, ObjectProp, PropertyKey, SequenceExpr, SpreadExpr, TaggedTemplateExpr,
    UnaryExpr, UpdateExpr, YieldExpr,
};
use crate::ir::instr::Instruction;
use crate::ir::terminator::Terminator;
use crate::ir::{Function, Program};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

#[instrument(level = "debug", skip_all, fields(functions = program.functions.len(), cross_block_const_prop = options.cross_block_const_prop))]
pub fn run(program: &mut Program, options: &CompileOptions) -> CompileResult<()> {
    for function in &mut program.functions {
        debug!(function = function.name.as_deref().unwrap_or("<anonymous>"), "optimizing function");
        dce::run(function);
        constant_fold::run(function);
        if options.cross_block_const_prop {
            const_prop::run(function);
        }
        dce::run(function);
        cse::run(function);
        inline::run(function, options);
    }
    Ok(())
}

/// Counts every read of each name across a function: instruction values,
/// phi sources, and terminator expressions. Used by both DCE (a name with
/// zero uses may be dropped) and single-use inlining (a name with exactly
/// one use may be substituted at its use site).
pub(super) fn count_uses(function: &Function) -> FxHashMap<String, u32> {
    let mut counts = FxHashMap::default();
    for block in &function.blocks {
        for instr in &block.instructions {
            match instr {
                Instruction::Assign { value, .. } | Instruction::Expression { value } => {
                    count_expr(value, &mut counts);
                }
                Instruction::Phi { sources, .. } => {
                    for source in sources {
                        *counts.entry(source.id.name.clone()).or_insert(0) += 1;
                    }
                }
            }
        }
        match &block.terminator {
            Terminator::Branch { test, .. } => count_expr(test, &mut counts),
            Terminator::Return { argument: Some(e) } => count_expr(e, &mut counts),
            Terminator::Throw { argument } => count_expr(argument, &mut counts),
            Terminator::Switch { discriminant, cases } => {
                count_expr(discriminant, &mut counts);
                for case in cases {
                    if let Some(test) = &case.test {
                        count_expr(test, &mut counts);
                    }
                }
            }
            Terminator::ForOf { iterable, .. } => count_expr(iterable, &mut counts),
            Terminator::ForIn { object, .. } => count_expr(object, &mut counts),
            _ => {}
        }
    }
    counts
}

fn count_expr(expr: &Expression, counts: &mut FxHashMap<String, u32>) {
    for_each_subexpr(expr, &mut |e| {
        if let Some(name) = e.as_identifier_name() {
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
    });
}

/// Invokes `f` on every sub-expression of `expr`, including `expr` itself,
/// covering every expression form in the external AST contract (§6).
/// Nested function/arrow bodies with their own block lists are skipped —
/// they are separate `Function`s with their own use counts.
pub(super) fn for_each_subexpr(expr: &Expression, f: &mut impl FnMut(&Expression)) {
    f(expr);
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
        Expression::TemplateLiteral(t) => t.expressions.iter().for_each(|e| for_each_subexpr(e, f)),
        Expression::Unary(UnaryExpr { argument, .. }) => for_each_subexpr(argument, f),
        Expression::Binary(BinaryExpr { left, right, .. })
        | Expression::Logical(LogicalExpr { left, right, .. }) => {
            for_each_subexpr(left, f);
            for_each_subexpr(right, f);
        }
        Expression::Conditional(ConditionalExpr { test, consequent, alternate, .. }) => {
            for_each_subexpr(test, f);
            for_each_subexpr(consequent, f);
            for_each_subexpr(alternate, f);
        }
        Expression::Assignment(AssignmentExpr { left, right, .. }) => {
            if let AssignmentTarget::Member(m) = left {
                for_each_subexpr(&m.object, f);
                if let MemberKey::Computed(k) = &m.property {
                    for_each_subexpr(k, f);
                }
            }
            for_each_subexpr(right, f);
        }
        Expression::Update(UpdateExpr { argument, .. }) => for_each_subexpr(argument, f),
        Expression::Call(CallExpr { callee, arguments, .. })
        | Expression::OptionalCall(CallExpr { callee, arguments, .. })
        | Expression::New(NewExpr { callee, arguments, .. }) => {
            for_each_subexpr(callee, f);
            arguments.iter().for_each(|a| for_each_subexpr(a, f));
        }
        Expression::Member(MemberExpr { object, property, .. })
        | Expression::OptionalMember(MemberExpr { object, property, .. }) => {
            for_each_subexpr(object, f);
            if let MemberKey::Computed(k) = property {
                for_each_subexpr(k, f);
            }
        }
        Expression::Array(ArrayExpr { elements, .. }) => {
            elements.iter().flatten().for_each(|e| for_each_subexpr(e, f));
        }
        Expression::Object(ObjectExpr { properties, .. }) => {
            for prop in properties {
                match prop {
                    ObjectProp::Property { key, value, .. } => {
                        if let PropertyKey::Computed(k) = key {
                            for_each_subexpr(k, f);
                        }
                        for_each_subexpr(value, f);
                    }
                    ObjectProp::Spread(e) => for_each_subexpr(e, f),
                }
            }
        }
        Expression::Spread(SpreadExpr { argument, .. }) => for_each_subexpr(argument, f),
        Expression::Sequence(SequenceExpr { expressions, .. }) => {
            expressions.iter().for_each(|e| for_each_subexpr(e, f));
        }
        Expression::Await(AwaitExpr { argument, .. }) => for_each_subexpr(argument, f),
        Expression::Yield(YieldExpr { argument, .. }) => {
            if let Some(a) = argument {
                for_each_subexpr(a, f);
            }
        }
        Expression::Arrow(ArrowExpr { body, .. }) => {
            if let ArrowBody::Expression(e) = body {
                for_each_subexpr(e, f);
            }
        }
        Expression::Function(FunctionExpr { .. }) => {}
        Expression::TaggedTemplate(TaggedTemplateExpr { tag, quasi, .. }) => {
            for_each_subexpr(tag, f);
            quasi.expressions.iter().for_each(|e| for_each_subexpr(e, f));
        }
        Expression::Class(c) => {
            if let Some(sup) = &c.super_class {
                for_each_subexpr(sup, f);
            }
        }
        Expression::Jsx(j) => for_each_jsx_subexpr(j, f),
        Expression::Import(i) => for_each_subexpr(&i.argument, f),
    }
}

fn for_each_jsx_subexpr(jsx: &JsxExpr, f: &mut impl FnMut(&Expression)) {
    match jsx {
        JsxExpr::Element(el) => for_each_jsx_element_subexpr(el, f),
        JsxExpr::Fragment(frag) => frag.children.iter().for_each(|c| for_each_jsx_child_subexpr(c, f)),
    }
}

fn for_each_jsx_element_subexpr(el: &JsxElement, f: &mut impl FnMut(&Expression)) {
    if let JsxTagName::Component(e) = &el.tag_name {
        for_each_subexpr(e, f);
    }
    for attr in &el.attributes {
        match attr {
            JsxAttributeOrSpread::Attribute(a) => {
                if let Some(JsxAttributeValue::Expression(e)) = &a.value {
                    for_each_subexpr(e, f);
                }
            }
            JsxAttributeOrSpread::Spread(e) => for_each_subexpr(e, f),
        }
    }
    el.children.iter().for_each(|c| for_each_jsx_child_subexpr(c, f));
}

fn for_each_jsx_child_subexpr(child: &JsxChild, f: &mut impl FnMut(&Expression)) {
    match child {
        JsxChild::Element(e) => for_each_jsx_element_subexpr(e, f),
        JsxChild::Fragment(frag) => frag.children.iter().for_each(|c| for_each_jsx_child_subexpr(c, f)),
        JsxChild::ExpressionContainer(e) => for_each_subexpr(e, f),
        JsxChild::Text(_) => {}
    }
}
