//! SSA renaming (§4.2): converts each function's blocks to single-static-
//! assignment form. Every `Instruction::Assign` definition is given a fresh
//! `<base>$$ssa<n>` name; uses are rewritten to the version reaching them;
//! `Phi` instructions are inserted at blocks with more than one incoming
//! version of a name.
//!
//! Variables that are ever mutated through an expression-position
//! `Expression::Assignment`/`Expression::Update` (e.g. `x = next()` used as
//! a sub-expression, or `i++`) are excluded from renaming entirely and kept
//! as plain mutable bindings — see `DESIGN.md`.

use fict_ast::Span;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{CompileError, CompileResult};
use crate::ir::block::{BasicBlock, BlockId};
use crate::ir::expr::{
    ArrayExpr, ArrowBody, ArrowExpr, AssignmentExpr, AssignmentTarget, AwaitExpr, BinaryExpr,
    CallExpr, ConditionalExpr, Expression, FunctionExpr, IdentifierExpr, JsxAttributeOrSpread,
    JsxAttributeValue, JsxChild, JsxElement, JsxExpr, JsxFragment, JsxTagName, LogicalExpr,
    MemberExpr, MemberKey, NewExpr, ObjectExpr, ObjectProp, PropertyKey, SequenceExpr, SpreadExpr,
    TaggedTemplateExpr, UnaryExpr, UpdateExpr, YieldExpr,
};
use crate::ir::instr::{Instruction, PhiSource};
use crate::ir::terminator::Terminator;
use crate::ir::{Function, Program};
use tracing::{debug, instrument};

#[instrument(level = "debug", skip_all, fields(functions = program.functions.len()))]
pub fn run(program: &mut Program) -> CompileResult<()> {
    for function in &mut program.functions {
        rename_function(function)?;
    }
    Ok(())
}

#[instrument(level = "debug", skip_all, fields(function = function.name.as_deref().unwrap_or("<anonymous>"), blocks = function.blocks.len()))]
fn rename_function(function: &mut Function) -> CompileResult<()> {
    rename_blocks(&mut function.blocks)?;
    debug!("ssa renaming complete");
    Ok(())
}

struct PendingFill {
    block: BlockId,
    instr_index: usize,
    pred: BlockId,
    base_name: String,
    fallback: String,
}

/// Renames one function/closure scope's blocks in place. Nested
/// arrow/function bodies encountered while rewriting get their own,
/// independently-numbered call to this same function (§5: per-function
/// transient counters).
fn rename_blocks(blocks: &mut Vec<BasicBlock>) -> CompileResult<()> {
    let non_ssa = collect_mutated_names(blocks);
    let preds = predecessor_map(blocks);
    let order = reverse_postorder(blocks);
    let rank: FxHashMap<BlockId, usize> = order.iter().enumerate().map(|(i, &b)| (b, i)).collect();

    let mut versions: FxHashMap<String, u32> = FxHashMap::default();
    let mut exit_env: Vec<Option<FxHashMap<String, String>>> = vec![None; blocks.len()];
    let mut pending: Vec<PendingFill> = Vec::new();

    for &block_id in &order {
        let block_preds = preds[block_id.as_u32() as usize].clone();
        let my_rank = rank[&block_id];

        let mut env = if block_preds.is_empty() {
            FxHashMap::default()
        } else {
            let (ready, back): (Vec<BlockId>, Vec<BlockId>) =
                block_preds.into_iter().partition(|p| rank[p] < my_rank);

            if back.is_empty() && ready.len() == 1 {
                exit_env[ready[0].as_u32() as usize].clone().unwrap_or_default()
            } else {
                insert_phis(
                    block_id,
                    blocks,
                    &ready,
                    &back,
                    &exit_env,
                    &mut versions,
                    &non_ssa,
                    &mut pending,
                )
            }
        };

        rename_block(&mut blocks[block_id.as_u32() as usize], &mut env, &mut versions, &non_ssa)?;
        exit_env[block_id.as_u32() as usize] = Some(env);
    }

    for fill in pending {
        let source_name = exit_env[fill.pred.as_u32() as usize]
            .as_ref()
            .and_then(|e| e.get(&fill.base_name))
            .cloned()
            .unwrap_or(fill.fallback);
        match &mut blocks[fill.block.as_u32() as usize].instructions[fill.instr_index] {
            Instruction::Phi { sources, .. } => {
                sources.push(PhiSource {
                    block: fill.pred,
                    id: IdentifierExpr::new(source_name, Span::synthetic()),
                });
                sources.sort_by_key(|s| s.block.as_u32());
            }
            _ => {
                return Err(CompileError::analysis(
                    "deferred phi fill targeted a non-phi instruction",
                    Some(fill.block.as_u32()),
                ))
            }
        }
    }

    for block in blocks.iter_mut() {
        rename_nested_closures_in_block(block)?;
    }

    Ok(())
}

/// Inserts phis at the top of `block_id` for every name whose incoming
/// version is ambiguous: it differs across the already-processed
/// predecessors, or the block has a not-yet-processed (back-edge)
/// predecessor whose contribution is unknown. Back-edge sources are
/// recorded in `pending` and filled once that predecessor is finalized.
#[allow(clippy::too_many_arguments)]
fn insert_phis(
    block_id: BlockId,
    blocks: &mut [BasicBlock],
    ready: &[BlockId],
    back: &[BlockId],
    exit_env: &[Option<FxHashMap<String, String>>],
    versions: &mut FxHashMap<String, u32>,
    non_ssa: &FxHashSet<String>,
    pending: &mut Vec<PendingFill>,
) -> FxHashMap<String, String> {
    let mut names: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
    for &p in ready {
        if let Some(e) = &exit_env[p.as_u32() as usize] {
            names.extend(e.keys().cloned());
        }
    }

    let mut env = FxHashMap::default();
    let mut insert_at = 0usize;

    for name in names {
        if non_ssa.contains(&name) {
            continue;
        }

        let ready_versions: Vec<Option<&String>> = ready
            .iter()
            .map(|p| exit_env[p.as_u32() as usize].as_ref().and_then(|e| e.get(&name)))
            .collect();
        let distinct: FxHashSet<&String> = ready_versions.iter().filter_map(|v| *v).collect();
        let ambiguous = !back.is_empty() || distinct.len() > 1 || ready_versions.iter().any(|v| v.is_none());

        if !ambiguous {
            env.insert(name, distinct.into_iter().next().unwrap().clone());
            continue;
        }

        let new_version = fresh_version(&name, versions);
        let mut sources = Vec::with_capacity(ready.len());
        for &p in ready {
            let source_name = exit_env[p.as_u32() as usize]
                .as_ref()
                .and_then(|e| e.get(&name))
                .cloned()
                .unwrap_or_else(|| name.clone());
            sources.push(PhiSource { block: p, id: IdentifierExpr::new(source_name, Span::synthetic()) });
        }
        sources.sort_by_key(|s| s.block.as_u32());

        let instr_index = insert_at;
        blocks[block_id.as_u32() as usize].instructions.insert(
            instr_index,
            Instruction::Phi {
                target: IdentifierExpr::new(new_version.clone(), Span::synthetic()),
                variable: name.clone(),
                sources,
            },
        );
        insert_at += 1;

        for &bp in back {
            pending.push(PendingFill {
                block: block_id,
                instr_index,
                pred: bp,
                base_name: name.clone(),
                fallback: new_version.clone(),
            });
        }

        env.insert(name, new_version);
    }

    env
}

/// `preds[i]` is the set of blocks with an edge into block `i`, deduplicated
/// and sorted ascending (phi source order, §4.2).
fn predecessor_map(blocks: &[BasicBlock]) -> Vec<Vec<BlockId>> {
    let mut preds = vec![Vec::new(); blocks.len()];
    for block in blocks {
        for succ in block.terminator.successors() {
            preds[succ.as_u32() as usize].push(block.id);
        }
    }
    for p in &mut preds {
        p.sort_by_key(|b| b.as_u32());
        p.dedup();
    }
    preds
}

/// DFS postorder from the entry block, reversed — a valid processing order
/// for forward edges of the reducible CFGs this builder produces (every
/// predecessor that isn't a loop back-edge appears before its successor).
fn reverse_postorder(blocks: &[BasicBlock]) -> Vec<BlockId> {
    let mut visited = vec![false; blocks.len()];
    let mut postorder = Vec::with_capacity(blocks.len());
    let mut stack = vec![(BlockId::ENTRY, false)];

    while let Some((id, expanded)) = stack.pop() {
        let idx = id.as_u32() as usize;
        if expanded {
            postorder.push(id);
            continue;
        }
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        stack.push((id, true));
        for succ in blocks[idx].terminator.successors() {
            if !visited[succ.as_u32() as usize] {
                stack.push((succ, false));
            }
        }
    }

    postorder.reverse();

    // Defensive: a block unreachable from entry (shouldn't occur for
    // well-formed builder output) still needs a slot so indexing is total.
    for (idx, seen) in visited.iter().enumerate() {
        if !seen {
            postorder.push(BlockId(idx as u32));
        }
    }

    postorder
}

fn fresh_version(name: &str, versions: &mut FxHashMap<String, u32>) -> String {
    let counter = versions.entry(name.to_string()).or_insert(0);
    *counter += 1;
    format!("{name}$$ssa{counter}")
}

fn rename_block(
    block: &mut BasicBlock,
    env: &mut FxHashMap<String, String>,
    versions: &mut FxHashMap<String, u32>,
    non_ssa: &FxHashSet<String>,
) -> CompileResult<()> {
    for instr in &mut block.instructions {
        match instr {
            Instruction::Phi { .. } => {}
            Instruction::Assign { target, value, .. } => {
                rewrite_uses(value, env);
                if non_ssa.contains(&target.name) {
                    continue;
                }
                let new_name = fresh_version(&target.name, versions);
                env.insert(target.name.clone(), new_name.clone());
                target.name = new_name;
            }
            Instruction::Expression { value } => rewrite_uses(value, env),
        }
    }

    match &mut block.terminator {
        Terminator::Branch { test, .. } => rewrite_uses(test, env),
        Terminator::Switch { discriminant, cases } => {
            rewrite_uses(discriminant, env);
            for case in cases {
                if let Some(test) = &mut case.test {
                    rewrite_uses(test, env);
                }
            }
        }
        Terminator::Return { argument: Some(arg) } => rewrite_uses(arg, env),
        Terminator::Throw { argument } => rewrite_uses(argument, env),
        Terminator::ForOf { iterable, .. } => rewrite_uses(iterable, env),
        Terminator::ForIn { object, .. } => rewrite_uses(object, env),
        _ => {}
    }

    Ok(())
}

/// Rewrites every free identifier use reached by `env` to its current
/// version. Assignment/update targets are handled by their own arms since
/// they are reads-of-old-plus-writes-of-new for compound forms, but (per
/// the module doc) any such target is in `non_ssa` and never present in
/// `env`, so this reduces to "leave it alone".
fn rewrite_uses(expr: &mut Expression, env: &FxHashMap<String, String>) {
    match expr {
        Expression::Identifier(id) => {
            if let Some(renamed) = env.get(&id.name) {
                id.name = renamed.clone();
            }
        }
        Expression::StringLiteral(_)
        | Expression::NumberLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::This(_)
        | Expression::Super(_) => {}
        Expression::TemplateLiteral(t) => {
            for e in &mut t.expressions {
                rewrite_uses(e, env);
            }
        }
        Expression::Unary(UnaryExpr { argument, .. }) => rewrite_uses(argument, env),
        Expression::Binary(BinaryExpr { left, right, .. }) => {
            rewrite_uses(left, env);
            rewrite_uses(right, env);
        }
        Expression::Logical(LogicalExpr { left, right, .. }) => {
            rewrite_uses(left, env);
            rewrite_uses(right, env);
        }
        Expression::Conditional(ConditionalExpr { test, consequent, alternate, .. }) => {
            rewrite_uses(test, env);
            rewrite_uses(consequent, env);
            rewrite_uses(alternate, env);
        }
        Expression::Assignment(AssignmentExpr { left, right, .. }) => {
            rewrite_uses(right, env);
            if let AssignmentTarget::Member(member) = left {
                rewrite_member(member, env);
            }
        }
        Expression::Update(UpdateExpr { argument, .. }) => rewrite_uses(argument, env),
        Expression::Call(CallExpr { callee, arguments, .. })
        | Expression::OptionalCall(CallExpr { callee, arguments, .. }) => {
            rewrite_uses(callee, env);
            for arg in arguments {
                rewrite_uses(arg, env);
            }
        }
        Expression::New(NewExpr { callee, arguments, .. }) => {
            rewrite_uses(callee, env);
            for arg in arguments {
                rewrite_uses(arg, env);
            }
        }
        Expression::Member(member) | Expression::OptionalMember(member) => rewrite_member(member, env),
        Expression::Array(ArrayExpr { elements, .. }) => {
            for element in elements.iter_mut().flatten() {
                rewrite_uses(element, env);
            }
        }
        Expression::Object(ObjectExpr { properties, .. }) => {
            for prop in properties {
                match prop {
                    ObjectProp::Property { key, value, .. } => {
                        if let PropertyKey::Computed(k) = key {
                            rewrite_uses(k, env);
                        }
                        rewrite_uses(value, env);
                    }
                    ObjectProp::Spread(value) => rewrite_uses(value, env),
                }
            }
        }
        Expression::Spread(SpreadExpr { argument, .. }) => rewrite_uses(argument, env),
        Expression::Sequence(SequenceExpr { expressions, .. }) => {
            for e in expressions {
                rewrite_uses(e, env);
            }
        }
        Expression::Await(AwaitExpr { argument, .. }) => rewrite_uses(argument, env),
        Expression::Yield(YieldExpr { argument, .. }) => {
            if let Some(arg) = argument {
                rewrite_uses(arg, env);
            }
        }
        Expression::Arrow(_) | Expression::Function(_) => {
            // Nested scopes are renamed independently in
            // `rename_nested_closures_in_block`; free variables they
            // reference keep their un-renamed names by design.
        }
        Expression::TaggedTemplate(TaggedTemplateExpr { tag, quasi, .. }) => {
            rewrite_uses(tag, env);
            for e in &mut quasi.expressions {
                rewrite_uses(e, env);
            }
        }
        Expression::Class(_) => {}
        Expression::Jsx(jsx) => rewrite_jsx(jsx, env),
        Expression::Import(import) => rewrite_uses(&mut import.argument, env),
        Expression::MetaProperty(_) => {}
    }
}

fn rewrite_member(member: &mut MemberExpr, env: &FxHashMap<String, String>) {
    rewrite_uses(&mut member.object, env);
    if let MemberKey::Computed(key) = &mut member.property {
        rewrite_uses(key, env);
    }
}

fn rewrite_jsx(jsx: &mut JsxExpr, env: &FxHashMap<String, String>) {
    match jsx {
        JsxExpr::Element(element) => rewrite_jsx_element(element, env),
        JsxExpr::Fragment(fragment) => rewrite_jsx_fragment(fragment, env),
    }
}

fn rewrite_jsx_element(element: &mut JsxElement, env: &FxHashMap<String, String>) {
    if let JsxTagName::Component(tag) = &mut element.tag_name {
        rewrite_uses(tag, env);
    }
    for attr in &mut element.attributes {
        match attr {
            JsxAttributeOrSpread::Attribute(a) => {
                if let Some(JsxAttributeValue::Expression(e)) = &mut a.value {
                    rewrite_uses(e, env);
                }
            }
            JsxAttributeOrSpread::Spread(e) => rewrite_uses(e, env),
        }
    }
    for child in &mut element.children {
        rewrite_jsx_child(child, env);
    }
}

fn rewrite_jsx_fragment(fragment: &mut JsxFragment, env: &FxHashMap<String, String>) {
    for child in &mut fragment.children {
        rewrite_jsx_child(child, env);
    }
}

fn rewrite_jsx_child(child: &mut JsxChild, env: &FxHashMap<String, String>) {
    match child {
        JsxChild::Element(e) => rewrite_jsx_element(e, env),
        JsxChild::Fragment(f) => rewrite_jsx_fragment(f, env),
        JsxChild::ExpressionContainer(e) => rewrite_uses(e, env),
        JsxChild::Text(_) => {}
    }
}

/// Runs an independent SSA pass over every nested arrow/function body found
/// in this (already-renamed) block, recursing through the full expression
/// tree of every instruction and terminator.
fn rename_nested_closures_in_block(block: &mut BasicBlock) -> CompileResult<()> {
    for instr in &mut block.instructions {
        if let Some(value) = instr.value_expr_mut() {
            rename_nested_closures_in_expr(value)?;
        }
    }
    match &mut block.terminator {
        Terminator::Branch { test, .. } => rename_nested_closures_in_expr(test)?,
        Terminator::Switch { discriminant, cases } => {
            rename_nested_closures_in_expr(discriminant)?;
            for case in cases {
                if let Some(test) = &mut case.test {
                    rename_nested_closures_in_expr(test)?;
                }
            }
        }
        Terminator::Return { argument: Some(arg) } => rename_nested_closures_in_expr(arg)?,
        Terminator::Throw { argument } => rename_nested_closures_in_expr(argument)?,
        Terminator::ForOf { iterable, .. } => rename_nested_closures_in_expr(iterable)?,
        Terminator::ForIn { object, .. } => rename_nested_closures_in_expr(object)?,
        _ => {}
    }
    Ok(())
}

fn rename_nested_closures_in_expr(expr: &mut Expression) -> CompileResult<()> {
    match expr {
        Expression::Arrow(ArrowExpr { body: ArrowBody::Blocks(blocks), .. }) => {
            rename_blocks(blocks)
        }
        Expression::Arrow(ArrowExpr { body: ArrowBody::Expression(inner), .. }) => {
            rename_nested_closures_in_expr(inner)
        }
        Expression::Function(FunctionExpr { blocks, .. }) => rename_blocks(blocks),
        other => {
            for_each_subexpr_mut(other, &mut |e| rename_nested_closures_in_expr(e))
        }
    }
}

/// Applies `f` to every direct child expression of `expr`, short-circuiting
/// on the first error. Used only to hunt for nested closures; does not
/// itself rewrite anything.
fn for_each_subexpr_mut(
    expr: &mut Expression,
    f: &mut dyn FnMut(&mut Expression) -> CompileResult<()>,
) -> CompileResult<()> {
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
        | Expression::Class(_)
        | Expression::MetaProperty(_) => Ok(()),
        Expression::TemplateLiteral(t) => t.expressions.iter_mut().try_for_each(f),
        Expression::Unary(e) => f(&mut e.argument),
        Expression::Binary(e) => {
            f(&mut e.left)?;
            f(&mut e.right)
        }
        Expression::Logical(e) => {
            f(&mut e.left)?;
            f(&mut e.right)
        }
        Expression::Conditional(e) => {
            f(&mut e.test)?;
            f(&mut e.consequent)?;
            f(&mut e.alternate)
        }
        Expression::Assignment(e) => {
            if let AssignmentTarget::Member(m) = &mut e.left {
                f(&mut m.object)?;
                if let MemberKey::Computed(k) = &mut m.property {
                    f(k)?;
                }
            }
            f(&mut e.right)
        }
        Expression::Update(e) => f(&mut e.argument),
        Expression::Call(e) | Expression::OptionalCall(e) => {
            f(&mut e.callee)?;
            e.arguments.iter_mut().try_for_each(f)
        }
        Expression::New(e) => {
            f(&mut e.callee)?;
            e.arguments.iter_mut().try_for_each(f)
        }
        Expression::Member(m) | Expression::OptionalMember(m) => {
            f(&mut m.object)?;
            if let MemberKey::Computed(k) = &mut m.property {
                f(k)?;
            }
            Ok(())
        }
        Expression::Array(e) => e.elements.iter_mut().flatten().try_for_each(f),
        Expression::Object(e) => e.properties.iter_mut().try_for_each(|p| match p {
            ObjectProp::Property { key, value, .. } => {
                if let PropertyKey::Computed(k) = key {
                    f(k)?;
                }
                f(value)
            }
            ObjectProp::Spread(v) => f(v),
        }),
        Expression::Spread(e) => f(&mut e.argument),
        Expression::Sequence(e) => e.expressions.iter_mut().try_for_each(f),
        Expression::Await(e) => f(&mut e.argument),
        Expression::Yield(e) => e.argument.as_deref_mut().map_or(Ok(()), f),
        Expression::TaggedTemplate(e) => {
            f(&mut e.tag)?;
            e.quasi.expressions.iter_mut().try_for_each(f)
        }
        Expression::Import(e) => f(&mut e.argument),
        Expression::Jsx(jsx) => for_each_jsx_subexpr_mut(jsx, f),
        Expression::Arrow(_) | Expression::Function(_) => unreachable!(
            "handled directly by rename_nested_closures_in_expr before delegating here"
        ),
    }
}

fn for_each_jsx_subexpr_mut(
    jsx: &mut JsxExpr,
    f: &mut dyn FnMut(&mut Expression) -> CompileResult<()>,
) -> CompileResult<()> {
    match jsx {
        JsxExpr::Element(element) => for_each_jsx_element_subexpr_mut(element, f),
        JsxExpr::Fragment(fragment) => {
            fragment.children.iter_mut().try_for_each(|c| for_each_jsx_child_subexpr_mut(c, f))
        }
    }
}

fn for_each_jsx_element_subexpr_mut(
    element: &mut JsxElement,
    f: &mut dyn FnMut(&mut Expression) -> CompileResult<()>,
) -> CompileResult<()> {
    if let JsxTagName::Component(tag) = &mut element.tag_name {
        f(tag)?;
    }
    for attr in &mut element.attributes {
        match attr {
            JsxAttributeOrSpread::Attribute(a) => {
                if let Some(JsxAttributeValue::Expression(e)) = &mut a.value {
                    f(e)?;
                }
            }
            JsxAttributeOrSpread::Spread(e) => f(e)?,
        }
    }
    element.children.iter_mut().try_for_each(|c| for_each_jsx_child_subexpr_mut(c, f))
}

fn for_each_jsx_child_subexpr_mut(
    child: &mut JsxChild,
    f: &mut dyn FnMut(&mut Expression) -> CompileResult<()>,
) -> CompileResult<()> {
    match child {
        JsxChild::Element(e) => for_each_jsx_element_subexpr_mut(e, f),
        JsxChild::Fragment(frag) => {
            frag.children.iter_mut().try_for_each(|c| for_each_jsx_child_subexpr_mut(c, f))
        }
        JsxChild::ExpressionContainer(e) => f(e),
        JsxChild::Text(_) => Ok(()),
    }
}

/// Names ever targeted by an expression-position assignment or update
/// (`x = ...`, `x += ...`, `x++`). These are excluded from SSA renaming and
/// kept as ordinary mutable bindings. Does not descend into nested
/// arrow/function bodies — each closure computes its own set.
fn collect_mutated_names(blocks: &[BasicBlock]) -> FxHashSet<String> {
    let mut out = FxHashSet::default();
    for block in blocks {
        for instr in &block.instructions {
            if let Some(value) = instr.value_expr() {
                scan_mutations(value, &mut out);
            }
        }
        match &block.terminator {
            Terminator::Branch { test, .. } => scan_mutations(test, &mut out),
            Terminator::Switch { discriminant, cases } => {
                scan_mutations(discriminant, &mut out);
                for case in cases {
                    if let Some(test) = &case.test {
                        scan_mutations(test, &mut out);
                    }
                }
            }
            Terminator::Return { argument: Some(arg) } => scan_mutations(arg, &mut out),
            Terminator::Throw { argument } => scan_mutations(argument, &mut out),
            Terminator::ForOf { iterable, .. } => scan_mutations(iterable, &mut out),
            Terminator::ForIn { object, .. } => scan_mutations(object, &mut out),
            _ => {}
        }
    }
    out
}

fn scan_mutations(expr: &Expression, out: &mut FxHashSet<String>) {
    match expr {
        Expression::Assignment(AssignmentExpr { left: AssignmentTarget::Identifier(name), right, .. }) => {
            out.insert(name.clone());
            scan_mutations(right, out);
        }
        Expression::Assignment(AssignmentExpr { left: AssignmentTarget::Member(m), right, .. }) => {
            scan_mutations(&m.object, out);
            if let MemberKey::Computed(k) = &m.property {
                scan_mutations(k, out);
            }
            scan_mutations(right, out);
        }
        Expression::Update(UpdateExpr { argument, .. }) => {
            if let Expression::Identifier(id) = argument.as_ref() {
                out.insert(id.name.clone());
            }
            scan_mutations(argument, out);
        }
        Expression::Arrow(_) | Expression::Function(_) => {}
        Expression::Identifier(_)
        | Expression::StringLiteral(_)
        | Expression::NumberLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::This(_)
        | Expression::Super(_)
        | Expression::Class(_)
        | Expression::MetaProperty(_) => {}
        Expression::TemplateLiteral(t) => t.expressions.iter().for_each(|e| scan_mutations(e, out)),
        Expression::Unary(e) => scan_mutations(&e.argument, out),
        Expression::Binary(e) => {
            scan_mutations(&e.left, out);
            scan_mutations(&e.right, out);
        }
        Expression::Logical(e) => {
            scan_mutations(&e.left, out);
            scan_mutations(&e.right, out);
        }
        Expression::Conditional(e) => {
            scan_mutations(&e.test, out);
            scan_mutations(&e.consequent, out);
            scan_mutations(&e.alternate, out);
        }
        Expression::Call(e) | Expression::OptionalCall(e) => {
            scan_mutations(&e.callee, out);
            e.arguments.iter().for_each(|a| scan_mutations(a, out));
        }
        Expression::New(e) => {
            scan_mutations(&e.callee, out);
            e.arguments.iter().for_each(|a| scan_mutations(a, out));
        }
        Expression::Member(m) | Expression::OptionalMember(m) => {
            scan_mutations(&m.object, out);
            if let MemberKey::Computed(k) = &m.property {
                scan_mutations(k, out);
            }
        }
        Expression::Array(e) => e.elements.iter().flatten().for_each(|el| scan_mutations(el, out)),
        Expression::Object(e) => {
            for prop in &e.properties {
                match prop {
                    ObjectProp::Property { key, value, .. } => {
                        if let PropertyKey::Computed(k) = key {
                            scan_mutations(k, out);
                        }
                        scan_mutations(value, out);
                    }
                    ObjectProp::Spread(v) => scan_mutations(v, out),
                }
            }
        }
        Expression::Spread(e) => scan_mutations(&e.argument, out),
        Expression::Sequence(e) => e.expressions.iter().for_each(|x| scan_mutations(x, out)),
        Expression::Await(e) => scan_mutations(&e.argument, out),
        Expression::Yield(e) => {
            if let Some(arg) = &e.argument {
                scan_mutations(arg, out);
            }
        }
        Expression::TaggedTemplate(e) => {
            scan_mutations(&e.tag, out);
            e.quasi.expressions.iter().for_each(|x| scan_mutations(x, out));
        }
        Expression::Import(e) => scan_mutations(&e.argument, out),
        Expression::Jsx(jsx) => scan_jsx_mutations(jsx, out),
    }
}

fn scan_jsx_mutations(jsx: &JsxExpr, out: &mut FxHashSet<String>) {
    match jsx {
        JsxExpr::Element(e) => scan_jsx_element_mutations(e, out),
        JsxExpr::Fragment(f) => f.children.iter().for_each(|c| scan_jsx_child_mutations(c, out)),
    }
}

fn scan_jsx_element_mutations(element: &JsxElement, out: &mut FxHashSet<String>) {
    if let JsxTagName::Component(tag) = &element.tag_name {
        scan_mutations(tag, out);
    }
    for attr in &element.attributes {
        match attr {
            JsxAttributeOrSpread::Attribute(a) => {
                if let Some(JsxAttributeValue::Expression(e)) = &a.value {
                    scan_mutations(e, out);
                }
            }
            JsxAttributeOrSpread::Spread(e) => scan_mutations(e, out),
        }
    }
    element.children.iter().for_each(|c| scan_jsx_child_mutations(c, out));
}

fn scan_jsx_child_mutations(child: &JsxChild, out: &mut FxHashSet<String>) {
    match child {
        JsxChild::Element(e) => scan_jsx_element_mutations(e, out),
        JsxChild::Fragment(f) => f.children.iter().for_each(|c| scan_jsx_child_mutations(c, out)),
        JsxChild::ExpressionContainer(e) => scan_mutations(e, out),
        JsxChild::Text(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::block::BasicBlock;
    use crate::ir::instr::DeclarationKind;

    fn ident(name: &str) -> Expression {
        Expression::Identifier(IdentifierExpr::new(name, Span::synthetic()))
    }

    fn num(v: f64) -> Expression {
        Expression::NumberLiteral(crate::ir::expr::NumberLit { value: v, span: Span::synthetic() })
    }

    fn assign(name: &str, value: Expression) -> Instruction {
        Instruction::Assign {
            target: IdentifierExpr::new(name, Span::synthetic()),
            value,
            declaration_kind: Some(DeclarationKind::Let),
        }
    }

    fn function(blocks: Vec<BasicBlock>) -> Function {
        Function {
            name: Some("f".to_string()),
            params: vec![],
            original_params: vec![],
            blocks,
            meta: Default::default(),
            span: Span::synthetic(),
        }
    }

    /// `if (cond) { x = 1 } else { x = 2 } return x` — the merge block reads
    /// a name with two differing incoming versions, so SSA must insert a phi.
    #[test]
    fn branch_then_return_inserts_phi_at_merge() {
        let mut entry = BasicBlock::new(BlockId::ENTRY);
        entry.terminator = Terminator::Branch { test: ident("cond"), consequent: BlockId(1), alternate: BlockId(2) };

        let mut cons = BasicBlock::new(BlockId(1));
        cons.instructions.push(assign("x", num(1.0)));
        cons.terminator = Terminator::Jump { target: BlockId(3) };

        let mut alt = BasicBlock::new(BlockId(2));
        alt.instructions.push(assign("x", num(2.0)));
        alt.terminator = Terminator::Jump { target: BlockId(3) };

        let mut merge = BasicBlock::new(BlockId(3));
        merge.terminator = Terminator::Return { argument: Some(ident("x")) };

        let mut program = Program { preamble: vec![], functions: vec![function(vec![entry, cons, alt, merge])], postamble: vec![] };
        run(&mut program).expect("ssa renaming succeeds");

        let merge = &program.functions[0].blocks[3];
        assert_eq!(merge.instructions.len(), 1);
        match &merge.instructions[0] {
            Instruction::Phi { target, variable, sources } => {
                assert_eq!(variable, "x");
                assert_eq!(sources.len(), 2);
                assert!(target.name.starts_with("x$$ssa"));
            }
            other => panic!("expected a phi at the merge block, got {other:?}"),
        }
        match &merge.terminator {
            Terminator::Return { argument: Some(Expression::Identifier(id)) } => {
                assert!(id.name.starts_with("x$$ssa"));
            }
            other => panic!("expected the return to read the phi's name, got {other:?}"),
        }
    }

    /// A name reassigned twice in straight-line code gets two distinct SSA
    /// names, with later reads referring to the latest definition.
    #[test]
    fn straight_line_reassignment_gets_distinct_ssa_names() {
        let mut entry = BasicBlock::new(BlockId::ENTRY);
        entry.instructions.push(assign("x", num(1.0)));
        entry.instructions.push(assign("x", num(2.0)));
        entry.terminator = Terminator::Return { argument: Some(ident("x")) };

        let mut program = Program { preamble: vec![], functions: vec![function(vec![entry])], postamble: vec![] };
        run(&mut program).unwrap();

        let block = &program.functions[0].blocks[0];
        let names: Vec<&str> = block
            .instructions
            .iter()
            .map(|i| match i {
                Instruction::Assign { target, .. } => target.name.as_str(),
                other => panic!("unexpected instruction {other:?}"),
            })
            .collect();
        assert_ne!(names[0], names[1]);
        assert!(names[0].starts_with("x$$ssa"));
        assert!(names[1].starts_with("x$$ssa"));

        match &block.terminator {
            Terminator::Return { argument: Some(Expression::Identifier(id)) } => {
                assert_eq!(id.name, names[1]);
            }
            other => panic!("expected return to read the latest definition, got {other:?}"),
        }
    }

    /// A user-supplied name that already contains a literal `$$ssa1`
    /// segment is not stripped before the real suffix is appended (§8
    /// invariant 5): it becomes `value$$ssa1$$ssa1`, not `value$$ssa1`.
    #[test]
    fn user_supplied_ssa_like_name_is_not_stripped() {
        let mut entry = BasicBlock::new(BlockId::ENTRY);
        entry.instructions.push(assign("value$$ssa1", num(1.0)));
        entry.terminator = Terminator::Return { argument: Some(ident("value$$ssa1")) };

        let mut program = Program { preamble: vec![], functions: vec![function(vec![entry])], postamble: vec![] };
        run(&mut program).unwrap();

        let block = &program.functions[0].blocks[0];
        match &block.instructions[0] {
            Instruction::Assign { target, .. } => {
                assert_eq!(target.name, "value$$ssa1$$ssa1");
            }
            other => panic!("unexpected instruction {other:?}"),
        }
    }

    /// A `while` loop's body reassigns the loop-carried name; the header's
    /// back edge requires a phi even though the header already has one
    /// incoming (forward) version from the preheader. Shaped the way
    /// `build::lower_while` actually emits a loop: a preheader block jumps
    /// into the condition block, which is never the function's own entry —
    /// the entry itself can never be a loop header, since it has no
    /// predecessor of its own to be ambiguous with.
    #[test]
    fn while_back_edge_inserts_phi_at_header() {
        let mut preheader = BasicBlock::new(BlockId::ENTRY);
        preheader.instructions.push(assign("i", num(0.0)));
        preheader.terminator = Terminator::Jump { target: BlockId(1) };

        let mut cond = BasicBlock::new(BlockId(1));
        cond.terminator = Terminator::Branch { test: ident("i"), consequent: BlockId(2), alternate: BlockId(3) };

        let mut body = BasicBlock::new(BlockId(2));
        body.instructions.push(assign("i", ident("next")));
        body.terminator = Terminator::Jump { target: BlockId(1) };

        let mut exit = BasicBlock::new(BlockId(3));
        exit.terminator = Terminator::Return { argument: Some(ident("i")) };

        let mut program =
            Program { preamble: vec![], functions: vec![function(vec![preheader, cond, body, exit])], postamble: vec![] };
        run(&mut program).expect("ssa renaming succeeds over a back edge");

        let cond = &program.functions[0].blocks[1];
        assert!(cond.instructions.iter().any(|i| matches!(i, Instruction::Phi { variable, .. } if variable == "i")));
    }
}
