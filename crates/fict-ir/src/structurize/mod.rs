//! CFG structurization (§4.3): recovers a tree of `StructuredNode`s from a
//! function's basic blocks so later passes never need to rediscover loop
//! and branch shape from raw jump targets.
//!
//! Loop headers are found the same way as the SSA pass finds back edges
//! (`ssa::mod`): a block is a loop header iff some block reachable from it
//! has an edge back to it. A header whose own terminator is a `Branch` with
//! exactly one side looping back is a test-at-top loop (`while`/`for`,
//! indistinguishable once lowered — see `node.rs`); otherwise the header is
//! the first block of a `do`/`while` body and the closing `Branch` is found
//! by continuing the walk with a "close on this target" watch.

mod node;

pub use node::{StructuredFunction, StructuredNode, StructuredProgram, SwitchCaseNode, TryHandlerNode};

use crate::error::{CompileError, CompileResult};
use crate::ir::block::{BasicBlock, BlockId};
use crate::ir::expr::{Expression, UnaryExpr};
use crate::ir::terminator::Terminator;
use crate::ir::{Function, Program};
use fict_ast::UnaryOp;
use rustc_hash::FxHashSet;
use tracing::instrument;

#[instrument(level = "debug", skip_all, fields(functions = program.functions.len()))]
pub fn run(program: &Program) -> CompileResult<StructuredProgram> {
    let functions = program
        .functions
        .iter()
        .map(structurize_function)
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(StructuredProgram { functions })
}

#[instrument(level = "debug", skip_all, fields(function = function.name.as_deref().unwrap_or("<anonymous>")))]
fn structurize_function(function: &Function) -> CompileResult<StructuredFunction> {
    let ctx = Ctx { blocks: &function.blocks };
    let walked = walk(&ctx, BlockId::ENTRY, None, None)?;
    Ok(StructuredFunction {
        name: function.name.clone(),
        params: function.params.clone(),
        meta: function.meta.clone(),
        body: StructuredNode::Block(walked.nodes),
    })
}

struct Ctx<'a> {
    blocks: &'a [BasicBlock],
}

impl<'a> Ctx<'a> {
    fn block(&self, id: BlockId) -> &'a BasicBlock {
        &self.blocks[id.as_u32() as usize]
    }
}

enum WalkEnd {
    /// Reached the caller-supplied `stop` block; the caller continues from there.
    Stop,
    /// Ran off the end of control flow (return/throw/break/continue/unreachable).
    Terminal,
    /// Reached a `Branch` whose target was the `close_header` being watched
    /// for, closing a `do`/`while` body. Carries the loop test and the exit
    /// block (the branch's other side).
    Closed(Expression, BlockId),
}

struct Walked {
    nodes: Vec<StructuredNode>,
    end: WalkEnd,
}

/// Walks forward from `start`, accumulating structured nodes, until it hits
/// `stop`, a block that closes `close_header`, or a terminal instruction.
/// `close_header` is propagated into nested if/switch/try arms (control can
/// still flow through them back to the loop condition) but never into a
/// freshly-discovered nested loop's own body, which watches for its own
/// header instead.
fn walk(
    ctx: &Ctx,
    start: BlockId,
    stop: Option<BlockId>,
    close_header: Option<BlockId>,
) -> CompileResult<Walked> {
    let mut nodes = Vec::new();
    let mut cursor = start;

    loop {
        if Some(cursor) == stop {
            return Ok(Walked { nodes, end: WalkEnd::Stop });
        }

        let block = ctx.block(cursor);
        for instr in &block.instructions {
            nodes.push(StructuredNode::Instruction(cursor, instr.clone()));
        }

        match &block.terminator {
            Terminator::Jump { target } => {
                if is_loop_header(ctx, cursor) {
                    let body = walk(ctx, *target, None, Some(cursor))?;
                    let (test, exit) = match body.end {
                        WalkEnd::Closed(test, exit) => (test, exit),
                        _ => {
                            return Err(CompileError::analysis(
                                "loop header's body never closed the loop",
                                Some(cursor.as_u32()),
                            ))
                        }
                    };
                    nodes.push(StructuredNode::DoWhile {
                        body: Box::new(StructuredNode::Block(body.nodes)),
                        test,
                    });
                    cursor = exit;
                    continue;
                }
                cursor = *target;
                continue;
            }
            Terminator::Branch { test, consequent, alternate } => {
                if let Some(close) = close_header {
                    if *consequent == close {
                        return Ok(Walked { nodes, end: WalkEnd::Closed(test.clone(), *alternate) });
                    }
                    if *alternate == close {
                        return Ok(Walked {
                            nodes,
                            end: WalkEnd::Closed(negate(test.clone()), *consequent),
                        });
                    }
                }

                if is_loop_header(ctx, cursor) {
                    let mut seen = FxHashSet::default();
                    let cons_back = region_reaches_back(ctx, *consequent, cursor, &mut seen);
                    let mut seen = FxHashSet::default();
                    let alt_back = region_reaches_back(ctx, *alternate, cursor, &mut seen);
                    let (body_entry, exit) = match (cons_back, alt_back) {
                        (true, false) => (*consequent, *alternate),
                        (false, true) => (*alternate, *consequent),
                        _ => {
                            return Err(CompileError::analysis(
                                "ambiguous loop shape during structurization",
                                Some(cursor.as_u32()),
                            ))
                        }
                    };
                    let body = walk(ctx, body_entry, Some(cursor), None)?;
                    nodes.push(StructuredNode::While {
                        test: test.clone(),
                        body: Box::new(StructuredNode::Block(body.nodes)),
                    });
                    cursor = exit;
                    continue;
                }

                let join = BlockId(alternate.as_u32() + 1);
                let cons = walk(ctx, *consequent, Some(join), close_header)?;
                if let WalkEnd::Closed(..) = cons.end {
                    nodes.push(StructuredNode::If {
                        test: test.clone(),
                        consequent: Box::new(StructuredNode::Block(cons.nodes)),
                        alternate: None,
                    });
                    return propagate_closed(nodes, cons.end);
                }

                let alt = walk(ctx, *alternate, Some(join), close_header)?;
                let alternate_node = if alt.nodes.is_empty() {
                    None
                } else {
                    Some(Box::new(StructuredNode::Block(alt.nodes)))
                };
                let closed = matches!(alt.end, WalkEnd::Closed(..));
                nodes.push(StructuredNode::If {
                    test: test.clone(),
                    consequent: Box::new(StructuredNode::Block(cons.nodes)),
                    alternate: alternate_node,
                });
                if closed {
                    return propagate_closed(nodes, alt.end);
                }

                cursor = join;
                continue;
            }
            Terminator::Switch { discriminant, cases } => {
                if cases.is_empty() {
                    nodes.push(StructuredNode::Switch { discriminant: discriminant.clone(), cases: Vec::new() });
                    return Ok(Walked { nodes, end: WalkEnd::Terminal });
                }
                let exit = BlockId(cases[0].target.as_u32() - 1);
                let mut case_nodes = Vec::with_capacity(cases.len());
                let mut closed_end = None;
                for case in cases {
                    let result = walk(ctx, case.target, Some(exit), close_header)?;
                    if let WalkEnd::Closed(..) = result.end {
                        closed_end = Some(result.end);
                    }
                    case_nodes.push(SwitchCaseNode {
                        test: case.test.clone(),
                        body: StructuredNode::Block(result.nodes),
                    });
                }
                nodes.push(StructuredNode::Switch { discriminant: discriminant.clone(), cases: case_nodes });
                if let Some(end) = closed_end {
                    return propagate_closed(nodes, end);
                }
                cursor = exit;
                continue;
            }
            Terminator::Try { try_block, catch_block, catch_param, finally_block, exit } => {
                let after_try = finally_block.unwrap_or(*exit);
                let try_result = walk(ctx, *try_block, Some(after_try), close_header)?;
                let mut closed_end = None;
                if matches!(&try_result.end, WalkEnd::Closed(..)) {
                    closed_end = Some(try_result.end);
                }

                let handler = match catch_block {
                    Some(cb) => {
                        let result = walk(ctx, *cb, Some(after_try), close_header)?;
                        if matches!(&result.end, WalkEnd::Closed(..)) {
                            closed_end = Some(result.end);
                        }
                        Some(TryHandlerNode { param: catch_param.clone(), body: StructuredNode::Block(result.nodes) })
                    }
                    None => None,
                };

                let finalizer = match finally_block {
                    Some(fb) => {
                        let result = walk(ctx, *fb, Some(*exit), close_header)?;
                        if matches!(&result.end, WalkEnd::Closed(..)) {
                            closed_end = Some(result.end);
                        }
                        Some(Box::new(StructuredNode::Block(result.nodes)))
                    }
                    None => None,
                };

                nodes.push(StructuredNode::Try {
                    block: Box::new(StructuredNode::Block(try_result.nodes)),
                    handler,
                    finalizer,
                });
                if let Some(end) = closed_end {
                    return propagate_closed(nodes, end);
                }
                cursor = *exit;
                continue;
            }
            Terminator::ForOf { iterable, variable, variable_kind, pattern, body, exit } => {
                let result = walk(ctx, *body, Some(*exit), None)?;
                nodes.push(StructuredNode::ForOf {
                    variable: variable.clone(),
                    variable_kind: *variable_kind,
                    pattern: pattern.clone(),
                    iterable: iterable.clone(),
                    body: Box::new(StructuredNode::Block(result.nodes)),
                });
                cursor = *exit;
                continue;
            }
            Terminator::ForIn { object, variable, variable_kind, pattern, body, exit } => {
                let result = walk(ctx, *body, Some(*exit), None)?;
                nodes.push(StructuredNode::ForIn {
                    variable: variable.clone(),
                    variable_kind: *variable_kind,
                    pattern: pattern.clone(),
                    object: object.clone(),
                    body: Box::new(StructuredNode::Block(result.nodes)),
                });
                cursor = *exit;
                continue;
            }
            Terminator::Return { argument } => {
                nodes.push(StructuredNode::Return { argument: argument.clone() });
                return Ok(Walked { nodes, end: WalkEnd::Terminal });
            }
            Terminator::Throw { argument } => {
                nodes.push(StructuredNode::Throw { argument: argument.clone() });
                return Ok(Walked { nodes, end: WalkEnd::Terminal });
            }
            Terminator::Break { label, .. } => {
                nodes.push(StructuredNode::Break { label: label.clone() });
                return Ok(Walked { nodes, end: WalkEnd::Terminal });
            }
            Terminator::Continue { label, .. } => {
                nodes.push(StructuredNode::Continue { label: label.clone() });
                return Ok(Walked { nodes, end: WalkEnd::Terminal });
            }
            Terminator::Unreachable => {
                return Ok(Walked { nodes, end: WalkEnd::Terminal });
            }
        }
    }
}

fn propagate_closed(nodes: Vec<StructuredNode>, end: WalkEnd) -> CompileResult<Walked> {
    Ok(Walked { nodes, end })
}

fn negate(expr: Expression) -> Expression {
    let span = expr.span();
    Expression::Unary(UnaryExpr { operator: UnaryOp::Not, argument: Box::new(expr), span })
}

fn is_loop_header(ctx: &Ctx, id: BlockId) -> bool {
    let mut seen = FxHashSet::default();
    region_reaches_back(ctx, id, id, &mut seen)
}

/// Whether any block reachable from `start` (without revisiting a block
/// already explored in this query) has an edge directly into `header`.
fn region_reaches_back(ctx: &Ctx, start: BlockId, header: BlockId, seen: &mut FxHashSet<BlockId>) -> bool {
    if !seen.insert(start) {
        return false;
    }
    for succ in ctx.block(start).terminator.successors() {
        if succ == header {
            return true;
        }
        if region_reaches_back(ctx, succ, header, seen) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::expr::IdentifierExpr;
    use crate::ir::instr::{DeclarationKind, Instruction};
    use fict_ast::Span;

    fn ident(name: &str) -> Expression {
        Expression::Identifier(IdentifierExpr::new(name, Span::synthetic()))
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

    /// `if (cond) { x = 1 } else { x = 2 }; return x` recovers as a single
    /// `If` node followed by the shared `Return`, with the join block
    /// (`alternate + 1`) resuming the outer walk.
    #[test]
    fn recovers_if_else_with_join() {
        let mut entry = BasicBlock::new(BlockId::ENTRY);
        entry.terminator = Terminator::Branch { test: ident("cond"), consequent: BlockId(1), alternate: BlockId(2) };

        let mut cons = BasicBlock::new(BlockId(1));
        cons.instructions.push(assign("x", ident("one")));
        cons.terminator = Terminator::Jump { target: BlockId(3) };

        let mut alt = BasicBlock::new(BlockId(2));
        alt.instructions.push(assign("x", ident("two")));
        alt.terminator = Terminator::Jump { target: BlockId(3) };

        let mut join = BasicBlock::new(BlockId(3));
        join.terminator = Terminator::Return { argument: Some(ident("x")) };

        let f = function(vec![entry, cons, alt, join]);
        let structured = structurize_function(&f).expect("structurizes cleanly");

        let StructuredNode::Block(nodes) = structured.body else { panic!("expected a block body") };
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], StructuredNode::If { alternate: Some(_), .. }));
        assert!(matches!(&nodes[1], StructuredNode::Return { .. }));
    }

    /// A test-at-top loop (`while`) recovers as a single `While` node; the
    /// branch side that reaches back to the header becomes the body, the
    /// other side becomes the resumed outer cursor.
    #[test]
    fn recovers_while_loop() {
        let mut header = BasicBlock::new(BlockId::ENTRY);
        header.terminator = Terminator::Branch { test: ident("i"), consequent: BlockId(1), alternate: BlockId(2) };

        let mut body = BasicBlock::new(BlockId(1));
        body.instructions.push(assign("i", ident("next")));
        body.terminator = Terminator::Jump { target: BlockId::ENTRY };

        let mut exit = BasicBlock::new(BlockId(2));
        exit.terminator = Terminator::Return { argument: None };

        let f = function(vec![header, body, exit]);
        let structured = structurize_function(&f).expect("structurizes cleanly");

        let StructuredNode::Block(nodes) = structured.body else { panic!("expected a block body") };
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], StructuredNode::While { .. }));
        assert!(matches!(&nodes[1], StructuredNode::Return { argument: None }));
    }

    /// A `do`/`while` whose closing branch sits inside a `try` block still
    /// closes the enclosing loop: the `Closed` end propagates out through
    /// the `Try` node instead of being dropped.
    #[test]
    fn do_while_closing_inside_try_propagates_closed() {
        let mut header = BasicBlock::new(BlockId::ENTRY);
        header.terminator = Terminator::Jump { target: BlockId(1) };

        let mut try_wrapper = BasicBlock::new(BlockId(1));
        try_wrapper.terminator = Terminator::Try {
            try_block: BlockId(2),
            catch_block: None,
            catch_param: None,
            finally_block: None,
            exit: BlockId(4),
        };

        let mut try_body = BasicBlock::new(BlockId(2));
        try_body.terminator = Terminator::Branch { test: ident("cond"), consequent: BlockId::ENTRY, alternate: BlockId(3) };

        let mut after_loop = BasicBlock::new(BlockId(3));
        after_loop.terminator = Terminator::Return { argument: Some(ident("result")) };

        let unreachable_exit = BasicBlock::new(BlockId(4));

        let f = function(vec![header, try_wrapper, try_body, after_loop, unreachable_exit]);
        let structured = structurize_function(&f).expect("structurizes cleanly");

        let StructuredNode::Block(nodes) = structured.body else { panic!("expected a block body") };
        assert_eq!(nodes.len(), 2);
        let StructuredNode::DoWhile { body, .. } = &nodes[0] else { panic!("expected a do/while node") };
        let StructuredNode::Block(body_nodes) = body.as_ref() else { panic!("expected a block body") };
        assert!(matches!(body_nodes.as_slice(), [StructuredNode::Try { .. }]));
        assert!(matches!(&nodes[1], StructuredNode::Return { .. }));
    }
}
