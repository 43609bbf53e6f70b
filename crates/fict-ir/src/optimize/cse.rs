//! Common subexpression elimination (§4.5): within a single block, a later
//! assignment whose value is structurally identical to an earlier one is
//! rewritten to reference the earlier target instead of recomputing it.
//! Deliberately per-block, not extended across straight-line block chains —
//! see DESIGN.md.

use crate::ir::expr::{Expression, IdentifierExpr};
use crate::ir::function::Function;
use crate::ir::instr::Instruction;

pub fn run(function: &mut Function) {
    for block in &mut function.blocks {
        let mut candidates: Vec<(Expression, String)> = Vec::new();
        for instr in &mut block.instructions {
            match instr {
                Instruction::Assign { target, value, .. } => {
                    if !cse_eligible(value) {
                        candidates.clear();
                        continue;
                    }
                    if let Some((_, name)) = candidates.iter().find(|(cand, _)| cand == value) {
                        *value = Expression::Identifier(IdentifierExpr::new(name.clone(), value.span()));
                    } else {
                        candidates.push((value.clone(), target.name.clone()));
                    }
                }
                Instruction::Expression { value } => {
                    if !value.is_side_effect_free() {
                        candidates.clear();
                    }
                }
                Instruction::Phi { .. } => candidates.clear(),
            }
        }
    }
}

/// Stricter than `is_side_effect_free`: excludes `Arrow`/`Function` literals,
/// since two syntactically identical closures are still distinct values.
fn cse_eligible(expr: &Expression) -> bool {
    match expr {
        Expression::Arrow(_) | Expression::Function(_) | Expression::Array(_) | Expression::Object(_) => false,
        other => other.is_side_effect_free(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::block::{BasicBlock, BlockId};
    use crate::ir::expr::{BinaryExpr, IdentifierExpr, NumberLit};
    use crate::ir::instr::DeclarationKind;
    use crate::ir::terminator::Terminator;
    use fict_ast::{BinaryOp, Span};

    fn num(v: f64) -> Expression {
        Expression::NumberLiteral(NumberLit { value: v, span: Span::synthetic() })
    }

    fn add(a: &str, b: &str) -> Expression {
        Expression::Binary(BinaryExpr {
            operator: BinaryOp::Add,
            left: Box::new(Expression::Identifier(IdentifierExpr::new(a, Span::synthetic()))),
            right: Box::new(Expression::Identifier(IdentifierExpr::new(b, Span::synthetic()))),
            span: Span::synthetic(),
        })
    }

    #[test]
    fn reuses_identical_binary_expression() {
        let mut block = BasicBlock::new(BlockId::ENTRY);
        block.instructions.push(Instruction::Assign {
            target: IdentifierExpr::new("x$$ssa1", Span::synthetic()),
            value: add("a", "b"),
            declaration_kind: Some(DeclarationKind::Const),
        });
        block.instructions.push(Instruction::Assign {
            target: IdentifierExpr::new("y$$ssa1", Span::synthetic()),
            value: add("a", "b"),
            declaration_kind: Some(DeclarationKind::Const),
        });
        block.terminator = Terminator::Return { argument: None };
        let mut function = Function {
            name: Some("f".to_string()),
            params: vec![],
            original_params: vec![],
            blocks: vec![block],
            meta: Default::default(),
            span: Span::synthetic(),
        };

        run(&mut function);

        match &function.blocks[0].instructions[1] {
            Instruction::Assign { value: Expression::Identifier(id), .. } => assert_eq!(id.name, "x$$ssa1"),
            other => panic!("expected CSE rewrite, got {other:?}"),
        }
    }

    #[test]
    fn literal_candidates_survive_unrelated_call() {
        let mut block = BasicBlock::new(BlockId::ENTRY);
        block.instructions.push(Instruction::Assign {
            target: IdentifierExpr::new("x$$ssa1", Span::synthetic()),
            value: num(1.0),
            declaration_kind: Some(DeclarationKind::Const),
        });
        block.instructions.push(Instruction::Assign {
            target: IdentifierExpr::new("y$$ssa1", Span::synthetic()),
            value: num(1.0),
            declaration_kind: Some(DeclarationKind::Const),
        });
        block.terminator = Terminator::Return { argument: None };
        let mut function = Function {
            name: Some("f".to_string()),
            params: vec![],
            original_params: vec![],
            blocks: vec![block],
            meta: Default::default(),
            span: Span::synthetic(),
        };

        run(&mut function);

        match &function.blocks[0].instructions[1] {
            Instruction::Assign { value: Expression::Identifier(id), .. } => assert_eq!(id.name, "x$$ssa1"),
            other => panic!("expected CSE rewrite, got {other:?}"),
        }
    }
}
