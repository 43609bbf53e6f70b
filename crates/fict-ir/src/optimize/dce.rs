//! Dead-code elimination (§4.5): drops `x = E` when `x` has no uses and `E`
//! is side-effect-free. Runs to a fixed point since removing one dead
//! assignment can make the assignments its value read become dead in turn.

use super::count_uses;
use crate::ir::function::Function;
use crate::ir::instr::Instruction;

pub fn run(function: &mut Function) {
    loop {
        let counts = count_uses(function);
        let mut changed = false;
        for block in &mut function.blocks {
            block.instructions.retain(|instr| {
                let keep = match instr {
                    Instruction::Assign { target, value, .. } => {
                        counts.get(&target.name).copied().unwrap_or(0) > 0 || !value.is_side_effect_free()
                    }
                    Instruction::Phi { target, .. } => counts.get(&target.name).copied().unwrap_or(0) > 0,
                    Instruction::Expression { .. } => true,
                };
                if !keep {
                    changed = true;
                }
                keep
            });
        }
        if !changed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::block::{BasicBlock, BlockId};
    use crate::ir::expr::{Expression, IdentifierExpr, NumberLit};
    use crate::ir::instr::DeclarationKind;
    use crate::ir::terminator::Terminator;
    use fict_ast::Span;

    fn num(v: f64) -> Expression {
        Expression::NumberLiteral(NumberLit { value: v, span: Span::synthetic() })
    }

    fn function_with(instrs: Vec<Instruction>, ret: Option<Expression>) -> Function {
        let mut block = BasicBlock::new(BlockId::ENTRY);
        block.instructions = instrs;
        block.terminator = Terminator::Return { argument: ret };
        Function {
            name: Some("f".to_string()),
            params: vec![],
            original_params: vec![],
            blocks: vec![block],
            meta: Default::default(),
            span: Span::synthetic(),
        }
    }

    #[test]
    fn removes_unused_pure_assignment() {
        let mut f = function_with(
            vec![Instruction::Assign {
                target: IdentifierExpr::new("x$$ssa1", Span::synthetic()),
                value: num(1.0),
                declaration_kind: Some(DeclarationKind::Const),
            }],
            Some(num(2.0)),
        );
        run(&mut f);
        assert!(f.blocks[0].instructions.is_empty());
    }

    #[test]
    fn keeps_assignment_used_by_return() {
        let mut f = function_with(
            vec![Instruction::Assign {
                target: IdentifierExpr::new("x$$ssa1", Span::synthetic()),
                value: num(1.0),
                declaration_kind: Some(DeclarationKind::Const),
            }],
            Some(Expression::Identifier(IdentifierExpr::new("x$$ssa1", Span::synthetic()))),
        );
        run(&mut f);
        assert_eq!(f.blocks[0].instructions.len(), 1);
    }

    #[test]
    fn keeps_impure_assignment_even_unused() {
        let call = Expression::Call(crate::ir::expr::CallExpr {
            callee: Box::new(Expression::Identifier(IdentifierExpr::new("sideEffect", Span::synthetic()))),
            arguments: vec![],
            pure: false,
            span: Span::synthetic(),
        });
        let mut f = function_with(
            vec![Instruction::Assign {
                target: IdentifierExpr::new("x$$ssa1", Span::synthetic()),
                value: call,
                declaration_kind: Some(DeclarationKind::Const),
            }],
            None,
        );
        run(&mut f);
        assert_eq!(f.blocks[0].instructions.len(), 1);
    }
}
