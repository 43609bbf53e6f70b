//! Single-use inlining (§4.5): a binding read exactly once is substituted at
//! its use site and the binding dropped, provided its value is side-effect
//! free. Compiler-introduced temporaries (`__destruct_*`, `__forOf_*`,
//! `__forIn_*`, `__fictPropsRest`) are always eligible; user-named `const`
//! bindings are eligible only when `inline_derived_memos` is set, since
//! inlining a derived value changes where its memoization boundary sits.

use super::const_prop::substitute_block;
use super::count_uses;
use crate::context::CompileOptions;
use crate::ir::expr::Expression;
use crate::ir::function::Function;
use crate::ir::instr::Instruction;
use rustc_hash::FxHashMap;

const TEMP_PREFIX: &str = "__";

pub fn run(function: &mut Function, options: &CompileOptions) {
    loop {
        let counts = count_uses(function);
        let mut substitutions: FxHashMap<String, Expression> = FxHashMap::default();
        for block in &function.blocks {
            for instr in &block.instructions {
                if let Instruction::Assign { target, value, .. } = instr {
                    let uses = counts.get(&target.name).copied().unwrap_or(0);
                    let eligible = uses == 1
                        && value.is_side_effect_free()
                        && (is_compiler_temp(&target.name) || options.inline_derived_memos);
                    if eligible {
                        substitutions.insert(target.name.clone(), value.clone());
                    }
                }
            }
        }
        if substitutions.is_empty() {
            break;
        }
        for block in &mut function.blocks {
            substitute_block(block, &substitutions);
        }
        for block in &mut function.blocks {
            block.instructions.retain(|instr| match instr {
                Instruction::Assign { target, .. } => !substitutions.contains_key(&target.name),
                _ => true,
            });
        }
    }
}

fn is_compiler_temp(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::block::{BasicBlock, BlockId};
    use crate::ir::expr::{IdentifierExpr, NumberLit};
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
    fn inlines_compiler_temp_with_single_use() {
        let mut f = function_with(
            vec![Instruction::Assign {
                target: IdentifierExpr::new("__destruct_1", Span::synthetic()),
                value: num(4.0),
                declaration_kind: Some(DeclarationKind::Const),
            }],
            Some(Expression::Identifier(IdentifierExpr::new("__destruct_1", Span::synthetic()))),
        );
        run(&mut f, &CompileOptions::new());
        assert!(f.blocks[0].instructions.is_empty());
        match &f.blocks[0].terminator {
            Terminator::Return { argument: Some(Expression::NumberLiteral(n)) } => assert_eq!(n.value, 4.0),
            other => panic!("expected inlined literal, got {other:?}"),
        }
    }

    #[test]
    fn leaves_user_named_binding_unless_opted_in() {
        let mut f = function_with(
            vec![Instruction::Assign {
                target: IdentifierExpr::new("total$$ssa1", Span::synthetic()),
                value: num(4.0),
                declaration_kind: Some(DeclarationKind::Const),
            }],
            Some(Expression::Identifier(IdentifierExpr::new("total$$ssa1", Span::synthetic()))),
        );
        run(&mut f, &CompileOptions::new());
        assert_eq!(f.blocks[0].instructions.len(), 1);

        let opted_in = CompileOptions::new().with_inline_derived_memos(true);
        run(&mut f, &opted_in);
        assert!(f.blocks[0].instructions.is_empty());
    }
}
