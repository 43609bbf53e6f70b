//! HIR construction (§4.1): walks a parsed function body and emits basic
//! blocks with linear instructions and one terminator per block.

mod destructure;
mod expr;
mod loop_stack;
mod stmt;

pub use loop_stack::LoopStack;

use crate::context::CompileOptions;
use crate::error::{CompileError, CompileResult, Diagnostic};
use crate::ir::{BasicBlock, BlockId, Instruction, Terminator};
use fict_ast as ast;
use tracing::{debug, instrument};

/// Per-function HIR builder. Transient counters (block id) are reset per
/// function; the macro-alias/purity configuration and warning callback are
/// borrowed from the enclosing compilation and carried unchanged into
/// nested builders for closure bodies (§5).
pub struct Builder<'a, 'w> {
    options: &'a CompileOptions,
    on_warn: Option<&'w mut dyn FnMut(Diagnostic)>,
    program_directives: &'a [String],
    blocks: Vec<BasicBlock>,
    current: BlockId,
    next_block: u32,
    loops: LoopStack,
}

impl<'a, 'w> Builder<'a, 'w> {
    fn new(
        options: &'a CompileOptions,
        on_warn: Option<&'w mut dyn FnMut(Diagnostic)>,
        program_directives: &'a [String],
    ) -> Self {
        let mut builder = Self {
            options,
            on_warn,
            program_directives,
            blocks: Vec::new(),
            current: BlockId::ENTRY,
            next_block: 0,
            loops: LoopStack::new(),
        };
        let entry = builder.new_block();
        debug_assert_eq!(entry, BlockId::ENTRY);
        builder
    }

    /// A fresh builder for a nested function/arrow body, re-entering with
    /// the same ambient options and warning sink (§5).
    fn nested(&mut self) -> Builder<'a, '_> {
        Builder {
            options: self.options,
            on_warn: self.on_warn.as_deref_mut(),
            program_directives: self.program_directives,
            blocks: Vec::new(),
            current: BlockId::ENTRY,
            next_block: 0,
            loops: LoopStack::new(),
        }
        .init_entry()
    }

    fn init_entry(mut self) -> Self {
        let entry = self.new_block();
        debug_assert_eq!(entry, BlockId::ENTRY);
        self
    }

    fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.next_block);
        self.next_block += 1;
        self.blocks.push(BasicBlock::new(id));
        id
    }

    fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.as_u32() as usize]
    }

    fn current_mut(&mut self) -> &mut BasicBlock {
        let id = self.current;
        self.block_mut(id)
    }

    fn current_instruction_count(&self) -> usize {
        self.blocks[self.current.as_u32() as usize].instructions.len()
    }

    fn switch_to(&mut self, id: BlockId) {
        self.current = id;
    }

    fn push_instr(&mut self, instr: Instruction) {
        self.current_mut().instructions.push(instr);
    }

    fn is_sealed(&self, id: BlockId) -> bool {
        self.blocks[id.as_u32() as usize].is_sealed()
    }

    /// Seals the current block with `term`, unless it has already been
    /// sealed (e.g. by a nested `return`) — a block can only have one
    /// terminator (§3 invariant 1).
    fn seal(&mut self, term: Terminator) {
        if !self.is_sealed(self.current) {
            self.current_mut().terminator = term;
        }
    }

    fn error(&self, message: impl Into<String>, span: ast::Span) -> CompileError {
        CompileError::build_at(message, self.options.file.as_deref(), span.line)
    }

    fn emit_warning(&mut self, err: &CompileError) {
        let diag = Diagnostic::from_error(err);
        if let Some(cb) = self.on_warn.as_mut() {
            cb(diag);
        }
    }

    fn fail(&mut self, err: CompileError) -> CompileError {
        self.emit_warning(&err);
        err
    }

    fn finish(mut self, span: ast::Span) -> Vec<BasicBlock> {
        // Defensive fill: a block construction bug could in principle leave
        // a block unsealed; fill it rather than violate invariant 1.
        for block in &mut self.blocks {
            if !block.is_sealed() {
                block.terminator = Terminator::Unreachable;
            }
        }
        let _ = span;
        self.blocks
    }
}

/// Builds an entire program: partitions top-level statements into preamble,
/// lowered functions, and postamble (§4.1), then lowers each function body.
#[instrument(level = "debug", skip_all, fields(top_level_statements = program.body.len()))]
pub fn build_program(
    program: &ast::Program,
    options: &CompileOptions,
    mut on_warn: Option<&mut dyn FnMut(Diagnostic)>,
) -> CompileResult<crate::ir::Program> {
    let mut preamble = Vec::new();
    let mut functions = Vec::new();
    let mut postamble = Vec::new();

    for top in &program.body {
        stmt::lower_top_level(
            top,
            options,
            on_warn.as_deref_mut(),
            &program.directives,
            &mut preamble,
            &mut functions,
            &mut postamble,
        )?;
    }

    debug!(
        preamble = preamble.len(),
        functions = functions.len(),
        postamble = postamble.len(),
        "HIR build complete"
    );
    Ok(crate::ir::Program {
        preamble,
        functions,
        postamble,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::terminator::Terminator;
    use crate::ir::Function;

    fn span() -> ast::Span {
        ast::Span::synthetic()
    }

    fn ident_expr(name: &str) -> ast::Expr {
        ast::Expr::Identifier(ast::Identifier::new(name, span()))
    }

    fn num_expr(v: f64) -> ast::Expr {
        ast::Expr::NumberLiteral(ast::NumberLiteral { value: v, span: span() })
    }

    fn function_decl(name: &str, body: Vec<ast::Stmt>) -> ast::FunctionDeclaration {
        ast::FunctionDeclaration {
            name: ast::Identifier::new(name, span()),
            params: vec![],
            body,
            directives: vec![],
            leading_comments: vec![],
            is_async: false,
            is_generator: false,
            span: span(),
        }
    }

    fn build_single_function(decl: ast::FunctionDeclaration) -> Function {
        let program = ast::Program { directives: vec![], body: vec![ast::Stmt::FunctionDecl(decl)] };
        let options = CompileOptions::new();
        let ir = build_program(&program, &options, None).expect("build succeeds");
        assert_eq!(ir.functions.len(), 1);
        ir.functions.into_iter().next().unwrap()
    }

    /// `function f() { if (cond) { return 1 } return 2 }` — the `if` with no
    /// `else` still produces a branch with a consequent and a join block the
    /// alternate falls straight through to, per `lower_if`.
    #[test]
    fn branch_and_return_produces_expected_block_shape() {
        let if_stmt = ast::Stmt::If(ast::IfStatement {
            test: ident_expr("cond"),
            consequent: Box::new(ast::Stmt::Return(ast::ReturnStatement {
                argument: Some(num_expr(1.0)),
                span: span(),
            })),
            alternate: None,
            span: span(),
        });
        let trailing_return = ast::Stmt::Return(ast::ReturnStatement { argument: Some(num_expr(2.0)), span: span() });
        let function = build_single_function(function_decl("f", vec![if_stmt, trailing_return]));

        // entry (branch) -> consequent (return 1), alternate (falls through
        // to join) -> join (return 2), plus the two dead blocks `lower_return`
        // opens after each `return` it seals.
        assert_eq!(function.blocks.len(), 6);
        assert!(matches!(
            function.blocks[0].terminator,
            Terminator::Branch { consequent: BlockId(1), alternate: BlockId(2), .. }
        ));
        assert!(matches!(function.blocks[1].terminator, Terminator::Return { argument: Some(_) }));
        assert!(matches!(function.blocks[2].terminator, Terminator::Jump { target: BlockId(3) }));
        assert!(matches!(function.blocks[3].terminator, Terminator::Return { argument: Some(_) }));
    }

    /// `function f() { while (cond) { i = i + 1 } return i }` — `lower_while`
    /// always gives the condition block a forward predecessor (the
    /// preheader) distinct from the body's back edge.
    #[test]
    fn while_loop_produces_expected_block_shape() {
        let reassign = ast::Stmt::Expression(ast::ExpressionStatement {
            expression: ast::Expr::Assignment(ast::AssignmentExpression {
                operator: ast::AssignmentOp::Assign,
                left: ast::AssignmentTarget::Identifier(ast::Identifier::new("i", span())),
                right: Box::new(ast::Expr::Binary(ast::BinaryExpression {
                    operator: ast::BinaryOp::Add,
                    left: Box::new(ident_expr("i")),
                    right: Box::new(num_expr(1.0)),
                    span: span(),
                })),
                span: span(),
            }),
            span: span(),
        });
        let while_stmt = ast::Stmt::While(ast::WhileStatement {
            test: ident_expr("cond"),
            body: Box::new(ast::Stmt::Block(ast::BlockStatement { body: vec![reassign], span: span() })),
            span: span(),
        });
        let trailing_return = ast::Stmt::Return(ast::ReturnStatement { argument: Some(ident_expr("i")), span: span() });
        let function = build_single_function(function_decl("f", vec![while_stmt, trailing_return]));

        // entry (jump to cond) -> cond (branch body/exit) -> body (jump back
        // to cond) -> exit (return), plus the dead block `lower_return` opens
        // after sealing the exit block's `Return`.
        assert_eq!(function.blocks.len(), 5);
        assert!(matches!(function.blocks[0].terminator, Terminator::Jump { target: BlockId(1) }));
        assert!(matches!(
            function.blocks[1].terminator,
            Terminator::Branch { consequent: BlockId(2), alternate: BlockId(3), .. }
        ));
        assert!(matches!(function.blocks[2].terminator, Terminator::Jump { target: BlockId(1) }));
        assert!(matches!(function.blocks[3].terminator, Terminator::Return { .. }));
    }
}
