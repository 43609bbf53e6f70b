//! Statement dispatch (§4.1): the per-statement block-construction algorithm,
//! plus the top-level partition into preamble/functions/postamble.

use super::Builder;
use crate::annotation::parse_fict_return;
use crate::context::CompileOptions;
use crate::error::{CompileResult, Diagnostic};
use crate::ir::expr::{Expression, IdentifierExpr};
use crate::ir::instr::{DeclarationKind as IrDeclKind, Instruction};
use crate::ir::terminator::{SwitchCase as IrSwitchCase, Terminator};
use crate::ir::{BlockId, Function, FunctionMeta, PostambleEntry};
use crate::normalize::destructure::{for_in_binding_name, for_of_binding_name};
use crate::normalize::purity::{detect_purity, PurityFlags};
use fict_ast as ast;

/// Partitions one top-level statement into the program's preamble, lowered
/// functions, or postamble (§4.1: imports, function declarations and
/// const-bound function/arrow expressions, exports of either, everything
/// else verbatim).
pub fn lower_top_level(
    top: &ast::Stmt,
    options: &CompileOptions,
    mut on_warn: Option<&mut dyn FnMut(Diagnostic)>,
    program_directives: &[String],
    preamble: &mut Vec<ast::ImportDeclaration>,
    functions: &mut Vec<Function>,
    postamble: &mut Vec<PostambleEntry>,
) -> CompileResult<()> {
    match top {
        ast::Stmt::Import(decl) => {
            preamble.push(decl.clone());
            Ok(())
        }
        ast::Stmt::FunctionDecl(decl) => {
            let function = build_function_decl(decl, options, on_warn.as_deref_mut(), program_directives)?;
            functions.push(function);
            Ok(())
        }
        ast::Stmt::VariableDecl(decl) => lower_top_level_variable_decl(
            decl,
            options,
            on_warn,
            program_directives,
            functions,
            postamble,
        ),
        ast::Stmt::Export(export) => {
            lower_export(top, export, options, on_warn, program_directives, functions, postamble)
        }
        other => {
            postamble.push(PostambleEntry::Verbatim(other.clone()));
            Ok(())
        }
    }
}

fn lower_top_level_variable_decl(
    decl: &ast::VariableDeclaration,
    options: &CompileOptions,
    mut on_warn: Option<&mut dyn FnMut(Diagnostic)>,
    program_directives: &[String],
    functions: &mut Vec<Function>,
    postamble: &mut Vec<PostambleEntry>,
) -> CompileResult<()> {
    if is_const_function_binding(decl) {
        let declarator = &decl.declarations[0];
        let name = match &declarator.id {
            ast::Pattern::Identifier(id) => id.name.clone(),
            _ => unreachable!("is_const_function_binding guarantees an identifier"),
        };
        let function = match declarator.init.as_ref().unwrap() {
            ast::Expr::Arrow(arrow) => build_function_from_arrow(
                name,
                arrow,
                &[],
                &[],
                options,
                on_warn.as_deref_mut(),
                program_directives,
            )?,
            ast::Expr::Function(func) => {
                build_function_from_function_expr(name, func, options, on_warn.as_deref_mut(), program_directives)?
            }
            _ => unreachable!("is_const_function_binding guarantees an arrow or function initializer"),
        };
        functions.push(function);
        return Ok(());
    }

    postamble.push(PostambleEntry::Verbatim(ast::Stmt::VariableDecl(decl.clone())));
    Ok(())
}

fn is_const_function_binding(decl: &ast::VariableDeclaration) -> bool {
    decl.kind == ast::DeclarationKind::Const
        && decl.declarations.len() == 1
        && matches!(&decl.declarations[0].id, ast::Pattern::Identifier(_))
        && matches!(
            &decl.declarations[0].init,
            Some(ast::Expr::Arrow(_)) | Some(ast::Expr::Function(_))
        )
}

fn lower_export(
    top: &ast::Stmt,
    export: &ast::ExportDeclaration,
    options: &CompileOptions,
    mut on_warn: Option<&mut dyn FnMut(Diagnostic)>,
    program_directives: &[String],
    functions: &mut Vec<Function>,
    postamble: &mut Vec<PostambleEntry>,
) -> CompileResult<()> {
    match export {
        ast::ExportDeclaration::Named { declaration, .. } => match declaration.as_ref() {
            ast::Stmt::FunctionDecl(decl) => {
                let function =
                    build_function_decl(decl, options, on_warn.as_deref_mut(), program_directives)?;
                let name = function.name.clone().expect("function declarations are always named");
                functions.push(function);
                postamble.push(PostambleEntry::ExportFunction { name });
                Ok(())
            }
            ast::Stmt::VariableDecl(vd) if is_const_function_binding(vd) => {
                let declarator = &vd.declarations[0];
                let name = match &declarator.id {
                    ast::Pattern::Identifier(id) => id.name.clone(),
                    _ => unreachable!("is_const_function_binding guarantees an identifier"),
                };
                let function = match declarator.init.as_ref().unwrap() {
                    ast::Expr::Arrow(arrow) => build_function_from_arrow(
                        name,
                        arrow,
                        &[],
                        &[],
                        options,
                        on_warn.as_deref_mut(),
                        program_directives,
                    )?,
                    ast::Expr::Function(func) => build_function_from_function_expr(
                        name,
                        func,
                        options,
                        on_warn.as_deref_mut(),
                        program_directives,
                    )?,
                    _ => unreachable!(
                        "is_const_function_binding guarantees an arrow or function initializer"
                    ),
                };
                let name = function.name.clone().expect("named above");
                functions.push(function);
                postamble.push(PostambleEntry::ExportFunction { name });
                Ok(())
            }
            _ => {
                postamble.push(PostambleEntry::Verbatim(top.clone()));
                Ok(())
            }
        },
        ast::ExportDeclaration::DefaultDeclaration { declaration, .. } => match declaration.as_ref() {
            ast::Stmt::FunctionDecl(decl) => {
                let function =
                    build_function_decl(decl, options, on_warn.as_deref_mut(), program_directives)?;
                let name = function.name.clone().expect("function declarations are always named");
                functions.push(function);
                postamble.push(PostambleEntry::ExportDefault { name });
                Ok(())
            }
            _ => {
                postamble.push(PostambleEntry::Verbatim(top.clone()));
                Ok(())
            }
        },
        ast::ExportDeclaration::DefaultExpression { expression, .. } => match expression.as_ref() {
            ast::Expr::Arrow(arrow) => {
                let function = build_function_from_arrow(
                    "default".to_string(),
                    arrow,
                    &[],
                    &[],
                    options,
                    on_warn.as_deref_mut(),
                    program_directives,
                )?;
                functions.push(function);
                postamble.push(PostambleEntry::ExportDefault { name: "default".to_string() });
                Ok(())
            }
            ast::Expr::Function(func) => {
                let function = build_function_from_function_expr(
                    "default".to_string(),
                    func,
                    options,
                    on_warn.as_deref_mut(),
                    program_directives,
                )?;
                functions.push(function);
                postamble.push(PostambleEntry::ExportDefault { name: "default".to_string() });
                Ok(())
            }
            _ => {
                postamble.push(PostambleEntry::Verbatim(top.clone()));
                Ok(())
            }
        },
        ast::ExportDeclaration::NamedSpecifiers { .. } => {
            postamble.push(PostambleEntry::Verbatim(top.clone()));
            Ok(())
        }
    }
}

fn build_function_decl(
    decl: &ast::FunctionDeclaration,
    options: &CompileOptions,
    on_warn: Option<&mut dyn FnMut(Diagnostic)>,
    program_directives: &[String],
) -> CompileResult<Function> {
    let mut builder = Builder::new(options, on_warn, program_directives);
    let mut flat_params = Vec::with_capacity(decl.params.len());
    for p in &decl.params {
        flat_params.push(builder.destructure_param(p)?);
    }
    builder.lower_body(&decl.body)?;
    let blocks = builder.finish(decl.span);

    let flags = detect_purity(program_directives, &decl.directives, &decl.leading_comments, PurityFlags::default());
    let hook_return_info = parse_fict_return(decl.leading_comments.iter().map(String::as_str));

    Ok(Function {
        name: Some(decl.name.name.clone()),
        params: flat_params,
        original_params: decl.params.clone(),
        blocks,
        meta: FunctionMeta {
            no_memo: flags.no_memo,
            pure: flags.pure,
            is_async: decl.is_async,
            hook_return_info,
            from_expression: false,
            is_arrow: false,
            has_expression_body: false,
        },
        span: decl.span,
    })
}

fn build_function_from_arrow(
    name: String,
    arrow: &ast::ArrowFunctionExpression,
    directives: &[String],
    leading_comments: &[String],
    options: &CompileOptions,
    on_warn: Option<&mut dyn FnMut(Diagnostic)>,
    program_directives: &[String],
) -> CompileResult<Function> {
    let mut builder = Builder::new(options, on_warn, program_directives);
    let mut flat_params = Vec::with_capacity(arrow.params.len());
    for p in &arrow.params {
        flat_params.push(builder.destructure_param(p)?);
    }

    let has_expression_body = matches!(arrow.body, ast::ArrowBody::Expression(_));
    match &arrow.body {
        ast::ArrowBody::Expression(expr) => {
            let value = builder.lower_expr(expr)?;
            builder.seal(Terminator::Return { argument: Some(value) });
        }
        ast::ArrowBody::Block(stmts) => builder.lower_body(stmts)?,
    }

    let blocks = builder.finish(arrow.span);
    let flags = detect_purity(program_directives, directives, leading_comments, PurityFlags::default());
    let hook_return_info = parse_fict_return(leading_comments.iter().map(String::as_str));

    Ok(Function {
        name: Some(name),
        params: flat_params,
        original_params: arrow.params.clone(),
        blocks,
        meta: FunctionMeta {
            no_memo: flags.no_memo,
            pure: flags.pure,
            is_async: arrow.is_async,
            hook_return_info,
            from_expression: true,
            is_arrow: true,
            has_expression_body,
        },
        span: arrow.span,
    })
}

fn build_function_from_function_expr(
    name: String,
    func: &ast::FunctionExpression,
    options: &CompileOptions,
    on_warn: Option<&mut dyn FnMut(Diagnostic)>,
    program_directives: &[String],
) -> CompileResult<Function> {
    let mut builder = Builder::new(options, on_warn, program_directives);
    let mut flat_params = Vec::with_capacity(func.params.len());
    for p in &func.params {
        flat_params.push(builder.destructure_param(p)?);
    }
    builder.lower_body(&func.body)?;
    let blocks = builder.finish(func.span);

    let flags = detect_purity(program_directives, &[], &[], PurityFlags::default());
    Ok(Function {
        name: Some(name),
        params: flat_params,
        original_params: func.params.clone(),
        blocks,
        meta: FunctionMeta {
            no_memo: flags.no_memo,
            pure: flags.pure,
            is_async: func.is_async,
            hook_return_info: None,
            from_expression: true,
            is_arrow: false,
            has_expression_body: false,
        },
        span: func.span,
    })
}

/// Resolves a `for-of`/`for-in` binding to the name that belongs on the
/// terminator and, when the binding itself is a pattern, the pattern carried
/// forward for the emitter to destructure (§3 invariant 6, §6).
fn flatten_for_binding(
    binding: &ast::ForBinding,
    body: BlockId,
    synthesize_name: fn(u32) -> String,
) -> (String, Option<ast::Pattern>) {
    match &binding.pattern {
        ast::Pattern::Identifier(id) => (id.name.clone(), None),
        other => (synthesize_name(body.as_u32()), Some(other.clone())),
    }
}

impl<'a, 'w> Builder<'a, 'w> {
    pub(super) fn lower_body(&mut self, stmts: &[ast::Stmt]) -> CompileResult<()> {
        for stmt in stmts {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> CompileResult<()> {
        match stmt {
            ast::Stmt::VariableDecl(decl) => self.lower_variable_decl(decl),
            ast::Stmt::FunctionDecl(decl) => self.lower_nested_function_decl(decl),
            ast::Stmt::ClassDecl(_) => {
                let err = self.error("class declarations are not supported inside function bodies", stmt.span());
                Err(self.fail(err))
            }
            ast::Stmt::Expression(expr_stmt) => self.lower_expression_as_statement(&expr_stmt.expression),
            ast::Stmt::Block(block) => self.lower_body(&block.body),
            ast::Stmt::If(if_stmt) => self.lower_if(if_stmt),
            ast::Stmt::Switch(sw) => self.lower_switch(sw, None),
            ast::Stmt::While(w) => self.lower_while(w, None),
            ast::Stmt::DoWhile(d) => self.lower_do_while(d, None),
            ast::Stmt::For(f) => self.lower_for(f, None),
            ast::Stmt::ForOf(f) => self.lower_for_of(f, None),
            ast::Stmt::ForIn(f) => self.lower_for_in(f, None),
            ast::Stmt::Break(b) => self.lower_break(b),
            ast::Stmt::Continue(c) => self.lower_continue(c),
            ast::Stmt::Return(r) => self.lower_return(r),
            ast::Stmt::Throw(t) => self.lower_throw(t),
            ast::Stmt::Try(t) => self.lower_try(t),
            ast::Stmt::Labeled(l) => self.lower_labeled(l),
            ast::Stmt::Import(_) | ast::Stmt::Export(_) => {
                let err = self.error("import/export are only valid at the top level", stmt.span());
                Err(self.fail(err))
            }
            ast::Stmt::Empty(_) => Ok(()),
        }
    }

    fn lower_variable_decl(&mut self, decl: &ast::VariableDeclaration) -> CompileResult<()> {
        let kind = IrDeclKind::from(decl.kind);
        for declarator in &decl.declarations {
            match &declarator.init {
                Some(init) => {
                    let value = self.lower_expr(init)?;
                    self.destructure_declarator(&declarator.id, value, kind)?;
                }
                None => match &declarator.id {
                    ast::Pattern::Identifier(id) => {
                        let undefined = Expression::Identifier(IdentifierExpr::new("undefined", id.span));
                        self.push_instr(Instruction::Assign {
                            target: IdentifierExpr::new(id.name.clone(), id.span),
                            value: undefined,
                            declaration_kind: Some(kind),
                        });
                    }
                    other => {
                        let err = self.error("destructuring declaration requires an initializer", other.span());
                        return Err(self.fail(err));
                    }
                },
            }
        }
        Ok(())
    }

    fn lower_nested_function_decl(&mut self, decl: &ast::FunctionDeclaration) -> CompileResult<()> {
        let function_expr = self.lower_function_expression(
            Some(decl.name.name.clone()),
            &decl.params,
            &decl.body,
            decl.is_async,
            decl.is_generator,
            decl.span,
        )?;
        self.push_instr(Instruction::Assign {
            target: IdentifierExpr::new(decl.name.name.clone(), decl.name.span),
            value: Expression::Function(function_expr),
            declaration_kind: Some(IrDeclKind::Function),
        });
        Ok(())
    }

    /// Statement-position destructuring assignment is expanded here, directly
    /// against `destructure_into`; any other destructuring-assignment form
    /// reaching [`Builder::lower_expr`] is a build error (§4.1, §3
    /// invariant 6).
    fn lower_expression_as_statement(&mut self, expr: &ast::Expr) -> CompileResult<()> {
        if let ast::Expr::Assignment(assign) = expr {
            if let ast::AssignmentTarget::Pattern(pattern) = &assign.left {
                if assign.operator != ast::AssignmentOp::Assign {
                    let err = self.error(
                        "compound assignment to a destructuring pattern is not supported",
                        assign.span,
                    );
                    return Err(self.fail(err));
                }
                let value = self.lower_expr(&assign.right)?;
                return self.destructure_into(pattern, value, None);
            }
        }
        let value = self.lower_expr(expr)?;
        self.push_instr(Instruction::Expression { value });
        Ok(())
    }

    fn lower_if(&mut self, stmt: &ast::IfStatement) -> CompileResult<()> {
        let test = self.lower_expr(&stmt.test)?;
        let consequent = self.new_block();
        let alternate = self.new_block();
        let join = self.new_block();
        self.seal(Terminator::Branch { test, consequent, alternate });

        self.switch_to(consequent);
        self.lower_stmt(&stmt.consequent)?;
        self.seal(Terminator::Jump { target: join });

        self.switch_to(alternate);
        if let Some(alt) = &stmt.alternate {
            self.lower_stmt(alt)?;
        }
        self.seal(Terminator::Jump { target: join });

        self.switch_to(join);
        Ok(())
    }

    fn lower_while(&mut self, stmt: &ast::WhileStatement, label: Option<String>) -> CompileResult<()> {
        let cond = self.new_block();
        let body = self.new_block();
        let exit = self.new_block();
        self.seal(Terminator::Jump { target: cond });

        self.switch_to(cond);
        let test = self.lower_expr(&stmt.test)?;
        self.seal(Terminator::Branch { test, consequent: body, alternate: exit });

        self.loops.push_loop(exit, cond, label);
        self.switch_to(body);
        self.lower_stmt(&stmt.body)?;
        self.seal(Terminator::Jump { target: cond });
        self.loops.pop();

        self.switch_to(exit);
        Ok(())
    }

    fn lower_do_while(&mut self, stmt: &ast::DoWhileStatement, label: Option<String>) -> CompileResult<()> {
        let body = self.new_block();
        let cond = self.new_block();
        let exit = self.new_block();
        self.seal(Terminator::Jump { target: body });

        self.loops.push_loop(exit, cond, label);
        self.switch_to(body);
        self.lower_stmt(&stmt.body)?;
        self.seal(Terminator::Jump { target: cond });
        self.loops.pop();

        self.switch_to(cond);
        let test = self.lower_expr(&stmt.test)?;
        self.seal(Terminator::Branch { test, consequent: body, alternate: exit });

        self.switch_to(exit);
        Ok(())
    }

    fn lower_for(&mut self, stmt: &ast::ForStatement, label: Option<String>) -> CompileResult<()> {
        if let Some(init) = &stmt.init {
            match init {
                ast::ForInit::VariableDeclaration(decl) => self.lower_variable_decl(decl)?,
                ast::ForInit::Expression(expr) => self.lower_expression_as_statement(expr)?,
            }
        }

        let cond = self.new_block();
        let body = self.new_block();
        let update = self.new_block();
        let exit = self.new_block();
        self.seal(Terminator::Jump { target: cond });

        self.switch_to(cond);
        if let Some(test) = &stmt.test {
            let test_expr = self.lower_expr(test)?;
            self.seal(Terminator::Branch { test: test_expr, consequent: body, alternate: exit });
        } else {
            self.seal(Terminator::Jump { target: body });
        }

        self.loops.push_loop(exit, update, label);
        self.switch_to(body);
        self.lower_stmt(&stmt.body)?;
        self.seal(Terminator::Jump { target: update });
        self.loops.pop();

        self.switch_to(update);
        if let Some(upd) = &stmt.update {
            self.lower_expression_as_statement(upd)?;
        }
        self.seal(Terminator::Jump { target: cond });

        self.switch_to(exit);
        Ok(())
    }

    fn lower_for_of(&mut self, stmt: &ast::ForOfStatement, label: Option<String>) -> CompileResult<()> {
        let body = self.new_block();
        let exit = self.new_block();

        let iterable = self.lower_expr(&stmt.right)?;
        let (variable, pattern) = flatten_for_binding(&stmt.left, body, for_of_binding_name);

        self.seal(Terminator::ForOf {
            variable,
            variable_kind: stmt.left.kind.map(IrDeclKind::from),
            pattern,
            iterable,
            body,
            exit,
        });

        self.loops.push_loop(exit, body, label);
        self.switch_to(body);
        self.lower_stmt(&stmt.body)?;
        self.seal(Terminator::Jump { target: exit });
        self.loops.pop();

        self.switch_to(exit);
        Ok(())
    }

    fn lower_for_in(&mut self, stmt: &ast::ForInStatement, label: Option<String>) -> CompileResult<()> {
        let body = self.new_block();
        let exit = self.new_block();

        let object = self.lower_expr(&stmt.right)?;
        let (variable, pattern) = flatten_for_binding(&stmt.left, body, for_in_binding_name);

        self.seal(Terminator::ForIn {
            variable,
            variable_kind: stmt.left.kind.map(IrDeclKind::from),
            pattern,
            object,
            body,
            exit,
        });

        self.loops.push_loop(exit, body, label);
        self.switch_to(body);
        self.lower_stmt(&stmt.body)?;
        self.seal(Terminator::Jump { target: exit });
        self.loops.pop();

        self.switch_to(exit);
        Ok(())
    }

    fn lower_switch(&mut self, stmt: &ast::SwitchStatement, label: Option<String>) -> CompileResult<()> {
        let discriminant = self.lower_expr(&stmt.discriminant)?;
        let exit = self.new_block();
        let case_blocks: Vec<BlockId> = stmt.cases.iter().map(|_| self.new_block()).collect();

        self.loops.push_switch(exit, label);

        let mut cases = Vec::with_capacity(stmt.cases.len());
        for (case, &target) in stmt.cases.iter().zip(&case_blocks) {
            let test = case.test.as_ref().map(|e| self.lower_expr(e)).transpose()?;
            cases.push(IrSwitchCase { test, target });
        }
        self.seal(Terminator::Switch { discriminant, cases });

        for (case, &block_id) in stmt.cases.iter().zip(&case_blocks) {
            self.switch_to(block_id);
            for s in &case.consequent {
                self.lower_stmt(s)?;
            }
            self.seal(Terminator::Jump { target: exit });
        }

        self.loops.pop();
        self.switch_to(exit);
        Ok(())
    }

    fn lower_try(&mut self, stmt: &ast::TryStatement) -> CompileResult<()> {
        if let Some(handler) = &stmt.handler {
            if matches!(&handler.param, Some(p) if !matches!(p, ast::Pattern::Identifier(_))) {
                let err = self.error("destructured catch parameters are not supported", handler.span);
                return Err(self.fail(err));
            }
        }

        let try_block = self.new_block();
        let catch_block = stmt.handler.as_ref().map(|_| self.new_block());
        let finally_block = stmt.finalizer.as_ref().map(|_| self.new_block());
        let exit = self.new_block();

        let catch_param = stmt.handler.as_ref().and_then(|h| match &h.param {
            Some(ast::Pattern::Identifier(id)) => Some(id.name.clone()),
            _ => None,
        });

        self.seal(Terminator::Try { try_block, catch_block, catch_param, finally_block, exit });

        let after_try = finally_block.unwrap_or(exit);

        self.switch_to(try_block);
        for s in &stmt.block {
            self.lower_stmt(s)?;
        }
        self.seal(Terminator::Jump { target: after_try });

        if let (Some(handler), Some(catch_id)) = (&stmt.handler, catch_block) {
            self.switch_to(catch_id);
            for s in &handler.body {
                self.lower_stmt(s)?;
            }
            self.seal(Terminator::Jump { target: after_try });
        }

        if let (Some(finalizer), Some(finally_id)) = (&stmt.finalizer, finally_block) {
            self.switch_to(finally_id);
            for s in finalizer {
                self.lower_stmt(s)?;
            }
            self.seal(Terminator::Jump { target: exit });
        }

        self.switch_to(exit);
        Ok(())
    }

    fn lower_break(&mut self, stmt: &ast::BreakStatement) -> CompileResult<()> {
        let Some(target) = self.loops.break_target(stmt.label.as_deref()) else {
            let err = self.error("break with no enclosing loop or matching label", stmt.span);
            return Err(self.fail(err));
        };
        self.seal(Terminator::Break { target, label: stmt.label.clone() });
        let dead = self.new_block();
        self.switch_to(dead);
        Ok(())
    }

    fn lower_continue(&mut self, stmt: &ast::ContinueStatement) -> CompileResult<()> {
        let Some(target) = self.loops.continue_target(stmt.label.as_deref()) else {
            let err = self.error("continue with no enclosing loop or matching label", stmt.span);
            return Err(self.fail(err));
        };
        self.seal(Terminator::Continue { target, label: stmt.label.clone() });
        let dead = self.new_block();
        self.switch_to(dead);
        Ok(())
    }

    fn lower_return(&mut self, stmt: &ast::ReturnStatement) -> CompileResult<()> {
        let argument = stmt.argument.as_ref().map(|e| self.lower_expr(e)).transpose()?;
        self.seal(Terminator::Return { argument });
        let dead = self.new_block();
        self.switch_to(dead);
        Ok(())
    }

    fn lower_throw(&mut self, stmt: &ast::ThrowStatement) -> CompileResult<()> {
        let argument = self.lower_expr(&stmt.argument)?;
        self.seal(Terminator::Throw { argument });
        let dead = self.new_block();
        self.switch_to(dead);
        Ok(())
    }

    fn lower_labeled(&mut self, stmt: &ast::LabeledStatement) -> CompileResult<()> {
        match stmt.body.as_ref() {
            ast::Stmt::While(w) => self.lower_while(w, Some(stmt.label.clone())),
            ast::Stmt::DoWhile(d) => self.lower_do_while(d, Some(stmt.label.clone())),
            ast::Stmt::For(f) => self.lower_for(f, Some(stmt.label.clone())),
            ast::Stmt::ForOf(f) => self.lower_for_of(f, Some(stmt.label.clone())),
            ast::Stmt::ForIn(f) => self.lower_for_in(f, Some(stmt.label.clone())),
            ast::Stmt::Switch(sw) => self.lower_switch(sw, Some(stmt.label.clone())),
            other => self.lower_stmt(other),
        }
    }
}
