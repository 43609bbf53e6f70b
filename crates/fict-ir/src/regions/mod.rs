//! Reactive-scope & region analysis (§4.4): identifies which SSA names are
//! reactive (derived, transitively, from a state-macro call or a component
//! parameter) and partitions each function's structured body into regions
//! of uniform dependency set.

pub mod property_path;

pub use property_path::PropertyPath;

use crate::context::{CompileOptions, CANONICAL_STATE_MACRO};
use crate::ir::block::BlockId;
use crate::ir::expr::{CallExpr, Expression, JsxAttributeOrSpread, JsxAttributeValue, JsxChild, JsxElement, JsxExpr, JsxFragment, JsxTagName, ObjectProp, PropertyKey};
use crate::ir::function::Function;
use crate::ir::instr::Instruction;
use crate::structurize::{StructuredFunction, StructuredNode, SwitchCaseNode, TryHandlerNode};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: u32,
    pub blocks: FxHashSet<BlockId>,
    pub dependencies: Vec<PropertyPath>,
    pub declarations: Vec<String>,
    pub has_control_flow: bool,
    pub memoize: bool,
    pub parent: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSet {
    pub regions: Vec<Region>,
}

/// Runs region analysis for every function, given its already-structurized
/// body. `functions` and `structured` must be the same length and in the
/// same order (as produced by [`crate::build::build_program`] and
/// [`crate::structurize::run`]).
#[instrument(level = "debug", skip_all, fields(functions = functions.len()))]
pub fn run(functions: &[Function], structured: &[StructuredFunction], options: &CompileOptions) -> Vec<RegionSet> {
    functions
        .iter()
        .zip(structured.iter())
        .map(|(function, body)| analyze_function(function, body, options))
        .collect()
}

#[instrument(level = "debug", skip_all, fields(function = body.name.as_deref().unwrap_or("<anonymous>")))]
fn analyze_function(function: &Function, body: &StructuredFunction, options: &CompileOptions) -> RegionSet {
    let mut reactive = FxHashSet::default();
    if function_is_component(body) {
        reactive.extend(function.params.iter().cloned());
    }

    let mut ctx = BuildCtx {
        regions: Vec::new(),
        next_id: 0,
        no_memo: function.meta.pure || function.meta.no_memo,
        aliases: &options.macro_aliases,
    };
    let StructuredNode::Block(top) = &body.body else {
        unreachable!("structurize::run always wraps a function body in Block")
    };
    ctx.process_sequence(top, &mut reactive, None);
    debug!(regions = ctx.regions.len(), "region analysis complete");
    RegionSet { regions: ctx.regions }
}

/// Heuristic for "function identified as a reactive component/hook": does
/// its body ever construct JSX? (§4.4 (b)). A function invoked only from
/// JSX but never itself producing JSX is not detected by this heuristic;
/// see DESIGN.md.
fn function_is_component(body: &StructuredFunction) -> bool {
    fn node_has_jsx(node: &StructuredNode) -> bool {
        match node {
            StructuredNode::Sequence(nodes) | StructuredNode::Block(nodes) => nodes.iter().any(node_has_jsx),
            StructuredNode::Instruction(_, instr) => instr.value_expr().is_some_and(expr_has_jsx),
            StructuredNode::If { test, consequent, alternate } => {
                expr_has_jsx(test) || node_has_jsx(consequent) || alternate.as_deref().is_some_and(node_has_jsx)
            }
            StructuredNode::While { test, body } | StructuredNode::DoWhile { body, test } => {
                expr_has_jsx(test) || node_has_jsx(body)
            }
            StructuredNode::ForOf { iterable, body, .. } => expr_has_jsx(iterable) || node_has_jsx(body),
            StructuredNode::ForIn { object, body, .. } => expr_has_jsx(object) || node_has_jsx(body),
            StructuredNode::Switch { discriminant, cases } => {
                expr_has_jsx(discriminant) || cases.iter().any(|c| node_has_jsx(&c.body))
            }
            StructuredNode::Try { block, handler, finalizer } => {
                node_has_jsx(block)
                    || handler.as_ref().is_some_and(|h| node_has_jsx(&h.body))
                    || finalizer.as_deref().is_some_and(node_has_jsx)
            }
            StructuredNode::Return { argument } => argument.as_ref().is_some_and(expr_has_jsx),
            StructuredNode::Throw { argument } => expr_has_jsx(argument),
            StructuredNode::Break { .. } | StructuredNode::Continue { .. } => false,
        }
    }
    node_has_jsx(&body.body)
}

fn expr_has_jsx(expr: &Expression) -> bool {
    matches!(expr, Expression::Jsx(_))
        || match expr {
            Expression::Unary(e) => expr_has_jsx(&e.argument),
            Expression::Binary(e) | Expression::Logical(e) => expr_has_jsx(&e.left) || expr_has_jsx(&e.right),
            Expression::Conditional(e) => expr_has_jsx(&e.test) || expr_has_jsx(&e.consequent) || expr_has_jsx(&e.alternate),
            Expression::Call(c) | Expression::OptionalCall(c) => c.arguments.iter().any(expr_has_jsx),
            Expression::Array(a) => a.elements.iter().flatten().any(expr_has_jsx),
            Expression::Sequence(s) => s.expressions.iter().any(expr_has_jsx),
            _ => false,
        }
}

struct BuildCtx<'a> {
    regions: Vec<Region>,
    next_id: u32,
    no_memo: bool,
    aliases: &'a crate::context::MacroAliases,
}

struct Accumulator {
    blocks: FxHashSet<BlockId>,
    dependencies: Vec<PropertyPath>,
    declarations: Vec<String>,
    is_reactive: bool,
    cost: u32,
}

impl<'a> BuildCtx<'a> {
    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn finish(&mut self, acc: Accumulator, parent: Option<u32>) -> u32 {
        let id = self.alloc_id();
        let memoize = !acc.dependencies.is_empty() && !self.no_memo && acc.cost > 1;
        self.regions.push(Region {
            id,
            blocks: acc.blocks,
            dependencies: acc.dependencies,
            declarations: acc.declarations,
            has_control_flow: false,
            memoize,
            parent,
        });
        id
    }

    /// Walks one list of structured siblings, grouping consecutive leaves
    /// that share a dependency set and reactivity into one region each, and
    /// recursing into control-flow nodes as their own (nested) regions.
    fn process_sequence(&mut self, nodes: &[StructuredNode], reactive: &mut FxHashSet<String>, parent: Option<u32>) -> Vec<u32> {
        let mut out = Vec::new();
        let mut acc: Option<Accumulator> = None;

        macro_rules! flush {
            () => {
                if let Some(a) = acc.take() {
                    out.push(self.finish(a, parent));
                }
            };
        }

        for node in nodes {
            match node {
                StructuredNode::Instruction(block_id, instr) => {
                    let (deps, is_reactive, declares) = classify_instruction(instr, reactive, self.aliases);
                    if let Some(name) = &declares {
                        if is_reactive {
                            reactive.insert(name.clone());
                        }
                    }
                    let cost = instr.value_expr().map(expression_cost).unwrap_or(1);
                    match &mut acc {
                        Some(a) if a.is_reactive == is_reactive && a.dependencies == deps => {
                            a.blocks.insert(*block_id);
                            a.cost += cost;
                            if let Some(name) = declares {
                                a.declarations.push(name);
                            }
                        }
                        _ => {
                            flush!();
                            let mut blocks = FxHashSet::default();
                            blocks.insert(*block_id);
                            acc = Some(Accumulator {
                                blocks,
                                dependencies: deps,
                                declarations: declares.into_iter().collect(),
                                is_reactive,
                                cost,
                            });
                        }
                    }
                }
                StructuredNode::Return { argument } => {
                    let deps = argument.as_ref().map(|a| collect_paths(a, reactive)).unwrap_or_default();
                    let cost = argument.as_ref().map(expression_cost).unwrap_or(1);
                    flush!();
                    let is_reactive = !deps.is_empty();
                    out.push(self.finish(
                        Accumulator { blocks: FxHashSet::default(), dependencies: deps, declarations: Vec::new(), is_reactive, cost },
                        parent,
                    ));
                }
                StructuredNode::Throw { argument } => {
                    let deps = collect_paths(argument, reactive);
                    let cost = expression_cost(argument);
                    flush!();
                    let is_reactive = !deps.is_empty();
                    out.push(self.finish(
                        Accumulator { blocks: FxHashSet::default(), dependencies: deps, declarations: Vec::new(), is_reactive, cost },
                        parent,
                    ));
                }
                StructuredNode::Break { .. } | StructuredNode::Continue { .. } => {
                    flush!();
                }
                _ => {
                    flush!();
                    out.push(self.process_control_flow(node, reactive, parent));
                }
            }
        }
        flush!();
        out
    }

    fn process_control_flow(&mut self, node: &StructuredNode, reactive: &mut FxHashSet<String>, parent: Option<u32>) -> u32 {
        let id = self.alloc_id();
        let dependencies = control_flow_dependencies(node, reactive);
        let memoize = !dependencies.is_empty() && !self.no_memo;
        self.regions.push(Region {
            id,
            blocks: FxHashSet::default(),
            dependencies,
            declarations: Vec::new(),
            has_control_flow: true,
            memoize,
            parent,
        });

        match node {
            StructuredNode::If { consequent, alternate, .. } => {
                self.process_body(consequent, reactive, id);
                if let Some(alt) = alternate {
                    self.process_body(alt, reactive, id);
                }
            }
            StructuredNode::While { body, .. } | StructuredNode::DoWhile { body, .. } => {
                self.process_body(body, reactive, id);
            }
            StructuredNode::ForOf { body, .. } | StructuredNode::ForIn { body, .. } => {
                self.process_body(body, reactive, id);
            }
            StructuredNode::Switch { cases, .. } => {
                for case in cases {
                    let SwitchCaseNode { body, .. } = case;
                    self.process_body(body, reactive, id);
                }
            }
            StructuredNode::Try { block, handler, finalizer } => {
                self.process_body(block, reactive, id);
                if let Some(TryHandlerNode { body, .. }) = handler {
                    self.process_body(body, reactive, id);
                }
                if let Some(fin) = finalizer {
                    self.process_body(fin, reactive, id);
                }
            }
            _ => {}
        }
        id
    }

    fn process_body(&mut self, node: &StructuredNode, reactive: &mut FxHashSet<String>, parent: u32) {
        match node {
            StructuredNode::Block(nodes) | StructuredNode::Sequence(nodes) => {
                self.process_sequence(nodes, reactive, Some(parent));
            }
            other => {
                self.process_sequence(std::slice::from_ref(other), reactive, Some(parent));
            }
        }
    }
}

/// A rough node-count estimate of an expression's evaluation cost, used only
/// to tell "a single atomic read" (cost 1, not worth memoizing on its own)
/// from "an actual computation" (cost > 1).
fn expression_cost(expr: &Expression) -> u32 {
    match expr {
        Expression::Identifier(_)
        | Expression::StringLiteral(_)
        | Expression::NumberLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::This(_)
        | Expression::Super(_) => 1,
        Expression::Member(m) | Expression::OptionalMember(m) => {
            1 + expression_cost(&m.object)
                + match &m.property {
                    crate::ir::expr::MemberKey::Computed(k) => expression_cost(k),
                    crate::ir::expr::MemberKey::Identifier(_) => 0,
                }
        }
        Expression::Unary(e) => 1 + expression_cost(&e.argument),
        Expression::Binary(e) | Expression::Logical(e) => 1 + expression_cost(&e.left) + expression_cost(&e.right),
        Expression::Conditional(e) => {
            1 + expression_cost(&e.test) + expression_cost(&e.consequent) + expression_cost(&e.alternate)
        }
        Expression::Call(c) | Expression::OptionalCall(c) => {
            1 + expression_cost(&c.callee) + c.arguments.iter().map(expression_cost).sum::<u32>()
        }
        Expression::New(n) => 1 + expression_cost(&n.callee) + n.arguments.iter().map(expression_cost).sum::<u32>(),
        Expression::Array(a) => 1 + a.elements.iter().flatten().map(expression_cost).sum::<u32>(),
        Expression::TemplateLiteral(t) => 1 + t.expressions.iter().map(expression_cost).sum::<u32>(),
        Expression::Sequence(s) => s.expressions.iter().map(expression_cost).sum(),
        _ => 2,
    }
}

fn control_flow_dependencies(node: &StructuredNode, reactive: &FxHashSet<String>) -> Vec<PropertyPath> {
    match node {
        StructuredNode::If { test, .. } | StructuredNode::While { test, .. } | StructuredNode::DoWhile { test, .. } => {
            collect_paths(test, reactive)
        }
        StructuredNode::ForOf { iterable, .. } => collect_paths(iterable, reactive),
        StructuredNode::ForIn { object, .. } => collect_paths(object, reactive),
        StructuredNode::Switch { discriminant, .. } => collect_paths(discriminant, reactive),
        StructuredNode::Try { .. } => Vec::new(),
        _ => Vec::new(),
    }
}

/// Returns `(dependencies, is_reactive, newly_declared_name)` for a single
/// instruction.
fn classify_instruction(
    instr: &Instruction,
    reactive: &FxHashSet<String>,
    aliases: &crate::context::MacroAliases,
) -> (Vec<PropertyPath>, bool, Option<String>) {
    match instr {
        Instruction::Assign { target, value, .. } => {
            let deps = collect_paths(value, reactive);
            let is_reactive = !deps.is_empty() || is_state_macro_call(value, aliases);
            (deps, is_reactive, Some(target.name.clone()))
        }
        Instruction::Expression { value } => {
            let deps = collect_paths(value, reactive);
            let is_reactive = !deps.is_empty();
            (deps, is_reactive, None)
        }
        Instruction::Phi { target, sources, .. } => {
            let mut deps = Vec::new();
            let mut is_reactive = false;
            for source in sources {
                if reactive.contains(&source.id.name) {
                    is_reactive = true;
                    let path = PropertyPath(vec![source.id.name.clone()]);
                    if !deps.contains(&path) {
                        deps.push(path);
                    }
                }
            }
            (deps, is_reactive, Some(target.name.clone()))
        }
    }
}

fn is_state_macro_call(expr: &Expression, aliases: &crate::context::MacroAliases) -> bool {
    let call = match expr {
        Expression::Call(c) | Expression::OptionalCall(c) => c,
        _ => return false,
    };
    call_is_state_macro(call, aliases)
}

fn call_is_state_macro(call: &CallExpr, aliases: &crate::context::MacroAliases) -> bool {
    call.callee
        .as_identifier_name()
        .and_then(|name| aliases.canonicalize(name))
        .is_some_and(|canonical| canonical == CANONICAL_STATE_MACRO)
}

/// Collects the property paths an expression reads whose root is already
/// known reactive, covering every expression form in the external AST
/// contract (§6) except block-bodied arrow/function bodies and class
/// bodies, which are analyzed as their own functions.
fn collect_paths(expr: &Expression, reactive: &FxHashSet<String>) -> Vec<PropertyPath> {
    let mut out = Vec::new();
    walk_paths(expr, reactive, &mut out);
    out
}

fn push_if_reactive(path: PropertyPath, reactive: &FxHashSet<String>, out: &mut Vec<PropertyPath>) {
    if reactive.contains(path.root()) && !out.contains(&path) {
        out.push(path);
    }
}

fn walk_paths(expr: &Expression, reactive: &FxHashSet<String>, out: &mut Vec<PropertyPath>) {
    if let Some(path) = property_path::property_path(expr) {
        push_if_reactive(path, reactive, out);
        // A resolved identifier/static-member chain has no further
        // independent sub-reads; computed keys are handled below since
        // `property_path` returns `None` for them, sending control there
        // instead of here.
        if matches!(expr, Expression::Identifier(_)) {
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
        | Expression::Function(_)
        | Expression::Class(_)
        | Expression::MetaProperty(_) => {}
        Expression::TemplateLiteral(t) => {
            for e in &t.expressions {
                walk_paths(e, reactive, out);
            }
        }
        Expression::Unary(e) => walk_paths(&e.argument, reactive, out),
        Expression::Binary(e) | Expression::Logical(e) => {
            walk_paths(&e.left, reactive, out);
            walk_paths(&e.right, reactive, out);
        }
        Expression::Conditional(e) => {
            walk_paths(&e.test, reactive, out);
            walk_paths(&e.consequent, reactive, out);
            walk_paths(&e.alternate, reactive, out);
        }
        Expression::Assignment(a) => {
            if let crate::ir::expr::AssignmentTarget::Member(m) = &a.left {
                walk_paths(&Expression::Member(m.clone()), reactive, out);
            }
            walk_paths(&a.right, reactive, out);
        }
        Expression::Update(u) => walk_paths(&u.argument, reactive, out),
        Expression::Call(c) | Expression::OptionalCall(c) => {
            walk_paths(&c.callee, reactive, out);
            for a in &c.arguments {
                walk_paths(a, reactive, out);
            }
        }
        Expression::New(n) => {
            walk_paths(&n.callee, reactive, out);
            for a in &n.arguments {
                walk_paths(a, reactive, out);
            }
        }
        Expression::Member(m) | Expression::OptionalMember(m) => {
            if let crate::ir::expr::MemberKey::Computed(k) = &m.property {
                walk_paths(k, reactive, out);
            }
            if property_path::property_path(expr).is_none() {
                walk_paths(&m.object, reactive, out);
            }
        }
        Expression::Array(a) => {
            for el in a.elements.iter().flatten() {
                walk_paths(el, reactive, out);
            }
        }
        Expression::Object(o) => {
            for prop in &o.properties {
                match prop {
                    ObjectProp::Property { key, value, .. } => {
                        if let PropertyKey::Computed(k) = key {
                            walk_paths(k, reactive, out);
                        }
                        walk_paths(value, reactive, out);
                    }
                    ObjectProp::Spread(e) => walk_paths(e, reactive, out),
                }
            }
        }
        Expression::Spread(s) => walk_paths(&s.argument, reactive, out),
        Expression::Sequence(s) => {
            for e in &s.expressions {
                walk_paths(e, reactive, out);
            }
        }
        Expression::Await(a) => walk_paths(&a.argument, reactive, out),
        Expression::Yield(y) => {
            if let Some(a) = &y.argument {
                walk_paths(a, reactive, out);
            }
        }
        Expression::Arrow(a) => {
            if let crate::ir::expr::ArrowBody::Expression(e) = &a.body {
                walk_paths(e, reactive, out);
            }
        }
        Expression::TaggedTemplate(t) => {
            walk_paths(&t.tag, reactive, out);
            for e in &t.quasi.expressions {
                walk_paths(e, reactive, out);
            }
        }
        Expression::Import(i) => walk_paths(&i.argument, reactive, out),
        Expression::Jsx(j) => walk_jsx_paths(j, reactive, out),
    }
}

fn walk_jsx_paths(jsx: &JsxExpr, reactive: &FxHashSet<String>, out: &mut Vec<PropertyPath>) {
    match jsx {
        JsxExpr::Element(el) => walk_jsx_element_paths(el, reactive, out),
        JsxExpr::Fragment(frag) => walk_jsx_fragment_paths(frag, reactive, out),
    }
}

fn walk_jsx_element_paths(el: &JsxElement, reactive: &FxHashSet<String>, out: &mut Vec<PropertyPath>) {
    if let JsxTagName::Component(e) = &el.tag_name {
        walk_paths(e, reactive, out);
    }
    for attr in &el.attributes {
        match attr {
            JsxAttributeOrSpread::Attribute(a) => {
                if let Some(JsxAttributeValue::Expression(e)) = &a.value {
                    walk_paths(e, reactive, out);
                }
            }
            JsxAttributeOrSpread::Spread(e) => walk_paths(e, reactive, out),
        }
    }
    for child in &el.children {
        walk_jsx_child_paths(child, reactive, out);
    }
}

fn walk_jsx_fragment_paths(frag: &JsxFragment, reactive: &FxHashSet<String>, out: &mut Vec<PropertyPath>) {
    for child in &frag.children {
        walk_jsx_child_paths(child, reactive, out);
    }
}

fn walk_jsx_child_paths(child: &JsxChild, reactive: &FxHashSet<String>, out: &mut Vec<PropertyPath>) {
    match child {
        JsxChild::Element(e) => walk_jsx_element_paths(e, reactive, out),
        JsxChild::Fragment(f) => walk_jsx_fragment_paths(f, reactive, out),
        JsxChild::ExpressionContainer(e) => walk_paths(e, reactive, out),
        JsxChild::Text(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CompileOptions;
    use fict_ast as ast;

    fn span() -> ast::Span {
        ast::Span::synthetic()
    }

    fn ident_expr(name: &str) -> ast::Expr {
        ast::Expr::Identifier(ast::Identifier::new(name, span()))
    }

    fn num_expr(v: f64) -> ast::Expr {
        ast::Expr::NumberLiteral(ast::NumberLiteral { value: v, span: span() })
    }

    fn state_call(init: ast::Expr) -> ast::Expr {
        ast::Expr::Call(ast::CallExpression {
            callee: Box::new(ident_expr("$state")),
            arguments: vec![ast::Argument::Expr(init)],
            pure: false,
            span: span(),
        })
    }

    fn const_decl(name: &str, init: ast::Expr) -> ast::Stmt {
        ast::Stmt::VariableDecl(ast::VariableDeclaration {
            kind: ast::DeclarationKind::Const,
            declarations: vec![ast::VariableDeclarator {
                id: ast::Pattern::Identifier(ast::Identifier::new(name, span())),
                init: Some(init),
                span: span(),
            }],
            span: span(),
        })
    }

    fn return_stmt(argument: ast::Expr) -> ast::Stmt {
        ast::Stmt::Return(ast::ReturnStatement { argument: Some(argument), span: span() })
    }

    fn member(object: ast::Expr, key: &str) -> ast::Expr {
        ast::Expr::Member(ast::MemberExpression {
            object: Box::new(object),
            property: ast::MemberKey::Identifier(key.to_string()),
            span: span(),
        })
    }

    fn optional_member(object: ast::Expr, key: &str) -> ast::Expr {
        ast::Expr::OptionalMember(ast::MemberExpression {
            object: Box::new(object),
            property: ast::MemberKey::Identifier(key.to_string()),
            span: span(),
        })
    }

    /// Builds, SSA-renames, structurizes, and runs region analysis over a
    /// single-function program — the same pass ordering `lib::compile` uses.
    fn analyze(body: Vec<ast::Stmt>) -> RegionSet {
        let decl = ast::FunctionDeclaration {
            name: ast::Identifier::new("f", span()),
            params: vec![],
            body,
            directives: vec![],
            leading_comments: vec![],
            is_async: false,
            is_generator: false,
            span: span(),
        };
        let program = ast::Program { directives: vec![], body: vec![ast::Stmt::FunctionDecl(decl)] };
        let options = CompileOptions::new();
        let mut ir = crate::build::build_program(&program, &options, None).expect("build succeeds");
        crate::ssa::run(&mut ir).expect("ssa succeeds");
        let structured = crate::structurize::run(&ir).expect("structurize succeeds");
        let mut region_sets = run(&ir.functions, &structured.functions, &options);
        region_sets.remove(0)
    }

    /// `const count = $state(0); const doubled = count.value * 2; return
    /// doubled;` — the derived value's region depends on the property path
    /// `count.value`, not just the bare name `count`, and is memoized since
    /// it costs more than a single read (§4.4, §4.5's memoization decision).
    /// Declared names are asserted by prefix, not exact match: SSA renaming
    /// (`ssa::run`, which `analyze` runs before region analysis) gives every
    /// `Instruction::Assign` a fresh `<base>$$ssa<n>` name.
    #[test]
    fn derived_value_depends_on_full_property_path_and_is_memoized() {
        let doubled = ast::Expr::Binary(ast::BinaryExpression {
            operator: ast::BinaryOp::Mul,
            left: Box::new(member(ident_expr("count"), "value")),
            right: Box::new(num_expr(2.0)),
            span: span(),
        });
        let regions = analyze(vec![
            const_decl("count", state_call(num_expr(0.0))),
            const_decl("doubled", doubled),
            return_stmt(ident_expr("doubled")),
        ]);

        let derived = regions
            .regions
            .iter()
            .find(|r| r.declarations.len() == 1 && r.declarations[0].starts_with("doubled"))
            .expect("a region declaring `doubled` exists");
        assert_eq!(derived.dependencies.len(), 1);
        let dep = &derived.dependencies[0];
        assert_eq!(dep.0.len(), 2);
        assert!(dep.0[0].starts_with("count"));
        assert_eq!(dep.0[1], "value");
        assert!(derived.memoize);
    }

    /// `const s = $state(0); const v = s?.foo?.bar; return v;` — an
    /// optional-chain read collapses to its reactive root, `s`, not the full
    /// `s.foo.bar` chain (§4.4).
    #[test]
    fn optional_chain_dependency_collapses_to_reactive_root() {
        let chain = optional_member(optional_member(ident_expr("s"), "foo"), "bar");
        let regions = analyze(vec![
            const_decl("s", state_call(num_expr(0.0))),
            const_decl("v", chain),
            return_stmt(ident_expr("v")),
        ]);

        let derived = regions
            .regions
            .iter()
            .find(|r| r.declarations.len() == 1 && r.declarations[0].starts_with('v'))
            .expect("a region declaring `v` exists");
        assert_eq!(derived.dependencies.len(), 1);
        let dep = &derived.dependencies[0];
        assert_eq!(dep.0.len(), 1);
        assert!(dep.0[0].starts_with('s'));
    }

    /// Region analysis is a pure function of its inputs: compiling the same
    /// source twice must agree on every region's `memoize` flag (§8's
    /// idempotence property).
    #[test]
    fn repeated_analysis_of_the_same_function_agrees_on_memoize() {
        let doubled = ast::Expr::Binary(ast::BinaryExpression {
            operator: ast::BinaryOp::Mul,
            left: Box::new(member(ident_expr("count"), "value")),
            right: Box::new(num_expr(2.0)),
            span: span(),
        });
        let body = || {
            vec![
                const_decl("count", state_call(num_expr(0.0))),
                const_decl("doubled", doubled.clone()),
                return_stmt(ident_expr("doubled")),
            ]
        };
        let first = analyze(body());
        let second = analyze(body());
        let first_flags: Vec<bool> = first.regions.iter().map(|r| r.memoize).collect();
        let second_flags: Vec<bool> = second.regions.iter().map(|r| r.memoize).collect();
        assert_eq!(first_flags, second_flags);
    }
}
