//! Human-readable IR dumps, used by tests and diagnostics.

use super::block::BasicBlock;
use super::expr::*;
use super::function::Function;
use super::instr::Instruction;
use super::program::Program;
use super::terminator::Terminator;
use std::fmt::Write;

pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Program {
    fn pretty_print(&self) -> String {
        let mut out = String::new();
        for func in &self.functions {
            out.push_str(&func.pretty_print());
            writeln!(out).unwrap();
        }
        out
    }
}

impl PrettyPrint for Function {
    fn pretty_print(&self) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "fn {}({}) {{",
            self.name.as_deref().unwrap_or("<anonymous>"),
            self.params.join(", ")
        )
        .unwrap();
        for block in &self.blocks {
            print_block(&mut out, block, 2);
        }
        writeln!(out, "}}").unwrap();
        out
    }
}

fn print_block(out: &mut String, block: &BasicBlock, indent: usize) {
    let prefix = " ".repeat(indent);
    writeln!(out, "{}{}:", prefix, block.id).unwrap();
    for instr in &block.instructions {
        writeln!(out, "{}  {}", prefix, format_instr(instr)).unwrap();
    }
    writeln!(out, "{}  {}", prefix, format_terminator(&block.terminator)).unwrap();
}

fn format_instr(instr: &Instruction) -> String {
    match instr {
        Instruction::Assign {
            target,
            value,
            declaration_kind,
        } => {
            let kind = declaration_kind
                .map(|k| format!("{:?} ", k).to_lowercase())
                .unwrap_or_default();
            format!("{}{} = {}", kind, target.name, format_expr(value))
        }
        Instruction::Expression { value } => format_expr(value),
        Instruction::Phi {
            target,
            variable,
            sources,
        } => {
            let srcs = sources
                .iter()
                .map(|s| format!("({}, {})", s.block, s.id.name))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} = phi[{}] [{}]", target.name, variable, srcs)
        }
    }
}

fn format_terminator(term: &Terminator) -> String {
    match term {
        Terminator::Jump { target } => format!("jump {}", target),
        Terminator::Branch {
            test,
            consequent,
            alternate,
        } => format!(
            "branch {} ? {} : {}",
            format_expr(test),
            consequent,
            alternate
        ),
        Terminator::Switch {
            discriminant,
            cases,
        } => {
            let cases = cases
                .iter()
                .map(|c| match &c.test {
                    Some(t) => format!("{} -> {}", format_expr(t), c.target),
                    None => format!("default -> {}", c.target),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("switch {} [{}]", format_expr(discriminant), cases)
        }
        Terminator::Return { argument } => match argument {
            Some(e) => format!("return {}", format_expr(e)),
            None => "return".to_string(),
        },
        Terminator::Throw { argument } => format!("throw {}", format_expr(argument)),
        Terminator::Break { target, label } => match label {
            Some(l) => format!("break {} -> {}", l, target),
            None => format!("break -> {}", target),
        },
        Terminator::Continue { target, label } => match label {
            Some(l) => format!("continue {} -> {}", l, target),
            None => format!("continue -> {}", target),
        },
        Terminator::ForOf {
            variable,
            iterable,
            body,
            exit,
            ..
        } => format!(
            "for_of {} in {} {{ -> {} }} exit {}",
            variable,
            format_expr(iterable),
            body,
            exit
        ),
        Terminator::ForIn {
            variable,
            object,
            body,
            exit,
            ..
        } => format!(
            "for_in {} in {} {{ -> {} }} exit {}",
            variable,
            format_expr(object),
            body,
            exit
        ),
        Terminator::Try {
            try_block,
            catch_block,
            finally_block,
            exit,
            ..
        } => format!(
            "try {} catch {:?} finally {:?} exit {}",
            try_block, catch_block, finally_block, exit
        ),
        Terminator::Unreachable => "unreachable".to_string(),
    }
}

fn format_expr(expr: &Expression) -> String {
    match expr {
        Expression::Identifier(id) => id.name.clone(),
        Expression::StringLiteral(s) => format!("{:?}", s.value),
        Expression::NumberLiteral(n) => format!("{}", n.value),
        Expression::BooleanLiteral(b) => format!("{}", b.value),
        Expression::NullLiteral(_) => "null".to_string(),
        Expression::BigIntLiteral(b) => format!("{}n", b.value),
        Expression::RegExpLiteral(r) => format!("/{}/{}", r.pattern, r.flags),
        Expression::TemplateLiteral(_) => "`template`".to_string(),
        Expression::Unary(u) => format!("({:?} {})", u.operator, format_expr(&u.argument)),
        Expression::Binary(b) => format!(
            "({} {:?} {})",
            format_expr(&b.left),
            b.operator,
            format_expr(&b.right)
        ),
        Expression::Logical(l) => format!(
            "({} {:?} {})",
            format_expr(&l.left),
            l.operator,
            format_expr(&l.right)
        ),
        Expression::Conditional(c) => format!(
            "({} ? {} : {})",
            format_expr(&c.test),
            format_expr(&c.consequent),
            format_expr(&c.alternate)
        ),
        Expression::Assignment(a) => {
            let left = match &a.left {
                AssignmentTarget::Identifier(name) => name.clone(),
                AssignmentTarget::Member(m) => format_expr(&Expression::Member(m.clone())),
            };
            format!("{} {:?}= {}", left, a.operator, format_expr(&a.right))
        }
        Expression::Update(u) => format!("{:?}({})", u.operator, format_expr(&u.argument)),
        Expression::Call(c) | Expression::OptionalCall(c) => {
            let args = c
                .arguments
                .iter()
                .map(format_expr)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({})", format_expr(&c.callee), args)
        }
        Expression::New(n) => {
            let args = n
                .arguments
                .iter()
                .map(format_expr)
                .collect::<Vec<_>>()
                .join(", ");
            format!("new {}({})", format_expr(&n.callee), args)
        }
        Expression::Member(m) | Expression::OptionalMember(m) => match &m.property {
            MemberKey::Identifier(name) => format!("{}.{}", format_expr(&m.object), name),
            MemberKey::Computed(e) => format!("{}[{}]", format_expr(&m.object), format_expr(e)),
        },
        Expression::Array(_) => "[...]".to_string(),
        Expression::Object(_) => "{...}".to_string(),
        Expression::Spread(s) => format!("...{}", format_expr(&s.argument)),
        Expression::Sequence(s) => s
            .expressions
            .iter()
            .map(format_expr)
            .collect::<Vec<_>>()
            .join(", "),
        Expression::Await(a) => format!("await {}", format_expr(&a.argument)),
        Expression::Yield(y) => match &y.argument {
            Some(a) => format!("yield {}", format_expr(a)),
            None => "yield".to_string(),
        },
        Expression::Arrow(_) => "(...) => {...}".to_string(),
        Expression::Function(_) => "function(...) {...}".to_string(),
        Expression::TaggedTemplate(_) => "tag`...`".to_string(),
        Expression::Class(_) => "class {...}".to_string(),
        Expression::Jsx(_) => "<jsx/>".to_string(),
        Expression::This(_) => "this".to_string(),
        Expression::Super(_) => "super".to_string(),
        Expression::Import(i) => format!("import({})", format_expr(&i.argument)),
        Expression::MetaProperty(m) => format!("{}.{}", m.meta, m.property),
    }
}
