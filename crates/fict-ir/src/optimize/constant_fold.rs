//! Constant folding (§4.5): binary/unary/logical/conditional expressions
//! over literal operands reduce to literals, evaluated with source (JS-like)
//! semantics for arithmetic, string concatenation, and short-circuiting.

use crate::ir::expr::{BinaryExpr, BinaryOp, BoolLit, ConditionalExpr, Expression, LogicalExpr, LogicalOp, NumberLit, StringLit, UnaryExpr, UnaryOp};
use crate::ir::function::Function;
use crate::ir::instr::Instruction;
use crate::ir::terminator::Terminator;

pub fn run(function: &mut Function) {
    for block in &mut function.blocks {
        for instr in &mut block.instructions {
            match instr {
                Instruction::Assign { value, .. } | Instruction::Expression { value } => fold_in_place(value),
                Instruction::Phi { .. } => {}
            }
        }
        match &mut block.terminator {
            Terminator::Branch { test, .. } => fold_in_place(test),
            Terminator::Switch { discriminant, .. } => fold_in_place(discriminant),
            Terminator::Return { argument: Some(e) } => fold_in_place(e),
            Terminator::Throw { argument } => fold_in_place(argument),
            Terminator::ForOf { iterable, .. } => fold_in_place(iterable),
            Terminator::ForIn { object, .. } => fold_in_place(object),
            _ => {}
        }
    }
}

fn fold_in_place(expr: &mut Expression) {
    *expr = fold(std::mem::replace(expr, Expression::NullLiteral(fict_ast::Span::synthetic())));
}

/// Folds bottom-up: children first, then the node itself if it is now a
/// literal-only form.
fn fold(expr: Expression) -> Expression {
    match expr {
        Expression::Unary(mut e) => {
            *e.argument = fold(std::mem::replace(&mut *e.argument, Expression::NullLiteral(e.span)));
            fold_unary(e)
        }
        Expression::Binary(mut e) => {
            *e.left = fold(std::mem::replace(&mut *e.left, Expression::NullLiteral(e.span)));
            *e.right = fold(std::mem::replace(&mut *e.right, Expression::NullLiteral(e.span)));
            fold_binary(e)
        }
        Expression::Logical(mut e) => {
            *e.left = fold(std::mem::replace(&mut *e.left, Expression::NullLiteral(e.span)));
            *e.right = fold(std::mem::replace(&mut *e.right, Expression::NullLiteral(e.span)));
            fold_logical(e)
        }
        Expression::Conditional(mut e) => {
            *e.test = fold(std::mem::replace(&mut *e.test, Expression::NullLiteral(e.span)));
            *e.consequent = fold(std::mem::replace(&mut *e.consequent, Expression::NullLiteral(e.span)));
            *e.alternate = fold(std::mem::replace(&mut *e.alternate, Expression::NullLiteral(e.span)));
            fold_conditional(e)
        }
        other => other,
    }
}

fn as_number(expr: &Expression) -> Option<f64> {
    match expr {
        Expression::NumberLiteral(n) => Some(n.value),
        Expression::BooleanLiteral(b) => Some(if b.value { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_bool(expr: &Expression) -> Option<bool> {
    match expr {
        Expression::BooleanLiteral(b) => Some(b.value),
        Expression::NumberLiteral(n) => Some(n.value != 0.0),
        Expression::StringLiteral(s) => Some(!s.value.is_empty()),
        Expression::NullLiteral(_) => Some(false),
        _ => None,
    }
}

fn as_string(expr: &Expression) -> Option<String> {
    match expr {
        Expression::StringLiteral(s) => Some(s.value.clone()),
        Expression::NumberLiteral(n) => Some(format_number(n.value)),
        Expression::BooleanLiteral(b) => Some(b.value.to_string()),
        Expression::NullLiteral(_) => Some("null".to_string()),
        _ => None,
    }
}

fn format_number(v: f64) -> String {
    if v == v.trunc() && v.is_finite() {
        format!("{v}")
    } else {
        v.to_string()
    }
}

fn fold_unary(e: UnaryExpr) -> Expression {
    let span = e.span;
    match e.operator {
        UnaryOp::Not => {
            if let Some(b) = as_bool(&e.argument) {
                return Expression::BooleanLiteral(BoolLit { value: !b, span });
            }
        }
        UnaryOp::Minus => {
            if let Some(n) = as_number(&e.argument) {
                return Expression::NumberLiteral(NumberLit { value: -n, span });
            }
        }
        UnaryOp::Plus => {
            if let Some(n) = as_number(&e.argument) {
                return Expression::NumberLiteral(NumberLit { value: n, span });
            }
        }
        _ => {}
    }
    Expression::Unary(e)
}

fn fold_binary(e: BinaryExpr) -> Expression {
    let span = e.span;
    if let (Some(a), Some(b)) = (as_number(&e.left), as_number(&e.right)) {
        let result = match e.operator {
            BinaryOp::Add => Some(a + b),
            BinaryOp::Sub => Some(a - b),
            BinaryOp::Mul => Some(a * b),
            BinaryOp::Div => Some(a / b),
            BinaryOp::Mod => Some(a % b),
            BinaryOp::Pow => Some(a.powf(b)),
            _ => None,
        };
        if let Some(v) = result {
            return Expression::NumberLiteral(NumberLit { value: v, span });
        }
        let cmp = match e.operator {
            BinaryOp::Lt => Some(a < b),
            BinaryOp::Gt => Some(a > b),
            BinaryOp::Lte => Some(a <= b),
            BinaryOp::Gte => Some(a >= b),
            BinaryOp::StrictEq | BinaryOp::Eq => Some(a == b),
            BinaryOp::StrictNotEq | BinaryOp::NotEq => Some(a != b),
            _ => None,
        };
        if let Some(v) = cmp {
            return Expression::BooleanLiteral(BoolLit { value: v, span });
        }
    }
    if matches!(e.operator, BinaryOp::Add) {
        if let (Some(a), Some(b)) = (as_string(&e.left), as_string(&e.right)) {
            if !matches!(e.left.as_ref(), Expression::NumberLiteral(_))
                || !matches!(e.right.as_ref(), Expression::NumberLiteral(_))
            {
                return Expression::StringLiteral(StringLit { value: a + &b, span });
            }
        }
    }
    Expression::Binary(e)
}

fn fold_logical(e: LogicalExpr) -> Expression {
    let span = e.span;
    match e.operator {
        LogicalOp::And => {
            if let Some(b) = as_bool(&e.left) {
                return if b { *e.right } else { *e.left };
            }
        }
        LogicalOp::Or => {
            if let Some(b) = as_bool(&e.left) {
                return if b { *e.left } else { *e.right };
            }
        }
        LogicalOp::NullishCoalesce => {
            if matches!(e.left.as_ref(), Expression::NullLiteral(_)) {
                return *e.right;
            }
            if as_bool(&e.left).is_some() && !matches!(e.left.as_ref(), Expression::NullLiteral(_)) {
                return *e.left;
            }
        }
    }
    let _ = span;
    Expression::Logical(e)
}

fn fold_conditional(e: ConditionalExpr) -> Expression {
    if let Some(b) = as_bool(&e.test) {
        return if b { *e.consequent } else { *e.alternate };
    }
    Expression::Conditional(e)
}
