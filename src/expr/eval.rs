use std::cmp::Ordering;

use crate::types::ast;
use crate::types::ast::{BinaryOp, UnaryOp};
use crate::types::span::Span;
use crate::{Error, Result, Value};

/// Evaluates an expression parsed from `source`.
pub fn evaluate(source: &str, expr: &ast::Expr) -> Result<Value> {
    Evaluator { source }.eval(expr)
}

struct Evaluator<'source> {
    source: &'source str,
}

/// A numeric operand.
#[derive(Clone, Copy)]
enum Number {
    Integer(i64),
    Float(f64),
}

impl Evaluator<'_> {
    fn eval(&self, expr: &ast::Expr) -> Result<Value> {
        match expr {
            ast::Expr::Literal(lit) => Ok(lit.value.clone()),
            ast::Expr::Unary(unary) => self.eval_unary(unary),
            ast::Expr::Binary(binary) => self.eval_binary(binary),
        }
    }

    fn eval_unary(&self, unary: &ast::Unary) -> Result<Value> {
        let value = self.eval(&unary.expr)?;
        match (unary.op, value) {
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, Value::Integer(n)) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| self.err_overflow(unary.span)),
            (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Not, v) => Err(self.err_operand("`!`", "bool", &v, unary.expr.span())),
            (UnaryOp::Neg, v) => Err(self.err_operand("`-`", "number", &v, unary.expr.span())),
        }
    }

    fn eval_binary(&self, binary: &ast::Binary) -> Result<Value> {
        let ast::Binary { op, lhs, rhs, span } = binary;

        // Logical operators short-circuit so the right hand side must only
        // be evaluated if needed.
        if let BinaryOp::Or | BinaryOp::And = op {
            let l = self.eval_bool(op, lhs)?;
            return match (op, l) {
                (BinaryOp::Or, true) => Ok(Value::Bool(true)),
                (BinaryOp::And, false) => Ok(Value::Bool(false)),
                _ => self.eval_bool(op, rhs).map(Value::Bool),
            };
        }

        let l = self.eval(lhs)?;
        let r = self.eval(rhs)?;

        match op {
            BinaryOp::Or | BinaryOp::And => unreachable!(),
            BinaryOp::Eq => self.equals(&l, &r, *span).map(Value::Bool),
            BinaryOp::Ne => self.equals(&l, &r, *span).map(|eq| Value::Bool(!eq)),
            BinaryOp::Lt => self.compare(&l, &r, *span, Ordering::is_lt),
            BinaryOp::Le => self.compare(&l, &r, *span, Ordering::is_le),
            BinaryOp::Gt => self.compare(&l, &r, *span, Ordering::is_gt),
            BinaryOp::Ge => self.compare(&l, &r, *span, Ordering::is_ge),
            BinaryOp::Add if l.as_str().is_some() || r.as_str().is_some() => {
                Ok(Value::String(format!("{l}{r}")))
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                let a = self.number(op, &l, lhs.span())?;
                let b = self.number(op, &r, rhs.span())?;
                self.arithmetic(*op, a, b, *span)
            }
        }
    }

    fn eval_bool(&self, op: &BinaryOp, expr: &ast::Expr) -> Result<bool> {
        match self.eval(expr)? {
            Value::Bool(b) => Ok(b),
            v => {
                let op = format!("`{}`", op.human());
                Err(self.err_operand(&op, "bool", &v, expr.span()))
            }
        }
    }

    fn number(&self, op: &BinaryOp, value: &Value, span: Span) -> Result<Number> {
        match value {
            Value::Integer(n) => Ok(Number::Integer(*n)),
            Value::Float(n) => Ok(Number::Float(*n)),
            v => {
                let op = format!("`{}`", op.human());
                Err(self.err_operand(&op, "number", v, span))
            }
        }
    }

    fn arithmetic(&self, op: BinaryOp, a: Number, b: Number, span: Span) -> Result<Value> {
        if let BinaryOp::Div | BinaryOp::Rem = op {
            if b.is_zero() {
                return Err(Error::expression("division by zero", self.source, span));
            }
        }

        match (op, a, b) {
            (BinaryOp::Div, a, b) => Ok(Value::Float(a.to_f64() / b.to_f64())),
            (op, Number::Integer(a), Number::Integer(b)) => {
                let result = match op {
                    BinaryOp::Add => a.checked_add(b),
                    BinaryOp::Sub => a.checked_sub(b),
                    BinaryOp::Mul => a.checked_mul(b),
                    BinaryOp::Rem => a.checked_rem(b),
                    _ => unreachable!(),
                };
                result
                    .map(Value::Integer)
                    .ok_or_else(|| self.err_overflow(span))
            }
            (op, a, b) => {
                let (a, b) = (a.to_f64(), b.to_f64());
                let result = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Rem => a % b,
                    _ => unreachable!(),
                };
                Ok(Value::Float(result))
            }
        }
    }

    /// Numbers compare by value, strings by content and bools by value.
    fn equals(&self, l: &Value, r: &Value, span: Span) -> Result<bool> {
        match (l, r) {
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            _ => self.ordering(l, r, span).map(|ord| ord == Some(Ordering::Equal)),
        }
    }

    fn compare<F>(&self, l: &Value, r: &Value, span: Span, f: F) -> Result<Value>
    where
        F: FnOnce(Ordering) -> bool,
    {
        // NaN is neither less, greater, nor equal to anything.
        let ord = self.ordering(l, r, span)?;
        Ok(Value::Bool(ord.map_or(false, f)))
    }

    fn ordering(&self, l: &Value, r: &Value, span: Span) -> Result<Option<Ordering>> {
        if let (Some(a), Some(b)) = (l.as_str(), r.as_str()) {
            return Ok(Some(a.cmp(b)));
        }
        match (Number::from_value(l), Number::from_value(r)) {
            (Some(Number::Integer(a)), Some(Number::Integer(b))) => Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => Ok(a.to_f64().partial_cmp(&b.to_f64())),
            _ => Err(Error::expression(
                format!("cannot compare {} with {}", l.human(), r.human()),
                self.source,
                span,
            )),
        }
    }

    fn err_overflow(&self, span: Span) -> Error {
        Error::expression("integer overflow", self.source, span)
    }

    fn err_operand(&self, op: &str, exp: &str, got: &Value, span: Span) -> Error {
        Error::expression(
            format!("{op} expected {exp}, found {}", got.human()),
            self.source,
            span,
        )
    }
}

impl Number {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(Self::Integer(*n)),
            Value::Float(n) => Some(Self::Float(*n)),
            _ => None,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(n) => n,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Integer(n) => n == 0,
            Self::Float(n) => n == 0.0,
        }
    }
}
