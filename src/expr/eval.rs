use std::collections::HashMap;
use thiserror::Error;

use super::parse::{BinOp, Function, Node};

/// A value produced while evaluating an expression: either a scalar or a
/// 3-component vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector([f64; 3]),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Vector(_) => "vector",
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<[f64; 3]> for Value {
    fn from(v: [f64; 3]) -> Self {
        Value::Vector(v)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("variable '{0}' has no bound value")]
    UnboundVariable(String),

    #[error("cannot apply '{op}' to {lhs} and {rhs}")]
    TypeMismatch {
        op: char,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("'{function}' requires vector arguments, got a {found}")]
    BadArgument {
        function: &'static str,
        found: &'static str,
    },
}

pub(crate) fn evaluate(node: &Node, bindings: &HashMap<String, Value>) -> Result<Value, EvalError> {
    match node {
        Node::Number(v) => Ok(Value::Scalar(*v)),
        Node::Ident(name) => bindings
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
        Node::Neg(inner) => Ok(match evaluate(inner, bindings)? {
            Value::Scalar(v) => Value::Scalar(-v),
            Value::Vector([x, y, z]) => Value::Vector([-x, -y, -z]),
        }),
        Node::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, bindings)?;
            let rhs = evaluate(rhs, bindings)?;
            apply(*op, lhs, rhs)
        }
        Node::Call { function, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, bindings)?);
            }
            call(*function, &values)
        }
    }
}

fn apply(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    use Value::{Scalar, Vector};

    let value = match (op, lhs, rhs) {
        (BinOp::Add, Scalar(a), Scalar(b)) => Scalar(a + b),
        (BinOp::Add, Vector(a), Vector(b)) => Vector([a[0] + b[0], a[1] + b[1], a[2] + b[2]]),
        (BinOp::Sub, Scalar(a), Scalar(b)) => Scalar(a - b),
        (BinOp::Sub, Vector(a), Vector(b)) => Vector([a[0] - b[0], a[1] - b[1], a[2] - b[2]]),
        (BinOp::Mul, Scalar(a), Scalar(b)) => Scalar(a * b),
        (BinOp::Mul, Scalar(s), Vector(v)) | (BinOp::Mul, Vector(v), Scalar(s)) => {
            Vector([s * v[0], s * v[1], s * v[2]])
        }
        (BinOp::Div, Scalar(a), Scalar(b)) => Scalar(a / b),
        (BinOp::Div, Vector(v), Scalar(s)) => Vector([v[0] / s, v[1] / s, v[2] / s]),
        _ => {
            return Err(EvalError::TypeMismatch {
                op: op.symbol(),
                lhs: lhs.kind(),
                rhs: rhs.kind(),
            });
        }
    };

    Ok(value)
}

fn call(function: Function, values: &[Value]) -> Result<Value, EvalError> {
    // Arity is enforced by the parser; only operand kinds are checked here.
    let bad_argument = |found: &Value| EvalError::BadArgument {
        function: function.name(),
        found: found.kind(),
    };

    match function {
        Function::Cross => match (&values[0], &values[1]) {
            (Value::Vector(a), Value::Vector(b)) => Ok(Value::Vector([
                a[1] * b[2] - a[2] * b[1],
                a[2] * b[0] - a[0] * b[2],
                a[0] * b[1] - a[1] * b[0],
            ])),
            (Value::Scalar(_), _) => Err(bad_argument(&values[0])),
            _ => Err(bad_argument(&values[1])),
        },
        Function::Dot => match (&values[0], &values[1]) {
            (Value::Vector(a), Value::Vector(b)) => {
                Ok(Value::Scalar(a[0] * b[0] + a[1] * b[1] + a[2] * b[2]))
            }
            (Value::Scalar(_), _) => Err(bad_argument(&values[0])),
            _ => Err(bad_argument(&values[1])),
        },
        Function::Norm => match &values[0] {
            Value::Vector(v) => {
                Ok(Value::Scalar((v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()))
            }
            Value::Scalar(_) => Err(bad_argument(&values[0])),
        },
    }
}
