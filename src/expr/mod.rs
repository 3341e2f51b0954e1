//! Arithmetic expressions over parent-site positions.
//!
//! A position expression combines named 3-vector variables, scalar
//! parameters, float literals, the operators `+ - * /` (with unary minus and
//! parentheses), and the vector intrinsics `cross(u, v)`, `dot(u, v)`, and
//! `norm(v)`. Evaluation is typed: vectors add and subtract with vectors,
//! scale by scalars, and divide by scalars; everything else is rejected.
//!
//! Parent-position variables follow a single naming convention: the Nth
//! parent site (0-based) binds to `r_<letter>`, where the letter walks the
//! alphabet starting at `i` (`r_i`, `r_j`, `r_k`, `r_l`, `r_m`, ... up
//! through `r_z`).

mod eval;
mod parse;

pub use eval::{EvalError, Value};
pub use parse::ParseError;

use parse::Node;
use std::collections::HashMap;
use std::fmt;

/// Highest number of parent-position variables an expression can bind
/// (`r_i` through `r_z`).
pub const MAX_PARENT_VARIABLES: usize = 18;

/// A parsed, immutable arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    source: String,
    root: Node,
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let root = parse::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The original expression text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Free identifiers in first-appearance order, deduplicated.
    pub fn free_identifiers(&self) -> Vec<&str> {
        let mut idents = Vec::new();
        collect_identifiers(&self.root, &mut idents);
        idents
    }

    /// Evaluate with the given name-to-value bindings. Every free identifier
    /// must be bound.
    pub fn evaluate(&self, bindings: &HashMap<String, Value>) -> Result<Value, EvalError> {
        eval::evaluate(&self.root, bindings)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn collect_identifiers<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    match node {
        Node::Number(_) => {}
        Node::Ident(name) => {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        Node::Neg(inner) => collect_identifiers(inner, out),
        Node::Binary { lhs, rhs, .. } => {
            collect_identifiers(lhs, out);
            collect_identifiers(rhs, out);
        }
        Node::Call { args, .. } => {
            for arg in args {
                collect_identifiers(arg, out);
            }
        }
    }
}

/// Position of `name` in the canonical parent-variable sequence, if it is a
/// canonical name (`r_i` is slot 0, `r_j` slot 1, ...).
pub(crate) fn variable_slot(name: &str) -> Option<usize> {
    let letter = name.strip_prefix("r_")?;
    let mut chars = letter.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if ('i'..='z').contains(&c) {
        Some(c as usize - 'i' as usize)
    } else {
        None
    }
}

/// Canonical variable name for a parent slot.
pub(crate) fn variable_name(slot: usize) -> String {
    debug_assert!(slot < MAX_PARENT_VARIABLES);
    format!("r_{}", (b'i' + slot as u8) as char)
}
