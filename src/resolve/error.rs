//! Error taxonomy for virtual-site resolution.
//!
//! All resolution failures surface to the immediate caller as typed errors;
//! nothing is retried and no partial result is ever returned. Parent lists
//! are never padded or truncated to fit an expression.

use thiserror::Error;

use crate::expr::EvalError;

#[derive(Debug, Error)]
pub enum Error {
    /// Position resolution was attempted on a site with no assigned type.
    #[error("virtual site '{site}' has no virtual type assigned")]
    MissingVirtualType { site: String },

    /// The assigned type carries no position expression.
    #[error("virtual type '{vtype}' carries no position expression")]
    MissingPositionExpression { vtype: String },

    /// Parent-site count does not match the expression's variable count.
    #[error(
        "virtual site '{site}' has {found} parent site(s) but its position expression binds {required} ({variables})"
    )]
    ParentSiteMismatch {
        site: String,
        required: usize,
        found: usize,
        variables: String,
    },

    /// A parent index points outside the topology's site list.
    #[error("parent site index {index} is out of bounds for a topology of {len} site(s)")]
    DanglingParentSite { index: usize, len: usize },

    /// The expression evaluated to a scalar where a 3-vector was required.
    #[error("position expression of virtual type '{vtype}' evaluated to a scalar, not a 3-vector")]
    ScalarPosition { vtype: String },

    /// The expression could not be evaluated with the bound parents and
    /// parameters.
    #[error("failed to evaluate position expression: {0}")]
    Eval(#[from] EvalError),
}
