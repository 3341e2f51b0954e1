//! On-demand resolution of a virtual site's derived position.
//!
//! Resolution is a pure function of the site's type, its ordered parent
//! list, and the parents' current positions. Nothing is cached and nothing
//! is mutated. Callers must not mutate parent positions concurrently with
//! resolution; the crate performs no internal locking.

pub mod catalog;
mod error;

pub use error::Error;

use std::collections::HashMap;

use crate::expr::Value;
use crate::model::site::Site;
use crate::model::virtual_site::VirtualSite;

/// Resolve the current position of `vsite` in nanometers.
///
/// Fails if the site has no type, the type has no position expression, the
/// parent count does not match the expression's variables, or a parent
/// index does not resolve in `sites`. Parent N binds to expression variable
/// N in declared order.
pub fn resolve_position(vsite: &VirtualSite, sites: &[Site]) -> Result<[f64; 3], Error> {
    let vtype = vsite.virtual_type().ok_or_else(|| Error::MissingVirtualType {
        site: vsite.name().to_string(),
    })?;

    let position_type =
        vtype
            .virtual_position()
            .ok_or_else(|| Error::MissingPositionExpression {
                vtype: vtype.name().to_string(),
            })?;

    let parents = vsite.parent_sites();
    let required = position_type.variable_count();
    if parents.len() != required {
        return Err(Error::ParentSiteMismatch {
            site: vsite.name().to_string(),
            required,
            found: parents.len(),
            variables: position_type.variables().join(", "),
        });
    }

    let mut bindings: HashMap<String, Value> = position_type
        .parameters()
        .iter()
        .map(|(name, &value)| (name.clone(), Value::Scalar(value)))
        .collect();

    for (variable, &index) in position_type.variables().iter().zip(parents) {
        let parent = sites.get(index).ok_or(Error::DanglingParentSite {
            index,
            len: sites.len(),
        })?;
        bindings.insert(variable.clone(), Value::Vector(parent.position));
    }

    match position_type.expression().evaluate(&bindings)? {
        Value::Vector(position) => Ok(position),
        Value::Scalar(_) => Err(Error::ScalarPosition {
            vtype: vtype.name().to_string(),
        }),
    }
}
