//! Shared, immutable virtual-site type descriptors.
//!
//! A [`VirtualType`] bundles how a virtual site derives its position
//! ([`VirtualPositionType`]), how it interacts non-bonded
//! ([`VirtualPotentialType`], stored but never evaluated here), and a
//! default charge. Many virtual sites reference one type through
//! `Arc<VirtualType>`; changing a type means building a new value and
//! repointing the sites, never mutating in place.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::expr::{self, Expr, ParseError};

use super::units::Charge;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VirtualTypeError {
    #[error("invalid position expression: {0}")]
    Parse(#[from] ParseError),

    #[error("position expression declares no parent-site variables (expected r_i, r_j, ...)")]
    NoVariables,

    #[error(
        "parent-site variables must form a contiguous run starting at r_i; found [{found}], expected [{expected}]"
    )]
    NonContiguousVariables { found: String, expected: String },

    #[error("'{0}' is neither a declared parameter nor a parent-site variable")]
    UnknownIdentifier(String),

    #[error("parameter '{0}' shadows a parent-site variable name")]
    ParameterShadowsVariable(String),
}

/// The position expression of a virtual-site type, together with its named
/// scalar parameters.
///
/// The expression's independent variables are the canonical parent-position
/// names `r_i`, `r_j`, `r_k`, ...; the set found in the expression must be a
/// contiguous run starting at `r_i`, and its length is the number of parent
/// sites any site of this type must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualPositionType {
    expression: Expr,
    parameters: BTreeMap<String, f64>,
    variables: Vec<String>,
}

impl VirtualPositionType {
    /// Parse and validate a position expression without parameters.
    pub fn new(expression: &str) -> Result<Self, VirtualTypeError> {
        Self::with_parameters(expression, Vec::<(String, f64)>::new())
    }

    /// Parse and validate a position expression with named scalar parameters.
    pub fn with_parameters<K, I>(expression: &str, parameters: I) -> Result<Self, VirtualTypeError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let parameters: BTreeMap<String, f64> = parameters
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();

        for name in parameters.keys() {
            if expr::variable_slot(name).is_some() {
                return Err(VirtualTypeError::ParameterShadowsVariable(name.clone()));
            }
        }

        let expression = Expr::parse(expression)?;

        let mut slots: Vec<usize> = Vec::new();
        for ident in expression.free_identifiers() {
            if parameters.contains_key(ident) {
                continue;
            }
            match expr::variable_slot(ident) {
                Some(slot) => {
                    if !slots.contains(&slot) {
                        slots.push(slot);
                    }
                }
                None => return Err(VirtualTypeError::UnknownIdentifier(ident.to_string())),
            }
        }

        if slots.is_empty() {
            return Err(VirtualTypeError::NoVariables);
        }

        slots.sort_unstable();
        let count = slots.len();
        if !slots.iter().copied().eq(0..count) {
            let found = slots
                .iter()
                .map(|&slot| expr::variable_name(slot))
                .collect::<Vec<_>>()
                .join(", ");
            let expected = (0..count)
                .map(expr::variable_name)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(VirtualTypeError::NonContiguousVariables { found, expected });
        }

        let variables = (0..count).map(expr::variable_name).collect();

        Ok(Self {
            expression,
            parameters,
            variables,
        })
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn parameters(&self) -> &BTreeMap<String, f64> {
        &self.parameters
    }

    /// Independent variables in canonical order; slot N binds to the Nth
    /// parent site.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of parent sites a virtual site of this type must carry.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

/// The non-bonded interaction of a virtual-site type. Stored as text plus
/// named parameters for downstream force-field consumers; this crate never
/// evaluates it.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualPotentialType {
    expression: String,
    parameters: BTreeMap<String, f64>,
}

impl VirtualPotentialType {
    pub fn new<K, I>(expression: impl Into<String>, parameters: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            expression: expression.into(),
            parameters: parameters
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn parameters(&self) -> &BTreeMap<String, f64> {
        &self.parameters
    }
}

/// Immutable descriptor shared by all virtual sites of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualType {
    name: String,
    virtual_position: Option<VirtualPositionType>,
    virtual_potential: Option<VirtualPotentialType>,
    charge: Option<Charge>,
}

impl VirtualType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            virtual_position: None,
            virtual_potential: None,
            charge: None,
        }
    }

    pub fn with_position(mut self, position: VirtualPositionType) -> Self {
        self.virtual_position = Some(position);
        self
    }

    pub fn with_potential(mut self, potential: VirtualPotentialType) -> Self {
        self.virtual_potential = Some(potential);
        self
    }

    /// Default charge for sites of this type. A bare `f64` is taken as
    /// elementary-charge units.
    pub fn with_charge(mut self, charge: impl Into<Charge>) -> Self {
        self.charge = Some(charge.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn virtual_position(&self) -> Option<&VirtualPositionType> {
        self.virtual_position.as_ref()
    }

    pub fn virtual_potential(&self) -> Option<&VirtualPotentialType> {
        self.virtual_potential.as_ref()
    }

    pub fn charge(&self) -> Option<Charge> {
        self.charge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_expression_has_two_variables() {
        let position = VirtualPositionType::new("0.5 * r_i + 0.5 * r_j").unwrap();
        assert_eq!(position.variable_count(), 2);
        assert_eq!(position.variables(), ["r_i", "r_j"]);
    }

    #[test]
    fn variables_are_reported_in_canonical_order() {
        // r_j appears before r_i in the source text.
        let position = VirtualPositionType::new("0.25 * r_j + 0.75 * r_i").unwrap();
        assert_eq!(position.variables(), ["r_i", "r_j"]);
    }

    #[test]
    fn parameters_are_not_counted_as_variables() {
        let position =
            VirtualPositionType::with_parameters("(1 - 2 * a) * r_i + a * r_j + a * r_k", [("a", 0.25)])
                .unwrap();
        assert_eq!(position.variable_count(), 3);
        assert_eq!(position.parameters().get("a"), Some(&0.25));
    }

    #[test]
    fn rejects_skipped_variable() {
        let err = VirtualPositionType::new("0.5 * r_i + 0.5 * r_k").unwrap_err();
        match err {
            VirtualTypeError::NonContiguousVariables { found, expected } => {
                assert_eq!(found, "r_i, r_k");
                assert_eq!(expected, "r_i, r_j");
            }
            other => panic!("expected NonContiguousVariables, got {:?}", other),
        }
    }

    #[test]
    fn rejects_variables_not_starting_at_r_i() {
        assert!(matches!(
            VirtualPositionType::new("r_j + r_k").unwrap_err(),
            VirtualTypeError::NonContiguousVariables { .. }
        ));
    }

    #[test]
    fn rejects_undeclared_identifier() {
        let err = VirtualPositionType::new("w * r_i").unwrap_err();
        assert_eq!(err, VirtualTypeError::UnknownIdentifier("w".to_string()));
    }

    #[test]
    fn rejects_expression_without_variables() {
        assert_eq!(
            VirtualPositionType::new("1 + 2").unwrap_err(),
            VirtualTypeError::NoVariables
        );
    }

    #[test]
    fn rejects_parameter_shadowing_a_variable() {
        let err =
            VirtualPositionType::with_parameters("r_i + r_j", [("r_j", 1.0)]).unwrap_err();
        assert_eq!(
            err,
            VirtualTypeError::ParameterShadowsVariable("r_j".to_string())
        );
    }

    #[test]
    fn rejects_malformed_expression() {
        assert!(matches!(
            VirtualPositionType::new("0.5 * (r_i + r_j").unwrap_err(),
            VirtualTypeError::Parse(_)
        ));
    }

    #[test]
    fn virtual_type_is_built_incrementally() {
        let vtype = VirtualType::new("tip4p-m")
            .with_position(VirtualPositionType::new("0.5 * r_i + 0.5 * r_j").unwrap())
            .with_charge(-1.04);

        assert_eq!(vtype.name(), "tip4p-m");
        assert_eq!(vtype.virtual_position().unwrap().variable_count(), 2);
        assert!(vtype.virtual_potential().is_none());
        assert_eq!(vtype.charge().unwrap().in_elementary(), -1.04);
    }

    #[test]
    fn potential_is_stored_verbatim() {
        let potential = VirtualPotentialType::new(
            "4 * epsilon * ((sigma / r)^12 - (sigma / r)^6)",
            [("sigma", 0.34), ("epsilon", 0.25)],
        );
        assert_eq!(
            potential.expression(),
            "4 * epsilon * ((sigma / r)^12 - (sigma / r)^6)"
        );
        assert_eq!(potential.parameters().len(), 2);
    }
}
