//! Charge and length units.
//!
//! The crate works in two canonical units: elementary charge (e) for
//! charges and nanometers (nm) for positions. Quantities supplied in other
//! supported units are converted on construction or on read; a bare numeric
//! charge is always interpreted as already being in elementary-charge units.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Elementary charge in coulombs.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported charge unit: '{0}'")]
pub struct ParseChargeUnitError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported length unit: '{0}'")]
pub struct ParseLengthUnitError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeUnit {
    Elementary,
    Coulomb,
}

impl ChargeUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            ChargeUnit::Elementary => "e",
            ChargeUnit::Coulomb => "C",
        }
    }
}

impl FromStr for ChargeUnit {
    type Err = ParseChargeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "e" => Ok(ChargeUnit::Elementary),
            "C" => Ok(ChargeUnit::Coulomb),
            _ if s.eq_ignore_ascii_case("elementary_charge") => Ok(ChargeUnit::Elementary),
            _ if s.eq_ignore_ascii_case("coulomb") => Ok(ChargeUnit::Coulomb),
            _ => Err(ParseChargeUnitError(s.to_string())),
        }
    }
}

impl fmt::Display for ChargeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Nanometer,
    Angstrom,
    Picometer,
}

impl LengthUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Nanometer => "nm",
            LengthUnit::Angstrom => "A",
            LengthUnit::Picometer => "pm",
        }
    }

    /// Length of one of this unit expressed in nanometers.
    pub fn in_nanometers(&self) -> f64 {
        match self {
            LengthUnit::Nanometer => 1.0,
            LengthUnit::Angstrom => 0.1,
            LengthUnit::Picometer => 1.0e-3,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = ParseLengthUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nm" => Ok(LengthUnit::Nanometer),
            "A" => Ok(LengthUnit::Angstrom),
            "pm" => Ok(LengthUnit::Picometer),
            _ if s.eq_ignore_ascii_case("nanometer") => Ok(LengthUnit::Nanometer),
            _ if s.eq_ignore_ascii_case("angstrom") => Ok(LengthUnit::Angstrom),
            _ if s.eq_ignore_ascii_case("picometer") => Ok(LengthUnit::Picometer),
            _ => Err(ParseLengthUnitError(s.to_string())),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A charge quantity tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    magnitude: f64,
    unit: ChargeUnit,
}

impl Charge {
    pub fn new(magnitude: f64, unit: ChargeUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn elementary(magnitude: f64) -> Self {
        Self::new(magnitude, ChargeUnit::Elementary)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> ChargeUnit {
        self.unit
    }

    pub fn in_elementary(&self) -> f64 {
        match self.unit {
            ChargeUnit::Elementary => self.magnitude,
            ChargeUnit::Coulomb => self.magnitude / ELEMENTARY_CHARGE,
        }
    }

    pub fn in_coulombs(&self) -> f64 {
        match self.unit {
            ChargeUnit::Elementary => self.magnitude * ELEMENTARY_CHARGE,
            ChargeUnit::Coulomb => self.magnitude,
        }
    }

    /// The same charge expressed in the canonical unit (elementary charge).
    pub fn normalized(&self) -> Charge {
        Charge::elementary(self.in_elementary())
    }
}

impl From<f64> for Charge {
    /// A bare numeric charge is interpreted as elementary-charge units.
    fn from(magnitude: f64) -> Self {
        Charge::elementary(magnitude)
    }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.symbol())
    }
}
