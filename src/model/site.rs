use super::units::LengthUnit;

/// A real site in the owning topology: a name plus a current position in
/// nanometers. This is the only capability virtual-site resolution needs
/// from the topology; everything else about real sites lives outside this
/// crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub name: String,
    pub position: [f64; 3],
}

impl Site {
    /// Position in nanometers.
    pub fn new(name: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    /// Position in the given length unit, normalized to nanometers.
    pub fn with_unit(name: impl Into<String>, position: [f64; 3], unit: LengthUnit) -> Self {
        let factor = unit.in_nanometers();
        Self::new(
            name,
            [
                position[0] * factor,
                position[1] * factor,
                position[2] * factor,
            ],
        )
    }
}
