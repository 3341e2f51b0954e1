//! TOML-defined virtual-site type catalogs.
//!
//! A catalog maps type names to shared [`VirtualType`] values. The embedded
//! default catalog carries common literature definitions (TIP4P/TIP5P water
//! charge sites, a halogen sigma-hole site); callers can replace it with
//! their own TOML of the same shape:
//!
//! ```toml
//! [types.my-site]
//! position = "(1 - 2 * a) * r_i + a * r_j + a * r_k"
//! charge = -1.04          # elementary-charge units
//!
//! [types.my-site.parameters]
//! a = 0.128012065
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

use crate::model::virtual_type::{
    VirtualPositionType, VirtualPotentialType, VirtualType, VirtualTypeError,
};

const DEFAULT_CATALOG_TOML: &str = include_str!("../../resources/default.vtypes.toml");

static DEFAULT_CATALOG: OnceLock<VirtualTypeCatalog> = OnceLock::new();

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse virtual-site type catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid virtual-site type '{name}': {source}")]
    Type {
        name: String,
        #[source]
        source: VirtualTypeError,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: HashMap<String, TypeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct TypeEntry {
    position: Option<String>,
    #[serde(default)]
    parameters: BTreeMap<String, f64>,
    potential: Option<String>,
    #[serde(default)]
    potential_parameters: BTreeMap<String, f64>,
    /// Default charge in elementary-charge units.
    charge: Option<f64>,
}

/// A named collection of shared virtual-site types.
#[derive(Debug, Clone, Default)]
pub struct VirtualTypeCatalog {
    types: HashMap<String, Arc<VirtualType>>,
}

impl VirtualTypeCatalog {
    pub fn get(&self, name: &str) -> Option<&Arc<VirtualType>> {
        self.types.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Load a catalog from custom TOML, or the embedded default when `None`.
pub fn load_catalog(custom_toml: Option<&str>) -> Result<VirtualTypeCatalog, CatalogError> {
    match custom_toml {
        Some(toml_str) => parse_catalog(toml_str),
        None => Ok(default_catalog().clone()),
    }
}

/// The embedded default catalog.
pub fn default_catalog() -> &'static VirtualTypeCatalog {
    DEFAULT_CATALOG.get_or_init(|| {
        parse_catalog(DEFAULT_CATALOG_TOML)
            .expect("Failed to parse embedded default virtual-site types. This is a library bug.")
    })
}

fn parse_catalog(toml_str: &str) -> Result<VirtualTypeCatalog, CatalogError> {
    let file: CatalogFile = toml::from_str(toml_str)?;

    let mut types = HashMap::with_capacity(file.types.len());
    for (name, entry) in file.types {
        let vtype = build_type(&name, entry).map_err(|source| CatalogError::Type {
            name: name.clone(),
            source,
        })?;
        types.insert(name, Arc::new(vtype));
    }

    Ok(VirtualTypeCatalog { types })
}

fn build_type(name: &str, entry: TypeEntry) -> Result<VirtualType, VirtualTypeError> {
    let mut vtype = VirtualType::new(name);

    if let Some(source) = entry.position {
        let position = VirtualPositionType::with_parameters(&source, entry.parameters)?;
        vtype = vtype.with_position(position);
    }

    if let Some(source) = entry.potential {
        vtype = vtype.with_potential(VirtualPotentialType::new(source, entry.potential_parameters));
    }

    if let Some(charge) = entry.charge {
        vtype = vtype.with_charge(charge);
    }

    Ok(vtype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::site::Site;
    use crate::model::virtual_site::VirtualSite;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    /// Rigid TIP4P-geometry water in nm: OH 0.09572, HOH 104.52 degrees,
    /// bisector along +y.
    fn make_water() -> Vec<Site> {
        let bond_length = 0.09572;
        let half_angle = (104.52f64 / 2.0).to_radians();
        let x = bond_length * half_angle.sin();
        let y = bond_length * half_angle.cos();

        vec![
            Site::new("OW", [0.0, 0.0, 0.0]),
            Site::new("HW1", [x, y, 0.0]),
            Site::new("HW2", [-x, y, 0.0]),
        ]
    }

    #[test]
    fn default_catalog_contains_water_and_halogen_types() {
        let catalog = default_catalog();
        assert!(catalog.get("tip4p-m").is_some());
        assert!(catalog.get("tip4p2005-m").is_some());
        assert!(catalog.get("tip5p-lp1").is_some());
        assert!(catalog.get("tip5p-lp2").is_some());
        assert!(catalog.get("sigma-hole").is_some());
        assert!(catalog.get("midpoint").is_some());
    }

    #[test]
    fn tip4p_m_site_sits_on_the_bisector() {
        let water = make_water();
        let mut m_site = VirtualSite::new("MW");
        m_site.set_parent_sites(vec![0, 1, 2]);
        m_site.set_virtual_type(default_catalog().get("tip4p-m").unwrap().clone());

        let position = m_site.position(&water).unwrap();
        // TIP4P puts the M site 0.015 nm from the oxygen along the bisector.
        assert!(approx_eq(position[0], 0.0, 1e-12));
        assert!(approx_eq(position[1], 0.015, 1e-4));
        assert!(approx_eq(position[2], 0.0, 1e-12));

        assert!(approx_eq(m_site.charge().unwrap().in_elementary(), -1.04, 1e-12));
    }

    #[test]
    fn tip5p_lone_pairs_are_mirrored_out_of_plane() {
        let water = make_water();
        let catalog = default_catalog();

        let mut lp1 = VirtualSite::new("LP1");
        lp1.set_parent_sites(vec![0, 1, 2]);
        lp1.set_virtual_type(catalog.get("tip5p-lp1").unwrap().clone());

        let mut lp2 = VirtualSite::new("LP2");
        lp2.set_parent_sites(vec![0, 1, 2]);
        lp2.set_virtual_type(catalog.get("tip5p-lp2").unwrap().clone());

        let p1 = lp1.position(&water).unwrap();
        let p2 = lp2.position(&water).unwrap();

        // Same in-plane components, opposite out-of-plane components.
        assert!(approx_eq(p1[0], p2[0], 1e-12));
        assert!(approx_eq(p1[1], p2[1], 1e-12));
        assert!(approx_eq(p1[2], -p2[2], 1e-12));
        assert!(p1[2].abs() > 1e-3);

        assert!(approx_eq(lp1.charge().unwrap().in_elementary(), -0.241, 1e-12));
    }

    #[test]
    fn sigma_hole_extends_the_bond_axis() {
        let sites = vec![
            Site::new("C1", [0.0, 0.0, 0.0]),
            Site::new("CL1", [0.18, 0.0, 0.0]),
        ];
        let mut hole = VirtualSite::new("XS");
        hole.set_parent_sites(vec![0, 1]);
        hole.set_virtual_type(default_catalog().get("sigma-hole").unwrap().clone());

        let position = hole.position(&sites).unwrap();
        // 0.16 nm beyond the halogen, along the C->Cl direction.
        assert!(approx_eq(position[0], 0.34, 1e-12));
        assert!(approx_eq(position[1], 0.0, 1e-12));
        assert!(approx_eq(position[2], 0.0, 1e-12));
    }

    #[test]
    fn sigma_hole_carries_a_stored_potential() {
        let vtype = default_catalog().get("sigma-hole").unwrap();
        let potential = vtype.virtual_potential().unwrap();
        assert!(potential.expression().contains("epsilon"));
        assert!(potential.parameters().contains_key("sigma"));
    }

    #[test]
    fn midpoint_type_has_no_default_charge() {
        let vtype = default_catalog().get("midpoint").unwrap();
        assert!(vtype.charge().is_none());
    }

    #[test]
    fn custom_catalog_parses_valid_toml() {
        let custom = r#"
            [types.bisector]
            position = "(1 - w) * r_i + 0.5 * w * r_j + 0.5 * w * r_k"
            charge = -0.8

            [types.bisector.parameters]
            w = 0.3
        "#;
        let catalog = load_catalog(Some(custom)).unwrap();
        assert_eq!(catalog.len(), 1);

        let vtype = catalog.get("bisector").unwrap();
        assert_eq!(vtype.virtual_position().unwrap().variable_count(), 3);
        assert_eq!(vtype.charge().unwrap().in_elementary(), -0.8);
    }

    #[test]
    fn errors_on_invalid_toml() {
        let result = load_catalog(Some("not valid [[[ toml"));
        assert!(matches!(result, Err(CatalogError::Toml(_))));
    }

    #[test]
    fn errors_on_invalid_position_expression() {
        let custom = r#"
            [types.broken]
            position = "0.5 * r_i + 0.5 * r_k"
        "#;
        match load_catalog(Some(custom)).unwrap_err() {
            CatalogError::Type { name, source } => {
                assert_eq!(name, "broken");
                assert!(matches!(
                    source,
                    VirtualTypeError::NonContiguousVariables { .. }
                ));
            }
            other => panic!("expected type error, got {:?}", other),
        }
    }

    #[test]
    fn type_without_position_is_allowed() {
        let custom = r#"
            [types.charge-only]
            charge = 0.1
        "#;
        let catalog = load_catalog(Some(custom)).unwrap();
        let vtype = catalog.get("charge-only").unwrap();
        assert!(vtype.virtual_position().is_none());
        assert_eq!(vtype.charge().unwrap().in_elementary(), 0.1);
    }
}
