//! Virtual-site position and charge resolution for molecular topologies.
//!
//! Virtual sites are massless, non-physical particles (lone pairs, off-atom
//! charge sites, dummy interaction centers) whose position and charge are
//! derived from real "parent" sites rather than stored. This crate models
//! the relationship between a virtual site, its ordered parent sites, and
//! its shared [`VirtualType`], and resolves derived state on demand.
//!
//! # Features
//!
//! - **Position resolution** — Evaluate a type's declarative position
//!   expression over the parents' current positions, order-sensitively and
//!   without caching
//! - **Charge resolution** — Explicit per-site override, falling back to
//!   the type's default charge, falling back to undefined (never zero)
//! - **Expression language** — Arithmetic over 3-vector parent variables
//!   (`r_i`, `r_j`, ...), scalar parameters, and the vector intrinsics
//!   `cross`, `dot`, and `norm`
//! - **Type catalogs** — TOML-defined libraries of shared virtual-site
//!   types, with an embedded default covering TIP4P/TIP5P water charge
//!   sites and a halogen sigma-hole site
//!
//! # Quick Start
//!
//! Build a TIP4P-like water charge site by hand and resolve it:
//!
//! ```
//! use std::sync::Arc;
//! use vsite::{Site, VirtualPositionType, VirtualSite, VirtualType};
//!
//! // Rigid water in nm: oxygen at the origin, bisector along +y.
//! let mut sites = vec![
//!     Site::new("OW", [0.0, 0.0, 0.0]),
//!     Site::new("HW1", [0.07570, 0.05859, 0.0]),
//!     Site::new("HW2", [-0.07570, 0.05859, 0.0]),
//! ];
//!
//! let m_type = Arc::new(
//!     VirtualType::new("tip4p-m")
//!         .with_position(VirtualPositionType::with_parameters(
//!             "(1 - 2 * a) * r_i + a * r_j + a * r_k",
//!             [("a", 0.128012065)],
//!         )?)
//!         .with_charge(-1.04),
//! );
//!
//! let mut m_site = VirtualSite::new("MW");
//! m_site.set_parent_sites(vec![0, 1, 2]);
//! m_site.set_virtual_type(m_type);
//!
//! // The M site sits 0.015 nm from the oxygen along the H-H bisector.
//! let position = m_site.position(&sites)?;
//! assert!(position[0].abs() < 1e-12);
//! assert!((position[1] - 0.015).abs() < 1e-3);
//!
//! // Charge comes from the type default; an override would win instead.
//! assert_eq!(m_site.charge().unwrap().in_elementary(), -1.04);
//!
//! // Resolution is live: move a parent and the next call reflects it.
//! sites[0].position = [0.0, 0.1, 0.0];
//! let moved = m_site.position(&sites)?;
//! assert!(moved[1] > position[1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The same construction is available from the embedded catalog:
//!
//! ```
//! use vsite::default_catalog;
//!
//! let m_type = default_catalog().get("tip4p-m").expect("embedded type");
//! assert_eq!(m_type.virtual_position().unwrap().variable_count(), 3);
//! ```
//!
//! # Module Organization
//!
//! - Data model — [`Site`], [`VirtualSite`], [`VirtualType`],
//!   [`VirtualPositionType`], [`VirtualPotentialType`]
//! - Units — [`Charge`], [`ChargeUnit`], [`LengthUnit`]
//! - Expressions — [`Expr`], [`Value`]
//! - Catalogs — [`VirtualTypeCatalog`], [`load_catalog`],
//!   [`default_catalog`]
//!
//! # Errors
//!
//! Resolution failures surface as [`ResolveError`]: a missing type or
//! position expression, a parent list that does not match the expression's
//! variables (never silently padded or truncated), a dangling parent index,
//! or a typed evaluation failure. Charge lookups cannot fail; an absent
//! charge is `None`, which is distinct from zero.
//!
//! # Concurrency
//!
//! Resolution is pure, synchronous, and safe to call from many readers at
//! once, provided the topology is not mutated concurrently. The crate takes
//! no locks; the build-then-query discipline is the caller's contract.

mod expr;
mod model;
mod resolve;

pub use expr::{EvalError, Expr, ParseError, Value, MAX_PARENT_VARIABLES};

pub use model::site::Site;
pub use model::units::{
    Charge, ChargeUnit, LengthUnit, ParseChargeUnitError, ParseLengthUnitError, ELEMENTARY_CHARGE,
};
pub use model::virtual_site::VirtualSite;
pub use model::virtual_type::{
    VirtualPositionType, VirtualPotentialType, VirtualType, VirtualTypeError,
};

pub use resolve::catalog::{default_catalog, load_catalog, CatalogError, VirtualTypeCatalog};
pub use resolve::{resolve_position, Error as ResolveError};
