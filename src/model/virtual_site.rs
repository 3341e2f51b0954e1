//! Virtual sites: massless particles whose position and charge are derived
//! from real parent sites.

use std::sync::Arc;

use crate::resolve;

use super::site::Site;
use super::units::Charge;
use super::virtual_type::VirtualType;

/// A massless, non-physical site whose state is derived from an ordered
/// list of parent sites and a shared [`VirtualType`].
///
/// Parent sites are referenced by index into the owning topology's site
/// list; the virtual site owns the index *list* but never the sites
/// themselves. Order is load-bearing: parent N binds to the Nth expression
/// variable (`r_i`, `r_j`, ...), so the list is only ever replaced whole,
/// never edited in place. No mass is exposed anywhere; consumers must treat
/// virtual sites as non-inertial.
#[derive(Debug, Clone)]
pub struct VirtualSite {
    name: String,
    parent_sites: Vec<usize>,
    charge: Option<Charge>,
    virtual_type: Option<Arc<VirtualType>>,
}

impl VirtualSite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_sites: Vec::new(),
            charge: None,
            virtual_type: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered parent-site indices; index N binds to expression variable N.
    pub fn parent_sites(&self) -> &[usize] {
        &self.parent_sites
    }

    /// Replace the whole parent list atomically.
    pub fn set_parent_sites(&mut self, parents: Vec<usize>) {
        self.parent_sites = parents;
    }

    pub fn virtual_type(&self) -> Option<&Arc<VirtualType>> {
        self.virtual_type.as_ref()
    }

    pub fn set_virtual_type(&mut self, virtual_type: Arc<VirtualType>) {
        self.virtual_type = Some(virtual_type);
    }

    pub fn clear_virtual_type(&mut self) {
        self.virtual_type = None;
    }

    /// Set an explicit charge override. A bare `f64` is taken as
    /// elementary-charge units.
    pub fn set_charge(&mut self, charge: impl Into<Charge>) {
        self.charge = Some(charge.into());
    }

    pub fn clear_charge(&mut self) {
        self.charge = None;
    }

    /// Effective charge, normalized to elementary-charge units.
    ///
    /// The explicit override wins over the type's default charge; with
    /// neither set the charge is undefined (`None`), which is distinct from
    /// a charge of zero.
    pub fn charge(&self) -> Option<Charge> {
        self.charge
            .or_else(|| self.virtual_type.as_ref().and_then(|t| t.charge()))
            .map(|charge| charge.normalized())
    }

    /// Resolve the current position in nanometers from the assigned type's
    /// expression and the parents' current positions in `sites`.
    ///
    /// The result is never cached: after parent sites move, the next call
    /// reflects their new positions. The call mutates nothing.
    pub fn position(&self, sites: &[Site]) -> Result<[f64; 3], resolve::Error> {
        resolve::resolve_position(self, sites)
    }

    /// Human-readable rendering: the site's name followed by its parents'
    /// names, hyphen-joined in parent order.
    pub fn describe(&self, sites: &[Site]) -> String {
        let parents: Vec<String> = self
            .parent_sites
            .iter()
            .map(|&index| match sites.get(index) {
                Some(site) => site.name.clone(),
                None => format!("#{}", index),
            })
            .collect();
        format!("{}: {}", self.name, parents.join("-"))
    }
}
