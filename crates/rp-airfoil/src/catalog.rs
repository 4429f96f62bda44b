//! Name → polar resolution.

use crate::closed_form::{AirfoilFamily, ClosedFormPolar};
use crate::error::{AirfoilError, AirfoilResult};
use crate::polar::AirfoilPolar;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of polars keyed by normalized name.
///
/// Names compare case-insensitively and ignore `-`, `_` and spaces, so
/// `"Clark-Y"`, `"clark_y"` and `"CLARKY"` resolve to the same polar.
#[derive(Debug, Clone, Default)]
pub struct AirfoilCatalog {
    entries: HashMap<String, Arc<AirfoilPolar>>,
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_uppercase)
        .collect()
}

impl AirfoilCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every closed-form family.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for family in AirfoilFamily::ALL {
            catalog.entries.insert(
                normalize(family.name()),
                Arc::new(ClosedFormPolar::for_family(family).into()),
            );
        }
        catalog
    }

    /// Register a polar under its own name.
    pub fn register(&mut self, polar: AirfoilPolar) -> AirfoilResult<Arc<AirfoilPolar>> {
        let key = normalize(polar.name());
        if self.entries.contains_key(&key) {
            return Err(AirfoilError::Duplicate {
                name: polar.name().to_string(),
            });
        }
        let shared = Arc::new(polar);
        self.entries.insert(key, Arc::clone(&shared));
        Ok(shared)
    }

    pub fn resolve(&self, name: &str) -> AirfoilResult<Arc<AirfoilPolar>> {
        self.entries
            .get(&normalize(name))
            .cloned()
            .ok_or_else(|| AirfoilError::UnknownAirfoil {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize(name))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}
