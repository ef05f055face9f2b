//! Registry configuration for the built-in capacity substructures.

use std::sync::LazyLock;

use super::core::SubstructureRegistry;
use super::variants::ThermalStorageCapacity;
use crate::config::THERMAL_STORAGE_TAG;

static BUILTIN_REGISTRY: LazyLock<SubstructureRegistry> =
    LazyLock::new(create_substructure_registry);

/// Create a registry with every built-in substructure.
///
/// Callers that add their own variants start from this and register more.
#[must_use]
pub fn create_substructure_registry() -> SubstructureRegistry {
    let mut registry = SubstructureRegistry::new();

    registry.register(THERMAL_STORAGE_TAG, ThermalStorageCapacity::create);

    registry
}

/// Process-wide registry of the built-in substructures, initialized on
/// first use.
#[must_use]
pub fn builtin_registry() -> &'static SubstructureRegistry {
    &BUILTIN_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_substructure_registry() {
        let registry = create_substructure_registry();
        assert!(registry.has_factory("thermalStorageCapacity"));
        assert!(!registry.has_factory("baseCapacity"));
        assert!(!registry.has_factory("influenceFactors"));
    }

    #[test]
    fn test_builtin_registry_is_shared() {
        assert!(std::ptr::eq(builtin_registry(), builtin_registry()));
    }
}
