//! Capacity substructure trait definition.

use std::any::Any;
use std::fmt;

use roxmltree::Node;

use crate::error::Result;
use crate::services::ServiceContext;

/// Non-owning view of the capacity that is creating a substructure.
///
/// Gives factories access to the owner's name and the shared services. It
/// borrows from the decode pass, so a substructure that needs something from
/// it copies that out at construction time.
#[derive(Clone, Copy)]
pub struct CapacityHandle<'c> {
    name: &'c str,
    services: &'c dyn ServiceContext,
}

impl<'c> CapacityHandle<'c> {
    #[must_use]
    pub fn new(name: &'c str, services: &'c dyn ServiceContext) -> Self {
        Self { name, services }
    }

    /// Name of the owning capacity.
    #[must_use]
    pub fn name(&self) -> &'c str {
        self.name
    }

    /// Shared services of the decode pass.
    #[must_use]
    pub fn services(&self) -> &'c dyn ServiceContext {
        self.services
    }
}

impl fmt::Debug for CapacityHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Trait for capacity substructures.
///
/// Each implementation decodes one tag-identified element nested in a
/// capacity (for example `<thermalStorageCapacity>`) into its own fields.
pub trait CapacitySubstructure: fmt::Debug + Send + Sync {
    /// Tag this substructure is registered under.
    fn tag(&self) -> &'static str;

    /// Decode the substructure's element, replacing this instance's fields.
    ///
    /// On error the instance is left as it was.
    fn decode(&mut self, node: Node<'_, '_>) -> Result<()>;

    /// Parameters as a YAML value, for reporting.
    fn to_yaml_value(&self) -> Result<serde_yaml_ng::Value>;

    /// Access to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Constructor stored in the registry.
pub type SubstructureFactory = fn(&CapacityHandle<'_>) -> Box<dyn CapacitySubstructure>;
