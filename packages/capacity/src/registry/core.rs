//! Substructure registry for mapping tag names to factories.

use std::collections::{HashMap, HashSet};

use super::substructure::{CapacityHandle, CapacitySubstructure, SubstructureFactory};
use crate::error::UnknownTagError;

/// Registry mapping substructure tag names to factories.
///
/// Registration happens up front; afterwards the registry is only read, so
/// one instance can be shared by concurrent decode passes.
pub struct SubstructureRegistry {
    factories: HashMap<String, SubstructureFactory>,
}

impl SubstructureRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory for a tag name, replacing any previous one.
    pub fn register(&mut self, tag_name: impl Into<String>, factory: SubstructureFactory) {
        self.factories.insert(tag_name.into(), factory);
    }

    /// Create an empty substructure for `tag_name`, owned by `owner`.
    ///
    /// # Errors
    /// Returns `UnknownTagError` when no factory is registered for the tag.
    pub fn create(
        &self,
        tag_name: &str,
        owner: &CapacityHandle<'_>,
    ) -> Result<Box<dyn CapacitySubstructure>, UnknownTagError> {
        self.factories
            .get(tag_name)
            .map(|factory| factory(owner))
            .ok_or_else(|| UnknownTagError {
                tag: tag_name.to_string(),
            })
    }

    /// Check if a factory is registered for a tag.
    #[must_use]
    pub fn has_factory(&self, tag_name: &str) -> bool {
        self.factories.contains_key(tag_name)
    }

    /// Return set of all registered tag names.
    #[must_use]
    pub fn registered_tags(&self) -> HashSet<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for SubstructureRegistry {
    fn default() -> Self {
        Self::new()
    }
}
