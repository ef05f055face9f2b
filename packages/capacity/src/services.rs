//! Collaborators consumed while decoding: seed access, distribution and
//! timeseries builders, and the context bundling them for one decode pass.

use std::fmt;

use roxmltree::Node;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::DEFAULT_MASTER_SEED;
use crate::error::Result;
use crate::registry::{builtin_registry, SubstructureRegistry};
use crate::xml::{get_tag_name, RawElement};

/// Shared simulation services reachable from decoders.
///
/// Logging goes through the global `tracing` subscriber, so the only
/// service exposed here is seed access.
pub trait ServiceContext: Send + Sync {
    /// Seed for the random stream identified by `requester` and `purpose`.
    fn random_seed(&self, requester: &str, purpose: &str) -> u64;
}

/// Deterministic seed repository.
///
/// Seeds are the first eight bytes of `SHA-256(master || requester || 0 || purpose)`,
/// so repeated runs with the same master seed hand out the same streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRepo {
    master: u64,
}

impl SeedRepo {
    /// Create a repository for the given master seed.
    #[must_use]
    pub fn new(master: u64) -> Self {
        Self { master }
    }

    /// The master seed.
    #[must_use]
    pub fn master(&self) -> u64 {
        self.master
    }
}

impl Default for SeedRepo {
    fn default() -> Self {
        Self::new(DEFAULT_MASTER_SEED)
    }
}

impl ServiceContext for SeedRepo {
    fn random_seed(&self, requester: &str, purpose: &str) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.master.to_be_bytes());
        hasher.update(requester.as_bytes());
        hasher.update([0u8]);
        hasher.update(purpose.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(bytes)
    }
}

/// Probability distribution backing a population or individual base capacity.
///
/// Sampling is done elsewhere; the decoder only records what was configured
/// and which seed the stream gets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    /// Value of the `distribution` attribute, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Seed assigned to this distribution's random stream.
    pub seed: u64,
    /// The configuring element.
    pub element: RawElement,
}

/// Timeseries model backing a timeseries base capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeseriesModel {
    /// The configuring element.
    pub element: RawElement,
}

/// Builds a [`Distribution`] from its configuring element.
pub trait DistributionBuilder: Send + Sync {
    /// Build the distribution owned by capacity `owner`.
    fn build(
        &self,
        services: &dyn ServiceContext,
        owner: &str,
        node: Node<'_, '_>,
    ) -> Result<Distribution>;
}

/// Builds a [`TimeseriesModel`] from its configuring element.
pub trait TimeseriesBuilder: Send + Sync {
    /// Build the timeseries model.
    fn build(&self, node: Node<'_, '_>) -> Result<TimeseriesModel>;
}

/// Distribution builder that records the element and assigns a seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedDistributionBuilder;

impl DistributionBuilder for RecordedDistributionBuilder {
    fn build(
        &self,
        services: &dyn ServiceContext,
        owner: &str,
        node: Node<'_, '_>,
    ) -> Result<Distribution> {
        Ok(Distribution {
            kind: node.attribute("distribution").map(String::from),
            seed: services.random_seed(owner, get_tag_name(node)),
            element: RawElement::capture(node),
        })
    }
}

/// Timeseries builder that records the element.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordedTimeseriesBuilder;

impl TimeseriesBuilder for RecordedTimeseriesBuilder {
    fn build(&self, node: Node<'_, '_>) -> Result<TimeseriesModel> {
        Ok(TimeseriesModel {
            element: RawElement::capture(node),
        })
    }
}

static RECORDED_DISTRIBUTIONS: RecordedDistributionBuilder = RecordedDistributionBuilder;
static RECORDED_TIMESERIES: RecordedTimeseriesBuilder = RecordedTimeseriesBuilder;

/// Everything a decode pass needs besides the element tree.
///
/// Defaults to the recording builders and the built-in substructure
/// registry; swap any of them with the `with_*` methods.
#[derive(Clone, Copy)]
pub struct DecodeContext<'s> {
    services: &'s dyn ServiceContext,
    distributions: &'s dyn DistributionBuilder,
    timeseries: &'s dyn TimeseriesBuilder,
    registry: &'s SubstructureRegistry,
}

impl<'s> DecodeContext<'s> {
    /// Create a context around the given services.
    #[must_use]
    pub fn new(services: &'s dyn ServiceContext) -> Self {
        Self {
            services,
            distributions: &RECORDED_DISTRIBUTIONS,
            timeseries: &RECORDED_TIMESERIES,
            registry: builtin_registry(),
        }
    }

    /// Use a different substructure registry.
    #[must_use]
    pub fn with_registry(mut self, registry: &'s SubstructureRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use a different distribution builder.
    #[must_use]
    pub fn with_distribution_builder(mut self, builder: &'s dyn DistributionBuilder) -> Self {
        self.distributions = builder;
        self
    }

    /// Use a different timeseries builder.
    #[must_use]
    pub fn with_timeseries_builder(mut self, builder: &'s dyn TimeseriesBuilder) -> Self {
        self.timeseries = builder;
        self
    }

    #[must_use]
    pub fn services(&self) -> &'s dyn ServiceContext {
        self.services
    }

    #[must_use]
    pub fn distributions(&self) -> &'s dyn DistributionBuilder {
        self.distributions
    }

    #[must_use]
    pub fn timeseries(&self) -> &'s dyn TimeseriesBuilder {
        self.timeseries
    }

    #[must_use]
    pub fn registry(&self) -> &'s SubstructureRegistry {
        self.registry
    }
}

impl fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("registered_tags", &self.registry.registered_tags())
            .finish_non_exhaustive()
    }
}
