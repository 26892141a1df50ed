//! Validated construction of containers.

use std::sync::Arc;

use nwbkit_config::ConstructionConfig;
use nwbkit_fields::{
    registry as global, Args, DefinitionError, Registry, RegistryBuilder, ValidationEngine,
};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::container::Container;
use crate::error::{EntityError, Result};
use crate::rules;
use crate::series::Series;
use crate::timing::Timing;
use crate::types::{register_standard_types, standard_registry};

static CONFIG: OnceCell<ConstructionConfig> = OnceCell::new();

/// Builds containers from a registry and a construction policy.
#[derive(Debug, Clone)]
pub struct Constructor<'a> {
    registry: &'a Registry,
    config: ConstructionConfig,
}

impl<'a> Constructor<'a> {
    pub fn new(registry: &'a Registry, config: ConstructionConfig) -> Self {
        Self { registry, config }
    }

    /// Constructor using [`ConstructionConfig::default`].
    pub fn with_defaults(registry: &'a Registry) -> Self {
        Self::new(registry, ConstructionConfig::default())
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn config(&self) -> &ConstructionConfig {
        &self.config
    }

    /// Validate `args` against `type_name`'s schema, check the type's
    /// cross-field rules, and build the container.
    pub fn construct(&self, type_name: &str, args: impl Into<Args>) -> Result<Arc<Container>> {
        let schema = self.registry.schema(type_name)?;
        let fields = ValidationEngine::new(self.registry).validate(schema, args.into())?;

        let timing = if schema.contains("timestamps") {
            Timing::resolve(&fields, self.config.timing_conflict)?
        } else {
            Timing::Unknown
        };
        rules::check(schema, &fields, self.config.verify_link_paths)?;

        let container = Container::new(Arc::clone(schema), fields, timing);
        debug!(
            id = %container.id(),
            type_name,
            name = container.name().unwrap_or_default(),
            "constructed container"
        );
        Ok(Arc::new(container))
    }

    /// Construct a typed series from its argument builder.
    pub fn build<S: Series>(&self, args: S::Args) -> Result<S> {
        S::from_container(self.construct(S::TYPE_NAME, args)?)
    }
}

/// The process-wide registry, initialized with the standard types on first
/// use.
pub fn registry() -> Result<&'static Registry> {
    Ok(global::global_or_try_init(standard_registry)?)
}

/// Install the process-wide registry: the standard types plus whatever
/// `extend` registers. Fails if a registry is already installed.
pub fn initialize(
    extend: impl FnOnce(&mut RegistryBuilder) -> std::result::Result<(), DefinitionError>,
) -> Result<&'static Registry> {
    if global::global().is_some() {
        return Err(EntityError::AlreadyInitialized);
    }
    let mut builder = RegistryBuilder::new();
    register_standard_types(&mut builder)?;
    extend(&mut builder)?;
    Ok(global::install(builder.build())?)
}

/// Construction policy for [`construct`], loaded once from the environment.
pub fn config() -> Result<&'static ConstructionConfig> {
    Ok(CONFIG.get_or_try_init(ConstructionConfig::load)?)
}

/// Construct a container against the process-wide registry.
pub fn construct(type_name: &str, args: impl Into<Args>) -> Result<Arc<Container>> {
    Constructor::new(registry()?, config()?.clone()).construct(type_name, args)
}
