//! Type registry.
//!
//! Types are registered on a [`RegistryBuilder`] during startup and sealed into
//! an immutable [`Registry`]. One registry may be installed as the
//! process-wide registry; after that it is read-only and shared freely across
//! threads.

use std::sync::Arc;

use indexmap::IndexMap;
use nwbkit_common::Pretty;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::args::{Args, FieldMap};
use crate::error::{DefinitionError, FieldsError, Result, ValidationError};
use crate::schema::Schema;
use crate::types::{FieldSpec, TypeDecl};
use crate::validation::ValidationEngine;

static GLOBAL: OnceCell<Registry> = OnceCell::new();

/// Mutable registration phase of a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type declaration, composing it with its parent's schema.
    ///
    /// The parent must already be registered. Re-registering a name fails.
    pub fn register(&mut self, decl: TypeDecl) -> std::result::Result<Arc<Schema>, DefinitionError> {
        if self.schemas.contains_key(&decl.name) {
            return Err(DefinitionError::DuplicateType { name: decl.name });
        }
        let base = match &decl.parent {
            Some(parent) => Some(self.schemas.get(parent).cloned().ok_or_else(|| {
                DefinitionError::UnknownParent {
                    name: decl.name.clone(),
                    parent: parent.clone(),
                }
            })?),
            None => None,
        };

        let schema = Arc::new(Schema::compose(base.as_deref(), decl)?);
        debug!(
            type_name = schema.name(),
            ancestry = %schema.ancestry_tag(),
            fields = schema.fields().len(),
            "registered type"
        );
        trace!("schema: {}", Pretty(schema.describe()));

        self.schemas
            .insert(schema.name().to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Register a type from its name, optional parent, and new fields.
    pub fn register_type(
        &mut self,
        name: &str,
        parent: Option<&str>,
        fields: Vec<FieldSpec>,
    ) -> std::result::Result<Arc<Schema>, DefinitionError> {
        let mut decl = TypeDecl::new(name).fields(fields);
        decl.parent = parent.map(str::to_string);
        self.register(decl)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Seal the registry. No types can be added afterwards.
    pub fn build(self) -> Registry {
        debug!(types = self.schemas.len(), "type registry sealed");
        Registry {
            schemas: self.schemas,
        }
    }
}

/// Immutable set of composed schemas, keyed by type name.
#[derive(Debug)]
pub struct Registry {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl Registry {
    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Look up a schema, failing with [`ValidationError::UnknownType`].
    pub fn schema(&self, name: &str) -> std::result::Result<&Arc<Schema>, ValidationError> {
        self.get(name).ok_or_else(|| ValidationError::UnknownType {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered type names in registration order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// True if `type_name` is `ancestor` or derives from it.
    pub fn is_a(&self, type_name: &str, ancestor: &str) -> bool {
        self.get(type_name)
            .is_some_and(|s| s.ancestry().iter().any(|t| t == ancestor))
    }

    /// Validate construction arguments for `type_name`.
    pub fn validate(&self, type_name: &str, args: Args) -> Result<FieldMap> {
        ValidationEngine::new(self).validate_type(type_name, args)
    }
}

/// Install `registry` as the process-wide registry.
pub fn install(registry: Registry) -> Result<&'static Registry> {
    GLOBAL
        .set(registry)
        .map_err(|_| FieldsError::AlreadyInitialized)?;
    GLOBAL.get().ok_or(FieldsError::AlreadyInitialized)
}

/// The process-wide registry, if one has been installed.
pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}

/// The process-wide registry, installing the one built by `init` if none is
/// installed yet.
pub fn global_or_try_init<E>(
    init: impl FnOnce() -> std::result::Result<Registry, E>,
) -> std::result::Result<&'static Registry, E> {
    GLOBAL.get_or_try_init(init)
}
