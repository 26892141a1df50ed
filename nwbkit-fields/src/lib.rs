//! Field schema registry and validation engine
//!
//! `nwbkit-fields` is a schema-only crate. It knows how to declare fields,
//! compose per-type schemas across a single-inheritance chain, and validate
//! construction arguments against them. It knows nothing about time series or
//! images; `nwbkit-entity` registers those types on top of it.
//!
//! # Architecture
//!
//! - **Declarations**: [`FieldSpec`] and [`TypeDecl`] describe what a type adds
//!   to its parent
//! - **Composition**: [`Schema::compose`] flattens a declaration with its
//!   parent into an ordered field list, required fields first
//! - **Two-phase registry**: [`RegistryBuilder`] accepts registrations, then
//!   seals into an immutable [`Registry`]
//! - **Validation**: [`ValidationEngine`] maps [`Args`] to a [`FieldMap`],
//!   resolving forward type references on first use
//!
//! ```
//! use nwbkit_fields::{Args, DefaultValue, FieldSpec, RegistryBuilder, TypeDecl, TypeSpec, Value};
//!
//! let mut builder = RegistryBuilder::new();
//! builder.register(
//!     TypeDecl::new("Probe")
//!         .field(FieldSpec::required("name", [TypeSpec::Text], "probe name"))
//!         .field(FieldSpec::optional("gain", [TypeSpec::Float], "gain", DefaultValue::Unspecified)),
//! )?;
//! let registry = builder.build();
//!
//! let fields = registry.validate("Probe", Args::new().with("name", "p0"))?;
//! assert_eq!(fields.get("gain"), Some(&Value::Unspecified));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod args;
pub mod error;
pub mod registry;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use args::{Args, FieldMap};
pub use error::{DefinitionError, FieldsError, Result, ValidationError};
pub use registry::{Registry, RegistryBuilder};
pub use schema::{FieldDescription, Schema, SchemaDescription};
pub use types::{
    Alternative, DefaultValue, FieldSpec, LinkSpec, Presence, TypeDecl, TypeRef, TypeSpec,
};
pub use validation::ValidationEngine;
pub use value::{Instance, InstanceRef, Value};
