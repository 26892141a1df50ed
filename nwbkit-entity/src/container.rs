//! The runtime container record.

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use nwbkit_fields::{FieldMap, Instance, InstanceRef, Schema, Value};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::debug;
use ulid::Ulid;

use crate::error::{EntityError, Result};
use crate::timing::Timing;

/// A validated container instance.
///
/// Field values are fixed at construction. The only later change allowed is
/// one [`Container::attach_to_parent`] call on a container constructed
/// without a parent.
#[derive(Debug)]
pub struct Container {
    id: Ulid,
    schema: Arc<Schema>,
    fields: FieldMap,
    timing: Timing,
    attached: OnceCell<InstanceRef>,
}

impl Container {
    pub(crate) fn new(schema: Arc<Schema>, fields: FieldMap, timing: Timing) -> Self {
        Self {
            id: Ulid::new(),
            schema,
            fields,
            timing,
            attached: OnceCell::new(),
        }
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Comma-joined type chain, root first.
    pub fn ancestry_tag(&self) -> String {
        self.schema.ancestry_tag()
    }

    pub fn help(&self) -> Option<&str> {
        self.schema.help()
    }

    /// True if this container's type is `type_name` or derives from it.
    pub fn is_a(&self, type_name: &str) -> bool {
        self.schema.ancestry().iter().any(|t| t == type_name)
    }

    /// Validated fields in schema order.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get_str("name")
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// The parent, whether given at construction or attached later.
    pub fn parent(&self) -> Option<&InstanceRef> {
        self.fields.get_ref("parent").or_else(|| self.attached.get())
    }

    /// Set the parent of a container constructed without one.
    pub fn attach_to_parent<P: Instance>(&self, parent: &Arc<P>) -> Result<()> {
        let reference = InstanceRef::to(parent);
        let Some(spec) = self.schema.field("parent") else {
            return Err(EntityError::WrongType {
                expected: "container with a parent field".into(),
                actual: self.type_name().to_string(),
            });
        };
        let value = Value::Ref(reference.clone());
        if !spec.types.iter().any(|t| t.accepts(&value)) {
            return Err(EntityError::WrongType {
                expected: spec.type_names().join(" or "),
                actual: reference.type_name().to_string(),
            });
        }

        if self.fields.is_set("parent") || self.attached.set(reference).is_err() {
            return Err(EntityError::AlreadyAttached {
                type_name: self.type_name().to_string(),
                name: self.name().unwrap_or_default().to_string(),
            });
        }
        debug!(
            id = %self.id,
            type_name = self.type_name(),
            parent = parent.name().unwrap_or_default(),
            "attached container to parent"
        );
        Ok(())
    }

    /// `(link field, path)` pairs for every link this container's type declares.
    pub fn link_paths(&self) -> Vec<(&str, &str)> {
        self.schema
            .links()
            .iter()
            .filter_map(|link| {
                self.fields
                    .get_str(&link.path_field)
                    .map(|path| (link.field.as_str(), path))
            })
            .collect()
    }

    /// Serializable snapshot for the persistence layer.
    pub fn to_record(&self) -> Record {
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| *name != "parent")
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        Record {
            id: self.id,
            type_name: self.type_name().to_string(),
            ancestry: self.ancestry_tag(),
            fields,
            parent: self.parent().and_then(|p| p.name()).map(str::to_string),
            links: self
                .link_paths()
                .into_iter()
                .map(|(field, path)| (field.to_string(), path.to_string()))
                .collect(),
        }
    }
}

impl Instance for Container {
    fn type_name(&self) -> &str {
        self.schema.name()
    }

    fn ancestry(&self) -> &[String] {
        self.schema.ancestry()
    }

    fn name(&self) -> Option<&str> {
        self.fields.get_str("name")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Flat, serializable view of a container.
///
/// References are written as the referenced container's name; link fields
/// also appear under `links` with their path strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: Ulid,
    #[serde(rename = "type")]
    pub type_name: String,
    pub ancestry: String,
    pub fields: IndexMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub links: IndexMap<String, String>,
}
