//! Argument validation against a composed schema.

use tracing::trace;

use crate::args::{Args, FieldMap};
use crate::error::{FieldsError, ValidationError};
use crate::registry::Registry;
use crate::schema::Schema;
use crate::types::Presence;

/// Validates construction arguments against the schemas of one registry.
///
/// Forward type references in a schema are resolved against the registry on
/// the first validation of that schema.
pub struct ValidationEngine<'a> {
    registry: &'a Registry,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Validate `args` against the schema registered as `type_name`.
    pub fn validate_type(&self, type_name: &str, args: Args) -> Result<FieldMap, FieldsError> {
        let schema = self.registry.schema(type_name)?;
        self.validate(schema, args)
    }

    /// Validate `args` against `schema`.
    ///
    /// Checks run in order: unknown names, forward reference resolution,
    /// exclusive alternatives, required presence, and value types. The first
    /// failure is returned.
    pub fn validate(&self, schema: &Schema, mut args: Args) -> Result<FieldMap, FieldsError> {
        if let Some(unknown) = args.names().find(|name| !schema.contains(name)) {
            return Err(ValidationError::UnknownField {
                type_name: schema.name().to_string(),
                name: unknown.to_string(),
            }
            .into());
        }

        schema.resolve_with(|name| self.registry.contains(name))?;

        check_alternatives(schema, &args)?;

        let mut out = FieldMap::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let value = match (args.take(&field.name), &field.presence) {
                (Some(value), _) => {
                    if !field.types.iter().any(|t| t.accepts(&value)) {
                        return Err(ValidationError::TypeMismatch {
                            name: field.name.clone(),
                            expected: field.type_names(),
                            actual: value.kind(),
                        }
                        .into());
                    }
                    value
                }
                (None, Presence::Optional(default)) => default.materialize(),
                (None, Presence::Required) if schema.is_governed(&field.name) => {
                    crate::Value::None
                }
                (None, Presence::Required) => {
                    return Err(ValidationError::MissingRequiredField {
                        type_name: schema.name().to_string(),
                        name: field.name.clone(),
                    }
                    .into());
                }
            };
            out.insert(field.name.clone(), value);
        }

        trace!(type_name = schema.name(), fields = out.len(), "validated arguments");
        Ok(out)
    }
}

fn check_alternatives(schema: &Schema, args: &Args) -> Result<(), ValidationError> {
    for alternative in schema.alternatives() {
        let mut complete = Vec::new();
        for group in &alternative.groups {
            let missing: Vec<String> = group
                .iter()
                .filter(|f| !args.is_supplied(f))
                .cloned()
                .collect();
            if missing.is_empty() {
                complete.push(group.clone());
            } else if missing.len() < group.len() {
                return Err(ValidationError::IncompleteAlternative {
                    type_name: schema.name().to_string(),
                    alternative: alternative.name.clone(),
                    missing,
                });
            }
        }
        match complete.len() {
            0 => {
                return Err(ValidationError::MissingAlternative {
                    type_name: schema.name().to_string(),
                    alternative: alternative.name.clone(),
                    options: alternative.groups.clone(),
                })
            }
            1 => {}
            _ => {
                return Err(ValidationError::ConflictingAlternatives {
                    type_name: schema.name().to_string(),
                    alternative: alternative.name.clone(),
                    supplied: complete,
                })
            }
        }
    }
    Ok(())
}
