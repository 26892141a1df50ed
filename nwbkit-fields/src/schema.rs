//! Composed, immutable per-type schemas.
//!
//! A [`Schema`] is the flattened result of a type declaration merged with
//! every ancestor's fields. The composed field order is: inherited required
//! fields, new required fields, inherited optional fields, new optional
//! fields. Relative order inside each of those runs follows declaration
//! order, so no optional field ever precedes a required one.

use std::collections::{HashMap, HashSet};

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::error::DefinitionError;
use crate::types::{Alternative, FieldSpec, LinkSpec, TypeDecl};

/// The composed field list for one registered type.
#[derive(Debug)]
pub struct Schema {
    name: String,
    parent: Option<String>,
    ancestry: Vec<String>,
    help: Option<String>,
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    declared: Vec<String>,
    alternatives: Vec<Alternative>,
    links: Vec<LinkSpec>,
    resolved: OnceCell<Result<(), DefinitionError>>,
}

impl Schema {
    /// Compose `decl` on top of `base`.
    ///
    /// `base` must be the parent named by `decl`; the registry looks it up.
    pub fn compose(base: Option<&Schema>, decl: TypeDecl) -> Result<Self, DefinitionError> {
        let TypeDecl {
            name,
            parent,
            help,
            fields: new_fields,
            alternatives: new_alternatives,
            links: new_links,
        } = decl;

        if name.is_empty() {
            return Err(DefinitionError::EmptyTypeName);
        }

        let mut seen: HashSet<&str> = base
            .map(|b| b.fields.iter().map(|f| f.name.as_str()).collect())
            .unwrap_or_default();
        let mut first_optional: Option<&str> = None;
        for field in &new_fields {
            field.check().map_err(|e| match e {
                DefinitionError::EmptyFieldName { .. } => DefinitionError::EmptyFieldName {
                    type_name: name.clone(),
                },
                other => other,
            })?;
            if !seen.insert(field.name.as_str()) {
                return Err(DefinitionError::DuplicateFieldName {
                    type_name: name.clone(),
                    name: field.name.clone(),
                });
            }
            match (field.is_required(), first_optional) {
                (true, Some(optional)) => {
                    return Err(DefinitionError::OrderingViolation {
                        type_name: name.clone(),
                        required: field.name.clone(),
                        optional: optional.to_string(),
                    });
                }
                (false, None) => first_optional = Some(field.name.as_str()),
                _ => {}
            }
        }

        let declared: Vec<String> = new_fields.iter().map(|f| f.name.clone()).collect();
        let (new_required, new_optional): (Vec<FieldSpec>, Vec<FieldSpec>) =
            new_fields.into_iter().partition(FieldSpec::is_required);

        let base_fields: &[FieldSpec] = base.map(|b| b.fields.as_slice()).unwrap_or_default();
        let fields: Vec<FieldSpec> = base_fields
            .iter()
            .filter(|f| f.is_required())
            .cloned()
            .chain(new_required)
            .chain(base_fields.iter().filter(|f| !f.is_required()).cloned())
            .chain(new_optional)
            .collect();

        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect::<HashMap<_, _>>();

        let mut ancestry = base.map(|b| b.ancestry.clone()).unwrap_or_default();
        ancestry.push(name.clone());

        for alternative in &new_alternatives {
            check_alternative(&name, alternative, &fields, &index)?;
        }
        let mut alternatives = base.map(|b| b.alternatives.clone()).unwrap_or_default();
        alternatives.extend(new_alternatives);

        let mut links = base.map(|b| b.links.clone()).unwrap_or_default();
        links.extend(new_links);

        Ok(Self {
            name,
            parent,
            ancestry,
            help,
            fields,
            index,
            declared,
            alternatives,
            links,
            resolved: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Type chain from the root type down to this one.
    pub fn ancestry(&self) -> &[String] {
        &self.ancestry
    }

    /// Comma-separated ancestry, e.g. `NWBContainer,TimeSeries,ImageSeries`.
    pub fn ancestry_tag(&self) -> String {
        self.ancestry.join(",")
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// All fields in composed order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields this type declares itself, excluding inherited ones.
    pub fn declared_fields(&self) -> &[String] {
        &self.declared
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn links(&self) -> &[LinkSpec] {
        &self.links
    }

    /// True if some alternative governs `field`'s presence.
    pub fn is_governed(&self, field: &str) -> bool {
        self.alternatives.iter().any(|a| a.governs(field))
    }

    /// True if no optional field precedes a required one.
    pub fn is_well_ordered(&self) -> bool {
        self.fields
            .iter()
            .skip_while(|f| f.is_required())
            .all(|f| !f.is_required())
    }

    /// Check every forward type reference against `lookup`, once.
    ///
    /// The outcome is cached, so later calls return the first result without
    /// consulting `lookup` again.
    pub(crate) fn resolve_with(
        &self,
        lookup: impl Fn(&str) -> bool,
    ) -> Result<(), DefinitionError> {
        self.resolved
            .get_or_init(|| {
                for field in &self.fields {
                    for type_ref in field.types.iter().filter_map(|t| t.type_ref()) {
                        if !lookup(type_ref.name()) {
                            return Err(DefinitionError::UnresolvedType {
                                type_name: self.name.clone(),
                                field: field.name.clone(),
                                reference: type_ref.name().to_string(),
                            });
                        }
                    }
                }
                Ok(())
            })
            .clone()
    }

    /// True once forward references have been checked, successfully or not.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Serializable description of this schema.
    pub fn describe(&self) -> SchemaDescription {
        SchemaDescription {
            name: self.name.clone(),
            ancestry: self.ancestry_tag(),
            help: self.help.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| FieldDescription {
                    name: f.name.clone(),
                    types: f.type_names(),
                    doc: f.doc.clone(),
                    required: f.is_required(),
                    default: f.default_value().map(|d| d.materialize().to_json()),
                })
                .collect(),
            declared: self.declared.clone(),
            alternatives: self.alternatives.clone(),
            links: self.links.clone(),
        }
    }
}

fn check_alternative(
    type_name: &str,
    alternative: &Alternative,
    fields: &[FieldSpec],
    index: &HashMap<String, usize>,
) -> Result<(), DefinitionError> {
    let invalid = |reason: String| DefinitionError::InvalidAlternative {
        type_name: type_name.to_string(),
        alternative: alternative.name.clone(),
        reason,
    };

    if alternative.groups.len() < 2 {
        return Err(invalid("needs at least two groups".into()));
    }
    let mut seen = HashSet::new();
    for group in &alternative.groups {
        if group.is_empty() {
            return Err(invalid("contains an empty group".into()));
        }
        for name in group {
            let Some(&i) = index.get(name) else {
                return Err(invalid(format!("unknown field '{name}'")));
            };
            if !fields[i].is_required() {
                return Err(invalid(format!("field '{name}' is optional")));
            }
            if !seen.insert(name.as_str()) {
                return Err(invalid(format!("field '{name}' appears in two groups")));
            }
        }
    }
    Ok(())
}

/// Schema summary handed to tooling and to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescription {
    pub name: String,
    pub ancestry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub fields: Vec<FieldDescription>,
    pub declared: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Alternative>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescription {
    pub name: String,
    pub types: Vec<String>,
    pub doc: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DefaultValue, TypeSpec};

    fn root() -> Schema {
        Schema::compose(
            None,
            TypeDecl::new("Base")
                .field(FieldSpec::required("name", [TypeSpec::Text], "name"))
                .field(FieldSpec::optional(
                    "comments",
                    [TypeSpec::Text],
                    "comments",
                    DefaultValue::Unset,
                )),
        )
        .unwrap()
    }

    #[test]
    fn compose_keeps_required_before_optional() {
        let base = root();
        let child = Schema::compose(
            Some(&base),
            TypeDecl::new("Child")
                .extends("Base")
                .field(FieldSpec::required("distance", [TypeSpec::Float], "distance"))
                .field(FieldSpec::optional(
                    "gain",
                    [TypeSpec::Float],
                    "gain",
                    DefaultValue::Unspecified,
                )),
        )
        .unwrap();

        let names: Vec<_> = child.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "distance", "comments", "gain"]);
        assert!(child.is_well_ordered());
        assert_eq!(child.ancestry_tag(), "Base,Child");
        assert_eq!(child.declared_fields(), ["distance", "gain"]);
    }

    #[test]
    fn compose_rejects_optional_before_required_in_declaration() {
        let err = Schema::compose(
            None,
            TypeDecl::new("Bad")
                .field(FieldSpec::optional("a", [TypeSpec::Text], "a", DefaultValue::Unset))
                .field(FieldSpec::required("b", [TypeSpec::Text], "b")),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::OrderingViolation {
                type_name: "Bad".into(),
                required: "b".into(),
                optional: "a".into(),
            }
        );
    }

    #[test]
    fn compose_rejects_shadowing_inherited_field() {
        let base = root();
        let err = Schema::compose(
            Some(&base),
            TypeDecl::new("Child").field(FieldSpec::required("name", [TypeSpec::Text], "again")),
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateFieldName { name, .. } if name == "name"));
    }

    #[test]
    fn compose_rejects_empty_field_name_with_type_context() {
        let err = Schema::compose(
            None,
            TypeDecl::new("T").field(FieldSpec::required("", [TypeSpec::Text], "")),
        )
        .unwrap_err();
        assert_eq!(err, DefinitionError::EmptyFieldName { type_name: "T".into() });
    }

    #[test]
    fn alternative_must_name_required_fields() {
        let err = Schema::compose(
            None,
            TypeDecl::new("T")
                .field(FieldSpec::required("a", [TypeSpec::Text], "a"))
                .field(FieldSpec::optional("b", [TypeSpec::Text], "b", DefaultValue::Unset))
                .alternative(Alternative::new("source").group(["a"]).group(["b"])),
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidAlternative { reason, .. } if reason.contains("optional")));
    }

    #[test]
    fn alternative_over_inherited_field_is_allowed() {
        let base = root();
        let child = Schema::compose(
            Some(&base),
            TypeDecl::new("Child")
                .field(FieldSpec::required("path", [TypeSpec::Text], "path"))
                .alternative(Alternative::new("source").group(["name"]).group(["path"])),
        )
        .unwrap();
        assert!(child.is_governed("name"));
        assert!(child.is_governed("path"));
        assert!(!child.is_governed("comments"));
    }

    #[test]
    fn resolution_is_cached() {
        let schema = Schema::compose(
            None,
            TypeDecl::new("Node").field(FieldSpec::optional(
                "parent",
                [TypeSpec::container("Node")],
                "parent",
                DefaultValue::Unset,
            )),
        )
        .unwrap();
        assert!(!schema.is_resolved());
        assert!(schema.resolve_with(|name| name == "Node").is_ok());
        assert!(schema.is_resolved());
        // Cached: a lookup that would now fail is not consulted
        assert!(schema.resolve_with(|_| false).is_ok());
    }

    #[test]
    fn describe_reports_defaults() {
        let description = root().describe();
        assert_eq!(description.fields.len(), 2);
        assert!(description.fields[0].required);
        assert_eq!(description.fields[1].default, Some(serde_json::Value::Null));
    }
}
