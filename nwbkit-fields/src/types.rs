//! Field and type declaration types.
//!
//! A [`FieldSpec`] describes one named construction parameter. A [`TypeDecl`]
//! gathers the field specs, exclusive alternatives, and link pairs a type adds
//! on top of its parent; the registry composes it into a [`crate::Schema`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::value::Value;

/// Lazily resolved reference to a registered type, by name.
///
/// Declaring a field typed by a type that is not registered yet (including
/// the type being declared) is allowed; the name is looked up on the first
/// validation against the sealed registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// One acceptable representation for a field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeSpec {
    Text,
    Int,
    /// Floating point; integers are accepted and widened
    Float,
    /// Any ordered sequence, including numeric arrays
    Sequence,
    /// Numeric array; plain sequences of numbers are accepted too
    Array,
    /// Instance of the named type or one of its subtypes
    Container(TypeRef),
}

impl TypeSpec {
    pub fn container(name: impl Into<String>) -> Self {
        TypeSpec::Container(TypeRef::new(name))
    }

    /// Check a value against this representation.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeSpec::Text, Value::Text(_)) => true,
            (TypeSpec::Int, Value::Int(_)) => true,
            (TypeSpec::Float, Value::Float(_) | Value::Int(_)) => true,
            (TypeSpec::Sequence, Value::List(_) | Value::Array(_)) => true,
            (TypeSpec::Array, Value::Array(_)) => true,
            (TypeSpec::Array, Value::List(_)) => value.is_numeric(),
            (TypeSpec::Container(r), Value::Ref(instance)) => instance.is_a(r.name()),
            _ => false,
        }
    }

    /// The type reference, for container specs.
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            TypeSpec::Container(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Text => f.write_str("str"),
            TypeSpec::Int => f.write_str("int"),
            TypeSpec::Float => f.write_str("float"),
            TypeSpec::Sequence => f.write_str("sequence"),
            TypeSpec::Array => f.write_str("array"),
            TypeSpec::Container(r) => f.write_str(r.name()),
        }
    }
}

/// What an optional field holds when the caller leaves it out.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// [`Value::None`]
    Unset,
    /// [`Value::Unspecified`], the sentinel for measurement parameters
    Unspecified,
    Value(Value),
}

impl DefaultValue {
    pub fn materialize(&self) -> Value {
        match self {
            DefaultValue::Unset => Value::None,
            DefaultValue::Unspecified => Value::Unspecified,
            DefaultValue::Value(v) => v.clone(),
        }
    }
}

/// Whether a field must be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional(DefaultValue),
}

/// A field definition: the complete contract for a single named argument.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub types: Vec<TypeSpec>,
    pub doc: String,
    pub presence: Presence,
}

impl FieldSpec {
    /// Declare a field, checking that it has a name and at least one type.
    /// A `default` of `None` makes the field required.
    pub fn register(
        name: impl Into<String>,
        types: impl IntoIterator<Item = TypeSpec>,
        doc: impl Into<String>,
        default: Option<DefaultValue>,
    ) -> Result<Self, DefinitionError> {
        let spec = Self {
            name: name.into(),
            types: types.into_iter().collect(),
            doc: doc.into(),
            presence: default.map_or(Presence::Required, Presence::Optional),
        };
        spec.check()?;
        Ok(spec)
    }

    /// Unchecked constructor for a required field. The schema composer
    /// checks it when the owning type is registered.
    pub fn required(
        name: impl Into<String>,
        types: impl IntoIterator<Item = TypeSpec>,
        doc: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            types: types.into_iter().collect(),
            doc: doc.into(),
            presence: Presence::Required,
        }
    }

    /// Unchecked constructor for an optional field.
    pub fn optional(
        name: impl Into<String>,
        types: impl IntoIterator<Item = TypeSpec>,
        doc: impl Into<String>,
        default: DefaultValue,
    ) -> Self {
        Self {
            name: name.into(),
            types: types.into_iter().collect(),
            doc: doc.into(),
            presence: Presence::Optional(default),
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        match &self.presence {
            Presence::Required => None,
            Presence::Optional(d) => Some(d),
        }
    }

    /// Names of the types this field accepts, in declaration order.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(ToString::to_string).collect()
    }

    pub(crate) fn check(&self) -> Result<(), DefinitionError> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyFieldName {
                type_name: String::new(),
            });
        }
        if self.types.is_empty() {
            return Err(DefinitionError::EmptyTypeSet {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Exclusive choice between groups of fields.
///
/// Exactly one group must be supplied in full. Fields named by a group are
/// declared required; the alternative takes over their presence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternative {
    pub name: String,
    pub groups: Vec<Vec<String>>,
}

impl Alternative {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn group<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.push(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn governs(&self, field: &str) -> bool {
        self.groups.iter().flatten().any(|f| f == field)
    }
}

/// A link: a reference field paired with a path field naming the same target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSpec {
    pub field: String,
    pub path_field: String,
    pub target: TypeRef,
}

/// Declaration of a type, before composition with its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub parent: Option<String>,
    pub help: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub alternatives: Vec<Alternative>,
    pub links: Vec<LinkSpec>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            help: None,
            fields: Vec::new(),
            alternatives: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(specs);
        self
    }

    /// Declare a link to an instance of `target`. Adds a required reference
    /// field `field` and a required text field `<field>_path`.
    pub fn link(
        mut self,
        field: impl Into<String>,
        target: impl Into<String>,
        doc: impl Into<String>,
        path_doc: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let target = TypeRef::new(target);
        let path_field = format!("{field}_path");
        self.fields.push(FieldSpec::required(
            field.clone(),
            [TypeSpec::Container(target.clone())],
            doc,
        ));
        self.fields
            .push(FieldSpec::required(path_field.clone(), [TypeSpec::Text], path_doc));
        self.links.push(LinkSpec {
            field,
            path_field,
            target,
        });
        self
    }

    pub fn alternative(mut self, alternative: Alternative) -> Self {
        self.alternatives.push(alternative);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use ndarray::{ArrayD, IxDyn};
    use rstest::rstest;

    #[rstest]
    #[case(TypeSpec::Text, Value::from("lumens"), true)]
    #[case(TypeSpec::Text, Value::from(1.0), false)]
    #[case(TypeSpec::Float, Value::from(1.5), true)]
    #[case(TypeSpec::Float, Value::from(3i64), true)]
    #[case(TypeSpec::Int, Value::from(1.5), false)]
    #[case(TypeSpec::Sequence, Value::from(vec!["a.tiff"]), true)]
    #[case(TypeSpec::Sequence, Value::from(ArrayD::<f64>::zeros(IxDyn(&[3]))), true)]
    #[case(TypeSpec::Array, Value::from(vec![1.0, 2.0]), true)]
    #[case(TypeSpec::Array, Value::from(vec!["a"]), false)]
    #[case(TypeSpec::Sequence, Value::from("abc"), false)]
    #[case(TypeSpec::container("TimeSeries"), Value::from(vec![1.0]), false)]
    fn test_type_spec_accepts(#[case] spec: TypeSpec, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(spec.accepts(&value), expected, "{spec} vs {}", value.kind());
    }

    #[test]
    fn test_register_requires_types() {
        let err = FieldSpec::register("data", Vec::<TypeSpec>::new(), "data", None).unwrap_err();
        assert_eq!(err, DefinitionError::EmptyTypeSet { name: "data".into() });
    }

    #[test]
    fn test_register_default_controls_presence() {
        let required = FieldSpec::register("unit", [TypeSpec::Text], "unit", None).unwrap();
        assert!(required.is_required());
        let optional = FieldSpec::register(
            "rate",
            [TypeSpec::Float],
            "rate",
            Some(DefaultValue::Unset),
        )
        .unwrap();
        assert_eq!(optional.default_value(), Some(&DefaultValue::Unset));
    }

    #[test]
    fn test_link_adds_reference_and_path_fields() {
        let decl = TypeDecl::new("IndexSeries").link(
            "index_timeseries",
            "ImageSeries",
            "indexed series",
            "path to indexed series",
        );
        let names: Vec<_> = decl.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["index_timeseries", "index_timeseries_path"]);
        assert_eq!(decl.links[0].path_field, "index_timeseries_path");
        assert_eq!(decl.fields[0].type_names(), ["ImageSeries"]);
    }

    #[test]
    fn test_type_spec_serializes_kebab_case() {
        let json = serde_json::to_value(TypeSpec::container("TimeSeries")).unwrap();
        assert_eq!(json, serde_json::json!({"container": "TimeSeries"}));
        let json = serde_json::to_value(TypeSpec::Sequence).unwrap();
        assert_eq!(json, serde_json::json!("sequence"));
    }
}
