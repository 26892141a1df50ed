//! Construction argument values.
//!
//! A [`Value`] is what callers hand to the validator for one field. It covers
//! the scalar kinds the schema language knows about, plain ordered sequences,
//! n-dimensional numeric arrays, and non-owning references to other container
//! instances.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use ndarray::ArrayD;
use serde_json::json;

/// A runtime instance that can be referenced from a field value.
///
/// Implemented by the container record in `nwbkit-entity`. The validator only
/// needs the type chain to check reference fields; everything else goes
/// through [`Instance::as_any`].
pub trait Instance: Any + Send + Sync + fmt::Debug {
    /// Registered type name of this instance
    fn type_name(&self) -> &str;

    /// Type chain from the root type to [`Instance::type_name`]
    fn ancestry(&self) -> &[String];

    /// The instance's `name` field, if it has one
    fn name(&self) -> Option<&str>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Non-owning reference to another instance.
///
/// The type chain and name are captured when the reference is taken, so type
/// checks and link path checks still work after the target is dropped.
#[derive(Clone)]
pub struct InstanceRef {
    type_name: String,
    ancestry: Vec<String>,
    name: Option<String>,
    target: Weak<dyn Instance>,
}

impl InstanceRef {
    /// Take a weak reference to `instance`.
    pub fn to<T: Instance>(instance: &Arc<T>) -> Self {
        let strong: Arc<dyn Instance> = instance.clone();
        Self::from_dyn(&strong)
    }

    pub fn from_dyn(instance: &Arc<dyn Instance>) -> Self {
        Self {
            type_name: instance.type_name().to_string(),
            ancestry: instance.ancestry().to_vec(),
            name: instance.name().map(str::to_string),
            target: Arc::downgrade(instance),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn ancestry(&self) -> &[String] {
        &self.ancestry
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True if the referenced instance is `type_name` or one of its subtypes.
    pub fn is_a(&self, type_name: &str) -> bool {
        self.ancestry.iter().any(|t| t == type_name)
    }

    /// The referenced instance, if something still owns it.
    pub fn upgrade(&self) -> Option<Arc<dyn Instance>> {
        self.target.upgrade()
    }

    /// Downcast the referenced instance to a concrete type.
    pub fn upgrade_as<T: Instance>(&self) -> Option<Arc<T>> {
        self.upgrade()
            .and_then(|instance| instance.into_any().downcast::<T>().ok())
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// True if both references point at the same instance.
    pub fn same_target(&self, other: &InstanceRef) -> bool {
        Weak::ptr_eq(&self.target, &other.target)
    }
}

impl PartialEq for InstanceRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_target(other)
    }
}

impl fmt::Debug for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRef")
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// One field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value. Supplying this is the same as leaving the field out.
    None,
    /// The "not specified" sentinel used as a default for measurement
    /// parameters. Never produced from caller data.
    Unspecified,
    Text(String),
    Int(i64),
    Float(f64),
    /// Plain ordered sequence
    List(Vec<Value>),
    /// Numeric n-dimensional array
    Array(ArrayD<f64>),
    /// Weak reference to another container
    Ref(InstanceRef),
}

impl Value {
    /// Short name of the value's kind, used in type mismatch messages.
    pub fn kind(&self) -> String {
        match self {
            Value::None => "none".into(),
            Value::Unspecified => "unspecified".into(),
            Value::Text(_) => "str".into(),
            Value::Int(_) => "int".into(),
            Value::Float(_) => "float".into(),
            Value::List(_) => "sequence".into(),
            Value::Array(_) => "array".into(),
            Value::Ref(r) => r.type_name().to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Value::Unspecified)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Text items of a sequence, or `None` if any item is not text.
    pub fn as_text_list(&self) -> Option<Vec<&str>> {
        self.as_list()?.iter().map(Value::as_str).collect()
    }

    /// True for numbers and for sequences whose leaves are all numbers.
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) | Value::Float(_) | Value::Array(_) => true,
            Value::List(items) => items.iter().all(Value::is_numeric),
            _ => false,
        }
    }

    /// Number of rows along the first axis, for sequence and array values.
    pub fn rows(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::Array(a) => a.shape().first().copied(),
            _ => None,
        }
    }

    /// JSON rendering for record snapshots and schema descriptions.
    ///
    /// Non-finite floats and the sentinel have no JSON number form and are
    /// written as tagged objects.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::None => serde_json::Value::Null,
            Value::Unspecified => json!({ "sentinel": "unspecified" }),
            Value::Text(s) => json!(s),
            Value::Int(i) => json!(i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| json!({ "float": f.to_string() })),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Array(a) => json!({
                "shape": a.shape(),
                "data": a.iter().map(|f| Value::Float(*f).to_json()).collect::<Vec<_>>(),
            }),
            Value::Ref(r) => json!({ "ref": { "type": r.type_name(), "name": r.name() } }),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<f64>> for Value {
    fn from(items: Vec<f64>) -> Self {
        Value::List(items.into_iter().map(Value::Float).collect())
    }
}

impl From<Vec<i64>> for Value {
    fn from(items: Vec<i64>) -> Self {
        Value::List(items.into_iter().map(Value::Int).collect())
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items.into_iter().map(Value::Text).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ArrayD<f64>> for Value {
    fn from(a: ArrayD<f64>) -> Self {
        Value::Array(a)
    }
}

impl From<InstanceRef> for Value {
    fn from(r: InstanceRef) -> Self {
        Value::Ref(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::None)
    }
}
