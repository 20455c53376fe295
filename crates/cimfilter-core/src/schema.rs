use crate::{
    types::{KeyValue, ObjectPath},
    value::Value,
};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// PathError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PathError {
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("'{property}' is not a key property of {class}")]
    NotAKey { class: String, property: String },

    #[error("key property '{property}' of {class} has no value")]
    MissingKey { class: String, property: String },

    #[error("key property '{property}' cannot hold a {found} value")]
    InvalidKeyValue { property: String, found: String },

    #[error("key property '{property}' of {class} is bound more than once")]
    DuplicateKey { class: String, property: String },

    #[error("host '{0}' requires a namespace")]
    HostWithoutNamespace(String),
}

///
/// NamespaceId
///

#[derive(Clone, Debug, Deserialize, Display, Eq, From, Hash, PartialEq, Serialize)]
pub struct NamespaceId(String);

impl NamespaceId {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self(namespace.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NamespaceId {
    fn from(namespace: &str) -> Self {
        Self::new(namespace)
    }
}

///
/// ClassMetadata
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClassMetadata {
    pub name: String,
    pub namespace: NamespaceId,
    pub key_properties: Vec<String>,
}

impl ClassMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<NamespaceId>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            key_properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, property: impl Into<String>) -> Self {
        self.key_properties.push(property.into());
        self
    }

    /// Declared spelling of a key property, if `name` is one.
    #[must_use]
    pub fn key_property(&self, name: &str) -> Option<&str> {
        self.key_properties
            .iter()
            .find(|key| key.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

///
/// SchemaContext
///
/// Ambient namespace and class metadata, consulted only when building
/// object-path values. Comparison and quantifier evaluation never needs it.
///

pub trait SchemaContext {
    fn default_namespace(&self) -> NamespaceId;

    fn resolve_class(&self, name: &str) -> Option<ClassMetadata>;
}

///
/// StaticSchema
///

#[derive(Clone, Debug)]
pub struct StaticSchema {
    default_namespace: NamespaceId,
    classes: Vec<ClassMetadata>,
}

impl StaticSchema {
    #[must_use]
    pub fn new(default_namespace: impl Into<NamespaceId>) -> Self {
        Self {
            default_namespace: default_namespace.into(),
            classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: ClassMetadata) -> Self {
        self.classes.push(class);
        self
    }
}

impl SchemaContext for StaticSchema {
    fn default_namespace(&self) -> NamespaceId {
        self.default_namespace.clone()
    }

    fn resolve_class(&self, name: &str) -> Option<ClassMetadata> {
        self.classes
            .iter()
            .find(|class| class.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

///
/// PathBuilder
///
/// Builds an instance path from a class name and key values, filling in the
/// ambient namespace and the declared spelling of class and key names.
///

pub struct PathBuilder<'a, C: SchemaContext + ?Sized> {
    ctx: &'a C,
    class_name: String,
    host: Option<String>,
    namespace: Option<NamespaceId>,
    keys: Vec<(String, Value)>,
}

impl<'a, C: SchemaContext + ?Sized> PathBuilder<'a, C> {
    #[must_use]
    pub fn new(ctx: &'a C, class_name: impl Into<String>) -> Self {
        Self {
            ctx,
            class_name: class_name.into(),
            host: None,
            namespace: None,
            keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<NamespaceId>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keys.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<ObjectPath, PathError> {
        let class = self
            .ctx
            .resolve_class(&self.class_name)
            .ok_or_else(|| PathError::UnknownClass(self.class_name.clone()))?;

        let namespace = self
            .namespace
            .unwrap_or_else(|| self.ctx.default_namespace());
        let mut path = ObjectPath::new(class.name.clone());
        path = match self.host {
            Some(host) => path
                .with_location(host.clone(), namespace.as_str())
                .map_err(|_| PathError::HostWithoutNamespace(host))?,
            None => path.with_namespace(namespace.as_str()),
        };

        for (name, value) in &self.keys {
            let declared = class
                .key_property(name)
                .ok_or_else(|| PathError::NotAKey {
                    class: class.name.clone(),
                    property: name.clone(),
                })?;
            if path.key(declared).is_some() {
                return Err(PathError::DuplicateKey {
                    class: class.name.clone(),
                    property: declared.to_string(),
                });
            }
            path = path.with_key(declared, key_value(declared, value)?);
        }

        if let Some(missing) = class
            .key_properties
            .iter()
            .find(|key| path.key(key).is_none())
        {
            return Err(PathError::MissingKey {
                class: class.name.clone(),
                property: missing.clone(),
            });
        }

        Ok(path)
    }

    /// Build the path as a `Reference` value.
    pub fn build_value(self) -> Result<Value, PathError> {
        self.build().map(Value::Reference)
    }
}

fn key_value(property: &str, value: &Value) -> Result<KeyValue, PathError> {
    match value {
        Value::Integer(v) => Ok(KeyValue::Integer(i128::from(*v))),
        Value::Boolean(v) => Ok(KeyValue::Boolean(*v)),
        Value::String(v) => Ok(KeyValue::String(v.clone())),
        Value::DateTime(v) => Ok(KeyValue::String(v.to_string())),
        Value::Reference(v) => Ok(KeyValue::Reference(Box::new(v.clone()))),
        _ => Err(PathError::InvalidKeyValue {
            property: property.to_string(),
            found: value.type_name(),
        }),
    }
}

/// Fill in the ambient namespace on a path that has none, and use the
/// declared spelling of the class name when the class is known.
#[must_use]
pub fn qualify<C: SchemaContext + ?Sized>(ctx: &C, mut path: ObjectPath) -> ObjectPath {
    if path.namespace().is_none() {
        path.set_namespace(ctx.default_namespace().as_str());
    }
    if let Some(class) = ctx.resolve_class(path.class_name()) {
        path.set_class_name(class.name);
    }

    path
}

///
/// TESTS
///
