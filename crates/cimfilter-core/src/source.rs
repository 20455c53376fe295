use crate::value::Value;
use std::collections::BTreeMap;

///
/// PropertySource
///
/// The object under test, as seen by the evaluator.
/// Lookups must be side-effect free; the evaluator may call them any number
/// of times during one evaluation.
///

pub trait PropertySource {
    /// Current value of a named property, or `None` when absent or unknown.
    fn get_value(&self, name: &str) -> Option<Value>;

    /// Embedded object held by a property, used to walk `a.b.c` chains.
    /// `index` selects one element of an embedded-object array.
    fn embedded(&self, _name: &str, _index: Option<usize>) -> Option<&dyn PropertySource> {
        None
    }
}

impl PropertySource for BTreeMap<String, Value> {
    fn get_value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

///
/// Property
///

#[derive(Clone, Debug)]
enum Property {
    Value(Value),
    Embedded(Instance),
    EmbeddedArray(Vec<Instance>),
}

///
/// Instance
///
/// In-memory object: a class name plus named properties, some of which may
/// hold embedded instances. Property names match ASCII case-insensitively.
/// Embedded properties are only reachable through chained references and
/// have no plain value of their own.
///

#[derive(Clone, Debug, Default)]
pub struct Instance {
    class_name: String,
    properties: Vec<(String, Property)>,
}

impl Instance {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name.into(), Property::Value(value.into()));
        self
    }

    #[must_use]
    pub fn with_embedded(mut self, name: impl Into<String>, instance: Self) -> Self {
        self.set(name.into(), Property::Embedded(instance));
        self
    }

    #[must_use]
    pub fn with_embedded_array(mut self, name: impl Into<String>, instances: Vec<Self>) -> Self {
        self.set(name.into(), Property::EmbeddedArray(instances));
        self
    }

    /// Replace (or add) a plain property value.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.set(name.into(), Property::Value(value.into()));
    }

    pub fn remove_property(&mut self, name: &str) -> bool {
        let before = self.properties.len();
        self.properties
            .retain(|(known, _)| !known.eq_ignore_ascii_case(name));

        self.properties.len() != before
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    fn set(&mut self, name: String, property: Property) {
        match self.find_mut(&name) {
            Some(slot) => *slot = property,
            None => self.properties.push((name, property)),
        }
    }

    fn find(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, property)| property)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, property)| property)
    }
}

impl PropertySource for Instance {
    fn get_value(&self, name: &str) -> Option<Value> {
        match self.find(name)? {
            Property::Value(value) => Some(value.clone()),
            Property::Embedded(_) | Property::EmbeddedArray(_) => None,
        }
    }

    fn embedded(&self, name: &str, index: Option<usize>) -> Option<&dyn PropertySource> {
        match (self.find(name)?, index) {
            (Property::Embedded(instance), None) => Some(instance as &dyn PropertySource),
            (Property::EmbeddedArray(instances), Some(index)) => {
                instances.get(index).map(|instance| instance as &dyn PropertySource)
            }
            _ => None,
        }
    }
}

///
/// TESTS
///
