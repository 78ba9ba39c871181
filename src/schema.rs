//! Attribute declarations for resources and data sources.
//!
//! Raw JSON configuration is checked against these declarations before it is
//! decoded into a typed model, so required, computed-only, conflicting and
//! malformed attributes never reach the mapper.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Bool,
    StringSet,
    IntSet,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::StringSet => "set(string)",
            ValueKind::IntSet => "set(int)",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Int => value.is_i64(),
            ValueKind::Bool => value.is_boolean(),
            ValueKind::StringSet => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            ValueKind::IntSet => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_i64)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Optional in configuration, filled in from the remote side when unset.
    OptionalComputed,
    Computed,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Required => "required",
            Presence::Optional => "optional",
            Presence::OptionalComputed => "optional, computed",
            Presence::Computed => "computed",
        }
    }
}

pub type ValueCheck = fn(&Value) -> Result<(), String>;

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: ValueKind,
    pub presence: Presence,
    pub description: &'static str,
    pub sensitive: bool,
    pub conflicts_with: &'static [&'static str],
    pub check: Option<ValueCheck>,
}

impl Attribute {
    fn new(
        name: &'static str,
        kind: ValueKind,
        presence: Presence,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            presence,
            description,
            sensitive: false,
            conflicts_with: &[],
            check: None,
        }
    }

    pub fn required(name: &'static str, kind: ValueKind, description: &'static str) -> Self {
        Self::new(name, kind, Presence::Required, description)
    }

    pub fn optional(name: &'static str, kind: ValueKind, description: &'static str) -> Self {
        Self::new(name, kind, Presence::Optional, description)
    }

    pub fn optional_computed(
        name: &'static str,
        kind: ValueKind,
        description: &'static str,
    ) -> Self {
        Self::new(name, kind, Presence::OptionalComputed, description)
    }

    pub fn computed(name: &'static str, kind: ValueKind, description: &'static str) -> Self {
        Self::new(name, kind, Presence::Computed, description)
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn conflicts_with(mut self, names: &'static [&'static str]) -> Self {
        self.conflicts_with = names;
        self
    }

    pub fn check(mut self, check: ValueCheck) -> Self {
        self.check = Some(check);
        self
    }

    pub fn is_configurable(&self) -> bool {
        self.presence != Presence::Computed
    }
}

#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    pub fn new(type_name: &'static str, description: &'static str) -> Self {
        Self {
            type_name,
            description,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Validates a raw configuration object. `null` values count as unset.
    ///
    /// All problems are collected into a single [`ProviderError::Validation`].
    pub fn validate_config(&self, config: &Value) -> Result<(), ProviderError> {
        let Some(object) = config.as_object() else {
            return Err(ProviderError::Validation(format!(
                "{}: configuration must be an object",
                self.type_name
            )));
        };

        let is_set = |name: &str| object.get(name).is_some_and(|v| !v.is_null());
        let mut problems = Vec::new();
        let mut conflicts = BTreeSet::new();

        for (name, value) in object {
            if value.is_null() {
                continue;
            }

            let Some(attribute) = self.attribute(name) else {
                problems.push(format!("unsupported attribute '{}'", name));
                continue;
            };

            if !attribute.is_configurable() {
                problems.push(format!(
                    "'{}' is computed and cannot be configured",
                    name
                ));
                continue;
            }

            if !attribute.kind.matches(value) {
                problems.push(format!(
                    "'{}' must be of type {}",
                    name,
                    attribute.kind.as_str()
                ));
                continue;
            }

            if let Some(check) = attribute.check {
                if let Err(reason) = check(value) {
                    problems.push(format!("'{}' {}", name, reason));
                }
            }

            for other in attribute.conflicts_with {
                if is_set(*other) {
                    let pair = if name.as_str() < *other {
                        (name.as_str(), *other)
                    } else {
                        (*other, name.as_str())
                    };
                    conflicts.insert(pair);
                }
            }
        }

        for (a, b) in conflicts {
            problems.push(format!("'{}' conflicts with '{}'", a, b));
        }

        for attribute in &self.attributes {
            if attribute.presence == Presence::Required && !is_set(attribute.name) {
                problems.push(format!("missing required attribute '{}'", attribute.name));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::Validation(format!(
                "{}: {}",
                self.type_name,
                problems.join("; ")
            )))
        }
    }
}

/// Adapts a string validator to a [`ValueCheck`].
pub fn check_str(value: &Value, f: fn(&str) -> Result<(), String>) -> Result<(), String> {
    value.as_str().map_or(Ok(()), f)
}

/// Adapts an integer validator to a [`ValueCheck`].
pub fn check_int(value: &Value, f: fn(i64) -> Result<(), String>) -> Result<(), String> {
    value.as_i64().map_or(Ok(()), f)
}
