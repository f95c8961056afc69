//! Grammar rule representations.

use std::collections::BTreeSet;
use serde::Serialize;

use crate::declaration::{Multiplicity, Property, TypeRef};

/// A named union: `name = A | B | C`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRule {
    pub name: String,
    pub definitions: Vec<TypeRef>,
}

impl TypeRule {
    pub fn new(name: impl Into<String>, definitions: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            definitions,
        }
    }

    /// The member names, ignoring order and kind.
    pub fn member_names(&self) -> BTreeSet<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Returns true if this rule unions exactly the given names.
    pub fn has_members(&self, names: &BTreeSet<&str>) -> bool {
        self.member_names() == *names
    }
}

/// A property resolved to a single type, ready for emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub multiplicity: Multiplicity,
    pub cross_reference: bool,
    pub optional: bool,
}

impl Definition {
    /// The identifier definition injected into parser rules.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: TypeRef::simple("string"),
            multiplicity: Multiplicity::OneToOne,
            cross_reference: false,
            optional: false,
        }
    }

    /// Builds a definition from a property whose type list is already resolved.
    pub fn from_property(property: &Property, type_ref: TypeRef) -> Self {
        Self {
            name: property.name_or_empty().to_string(),
            type_ref,
            multiplicity: property.multiplicity,
            cross_reference: property.is_cross_reference,
            optional: property.is_optional,
        }
    }

    /// Returns true if this definition owns the values it points at.
    pub fn is_containment(&self) -> bool {
        !self.cross_reference
    }
}

/// The rule for the single root element of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryRule {
    pub name: String,
    pub definitions: Vec<Definition>,
}

/// The rule for one concrete, instantiable element type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserRule {
    pub name: String,
    pub is_abstract: bool,
    pub extended_by: Vec<String>,
    pub definitions: Vec<Definition>,
}

impl ParserRule {
    /// Looks up a definition by name.
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}
