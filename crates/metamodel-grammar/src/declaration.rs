//! Declaration model.
//!
//! The flat list of class, interface and type-alias declarations handed to the
//! compiler by a front end. A front end either builds these values directly or
//! emits the equivalent JSON document, which [`from_json`] decodes.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::diagnostic::CompilerError;

/// The tag marking the declaration the entry rule is built from.
pub const ROOT_TAG: &str = "root";

/// What kind of source construct a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    /// `class Foo { ... }`
    Class,
    /// `interface Foo { ... }`, treated exactly like a class.
    Interface,
    /// `type Foo = A | B`, an unnamed union that is always abstract.
    #[serde(rename = "type")]
    TypeAlias,
}

impl DeclarationKind {
    /// Returns true for kinds that carry fields and can become parser rules.
    pub fn is_class_like(self) -> bool {
        matches!(self, Self::Class | Self::Interface)
    }
}

/// How many values a property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Multiplicity {
    #[default]
    OneToOne,
    OneToN,
    ZeroToN,
}

impl Multiplicity {
    /// Returns true if the property is array-valued.
    pub fn is_many(self) -> bool {
        !matches!(self, Self::OneToOne)
    }
}

/// What a type reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRefKind {
    /// A primitive, or the name of a type rule.
    Simple,
    /// A literal value used as a tag.
    Constant,
    /// A named declaration.
    Complex,
}

/// One candidate type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub name: String,
}

impl TypeRef {
    pub fn simple(name: impl Into<String>) -> Self {
        Self { kind: TypeRefKind::Simple, name: name.into() }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self { kind: TypeRefKind::Constant, name: name.into() }
    }

    pub fn complex(name: impl Into<String>) -> Self {
        Self { kind: TypeRefKind::Complex, name: name.into() }
    }
}

/// One field of a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Absent only for the anonymous union members of a type alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub is_optional: bool,

    /// A reference to another element rather than a containment edge.
    #[serde(default)]
    pub is_cross_reference: bool,

    pub types: Vec<TypeRef>,

    #[serde(default)]
    pub multiplicity: Multiplicity,
}

impl Property {
    /// Creates a required, single-valued containment property.
    pub fn new(name: impl Into<String>, types: Vec<TypeRef>) -> Self {
        Self {
            name: Some(name.into()),
            is_optional: false,
            is_cross_reference: false,
            types,
            multiplicity: Multiplicity::OneToOne,
        }
    }

    /// Creates a nameless union member, as contributed by a type alias.
    pub fn anonymous(types: Vec<TypeRef>) -> Self {
        Self {
            name: None,
            ..Self::new("", types)
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn cross_reference(mut self) -> Self {
        self.is_cross_reference = true;
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    /// The property name, or the empty string for anonymous members.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Returns true if the property is named `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// One class, interface or type alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,

    #[serde(default)]
    pub is_abstract: bool,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub properties: Vec<Property>,

    /// Direct supertypes only.
    #[serde(default)]
    pub extends: Vec<String>,
}

impl Declaration {
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            is_abstract: false,
            tags: BTreeSet::new(),
            properties: Vec::new(),
            extends: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Class, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Interface, name)
    }

    /// Creates a type alias. Each entry of `members` becomes one anonymous
    /// property, so `type T = A | B` is `type_alias("T", [A, B])`.
    pub fn type_alias(name: impl Into<String>, members: Vec<TypeRef>) -> Self {
        let mut decl = Self::new(DeclarationKind::TypeAlias, name);
        decl.properties = members
            .into_iter()
            .map(|member| Property::anonymous(vec![member]))
            .collect();
        decl
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn root(self) -> Self {
        self.with_tag(ROOT_TAG)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn extending(mut self, supertype: impl Into<String>) -> Self {
        self.extends.push(supertype.into());
        self
    }

    /// Returns true if this declaration carries the root tag.
    pub fn is_root(&self) -> bool {
        self.tags.contains(ROOT_TAG)
    }

    /// Type aliases are unions and therefore always abstract.
    pub fn is_effectively_abstract(&self) -> bool {
        self.is_abstract || self.kind == DeclarationKind::TypeAlias
    }

    /// Returns true if this declaration becomes a parser rule.
    pub fn is_concrete_class(&self) -> bool {
        self.kind.is_class_like() && !self.is_effectively_abstract()
    }
}

/// Decodes a JSON array of declarations produced by a front end.
pub fn from_json(source: &str) -> Result<Vec<Declaration>, CompilerError> {
    serde_json::from_str(source).map_err(|e| CompilerError::InvalidInput {
        message: e.to_string(),
    })
}
