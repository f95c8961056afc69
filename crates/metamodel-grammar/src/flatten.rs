//! Inheritance flattening.
//!
//! Copies every supertype's properties into its subtypes and computes the
//! inverse `extended_by` relation. Supertypes are resolved depth-first and
//! memoized, so the result does not depend on declaration order and
//! multi-level hierarchies are always fully flattened.

use std::collections::{HashMap, HashSet};

use crate::declaration::{Declaration, Property};

/// A declaration after inheritance has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LangiumDeclaration {
    /// The declaration, with `properties` replaced by the flattened list.
    pub declaration: Declaration,

    /// Names of the declarations that directly extend this one, in input order.
    pub extended_by: Vec<String>,
}

impl LangiumDeclaration {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.declaration.properties
    }
}

/// Flattens inheritance across the whole declaration list.
///
/// Class-like declarations get `[own..., inherited...]`, with inherited
/// properties taken from each `extends` entry in order. A property whose name
/// is already present is not inherited again. Abstract classes end up with no
/// properties of their own; type aliases keep their union members. Unknown
/// supertypes contribute nothing here and are reported by validation.
pub fn flatten(declarations: &[Declaration]) -> Vec<LangiumDeclaration> {
    let mut resolver = Resolver::new(declarations);
    let subtypes = subtypes_by_name(declarations);

    declarations
        .iter()
        .map(|decl| {
            let properties = if !decl.kind.is_class_like() {
                decl.properties.clone()
            } else if decl.is_abstract {
                Vec::new()
            } else {
                resolver.flattened(decl)
            };

            LangiumDeclaration {
                declaration: Declaration {
                    properties,
                    ..decl.clone()
                },
                extended_by: subtypes.get(decl.name.as_str()).cloned().unwrap_or_default(),
            }
        })
        .collect()
}

/// Computes the transpose of `extends`.
fn subtypes_by_name(declarations: &[Declaration]) -> HashMap<&str, Vec<String>> {
    let mut map: HashMap<&str, Vec<String>> = HashMap::new();
    for decl in declarations {
        for supertype in &decl.extends {
            let subtypes = map.entry(supertype.as_str()).or_default();
            if !subtypes.contains(&decl.name) {
                subtypes.push(decl.name.clone());
            }
        }
    }
    map
}

/// Memoized supertype resolution.
struct Resolver<'a> {
    index: HashMap<&'a str, &'a Declaration>,
    resolved: HashMap<&'a str, Vec<Property>>,
    in_progress: HashSet<&'a str>,
}

impl<'a> Resolver<'a> {
    fn new(declarations: &'a [Declaration]) -> Self {
        let mut index = HashMap::new();
        for decl in declarations {
            // First declaration wins; duplicates are rejected by validation.
            index.entry(decl.name.as_str()).or_insert(decl);
        }

        Self {
            index,
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Own properties followed by every supertype's flattened properties.
    fn flattened(&mut self, decl: &'a Declaration) -> Vec<Property> {
        let mut properties = decl.properties.clone();
        for supertype in &decl.extends {
            let inherited = self.resolve(supertype);
            merge(&mut properties, inherited);
        }
        properties
    }

    /// Fully flattened properties of the named supertype.
    fn resolve(&mut self, name: &str) -> Vec<Property> {
        let Some(&decl) = self.index.get(name) else {
            return Vec::new();
        };
        let key = decl.name.as_str();

        if let Some(properties) = self.resolved.get(key) {
            return properties.clone();
        }

        // Inheritance cycle; validation reports it.
        if !decl.kind.is_class_like() || !self.in_progress.insert(key) {
            return Vec::new();
        }

        let properties = self.flattened(decl);
        self.in_progress.remove(key);
        self.resolved.insert(key, properties.clone());
        properties
    }
}

/// Appends a supertype's properties, skipping names already present.
///
/// Only names present before the merge shadow; repeats within `inherited`
/// are kept so validation can report them on the subtype.
fn merge(properties: &mut Vec<Property>, inherited: Vec<Property>) {
    let present: HashSet<String> = properties.iter().filter_map(|p| p.name.clone()).collect();
    for property in inherited {
        let shadowed = property.name.as_ref().is_some_and(|name| present.contains(name));
        if !shadowed {
            properties.push(property);
        }
    }
}
