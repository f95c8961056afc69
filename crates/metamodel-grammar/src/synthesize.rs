//! Type rule synthesis.
//!
//! Builds the named unions of the grammar from three sources, in order:
//! 1. type aliases (`type T = A | B`)
//! 2. abstract classes (unions of their direct subtypes)
//! 3. properties of concrete classes that list more than one type
//!
//! After synthesis every concrete property has exactly one type, pointing at
//! a named union when it used to list several.

use std::collections::{BTreeSet, HashSet};

use crate::declaration::TypeRef;
use crate::flatten::LangiumDeclaration;
use crate::ir::TypeRule;

/// Prefix of anonymous union names.
pub const UNION_PREFIX: &str = "UnionType_";

/// Hands out anonymous union names for one compiler run.
///
/// Never shared between runs, so every run numbers its unions from zero.
#[derive(Debug, Default)]
pub struct UnionRegistry {
    next_index: usize,
    reserved: HashSet<String>,
}

impl UnionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks names that a synthesized union must never take.
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
    }

    /// Returns the name of the rule unioning exactly `types`, synthesizing
    /// `UnionType_<n>` into `rules` when no such rule exists yet.
    pub fn resolve(&mut self, rules: &mut Vec<TypeRule>, types: &[TypeRef]) -> String {
        let wanted: BTreeSet<&str> = types.iter().map(|t| t.name.as_str()).collect();

        if let Some(existing) = rules.iter().find(|rule| rule.has_members(&wanted)) {
            return existing.name.clone();
        }

        let name = self.next_name(rules);
        rules.push(TypeRule::new(name.clone(), dedup(types.iter().cloned())));
        name
    }

    fn next_name(&mut self, rules: &[TypeRule]) -> String {
        loop {
            let candidate = format!("{}{}", UNION_PREFIX, self.next_index);
            self.next_index += 1;
            if !self.reserved.contains(&candidate) && !rules.iter().any(|r| r.name == candidate) {
                return candidate;
            }
        }
    }
}

/// Synthesizes every type rule and rewrites multi-typed properties of
/// concrete classes to reference them.
pub fn synthesize_type_rules(
    declarations: &mut [LangiumDeclaration],
    registry: &mut UnionRegistry,
) -> Vec<TypeRule> {
    registry.reserve(declarations.iter().map(|d| d.name().to_string()));

    let mut rules: Vec<TypeRule> = declarations
        .iter()
        .filter_map(named_union)
        .collect();

    for decl in declarations.iter_mut() {
        if !decl.declaration.is_concrete_class() {
            continue;
        }

        for property in &mut decl.declaration.properties {
            if property.types.len() > 1 {
                let rule = registry.resolve(&mut rules, &property.types);
                property.types = vec![TypeRef::simple(rule)];
            }
        }
    }

    rules
}

/// The union a type alias or abstract class stands for, if any.
fn named_union(decl: &LangiumDeclaration) -> Option<TypeRule> {
    let declaration = &decl.declaration;

    if !declaration.kind.is_class_like() {
        let members = declaration
            .properties
            .iter()
            .flat_map(|p| p.types.iter().cloned());
        return Some(TypeRule::new(declaration.name.clone(), dedup(members)));
    }

    if declaration.is_abstract {
        let members = decl.extended_by.iter().map(TypeRef::simple).collect();
        return Some(TypeRule::new(declaration.name.clone(), members));
    }

    None
}

/// Drops repeated member names, keeping the first occurrence.
fn dedup(types: impl Iterator<Item = TypeRef>) -> Vec<TypeRef> {
    let mut seen = HashSet::new();
    types.filter(|t| seen.insert(t.name.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Declaration, Multiplicity, Property};
    use crate::flatten::flatten;
    use pretty_assertions::assert_eq;

    fn run(decls: &[Declaration]) -> (Vec<LangiumDeclaration>, Vec<TypeRule>) {
        let mut flat = flatten(decls);
        let rules = synthesize_type_rules(&mut flat, &mut UnionRegistry::new());
        (flat, rules)
    }

    fn property<'a>(flat: &'a [LangiumDeclaration], decl: &str, prop: &str) -> &'a Property {
        flat.iter()
            .find(|d| d.name() == decl)
            .and_then(|d| d.properties().iter().find(|p| p.is_named(prop)))
            .unwrap()
    }

    #[test]
    fn test_type_alias_becomes_rule() {
        let decls = vec![Declaration::type_alias(
            "Literal",
            vec![TypeRef::simple("string"), TypeRef::simple("number"), TypeRef::constant("null")],
        )];
        let (_, rules) = run(&decls);
        assert_eq!(
            rules,
            vec![TypeRule::new(
                "Literal",
                vec![TypeRef::simple("string"), TypeRef::simple("number"), TypeRef::constant("null")],
            )]
        );
    }

    #[test]
    fn test_abstract_class_becomes_union_of_subtypes() {
        let decls = vec![
            Declaration::class("Shape").abstract_(),
            Declaration::class("Square").extending("Shape"),
            Declaration::class("Circle").extending("Shape"),
        ];
        let (_, rules) = run(&decls);
        assert_eq!(
            rules,
            vec![TypeRule::new("Shape", vec![TypeRef::simple("Square"), TypeRef::simple("Circle")])]
        );
    }

    #[test]
    fn test_multi_typed_properties_share_one_union() {
        let decls = vec![
            Declaration::class("Canvas")
                .with_property(Property::new("first", vec![TypeRef::complex("A"), TypeRef::complex("B")]))
                .with_property(Property::new("second", vec![TypeRef::complex("B"), TypeRef::complex("A")])),
            Declaration::class("A"),
            Declaration::class("B"),
        ];
        let (flat, rules) = run(&decls);

        assert_eq!(rules, vec![TypeRule::new("UnionType_0", vec![TypeRef::complex("A"), TypeRef::complex("B")])]);
        assert_eq!(property(&flat, "Canvas", "first").types, vec![TypeRef::simple("UnionType_0")]);
        assert_eq!(property(&flat, "Canvas", "second").types, vec![TypeRef::simple("UnionType_0")]);
    }

    #[test]
    fn test_multi_typed_property_reuses_named_union() {
        let decls = vec![
            Declaration::type_alias("Pet", vec![TypeRef::complex("Cat"), TypeRef::complex("Dog")]),
            Declaration::class("Owner").with_property(
                Property::new("pets", vec![TypeRef::complex("Dog"), TypeRef::complex("Cat")])
                    .with_multiplicity(Multiplicity::ZeroToN),
            ),
            Declaration::class("Cat"),
            Declaration::class("Dog"),
        ];
        let (flat, rules) = run(&decls);

        assert_eq!(rules.len(), 1);
        let pets = property(&flat, "Owner", "pets");
        assert_eq!(pets.types, vec![TypeRef::simple("Pet")]);
        assert_eq!(pets.multiplicity, Multiplicity::ZeroToN);
    }

    #[test]
    fn test_distinct_sets_get_distinct_unions() {
        let decls = vec![
            Declaration::class("Holder")
                .with_property(Property::new("ab", vec![TypeRef::complex("A"), TypeRef::complex("B")]))
                .with_property(Property::new("abc", vec![
                    TypeRef::complex("A"),
                    TypeRef::complex("B"),
                    TypeRef::complex("C"),
                ])),
        ];
        let (_, rules) = run(&decls);
        let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["UnionType_0", "UnionType_1"]);
    }

    #[test]
    fn test_single_typed_properties_untouched() {
        let decls = vec![Declaration::class("Node").with_property(Property::new(
            "label",
            vec![TypeRef::simple("string")],
        ))];
        let (flat, rules) = run(&decls);
        assert!(rules.is_empty());
        assert_eq!(property(&flat, "Node", "label").types, vec![TypeRef::simple("string")]);
    }

    #[test]
    fn test_abstract_properties_are_not_synthesized() {
        // The abstract class holds no properties after flattening; only its
        // concrete subtype triggers synthesis.
        let decls = vec![
            Declaration::class("Base")
                .abstract_()
                .with_property(Property::new("v", vec![TypeRef::simple("string"), TypeRef::simple("number")])),
            Declaration::class("Impl").extending("Base"),
        ];
        let (flat, rules) = run(&decls);
        assert_eq!(rules.len(), 2);
        assert_eq!(property(&flat, "Impl", "v").types, vec![TypeRef::simple("UnionType_0")]);
    }

    #[test]
    fn test_synthesized_names_skip_declared_names() {
        let decls = vec![
            Declaration::class("UnionType_0"),
            Declaration::class("Holder").with_property(Property::new(
                "x",
                vec![TypeRef::simple("string"), TypeRef::simple("number")],
            )),
        ];
        let (_, rules) = run(&decls);
        assert_eq!(rules[0].name, "UnionType_1");
    }

    #[test]
    fn test_registry_resolve_dedups_members() {
        let mut rules = Vec::new();
        let mut registry = UnionRegistry::new();
        let name = registry.resolve(
            &mut rules,
            &[TypeRef::complex("A"), TypeRef::complex("A"), TypeRef::complex("B")],
        );
        assert_eq!(name, "UnionType_0");
        assert_eq!(rules[0].definitions, vec![TypeRef::complex("A"), TypeRef::complex("B")]);

        let again = registry.resolve(&mut rules, &[TypeRef::complex("B"), TypeRef::complex("A")]);
        assert_eq!(again, "UnionType_0");
        assert_eq!(rules.len(), 1);
    }
}
