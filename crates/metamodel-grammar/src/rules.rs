//! Entry and parser rule construction.

use crate::config::CompilerConfig;
use crate::declaration::{Property, TypeRef};
use crate::flatten::LangiumDeclaration;
use crate::ir::{Definition, DraftGrammar, EntryRule, ParserRule, TypeRule};
use crate::synthesize::UnionRegistry;

/// Assembles the draft grammar from flattened declarations and their type rules.
pub fn build(
    declarations: &[LangiumDeclaration],
    mut type_rules: Vec<TypeRule>,
    registry: &mut UnionRegistry,
    config: &CompilerConfig,
) -> DraftGrammar {
    let entry_rule = build_entry_rule(declarations, &mut type_rules, registry);
    let parser_rules = build_parser_rules(
        declarations,
        &mut type_rules,
        registry,
        &config.reference_property,
    );

    DraftGrammar {
        entry_rule,
        type_rules,
        parser_rules,
    }
}

/// Builds the entry rule from the first root-tagged declaration.
///
/// Returns `None` when there is no root; validation reports that.
pub fn build_entry_rule(
    declarations: &[LangiumDeclaration],
    type_rules: &mut Vec<TypeRule>,
    registry: &mut UnionRegistry,
) -> Option<EntryRule> {
    let root = declarations.iter().find(|d| d.declaration.is_root())?;

    Some(EntryRule {
        name: root.name().to_string(),
        definitions: definitions(root.properties(), type_rules, registry),
    })
}

/// Builds one parser rule per concrete, non-root class.
///
/// Every rule gets an identifier definition named `reference_property` as its
/// first entry, unless the class already declares a property by that name.
pub fn build_parser_rules(
    declarations: &[LangiumDeclaration],
    type_rules: &mut Vec<TypeRule>,
    registry: &mut UnionRegistry,
    reference_property: &str,
) -> Vec<ParserRule> {
    declarations
        .iter()
        .filter(|d| d.declaration.is_concrete_class() && !d.declaration.is_root())
        .map(|decl| {
            let mut definitions = definitions(decl.properties(), type_rules, registry);
            if !decl.properties().iter().any(|p| p.is_named(reference_property)) {
                definitions.insert(0, Definition::identifier(reference_property));
            }

            ParserRule {
                name: decl.name().to_string(),
                is_abstract: decl.declaration.is_abstract,
                extended_by: decl.extended_by.clone(),
                definitions,
            }
        })
        .collect()
}

fn definitions(
    properties: &[Property],
    type_rules: &mut Vec<TypeRule>,
    registry: &mut UnionRegistry,
) -> Vec<Definition> {
    properties
        .iter()
        .filter_map(|property| {
            let type_ref = resolve_type(property, type_rules, registry)?;
            Some(Definition::from_property(property, type_ref))
        })
        .collect()
}

/// The single type a definition points at.
///
/// Multi-typed properties resolve to the union with the same member set,
/// which is synthesized if it does not exist yet. Properties without any type
/// yield `None`; validation rejects them.
fn resolve_type(
    property: &Property,
    type_rules: &mut Vec<TypeRule>,
    registry: &mut UnionRegistry,
) -> Option<TypeRef> {
    match property.types.as_slice() {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(TypeRef::simple(registry.resolve(type_rules, many))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Declaration, Multiplicity};
    use crate::flatten::flatten;
    use crate::synthesize::synthesize_type_rules;
    use pretty_assertions::assert_eq;

    fn draft(decls: &[Declaration], config: &CompilerConfig) -> DraftGrammar {
        let mut registry = UnionRegistry::new();
        let mut flat = flatten(decls);
        let type_rules = synthesize_type_rules(&mut flat, &mut registry);
        build(&flat, type_rules, &mut registry, config)
    }

    #[test]
    fn test_entry_rule_from_root() {
        let decls = vec![
            Declaration::class("Diagram")
                .root()
                .with_property(Property::new("title", vec![TypeRef::simple("string")]).optional()),
            Declaration::class("Node"),
        ];
        let grammar = draft(&decls, &CompilerConfig::default());

        let entry = grammar.entry_rule.unwrap();
        assert_eq!(entry.name, "Diagram");
        assert_eq!(
            entry.definitions,
            vec![Definition {
                name: "title".to_string(),
                type_ref: TypeRef::simple("string"),
                multiplicity: Multiplicity::OneToOne,
                cross_reference: false,
                optional: true,
            }]
        );
    }

    #[test]
    fn test_entry_rule_has_no_identifier() {
        let decls = vec![Declaration::class("Diagram").root()];
        let grammar = draft(&decls, &CompilerConfig::default());
        assert!(grammar.entry_rule.unwrap().definitions.is_empty());
    }

    #[test]
    fn test_no_root_gives_no_entry_rule() {
        let decls = vec![Declaration::class("Node")];
        let grammar = draft(&decls, &CompilerConfig::default());
        assert!(grammar.entry_rule.is_none());
        assert_eq!(grammar.parser_rules.len(), 1);
    }

    #[test]
    fn test_parser_rules_skip_root_and_abstract() {
        let decls = vec![
            Declaration::class("Diagram").root(),
            Declaration::class("Shape").abstract_(),
            Declaration::type_alias("Id", vec![TypeRef::simple("string")]),
            Declaration::class("Square").extending("Shape"),
            Declaration::interface("Label"),
        ];
        let grammar = draft(&decls, &CompilerConfig::default());
        let names: Vec<&str> = grammar.parser_rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Square", "Label"]);
    }

    #[test]
    fn test_identifier_injected_first() {
        let decls = vec![Declaration::class("Node")
            .with_property(Property::new("label", vec![TypeRef::simple("string")]))];
        let grammar = draft(&decls, &CompilerConfig::default());

        let rule = &grammar.parser_rules[0];
        assert_eq!(rule.definitions.len(), 2);
        assert_eq!(rule.definitions[0], Definition::identifier("__id"));
        assert_eq!(rule.definitions[1].name, "label");
    }

    #[test]
    fn test_existing_identifier_not_duplicated() {
        let decls = vec![Declaration::class("Node")
            .with_property(Property::new("label", vec![TypeRef::simple("string")]))
            .with_property(Property::new("__id", vec![TypeRef::simple("string")]))];
        let grammar = draft(&decls, &CompilerConfig::default());

        let rule = &grammar.parser_rules[0];
        let ids = rule.definitions.iter().filter(|d| d.name == "__id").count();
        assert_eq!(ids, 1);
        assert_eq!(rule.definitions[0].name, "label");
    }

    #[test]
    fn test_configured_reference_property() {
        let config = CompilerConfig {
            reference_property: "uid".to_string(),
            ..CompilerConfig::default()
        };
        let decls = vec![Declaration::class("Node")];
        let grammar = draft(&decls, &config);

        let rule = &grammar.parser_rules[0];
        assert_eq!(rule.definitions, vec![Definition::identifier("uid")]);
        assert!(rule.definition("__id").is_none());
    }

    #[test]
    fn test_inherited_identifier_counts() {
        let decls = vec![
            Declaration::class("Base")
                .abstract_()
                .with_property(Property::new("__id", vec![TypeRef::simple("string")])),
            Declaration::class("Node").extending("Base"),
        ];
        let grammar = draft(&decls, &CompilerConfig::default());
        assert_eq!(grammar.parser_rules[0].definitions.len(), 1);
    }

    #[test]
    fn test_flattened_definitions_order() {
        let decls = vec![
            Declaration::class("A")
                .with_property(Property::new("own", vec![TypeRef::simple("string")]))
                .extending("B"),
            Declaration::class("B")
                .with_property(Property::new("inherited", vec![TypeRef::simple("number")])),
        ];
        let grammar = draft(&decls, &CompilerConfig::default());
        let a = grammar.parser_rules.iter().find(|r| r.name == "A").unwrap();
        let names: Vec<&str> = a.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["__id", "own", "inherited"]);
        assert_eq!(grammar.parser_rules.iter().find(|r| r.name == "B").unwrap().extended_by, vec!["A"]);
    }

    #[test]
    fn test_cross_reference_flag_carried() {
        let decls = vec![
            Declaration::class("Edge")
                .with_property(Property::new("source", vec![TypeRef::complex("Node")]).cross_reference()),
            Declaration::class("Node"),
        ];
        let grammar = draft(&decls, &CompilerConfig::default());
        let source = grammar.parser_rules[0].definition("source").unwrap();
        assert!(source.cross_reference);
        assert_eq!(source.type_ref, TypeRef::complex("Node"));
    }

    #[test]
    fn test_unsynthesized_multi_type_is_resolved_not_dropped() {
        // Built directly, bypassing synthesis, the entry rule still resolves
        // the union instead of leaving the type unset.
        let flat = flatten(&[Declaration::class("Root").root().with_property(Property::new(
            "value",
            vec![TypeRef::simple("string"), TypeRef::simple("number")],
        ))]);
        let mut rules = vec![TypeRule::new("Scalar", vec![TypeRef::simple("number"), TypeRef::simple("string")])];
        let mut registry = UnionRegistry::new();

        let entry = build_entry_rule(&flat, &mut rules, &mut registry).unwrap();
        assert_eq!(entry.definitions[0].type_ref, TypeRef::simple("Scalar"));

        let mut empty = Vec::new();
        let entry = build_entry_rule(&flat, &mut empty, &mut registry).unwrap();
        assert_eq!(entry.definitions[0].type_ref, TypeRef::simple("UnionType_0"));
        assert_eq!(empty.len(), 1);
    }
}
