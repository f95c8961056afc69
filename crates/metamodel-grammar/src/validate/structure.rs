//! Structure validation for declarations.
//!
//! Checks the declaration set as a whole: unique names, exactly one concrete
//! root, well-formed properties and identifiers, resolvable references, an
//! acyclic inheritance graph, and abstract types that are actually extended.

use std::collections::{HashMap, HashSet};

use crate::declaration::{Declaration, Multiplicity, Property, TypeRef, TypeRefKind};
use crate::diagnostic::CompilerError;
use crate::flatten::LangiumDeclaration;
use crate::ir::DraftGrammar;

/// Validates the structure of the flattened declarations.
pub fn validate_structure(
    declarations: &[LangiumDeclaration],
    grammar: &DraftGrammar,
    reference_property: &str,
) -> Result<(), CompilerError> {
    validate_unique_names(declarations)?;
    validate_single_root(declarations)?;

    for decl in declarations {
        validate_properties(&decl.declaration, reference_property)?;
    }

    validate_references(declarations, grammar)?;
    validate_inheritance_acyclic(declarations)?;

    for decl in declarations {
        validate_abstract_extended(decl)?;
    }

    Ok(())
}

fn validate_unique_names(declarations: &[LangiumDeclaration]) -> Result<(), CompilerError> {
    let mut seen = HashSet::new();
    for decl in declarations {
        if !seen.insert(decl.name()) {
            return Err(CompilerError::DuplicateDeclaration {
                name: decl.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Exactly one root, and it must be a concrete class or interface.
fn validate_single_root(declarations: &[LangiumDeclaration]) -> Result<(), CompilerError> {
    let roots: Vec<&Declaration> = declarations
        .iter()
        .map(|d| &d.declaration)
        .filter(|d| d.is_root())
        .collect();

    match roots.as_slice() {
        [] => Err(CompilerError::MissingRoot),
        [root] if !root.is_concrete_class() => Err(CompilerError::InvalidRoot {
            name: root.name.clone(),
        }),
        [_] => Ok(()),
        _ => Err(CompilerError::MultipleRoots {
            names: roots.iter().map(|d| d.name.clone()).collect(),
        }),
    }
}

fn validate_properties(decl: &Declaration, reference_property: &str) -> Result<(), CompilerError> {
    let mut seen = HashSet::new();

    for property in &decl.properties {
        if property.name.is_none() && decl.kind.is_class_like() {
            return Err(CompilerError::AnonymousProperty {
                declaration: decl.name.clone(),
            });
        }

        if property.types.is_empty() {
            return Err(CompilerError::EmptyTypeList {
                declaration: decl.name.clone(),
                property: property.name_or_empty().to_string(),
            });
        }

        let Some(name) = property.name.as_deref() else {
            continue;
        };

        if !seen.insert(name) {
            return Err(CompilerError::DuplicateProperty {
                declaration: decl.name.clone(),
                property: name.to_string(),
            });
        }

        if name == reference_property && !is_identifier_shaped(property) {
            return Err(CompilerError::InvalidIdentifier {
                declaration: decl.name.clone(),
                property: name.to_string(),
            });
        }
    }
    Ok(())
}

/// A declared identifier must match the one the compiler would inject.
fn is_identifier_shaped(property: &Property) -> bool {
    property.types == [TypeRef::simple("string")]
        && property.multiplicity == Multiplicity::OneToOne
        && !property.is_optional
        && !property.is_cross_reference
}

/// Every supertype must name a class or interface, and every complex type
/// must name a declaration.
fn validate_references(
    declarations: &[LangiumDeclaration],
    grammar: &DraftGrammar,
) -> Result<(), CompilerError> {
    let known: HashMap<&str, &Declaration> = declarations
        .iter()
        .map(|d| (d.name(), &d.declaration))
        .collect();

    let unresolved = |owner: &str, target: &str| CompilerError::UnresolvedReference {
        owner: owner.to_string(),
        target: target.to_string(),
    };

    for decl in declarations {
        for target in &decl.declaration.extends {
            match known.get(target.as_str()) {
                None => return Err(unresolved(decl.name(), target)),
                Some(supertype) if !supertype.kind.is_class_like() => {
                    return Err(CompilerError::InvalidSupertype {
                        owner: decl.name().to_string(),
                        target: target.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        let complex = decl
            .properties()
            .iter()
            .flat_map(|p| &p.types)
            .filter(|t| t.kind == TypeRefKind::Complex);
        for type_ref in complex {
            if !known.contains_key(type_ref.name.as_str()) {
                return Err(unresolved(decl.name(), &type_ref.name));
            }
        }
    }

    for rule in &grammar.type_rules {
        for member in rule.definitions.iter().filter(|t| t.kind == TypeRefKind::Complex) {
            if !known.contains_key(member.name.as_str()) {
                return Err(unresolved(&rule.name, &member.name));
            }
        }
    }

    Ok(())
}

/// Rejects `A extends B extends ... extends A`.
fn validate_inheritance_acyclic(declarations: &[LangiumDeclaration]) -> Result<(), CompilerError> {
    let graph: HashMap<&str, Vec<&str>> = declarations
        .iter()
        .map(|d| {
            let supertypes = d.declaration.extends.iter().map(String::as_str).collect();
            (d.name(), supertypes)
        })
        .collect();

    let mut done = HashSet::new();
    for decl in declarations {
        let mut path = Vec::new();
        if let Some(cycle) = find_cycle(decl.name(), &graph, &mut path, &mut done) {
            return Err(CompilerError::InheritanceCycle { cycle });
        }
    }
    Ok(())
}

/// Depth-first search returning the first cycle reachable from `node`.
///
/// `path` holds the nodes currently being visited; `done` the nodes whose
/// descendants are known to be acyclic.
pub(super) fn find_cycle<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    if let Some(start) = path.iter().position(|n| *n == node) {
        let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
        cycle.push(node.to_string());
        return Some(cycle);
    }
    if done.contains(node) {
        return None;
    }

    path.push(node);
    for &next in graph.get(node).into_iter().flatten() {
        if let Some(cycle) = find_cycle(next, graph, path, done) {
            return Some(cycle);
        }
    }
    path.pop();
    done.insert(node);
    None
}

fn validate_abstract_extended(decl: &LangiumDeclaration) -> Result<(), CompilerError> {
    // Type aliases are unions; nothing extends them.
    if decl.declaration.kind.is_class_like() && decl.declaration.is_abstract && decl.extended_by.is_empty() {
        return Err(CompilerError::AbstractNotExtended {
            name: decl.name().to_string(),
        });
    }
    Ok(())
}
