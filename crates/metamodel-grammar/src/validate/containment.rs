//! Containment cycle detection.
//!
//! A serializer writes contained values inline, so a cycle of containment
//! edges reachable from the root never terminates. Cross references are
//! written as identifiers and may cycle freely.

use std::collections::{HashMap, HashSet};

use crate::diagnostic::CompilerError;
use crate::flatten::LangiumDeclaration;
use crate::ir::{Definition, DraftGrammar};
use super::structure::find_cycle;

/// Rejects containment cycles reachable from the entry rule.
pub fn validate_containment(
    declarations: &[LangiumDeclaration],
    grammar: &DraftGrammar,
) -> Result<(), CompilerError> {
    let Some(entry) = &grammar.entry_rule else {
        return Ok(());
    };

    let graph = containment_graph(grammar);
    let mut path = Vec::new();
    let mut done = HashSet::new();

    match find_cycle(entry.name.as_str(), &graph, &mut path, &mut done) {
        Some(cycle) => Err(CompilerError::ContainmentCycle {
            cycle: declaration_names(cycle, declarations),
        }),
        None => Ok(()),
    }
}

/// Rule name to the rule names it contains.
///
/// Parser and entry rules contain the types of their non-reference
/// definitions; a type rule stands for each of its members.
fn containment_graph(grammar: &DraftGrammar) -> HashMap<&str, Vec<&str>> {
    let mut graph = HashMap::new();

    if let Some(entry) = &grammar.entry_rule {
        graph.insert(entry.name.as_str(), contained(&entry.definitions));
    }
    for rule in &grammar.parser_rules {
        graph.insert(rule.name.as_str(), contained(&rule.definitions));
    }
    for rule in &grammar.type_rules {
        let members = rule.definitions.iter().map(|t| t.name.as_str()).collect();
        graph.insert(rule.name.as_str(), members);
    }

    graph
}

fn contained(definitions: &[Definition]) -> Vec<&str> {
    definitions
        .iter()
        .filter(|d| d.is_containment())
        .map(|d| d.type_ref.name.as_str())
        .collect()
}

/// Drops synthesized unions from a reported cycle.
fn declaration_names(cycle: Vec<String>, declarations: &[LangiumDeclaration]) -> Vec<String> {
    let named: Vec<String> = cycle
        .iter()
        .filter(|n| declarations.iter().any(|d| d.name() == n.as_str()))
        .cloned()
        .collect();

    if named.is_empty() {
        cycle
    } else {
        named
    }
}
