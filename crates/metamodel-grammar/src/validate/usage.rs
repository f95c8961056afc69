//! Unused rule detection.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::diagnostic::CompilerWarning;
use crate::ir::DraftGrammar;

/// Reports type and parser rules that cannot be reached from the entry rule.
///
/// Edges run from a rule to every definition type it names, cross references
/// included, and from a type rule to each of its members. A rule that is only
/// named by another unreachable rule is reported too. Without an entry rule
/// nothing is reported.
pub fn unused_rules(grammar: &DraftGrammar) -> Vec<CompilerWarning> {
    let Some(entry) = &grammar.entry_rule else {
        return Vec::new();
    };

    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for rule in &grammar.type_rules {
        edges
            .entry(rule.name.as_str())
            .or_default()
            .extend(rule.definitions.iter().map(|t| t.name.as_str()));
    }
    for rule in &grammar.parser_rules {
        edges
            .entry(rule.name.as_str())
            .or_default()
            .extend(rule.definitions.iter().map(|d| d.type_ref.name.as_str()));
    }

    let mut reached: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = entry.definitions.iter().map(|d| d.type_ref.name.as_str()).collect();
    while let Some(name) = queue.pop_front() {
        if !reached.insert(name) {
            continue;
        }
        if let Some(next) = edges.get(name) {
            queue.extend(next.iter().copied());
        }
    }

    let declared = grammar
        .type_rules
        .iter()
        .map(|r| r.name.as_str())
        .chain(grammar.parser_rules.iter().map(|r| r.name.as_str()));

    declared
        .filter(|name| !reached.contains(name))
        .map(|name| CompilerWarning::Unused {
            name: name.to_string(),
        })
        .collect()
}
