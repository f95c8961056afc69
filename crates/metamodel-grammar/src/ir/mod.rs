//! Grammar intermediate representation.
//!
//! This IR is produced by the compiler pipeline and consumed by text-emission
//! backends. It describes one entry rule, the parser rules for every concrete
//! element type, and the type rules (named unions) that tie them together.

mod rule;

pub use rule::{Definition, EntryRule, ParserRule, TypeRule};

use serde::Serialize;

use crate::diagnostic::CompilerError;

/// The complete, validated grammar.
///
/// Immutable once produced; backends only read it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarIR {
    entry_rule: EntryRule,
    type_rules: Vec<TypeRule>,
    parser_rules: Vec<ParserRule>,
}

impl GrammarIR {
    pub fn entry_rule(&self) -> &EntryRule {
        &self.entry_rule
    }

    pub fn type_rules(&self) -> &[TypeRule] {
        &self.type_rules
    }

    pub fn parser_rules(&self) -> &[ParserRule] {
        &self.parser_rules
    }

    pub fn type_rule(&self, name: &str) -> Option<&TypeRule> {
        self.type_rules.iter().find(|r| r.name == name)
    }

    pub fn parser_rule(&self, name: &str) -> Option<&ParserRule> {
        self.parser_rules.iter().find(|r| r.name == name)
    }

    /// Serializes the IR for an out-of-process backend.
    pub fn to_json(&self) -> Result<String, CompilerError> {
        serde_json::to_string_pretty(self).map_err(|e| CompilerError::SerializationFailed {
            message: e.to_string(),
        })
    }
}

/// A fully assembled but not yet validated grammar.
///
/// The entry rule is absent when no declaration carries the root tag; the
/// validator reports that case.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftGrammar {
    pub entry_rule: Option<EntryRule>,
    pub type_rules: Vec<TypeRule>,
    pub parser_rules: Vec<ParserRule>,
}

impl DraftGrammar {
    /// Freezes the draft into the output IR.
    pub fn finish(self) -> Result<GrammarIR, CompilerError> {
        let entry_rule = self.entry_rule.ok_or(CompilerError::MissingRoot)?;
        Ok(GrammarIR {
            entry_rule,
            type_rules: self.type_rules,
            parser_rules: self.parser_rules,
        })
    }
}
