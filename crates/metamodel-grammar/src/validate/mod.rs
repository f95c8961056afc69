//! Validation of the assembled grammar.

mod containment;
mod structure;
mod usage;

use crate::config::CompilerConfig;
use crate::diagnostic::{CompilerError, CompilerWarning};
use crate::flatten::LangiumDeclaration;
use crate::ir::DraftGrammar;

/// Validates the draft grammar against its declarations.
///
/// Structural violations are fatal and returned as the first error found.
/// On success the advisory warnings are returned.
pub fn validate(
    declarations: &[LangiumDeclaration],
    grammar: &DraftGrammar,
    config: &CompilerConfig,
) -> Result<Vec<CompilerWarning>, CompilerError> {
    // Validate declarations and references
    structure::validate_structure(declarations, grammar, &config.reference_property)?;

    // Validate that serialization terminates
    containment::validate_containment(declarations, grammar)?;

    Ok(usage::unused_rules(grammar))
}
