//! Advisory findings that do not abort compilation.

use miette::Diagnostic;
use thiserror::Error;

/// A non-fatal finding reported alongside a successful compilation.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CompilerWarning {
    #[error("'{name}' is declared but never used")]
    #[diagnostic(
        code(metagram::usage::unused),
        severity(Warning),
        help("No property or union refers to this rule; it is still emitted")
    )]
    Unused {
        name: String,
    },
}
