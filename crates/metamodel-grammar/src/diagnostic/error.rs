//! Compiler error types.

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CompilerError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Failed to read file '{path}': {message}")]
    #[diagnostic(code(metagram::io::read_error))]
    IoError {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid declaration input: {message}")]
    #[diagnostic(
        code(metagram::input::invalid),
        help("The front end must emit a JSON array of class/interface/type declarations")
    )]
    InvalidInput {
        message: String,
    },

    #[error("Invalid generator configuration: {message}")]
    #[diagnostic(code(metagram::config::invalid))]
    InvalidConfig {
        message: String,
    },

    // =========================================================================
    // Structure Errors
    // =========================================================================
    #[error("Duplicate declaration name: {name}")]
    #[diagnostic(code(metagram::structure::duplicate_declaration))]
    DuplicateDeclaration {
        name: String,
    },

    #[error("No declaration is tagged as root")]
    #[diagnostic(
        code(metagram::structure::missing_root),
        help("Tag exactly one class with `root`; it becomes the entry rule")
    )]
    MissingRoot,

    #[error("Multiple declarations are tagged as root: {}", names.join(", "))]
    #[diagnostic(
        code(metagram::structure::multiple_roots),
        help("Only one declaration may carry the `root` tag")
    )]
    MultipleRoots {
        names: Vec<String>,
    },

    #[error("Root '{name}' must be a concrete class or interface")]
    #[diagnostic(
        code(metagram::structure::invalid_root),
        help("The entry rule is built from the root's fields; type aliases and abstract classes have none")
    )]
    InvalidRoot {
        name: String,
    },

    #[error("Declaration '{declaration}' declares property '{property}' more than once")]
    #[diagnostic(code(metagram::structure::duplicate_property))]
    DuplicateProperty {
        declaration: String,
        property: String,
    },

    #[error("Identifier property '{property}' of '{declaration}' must be a required, single-valued string")]
    #[diagnostic(
        code(metagram::structure::invalid_identifier),
        help("Declare it as a plain `string` property, or drop it and let the compiler inject one")
    )]
    InvalidIdentifier {
        declaration: String,
        property: String,
    },

    #[error("Declaration '{declaration}' has a property without a name")]
    #[diagnostic(
        code(metagram::structure::anonymous_property),
        help("Only type aliases may contribute anonymous union members")
    )]
    AnonymousProperty {
        declaration: String,
    },

    #[error("Property '{property}' of '{declaration}' declares no type")]
    #[diagnostic(code(metagram::structure::empty_type_list))]
    EmptyTypeList {
        declaration: String,
        property: String,
    },

    #[error("Abstract type '{name}' is never extended")]
    #[diagnostic(
        code(metagram::structure::abstract_not_extended),
        help("An abstract type without subtypes can never appear in a document. Extend it or make it concrete.")
    )]
    AbstractNotExtended {
        name: String,
    },

    #[error("Containment cycle detected: {}", cycle.join(" -> "))]
    #[diagnostic(
        code(metagram::structure::containment_cycle),
        help("Mark one of the properties on the cycle as a cross reference")
    )]
    ContainmentCycle {
        cycle: Vec<String>,
    },

    // =========================================================================
    // Reference Errors
    // =========================================================================
    #[error("'{owner}' refers to unknown type '{target}'")]
    #[diagnostic(code(metagram::reference::unresolved))]
    UnresolvedReference {
        owner: String,
        target: String,
    },

    #[error("'{owner}' cannot extend '{target}': only classes and interfaces can be extended")]
    #[diagnostic(code(metagram::reference::invalid_supertype))]
    InvalidSupertype {
        owner: String,
        target: String,
    },

    #[error("Inheritance cycle detected: {}", cycle.join(" -> "))]
    #[diagnostic(
        code(metagram::reference::inheritance_cycle),
        help("Break the cycle by removing one of the `extends` clauses")
    )]
    InheritanceCycle {
        cycle: Vec<String>,
    },

    // =========================================================================
    // Output Errors
    // =========================================================================
    #[error("Failed to serialize grammar IR: {message}")]
    #[diagnostic(code(metagram::output::serialization_failed))]
    SerializationFailed {
        message: String,
    },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}
