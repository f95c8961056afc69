//! # Metamodel Grammar Compiler
//!
//! This crate compiles a metamodel, written as class, interface and type
//! declarations, into a normalized grammar IR: one entry rule, a parser rule
//! per concrete element type, and the type rules (named unions) between them.
//! Backends render that IR into grammar text and serializer code.
//!
//! ## Architecture
//!
//! ```text
//! Declarations (front end)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Flatten    │  Inherited properties, extended-by relation
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Synthesize  │  Type rules, anonymous UnionType_<n> unions
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Build     │  Entry rule, parser rules, identifier injection
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Validate   │  Root, abstract types, references, containment cycles
//! └──────┬───────┘
//!        │
//!        ▼
//!    GrammarIR
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use metamodel_grammar::{Compiler, CompilerConfig};
//! use metamodel_grammar::declaration::{Declaration, Multiplicity, Property, TypeRef};
//!
//! let declarations = vec![
//!     Declaration::class("Root").root().with_property(
//!         Property::new("items", vec![TypeRef::complex("A"), TypeRef::complex("B")])
//!             .with_multiplicity(Multiplicity::OneToN),
//!     ),
//!     Declaration::class("A"),
//!     Declaration::class("B"),
//! ];
//!
//! let compiler = Compiler::new(CompilerConfig::default());
//! let result = compiler.compile(&declarations)?;
//! assert_eq!(result.grammar.type_rules()[0].name, "UnionType_0");
//! # Ok::<(), metamodel_grammar::CompilerError>(())
//! ```

pub mod config;
pub mod declaration;
pub mod diagnostic;
pub mod flatten;
pub mod ir;
pub mod rules;
pub mod synthesize;
pub mod validate;

pub use config::CompilerConfig;
pub use diagnostic::{CompilerError, CompilerWarning};
pub use ir::GrammarIR;

use declaration::Declaration;
use synthesize::UnionRegistry;

/// The main compiler struct that orchestrates the compilation pipeline.
///
/// Holds configuration only; every call to [`Compiler::compile`] starts from
/// fresh state, so one compiler can serve any number of independent runs.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Creates a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles declarations into a validated grammar IR.
    ///
    /// This runs the full pipeline:
    /// 1. Flatten inheritance
    /// 2. Synthesize type rules
    /// 3. Build entry and parser rules
    /// 4. Validate the assembled grammar
    ///
    /// Any structural violation aborts the run; no partial IR is returned.
    pub fn compile(&self, declarations: &[Declaration]) -> Result<CompileResult, CompilerError> {
        let mut registry = UnionRegistry::new();

        // Phase 1: Flatten inheritance
        let mut flattened = flatten::flatten(declarations);

        // Phase 2: Synthesize type rules
        let type_rules = synthesize::synthesize_type_rules(&mut flattened, &mut registry);

        // Phase 3: Build rules
        let draft = rules::build(&flattened, type_rules, &mut registry, &self.config);

        // Phase 4: Validate
        let warnings = validate::validate(&flattened, &draft, &self.config)?;
        if self.config.report_warnings {
            for warning in &warnings {
                eprintln!("⚠️  {}", warning);
            }
        }

        Ok(CompileResult {
            grammar: draft.finish()?,
            warnings,
        })
    }

    /// Compiles a JSON declaration document produced by a front end.
    pub fn compile_json(&self, source: &str) -> Result<CompileResult, CompilerError> {
        let declarations = declaration::from_json(source)?;
        self.compile(&declarations)
    }
}

/// Result of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// The validated grammar.
    pub grammar: GrammarIR,
    /// Advisory findings; they did not stop compilation.
    pub warnings: Vec<CompilerWarning>,
}
