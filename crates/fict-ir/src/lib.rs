//! Fict's intermediate-representation pipeline (§1): HIR construction, SSA
//! renaming, optimization, CFG structurization, and reactive-scope & region
//! analysis.
//!
//! Passes run in the order `build` → `normalize` (folded into `build`) →
//! `ssa` → `optimize` → `structurize` → `regions`. Optimization runs before
//! structurization/region analysis so both see the final, cleaned-up IR
//! rather than re-deriving regions an optimizer pass would have collapsed
//! anyway — see DESIGN.md.

pub mod annotation;
pub mod build;
pub mod context;
pub mod error;
pub mod ir;
pub mod normalize;
pub mod optimize;
pub mod regions;
pub mod ssa;
pub mod structurize;

use context::CompileOptions;
use error::{CompileResult, Diagnostic};
use ir::Program;
use regions::RegionSet;
use serde::{Deserialize, Serialize};
use structurize::StructuredProgram;
use tracing::instrument;

/// The full output of a compilation: the optimized SSA IR, its structured
/// tree per function, and the region metadata per function (§6's output
/// contract). Round-trips through `serde_json` so a downstream emitter can
/// consume a serialized snapshot instead of linking against `fict-ir`
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOutput {
    pub program: Program,
    pub structured: StructuredProgram,
    pub regions: Vec<RegionSet>,
}

/// Runs every pass over a parsed program and returns the fully analyzed IR.
///
/// `on_warn`, when provided, receives every non-fatal diagnostic raised
/// during HIR construction (§7); later passes are deterministic and never
/// warn.
#[instrument(level = "debug", skip_all)]
pub fn compile(
    program: &fict_ast::Program,
    options: &CompileOptions,
    on_warn: Option<&mut dyn FnMut(Diagnostic)>,
) -> CompileResult<CompileOutput> {
    let mut ir = build::build_program(program, options, on_warn)?;
    ssa::run(&mut ir)?;
    optimize::run(&mut ir, options)?;
    let structured = structurize::run(&ir)?;
    let regions = regions::run(&ir.functions, &structured.functions, options);
    Ok(CompileOutput { program: ir, structured, regions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fict_ast::Program as AstProgram;
    use std::sync::Once;

    fn empty_program() -> AstProgram {
        AstProgram { directives: Vec::new(), body: Vec::new() }
    }

    static TRACING_INIT: Once = Once::new();

    /// Installs a test-scoped subscriber once per process so the `#[instrument]`
    /// spans on `compile` and its passes run for real under `cargo test`
    /// instead of going to the no-op default subscriber.
    fn init_tracing() {
        TRACING_INIT.call_once(|| {
            let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("debug").try_init();
        });
    }

    #[test]
    fn compiles_empty_program() {
        init_tracing();
        let options = CompileOptions::new();
        let output = compile(&empty_program(), &options, None).expect("empty program compiles");
        assert!(output.program.functions.is_empty());
        assert!(output.structured.functions.is_empty());
        assert!(output.regions.is_empty());
    }

    /// `CompileOutput` round-trips through `serde_json` (module doc): a
    /// downstream emitter can consume a serialized snapshot without linking
    /// against this crate directly.
    #[test]
    fn compile_output_round_trips_through_json() {
        let decl = fict_ast::FunctionDeclaration {
            name: fict_ast::Identifier::new("f", fict_ast::Span::synthetic()),
            params: vec![],
            body: vec![fict_ast::Stmt::Return(fict_ast::ReturnStatement {
                argument: Some(fict_ast::Expr::NumberLiteral(fict_ast::NumberLiteral {
                    value: 1.0,
                    span: fict_ast::Span::synthetic(),
                })),
                span: fict_ast::Span::synthetic(),
            })],
            directives: vec![],
            leading_comments: vec![],
            is_async: false,
            is_generator: false,
            span: fict_ast::Span::synthetic(),
        };
        let program = AstProgram { directives: Vec::new(), body: vec![fict_ast::Stmt::FunctionDecl(decl)] };
        let options = CompileOptions::new();
        let output = compile(&program, &options, None).expect("program compiles");

        let json = serde_json::to_string(&output).expect("CompileOutput serializes");
        let roundtripped: CompileOutput = serde_json::from_str(&json).expect("CompileOutput deserializes");
        assert_eq!(output, roundtripped);
    }

    #[test]
    fn two_compilations_of_the_same_input_agree_on_memoize() {
        let options = CompileOptions::new();
        let first = compile(&empty_program(), &options, None).unwrap();
        let second = compile(&empty_program(), &options, None).unwrap();
        let first_flags: Vec<bool> = first.regions.iter().flat_map(|rs| rs.regions.iter().map(|r| r.memoize)).collect();
        let second_flags: Vec<bool> = second.regions.iter().flat_map(|rs| rs.regions.iter().map(|r| r.memoize)).collect();
        assert_eq!(first_flags, second_flags);
    }
}
