//! Label Compiler pipeline.
//!
//! `parse -> lower labels -> check -> strip types -> lower modules -> print -> wrap`
//!
//! Every call owns its allocator, tree and semantic model; nothing is cached
//! between calls, so compiles may run concurrently without coordination.

use oxc_allocator::Allocator;
use oxc_ast_visit::VisitMut;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::checker::check_program;
use crate::diagnostic::Diagnostic;
use crate::error::{CompilationError, CompileError, EmissionError, EmitFailure};
use crate::label_lowerer::{GeneratedUnit, LabelLowerer};
use crate::module_lowerer::ModuleLowerer;
use crate::options::{self, CompileOptions};
use crate::source::SourceUnit;

/// Syntax target for emission. No syntax lowering happens at this target.
pub const EMIT_TARGET: &str = "esnext";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledArtifact {
    /// Self-invoking script; evaluating it fills the host's `exports` container.
    pub code: String,
    pub units: Vec<GeneratedUnit>,
    /// Non-blocking diagnostics (warnings, suggestions).
    pub warnings: Vec<Diagnostic>,
}

impl CompiledArtifact {
    pub fn unit(&self, name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.name == name)
    }
}

/// Compile with the process-wide defaults (see [`options::configure`]).
pub fn compile(source_text: &str) -> Result<CompiledArtifact, CompileError> {
    compile_with_options(source_text, &options::defaults())
}

pub fn compile_with_options(
    source_text: &str,
    options: &CompileOptions,
) -> Result<CompiledArtifact, CompileError> {
    let source = SourceUnit::new(options.file_name.as_str(), source_text);
    let result = run_pipeline(&source, options);
    if let Err(err) = &result {
        match err {
            CompileError::Compilation(e) => log::warn!(
                "compile of {} failed with {} error(s)",
                source.name(),
                e.errors().count()
            ),
            CompileError::Emission(e) => {
                log::warn!("compile of {} failed: {}", source.name(), e.reason)
            }
        }
    }
    result
}

fn run_pipeline(source: &SourceUnit, options: &CompileOptions) -> Result<CompiledArtifact, CompileError> {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true);

    // 1. Acquire tree. Parse errors are reported together with the check diagnostics.
    let parsed = Parser::new(&allocator, source.text(), source_type).parse();
    let parse_errors = parsed.errors;
    let mut program = parsed.program;

    // 2. Rewrite top-level labels.
    let mut lowerer = LabelLowerer::new(&allocator, source);
    lowerer.visit_program(&mut program);
    let units = lowerer.units;

    // 3. The rewritten program is what checking and emission see from here on.
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("rewritten {}:\n{}", source.name(), Codegen::new().build(&program).code);
    }

    // 4. Typecheck.
    let checked = check_program(&program, &parse_errors, source, options);
    if checked.has_errors() {
        return Err(CompilationError {
            diagnostics: checked.diagnostics,
        }
        .into());
    }
    let warnings = checked.diagnostics;

    // 5. Emit.
    let transform_options = TransformOptions::from_target(EMIT_TARGET)
        .map_err(|e| EmissionError::new(EmitFailure::Target(e)))?;
    let transformed = Transformer::new(&allocator, Path::new(source.name()), &transform_options)
        .build_with_scoping(checked.scoping, &mut program);
    if !transformed.errors.is_empty() {
        let messages = transformed
            .errors
            .iter()
            .map(|e| e.message.to_string())
            .collect();
        return Err(EmissionError::new(EmitFailure::Transform(messages)).into());
    }

    ModuleLowerer::new(&allocator, source)
        .lower_program(&mut program)
        .map_err(EmissionError::new)?;

    let emitted = Codegen::new().build(&program).code;

    log::debug!(
        "compiled {}: {} unit(s), {} warning(s)",
        source.name(),
        units.len(),
        warnings.len()
    );

    // 6. Wrap.
    Ok(CompiledArtifact {
        code: wrap_artifact(&emitted),
        units,
        warnings,
    })
}

/// Self-scoping envelope. Only `exports` escapes; every other name stays local
/// to the arrow function.
pub fn wrap_artifact(emitted: &str) -> String {
    let mut code = String::with_capacity(emitted.len() + 96);
    code.push_str("(() => {\n");
    code.push_str("\"use strict\";\n");
    code.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
    code.push_str(emitted);
    if !emitted.ends_with('\n') {
        code.push('\n');
    }
    code.push_str("})();\n");
    code
}

/// Compile many sources on the rayon pool. Results keep the input order.
pub fn compile_all<S>(sources: &[S], options: &CompileOptions) -> Vec<Result<CompiledArtifact, CompileError>>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| compile_with_options(source.as_ref(), options))
        .collect()
}

/// Run a compile on the rayon pool and hand the result to `on_done`, so a UI
/// thread never waits on the compiler.
pub fn spawn_compile<F>(source_text: String, options: CompileOptions, on_done: F)
where
    F: FnOnce(Result<CompiledArtifact, CompileError>) + Send + 'static,
{
    rayon::spawn(move || {
        let result = compile_with_options(&source_text, &options);
        on_done(result);
    });
}
