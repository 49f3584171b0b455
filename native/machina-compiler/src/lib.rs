//! # Machina Label Compiler
//!
//! Compiles an API-exploration script into an artifact the desktop host can
//! evaluate, exposing every top-level labeled block as its own async entry
//! point.
//!
//! ## Invariants
//!
//! 1. **Top-level only**: `label: stmt` directly in the program becomes
//!    `export async function exec_<label>_<line>() { stmt }`. Labels anywhere
//!    else keep their jump-target meaning.
//!
//! 2. **Naming**: `<line>` is the 0-based line the label starts on. Names depend on
//!    nothing else (not the column, file name or call count). See [`unit_name`].
//!
//! 3. **Side effects stay**: every non-label top-level statement runs once, at
//!    its original position, when the artifact is evaluated.
//!
//! 4. **Errors block, warnings don't**: any error diagnostic fails the compile
//!    with all diagnostics attached; warnings travel with the artifact.
//!
//! 5. **Isolation**: each compile owns its allocator and tree. Identical input
//!    gives a byte-identical artifact.

mod checker;
mod code_lens;
mod compiler;
mod diagnostic;
mod editor;
mod error;
mod label_lowerer;
mod module_lowerer;
mod options;
mod source;

#[cfg(feature = "napi")]
mod bridge;

#[cfg(test)]
mod checker_tests;
#[cfg(test)]
mod test_support;

pub use code_lens::{scan_labels, LabelLens};
pub use compiler::{
    compile, compile_all, compile_with_options, spawn_compile, wrap_artifact, CompiledArtifact,
    EMIT_TARGET,
};
pub use diagnostic::{
    render_diagnostics, Diagnostic, Severity, CODE_CANNOT_FIND_NAME, CODE_IMPORT_META,
    CODE_NOT_ASSIGNABLE, CODE_RESERVED_EXPORTS, CODE_TOP_LEVEL_AWAIT, CODE_TOP_LEVEL_FOR_AWAIT,
    CODE_UNUSED_LABEL,
};
pub use editor::{
    default_user_code, editor_code, extract_user_code, replace_environment_code,
    user_code_start_line, LIBRARY_CODE, USER_CODE_MARKER,
};
pub use error::{CompilationError, CompileError, EmissionError, EmitFailure};
pub use label_lowerer::{unit_name, GeneratedUnit};
pub use module_lowerer::EXPORTS_BINDING;
pub use options::{configure, defaults, is_configured, CompileOptions, DEFAULT_FILE_NAME};
pub use source::{SourcePosition, SourceUnit};
