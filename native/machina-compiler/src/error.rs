use thiserror::Error;

use crate::diagnostic::{render_diagnostics, Diagnostic};

#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error(transparent)]
    Compilation(#[from] CompilationError),
    #[error(transparent)]
    Emission(#[from] EmissionError),
}

impl CompileError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Compilation(err) => &err.diagnostics,
            CompileError::Emission(_) => &[],
        }
    }
}

/// Blocking diagnostics found while checking. Always carries every diagnostic
/// that survived filtering, not only the errors.
#[derive(Debug, Clone, Error)]
#[error("{}", render_diagnostics(.diagnostics))]
pub struct CompilationError {
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationError {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// The checked tree could not be turned into an inline-evaluable artifact.
#[derive(Debug, Clone, Error)]
#[error("emit skipped")]
pub struct EmissionError {
    pub reason: EmitFailure,
}

impl EmissionError {
    pub fn new(reason: EmitFailure) -> Self {
        Self { reason }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitFailure {
    #[error("invalid emit target: {0}")]
    Target(String),
    #[error("transform failed: {}", .0.join("; "))]
    Transform(Vec<String>),
    /// `line` is 1-based.
    #[error("{construct} at line {line} cannot be represented in an inline module")]
    Unsupported { construct: String, line: u32 },
}
