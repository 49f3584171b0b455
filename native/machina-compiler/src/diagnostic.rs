use oxc_diagnostics::OxcDiagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::source::{SourcePosition, SourceUnit};

/// TS2322: a value of one type assigned where another type is declared.
pub const CODE_NOT_ASSIGNABLE: u32 = 2322;
/// TS7028: a label no `break`/`continue` refers to.
pub const CODE_UNUSED_LABEL: u32 = 7028;
/// TS2304: a value reference that resolves to nothing.
pub const CODE_CANNOT_FIND_NAME: u32 = 2304;
/// TS2441: a top-level binding shadowing the `exports` container.
pub const CODE_RESERVED_EXPORTS: u32 = 2441;
/// TS1378: `await` outside any function.
pub const CODE_TOP_LEVEL_AWAIT: u32 = 1378;
/// TS1432: `for await` outside any function.
pub const CODE_TOP_LEVEL_FOR_AWAIT: u32 = 1432;
/// TS1343: `import.meta` in a script.
pub const CODE_IMPORT_META: u32 = 1343;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

impl Severity {
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
        }
    }
}

/// A positioned compiler message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<u32>,
    pub message: String,
    pub file: String,
    pub position: SourcePosition,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: Option<u32>, message: impl Into<String>, source: &SourceUnit, offset: u32) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            file: source.name().to_string(),
            position: source.position(offset),
        }
    }

    pub fn error(code: u32, message: impl Into<String>, source: &SourceUnit, offset: u32) -> Self {
        Self::new(Severity::Error, Some(code), message, source, offset)
    }

    pub fn warning(code: u32, message: impl Into<String>, source: &SourceUnit, offset: u32) -> Self {
        Self::new(Severity::Warning, Some(code), message, source, offset)
    }

    /// Convert a parser or semantic diagnostic. The first label marks the position.
    pub fn from_oxc(diagnostic: &OxcDiagnostic, source: &SourceUnit) -> Self {
        let offset = diagnostic
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset() as u32)
            .unwrap_or(0);

        let severity = match diagnostic.severity {
            oxc_diagnostics::Severity::Error => Severity::Error,
            oxc_diagnostics::Severity::Warning => Severity::Warning,
            _ => Severity::Suggestion,
        };

        Self::new(severity, None, diagnostic.message.to_string(), source, offset)
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

/// Formats as `index.ts(2,5): error TS2322: message`, with 1-based line and column.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{}): {}",
            self.file,
            self.position.line + 1,
            self.position.column + 1,
            self.severity.as_str()
        )?;
        if let Some(code) = self.code {
            write!(f, " TS{}", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_one_based_position_and_code() {
        let source = SourceUnit::new("index.ts", "let a = 1;\nlet x: number = \"s\";");
        let diag = Diagnostic::error(
            CODE_NOT_ASSIGNABLE,
            "Type 'string' is not assignable to type 'number'.",
            &source,
            15,
        );
        assert_eq!(
            diag.to_string(),
            "index.ts(2,5): error TS2322: Type 'string' is not assignable to type 'number'."
        );
    }

    #[test]
    fn test_display_without_code() {
        let source = SourceUnit::new("script.ts", "x");
        let diag = Diagnostic::new(Severity::Error, None, "Unexpected token", &source, 0);
        assert_eq!(diag.to_string(), "script.ts(1,1): error: Unexpected token");
    }

    #[test]
    fn test_render_joins_with_newlines() {
        let source = SourceUnit::new("index.ts", "a\nb");
        let diagnostics = vec![
            Diagnostic::warning(CODE_UNUSED_LABEL, "Unused label.", &source, 0),
            Diagnostic::error(CODE_NOT_ASSIGNABLE, "bad", &source, 2),
        ];
        assert_eq!(
            render_diagnostics(&diagnostics),
            "index.ts(1,1): warning TS7028: Unused label.\nindex.ts(2,1): error TS2322: bad"
        );
    }
}
