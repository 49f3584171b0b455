//! Compile options and the process-wide defaults holder.
//!
//! Hosts configure the compiler once at startup through [`configure`]; later
//! calls are no-ops. Nothing else in the crate keeps global state.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_FILE_NAME: &str = "index.ts";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Name of the virtual file, shown in diagnostics.
    pub file_name: String,
    /// Diagnostic codes dropped before severity classification.
    pub ignored_codes: Vec<u32>,
    /// Host-provided globals accepted as resolved names, on top of the built-in list.
    pub globals: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            ignored_codes: Vec::new(),
            globals: Vec::new(),
        }
    }
}

impl CompileOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn ignore_code(mut self, code: u32) -> Self {
        if !self.ignored_codes.contains(&code) {
            self.ignored_codes.push(code);
        }
        self
    }

    pub fn with_global(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.globals.contains(&name) {
            self.globals.push(name);
        }
        self
    }

    pub fn is_host_global(&self, name: &str) -> bool {
        self.globals.iter().any(|g| g == name)
    }

    pub fn is_ignored(&self, code: Option<u32>) -> bool {
        code.is_some_and(|c| self.ignored_codes.contains(&c))
    }
}

static DEFAULTS: OnceLock<CompileOptions> = OnceLock::new();

/// Install process-wide defaults. Returns `false` if defaults were already
/// configured, in which case `options` is discarded.
pub fn configure(options: CompileOptions) -> bool {
    install(&DEFAULTS, options)
}

fn install(cell: &OnceLock<CompileOptions>, options: CompileOptions) -> bool {
    let mut installed = false;
    cell.get_or_init(|| {
        installed = true;
        options
    });
    if !installed {
        log::debug!("compiler defaults already configured, ignoring reconfiguration");
    }
    installed
}

pub fn is_configured() -> bool {
    DEFAULTS.get().is_some()
}

pub fn defaults() -> CompileOptions {
    DEFAULTS.get().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_host_json() {
        let options: CompileOptions =
            serde_json::from_str(r#"{ "fileName": "tab-2.ts", "ignoredCodes": [7028], "globals": ["transport"] }"#)
                .unwrap();
        assert_eq!(options.file_name, "tab-2.ts");
        assert!(options.is_host_global("transport"));
        assert!(options.is_ignored(Some(7028)));
        assert!(!options.is_ignored(None));

        let partial: CompileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(partial, CompileOptions::default());
    }

    #[test]
    fn test_ignore_code_is_idempotent() {
        let options = CompileOptions::default().ignore_code(1).ignore_code(1);
        assert_eq!(options.ignored_codes, vec![1]);
    }

    // Exercises the holder through a local cell so the process-wide defaults
    // stay untouched for every other test in the binary.
    #[test]
    fn test_install_only_once() {
        let cell = OnceLock::new();
        assert!(install(&cell, CompileOptions::default().with_file_name("host.ts")));
        assert!(!install(&cell, CompileOptions::default().with_file_name("other.ts")));
        assert_eq!(cell.get().map(|o| o.file_name.as_str()), Some("host.ts"));
    }
}
