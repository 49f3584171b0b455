//! Line-based label scanning for editor code lenses.
//!
//! Hosts offer an "Execute" action on every line that starts with `label:` and
//! call the generated unit by rebuilding its name with [`unit_name`]. The scan
//! is textual and does not parse the script, so it may offer lines the
//! compiler does not lower (e.g. object-literal keys at column 0).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::label_lowerer::unit_name;
use crate::source::SourceUnit;

lazy_static! {
    static ref LABEL_LINE_RE: Regex = Regex::new(r"^([a-zA-Z0-9]+):").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLens {
    pub label: String,
    /// 0-based line of the label.
    pub line: u32,
    pub unit_name: String,
    pub title: String,
}

/// Scan `text` for label lines. Lines are split exactly as the compiler
/// numbers them, so `unit_name` always matches the compiled unit.
pub fn scan_labels(text: &str) -> Vec<LabelLens> {
    let unit = SourceUnit::new("", text);
    let lenses = unit
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let caps = LABEL_LINE_RE.captures(line)?;
            let label = caps.get(1)?.as_str().to_string();
            let line = index as u32;
            Some(LabelLens {
                unit_name: unit_name(&label, line),
                title: format!("Execute '{}'", label),
                label,
                line,
            })
        })
        .collect();
    lenses
}
