//! Virtual source file for a single compile call.
//!
//! A `SourceUnit` is built fresh for every compile and never shared, so two
//! concurrent compiles can never observe each other's text.

use serde::{Deserialize, Serialize};

/// Zero-based position inside a source unit.
///
/// `column` counts UTF-16 code units, the unit editors use for cursor columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone)]
pub struct SourceUnit {
    name: String,
    text: String,
    line_starts: Vec<u32>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            name: name.into(),
            text,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line contents without their terminators, split the same way positions are.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.line_starts.iter().enumerate().map(move |(index, &start)| {
            let end = self
                .line_starts
                .get(index + 1)
                .map(|&next| next as usize)
                .unwrap_or(self.text.len());
            self.text[start as usize..end].trim_end_matches(['\n', '\r', '\u{2028}', '\u{2029}'])
        })
    }

    /// Resolve a byte offset (as found in oxc spans) to a line and column.
    /// Offsets past the end clamp to the end of the text.
    pub fn position(&self, offset: u32) -> SourcePosition {
        let offset = offset.min(self.text.len() as u32);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line] as usize;
        let column = self
            .text
            .get(line_start..offset as usize)
            .map(|prefix| prefix.encode_utf16().count())
            .unwrap_or(0);

        SourcePosition {
            offset,
            line: line as u32,
            column: column as u32,
        }
    }
}

/// Line starts for every line terminator the TypeScript scanner recognises:
/// `\n`, `\r\n`, lone `\r`, U+2028 and U+2029.
fn compute_line_starts(text: &str) -> Vec<u32> {
    let mut starts = vec![0];
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '\r' => {
                if let Some((_, '\n')) = chars.peek() {
                    chars.next();
                    starts.push((index + 2) as u32);
                } else {
                    starts.push((index + 1) as u32);
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                starts.push((index + ch.len_utf8()) as u32);
            }
            _ => {}
        }
    }
    starts
}
