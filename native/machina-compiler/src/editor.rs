//! Editor document assembly.
//!
//! A tab's editor document is `environment code + library preamble + marker +
//! user code`. Everything above the marker is hidden and read-only in the
//! editor; only the user code is persisted per tab.

/// Library preamble every script sees before the user code.
pub const LIBRARY_CODE: &str = "declare const transport: Transport;\nconst client = createClient(transport);";

pub const USER_CODE_MARKER: &str = "/** machina: user code **/\n";

/// Document of a freshly created tab.
pub fn default_user_code() -> String {
    format!("\n{}\n// explore machinery APIs with machina\n", USER_CODE_MARKER)
}

pub fn editor_code(user_code: &str, environment_code: &str) -> String {
    format!(
        "\n{}\n{}\n{}\n{}\n",
        environment_code, LIBRARY_CODE, USER_CODE_MARKER, user_code
    )
}

/// The user's part of an editor document, or the whole document if it has no marker.
pub fn extract_user_code(code: &str) -> &str {
    let separator = format!("{}\n", USER_CODE_MARKER);
    match code.split_once(separator.as_str()) {
        Some((_, user_code)) => user_code,
        None => code,
    }
}

/// Rebuild a document around its user code with new environment code.
pub fn replace_environment_code(code: &str, environment_code: &str) -> String {
    editor_code(extract_user_code(code), environment_code)
}

/// 1-based editor line on which the user code starts.
pub fn user_code_start_line(code: &str) -> u32 {
    let before_marker = match code.split_once(USER_CODE_MARKER) {
        Some((head, _)) => head,
        None => code,
    };
    before_marker.split('\n').count() as u32 + 1
}
