//! The `explain` command: describe a diagnostic code.

use kdef_diagnostic::ErrorCode;

/// Text shown for `code_str`, or an error message for unknown codes.
pub fn explain_error(code_str: &str) -> Result<String, String> {
    let Some(code) = ErrorCode::parse(code_str) else {
        return Err(format!(
            "Unknown error code: {code_str}\n\n\
             Codes have the format EXXXX (errors) or WXXXX (warnings) where X is a digit.\n\
             Examples: E1001, E3001, W0003"
        ));
    };
    let kind = if code.is_warning() { "warning" } else { "error" };
    Ok(format!("{code} ({kind}): {}", code.description()))
}
