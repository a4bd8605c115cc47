//! Environment variable name validation.

/// Returns `true` if `name` is a legal environment variable name:
/// non-empty, no `=`, no embedded NUL.
#[must_use]
pub fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=') && !name.contains('\0')
}
