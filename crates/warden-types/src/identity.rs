//! Shape rules for identities and display names.
//!
//! Warden does not authenticate anyone. These checks only reject strings that
//! cannot sensibly appear in a reader list or as an object name.

use crate::error::TypeError;

/// Check that `identity` is non-empty, has no whitespace and fits `max_len` bytes.
pub fn validate_identity(identity: &str, max_len: usize) -> Result<(), TypeError> {
    let reason = if identity.is_empty() {
        Some("empty".to_string())
    } else if identity.chars().any(char::is_whitespace) {
        Some("contains whitespace".to_string())
    } else if identity.len() > max_len {
        Some(format!("longer than {max_len} bytes"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TypeError::InvalidIdentity {
            identity: identity.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Check that `name` is non-blank and fits `max_len` bytes.
pub fn validate_name(name: &str, max_len: usize) -> Result<(), TypeError> {
    if name.trim().is_empty() {
        return Err(TypeError::InvalidName("name must not be empty".into()));
    }
    if name.len() > max_len {
        return Err(TypeError::InvalidName(format!(
            "name is {} bytes, limit is {max_len}",
            name.len()
        )));
    }
    Ok(())
}
