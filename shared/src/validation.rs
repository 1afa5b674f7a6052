//! Input validation functions
//!
//! Binding already guarantees field types; these checks cover the few
//! constraints the API enforces on top of that.

/// bcrypt only looks at the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validate a plaintext password before it is hashed
///
/// Rejects anything bcrypt would silently truncate, so two passwords
/// sharing a 72-byte prefix can never match each other. The limit is in
/// bytes, not characters.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password length must be {} bytes or less",
            MAX_PASSWORD_BYTES
        ));
    }
    Ok(())
}

/// Validate a row id supplied in an update or delete body
pub fn validate_row_id(id: i64, resource: &str) -> Result<(), String> {
    if id == 0 {
        return Err(format!("{} id is not specified", resource));
    }
    Ok(())
}
