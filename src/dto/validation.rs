//! Validation helpers for DTOs.

use validator::ValidationError;

const MAX_NAME_LENGTH: usize = 40;

/// Validates a display name (nickname, team, or round name): non-blank
/// and at most 40 characters.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message =
            Some(format!("name must be at most {MAX_NAME_LENGTH} characters").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name_valid() {
        assert!(validate_display_name("ana").is_ok());
        assert!(validate_display_name("Round 12").is_ok());
        assert!(validate_display_name(&"x".repeat(40)).is_ok());
    }

    #[test]
    fn test_validate_display_name_blank() {
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_display_name_too_long() {
        assert!(validate_display_name(&"x".repeat(41)).is_err());
    }
}
