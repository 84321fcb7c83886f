use std::borrow::Cow;

use validator::ValidationError;

/// Rejects empty and whitespace-only input.
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::Borrowed("This field is required."));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(required("x").is_ok());
        assert!(required("  a ").is_ok());
        assert!(required("").is_err());
        assert!(required(" \t\n").is_err());
    }
}
