use super::ApiError;

/// Lightweight email shape check: one `@` with a dotted domain. The
/// store's uniqueness constraint is the real gate; this only rejects
/// obviously malformed input early.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Rejects when any named field is empty after trimming.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ApiError::validation(format!("Invalid email: {email}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("alice@example.edu"));
        assert!(is_valid_email("a.b+tag@dept.univ.example.com"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("alice@nodot"));
        assert!(!is_valid_email("alice@.com"));
        assert!(!is_valid_email("alice @example.com"));
    }

    #[test]
    fn require_fields_lists_all_missing() {
        let err = require_fields(&[("name", ""), ("email", "x@y.z"), ("password", "  ")])
            .unwrap_err();
        assert!(err.to_string().contains("name, password"));

        assert!(require_fields(&[("name", "ok")]).is_ok());
    }
}
