//! Input validation for user-submitted names and values.

use crate::error::{Error, Result};

/// Name length bounds (in characters, after trimming).
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

/// Category limits.
pub const MAX_CATEGORIES: usize = 5;
pub const MAX_CATEGORY_LEN: usize = 50;

/// Names may not impersonate built-in content.
const RESERVED_PREFIXES: [&str; 3] = ["system", "admin", "default"];

/// Creator recorded on items that predate ownership.
const SYSTEM_CREATOR: &str = "system";

fn allowed_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c == '\''
}

fn checked_name(raw: &str, label: &str, reserved: bool) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::Validation(format!("{label} name is required")));
    }

    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err(Error::Validation(format!(
            "{label} name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    if len > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "{label} name must be less than {MAX_NAME_LEN} characters"
        )));
    }
    if !name.chars().all(allowed_name_char) {
        return Err(Error::Validation(format!(
            "{label} name can only contain letters, numbers, spaces, hyphens, and apostrophes"
        )));
    }

    let lower = name.to_lowercase();
    if reserved && RESERVED_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return Err(Error::Validation(format!(
            "{label} name cannot start with reserved words"
        )));
    }

    Ok(name.to_string())
}

/// Validate a food or workout name, returning it trimmed.
pub fn catalog_name(raw: &str, label: &str) -> Result<String> {
    checked_name(raw, label, true)
}

/// Validate a username, returning it trimmed.
///
/// Usernames follow the catalog character rules without spaces. Reserved
/// prefixes are allowed, except that `system` (the creator of legacy
/// items) can never be registered.
pub fn username(raw: &str) -> Result<String> {
    let name = checked_name(raw, "User", false)?;
    if name.chars().any(char::is_whitespace) {
        return Err(Error::Validation("User name cannot contain spaces".to_string()));
    }
    if name.eq_ignore_ascii_case(SYSTEM_CREATOR) {
        return Err(Error::Validation("User name is reserved".to_string()));
    }
    Ok(name)
}

/// Validate a template name: required, trimmed, bounded.
pub fn template_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::Validation("Template name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "Template name must be less than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Check that a numeric field lies within `[min, max]`.
pub fn number_in_range(value: f64, field: &str, min: f64, max: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::Validation(format!("{field} must be a valid number")));
    }
    if value < min || value > max {
        return Err(Error::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(value)
}

/// Keep at most [`MAX_CATEGORIES`] non-empty categories of bounded length.
pub fn categories(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .take(MAX_CATEGORIES)
        .map(|category| category.trim().to_string())
        .filter(|category| !category.is_empty() && category.chars().count() <= MAX_CATEGORY_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_name_trims() {
        assert_eq!(catalog_name("  Oat milk ", "Food").unwrap(), "Oat milk");
        assert_eq!(catalog_name("Farmer's walk", "Workout").unwrap(), "Farmer's walk");
    }

    #[test]
    fn test_catalog_name_rejections() {
        let cases = [
            ("", "is required"),
            ("   ", "is required"),
            ("a", "at least 2"),
            ("Pasta!", "can only contain"),
            ("Admin special", "reserved words"),
            ("SYSTEM bar", "reserved words"),
            ("default rice", "reserved words"),
        ];
        for (input, expected) in cases {
            let err = catalog_name(input, "Food").unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "{input:?} -> {err}"
            );
        }

        let long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(catalog_name(&long, "Food").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert_eq!(username("alice").unwrap(), "alice");
        assert_eq!(username("admin").unwrap(), "admin");
        assert!(username("system").is_err());
        assert!(username("System").is_err());
        assert!(username("al ice").is_err());
    }

    #[test]
    fn test_template_name() {
        assert_eq!(template_name(" Breakfast ").unwrap(), "Breakfast");
        assert!(template_name("  ").is_err());
    }

    #[test]
    fn test_number_range() {
        assert_eq!(number_in_range(0.0, "Fat", 0.0, 1000.0).unwrap(), 0.0);
        assert!(number_in_range(-1.0, "Fat", 0.0, 1000.0).is_err());
        assert!(number_in_range(f64::NAN, "Fat", 0.0, 1000.0).is_err());
    }

    #[test]
    fn test_categories_sanitized() {
        let raw = vec![
            " protein ".to_string(),
            "".to_string(),
            "x".repeat(MAX_CATEGORY_LEN + 1),
            "snack".to_string(),
            "vegan".to_string(),
            "dropped".to_string(),
        ];
        assert_eq!(categories(raw), vec!["protein", "snack", "vegan"]);
    }
}
