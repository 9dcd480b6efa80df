//! # Validation Module
//!
//! Input validation rules for Pantry.
//!
//! Validation runs at the service boundary, before any repository call;
//! the database CHECK constraints are the final backstop.
//!
//! ## Usage
//! ```rust
//! use pantry_core::validation::{validate_name, validate_quantity};
//! use pantry_core::Quantity;
//!
//! let name = validate_name("name", "  Fridge ").unwrap();
//! assert_eq!(name, "Fridge");
//! validate_quantity("quantity", Quantity::from_whole(5)).unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::quantity::Quantity;
use crate::{MAX_NAME_LEN, MAX_SEARCH_LEN, TEMP_ITEM_ID_PREFIX};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a user-supplied name or title.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 120 characters
///
/// Returns the trimmed value.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a free-text search query.
///
/// Empty queries are allowed (no filtering). Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a UUID string format.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id)
        .map_err(|_| ValidationError::invalid_format(field, "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates that a quantity is strictly positive.
///
/// Zero-quantity additions, consumptions, and claims are all invalid; the
/// only way an item reaches zero is through consumption.
pub fn validate_quantity(field: &str, quantity: Quantity) -> ValidationResult<()> {
    if !quantity.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Placeholder Ids
// =============================================================================

/// Checks whether an item id is a client-generated placeholder.
///
/// Placeholder ids carry the reserved `temp-` prefix and never resolve to a
/// persisted row; consumption treats them as absent.
#[inline]
pub fn is_temp_item_id(id: &str) -> bool {
    id.starts_with(TEMP_ITEM_ID_PREFIX)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "Fridge").unwrap(), "Fridge");
        assert_eq!(validate_name("name", "  Fridge  ").unwrap(), "Fridge");

        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"a".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query(" apple ").unwrap(), "apple");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("quantity", Quantity::from_whole(1)).is_ok());
        assert!(validate_quantity("quantity", Quantity::from_milli(1)).is_ok());
        assert!(validate_quantity("quantity", Quantity::zero()).is_err());
        assert!(validate_quantity("quantity", Quantity::from_milli(-5)).is_err());
    }

    #[test]
    fn test_temp_item_id() {
        assert!(is_temp_item_id("temp-1718822400000"));
        assert!(!is_temp_item_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_temp_item_id(""));
    }
}
