//! Combining two validated instances into one mapping
//!
//! Collision policy: a field name present in both inputs fails the whole
//! merge with one `field_collision` error per shared name. No partial result
//! is ever produced, and neither side silently wins.

use super::errors::{ValidationError, ValidationErrors};
use super::instance::ValidatedInstance;

/// Merges `left` and `right`, keeping `left`'s fields first.
///
/// # Errors
///
/// Returns `field_collision` errors (in `left` declaration order) when the
/// two instances share field names.
pub fn merge(
    left: &ValidatedInstance,
    right: &ValidatedInstance,
) -> Result<ValidatedInstance, ValidationErrors> {
    let collisions: Vec<ValidationError> = left
        .names()
        .filter_map(|name| {
            right.get(name).map(|value| {
                ValidationError::collision(
                    name,
                    format!("field '{}' is present in both merged instances", name),
                    value.to_json(),
                )
            })
        })
        .collect();

    if !collisions.is_empty() {
        return Err(ValidationErrors::from(collisions));
    }

    let entries = left
        .iter()
        .chain(right.iter())
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    Ok(ValidatedInstance::from_entries(entries))
}

impl ValidatedInstance {
    /// See [`merge`].
    pub fn merge(&self, other: &ValidatedInstance) -> Result<ValidatedInstance, ValidationErrors> {
        merge(self, other)
    }
}
