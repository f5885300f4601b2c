//! The validator capability and the built-in validators.
//!
//! A validator maps a raw query value to either a normalized value or a
//! [`ValidationError`]. The normalized value, not the raw input, is what gets
//! written back to the query string.

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Validate trait
// ---------------------------------------------------------------------------

/// Injected validation capability for one parameter.
///
/// The trait is object-safe and `Send + Sync` so validators can be shared as
/// `Arc<dyn Validate>` between options and synchronizers. Any closure of
/// shape `Fn(&str) -> Result<String, ValidationError>` is a validator.
pub trait Validate: Send + Sync {
    /// Validate `raw`, returning the normalized value on success.
    fn validate(&self, raw: &str) -> Result<String, ValidationError>;

    /// Short name used in logs and `Debug` output.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Validate for F
where
    F: Fn(&str) -> Result<String, ValidationError> + Send + Sync,
{
    fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        self(raw)
    }
}

// ---------------------------------------------------------------------------
// OneOf
// ---------------------------------------------------------------------------

/// Accepts only the listed values.
///
/// With `case_insensitive` set, a value matching a listed one up to ASCII
/// case is accepted and normalized to the listed spelling.
#[derive(Clone, Debug)]
pub struct OneOf {
    values: Vec<String>,
    case_insensitive: bool,
}

impl OneOf {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Match ignoring ASCII case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Validate for OneOf {
    fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        let found = if self.case_insensitive {
            self.values.iter().find(|v| v.eq_ignore_ascii_case(raw))
        } else {
            self.values.iter().find(|v| v.as_str() == raw)
        };
        found.cloned().ok_or_else(|| {
            ValidationError::new(format!(
                "expected one of [{}], got {raw:?}",
                self.values.join(", ")
            ))
        })
    }

    fn name(&self) -> &str {
        "one_of"
    }
}

// ---------------------------------------------------------------------------
// IntRange
// ---------------------------------------------------------------------------

/// Accepts base-10 integers within `min..=max`.
///
/// Accepted values are normalized to canonical form, so `"007"` and `"+7"`
/// both become `"7"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Any non-negative integer.
    pub fn non_negative() -> Self {
        Self::new(0, i64::MAX)
    }
}

impl Validate for IntRange {
    fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        let n: i64 = raw
            .parse()
            .map_err(|_| ValidationError::new(format!("{raw:?} is not an integer")))?;
        if n < self.min || n > self.max {
            return Err(ValidationError::new(format!(
                "{n} is outside {}..={}",
                self.min, self.max
            )));
        }
        Ok(n.to_string())
    }

    fn name(&self) -> &str {
        "int_range"
    }
}

// ---------------------------------------------------------------------------
// Trimmed
// ---------------------------------------------------------------------------

/// Trims surrounding whitespace before delegating to the inner validator.
#[derive(Clone, Debug)]
pub struct Trimmed<V>(pub V);

impl<V: Validate> Validate for Trimmed<V> {
    fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        self.0.validate(raw.trim())
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_accepts_listed_values() {
        let v = OneOf::new(["active", "inactive"]);
        assert_eq!(v.validate("active").unwrap(), "active");
        assert_eq!(v.validate("inactive").unwrap(), "inactive");
    }

    #[test]
    fn one_of_is_case_sensitive_by_default() {
        let v = OneOf::new(["active", "inactive"]);
        let err = v.validate("ACTIVE").unwrap_err();
        assert!(err.reason.contains("active, inactive"));
    }

    #[test]
    fn one_of_case_insensitive_normalizes_spelling() {
        let v = OneOf::new(["active", "inactive"]).case_insensitive();
        assert_eq!(v.validate("ACTIVE").unwrap(), "active");
        assert!(v.validate("archived").is_err());
    }

    #[test]
    fn int_range_normalizes() {
        let v = IntRange::new(1, 100);
        assert_eq!(v.validate("007").unwrap(), "7");
        assert_eq!(v.validate("+42").unwrap(), "42");
    }

    #[test]
    fn int_range_rejects_out_of_bounds_and_garbage() {
        let v = IntRange::new(1, 100);
        assert!(v.validate("0").is_err());
        assert!(v.validate("101").is_err());
        assert!(v.validate("").is_err());
        assert!(v.validate("ten").is_err());
        assert!(v.validate("1.5").is_err());
    }

    #[test]
    fn trimmed_strips_whitespace_first() {
        let v = Trimmed(IntRange::non_negative());
        assert_eq!(v.validate("  12 ").unwrap(), "12");
        assert_eq!(v.name(), "int_range");
    }

    #[test]
    fn closures_are_validators() {
        let upper = |raw: &str| -> Result<String, ValidationError> {
            if raw.is_empty() {
                Err(ValidationError::new("empty"))
            } else {
                Ok(raw.to_uppercase())
            }
        };
        assert_eq!(upper.validate("abc").unwrap(), "ABC");
        assert!(upper.validate("").is_err());
        assert_eq!(Validate::name(&upper), "custom");
    }
}
