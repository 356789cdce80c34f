//! Declarative required-field checks.

use crate::error::{Error, Result};

/// A field that must be present on a record of type `T`.
pub struct Required<T> {
    /// Interchange name of the field, reported when it is missing.
    pub field: &'static str,
    /// Returns whether the field holds a value.
    pub present: fn(&T) -> bool,
}

/// Check `record` against every rule, in order.
///
/// Fails with [`Error::MissingField`] naming the first absent field.
pub fn validate<T>(record: &T, rules: &[Required<T>]) -> Result<()> {
    match rules.iter().find(|rule| !(rule.present)(record)) {
        Some(rule) => Err(Error::missing_field(rule.field)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: Option<u8>,
        right: Option<u8>,
    }

    const RULES: &[Required<Pair>] = &[
        Required {
            field: "left",
            present: |p| p.left.is_some(),
        },
        Required {
            field: "right",
            present: |p| p.right.is_some(),
        },
    ];

    #[test]
    fn test_all_present() {
        let pair = Pair {
            left: Some(1),
            right: Some(2),
        };
        assert!(validate(&pair, RULES).is_ok());
    }

    #[test]
    fn test_first_missing_is_reported() {
        let pair = Pair {
            left: None,
            right: None,
        };
        let err = validate(&pair, RULES).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "left" }));

        let pair = Pair {
            left: Some(1),
            right: None,
        };
        let err = validate(&pair, RULES).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "right" }));
    }

    #[test]
    fn test_no_rules() {
        let pair = Pair {
            left: None,
            right: None,
        };
        assert!(validate(&pair, &[]).is_ok());
    }
}
