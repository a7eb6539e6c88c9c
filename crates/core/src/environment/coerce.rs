//! Explicit integer decoding for JSON snapshots.
//!
//! JSON has a single number type, so a snapshot written by another tool may
//! store `64` as `64.0`. Each integer field of [`Environment`] decodes through
//! [`integer`], which accepts any integral JSON number and range-checks it
//! against the field's own width and signedness.
//!
//! [`Environment`]: super::Environment

use std::any::type_name;

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Number;

/// Decodes an integral JSON number into `T`.
pub(super) fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let number = Number::deserialize(deserializer)?;
    let value = to_i64(&number).map_err(D::Error::custom)?;
    T::try_from(value)
        .map_err(|_| D::Error::custom(format!("{value} is out of range for {}", type_name::<T>())))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_i64(number: &Number) -> Result<i64, String> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }

    let Some(value) = number.as_f64() else {
        return Err(format!("{number} is not representable"));
    };

    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("expected an integer, got {number}"));
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(format!("{number} is out of range for i64"));
    }

    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Widths {
        #[serde(deserialize_with = "integer")]
        small: i8,
        #[serde(deserialize_with = "integer")]
        medium: u16,
        #[serde(deserialize_with = "integer")]
        large: u32,
    }

    fn decode(json: &str) -> Result<Widths, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn accepts_plain_integers() {
        let widths = decode(r#"{"small": -1, "medium": 8, "large": 4096}"#).expect("valid");
        assert_eq!(widths.small, -1);
        assert_eq!(widths.medium, 8);
        assert_eq!(widths.large, 4096);
    }

    #[test]
    fn accepts_integral_floats() {
        let widths = decode(r#"{"small": 1.0, "medium": 2.0, "large": 64.0}"#).expect("valid");
        assert_eq!(widths.small, 1);
        assert_eq!(widths.medium, 2);
        assert_eq!(widths.large, 64);
    }

    #[test]
    fn rejects_fractional_values() {
        let err = decode(r#"{"small": 1, "medium": 2.5, "large": 64}"#).unwrap_err();
        assert!(err.to_string().contains("expected an integer"));
    }

    #[test]
    fn rejects_values_outside_field_width() {
        let err = decode(r#"{"small": 128, "medium": 2, "large": 64}"#).unwrap_err();
        assert!(err.to_string().contains("out of range for i8"));

        let err = decode(r#"{"small": 1, "medium": -1, "large": 64}"#).unwrap_err();
        assert!(err.to_string().contains("out of range for u16"));
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(decode(r#"{"small": "1", "medium": 2, "large": 64}"#).is_err());
    }
}
