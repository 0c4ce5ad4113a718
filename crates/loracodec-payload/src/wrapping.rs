//! Integer fields are never range-checked: any JSON number is truncated to
//! 32 bits (two's complement) and later masked to its field width.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Integer {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Integer::deserialize(deserializer)? {
        Integer::Signed(value) => value as u32,
        Integer::Unsigned(value) => value as u32,
        // Saturates on overflow, NaN becomes 0.
        Integer::Float(value) => value as i64 as u32,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Record {
        #[serde(deserialize_with = "super::deserialize")]
        value: u32,
    }

    fn wrap(value: serde_json::Value) -> u32 {
        Record::deserialize(json!({ "value": value })).unwrap().value
    }

    #[test]
    fn negative_values_wrap() {
        assert_eq!(wrap(json!(-1)), u32::MAX);
        assert_eq!(wrap(json!(-2)), 0xFFFF_FFFE);
    }

    #[test]
    fn wide_values_truncate() {
        assert_eq!(wrap(json!(5_000_000_001u64)), 0x2A05_F201);
        assert_eq!(wrap(json!(u64::MAX)), u32::MAX);
    }

    #[test]
    fn fractions_truncate_toward_zero() {
        assert_eq!(wrap(json!(3.7)), 3);
        assert_eq!(wrap(json!(-1.5)), u32::MAX);
    }

    #[test]
    fn strings_are_rejected() {
        assert!(Record::deserialize(json!({ "value": "7" })).is_err());
    }
}
