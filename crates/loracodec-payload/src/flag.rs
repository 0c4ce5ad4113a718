//! Flags arrive from the backend either as booleans or as 0/1 integers and
//! are handed back as 0/1 integers.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Truthy {
    Bool(bool),
    Int(i64),
    Float(f64),
}

pub(crate) fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Truthy::deserialize(deserializer)? {
        Truthy::Bool(value) => value,
        Truthy::Int(value) => value != 0,
        Truthy::Float(value) => value != 0.0,
    })
}
