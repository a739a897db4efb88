//! Payloads carried as JSON strings inside pod annotations.

use k8s_openapi::api::core::v1::ObjectReference;
use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, Error as _, Unexpected},
};
use serde_json::Value;

use super::pod::Reference;

/// Envelope stored in the created-by annotation.
#[derive(Debug, Default, Deserialize)]
pub struct SerializedReference {
    #[serde(default)]
    pub reference: Option<ObjectReference>,
}

impl SerializedReference {
    pub fn decode(value: &str) -> Result<Self, serde_json::Error> {
        decode_object(value)
    }

    /// The owner reference, or the zero value if the envelope has none.
    pub fn into_reference(self) -> Reference {
        self.reference
            .map(|reference| Reference {
                name: reference.name.unwrap_or_default(),
                kind: reference.kind.unwrap_or_default(),
            })
            .unwrap_or_default()
    }
}

/// Names of the containers added by the sidecar injector.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SidecarStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub containers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub init_containers: Vec<String>,
}

impl SidecarStatus {
    pub fn decode(value: &str) -> Result<Self, serde_json::Error> {
        decode_object(value)
    }
}

/// Decodes a payload that must be a JSON object. `null` yields the default
/// value; arrays and scalars are rejected rather than matched by position.
/// A repeated key keeps its last value.
fn decode_object<T>(value: &str) -> Result<T, serde_json::Error>
where
    T: Default + DeserializeOwned,
{
    match serde_json::from_str::<Value>(value)? {
        Value::Null => Ok(T::default()),
        object @ Value::Object(_) => serde_json::from_value(object),
        other => Err(serde_json::Error::invalid_type(
            unexpected(&other),
            &"a JSON object",
        )),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(boolean) => Unexpected::Bool(*boolean),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(string) => Unexpected::Str(string),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
